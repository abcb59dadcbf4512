use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use crate::api::{FlagType, Scalar};
use crate::parser::{ParseError, RegisterError};
use crate::prelude::Value;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// What [`FlagSet::parse`] does when parsing fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorHandling {
    /// Return the error.
    #[default]
    ContinueOnError,
    /// Print the error and exit with status `2` (via [`std::process::exit`]).
    /// A help request exits with status `0`.
    ExitOnError,
    /// Panic with the error.
    PanicOnError,
}

/// A registered flag.
pub struct Flag<'a> {
    name: String,
    usage: String,
    default: String,
    value: Box<dyn Value + 'a>,
}

impl Flag<'_> {
    /// The name, as written after the `-` on the Cli.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The usage description.
    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// The value at registration time, rendered as a string.
    pub fn default(&self) -> &str {
        &self.default
    }

    /// The current value, rendered as a string.
    pub fn value(&self) -> String {
        self.value.to_string()
    }

    /// Whether the flag may be specified without a value.
    pub fn is_bool_flag(&self) -> bool {
        self.value.is_bool_flag()
    }

    /// Extract the value name from the usage, returning `(name, usage)`.
    ///
    /// The first back-quoted segment of the usage is the name, and is left in the usage without its quotes.
    /// Otherwise the name is `value`, or empty for boolean flags.
    ///
    /// ### Example
    /// ```
    /// # use flagtag_builder as flagtag;
    /// use flagtag::{ErrorHandling, FlagSet};
    ///
    /// let mut port: usize = 0;
    /// let mut flags = FlagSet::new("demo", ErrorHandling::ContinueOnError);
    /// flags.uint_var(&mut port, "port", 8080, "the `number` to listen on").unwrap();
    /// let (name, usage) = flags.lookup("port").unwrap().unquote_usage();
    /// assert_eq!(name, "number");
    /// assert_eq!(usage, "the number to listen on");
    /// ```
    pub fn unquote_usage(&self) -> (String, String) {
        if let Some(start) = self.usage.find('`') {
            let rest = &self.usage[start + 1..];

            if let Some(length) = rest.find('`') {
                let name = &rest[..length];
                let usage = format!("{}{}{}", &self.usage[..start], name, &rest[length + 1..]);
                return (name.to_string(), usage);
            }
        }

        let name = if self.is_bool_flag() { "" } else { "value" };
        (name.to_string(), self.usage.clone())
    }
}

impl std::fmt::Debug for Flag<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Flag")
            .field("name", &self.name)
            .field("usage", &self.usage)
            .field("default", &self.default)
            .field("value", &self.value())
            .finish()
    }
}

/// A set of flags, each bound to a variable.
///
/// Parsing writes directly into the bound variables, which are borrowed for the lifetime of the set.
///
/// ### Example
/// ```
/// # use flagtag_builder as flagtag;
/// use flagtag::{ErrorHandling, FlagSet};
///
/// let mut verbose = false;
/// let mut width: isize = 0;
/// let mut flags = FlagSet::new("demo", ErrorHandling::ContinueOnError);
/// flags.bool_var(&mut verbose, "verbose", false, "chatty output").unwrap();
/// flags.int_var(&mut width, "width", 80, "the width").unwrap();
/// flags.parse(["-verbose", "-width=100", "file.txt"]).unwrap();
/// assert_eq!(flags.args(), &["file.txt".to_string()]);
/// drop(flags);
///
/// assert!(verbose);
/// assert_eq!(width, 100);
/// ```
pub struct FlagSet<'a> {
    name: String,
    error_handling: ErrorHandling,
    formal: BTreeMap<String, Flag<'a>>,
    actual: BTreeSet<String>,
    args: Vec<String>,
    parsed: bool,
}

impl std::fmt::Debug for FlagSet<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlagSet")
            .field("name", &self.name)
            .field("error_handling", &self.error_handling)
            .field("formal", &self.formal)
            .field("actual", &self.actual)
            .field("args", &self.args)
            .field("parsed", &self.parsed)
            .finish()
    }
}

impl<'a> FlagSet<'a> {
    /// Create an empty flag set.
    pub fn new(name: impl Into<String>, error_handling: ErrorHandling) -> Self {
        Self {
            name: name.into(),
            error_handling,
            formal: BTreeMap::default(),
            actual: BTreeSet::default(),
            args: Vec::default(),
            parsed: false,
        }
    }

    /// The name of the flag set.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The error handling policy of [`FlagSet::parse`].
    pub fn error_handling(&self) -> ErrorHandling {
        self.error_handling
    }

    /// Register a flag for `value`.
    /// The flag's default is the value's current rendering.
    pub fn var(
        &mut self,
        value: Box<dyn Value + 'a>,
        name: impl Into<String>,
        usage: impl Into<String>,
    ) -> Result<(), RegisterError> {
        let name = name.into();

        if name.starts_with('-') {
            return Err(RegisterError::LeadingHyphen { name });
        }

        if name.contains('=') {
            return Err(RegisterError::ContainsEquals { name });
        }

        if self.formal.contains_key(&name) {
            return Err(RegisterError::Redefined {
                set: self.name.clone(),
                name,
            });
        }

        let flag = Flag {
            name: name.clone(),
            usage: usage.into(),
            default: value.to_string(),
            value,
        };
        #[cfg(feature = "tracing_debug")]
        {
            debug!("Registered flag '{name}' with default '{}'.", flag.default);
        }
        self.formal.insert(name, flag);
        Ok(())
    }

    fn scalar_var<T: FlagType + 'a>(
        &mut self,
        variable: &'a mut T,
        name: impl Into<String>,
        default: T,
        usage: impl Into<String>,
    ) -> Result<(), RegisterError> {
        *variable = default;
        self.var(Box::new(Scalar::new(variable)), name, usage)
    }

    /// Register a `String` flag, assigning `default` to `variable`.
    pub fn string_var(
        &mut self,
        variable: &'a mut String,
        name: impl Into<String>,
        default: impl Into<String>,
        usage: impl Into<String>,
    ) -> Result<(), RegisterError> {
        self.scalar_var(variable, name, default.into(), usage)
    }

    /// Register a `bool` flag, assigning `default` to `variable`.
    pub fn bool_var(
        &mut self,
        variable: &'a mut bool,
        name: impl Into<String>,
        default: bool,
        usage: impl Into<String>,
    ) -> Result<(), RegisterError> {
        self.scalar_var(variable, name, default, usage)
    }

    /// Register an `isize` flag, assigning `default` to `variable`.
    pub fn int_var(
        &mut self,
        variable: &'a mut isize,
        name: impl Into<String>,
        default: isize,
        usage: impl Into<String>,
    ) -> Result<(), RegisterError> {
        self.scalar_var(variable, name, default, usage)
    }

    /// Register an `i64` flag, assigning `default` to `variable`.
    pub fn int64_var(
        &mut self,
        variable: &'a mut i64,
        name: impl Into<String>,
        default: i64,
        usage: impl Into<String>,
    ) -> Result<(), RegisterError> {
        self.scalar_var(variable, name, default, usage)
    }

    /// Register a `usize` flag, assigning `default` to `variable`.
    pub fn uint_var(
        &mut self,
        variable: &'a mut usize,
        name: impl Into<String>,
        default: usize,
        usage: impl Into<String>,
    ) -> Result<(), RegisterError> {
        self.scalar_var(variable, name, default, usage)
    }

    /// Register a `u64` flag, assigning `default` to `variable`.
    pub fn uint64_var(
        &mut self,
        variable: &'a mut u64,
        name: impl Into<String>,
        default: u64,
        usage: impl Into<String>,
    ) -> Result<(), RegisterError> {
        self.scalar_var(variable, name, default, usage)
    }

    /// Register an `f64` flag, assigning `default` to `variable`.
    pub fn float64_var(
        &mut self,
        variable: &'a mut f64,
        name: impl Into<String>,
        default: f64,
        usage: impl Into<String>,
    ) -> Result<(), RegisterError> {
        self.scalar_var(variable, name, default, usage)
    }

    /// Register a [`Duration`] flag, assigning `default` to `variable`.
    /// Values are written as a sequence of decimals with units (ex: `1h30m`, `300ms`).
    pub fn duration_var(
        &mut self,
        variable: &'a mut Duration,
        name: impl Into<String>,
        default: Duration,
        usage: impl Into<String>,
    ) -> Result<(), RegisterError> {
        self.scalar_var(variable, name, default, usage)
    }

    /// The flag registered under `name`.
    pub fn lookup(&self, name: &str) -> Option<&Flag<'a>> {
        self.formal.get(name)
    }

    /// All flags, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &Flag<'a>> {
        self.formal.values()
    }

    /// The flags which have been set, sorted by name.
    pub fn iter_set(&self) -> impl Iterator<Item = &Flag<'a>> {
        self.actual
            .iter()
            .filter_map(|name| self.formal.get(name.as_str()))
    }

    /// The number of registered flags.
    pub fn len(&self) -> usize {
        self.formal.len()
    }

    /// Whether no flags are registered.
    pub fn is_empty(&self) -> bool {
        self.formal.is_empty()
    }

    /// The arguments remaining after parsing.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Whether [`FlagSet::parse`] has been called.
    pub fn parsed(&self) -> bool {
        self.parsed
    }

    /// Set the flag `name` from `value`.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), ParseError> {
        let flag = self
            .formal
            .get_mut(name)
            .ok_or_else(|| ParseError::NotDefined(name.to_string()))?;
        flag.value
            .set(value)
            .map_err(|source| ParseError::InvalidValue {
                value: value.to_string(),
                name: name.to_string(),
                source,
            })?;
        self.actual.insert(name.to_string());
        Ok(())
    }

    /// Parse `arguments`, which must not include the program name.
    ///
    /// Flags are written as `-name value`, `-name=value`, or `-name` for boolean flags (`--` may be used in place of `-`).
    /// Parsing stops at the first non-flag argument, or after the terminator `--`.
    /// On failure, the [`ErrorHandling`] policy of the set decides the outcome.
    pub fn parse<I, S>(&mut self, arguments: I) -> Result<(), ParseError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parsed = true;
        self.args = arguments.into_iter().map(Into::into).collect();

        loop {
            match self.parse_one() {
                Ok(true) => continue,
                Ok(false) => return Ok(()),
                Err(error) => {
                    #[cfg(feature = "tracing_debug")]
                    {
                        debug!("Failed to parse flag set '{}': {error}.", self.name);
                    }

                    return match self.error_handling {
                        ErrorHandling::ContinueOnError => Err(error),
                        ErrorHandling::ExitOnError => {
                            if matches!(error, ParseError::Help) {
                                std::process::exit(0);
                            }

                            eprintln!("{error}");
                            std::process::exit(2);
                        }
                        ErrorHandling::PanicOnError => panic!("{error}"),
                    };
                }
            }
        }
    }

    // Consume one flag from the front of `args`; false when there are none left.
    fn parse_one(&mut self) -> Result<bool, ParseError> {
        let token = match self.args.first() {
            Some(token) if token.len() >= 2 && token.starts_with('-') => token.clone(),
            _ => return Ok(false),
        };
        let mut minuses = 1;

        if token.as_bytes()[1] == b'-' {
            minuses += 1;

            if token.len() == 2 {
                self.args.remove(0);
                return Ok(false);
            }
        }

        let name = &token[minuses..];

        if name.is_empty() || name.starts_with('-') || name.starts_with('=') {
            return Err(ParseError::BadSyntax(token));
        }

        self.args.remove(0);
        let (name, inline) = match name.split_once('=') {
            Some((name, value)) => (name, Some(value.to_string())),
            None => (name, None),
        };

        let is_bool = match self.formal.get(name) {
            Some(flag) => flag.is_bool_flag(),
            None if name == "help" || name == "h" => return Err(ParseError::Help),
            None => return Err(ParseError::NotDefined(name.to_string())),
        };

        let value = match inline {
            Some(value) => value,
            None if is_bool => "true".to_string(),
            None if !self.args.is_empty() => self.args.remove(0),
            None => return Err(ParseError::NeedsArgument(name.to_string())),
        };

        self.set(name, &value)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TextValue;
    use crate::api::test::Pair;
    use rstest::rstest;

    #[test]
    fn register_and_lookup() {
        // Setup
        let mut width: isize = 7;
        let mut name = String::default();
        let mut flags = FlagSet::new("test", ErrorHandling::ContinueOnError);

        // Execute
        flags.int_var(&mut width, "width", 25, "the `pixels` wide").unwrap();
        flags.string_var(&mut name, "name", "bob", "").unwrap();

        // Verify
        assert_eq!(flags.name(), "test");
        assert_eq!(flags.error_handling(), ErrorHandling::ContinueOnError);
        assert_eq!(flags.len(), 2);
        assert!(!flags.is_empty());
        let flag = flags.lookup("width").unwrap();
        assert_eq!(flag.name(), "width");
        assert_eq!(flag.default(), "25");
        assert_eq!(flag.value(), "25");
        assert_eq!(flag.usage(), "the `pixels` wide");
        assert!(flags.lookup("height").is_none());
        let names: Vec<&str> = flags.iter().map(Flag::name).collect();
        assert_eq!(names, vec!["name", "width"]);
        drop(flags);
        assert_eq!(width, 25);
        assert_eq!(name, "bob");
    }

    #[test]
    fn register_redefined() {
        // Setup
        let mut a: u64 = 0;
        let mut b: u64 = 0;
        let mut flags = FlagSet::new("test", ErrorHandling::ContinueOnError);
        flags.uint64_var(&mut a, "count", 0, "").unwrap();

        // Execute
        let result = flags.uint64_var(&mut b, "count", 0, "");

        // Verify
        assert_eq!(
            result.unwrap_err(),
            RegisterError::Redefined {
                set: "test".to_string(),
                name: "count".to_string(),
            }
        );
    }

    #[rstest]
    #[case("-count", RegisterError::LeadingHyphen { name: "-count".to_string() })]
    #[case("a=b", RegisterError::ContainsEquals { name: "a=b".to_string() })]
    fn register_invalid_name(#[case] name: &str, #[case] expected: RegisterError) {
        let mut variable = false;
        let mut flags = FlagSet::new("test", ErrorHandling::ContinueOnError);
        assert_eq!(flags.bool_var(&mut variable, name, false, "").unwrap_err(), expected);
    }

    #[rstest]
    #[case(vec!["-width", "20", "-height=30"], 20, 30)]
    #[case(vec!["--width=20", "--height", "30"], 20, 30)]
    #[case(vec!["-width=0x10"], 16, 1)]
    #[case(vec![], 0, 1)]
    #[case(vec!["-height", "-5"], 0, -5)]
    fn parse_values(#[case] tokens: Vec<&str>, #[case] width: isize, #[case] height: isize) {
        // Setup
        let mut w: isize = 0;
        let mut h: isize = 0;
        let mut flags = FlagSet::new("test", ErrorHandling::ContinueOnError);
        flags.int_var(&mut w, "width", 0, "").unwrap();
        flags.int_var(&mut h, "height", 1, "").unwrap();

        // Execute
        flags.parse(tokens).unwrap();

        // Verify
        assert!(flags.parsed());
        assert!(flags.args().is_empty());
        drop(flags);
        assert_eq!(w, width);
        assert_eq!(h, height);
    }

    #[test]
    fn parse_nothing() {
        let mut verbose = true;
        let mut flags = FlagSet::new("test", ErrorHandling::ContinueOnError);
        flags.bool_var(&mut verbose, "v", false, "").unwrap();
        flags.parse(&[] as &[String]).unwrap();
        assert!(flags.parsed());
        assert!(flags.args().is_empty());
        assert_eq!(flags.iter_set().count(), 0);
    }

    #[rstest]
    #[case(vec!["-v"], true, vec![])]
    #[case(vec!["-v=false"], false, vec![])]
    #[case(vec!["-v", "false"], true, vec!["false"])]
    #[case(vec!["a", "-v"], false, vec!["a", "-v"])]
    #[case(vec!["--", "-v"], false, vec!["-v"])]
    #[case(vec!["-v", "--", "b"], true, vec!["b"])]
    #[case(vec!["-"], false, vec!["-"])]
    fn parse_bool_and_positionals(
        #[case] tokens: Vec<&str>,
        #[case] expected: bool,
        #[case] remaining: Vec<&str>,
    ) {
        // Setup
        let mut verbose = false;
        let mut flags = FlagSet::new("test", ErrorHandling::ContinueOnError);
        flags.bool_var(&mut verbose, "v", false, "").unwrap();

        // Execute
        flags.parse(tokens).unwrap();

        // Verify
        assert_eq!(flags.args(), remaining.as_slice());
        drop(flags);
        assert_eq!(verbose, expected);
    }

    #[test]
    fn parse_errors() {
        // Setup
        let mut width: isize = 0;
        let mut verbose = false;
        let mut flags = FlagSet::new("test", ErrorHandling::ContinueOnError);
        flags.int_var(&mut width, "width", 0, "").unwrap();
        flags.bool_var(&mut verbose, "verbose", false, "").unwrap();

        // Execute & verify
        assert_matches!(flags.parse(["---width"]), Err(ParseError::BadSyntax(t)) if t == "---width");
        assert_matches!(flags.parse(["-=1"]), Err(ParseError::BadSyntax(_)));
        assert_matches!(flags.parse(["-depth", "1"]), Err(ParseError::NotDefined(n)) if n == "depth");
        assert_matches!(flags.parse(["-width"]), Err(ParseError::NeedsArgument(n)) if n == "width");
        assert_matches!(flags.parse(["-h"]), Err(ParseError::Help));
        assert_matches!(flags.parse(["--help"]), Err(ParseError::Help));
        assert_matches!(
            flags.parse(["-width", "abc"]),
            Err(ParseError::InvalidValue { value, name, .. }) if value == "abc" && name == "width"
        );
        assert_matches!(flags.parse(["-verbose=maybe"]), Err(ParseError::InvalidValue { .. }));
    }

    #[test]
    fn parse_error_message() {
        let mut width: usize = 0;
        let mut flags = FlagSet::new("test", ErrorHandling::ContinueOnError);
        flags.uint_var(&mut width, "width", 0, "").unwrap();
        let error = flags.parse(["-width=-1"]).unwrap_err();
        assert_eq!(
            error.to_string(),
            r#"invalid value "-1" for flag -width: parsing "-1": invalid syntax"#
        );
    }

    #[rstest]
    #[case(ErrorHandling::ContinueOnError)]
    #[case(ErrorHandling::ExitOnError)]
    #[case(ErrorHandling::PanicOnError)]
    fn error_handling_policy(#[case] error_handling: ErrorHandling) {
        let flags = FlagSet::new("policy", error_handling);
        assert_eq!(flags.error_handling(), error_handling);
        assert!(flags.is_empty());
        assert!(!flags.parsed());
    }

    #[test]
    fn error_handling_default() {
        assert_eq!(ErrorHandling::default(), ErrorHandling::ContinueOnError);
    }

    #[test]
    #[should_panic(expected = "flag provided but not defined: -nope")]
    fn parse_panic_on_error() {
        let mut flags = FlagSet::new("test", ErrorHandling::PanicOnError);
        assert_eq!(flags.error_handling(), ErrorHandling::PanicOnError);
        let _ = flags.parse(["-nope"]);
    }

    #[test]
    fn set_and_iter_set() {
        // Setup
        let mut a = String::default();
        let mut b: f64 = 0.0;
        let mut c = Duration::ZERO;
        let mut flags = FlagSet::new("test", ErrorHandling::ContinueOnError);
        flags.string_var(&mut a, "a", "", "").unwrap();
        flags.float64_var(&mut b, "b", 1.5, "").unwrap();
        flags.duration_var(&mut c, "c", Duration::from_secs(1), "").unwrap();

        // Execute
        flags.set("c", "1m").unwrap();
        flags.parse(["-a", "x"]).unwrap();

        // Verify
        let set: Vec<(&str, String)> = flags.iter_set().map(|f| (f.name(), f.value())).collect();
        assert_eq!(set, vec![("a", "x".to_string()), ("c", "1m0s".to_string())]);
        assert_eq!(flags.lookup("b").unwrap().default(), "1.5");
        assert_eq!(flags.lookup("c").unwrap().default(), "1s");
        assert_matches!(flags.set("d", "1"), Err(ParseError::NotDefined(_)));
        assert_matches!(flags.set("b", "x"), Err(ParseError::InvalidValue { .. }));
    }

    #[test]
    fn custom_value() {
        // Setup
        let mut pair = Pair(1, 2);
        let mut flags = FlagSet::new("test", ErrorHandling::ContinueOnError);
        flags
            .var(Box::new(TextValue::new(&mut pair)), "pair", "a `pair` of numbers")
            .unwrap();

        // Execute
        flags.parse(["-pair", "3,4"]).unwrap();

        // Verify
        let flag = flags.lookup("pair").unwrap();
        assert_eq!(flag.default(), "1,2");
        assert_eq!(flag.value(), "3,4");
        assert!(!flag.is_bool_flag());
        drop(flags);
        assert_eq!(pair, Pair(3, 4));
    }

    #[rstest]
    #[case("a `name` here", false, "name", "a name here")]
    #[case("`x`", false, "x", "x")]
    #[case("one ` quote", false, "value", "one ` quote")]
    #[case("no quotes", false, "value", "no quotes")]
    #[case("no quotes", true, "", "no quotes")]
    #[case("``", false, "", "")]
    fn unquote_usage(
        #[case] usage: &str,
        #[case] boolean: bool,
        #[case] name: &str,
        #[case] unquoted: &str,
    ) {
        // Setup
        let mut b = false;
        let mut s = String::default();
        let mut flags = FlagSet::new("test", ErrorHandling::ContinueOnError);

        if boolean {
            flags.bool_var(&mut b, "f", false, usage).unwrap();
        } else {
            flags.string_var(&mut s, "f", "", usage).unwrap();
        }

        // Execute
        let (actual_name, actual_usage) = flags.lookup("f").unwrap().unquote_usage();

        // Verify
        assert_eq!(actual_name, name);
        assert_eq!(actual_usage, unquoted);
    }
}
