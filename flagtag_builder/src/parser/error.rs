use thiserror::Error;

use crate::model::BoxError;

/// The [`crate::FlagSet`] refused to register a flag.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegisterError {
    /// Another flag already uses the name.
    #[error("flag redefined: {name}")]
    Redefined {
        /// The name of the flag set.
        set: String,
        /// The duplicated flag name.
        name: String,
    },
    /// The name would be read as a separate flag.
    #[error("flag {name:?} begins with -")]
    LeadingHyphen {
        /// The offending flag name.
        name: String,
    },
    /// The name would be read as a value assignment.
    #[error("flag {name:?} contains =")]
    ContainsEquals {
        /// The offending flag name.
        name: String,
    },
}

/// Failure to parse the Cli tokens.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A token starting with `-` that cannot name a flag (ex: `---x`, `-=x`).
    #[error("bad flag syntax: {0}")]
    BadSyntax(String),
    /// The flag is not registered.
    #[error("flag provided but not defined: -{0}")]
    NotDefined(String),
    /// A non-boolean flag is the last token, without a value.
    #[error("flag needs an argument: -{0}")]
    NeedsArgument(String),
    /// The flag rejected its value.
    #[error("invalid value {value:?} for flag -{name}: {source}")]
    InvalidValue {
        /// The rejected value.
        value: String,
        /// The flag name.
        name: String,
        /// Why the value was rejected.
        source: BoxError,
    },
    /// `-h` or `-help` was specified without being registered.
    #[error("flag: help requested")]
    Help,
}
