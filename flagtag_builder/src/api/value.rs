use std::fmt::{Display, Formatter};
use std::time::Duration;

use crate::api::defaults::*;
use crate::model::BoxError;
use crate::prelude::{BinaryMarshaler, TextMarshaler, Value};

/// Adapts a [`TextMarshaler`] into a [`Value`].
///
/// An adapter without a target renders as the empty string.
///
/// ### Panics
/// Rendering panics if `marshal_text` fails.
/// A value which was constructed successfully must always be able to render itself; a failure here is a bug in the marshaler.
#[derive(Default)]
pub struct TextValue<'a> {
    text: Option<&'a mut dyn TextMarshaler>,
}

impl<'a> TextValue<'a> {
    /// Wrap `text`.
    pub fn new(text: &'a mut dyn TextMarshaler) -> Self {
        Self { text: Some(text) }
    }
}

impl Display for TextValue<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.text {
            None => Ok(()),
            Some(text) => match text.marshal_text() {
                Ok(rendered) => f.write_str(&rendered),
                Err(error) => {
                    panic!("internal error - cannot marshal a constructed value to text: {error}")
                }
            },
        }
    }
}

impl Value for TextValue<'_> {
    fn set(&mut self, input: &str) -> Result<(), BoxError> {
        match self.text.as_deref_mut() {
            Some(text) => text.unmarshal_text(input),
            None => Err("no value to unmarshal text into".into()),
        }
    }
}

/// Adapts a [`BinaryMarshaler`] into a [`Value`].
///
/// An adapter without a target renders as the empty string.
/// Non-UTF-8 encodings are rendered lossily.
///
/// ### Panics
/// Rendering panics if `marshal_binary` fails, for the same reason as [`TextValue`].
#[derive(Default)]
pub struct BinaryValue<'a> {
    binary: Option<&'a mut dyn BinaryMarshaler>,
}

impl<'a> BinaryValue<'a> {
    /// Wrap `binary`.
    pub fn new(binary: &'a mut dyn BinaryMarshaler) -> Self {
        Self {
            binary: Some(binary),
        }
    }
}

impl Display for BinaryValue<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.binary {
            None => Ok(()),
            Some(binary) => match binary.marshal_binary() {
                Ok(data) => f.write_str(&String::from_utf8_lossy(&data)),
                Err(error) => {
                    panic!("internal error - cannot marshal a constructed value to binary: {error}")
                }
            },
        }
    }
}

impl Value for BinaryValue<'_> {
    fn set(&mut self, input: &str) -> Result<(), BoxError> {
        match self.binary.as_deref_mut() {
            Some(binary) => binary.unmarshal_binary(input.as_bytes()),
            None => Err("no value to unmarshal binary into".into()),
        }
    }
}

/// Behaviour for the built-in flag types, which parse and render without an adapter.
pub trait FlagType: Sized {
    /// Parse a value from the Cli.
    fn parse_flag(input: &str) -> Result<Self, ParseValueError>;

    /// Render the value so that `parse_flag` accepts it.
    fn format_flag(&self) -> String;

    /// Whether a flag of this type may be specified without a value.
    fn is_bool() -> bool {
        false
    }
}

impl FlagType for String {
    fn parse_flag(input: &str) -> Result<Self, ParseValueError> {
        Ok(input.to_string())
    }

    fn format_flag(&self) -> String {
        self.clone()
    }
}

impl FlagType for bool {
    fn parse_flag(input: &str) -> Result<Self, ParseValueError> {
        parse_bool(input)
    }

    fn format_flag(&self) -> String {
        self.to_string()
    }

    fn is_bool() -> bool {
        true
    }
}

impl FlagType for Duration {
    fn parse_flag(input: &str) -> Result<Self, ParseValueError> {
        parse_duration(input)
    }

    fn format_flag(&self) -> String {
        format_duration(*self)
    }
}

macro_rules! numeric_flag_type {
    ($($ty:ty => $parse:ident),* $(,)?) => {
        $(
            impl FlagType for $ty {
                fn parse_flag(input: &str) -> Result<Self, ParseValueError> {
                    $parse(input)
                }

                fn format_flag(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

numeric_flag_type!(
    isize => parse_int,
    i64 => parse_int64,
    usize => parse_uint,
    u64 => parse_uint64,
    f64 => parse_float64,
);

/// A [`Value`] bound to a variable of a built-in [`FlagType`].
pub struct Scalar<'a, T> {
    variable: &'a mut T,
}

impl<'a, T> Scalar<'a, T> {
    /// Bind to `variable`.
    pub fn new(variable: &'a mut T) -> Self {
        Self { variable }
    }
}

impl<T: FlagType> Display for Scalar<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.variable.format_flag())
    }
}

impl<T: FlagType> Value for Scalar<'_, T> {
    fn set(&mut self, input: &str) -> Result<(), BoxError> {
        *self.variable = T::parse_flag(input)?;
        Ok(())
    }

    fn is_bool_flag(&self) -> bool {
        T::is_bool()
    }
}
