use crate::api::defaults::*;
use crate::api::Kind;
use crate::parser::{FlagSet, RegisterError};

/// Why a built-in kind could not be registered.
#[derive(Debug)]
pub(crate) enum DispatchError {
    Unsupported,
    BadDefault(ParseValueError),
    Register(RegisterError),
}

impl From<ParseValueError> for DispatchError {
    fn from(error: ParseValueError) -> Self {
        DispatchError::BadDefault(error)
    }
}

impl From<RegisterError> for DispatchError {
    fn from(error: RegisterError) -> Self {
        DispatchError::Register(error)
    }
}

/// Parse `default_string` for the kind, then register the kind's storage under `name`.
/// An empty default is the kind's zero value.
pub(crate) fn by_kind<'a>(
    kind: Kind<'a>,
    flags: &mut FlagSet<'a>,
    name: &str,
    default_string: &str,
    description: &str,
) -> Result<(), DispatchError> {
    match kind {
        Kind::Duration(variable) => {
            flags.duration_var(variable, name, default_duration(default_string)?, description)?
        }
        Kind::String(variable) => flags.string_var(variable, name, default_string, description)?,
        Kind::Bool(variable) => {
            flags.bool_var(variable, name, default_bool(default_string)?, description)?
        }
        Kind::Int(variable) => {
            flags.int_var(variable, name, default_int(default_string)?, description)?
        }
        Kind::Int64(variable) => {
            flags.int64_var(variable, name, default_int64(default_string)?, description)?
        }
        Kind::Uint(variable) => {
            flags.uint_var(variable, name, default_uint(default_string)?, description)?
        }
        Kind::Uint64(variable) => {
            flags.uint64_var(variable, name, default_uint64(default_string)?, description)?
        }
        Kind::Float64(variable) => {
            flags.float64_var(variable, name, default_float64(default_string)?, description)?
        }
        Kind::Unsupported => return Err(DispatchError::Unsupported),
    }

    Ok(())
}
