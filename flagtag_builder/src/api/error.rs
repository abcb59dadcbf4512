use thiserror::Error;

use crate::model::BoxError;
use crate::parser::RegisterError;

/// The deepest structure nesting the walker descends into.
///
/// Recursive definitions (ex: `next: Option<Box<Self>>`) allocate a new level on every visit, so they fail at this depth instead of overflowing the stack.
pub const MAX_DEPTH: usize = 64;

/// A tag supplied default that cannot be converted to the field's type.
#[derive(Debug, Error)]
#[error("can't set default value {value:?} for field {field} type {type_name}: {reason}")]
pub struct IncorrectDefaultValue {
    /// The field identifier.
    pub field: String,
    /// The field type.
    pub type_name: String,
    /// The offending default.
    pub value: String,
    /// Why the conversion failed.
    #[source]
    pub reason: BoxError,
}

/// Failure to make the flags of a structure.
#[derive(Debug, Error)]
pub enum MakeError {
    /// See [`IncorrectDefaultValue`].
    #[error(transparent)]
    IncorrectDefaultValue(#[from] IncorrectDefaultValue),
    /// The field has none of the capabilities the walker can register.
    #[error("field {field} has unsupported type {type_name}, type should implement Value, TextMarshaler, BinaryMarshaler, Flags or be bool, (u)int(64), String, f64, Duration")]
    UnsupportedType {
        /// The field identifier.
        field: String,
        /// The field type.
        type_name: String,
    },
    /// A failure inside a nested structure.
    #[error("in field {field} with type {type_name}: {source}")]
    InField {
        /// The identifier of the field holding the nested structure.
        field: String,
        /// The nested structure type.
        type_name: String,
        /// The nested failure.
        source: Box<MakeError>,
    },
    /// The registrar refused the flag.
    #[error(transparent)]
    Register(#[from] RegisterError),
    /// The nesting exceeds [`MAX_DEPTH`].
    #[error("field {field} is nested {depth} structures deep, which exceeds the maximum of {max}", max = MAX_DEPTH)]
    TooDeep {
        /// The field identifier.
        field: String,
        /// The nesting depth of the field.
        depth: usize,
    },
}

impl MakeError {
    /// The error beneath every [`MakeError::InField`] wrapper.
    pub fn innermost(&self) -> &MakeError {
        let mut current = self;

        while let MakeError::InField { source, .. } = current {
            current = &**source;
        }

        current
    }

    /// The [`IncorrectDefaultValue`], if that is the innermost error.
    pub fn incorrect_default(&self) -> Option<&IncorrectDefaultValue> {
        match self.innermost() {
            MakeError::IncorrectDefaultValue(error) => Some(error),
            _ => None,
        }
    }

    /// The path of field identifiers leading to the innermost error (ex: `["outer", "inner"]`).
    pub fn field_path(&self) -> Vec<&str> {
        let mut path = Vec::default();
        let mut current = self;

        loop {
            match current {
                MakeError::InField { field, source, .. } => {
                    path.push(field.as_str());
                    current = &**source;
                }
                MakeError::IncorrectDefaultValue(error) => {
                    path.push(error.field.as_str());
                    break;
                }
                MakeError::UnsupportedType { field, .. } | MakeError::TooDeep { field, .. } => {
                    path.push(field.as_str());
                    break;
                }
                MakeError::Register(_) => break,
            }
        }

        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn incorrect() -> MakeError {
        MakeError::IncorrectDefaultValue(IncorrectDefaultValue {
            field: "width".to_string(),
            type_name: "isize".to_string(),
            value: "abc".to_string(),
            reason: "invalid syntax".into(),
        })
    }

    #[test]
    fn incorrect_default_message() {
        // Setup
        let error = incorrect();

        // Execute
        let message = error.to_string();

        // Verify
        assert_eq!(
            message,
            r#"can't set default value "abc" for field width type isize: invalid syntax"#
        );
        assert_eq!(error.source().unwrap().to_string(), "invalid syntax");
    }

    #[test]
    fn in_field_wrapping() {
        // Setup
        let inner = MakeError::InField {
            field: "Inner".to_string(),
            type_name: "Inner".to_string(),
            source: Box::new(incorrect()),
        };
        let error = MakeError::InField {
            field: "Outer".to_string(),
            type_name: "Outer".to_string(),
            source: Box::new(inner),
        };

        // Execute
        let message = error.to_string();

        // Verify
        assert_eq!(
            message,
            r#"in field Outer with type Outer: in field Inner with type Inner: can't set default value "abc" for field width type isize: invalid syntax"#
        );
        assert_eq!(error.incorrect_default().unwrap().value, "abc");
        assert_matches!(error.innermost(), MakeError::IncorrectDefaultValue(_));
        assert_eq!(error.field_path(), vec!["Outer", "Inner", "width"]);
        assert!(error.source().is_some());
    }

    #[test]
    fn unsupported_type() {
        let error = MakeError::UnsupportedType {
            field: "ratio".to_string(),
            type_name: "f32".to_string(),
        };
        assert!(error.to_string().starts_with("field ratio has unsupported type f32"));
        assert!(error.incorrect_default().is_none());
        assert_eq!(error.field_path(), vec!["ratio"]);
    }
}
