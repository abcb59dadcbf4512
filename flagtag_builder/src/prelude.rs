//! Traits which, typically, may be imported without concern: `use flagtag::prelude::*`.
use std::fmt::Display;

use crate::api::{Field, Kind};
use crate::model::BoxError;

/// A value that reads itself from, and renders itself to, a string.
///
/// This is the native "settable" capability; the [`crate::FlagSet`] stores every flag as a `Value`.
/// `Display` must render a string which `set` accepts.
pub trait Value: Display {
    /// Replace the value with one parsed from `input`.
    fn set(&mut self, input: &str) -> Result<(), BoxError>;

    /// Whether the flag may be specified without a value (ex: `-verbose`), implying `true`.
    fn is_bool_flag(&self) -> bool {
        false
    }
}

impl<V: Value + ?Sized> Value for &mut V {
    fn set(&mut self, input: &str) -> Result<(), BoxError> {
        (**self).set(input)
    }

    fn is_bool_flag(&self) -> bool {
        (**self).is_bool_flag()
    }
}

/// A value with a textual encoding.
pub trait TextMarshaler {
    /// Encode as text.
    fn marshal_text(&self) -> Result<String, BoxError>;

    /// Replace the value with one decoded from `text`.
    fn unmarshal_text(&mut self, text: &str) -> Result<(), BoxError>;
}

/// A value with a binary encoding.
pub trait BinaryMarshaler {
    /// Encode as bytes.
    fn marshal_binary(&self) -> Result<Vec<u8>, BoxError>;

    /// Replace the value with one decoded from `data`.
    fn unmarshal_binary(&mut self, data: &[u8]) -> Result<(), BoxError>;
}

/// A structure whose fields may be walked.
///
/// Implement via `#[derive(Flags)]`.
pub trait Flags {
    /// The fields in declaration order, each paired with its storage.
    fn fields(&mut self) -> Vec<Field<'_>>;
}

/// Run-time capabilities of a field type.
///
/// The walker probes these in order: [`Reflect::as_value`], [`Reflect::as_text`], [`Reflect::as_binary`],
/// [`Reflect::as_flags`], then [`Reflect::kind`].
/// The first capability present decides how the field becomes a flag.
/// Every method defaults to "not capable".
///
/// See [`crate::reflect`] for declaring a type's capabilities in one line.
pub trait Reflect {
    /// The name of the type, as shown in flag usage.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Access as a natively settable [`Value`].
    fn as_value(&mut self) -> Option<&mut dyn Value> {
        None
    }

    /// Access as a [`TextMarshaler`].
    fn as_text(&mut self) -> Option<&mut dyn TextMarshaler> {
        None
    }

    /// Access as a [`BinaryMarshaler`].
    fn as_binary(&mut self) -> Option<&mut dyn BinaryMarshaler> {
        None
    }

    /// Access as a nested structure.
    fn as_flags(&mut self) -> Option<&mut dyn Flags> {
        None
    }

    /// Access as a built-in kind.
    fn kind(&mut self) -> Kind<'_> {
        Kind::Unsupported
    }
}
