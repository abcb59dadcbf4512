use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

use crate::model::{BoxError, FieldDescriptor};
use crate::prelude::*;

/// The built-in kinds a field may be registered as, each bound to the field's storage.
#[derive(Debug)]
pub enum Kind<'a> {
    /// `String`.
    String(&'a mut String),
    /// `bool`.
    Bool(&'a mut bool),
    /// `isize`, the platform integer.
    Int(&'a mut isize),
    /// `i64`.
    Int64(&'a mut i64),
    /// `usize`, the platform unsigned integer.
    Uint(&'a mut usize),
    /// `u64`.
    Uint64(&'a mut u64),
    /// `f64`.
    Float64(&'a mut f64),
    /// [`std::time::Duration`].
    Duration(&'a mut Duration),
    /// None of the above.
    Unsupported,
}

/// A field of a [`Flags`] structure: its descriptor paired with its storage.
///
/// The storage is absent when the field's type does not implement [`Reflect`].
pub struct Field<'a> {
    /// The static shape of the field.
    pub descriptor: FieldDescriptor,
    /// The field's storage.
    pub slot: Option<&'a mut dyn Reflect>,
}

impl<'a> Field<'a> {
    /// Pair a descriptor with a (possibly absent) storage slot.
    pub fn new(descriptor: FieldDescriptor, slot: Option<&'a mut dyn Reflect>) -> Self {
        Self { descriptor, slot }
    }

    /// Pair a descriptor with the storage `target`.
    ///
    /// ### Example
    /// ```
    /// # use flagtag_builder as flagtag;
    /// use flagtag::{Field, FieldDescriptor};
    ///
    /// let mut width: isize = 0;
    /// let field = Field::bind(FieldDescriptor::new("width", "isize"), &mut width);
    /// assert!(field.slot.is_some());
    /// ```
    pub fn bind<T: Reflect + 'a>(descriptor: FieldDescriptor, target: &'a mut T) -> Self {
        Self::new(descriptor, Some(target))
    }

    /// A field whose type has no [`Reflect`] capabilities.
    pub fn opaque(descriptor: FieldDescriptor) -> Self {
        Self::new(descriptor, None)
    }
}

/// A field whose concrete type is decided by the caller at run-time.
///
/// Bind it to a variable before walking; the walker then treats the variable as if it were the field itself.
/// An unbound `LateBound` has no capabilities and fails registration as an unsupported type.
///
/// ### Example
/// ```
/// # use flagtag_builder as flagtag;
/// use flagtag::LateBound;
///
/// let mut port: usize = 0;
/// let late = LateBound::new(&mut port);
/// assert!(late.is_bound());
/// ```
#[derive(Default)]
pub struct LateBound<'a> {
    target: Option<&'a mut dyn Reflect>,
}

impl<'a> LateBound<'a> {
    /// Bind to `target`.
    pub fn new<T: Reflect + 'a>(target: &'a mut T) -> Self {
        Self {
            target: Some(target),
        }
    }

    /// An unbound value.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether a target is bound.
    pub fn is_bound(&self) -> bool {
        self.target.is_some()
    }
}

impl Reflect for LateBound<'_> {
    fn type_name(&self) -> &'static str {
        match &self.target {
            Some(target) => target.type_name(),
            None => std::any::type_name::<Self>(),
        }
    }

    fn as_value(&mut self) -> Option<&mut dyn Value> {
        self.target.as_deref_mut()?.as_value()
    }

    fn as_text(&mut self) -> Option<&mut dyn TextMarshaler> {
        self.target.as_deref_mut()?.as_text()
    }

    fn as_binary(&mut self) -> Option<&mut dyn BinaryMarshaler> {
        self.target.as_deref_mut()?.as_binary()
    }

    fn as_flags(&mut self) -> Option<&mut dyn Flags> {
        self.target.as_deref_mut()?.as_flags()
    }

    fn kind(&mut self) -> Kind<'_> {
        match self.target.as_deref_mut() {
            Some(target) => target.kind(),
            None => Kind::Unsupported,
        }
    }
}

// An `Option` is a lazily allocated field: any probe allocates the default before delegating.
impl<T: Reflect + Default> Reflect for Option<T> {
    fn type_name(&self) -> &'static str {
        match self {
            Some(inner) => inner.type_name(),
            None => std::any::type_name::<T>(),
        }
    }

    fn as_value(&mut self) -> Option<&mut dyn Value> {
        self.get_or_insert_with(T::default).as_value()
    }

    fn as_text(&mut self) -> Option<&mut dyn TextMarshaler> {
        self.get_or_insert_with(T::default).as_text()
    }

    fn as_binary(&mut self) -> Option<&mut dyn BinaryMarshaler> {
        self.get_or_insert_with(T::default).as_binary()
    }

    fn as_flags(&mut self) -> Option<&mut dyn Flags> {
        self.get_or_insert_with(T::default).as_flags()
    }

    fn kind(&mut self) -> Kind<'_> {
        self.get_or_insert_with(T::default).kind()
    }
}

impl<T: Reflect + ?Sized> Reflect for Box<T> {
    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }

    fn as_value(&mut self) -> Option<&mut dyn Value> {
        (**self).as_value()
    }

    fn as_text(&mut self) -> Option<&mut dyn TextMarshaler> {
        (**self).as_text()
    }

    fn as_binary(&mut self) -> Option<&mut dyn BinaryMarshaler> {
        (**self).as_binary()
    }

    fn as_flags(&mut self) -> Option<&mut dyn Flags> {
        (**self).as_flags()
    }

    fn kind(&mut self) -> Kind<'_> {
        (**self).kind()
    }
}

macro_rules! reflect_kind {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Reflect for $ty {
                fn kind(&mut self) -> Kind<'_> {
                    Kind::$variant(self)
                }
            }
        )*
    };
}

reflect_kind!(
    String => String,
    bool => Bool,
    isize => Int,
    i64 => Int64,
    usize => Uint,
    u64 => Uint64,
    f64 => Float64,
    Duration => Duration,
);

/// Declare the [`Reflect`] capability of types implementing [`Value`], [`TextMarshaler`], [`BinaryMarshaler`] or [`Flags`].
///
/// `#[derive(Flags)]` declares the [`Flags`] capability itself; use `flags` for hand written implementations.
///
/// ### Example
/// ```
/// # use flagtag_builder as flagtag;
/// use flagtag::prelude::*;
/// use flagtag::{reflect, BoxError};
///
/// #[derive(Default)]
/// struct Level(u8);
///
/// impl TextMarshaler for Level {
///     fn marshal_text(&self) -> Result<String, BoxError> {
///         Ok(self.0.to_string())
///     }
///
///     fn unmarshal_text(&mut self, text: &str) -> Result<(), BoxError> {
///         self.0 = text.parse()?;
///         Ok(())
///     }
/// }
///
/// reflect!(text Level);
///
/// let mut level = Level::default();
/// assert!(level.as_text().is_some());
/// assert!(level.as_value().is_none());
/// ```
#[macro_export]
macro_rules! reflect {
    (value $($ty:ty),+ $(,)?) => {
        $(
            impl $crate::prelude::Reflect for $ty {
                fn as_value(&mut self) -> ::core::option::Option<&mut dyn $crate::prelude::Value> {
                    ::core::option::Option::Some(self)
                }
            }
        )+
    };
    (text $($ty:ty),+ $(,)?) => {
        $(
            impl $crate::prelude::Reflect for $ty {
                fn as_text(&mut self) -> ::core::option::Option<&mut dyn $crate::prelude::TextMarshaler> {
                    ::core::option::Option::Some(self)
                }
            }
        )+
    };
    (binary $($ty:ty),+ $(,)?) => {
        $(
            impl $crate::prelude::Reflect for $ty {
                fn as_binary(&mut self) -> ::core::option::Option<&mut dyn $crate::prelude::BinaryMarshaler> {
                    ::core::option::Option::Some(self)
                }
            }
        )+
    };
    (flags $($ty:ty),+ $(,)?) => {
        $(
            impl $crate::prelude::Reflect for $ty {
                fn as_flags(&mut self) -> ::core::option::Option<&mut dyn $crate::prelude::Flags> {
                    ::core::option::Option::Some(self)
                }
            }
        )+
    };
}

macro_rules! text_via_str {
    ($($ty:ty),* $(,)?) => {
        $(
            impl TextMarshaler for $ty {
                fn marshal_text(&self) -> Result<String, BoxError> {
                    Ok(self.to_string())
                }

                fn unmarshal_text(&mut self, text: &str) -> Result<(), BoxError> {
                    *self = text.parse()?;
                    Ok(())
                }
            }
        )*
    };
}

text_via_str!(IpAddr, Ipv4Addr, Ipv6Addr);
reflect!(text IpAddr, Ipv4Addr, Ipv6Addr);

impl BinaryMarshaler for SocketAddr {
    fn marshal_binary(&self) -> Result<Vec<u8>, BoxError> {
        Ok(self.to_string().into_bytes())
    }

    fn unmarshal_binary(&mut self, data: &[u8]) -> Result<(), BoxError> {
        *self = std::str::from_utf8(data)?.parse()?;
        Ok(())
    }
}

reflect!(binary SocketAddr);

#[cfg(feature = "chrono")]
mod time {
    use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat, Utc};

    use crate::model::BoxError;
    use crate::prelude::TextMarshaler;

    impl TextMarshaler for DateTime<FixedOffset> {
        fn marshal_text(&self) -> Result<String, BoxError> {
            Ok(self.to_rfc3339_opts(SecondsFormat::AutoSi, true))
        }

        fn unmarshal_text(&mut self, text: &str) -> Result<(), BoxError> {
            *self = DateTime::parse_from_rfc3339(text)?;
            Ok(())
        }
    }

    impl TextMarshaler for DateTime<Utc> {
        fn marshal_text(&self) -> Result<String, BoxError> {
            Ok(self.to_rfc3339_opts(SecondsFormat::AutoSi, true))
        }

        fn unmarshal_text(&mut self, text: &str) -> Result<(), BoxError> {
            *self = DateTime::parse_from_rfc3339(text)?.with_timezone(&Utc);
            Ok(())
        }
    }

    impl TextMarshaler for NaiveDate {
        fn marshal_text(&self) -> Result<String, BoxError> {
            Ok(self.format("%Y-%m-%d").to_string())
        }

        fn unmarshal_text(&mut self, text: &str) -> Result<(), BoxError> {
            *self = NaiveDate::parse_from_str(text, "%Y-%m-%d")?;
            Ok(())
        }
    }

    crate::reflect!(text DateTime<FixedOffset>, DateTime<Utc>, NaiveDate);
}

/// Shorten a type name to its final path segments (ex: `alloc::string::String` to `String`).
///
/// Lifetimes are dropped, along with generic brackets left empty (ex: `a::Inner<'_>` to `Inner`).
pub(crate) fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment_start = 0;
    let mut chars = full.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\'' {
            while chars
                .peek()
                .is_some_and(|next| next.is_alphanumeric() || *next == '_')
            {
                chars.next();
            }

            if chars.peek() == Some(&',') {
                chars.next();
            }

            while chars.peek() == Some(&' ') {
                chars.next();
            }
        } else if c == ':' && chars.peek() == Some(&':') {
            chars.next();
            out.truncate(segment_start);
        } else {
            out.push(c);

            if !(c.is_alphanumeric() || c == '_') {
                segment_start = out.len();
            }
        }
    }

    out.replace("<>", "")
}
