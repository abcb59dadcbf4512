//! Derive Api for `flagtag` configuration.
//!
//! ### Getting Started
//! Instrument a configuration struct `S` with `#[derive(Flags)]`.
//! This generates the [`crate::prelude::Flags`] and [`crate::prelude::Reflect`] implementations which let [`crate::make_flags`] walk `S`.
//! Each `pub` field of `S` becomes a flag bound to that field.
//!
//! ```no_run
#![doc = include_str!("../demos/demo_server.rs")]
//! ```
//!
//! This generates the following flags:
//! ```console
//! $ demo_server -h
//!   -addr SocketAddr
//!     	SocketAddr the address to listen on (default 127.0.0.1:8080)
//!   -retries value
//!     	attempts per request (default 3)
//!   -timeout value
//!     	per request (default 30s)
//!   -tls.cert value
//!     	certificate file (default )
//!   -verbose
//!     	 (default false)
//!
//! $ demo_server -retries 5 -tls.cert server.pem
//! Listening on 127.0.0.1:8080 (retries: 5, timeout: 30s, verbose: false).
//!
//! $ demo_server -retries many
//! invalid value "many" for flag -retries: parsing "many": invalid syntax
//! ```
//!
//! Only `addr` is annotated with its type: the back-quoted type prefix applies to flags registered through a marshaler or [`crate::prelude::Value`].
//!
//! ### Field Configuration
//! Fields are configured with `#[flag(..)]`, which takes `key = "value"` tags and the `embed` marker.
//! Multiple `#[flag(..)]` attributes on one field accumulate.
//! ```console
//! Tag                  | Effect
//! -----------------------------------------------------------------------------------------
//! default = "v"        | The default value, parsed per the field type.
//! desc = "text"        | The flag usage, prefixed by `Type` unless it contains a back-quote.
//! name = "n"           | The flag name (even when empty), instead of the lower-cased identifier.
//! ignored = "true"     | Exclude the field; any other value has no effect.
//! embed                | Flatten the nested struct's flags into the enclosing namespace.
//! ```
//!
//! The tag keys above are those of [`crate::DEFAULT_TAGS_NAMING`].
//! [`crate::make_flags_envconfig`] reads the name from `envconfig` instead, while [`crate::make_flags_with_custom_tags`] reads any keys.
//!
//! ### Field Types
//! The field type decides how the flag is registered, in this order of precedence:
//! ```console
//! Capability                                        | Flag
//! -----------------------------------------------------------------------------------------
//! Value                                             | the value itself
//! TextMarshaler (ex: IpAddr, chrono::DateTime)      | marshal/unmarshal via text
//! BinaryMarshaler (ex: SocketAddr)                  | marshal/unmarshal via bytes
//! Flags (ex: #[derive(Flags)] struct)               | one flag per nested field, as `field.nested`
//! Duration                                          | duration literal (ex: `1h30m`)
//! String, bool, isize, i64, usize, u64, f64         | the primitive literal
//! ```
//! `Option<T>` allocates `T::default()` when first walked, `Box<T>` behaves as `T`, and [`crate::LateBound`] walks whichever variable the caller binds to it.
//! Any other type (ex: `f32`, `Vec<T>`) fails with [`crate::MakeError::UnsupportedType`], unless it is ignored or private.
//!
//! ### Errors
//! The derive rejects enums, unions, tuple structs, non-string tag values and unknown markers at compile time:
//! ```compile_fail
//! use flagtag::derive::*;
//!
//! #[derive(Flags)]
//! struct Pair(pub usize, pub usize);
//! ```
//!
//! ```compile_fail
//! use flagtag::derive::*;
//!
//! #[derive(Flags)]
//! struct Config {
//!     #[flag(default = 3)]
//!     pub retries: usize,
//! }
//! ```
pub use flagtag_derive::*;
