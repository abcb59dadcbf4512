//! `flagtag` turns the fields of a configuration struct into command line flags.
//!
//! Declare the configuration once, as a struct with tags, and `flagtag` registers one flag per field.
//! Each flag is bound to the storage of its field, so parsing the command line writes directly into the struct.
//! Specifically, `flagtag` attempts to prioritize the following design concerns:
//! * *Single declaration*:
//! The name, default value, and description of a flag live beside the field it configures.
//! * *Capability driven registration*:
//! The field type decides how the flag reads its value, whether as a primitive literal, a duration, a text/binary encoding, or a nested struct.
//! * *Fail fast configuration errors*:
//! An invalid default or an unsupported field type is reported at registration, naming the full path of the offending field.
//!
//! # Usage
//! via [derive Api](./derive/index.html):
//! ```no_run
#![doc = include_str!("../demos/demo_server.rs")]
//! ```
//!
//! # Builder Api
//! The derive Api generates implementations of the [`prelude::Flags`] and [`prelude::Reflect`] traits.
//! Both may be written by hand:
//! * [`prelude::Flags::fields`] lists the fields of a struct as [`Field`]s, in declaration order.
//! Each pairs a [`FieldDescriptor`] (name, type, tags, visibility, embedding) with the field's storage.
//! * [`prelude::Reflect`] reports the capabilities of a field type.
//! Use the [`reflect!`] macro to declare the capability of a [`prelude::Value`], [`prelude::TextMarshaler`], or [`prelude::BinaryMarshaler`] type.
//!
//! Register the flags of a struct with one of:
//! * [`make_flags`]: tag keys `default`, `desc`, `name`, `ignored` (see [`DEFAULT_TAGS_NAMING`]).
//! * [`make_flags_envconfig`]: as above, but the name is read from `envconfig` (see [`ENVCONFIG_TAGS_NAMING`]).
//! * [`make_flags_with_custom_tags`]: any tag keys (see [`TagsSettings`]).
//!
//! Each returns a [`FlagSet`], which parses the command line (`-name value`, `-name=value`, or `-name` for booleans).
//! The set borrows the struct; drop it to read the parsed configuration.
//!
//! ### Flag Names
//! A flag is named after its field, lower-cased (ex: `MaxRetries` is `maxretries`), unless the name tag overrides it.
//! The fields of a nested struct are prefixed by the nested field's name (ex: `tls.cert`).
//! The fields of an embedded struct (`#[flag(embed)]`) take no additional prefix.
//!
//! ### Errors
//! Registration stops at the first failure, returning a [`MakeError`].
//! Failures inside a nested struct are wrapped in [`MakeError::InField`], once per level of nesting.
//! Use [`MakeError::innermost`] or [`MakeError::incorrect_default`] to reach the original cause.
//! Nesting deeper than [`MAX_DEPTH`] (ex: a struct which contains an `Option<Box<Self>>`) fails with [`MakeError::TooDeep`].
//!
//! # Features
//! * `chrono` (default): [`prelude::TextMarshaler`] support for `chrono::DateTime<FixedOffset>`, `chrono::DateTime<Utc>` and `chrono::NaiveDate`.
//! * `tracing_debug`: emit debug logs of the registration walk via `tracing`.
pub mod derive;
pub use flagtag_builder::*;
