use crate::api::kind::{by_kind, DispatchError};
use crate::api::reflect::short_type_name;
use crate::api::{
    BinaryValue, Field, IncorrectDefaultValue, Kind, MakeError, TagsSettings, TextValue,
    DEFAULT_TAGS_NAMING, ENVCONFIG_TAGS_NAMING, MAX_DEPTH,
};
use crate::model::{BoxError, FieldDescriptor};
use crate::parser::{ErrorHandling, FlagSet};
use crate::prelude::*;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Make a flag for each field of `target`, using the [`DEFAULT_TAGS_NAMING`] tags.
///
/// Every flag is bound to its field, so parsing the returned set writes into `target`.
///
/// ### Example
/// ```
/// # use flagtag_builder as flagtag;
/// use flagtag::prelude::*;
/// use flagtag::{make_flags, ErrorHandling, Field, FieldDescriptor};
///
/// #[derive(Default)]
/// struct Config {
///     width: isize,
///     verbose: bool,
/// }
///
/// impl Flags for Config {
///     fn fields(&mut self) -> Vec<Field<'_>> {
///         vec![
///             Field::bind(
///                 FieldDescriptor::new("width", "isize").tags(&[("default", "80")]),
///                 &mut self.width,
///             ),
///             Field::bind(FieldDescriptor::new("verbose", "bool"), &mut self.verbose),
///         ]
///     }
/// }
///
/// let mut config = Config::default();
/// let mut flags = make_flags(&mut config, "demo", ErrorHandling::ContinueOnError).unwrap();
/// flags.parse(["-verbose"]).unwrap();
/// drop(flags);
///
/// assert_eq!(config.width, 80);
/// assert!(config.verbose);
/// ```
pub fn make_flags<'a>(
    target: &'a mut dyn Flags,
    name: impl Into<String>,
    error_handling: ErrorHandling,
) -> Result<FlagSet<'a>, MakeError> {
    make_flags_with_custom_tags(target, name, error_handling, DEFAULT_TAGS_NAMING)
}

/// Make a flag for each field of `target`, using the [`ENVCONFIG_TAGS_NAMING`] tags.
pub fn make_flags_envconfig<'a>(
    target: &'a mut dyn Flags,
    name: impl Into<String>,
    error_handling: ErrorHandling,
) -> Result<FlagSet<'a>, MakeError> {
    make_flags_with_custom_tags(target, name, error_handling, ENVCONFIG_TAGS_NAMING)
}

/// Make a flag for each field of `target`, reading the tags named in `settings`.
///
/// Fields are visited in declaration order; the first failure aborts the walk.
/// Per field:
/// * Private fields, and fields whose ignore tag is exactly `"true"`, are skipped.
/// * A [`Value`], [`TextMarshaler`] or [`BinaryMarshaler`] (in that order of precedence) is registered as is, after setting it from the default tag (if any).
/// Its description is prefixed with the back-quoted type name, unless it already contains a back-quote.
/// * A nested [`Flags`] structure is walked with the field's flag name as its prefix, or with the current prefix when embedded.
/// * A [`std::time::Duration`], `String`, `bool`, `isize`, `i64`, `usize`, `u64` or `f64` is registered with its default tag parsed (the empty string meaning zero).
/// * Anything else is a [`MakeError::UnsupportedType`].
pub fn make_flags_with_custom_tags<'a>(
    target: &'a mut dyn Flags,
    name: impl Into<String>,
    error_handling: ErrorHandling,
    settings: TagsSettings,
) -> Result<FlagSet<'a>, MakeError> {
    let mut flags = FlagSet::new(name, error_handling);
    fields_as_flags(target, &settings, "", &mut flags, 0)?;
    Ok(flags)
}

// The capability of a field, in order of precedence.
enum Slot<'a> {
    Value(&'a mut dyn Value),
    Text(&'a mut dyn TextMarshaler),
    Binary(&'a mut dyn BinaryMarshaler),
    Nested(&'a mut dyn Flags),
    Kind(Kind<'a>),
}

fn classify<'a>(slot: &'a mut dyn Reflect) -> Slot<'a> {
    // Each probe is repeated so that the returned borrow is taken unconditionally.
    if slot.as_value().is_some() {
        return slot
            .as_value()
            .map_or(Slot::Kind(Kind::Unsupported), Slot::Value);
    }

    if slot.as_text().is_some() {
        return slot
            .as_text()
            .map_or(Slot::Kind(Kind::Unsupported), Slot::Text);
    }

    if slot.as_binary().is_some() {
        return slot
            .as_binary()
            .map_or(Slot::Kind(Kind::Unsupported), Slot::Binary);
    }

    if slot.as_flags().is_some() {
        return slot
            .as_flags()
            .map_or(Slot::Kind(Kind::Unsupported), Slot::Nested);
    }

    Slot::Kind(slot.kind())
}

fn fields_as_flags<'a>(
    target: &'a mut dyn Flags,
    settings: &TagsSettings,
    prefix: &str,
    flags: &mut FlagSet<'a>,
    depth: usize,
) -> Result<(), MakeError> {
    for Field { descriptor, slot } in target.fields() {
        if !descriptor.exported || settings.is_ignored(&descriptor) {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Skipping field '{}'.", descriptor.name);
            }
            continue;
        }

        let mut name = settings.name(&descriptor);

        if !prefix.is_empty() {
            name = format!("{prefix}.{name}");
        }

        let slot = match slot {
            Some(slot) => slot,
            None => {
                return Err(MakeError::UnsupportedType {
                    field: descriptor.name.to_string(),
                    type_name: descriptor.type_name.to_string(),
                })
            }
        };
        let type_name = short_type_name(slot.type_name());
        let default_string = settings.default_string(&descriptor);
        let description = settings.description(&descriptor);

        match classify(slot) {
            Slot::Value(value) => {
                register_value(Box::new(value), &descriptor, &type_name, settings, name, flags)?
            }
            Slot::Text(text) => register_value(
                Box::new(TextValue::new(text)),
                &descriptor,
                &type_name,
                settings,
                name,
                flags,
            )?,
            Slot::Binary(binary) => register_value(
                Box::new(BinaryValue::new(binary)),
                &descriptor,
                &type_name,
                settings,
                name,
                flags,
            )?,
            Slot::Nested(nested) => {
                let prefix = if descriptor.embedded {
                    prefix.to_string()
                } else {
                    name
                };

                if depth + 1 > MAX_DEPTH {
                    return Err(MakeError::TooDeep {
                        field: descriptor.name.to_string(),
                        depth: depth + 1,
                    });
                }

                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Walking field '{}' with prefix '{prefix}'.", descriptor.name);
                }
                fields_as_flags(nested, settings, &prefix, flags, depth + 1).map_err(|error| {
                    MakeError::InField {
                        field: descriptor.name.to_string(),
                        type_name: type_name.clone(),
                        source: Box::new(error),
                    }
                })?;
            }
            Slot::Kind(kind) => {
                by_kind(kind, flags, &name, default_string, description).map_err(|error| {
                    match error {
                        DispatchError::Unsupported => MakeError::UnsupportedType {
                            field: descriptor.name.to_string(),
                            type_name: type_name.clone(),
                        },
                        DispatchError::BadDefault(reason) => {
                            incorrect_default(&descriptor, &type_name, default_string, reason.into())
                        }
                        DispatchError::Register(error) => MakeError::Register(error),
                    }
                })?;
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Registered field '{}' as '{name}'.", descriptor.name);
                }
            }
        }
    }

    Ok(())
}

fn register_value<'a>(
    mut value: Box<dyn Value + 'a>,
    descriptor: &FieldDescriptor,
    type_name: &str,
    settings: &TagsSettings,
    name: String,
    flags: &mut FlagSet<'a>,
) -> Result<(), MakeError> {
    let default_string = settings.default_string(descriptor);

    if !default_string.is_empty() {
        value
            .set(default_string)
            .map_err(|reason| incorrect_default(descriptor, type_name, default_string, reason))?;
    }

    let description = settings.description(descriptor);
    let usage = if description.contains('`') {
        description.to_string()
    } else {
        format!("`{type_name}` {description}")
    };

    #[cfg(feature = "tracing_debug")]
    {
        debug!("Registered field '{}' as '{name}' of `{type_name}`.", descriptor.name);
    }
    flags.var(value, name, usage)?;
    Ok(())
}

fn incorrect_default(
    descriptor: &FieldDescriptor,
    type_name: &str,
    value: &str,
    reason: BoxError,
) -> MakeError {
    MakeError::IncorrectDefaultValue(IncorrectDefaultValue {
        field: descriptor.name.to_string(),
        type_name: type_name.to_string(),
        value: value.to_string(),
        reason,
    })
}
