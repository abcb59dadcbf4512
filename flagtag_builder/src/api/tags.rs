use crate::model::FieldDescriptor;

/// The tag keys consulted when turning a field into a flag.
///
/// ### Example
/// ```
/// # use flagtag_builder as flagtag;
/// use flagtag::{FieldDescriptor, TagsSettings};
///
/// let settings = TagsSettings::new("value", "help", "flag", "skip");
/// let field = FieldDescriptor::new("MaxRetries", "usize").tags(&[("flag", "retries"), ("value", "3")]);
/// assert_eq!(settings.name(&field), "retries");
/// assert_eq!(settings.default_string(&field), "3");
/// assert!(!settings.is_ignored(&field));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagsSettings {
    /// Key of the default value tag.
    pub default: &'static str,
    /// Key of the description tag.
    pub description: &'static str,
    /// Key of the tag which overrides the flag name.
    pub name_override: &'static str,
    /// Key of the tag which, when exactly `"true"`, excludes the field.
    pub ignored: &'static str,
}

/// Tag keys `default`, `desc`, `name` and `ignored`.
pub const DEFAULT_TAGS_NAMING: TagsSettings =
    TagsSettings::new("default", "desc", "name", "ignored");

/// As [`DEFAULT_TAGS_NAMING`], but the name override is read from `envconfig`.
pub const ENVCONFIG_TAGS_NAMING: TagsSettings =
    TagsSettings::new("default", "desc", "envconfig", "ignored");

const IGNORED_SENTINEL: &str = "true";

impl TagsSettings {
    /// Create custom settings.
    pub const fn new(
        default: &'static str,
        description: &'static str,
        name_override: &'static str,
        ignored: &'static str,
    ) -> Self {
        Self {
            default,
            description,
            name_override,
            ignored,
        }
    }

    /// The flag name of `field`, without any prefix.
    ///
    /// An override tag wins even when it is empty.
    pub fn name(&self, field: &FieldDescriptor) -> String {
        match field.tags.lookup(self.name_override) {
            Some(name) => name.to_string(),
            None => field.name.to_lowercase(),
        }
    }

    /// The default value of `field` as written in its tag; empty when absent.
    pub fn default_string(&self, field: &FieldDescriptor) -> &'static str {
        field.tags.get(self.default)
    }

    /// The description of `field`; empty when absent.
    pub fn description(&self, field: &FieldDescriptor) -> &'static str {
        field.tags.get(self.description)
    }

    /// Whether `field` is excluded from the walk.
    pub fn is_ignored(&self, field: &FieldDescriptor) -> bool {
        field.tags.get(self.ignored) == IGNORED_SENTINEL
    }
}

impl Default for TagsSettings {
    fn default() -> Self {
        DEFAULT_TAGS_NAMING
    }
}
