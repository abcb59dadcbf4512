/// The error type produced by user supplied conversions (ex: [`crate::prelude::Value::set`]).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The `key = "value"` metadata attached to a field via `#[flag(..)]`.
///
/// Keys may repeat; lookups see the first occurrence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tags(&'static [(&'static str, &'static str)]);

impl Tags {
    /// Create tags from `(key, value)` pairs, in declaration order.
    pub const fn new(pairs: &'static [(&'static str, &'static str)]) -> Self {
        Self(pairs)
    }

    /// The value for `key`, distinguishing an absent tag (`None`) from an empty one (`Some("")`).
    pub fn lookup(&self, key: &str) -> Option<&'static str> {
        self.0
            .iter()
            .find(|(candidate, _)| *candidate == key)
            .map(|(_, value)| *value)
    }

    /// The value for `key`, or the empty string when absent.
    pub fn get(&self, key: &str) -> &'static str {
        self.lookup(key).unwrap_or_default()
    }

    /// The `(key, value)` pairs.
    pub fn pairs(&self) -> &'static [(&'static str, &'static str)] {
        self.0
    }
}

/// The static shape of a struct field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// The field identifier (ex: `max_retries`).
    pub name: &'static str,
    /// The declared type of the field.
    pub type_name: &'static str,
    /// The `#[flag(..)]` tags on the field.
    pub tags: Tags,
    /// Whether the field is visible outside its struct (`pub`).
    /// Private fields are never turned into flags.
    pub exported: bool,
    /// Whether the field is embedded (`#[flag(embed)]`); embedded struct members flatten into the parent namespace.
    pub embedded: bool,
}

impl FieldDescriptor {
    /// Describe an exported, non-embedded, untagged field.
    pub const fn new(name: &'static str, type_name: &'static str) -> Self {
        Self {
            name,
            type_name,
            tags: Tags::new(&[]),
            exported: true,
            embedded: false,
        }
    }

    /// Set the tags.
    pub const fn tags(mut self, pairs: &'static [(&'static str, &'static str)]) -> Self {
        self.tags = Tags::new(pairs);
        self
    }

    /// Mark as private.
    pub const fn private(mut self) -> Self {
        self.exported = false;
        self
    }

    /// Mark as embedded.
    pub const fn embedded(mut self) -> Self {
        self.embedded = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_absent_vs_empty() {
        // Setup
        let tags = Tags::new(&[("name", ""), ("default", "5")]);

        // Execute & verify
        assert_eq!(tags.lookup("name"), Some(""));
        assert_eq!(tags.lookup("desc"), None);
        assert_eq!(tags.get("desc"), "");
        assert_eq!(tags.get("default"), "5");
    }

    #[test]
    fn lookup_first_wins() {
        let tags = Tags::new(&[("default", "1"), ("default", "2")]);
        assert_eq!(tags.lookup("default"), Some("1"));
        assert_eq!(tags.pairs().len(), 2);
    }

    #[test]
    fn descriptor_builder() {
        // Execute
        let descriptor = FieldDescriptor::new("inner", "Inner")
            .tags(&[("desc", "the inner")])
            .private()
            .embedded();

        // Verify
        assert_eq!(descriptor.name, "inner");
        assert_eq!(descriptor.type_name, "Inner");
        assert_eq!(descriptor.tags.get("desc"), "the inner");
        assert!(!descriptor.exported);
        assert!(descriptor.embedded);
    }
}
