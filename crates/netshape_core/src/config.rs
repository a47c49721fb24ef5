//! Reconciliation and export configuration.

/// Precision bounds for matching link endpoints against existing nodes.
///
/// Lookup tries the exact coordinate first, then rounds to
/// `max_decimals`, `max_decimals - 1`, ... down to `min_decimals`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchPolicy {
    /// Highest precision tried after the exact lookup.
    pub max_decimals: u32,
    /// Lowest precision tried before giving up.
    pub min_decimals: u32,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            max_decimals: 12,
            min_decimals: 1,
        }
    }
}

impl MatchPolicy {
    /// Creates the default policy (12 down to 1 decimals).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact matches only.
    #[must_use]
    pub const fn exact_only() -> Self {
        Self {
            max_decimals: 0,
            min_decimals: 1,
        }
    }

    /// Sets the highest precision tried.
    #[must_use]
    pub const fn max_decimals(mut self, value: u32) -> Self {
        self.max_decimals = value;
        self
    }

    /// Sets the lowest precision tried.
    #[must_use]
    pub const fn min_decimals(mut self, value: u32) -> Self {
        self.min_decimals = value;
        self
    }

    /// Rounding levels in the order they are tried. Empty if the bounds are
    /// inverted.
    pub fn levels(&self) -> impl Iterator<Item = u32> {
        (self.min_decimals..=self.max_decimals).rev()
    }
}

/// Export schema settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaConfig {
    /// Maximum length of a field identifier in the output format.
    pub field_name_limit: usize,
    /// Class label for nodes without type tags.
    pub generic_node_label: String,
    /// Class label for links without type tags.
    pub generic_link_label: String,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            field_name_limit: 10,
            generic_node_label: "Generic node".to_string(),
            generic_link_label: "Generic link".to_string(),
        }
    }
}

impl SchemaConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field identifier length limit.
    #[must_use]
    pub fn field_name_limit(mut self, limit: usize) -> Self {
        self.field_name_limit = limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_levels() {
        let levels: Vec<_> = MatchPolicy::default().levels().collect();
        assert_eq!(levels.first(), Some(&12));
        assert_eq!(levels.last(), Some(&1));
        assert_eq!(levels.len(), 12);
    }

    #[test]
    fn exact_only_has_no_levels() {
        assert_eq!(MatchPolicy::exact_only().levels().count(), 0);
    }

    #[test]
    fn builder_pattern() {
        let policy = MatchPolicy::new().max_decimals(6).min_decimals(3);
        assert_eq!(policy.levels().collect::<Vec<_>>(), vec![6, 5, 4, 3]);

        let schema = SchemaConfig::new().field_name_limit(8);
        assert_eq!(schema.field_name_limit, 8);
        assert_eq!(schema.generic_node_label, "Generic node");
    }
}
