//! Course identifier → human-readable label lookup.

use std::collections::HashMap;

/// Label returned for course identifiers absent from the catalog.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Best-effort mapping from course id to label.
///
/// Lookups never fail: a missing id resolves to [`UNKNOWN_LABEL`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseCatalog {
    labels: HashMap<String, String>,
}

impl CourseCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from `(id, label)` pairs. The first label seen for an
    /// id wins; later duplicates are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut labels = HashMap::new();
        for (id, label) in pairs {
            labels.entry(id.into()).or_insert_with(|| label.into());
        }
        Self { labels }
    }

    /// Resolve a course label, falling back to [`UNKNOWN_LABEL`].
    #[must_use]
    pub fn label(&self, id: &str) -> &str {
        self.labels.get(id).map_or(UNKNOWN_LABEL, String::as_str)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.labels.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of the given ids that have a catalog entry.
    pub fn coverage_of<'a>(&self, ids: impl IntoIterator<Item = &'a String>) -> usize {
        ids.into_iter().filter(|id| self.contains(id)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_id_resolves_to_unknown() {
        let catalog = CourseCatalog::from_pairs([("C001", "Linear Algebra")]);
        assert_eq!(catalog.label("C001"), "Linear Algebra");
        assert_eq!(catalog.label("C999"), UNKNOWN_LABEL);
        assert_eq!(CourseCatalog::new().label(""), "Unknown");
    }

    #[test]
    fn first_label_wins_on_duplicates() {
        let catalog = CourseCatalog::from_pairs([("C001", "first"), ("C001", "second")]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.label("C001"), "first");
    }

    #[test]
    fn coverage_counts_known_ids() {
        let catalog = CourseCatalog::from_pairs([("a", "A"), ("b", "B")]);
        let ids = vec!["a".to_string(), "x".to_string(), "b".to_string()];
        assert_eq!(catalog.coverage_of(&ids), 2);
    }
}
