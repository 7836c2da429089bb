//! Cache key generation for member list pages

use crate::filters::FilterSet;
use std::fmt;

/// Separator between serialized filter values.
pub const KEY_DELIMITER: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Joins every field value with `-`, in field order.
    ///
    /// Absent values still occupy a segment (as an empty string) so that
    /// `{a: None, b: 1}` and `{a: 1, b: None}` stay distinct.
    pub fn from_filters(filters: &FilterSet) -> Self {
        let segments: Vec<String> = filters.fields().map(|(_, value)| value.to_string()).collect();
        CacheKey(segments.join(KEY_DELIMITER))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&FilterSet> for CacheKey {
    fn from(filters: &FilterSet) -> Self {
        CacheKey::from_filters(filters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_filters_key() {
        let filters = FilterSet::new().with("pageNumber", 1).with("pageSize", 5);
        assert_eq!(CacheKey::from_filters(&filters).as_str(), "1-5");
    }

    #[test]
    fn test_equal_values_give_equal_keys() {
        let a = FilterSet::new().with("minAge", 18).with("gender", "female");
        let b = FilterSet::new().with("minAge", 18).with("gender", "female");
        assert_eq!(CacheKey::from(&a), CacheKey::from(&b));
    }

    #[test]
    fn test_different_values_give_different_keys() {
        let a = FilterSet::new().with("minAge", 18).with("maxAge", 99);
        let b = FilterSet::new().with("minAge", 18).with("maxAge", 98);
        assert_ne!(CacheKey::from(&a), CacheKey::from(&b));
    }

    #[test]
    fn test_absent_values_keep_their_slot() {
        let a = FilterSet::new().with("a", None::<i64>).with("b", 1);
        let b = FilterSet::new().with("a", 1).with("b", None::<i64>);
        assert_eq!(CacheKey::from(&a).as_str(), "-1");
        assert_eq!(CacheKey::from(&b).as_str(), "1-");
        assert_ne!(CacheKey::from(&a), CacheKey::from(&b));
    }
}
