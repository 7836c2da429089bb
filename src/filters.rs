//! Filter sets and the query parameters built from them
//!
//! A [`FilterSet`] keeps its fields in insertion order. That order drives both
//! the query string sent to the API and the cache key derived from it.

use shared::QueryPairs;
use std::fmt;

/// Primitive value of a single filter field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FilterValue {
    Int(i64),
    Text(String),
    Bool(bool),
    /// Field is present but carries no value; never sent as a parameter.
    Absent,
}

impl FilterValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, FilterValue::Absent)
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Int(v) => write!(f, "{}", v),
            FilterValue::Text(v) => f.write_str(v),
            FilterValue::Bool(v) => write!(f, "{}", v),
            FilterValue::Absent => Ok(()),
        }
    }
}

impl From<i64> for FilterValue {
    fn from(v: i64) -> Self {
        FilterValue::Int(v)
    }
}

impl From<i32> for FilterValue {
    fn from(v: i32) -> Self {
        FilterValue::Int(v.into())
    }
}

impl From<u32> for FilterValue {
    fn from(v: u32) -> Self {
        FilterValue::Int(v.into())
    }
}

impl From<bool> for FilterValue {
    fn from(v: bool) -> Self {
        FilterValue::Bool(v)
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        FilterValue::Text(v)
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        FilterValue::Text(v.to_string())
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(FilterValue::Absent)
    }
}

/// Ordered mapping of filter names to primitive values
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FilterSet {
    fields: Vec<(String, FilterValue)>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`FilterSet::set`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Sets a field. An existing field keeps its position and takes the new value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FilterValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FilterValue> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Query-string parameters built from a [`FilterSet`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: QueryPairs,
}

impl QueryParams {
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// One `(name, value)` pair per field, in field order. Absent fields are skipped.
pub fn build_params(filters: &FilterSet) -> QueryParams {
    let pairs = filters
        .fields()
        .filter(|(_, value)| !value.is_absent())
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();

    QueryParams { pairs }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_follow_field_order() {
        let filters = FilterSet::new()
            .with("pageNumber", 2)
            .with("pageSize", 5)
            .with("orderBy", "created")
            .with("online", true);

        let params = build_params(&filters);
        assert_eq!(
            params.pairs(),
            &[
                ("pageNumber".to_string(), "2".to_string()),
                ("pageSize".to_string(), "5".to_string()),
                ("orderBy".to_string(), "created".to_string()),
                ("online".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_absent_values_are_not_sent() {
        let filters = FilterSet::new()
            .with("gender", None::<String>)
            .with("pageNumber", 1);

        let params = build_params(&filters);
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("gender"), None);
        assert_eq!(params.get("pageNumber"), Some("1"));
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut filters = FilterSet::new().with("pageNumber", 1).with("pageSize", 5);
        filters.set("pageNumber", 3);

        let names: Vec<&str> = filters.fields().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["pageNumber", "pageSize"]);
        assert_eq!(filters.get("pageNumber"), Some(&FilterValue::Int(3)));
    }
}
