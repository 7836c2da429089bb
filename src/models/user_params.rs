use crate::filters::FilterSet;
use serde::{Deserialize, Serialize};
use shared::User;

pub const DEFAULT_MIN_AGE: u32 = 18;
pub const DEFAULT_MAX_AGE: u32 = 99;
pub const DEFAULT_PAGE_SIZE: u32 = 5;
pub const DEFAULT_ORDER_BY: &str = "lastActive";

/// Member list filters for the current user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserParams {
    pub min_age: u32,
    pub max_age: u32,
    pub page_number: u32,
    pub page_size: u32,
    pub order_by: String,
    pub gender: Option<String>,
}

impl Default for UserParams {
    fn default() -> Self {
        Self {
            min_age: DEFAULT_MIN_AGE,
            max_age: DEFAULT_MAX_AGE,
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
            order_by: DEFAULT_ORDER_BY.to_string(),
            gender: None,
        }
    }
}

impl UserParams {
    /// Defaults for `user`: browse the opposite gender.
    pub fn for_user(user: &User) -> Self {
        let gender = match user.gender.as_deref() {
            Some("female") => "male",
            _ => "female",
        };

        Self {
            gender: Some(gender.to_string()),
            ..Self::default()
        }
    }

    /// Defaults for an optional user; no gender filter without one.
    pub fn for_session(user: Option<&User>) -> Self {
        user.map(Self::for_user).unwrap_or_default()
    }

    /// Fields in the order they are sent and keyed.
    pub fn to_filter_set(&self) -> FilterSet {
        FilterSet::new()
            .with("minAge", self.min_age)
            .with("maxAge", self.max_age)
            .with("pageNumber", self.page_number)
            .with("pageSize", self.page_size)
            .with("orderBy", self.order_by.as_str())
            .with("gender", self.gender.clone())
    }
}

impl From<&UserParams> for FilterSet {
    fn from(params: &UserParams) -> Self {
        params.to_filter_set()
    }
}

/// Filters for the likes listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikesParams {
    pub predicate: String,
    pub page_number: u32,
    pub page_size: u32,
}

impl LikesParams {
    pub fn new(predicate: impl Into<String>, page_number: u32, page_size: u32) -> Self {
        Self {
            predicate: predicate.into(),
            page_number,
            page_size,
        }
    }

    pub fn to_filter_set(&self) -> FilterSet {
        FilterSet::new()
            .with("pageNumber", self.page_number)
            .with("pageSize", self.page_size)
            .with("predicate", self.predicate.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache_key::CacheKey;
    use crate::filters::build_params;

    fn user(gender: Option<&str>) -> User {
        User {
            username: "lisa".into(),
            token: "token".into(),
            photo_url: None,
            known_as: Some("Lisa".into()),
            gender: gender.map(str::to_string),
        }
    }

    #[test]
    fn test_defaults_target_opposite_gender() {
        assert_eq!(UserParams::for_user(&user(Some("female"))).gender.as_deref(), Some("male"));
        assert_eq!(UserParams::for_user(&user(Some("male"))).gender.as_deref(), Some("female"));
        assert_eq!(UserParams::for_user(&user(None)).gender.as_deref(), Some("female"));
        assert_eq!(UserParams::for_session(None).gender, None);
    }

    #[test]
    fn test_cache_key_follows_field_order() {
        let params = UserParams::for_user(&user(Some("male")));
        assert_eq!(
            CacheKey::from_filters(&params.to_filter_set()).as_str(),
            "18-99-1-5-lastActive-female"
        );
    }

    #[test]
    fn test_likes_params_order() {
        let params = build_params(&LikesParams::new("liked", 2, 10).to_filter_set());
        let names: Vec<&str> = params.pairs().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["pageNumber", "pageSize", "predicate"]);
        assert_eq!(params.get("predicate"), Some("liked"));
    }
}
