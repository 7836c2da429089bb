//! Data models exchanged with the dating API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: i64,
    pub url: String,
    #[serde(default)]
    pub is_main: bool,
}

/// Member profile, identified by its unique `username`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub known_as: Option<String>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_active: Option<DateTime<Utc>>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub introduction: Option<String>,
    #[serde(default)]
    pub looking_for: Option<String>,
    #[serde(default)]
    pub interests: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub photos: Vec<Photo>,
}

impl Member {
    pub fn main_photo(&self) -> Option<&Photo> {
        self.photos.iter().find(|p| p.is_main)
    }

    pub fn display_name(&self) -> &str {
        self.known_as.as_deref().unwrap_or(&self.username)
    }
}

/// Authenticated user as returned by the account endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub token: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub known_as: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}
