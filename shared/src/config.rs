//! Configuration management for the member browsing client

use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub cache: CacheConfig,
    pub account: AccountConfig,
    pub app: AppConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Always ends with `/`, endpoints are appended to it.
    pub base_url: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub member_pages_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    pub username: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: String,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let base_url = normalize_base_url(
            &env::var("API_URL").unwrap_or_else(|_| "http://localhost:5001/api/".to_string()),
        )?;

        let member_pages_capacity: usize = env::var("MEMBER_CACHE_CAPACITY")
            .unwrap_or_else(|_| "50".to_string())
            .parse()?;
        if member_pages_capacity == 0 {
            anyhow::bail!("MEMBER_CACHE_CAPACITY must be greater than zero");
        }

        Ok(Config {
            api: ApiConfig {
                base_url,
                timeout_seconds: env::var("API_TIMEOUT_SECONDS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()?,
            },
            cache: CacheConfig {
                member_pages_capacity,
            },
            account: AccountConfig {
                username: env::var("MEMBER_BROWSER_USERNAME").ok(),
                password: env::var("MEMBER_BROWSER_PASSWORD").ok(),
            },
            app: AppConfig {
                environment: env::var("ENVIRONMENT")
                    .unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("RUST_LOG")
                    .unwrap_or_else(|_| "info".to_string()),
            },
        })
    }

    /// Configuration pointing at `base_url` with defaults everywhere else.
    pub fn for_base_url(base_url: &str) -> anyhow::Result<Self> {
        Ok(Config {
            api: ApiConfig {
                base_url: normalize_base_url(base_url)?,
                timeout_seconds: 30,
            },
            cache: CacheConfig {
                member_pages_capacity: 50,
            },
            account: AccountConfig {
                username: None,
                password: None,
            },
            app: AppConfig {
                environment: "development".to_string(),
                log_level: "info".to_string(),
            },
        })
    }

    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    /// Login credentials, only when both halves are configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.account.username, &self.account.password) {
            (Some(username), Some(password)) => Some((username.as_str(), password.as_str())),
            _ => None,
        }
    }
}

fn normalize_base_url(raw: &str) -> anyhow::Result<String> {
    let parsed = url::Url::parse(raw.trim())?;
    let mut normalized = parsed.to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Ok(normalized)
}
