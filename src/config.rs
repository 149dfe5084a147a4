//! Environment Configuration
//!
//! The concrete API base URL and optional token are environment-provided;
//! they are loaded once here and passed explicitly to the HTTP client.

use anyhow::{Context, Result};

/// Remote endpoint configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub auth_token: Option<String>,
}

impl ApiConfig {
    /// Read from the environment (`.env` supported via dotenv).
    /// `RESIDENT_API_BASE_URL` is required; `RESIDENT_API_TOKEN` optional.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let base_url = std::env::var("RESIDENT_API_BASE_URL")
            .context("RESIDENT_API_BASE_URL is not set")?;
        let auth_token = std::env::var("RESIDENT_API_TOKEN").ok();

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token,
        })
    }

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth_token: None,
        }
    }
}
