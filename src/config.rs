// ============================================================================
// CONFIG - Client configuration resolved at compile time
// ============================================================================
// Values come from option_env! (build.rs forwards .env), with defaults that
// point at a local development backend.
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::state::MutationOrdering;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub backend_url_development: String,
    pub backend_url_production: String,
    pub environment: String,
    /// Prefix every API route is mounted under.
    pub api_prefix: String,
    pub enable_logging: bool,
    pub network_timeout_seconds: u32,
    /// localStorage key holding the bearer token.
    pub token_storage_key: String,
    pub mutation_ordering: MutationOrdering,
    pub categories_cache_hours: i64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url_development: "http://localhost:8001".to_string(),
            backend_url_production: "https://api.grocery-compare.app".to_string(),
            environment: "development".to_string(),
            api_prefix: "/api".to_string(),
            enable_logging: true,
            network_timeout_seconds: 30,
            token_storage_key: "grocery_compare_token".to_string(),
            mutation_ordering: MutationOrdering::LastResponseWins,
            categories_cache_hours: 24,
        }
    }
}

impl ClientConfig {
    /// Load configuration from compile-time environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            backend_url_development: option_env!("BACKEND_URL_DEVELOPMENT")
                .map(str::to_string)
                .unwrap_or(defaults.backend_url_development),
            backend_url_production: option_env!("BACKEND_URL_PRODUCTION")
                .map(str::to_string)
                .unwrap_or(defaults.backend_url_production),
            environment: option_env!("ENVIRONMENT")
                .map(str::to_string)
                .unwrap_or(defaults.environment),
            api_prefix: option_env!("API_PREFIX")
                .map(str::to_string)
                .unwrap_or(defaults.api_prefix),
            enable_logging: option_env!("ENABLE_LOGGING")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.enable_logging),
            network_timeout_seconds: option_env!("NETWORK_TIMEOUT_SECONDS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.network_timeout_seconds),
            token_storage_key: option_env!("TOKEN_STORAGE_KEY")
                .map(str::to_string)
                .unwrap_or(defaults.token_storage_key),
            mutation_ordering: option_env!("MUTATION_ORDERING")
                .and_then(MutationOrdering::parse)
                .unwrap_or(defaults.mutation_ordering),
            categories_cache_hours: option_env!("CATEGORIES_CACHE_HOURS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.categories_cache_hours),
        }
    }

    /// Backend URL for the current environment
    pub fn backend_url(&self) -> &str {
        match self.environment.as_str() {
            "production" => &self.backend_url_production,
            _ => &self.backend_url_development,
        }
    }

    /// Base URL all API paths are appended to
    pub fn api_base_url(&self) -> String {
        let backend = self.backend_url().trim_end_matches('/');
        let prefix = self.api_prefix.trim_end_matches('/');
        if prefix.is_empty() {
            backend.to_string()
        } else if prefix.starts_with('/') {
            format!("{}{}", backend, prefix)
        } else {
            format!("{}/{}", backend, prefix)
        }
    }

    pub fn is_logging_enabled(&self) -> bool {
        self.enable_logging
    }
}

lazy_static::lazy_static! {
    pub static ref CONFIG: ClientConfig = ClientConfig::from_env();
}
