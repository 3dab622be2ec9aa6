use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub allowed_origins: Vec<String>,
    pub internal_api_secret: String,
    pub search: SearchConfig,
    pub posthog_api_key: Option<String>,
    pub posthog_host: String,
    pub revalidate_url: Option<String>,
    pub revalidate_secret: Option<String>,
    pub expo_access_token: Option<String>,
}

/// OpenSearch connection and sync settings
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub index: String,
    pub sync_cron: String,
    pub batch_size: i64,
    pub interval_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "rezeptbuch".to_string()),
            allowed_origins: parse_list(&env::var("ALLOWED_ORIGINS").unwrap_or_default()),
            internal_api_secret: non_empty(env::var("INTERNAL_API_SECRET").ok())
                .context("INTERNAL_API_SECRET must be set")?,
            search: SearchConfig::from_env()?,
            posthog_api_key: non_empty(env::var("POSTHOG_API_KEY").ok()),
            posthog_host: parse_url(
                "POSTHOG_HOST",
                env::var("POSTHOG_HOST").unwrap_or_else(|_| "https://eu.i.posthog.com".to_string()),
            )?,
            revalidate_url: non_empty(env::var("REVALIDATE_URL").ok())
                .map(|url| parse_url("REVALIDATE_URL", url))
                .transpose()?,
            revalidate_secret: non_empty(env::var("REVALIDATE_SECRET").ok()),
            expo_access_token: non_empty(env::var("EXPO_ACCESS_TOKEN").ok()),
        })
    }
}

impl SearchConfig {
    /// Load only the search settings (used by the standalone sync binary)
    pub fn from_env() -> Result<Self> {
        let _ = dotenv();

        Ok(Self {
            url: parse_url(
                "OPENSEARCH_URL",
                env::var("OPENSEARCH_URL").unwrap_or_else(|_| "http://localhost:9200".to_string()),
            )?,
            username: non_empty(env::var("OPENSEARCH_USERNAME").ok()),
            password: non_empty(env::var("OPENSEARCH_PASSWORD").ok()),
            index: env::var("OPENSEARCH_INDEX").unwrap_or_else(|_| "recipes".to_string()),
            sync_cron: env::var("SEARCH_SYNC_CRON").unwrap_or_else(|_| "0 */5 * * * *".to_string()),
            batch_size: env::var("SEARCH_SYNC_BATCH_SIZE")
                .unwrap_or_else(|_| "500".to_string())
                .parse()
                .context("SEARCH_SYNC_BATCH_SIZE must be a valid number")?,
            interval_secs: env::var("SEARCH_SYNC_INTERVAL_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .context("SEARCH_SYNC_INTERVAL_SECS must be a valid number")?,
        })
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Reject malformed base URLs at startup instead of on the first request
fn parse_url(name: &str, value: String) -> Result<String> {
    let parsed = url::Url::parse(value.trim())
        .with_context(|| format!("{} must be a valid URL", name))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        anyhow::bail!("{} must use http or https", name);
    }
    Ok(value.trim().to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
