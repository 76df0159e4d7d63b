use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::layout::registry::BANGLADESH_PREMIUM;
use crate::layout::zone_selector::PoolPolicy;
use crate::render::{RenderOptions, DEFAULT_AUTHOR};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Publication name: PDF author and default masthead title.
    pub author: String,
    pub default_template: String,
    pub pool_policy: PoolPolicy,
    /// Extra templates loaded on top of the built-ins.
    pub templates_path: Option<PathBuf>,
    pub article_limit: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            port: optional_env("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG", "info"),
            author: optional_env("EPAPER_AUTHOR", DEFAULT_AUTHOR),
            default_template: optional_env("EPAPER_DEFAULT_TEMPLATE", BANGLADESH_PREMIUM),
            pool_policy: optional_env("EPAPER_POOL_POLICY", "consume")
                .parse::<PoolPolicy>()
                .map_err(anyhow::Error::msg)
                .context("EPAPER_POOL_POLICY is invalid")?,
            templates_path: std::env::var("EPAPER_TEMPLATES_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            article_limit: optional_env("EPAPER_ARTICLE_LIMIT", "60")
                .parse::<i64>()
                .ok()
                .filter(|n| *n > 0)
                .context("EPAPER_ARTICLE_LIMIT must be a positive integer")?,
        })
    }

    /// Render settings derived from the configured publication.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            author: self.author.clone(),
            ..RenderOptions::default()
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
impl Config {
    /// Configuration for handler tests; no external services are contacted.
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/epaper_test".to_string(),
            s3_bucket: "epapers".to_string(),
            s3_endpoint: "http://localhost:9000".to_string(),
            aws_access_key_id: "test".to_string(),
            aws_secret_access_key: "test".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            author: DEFAULT_AUTHOR.to_string(),
            default_template: BANGLADESH_PREMIUM.to_string(),
            pool_policy: PoolPolicy::Consume,
            templates_path: None,
            article_limit: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_options_use_configured_author() {
        let mut config = Config::for_tests();
        config.author = "দৈনিক সংবাদ".to_string();
        let options = config.render_options();
        assert_eq!(options.author, "দৈনিক সংবাদ");
        assert!(options.compress);
    }
}
