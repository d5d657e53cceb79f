use std::fmt;

use anyhow::{Context, Result};

use crate::ai_parser::AtsFriendlyPolicy;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_api_url: String,
    pub ai_timeout_secs: u64,
    pub upload_dir: String,
    /// Set when uploads go to S3 / MinIO instead of `upload_dir`.
    pub s3: Option<S3Config>,
    pub ats_friendly_policy: AtsFriendlyPolicy,
    pub allowed_origin: String,
    pub secret_key: String,
    pub access_token_expire_minutes: i64,
    pub port: u16,
    pub rust_log: String,
}

#[derive(Clone)]
pub struct S3Config {
    pub bucket: String,
    pub endpoint: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };
        let or_default =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let s3 = match lookup("S3_BUCKET").filter(|v| !v.trim().is_empty()) {
            Some(bucket) => Some(S3Config {
                bucket,
                endpoint: require("S3_ENDPOINT")?,
                access_key_id: require("AWS_ACCESS_KEY_ID")?,
                secret_access_key: require("AWS_SECRET_ACCESS_KEY")?,
            }),
            None => None,
        };

        Ok(Config {
            database_url: require("DATABASE_URL")?,
            openai_api_key: require("OPENAI_API_KEY")?,
            openai_model: or_default("OPENAI_MODEL", "gpt-3.5-turbo"),
            openai_api_url: or_default(
                "OPENAI_API_URL",
                "https://api.openai.com/v1/chat/completions",
            ),
            ai_timeout_secs: or_default("AI_TIMEOUT_SECS", "60")
                .parse::<u64>()
                .context("AI_TIMEOUT_SECS must be a whole number of seconds")?,
            upload_dir: or_default("UPLOAD_DIR", "uploads"),
            s3,
            ats_friendly_policy: or_default("ATS_FRIENDLY_POLICY", "derive")
                .parse::<AtsFriendlyPolicy>()
                .map_err(anyhow::Error::msg)?,
            allowed_origin: or_default("ALLOWED_ORIGIN", "http://localhost:3000"),
            secret_key: require("SECRET_KEY")?,
            access_token_expire_minutes: or_default("ACCESS_TOKEN_EXPIRE_MINUTES", "30")
                .parse::<i64>()
                .context("ACCESS_TOKEN_EXPIRE_MINUTES must be a whole number")?,
            port: or_default("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: or_default("RUST_LOG", "info"),
        })
    }

    /// A complete config pointing nowhere, for handler tests.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self::from_lookup(|key| match key {
            "DATABASE_URL" => Some("postgres://localhost/jobassist_test".into()),
            "OPENAI_API_KEY" => Some("sk-test".into()),
            "SECRET_KEY" => Some("test-secret".into()),
            _ => None,
        })
        .expect("test config is complete")
    }
}

// Secrets are never printed, even at debug level.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"<redacted>")
            .field("openai_api_key", &"<redacted>")
            .field("openai_model", &self.openai_model)
            .field("openai_api_url", &self.openai_api_url)
            .field("ai_timeout_secs", &self.ai_timeout_secs)
            .field("upload_dir", &self.upload_dir)
            .field("s3_bucket", &self.s3.as_ref().map(|s| s.bucket.as_str()))
            .field("ats_friendly_policy", &self.ats_friendly_policy)
            .field("allowed_origin", &self.allowed_origin)
            .field("secret_key", &"<redacted>")
            .field("access_token_expire_minutes", &self.access_token_expire_minutes)
            .field("port", &self.port)
            .field("rust_log", &self.rust_log)
            .finish()
    }
}
