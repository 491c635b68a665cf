//! Application configuration structures.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Web search settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Contact-page enrichment settings
    #[serde(default)]
    pub enrichment: EnrichmentConfig,

    /// Outreach sending settings
    #[serde(default)]
    pub engagement: EngagementConfig,

    /// SMTP/IMAP endpoints
    #[serde(default)]
    pub mail: MailConfig,

    /// Reply classification settings
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Control API settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Dataset locations
    #[serde(default)]
    pub paths: PathsConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.search.max_results == 0 {
            return Err(AppError::validation("search.max_results must be > 0"));
        }
        if self.search.timeout_secs == 0 {
            return Err(AppError::validation("search.timeout_secs must be > 0"));
        }
        if self.enrichment.timeout_secs == 0 {
            return Err(AppError::validation("enrichment.timeout_secs must be > 0"));
        }
        if self.enrichment.max_concurrent == 0 {
            return Err(AppError::validation("enrichment.max_concurrent must be > 0"));
        }
        if self.engagement.subject.trim().is_empty() {
            return Err(AppError::validation("engagement.subject is empty"));
        }
        if self.engagement.body.trim().is_empty() {
            return Err(AppError::validation("engagement.body is empty"));
        }
        if self.classifier.timeout_secs == 0 {
            return Err(AppError::validation("classifier.timeout_secs must be > 0"));
        }
        if self.mail.timeout_secs == 0 {
            return Err(AppError::validation("mail.timeout_secs must be > 0"));
        }
        Ok(())
    }
}

/// Web search provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// HTML search endpoint queried for candidate organizations
    #[serde(default = "defaults::search_base_url")]
    pub base_url: String,

    /// Maximum number of hits to turn into leads
    #[serde(default = "defaults::max_results")]
    pub max_results: usize,

    /// Request timeout in seconds
    #[serde(default = "defaults::search_timeout")]
    pub timeout_secs: u64,

    /// User-Agent header for search requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::search_base_url(),
            max_results: defaults::max_results(),
            timeout_secs: defaults::search_timeout(),
            user_agent: defaults::user_agent(),
        }
    }
}

/// Contact-page enrichment settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    /// Per-fetch timeout in seconds
    #[serde(default = "defaults::enrichment_timeout")]
    pub timeout_secs: u64,

    /// Maximum concurrent page fetches
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Paths tried relative to the base URL when the home page yields
    /// no addresses, in order, stopping at the first hit
    #[serde(default = "defaults::fallback_paths")]
    pub fallback_paths: Vec<String>,

    /// User-Agent header for page fetches
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            timeout_secs: defaults::enrichment_timeout(),
            max_concurrent: defaults::max_concurrent(),
            fallback_paths: defaults::fallback_paths(),
            user_agent: defaults::user_agent(),
        }
    }
}

/// Outreach sending settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementConfig {
    /// Minimum score a lead needs before its addresses are contacted
    #[serde(default = "defaults::min_score")]
    pub min_score: u32,

    /// Fixed outreach subject
    #[serde(default = "defaults::subject")]
    pub subject: String,

    /// Fixed outreach body, no per-recipient personalization
    #[serde(default = "defaults::body")]
    pub body: String,
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            min_score: defaults::min_score(),
            subject: defaults::subject(),
            body: defaults::body(),
        }
    }
}

/// Mail transport endpoints.
///
/// Credentials come from the environment, never from the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    #[serde(default = "defaults::smtp_host")]
    pub smtp_host: String,

    /// SMTPS (implicit TLS) submission port
    #[serde(default = "defaults::smtp_port")]
    pub smtp_port: u16,

    #[serde(default = "defaults::imap_host")]
    pub imap_host: String,

    #[serde(default = "defaults::imap_port")]
    pub imap_port: u16,

    /// Socket timeout for mailbox operations, in seconds
    #[serde(default = "defaults::mail_timeout")]
    pub timeout_secs: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: defaults::smtp_host(),
            smtp_port: defaults::smtp_port(),
            imap_host: defaults::imap_host(),
            imap_port: defaults::imap_port(),
            timeout_secs: defaults::mail_timeout(),
        }
    }
}

/// Mailbox credentials read from the environment.
#[derive(Debug, Clone)]
pub struct MailCredentials {
    pub address: String,
    pub password: String,
}

impl MailCredentials {
    /// Read `EMAIL_ADDRESS` / `EMAIL_PASSWORD` from the environment.
    ///
    /// Absence is a valid, explicitly-handled skip condition for the
    /// stages that need mail transport, not an error.
    pub fn from_env() -> Option<Self> {
        let address = env::var("EMAIL_ADDRESS").ok().filter(|s| !s.is_empty())?;
        let password = env::var("EMAIL_PASSWORD").ok().filter(|s| !s.is_empty())?;
        Some(Self { address, password })
    }
}

/// Reply classification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// OpenAI-compatible chat completions endpoint
    #[serde(default = "defaults::classifier_api_url")]
    pub api_url: String,

    #[serde(default = "defaults::classifier_model")]
    pub model: String,

    #[serde(default = "defaults::temperature")]
    pub temperature: f32,

    /// Request timeout in seconds
    #[serde(default = "defaults::classifier_timeout")]
    pub timeout_secs: u64,
}

impl ClassifierConfig {
    /// Bearer key for the classification endpoint, from `GROQ_API_KEY`.
    pub fn api_key() -> Option<String> {
        env::var("GROQ_API_KEY").ok().filter(|s| !s.is_empty())
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            api_url: defaults::classifier_api_url(),
            model: defaults::classifier_model(),
            temperature: defaults::temperature(),
            timeout_secs: defaults::classifier_timeout(),
        }
    }
}

/// Control API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "defaults::host")]
    pub host: String,

    #[serde(default = "defaults::port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::host(),
            port: defaults::port(),
        }
    }
}

/// Dataset locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding the tabular datasets
    #[serde(default = "defaults::data_dir")]
    pub data_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: defaults::data_dir(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn search_base_url() -> String {
        "https://html.duckduckgo.com/html/".to_string()
    }

    pub fn max_results() -> usize {
        20
    }

    pub fn search_timeout() -> u64 {
        10
    }

    pub fn user_agent() -> String {
        "Mozilla/5.0".to_string()
    }

    pub fn enrichment_timeout() -> u64 {
        5
    }

    pub fn max_concurrent() -> usize {
        5
    }

    pub fn fallback_paths() -> Vec<String> {
        vec!["contact".to_string()]
    }

    pub fn min_score() -> u32 {
        1
    }

    pub fn subject() -> String {
        "Let's Connect: Exploring Synergies".to_string()
    }

    pub fn body() -> String {
        "Hi,\n\n\
         I came across your work and thought it would be valuable to connect. \
         We're helping B2B companies like yours with AI-driven sales solutions \
         that save time and boost conversions.\n\n\
         Would love to chat briefly and see if there's alignment.\n\n\
         Best,\n\
         The Prospector Team\n"
            .to_string()
    }

    pub fn smtp_host() -> String {
        "smtp.gmail.com".to_string()
    }

    pub fn smtp_port() -> u16 {
        465
    }

    pub fn imap_host() -> String {
        "imap.gmail.com".to_string()
    }

    pub fn imap_port() -> u16 {
        993
    }

    pub fn mail_timeout() -> u64 {
        10
    }

    pub fn classifier_api_url() -> String {
        "https://api.groq.com/openai/v1/chat/completions".to_string()
    }

    pub fn classifier_model() -> String {
        "llama3-70b-8192".to_string()
    }

    pub fn temperature() -> f32 {
        0.3
    }

    pub fn classifier_timeout() -> u64 {
        30
    }

    pub fn host() -> String {
        "0.0.0.0".to_string()
    }

    pub fn port() -> u16 {
        7860
    }

    pub fn data_dir() -> PathBuf {
        PathBuf::from("data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [enrichment]
            max_concurrent = 2

            [engagement]
            min_score = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.enrichment.max_concurrent, 2);
        assert_eq!(config.enrichment.fallback_paths, vec!["contact"]);
        assert_eq!(config.engagement.min_score, 3);
        assert_eq!(config.search.max_results, 20);
        assert_eq!(config.mail.smtp_port, 465);
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let mut config = Config::default();
        config.enrichment.max_concurrent = 0;
        assert!(config.validate().is_err());
    }
}
