// src/services/classifier.rs

//! Reply classification adapter.
//!
//! Delegates non-empty reply bodies to an OpenAI-compatible chat
//! completion endpoint and parses the structured verdict. Observationally
//! total: every failure mode maps to the `unknown` category.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::error::{AppError, Result};
use crate::models::{Category, ClassifierConfig};

const SYSTEM_PROMPT: &str =
    "You are a helpful sales assistant that classifies leads based on engagement.";

/// Reason attached to addresses that never replied.
const NO_REPLY_REASON: &str = "No reply received yet.";

/// Service for classifying replies into sales-readiness categories.
pub struct Classifier {
    config: ClassifierConfig,
    api_key: Option<String>,
    client: Client,
}

impl Classifier {
    /// Create a classifier reading the bearer key from the environment.
    pub fn new(config: ClassifierConfig) -> Result<Self> {
        let api_key = ClassifierConfig::api_key();
        Self::with_api_key(config, api_key)
    }

    /// Create a classifier with an explicit key (or none).
    pub fn with_api_key(config: ClassifierConfig, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            config,
            api_key,
            client,
        })
    }

    /// Categorize one contacted address.
    ///
    /// An empty body short-circuits to `cold` without a remote call; any
    /// remote or parse failure downgrades to `unknown` with the error
    /// detail as the reason. Never returns an error.
    pub async fn classify(&self, address: &str, reply_body: &str) -> (Category, String) {
        if reply_body.trim().is_empty() {
            return (Category::Cold, NO_REPLY_REASON.to_string());
        }

        match self.classify_remote(address, reply_body).await {
            Ok(verdict) => verdict,
            Err(error) => {
                log::warn!("Classification failed for {}: {}", address, error);
                (Category::Unknown, format!("Error: {error}"))
            }
        }
    }

    async fn classify_remote(&self, address: &str, reply_body: &str) -> Result<(Category, String)> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::config("GROQ_API_KEY is not set"))?;

        let payload = json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": build_prompt(address, reply_body)},
            ],
            "temperature": self.config.temperature,
        });

        let response: ChatResponse = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let content = response
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .ok_or_else(|| AppError::validation("completion response has no choices"))?;

        parse_verdict(content)
    }
}

fn build_prompt(address: &str, reply_body: &str) -> String {
    format!(
        "Lead: {address}\n\
         Reply Received: Yes\n\
         Reply: \"{reply_body}\"\n\n\
         Task:\n\
         Based on this information, categorize this lead as \"hot\", \"warm\", \
         or \"cold\" and explain why.\n\n\
         Respond in JSON:\n\
         {{\"category\": \"...\", \"reason\": \"...\"}}"
    )
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct Verdict {
    category: String,
    reason: String,
}

/// Parse the model's `{category, reason}` JSON out of the completion
/// text, tolerating code fences and surrounding prose.
fn parse_verdict(content: &str) -> Result<(Category, String)> {
    let start = content
        .find('{')
        .ok_or_else(|| AppError::validation("no JSON object in completion"))?;
    let end = content
        .rfind('}')
        .ok_or_else(|| AppError::validation("no JSON object in completion"))?;

    let verdict: Verdict = serde_json::from_str(&content[start..=end])?;
    let category = Category::parse(&verdict.category).ok_or_else(|| {
        AppError::validation(format!("unrecognized category '{}'", verdict.category))
    })?;
    Ok((category, verdict.reason))
}
