// src/services/enricher.rs

//! Contact-page enrichment service.
//!
//! Fetches each lead's site concurrently and extracts email addresses.
//! Fetch failures degrade the single lead to an empty address set and
//! never abort the fan-out.

use std::collections::BTreeSet;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use reqwest::Client;
use url::Url;

use crate::error::Result;
use crate::models::{EnrichedLead, EnrichmentConfig, Lead};
use crate::utils::email::extract_emails;
use crate::utils::resolve_url;

/// Service for enriching leads with contact addresses.
pub struct Enricher {
    config: EnrichmentConfig,
    client: Client,
}

impl Enricher {
    /// Create a new enricher with the given configuration.
    pub fn new(config: EnrichmentConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    /// Enrich all leads concurrently, bounded by the worker limit.
    ///
    /// Leads without a usable URL (no `http` prefix) are excluded from
    /// dispatch and absent from the output. Result order is completion
    /// order; callers correlate by `url`.
    pub async fn enrich_all(&self, leads: Vec<Lead>) -> Vec<EnrichedLead> {
        let eligible: Vec<Lead> = leads
            .into_iter()
            .filter(|lead| lead.url.starts_with("http"))
            .collect();

        let concurrency = self.config.max_concurrent.max(1);
        log::info!(
            "Enriching {} leads ({} workers)",
            eligible.len(),
            concurrency
        );

        let mut enriched_stream = stream::iter(eligible)
            .map(|lead| async move {
                let emails = self.enrich_one(&lead.url).await;
                EnrichedLead::new(lead, emails)
            })
            .buffer_unordered(concurrency);

        let mut enriched = Vec::new();
        while let Some(lead) = enriched_stream.next().await {
            log::debug!("Enriched {} ({} addresses)", lead.url, lead.emails.len());
            enriched.push(lead);
        }
        enriched
    }

    /// Collect addresses for one lead.
    ///
    /// The base page is fetched first; fallback paths are tried in order
    /// only while no address has been found yet.
    async fn enrich_one(&self, base_url: &str) -> BTreeSet<String> {
        let mut emails = BTreeSet::new();

        match self.fetch_text(base_url).await {
            Ok(text) => emails.extend(extract_emails(&text)),
            Err(error) => log::warn!("Fetch failed for {}: {}", base_url, error),
        }

        if !emails.is_empty() {
            return emails;
        }

        let Ok(base) = Url::parse(base_url) else {
            return emails;
        };

        for path in &self.config.fallback_paths {
            if !emails.is_empty() {
                break;
            }
            let full_url = resolve_url(&base, path);
            match self.fetch_text(&full_url).await {
                Ok(text) => emails.extend(extract_emails(&text)),
                Err(error) => log::warn!("Fetch failed for {}: {}", full_url, error),
            }
        }

        emails
    }

    async fn fetch_text(&self, url: &str) -> Result<String> {
        let text = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(text)
    }
}
