// src/pipeline/forecast.rs

//! Forecasting stage.

use crate::error::Result;
use crate::models::{ForecastRecord, Reply, ScoredLead};
use crate::pipeline::engage::engaged_addresses;
use crate::services::{Classifier, correlate};
use crate::storage::{FORECAST, LocalStore, REPLIES, SCORED_LEADS};

/// Classify every engaged address and persist the forecast.
///
/// The engaged set is derived from the scored dataset with the same
/// threshold, validation and dedup as the engagement stage, so the
/// forecast has one row per address that received outreach. The replies
/// dataset is optional; addresses without a reply classify as cold
/// without a remote call.
pub async fn run_forecast(
    store: &LocalStore,
    classifier: &Classifier,
    min_score: u32,
) -> Result<usize> {
    let scored: Vec<ScoredLead> = store.read_records_required(SCORED_LEADS).await?;

    let replies = store
        .read_records_optional::<Reply>(REPLIES)
        .await?
        .unwrap_or_default();
    let bodies = correlate(&replies);

    let mut records = Vec::new();
    for address in engaged_addresses(&scored, min_score) {
        let reply_body = bodies
            .get(&address.to_lowercase())
            .map(String::as_str)
            .unwrap_or_default();
        let (category, reason) = classifier.classify(&address, reply_body).await;
        records.push(ForecastRecord {
            email: address,
            category,
            reason,
        });
    }

    store.write_records(FORECAST, &records).await?;
    log::info!("Forecast saved for {} addresses", records.len());
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, ClassifierConfig, EnrichedLead, Lead};

    fn scored(emails: &[&str], score: u32) -> ScoredLead {
        ScoredLead::new(
            EnrichedLead::new(
                Lead {
                    name: "Acme".to_string(),
                    url: "https://acme.example".to_string(),
                    snippet: String::new(),
                },
                emails.iter().map(|s| s.to_string()).collect(),
            ),
            score,
        )
    }

    fn offline_classifier() -> Classifier {
        Classifier::with_api_key(ClassifierConfig::default(), None).unwrap()
    }

    #[tokio::test]
    async fn test_forecast_requires_scored_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        assert!(
            run_forecast(&store, &offline_classifier(), 1)
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_unreplied_addresses_classify_cold_offline() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        store
            .write_records(SCORED_LEADS, &[scored(&["p@x.example"], 5)])
            .await
            .unwrap();

        run_forecast(&store, &offline_classifier(), 1).await.unwrap();

        let records: Vec<ForecastRecord> = store.read_records_required(FORECAST).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].email, "p@x.example");
        assert_eq!(records[0].category, Category::Cold);
        assert_eq!(records[0].reason, "No reply received yet.");
    }

    #[tokio::test]
    async fn test_replied_address_joins_by_normalized_sender() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        store
            .write_records(SCORED_LEADS, &[scored(&["P@x.example"], 5)])
            .await
            .unwrap();
        store
            .write_records(
                REPLIES,
                &[Reply {
                    from: "<p@x.example> Prospect".to_string(),
                    subject: "Re: Let's Connect".to_string(),
                    body: "Interested".to_string(),
                }],
            )
            .await
            .unwrap();

        // No API key: the delegated call downgrades to unknown, which
        // proves the reply body was joined and sent onward.
        run_forecast(&store, &offline_classifier(), 1).await.unwrap();

        let records: Vec<ForecastRecord> = store.read_records_required(FORECAST).await.unwrap();
        assert_eq!(records[0].category, Category::Unknown);
    }

    #[tokio::test]
    async fn test_below_threshold_addresses_excluded() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        store
            .write_records(SCORED_LEADS, &[scored(&["low@x.example"], 0)])
            .await
            .unwrap();

        run_forecast(&store, &offline_classifier(), 1).await.unwrap();

        let records: Vec<ForecastRecord> = store.read_records_required(FORECAST).await.unwrap();
        assert!(records.is_empty());
    }
}
