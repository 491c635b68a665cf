// src/pipeline/score.rs

//! Scoring stage.

use std::cmp::Reverse;

use crate::error::Result;
use crate::models::{EnrichedLead, ScoredLead};
use crate::services::score_emails;
use crate::storage::{ENRICHED_LEADS, LocalStore, SCORED_LEADS};

/// Score each enriched lead and persist the list ranked by score.
///
/// Sorting is descending and stable, so ties keep their original order.
pub async fn run_score(store: &LocalStore) -> Result<usize> {
    let enriched: Vec<EnrichedLead> = store.read_records_required(ENRICHED_LEADS).await?;

    let mut scored: Vec<ScoredLead> = enriched
        .into_iter()
        .map(|lead| {
            let score = score_emails(&lead.emails);
            ScoredLead::new(lead, score)
        })
        .collect();
    scored.sort_by_key(|lead| Reverse(lead.score));

    store.write_records(SCORED_LEADS, &scored).await?;
    log::info!("Scored {} leads", scored.len());
    Ok(scored.len())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::models::Lead;

    fn enriched(name: &str, emails: &[&str]) -> EnrichedLead {
        EnrichedLead::new(
            Lead {
                name: name.to_string(),
                url: format!("https://{name}.example"),
                snippet: String::new(),
            },
            emails.iter().map(|s| s.to_string()).collect(),
        )
    }

    #[tokio::test]
    async fn test_score_stage_ranks_descending_stably() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        store
            .write_records(
                ENRICHED_LEADS,
                &[
                    enriched("freemail", &["a@gmail.com"]),
                    enriched("first-role", &["info@x.example"]),
                    enriched("personal", &["jane@y.example"]),
                    enriched("second-role", &["admin@z.example"]),
                    enriched("empty", &[]),
                ],
            )
            .await
            .unwrap();

        run_score(&store).await.unwrap();

        let scored: Vec<ScoredLead> = store.read_records_required(SCORED_LEADS).await.unwrap();
        let order: Vec<(&str, u32)> = scored
            .iter()
            .map(|l| (l.name.as_str(), l.score))
            .collect();
        assert_eq!(
            order,
            vec![
                ("personal", 3),
                ("first-role", 2),
                ("second-role", 2),
                ("freemail", 1),
                ("empty", 0),
            ]
        );
    }

    #[tokio::test]
    async fn test_score_stage_requires_enriched_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        assert!(run_score(&store).await.is_err());
    }

    #[tokio::test]
    async fn test_score_stage_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        store
            .write_records(
                ENRICHED_LEADS,
                &[enriched("a", &["info@a.example"]), enriched("b", &[])],
            )
            .await
            .unwrap();

        run_score(&store).await.unwrap();
        let first: Vec<ScoredLead> = store.read_records_required(SCORED_LEADS).await.unwrap();
        run_score(&store).await.unwrap();
        let second: Vec<ScoredLead> = store.read_records_required(SCORED_LEADS).await.unwrap();
        assert_eq!(first, second);
        assert!(second.iter().all(|l| l.score <= 10));
    }

    #[tokio::test]
    async fn test_empty_email_set_scores_zero() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        store
            .write_records(ENRICHED_LEADS, &[enriched("quiet", &[])])
            .await
            .unwrap();

        run_score(&store).await.unwrap();
        let scored: Vec<ScoredLead> = store.read_records_required(SCORED_LEADS).await.unwrap();
        assert_eq!(scored[0].score, 0);
    }
}
