// src/pipeline/enrich.rs

//! Enrichment stage.

use crate::error::Result;
use crate::models::Lead;
use crate::services::Enricher;
use crate::storage::{ENRICHED_LEADS, LocalStore, RAW_LEADS};

/// Fan out over the raw leads and persist them with found addresses.
///
/// The raw lead dataset is a required input; its absence fails the
/// stage. Per-lead fetch failures were already degraded inside the
/// enricher and never reach this level.
pub async fn run_enrich(enricher: &Enricher, store: &LocalStore) -> Result<usize> {
    let leads: Vec<Lead> = store.read_records_required(RAW_LEADS).await?;
    let enriched = enricher.enrich_all(leads).await;

    store.write_records(ENRICHED_LEADS, &enriched).await?;
    log::info!("Enriched {} leads", enriched.len());
    Ok(enriched.len())
}
