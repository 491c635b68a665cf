// src/pipeline/generate.rs

//! Lead generation stage.

use crate::error::{AppError, Result};
use crate::models::Lead;
use crate::services::SearchClient;
use crate::storage::{LocalStore, RAW_LEADS};

/// Search for candidate organizations and persist the raw lead list.
///
/// Zero hits is a hard pipeline error: nothing downstream can run.
pub async fn run_generate(search: &SearchClient, store: &LocalStore, query: &str) -> Result<usize> {
    log::info!("Searching for: {}", query);
    let hits = search.search(query).await;
    if hits.is_empty() {
        return Err(AppError::NoLeads);
    }

    let leads: Vec<Lead> = hits
        .into_iter()
        .map(|hit| Lead {
            name: hit.title,
            url: hit.url,
            snippet: hit.snippet,
        })
        .collect();

    store.write_records(RAW_LEADS, &leads).await?;
    log::info!("Saved {} leads", leads.len());
    Ok(leads.len())
}
