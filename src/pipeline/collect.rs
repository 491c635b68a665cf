// src/pipeline/collect.rs

//! Reply collection stage.

use std::collections::HashSet;

use crate::error::Result;
use crate::models::{EnrichedLead, Reply};
use crate::services::ReplyFetcher;
use crate::storage::{ENRICHED_LEADS, LocalStore, REPLIES};
use crate::utils::email::normalize_address;

/// Fetch unseen replies and persist the ones from contacted addresses.
///
/// Reply collection is optional end to end: absent credentials skip the
/// stage, mailbox errors degrade to "no replies", and an empty result
/// leaves the replies dataset untouched. No synthetic replies are ever
/// injected.
pub async fn run_collect(store: &LocalStore, fetcher: Option<&ReplyFetcher>) -> Result<usize> {
    let Some(fetcher) = fetcher else {
        log::warn!("Email credentials not set; skipping reply collection");
        return Ok(0);
    };

    let replies = match fetcher.fetch_unseen_replies().await {
        Ok(replies) => replies,
        Err(error) => {
            log::warn!("Reply collection failed: {}", error);
            return Ok(0);
        }
    };

    let contacted = contacted_addresses(store).await?;
    let matched: Vec<Reply> = replies
        .into_iter()
        .filter(|reply| {
            normalize_address(&reply.from)
                .map(|address| contacted.contains(&address))
                .unwrap_or(false)
        })
        .collect();

    if matched.is_empty() {
        log::info!("No replies from contacted addresses");
        return Ok(0);
    }

    store.write_records(REPLIES, &matched).await?;
    log::info!("Saved {} replies", matched.len());
    Ok(matched.len())
}

/// Normalized addresses we previously reached out to.
async fn contacted_addresses(store: &LocalStore) -> Result<HashSet<String>> {
    let enriched = store
        .read_records_optional::<EnrichedLead>(ENRICHED_LEADS)
        .await?
        .unwrap_or_default();

    Ok(enriched
        .iter()
        .flat_map(|lead| lead.emails.iter())
        .filter_map(|email| normalize_address(email))
        .collect())
}
