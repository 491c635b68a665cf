// src/services/search.rs

//! Web search service.
//!
//! Queries an HTML search endpoint for candidate organizations. Provider
//! failures degrade to an empty hit list; the pipeline decides whether
//! zero hits is fatal.

use std::time::Duration;

use reqwest::Client;
use scraper::{Html, Selector};

use crate::error::Result;
use crate::models::SearchConfig;

/// One search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Service for finding candidate organizations via web search.
pub struct SearchClient {
    config: SearchConfig,
    client: Client,
}

impl SearchClient {
    /// Create a new search client with the given configuration.
    pub fn new(config: SearchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    /// Search for the query, returning at most `max_results` hits.
    ///
    /// Provider errors are tolerated by returning an empty list rather
    /// than propagating.
    pub async fn search(&self, query: &str) -> Vec<SearchHit> {
        match self.try_search(query).await {
            Ok(hits) => hits,
            Err(error) => {
                log::warn!("Search failed for '{}': {}", query, error);
                Vec::new()
            }
        }
    }

    async fn try_search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let html = self
            .client
            .get(&self.config.base_url)
            .query(&[("q", query)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(parse_results(&html, self.config.max_results))
    }
}

/// Parse result blocks out of the provider's HTML.
fn parse_results(html: &str, max_results: usize) -> Vec<SearchHit> {
    let document = Html::parse_document(html);
    let result_sel = Selector::parse("div.result").expect("valid result selector");
    let title_sel = Selector::parse("a.result__a").expect("valid title selector");
    let snippet_sel = Selector::parse(".result__snippet").expect("valid snippet selector");

    let mut hits = Vec::new();
    for result in document.select(&result_sel) {
        let Some(title_elem) = result.select(&title_sel).next() else {
            continue;
        };
        let title: String = title_elem.text().collect::<String>().trim().to_string();
        let Some(href) = title_elem.value().attr("href") else {
            continue;
        };
        let Some(url) = resolve_result_href(href) else {
            continue;
        };
        if title.is_empty() {
            continue;
        }

        let snippet = result
            .select(&snippet_sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        hits.push(SearchHit {
            title,
            url,
            snippet,
        });
        if hits.len() >= max_results {
            break;
        }
    }
    hits
}

/// Unwrap the provider's redirect wrapper around a result link.
///
/// Links come either direct (`https://site`), scheme-relative, or via a
/// redirect with the target in the `uddg` query parameter.
fn resolve_result_href(href: &str) -> Option<String> {
    let absolute = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href.to_string()
    };

    if let Ok(parsed) = url::Url::parse(&absolute) {
        for (key, value) in parsed.query_pairs() {
            if key == "uddg" {
                return Some(value.to_string());
            }
        }
        return Some(absolute);
    }
    None
}
