// src/models/mod.rs

//! Domain models for the pipeline application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod lead;
mod reply;
mod status;

// Re-export all public types
pub use config::{
    ClassifierConfig, Config, EngagementConfig, EnrichmentConfig, MailConfig, MailCredentials,
    PathsConfig, SearchConfig, ServerConfig,
};
pub use lead::{EnrichedLead, Lead, OutreachEvent, ScoredLead};
pub use reply::{Category, ForecastRecord, Reply};
pub use status::{PipelineState, PipelineStatus};
