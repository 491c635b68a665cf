// src/lib.rs

//! Prospector Library
//!
//! Outbound lead-generation pipeline: search for candidate organizations,
//! enrich them with contact emails, score them, send outreach, collect
//! replies and forecast sales-readiness per contacted address.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod server;
pub mod services;
pub mod storage;
pub mod utils;
