// src/pipeline/runner.rs

//! Pipeline orchestrator.
//!
//! Owns the fixed six-stage sequence, publishes progress through the
//! status cell, and guarantees at most one active run. The orchestrator
//! holds no business logic; stages do the work.

use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{Config, MailCredentials};
use crate::pipeline::status::StatusCell;
use crate::pipeline::{collect, engage, enrich, forecast, generate, score};
use crate::services::{Classifier, Enricher, Mailer, ReplyFetcher, SearchClient, SmtpMailer};
use crate::storage::LocalStore;

/// Orchestrator for the lead-generation pipeline.
pub struct Pipeline {
    config: Arc<Config>,
    status: Arc<StatusCell>,
    store: LocalStore,
    search: SearchClient,
    enricher: Enricher,
    classifier: Classifier,
}

impl Pipeline {
    /// Build the orchestrator and its stage services.
    pub fn new(config: Arc<Config>, status: Arc<StatusCell>) -> Result<Self> {
        let store = LocalStore::new(&config.paths.data_dir);
        let search = SearchClient::new(config.search.clone())?;
        let enricher = Enricher::new(config.enrichment.clone())?;
        let classifier = Classifier::new(config.classifier.clone())?;
        Ok(Self {
            config,
            status,
            store,
            search,
            enricher,
            classifier,
        })
    }

    /// Start a run in the background.
    ///
    /// Returns immediately after claiming the status cell and spawning
    /// the stage sequence; rejects with a conflict while a run is
    /// active.
    pub fn start(self: &Arc<Self>, query: String) -> Result<()> {
        if !self.status.begin_run("Starting lead generation...") {
            return Err(AppError::PipelineBusy);
        }

        let pipeline = Arc::clone(self);
        tokio::spawn(async move {
            pipeline.execute(&query).await;
        });
        Ok(())
    }

    /// Run the pipeline to completion on the current task.
    ///
    /// Same sequence as a background run; the stage error (if any) is
    /// returned to the caller in addition to being frozen in the status.
    pub async fn run_once(&self, query: &str) -> Result<()> {
        if !self.status.begin_run("Starting lead generation...") {
            return Err(AppError::PipelineBusy);
        }
        let result = self.run_stages(query).await;
        self.settle(&result);
        result
    }

    /// Execute the stage sequence and settle the status. Never panics
    /// the host process on a stage failure.
    async fn execute(&self, query: &str) {
        let result = self.run_stages(query).await;
        self.settle(&result);
    }

    fn settle(&self, result: &Result<()>) {
        match result {
            Ok(()) => {
                log::info!("Pipeline finished successfully");
                self.status.complete();
            }
            Err(error) => {
                log::error!("Pipeline error: {}", error);
                self.status.fail(error.to_string());
            }
        }
    }

    async fn run_stages(&self, query: &str) -> Result<()> {
        self.status.update_message(format!("Searching for: {query}"));
        generate::run_generate(&self.search, &self.store, query).await?;
        self.status.finish_step(1);

        self.status
            .update_message("Enriching leads with contact info...");
        enrich::run_enrich(&self.enricher, &self.store).await?;
        self.status.finish_step(2);

        self.status.update_message("Scoring leads...");
        score::run_score(&self.store).await?;
        self.status.finish_step(3);

        // Mail credentials are re-read per run so they can appear or
        // rotate between runs without a restart.
        let credentials = MailCredentials::from_env();

        self.status.update_message("Sending engagement emails...");
        let mailer = credentials
            .clone()
            .map(|creds| SmtpMailer::new(self.config.mail.clone(), creds));
        engage::run_engage(
            &self.store,
            mailer.as_ref().map(|m| m as &dyn Mailer),
            &self.config.engagement,
        )
        .await?;
        self.status.finish_step(4);

        self.status.update_message("Checking for replies...");
        let fetcher =
            credentials.map(|creds| ReplyFetcher::new(self.config.mail.clone(), creds));
        collect::run_collect(&self.store, fetcher.as_ref()).await?;
        self.status.finish_step(5);

        self.status.update_message("Generating sales forecast...");
        forecast::run_forecast(&self.store, &self.classifier, self.config.engagement.min_score)
            .await?;
        self.status.finish_step(6);

        Ok(())
    }
}
