//! Local filesystem dataset store.
//!
//! Writes are atomic per dataset (write to temp, then rename) so a
//! status reader or data endpoint never observes a half-written file.

use std::path::PathBuf;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};

/// Local filesystem store rooted at the data directory.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root_dir: PathBuf,
}

impl LocalStore {
    /// Create a new store rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Full path of a dataset file.
    pub fn path(&self, name: &str) -> PathBuf {
        self.root_dir.join(name)
    }

    /// Overwrite a dataset with the given records.
    pub async fn write_records<T: Serialize>(&self, name: &str, records: &[T]) -> Result<()> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for record in records {
            writer.serialize(record)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| AppError::Io(std::io::Error::other(e)))?;
        self.write_bytes(name, &bytes).await
    }

    /// Read a dataset, returning `None` when the file does not exist.
    pub async fn read_records_optional<T: DeserializeOwned>(
        &self,
        name: &str,
    ) -> Result<Option<Vec<T>>> {
        let Some(bytes) = self.read_bytes(name).await? else {
            return Ok(None);
        };
        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let mut records = Vec::new();
        for record in reader.deserialize() {
            records.push(record?);
        }
        Ok(Some(records))
    }

    /// Read a dataset a stage cannot run without.
    pub async fn read_records_required<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>> {
        self.read_records_optional(name)
            .await?
            .ok_or_else(|| AppError::MissingInput(self.path(name)))
    }

    /// Read a dataset as loosely-typed rows for the data API.
    ///
    /// Missing file yields an empty list; blank fields become JSON null
    /// so partially-filled rows serialize safely.
    pub async fn read_rows(&self, name: &str) -> Result<Vec<Value>> {
        let Some(bytes) = self.read_bytes(name).await? else {
            return Ok(Vec::new());
        };
        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let headers = reader.headers()?.clone();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let mut row = serde_json::Map::new();
            for (header, field) in headers.iter().zip(record.iter()) {
                let value = if field.trim().is_empty() {
                    Value::Null
                } else {
                    Value::String(field.to_string())
                };
                row.insert(header.to_string(), value);
            }
            rows.push(Value::Object(row));
        }
        Ok(rows)
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, name: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Read bytes, returning None if the file doesn't exist.
    async fn read_bytes(&self, name: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(name);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::models::{EnrichedLead, Lead};
    use crate::storage::ENRICHED_LEADS;

    fn sample_leads() -> Vec<EnrichedLead> {
        let with_emails = EnrichedLead::new(
            Lead {
                name: "Acme".to_string(),
                url: "https://acme.example".to_string(),
                snippet: "makers of things".to_string(),
            },
            ["info@acme.example".to_string()].into_iter().collect(),
        );
        let without_emails = EnrichedLead::new(
            Lead {
                name: "Quiet Co".to_string(),
                url: "https://quiet.example".to_string(),
                snippet: String::new(),
            },
            BTreeSet::new(),
        );
        vec![with_emails, without_emails]
    }

    #[tokio::test]
    async fn test_round_trip_enriched_leads() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());

        let leads = sample_leads();
        store.write_records(ENRICHED_LEADS, &leads).await.unwrap();

        let back: Vec<EnrichedLead> = store
            .read_records_required(ENRICHED_LEADS)
            .await
            .unwrap();
        assert_eq!(back, leads);
    }

    #[tokio::test]
    async fn test_write_overwrites_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());

        store
            .write_records(ENRICHED_LEADS, &sample_leads())
            .await
            .unwrap();
        store
            .write_records(ENRICHED_LEADS, &sample_leads()[..1])
            .await
            .unwrap();

        let back: Vec<EnrichedLead> = store
            .read_records_required(ENRICHED_LEADS)
            .await
            .unwrap();
        assert_eq!(back.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_optional_dataset_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        let result: Option<Vec<EnrichedLead>> =
            store.read_records_optional("absent.csv").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_missing_required_dataset_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        let result: Result<Vec<EnrichedLead>> = store.read_records_required("absent.csv").await;
        assert!(matches!(result, Err(AppError::MissingInput(_))));
    }

    #[tokio::test]
    async fn test_read_rows_nulls_blank_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        store
            .write_records(ENRICHED_LEADS, &sample_leads())
            .await
            .unwrap();

        let rows = store.read_rows(ENRICHED_LEADS).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["name"], "Acme");
        // The second lead has a blank snippet; it must serialize as null.
        assert_eq!(rows[1]["snippet"], Value::Null);
    }

    #[tokio::test]
    async fn test_read_rows_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        assert!(store.read_rows("absent.csv").await.unwrap().is_empty());
    }
}
