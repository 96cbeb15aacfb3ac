//! Ledger and sink implementations
//!
//! The pipeline only depends on the [`LedgerReader`]/[`ForecastSink`] traits;
//! this module provides a CSV-file ledger for batch jobs fed by exports, and
//! in-memory implementations for tests and demos.

use crate::error::Result;
use crate::orchestrator::{EntityDirectory, ForecastRecord, ForecastSink, LedgerReader};
use crate::series::TransactionRecord;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// CSV row shape: `product_id,product_name,qty,date`, empty fields allowed
#[derive(Debug, Deserialize)]
struct CsvRow {
    product_id: Option<i64>,
    product_name: Option<String>,
    qty: f64,
    date: Option<NaiveDate>,
}

/// Reads transaction history from a CSV export of the sales ledger
#[derive(Debug, Clone)]
pub struct CsvLedger {
    path: PathBuf,
}

impl CsvLedger {
    /// Create a ledger reading from the given CSV file
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl LedgerReader for CsvLedger {
    fn list_transactions(&self) -> Result<Vec<TransactionRecord>> {
        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut records = Vec::new();
        for row in reader.deserialize() {
            let row: CsvRow = row?;
            records.push(TransactionRecord {
                product_id: row.product_id,
                product_name: row.product_name.filter(|n| !n.is_empty()),
                quantity: row.qty,
                date: row.date,
            });
        }
        tracing::debug!(path = %self.path.display(), records = records.len(), "loaded ledger CSV");
        Ok(records)
    }
}

/// In-memory ledger, for tests and demos
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    records: Vec<TransactionRecord>,
}

impl MemoryLedger {
    pub fn new(records: Vec<TransactionRecord>) -> Self {
        Self { records }
    }
}

impl LedgerReader for MemoryLedger {
    fn list_transactions(&self) -> Result<Vec<TransactionRecord>> {
        Ok(self.records.clone())
    }
}

/// In-memory forecast sink with upsert semantics, keyed by entity
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: BTreeMap<String, ForecastRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The live forecast for an entity, if one has been upserted
    pub fn get(&self, entity_key: &str) -> Option<&ForecastRecord> {
        self.records.get(entity_key)
    }

    /// Number of entities with a live forecast
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ForecastSink for MemorySink {
    fn upsert_forecast(&mut self, record: &ForecastRecord) -> Result<()> {
        self.records
            .insert(record.entity_key.clone(), record.clone());
        Ok(())
    }
}

/// In-memory entity directory mapping keys to display names
#[derive(Debug, Clone, Default)]
pub struct MemoryDirectory {
    names: BTreeMap<String, String>,
}

impl MemoryDirectory {
    pub fn new(names: BTreeMap<String, String>) -> Self {
        Self { names }
    }
}

impl EntityDirectory for MemoryDirectory {
    fn find_entity(&self, entity_key: &str) -> Option<String> {
        self.names.get(entity_key).cloned()
    }
}
