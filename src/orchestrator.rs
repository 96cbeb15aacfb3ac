//! Batch training across all known entities
//!
//! Pulls the full transaction history once, groups it per entity, applies the
//! eligibility gate, and runs train-then-forecast for each eligible entity.
//! Entities are processed sequentially; one entity's failure is logged and
//! counted, never fatal to the batch.

use crate::engine::ForecastEngine;
use crate::error::Result;
use crate::series::{self, SeriesBuilder, TransactionRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Read-only source of raw sales transactions (the external ledger)
pub trait LedgerReader {
    /// One bulk pull of all available transaction history
    fn list_transactions(&self) -> Result<Vec<TransactionRecord>>;
}

/// Destination for produced forecasts; insert-or-replace keyed by entity
pub trait ForecastSink {
    fn upsert_forecast(&mut self, record: &ForecastRecord) -> Result<()>;
}

/// Optional name resolution for numeric entity keys
pub trait EntityDirectory {
    /// Human-readable display name for an entity key, when known
    fn find_entity(&self, entity_key: &str) -> Option<String>;
}

/// One live forecast per entity, replaced wholesale on retraining
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    /// The grouping key the batch ran under (name or numeric id)
    pub entity_key: String,
    /// Display name resolved through the directory, when available
    pub display_name: Option<String>,
    /// Forecast values, one per step
    pub values: Vec<f64>,
    /// The real-scale observations the forecast was seeded with
    pub recent_window: Vec<f64>,
    /// When the forecast was produced
    pub produced_at: DateTime<Utc>,
}

/// Outcome counts for one batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrainingReport {
    /// Entities trained, forecast, and upserted
    pub trained: usize,
    /// Entities skipped for eligibility, training, or per-entity failures
    pub skipped: usize,
}

/// Iterates over all entities in the ledger and trains each eligible one
pub struct TrainingOrchestrator {
    engine: ForecastEngine,
    builder: SeriesBuilder,
    directory: Option<Box<dyn EntityDirectory>>,
}

impl TrainingOrchestrator {
    /// Create an orchestrator grouping transactions with `builder` and
    /// training through `engine`
    pub fn new(engine: ForecastEngine, builder: SeriesBuilder) -> Self {
        Self {
            engine,
            builder,
            directory: None,
        }
    }

    /// Attach a directory for resolving display names of numeric keys
    pub fn with_directory(mut self, directory: Box<dyn EntityDirectory>) -> Self {
        self.directory = Some(directory);
        self
    }

    /// The engine this orchestrator trains through
    pub fn engine(&self) -> &ForecastEngine {
        &self.engine
    }

    /// Whether an entity's materialized series is worth training on: the span
    /// must cover at least `2 * window` days and the total quantity must be
    /// positive. This is the single documented threshold; all-zero or
    /// too-short histories are skipped.
    fn eligible(&self, entity_key: &str, series: &[f64]) -> Result<()> {
        let window = self.engine.window();
        if series.len() < 2 * window {
            return Err(crate::error::ForecastError::InsufficientData {
                entity: entity_key.to_string(),
                reason: format!(
                    "series spans {} days, need at least {}",
                    series.len(),
                    2 * window
                ),
            });
        }
        let total: f64 = series.iter().sum();
        if total <= 0.0 {
            return Err(crate::error::ForecastError::InsufficientData {
                entity: entity_key.to_string(),
                reason: "total quantity is zero".to_string(),
            });
        }
        Ok(())
    }

    /// Train and forecast every entity present in the ledger.
    ///
    /// For each eligible entity: train on its full materialized span, forecast
    /// one step from its own trailing window, and upsert the result. Returns
    /// the trained/skipped counts.
    pub fn run_all<L, S>(&self, ledger: &L, sink: &mut S) -> Result<TrainingReport>
    where
        L: LedgerReader,
        S: ForecastSink,
    {
        let transactions = ledger.list_transactions()?;
        if transactions.is_empty() {
            tracing::warn!("no transaction history available, nothing to train");
            return Ok(TrainingReport::default());
        }
        tracing::info!(
            transactions = transactions.len(),
            key_mode = ?self.builder.key_mode(),
            "starting batch training"
        );

        let daily = self.builder.build(&transactions);
        let mut report = TrainingReport::default();

        for (entity_key, day_map) in &daily {
            let (start, end) = match series::span(day_map) {
                Some(span) => span,
                None => {
                    // Unreachable for groups built from real records, but a
                    // skip keeps the batch total honest.
                    report.skipped += 1;
                    continue;
                }
            };
            let materialized = series::materialize(day_map, start, end);

            if let Err(reason) = self.eligible(entity_key, &materialized) {
                tracing::info!(entity = %entity_key, reason = %reason, "skipping entity");
                report.skipped += 1;
                continue;
            }

            match self.train_and_forecast(entity_key, &materialized, day_map, start, end, sink) {
                Ok(true) => report.trained += 1,
                Ok(false) => report.skipped += 1,
                Err(e) => {
                    tracing::warn!(entity = %entity_key, error = %e, "entity failed, continuing batch");
                    report.skipped += 1;
                }
            }
        }

        tracing::info!(
            trained = report.trained,
            skipped = report.skipped,
            "batch training finished"
        );
        Ok(report)
    }

    /// One entity's train-then-forecast unit. `Ok(false)` means the engine
    /// declined to train (insufficient data).
    fn train_and_forecast<S: ForecastSink>(
        &self,
        entity_key: &str,
        materialized: &[f64],
        day_map: &series::DailySeries,
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
        sink: &mut S,
    ) -> Result<bool> {
        if self.engine.train(entity_key, materialized)?.is_none() {
            return Ok(false);
        }

        let window = self.engine.window();
        let recent = series::recent_window(day_map, start, end, window);
        let values = self.engine.forecast(entity_key, &recent, 1)?;

        let record = ForecastRecord {
            entity_key: entity_key.to_string(),
            display_name: self
                .directory
                .as_ref()
                .and_then(|d| d.find_entity(entity_key)),
            values,
            recent_window: recent,
            produced_at: Utc::now(),
        };
        sink.upsert_forecast(&record)?;

        tracing::info!(entity = %entity_key, forecast = ?record.values, "forecast upserted");
        Ok(true)
    }
}
