//! # Demand Forecast
//!
//! A Rust library for forecasting near-future inventory demand from historical
//! sales transactions.
//!
//! ## Features
//!
//! - Irregular sales events to gap-free daily series (zero-filled)
//! - Min-max scaling with parameters persisted per trained model
//! - Sliding-window supervised dataset construction
//! - A seeded, deterministic recurrent regressor with a dense output head
//! - Atomic on-disk model bundles keyed by sanitized entity identity
//! - Recursive single- and multi-step forecasting
//! - Batch training across all entities with per-entity failure isolation
//!
//! ## Pipeline
//!
//! Raw sales rows flow through `SeriesBuilder` into per-entity daily series,
//! are materialized into gap-free scalar series, windowed into supervised
//! pairs, fitted, and persisted. Inference loads a bundle, scales a recent
//! observation window, predicts recursively, and inverts every prediction
//! back to the real scale.
//!
//! ## Quick Start
//!
//! ```no_run
//! use demand_forecast::engine::ForecastEngine;
//! use demand_forecast::ledger::{MemoryLedger, MemorySink};
//! use demand_forecast::orchestrator::TrainingOrchestrator;
//! use demand_forecast::series::{KeyMode, SeriesBuilder};
//! use demand_forecast::store::ModelStore;
//!
//! # fn main() -> demand_forecast::error::Result<()> {
//! // Point the store at the directory trained models should live in
//! let store = ModelStore::new("models_saved");
//! let engine = ForecastEngine::new(store);
//!
//! // Train every entity in the ledger and upsert one forecast each
//! let ledger = MemoryLedger::new(load_sales());
//! let mut sink = MemorySink::new();
//! let orchestrator =
//!     TrainingOrchestrator::new(engine, SeriesBuilder::new(KeyMode::ById));
//! let report = orchestrator.run_all(&ledger, &mut sink)?;
//! println!("trained {}, skipped {}", report.trained, report.skipped);
//! # Ok(())
//! # }
//! # fn load_sales() -> Vec<demand_forecast::series::TransactionRecord> { Vec::new() }
//! ```

pub mod dataset;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod models;
pub mod orchestrator;
pub mod scaler;
pub mod series;
pub mod store;

// Re-export commonly used types
pub use crate::engine::ForecastEngine;
pub use crate::error::ForecastError;
pub use crate::models::{SequenceModel, SequenceRegressor};
pub use crate::orchestrator::{ForecastRecord, TrainingOrchestrator, TrainingReport};
pub use crate::series::{KeyMode, SeriesBuilder, TransactionRecord};
pub use crate::store::ModelStore;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
