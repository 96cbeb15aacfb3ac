//! Daily demand series construction from raw sales transactions
//!
//! Raw ledger rows are irregular: several sales can land on the same day, whole
//! weeks can have none, and some rows arrive without a usable timestamp. This
//! module groups rows per entity, sums quantities per calendar day, and
//! materializes gap-free scalar series over an inclusive date span.

use chrono::{Duration, NaiveDate, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One raw sales transaction as delivered by the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Numeric product identifier, when the ledger knows it
    pub product_id: Option<i64>,
    /// Display name of the product, when the ledger knows it
    pub product_name: Option<String>,
    /// Quantity sold
    pub quantity: f64,
    /// Calendar day of the sale; `None` means the ledger lost the timestamp
    pub date: Option<NaiveDate>,
}

/// Per-day summed quantity for one entity. Days with no sales are absent;
/// materialization substitutes zero for them.
pub type DailySeries = BTreeMap<NaiveDate, f64>;

/// Which field of a transaction identifies the entity being forecast.
///
/// Threaded through grouping and model storage so the identity scheme stays
/// consistent end-to-end. `ById` is the recommended mode: numeric ids survive
/// storage-path sanitization unchanged, while display names can collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyMode {
    /// Group by product display name
    ByName,
    /// Group by numeric product id
    ById,
}

/// Policy for records whose timestamp is missing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFill {
    /// Attribute the sale to today. Deterministic; the production default.
    Today,
    /// Attribute the sale to a seeded-random day within the trailing 90 days.
    /// Only for exercising training on sparse fixtures; never the default.
    SyntheticRecent { seed: u64 },
}

/// How far back `DateFill::SyntheticRecent` may scatter undated records
const SYNTHETIC_FILL_DAYS: i64 = 90;

/// Groups raw transactions into per-entity daily series
#[derive(Debug, Clone)]
pub struct SeriesBuilder {
    key_mode: KeyMode,
    date_fill: DateFill,
}

impl SeriesBuilder {
    /// Create a builder grouping by the given key mode, with deterministic
    /// date handling
    pub fn new(key_mode: KeyMode) -> Self {
        Self {
            key_mode,
            date_fill: DateFill::Today,
        }
    }

    /// Opt in to a non-default policy for missing timestamps
    pub fn with_date_fill(mut self, date_fill: DateFill) -> Self {
        self.date_fill = date_fill;
        self
    }

    /// The key mode this builder groups by
    pub fn key_mode(&self) -> KeyMode {
        self.key_mode
    }

    /// Group records by entity key and accumulate quantity per calendar day.
    ///
    /// Records missing the key field fall back to a synthetic
    /// `Unknown_<other-field>` key so they are never silently dropped.
    /// Non-finite quantities count as zero.
    pub fn build(&self, records: &[TransactionRecord]) -> BTreeMap<String, DailySeries> {
        let today = Utc::now().date_naive();
        let mut rng = match self.date_fill {
            DateFill::SyntheticRecent { seed } => Some(StdRng::seed_from_u64(seed)),
            DateFill::Today => None,
        };

        let mut series: BTreeMap<String, DailySeries> = BTreeMap::new();
        for tx in records {
            let date = match tx.date {
                Some(d) => d,
                None => match rng.as_mut() {
                    Some(rng) => today - Duration::days(rng.gen_range(0..SYNTHETIC_FILL_DAYS)),
                    None => today,
                },
            };

            let qty = if tx.quantity.is_finite() {
                tx.quantity
            } else {
                0.0
            };

            let key = self.entity_key(tx);
            *series.entry(key).or_default().entry(date).or_insert(0.0) += qty;
        }

        series
    }

    /// Resolve the grouping key for one record, with the unknown-key fallback
    fn entity_key(&self, tx: &TransactionRecord) -> String {
        match self.key_mode {
            KeyMode::ById => match tx.product_id {
                Some(id) => id.to_string(),
                None => format!(
                    "Unknown_{}",
                    tx.product_name.as_deref().unwrap_or("unknown")
                ),
            },
            KeyMode::ByName => match tx.product_name.as_deref() {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => format!(
                    "Unknown_{}",
                    tx.product_id
                        .map(|id| id.to_string())
                        .unwrap_or_else(|| "unknown".to_string())
                ),
            },
        }
    }
}

/// Materialize a daily series into a gap-free scalar series over the
/// inclusive `[start, end]` span.
///
/// Every calendar day in the span gets exactly one slot: the summed quantity
/// when present and finite, zero otherwise. The result has
/// `days_between(start, end) + 1` entries; an inverted span yields an empty
/// series.
pub fn materialize(day_map: &DailySeries, start: NaiveDate, end: NaiveDate) -> Vec<f64> {
    let mut series = Vec::new();
    let mut day = start;
    while day <= end {
        let value = match day_map.get(&day) {
            Some(v) if v.is_finite() => *v,
            _ => 0.0,
        };
        series.push(value);
        day = day + Duration::days(1);
    }
    series
}

/// Materialize the trailing `window` days of `[start, end]`, used to seed
/// inference with an entity's most recent observations.
pub fn recent_window(
    day_map: &DailySeries,
    start: NaiveDate,
    end: NaiveDate,
    window: usize,
) -> Vec<f64> {
    let series = materialize(day_map, start, end);
    let skip = series.len().saturating_sub(window);
    series[skip..].to_vec()
}

/// First and last observed dates of a daily series, if it has any
pub fn span(day_map: &DailySeries) -> Option<(NaiveDate, NaiveDate)> {
    let first = *day_map.keys().next()?;
    let last = *day_map.keys().next_back()?;
    Some((first, last))
}
