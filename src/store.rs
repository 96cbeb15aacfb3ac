//! On-disk persistence for trained model bundles
//!
//! One directory per entity under an injected base path, holding three files:
//! `topology.json` (architecture metadata), `weights.bin` (raw little-endian
//! f64 weights, kept binary so large weight blobs are never re-encoded as
//! text), and `scaler.json` (the min-max parameters the model was trained
//! with). The three are written as one atomic set: a save stages them in a
//! temp directory and renames it into place, and a load treats any missing or
//! corrupt member as "no model", never a mixed old/new bundle.

use crate::error::{ForecastError, Result};
use crate::models::ModelTopology;
use crate::scaler::ScalerParams;
use std::fs;
use std::path::{Path, PathBuf};

/// File names inside a bundle directory
const TOPOLOGY_FILE: &str = "topology.json";
const WEIGHTS_FILE: &str = "weights.bin";
const SCALER_FILE: &str = "scaler.json";

/// Everything persisted for one trained entity
#[derive(Debug, Clone, PartialEq)]
pub struct ModelBundle {
    pub topology: ModelTopology,
    pub weights: Vec<f64>,
    pub scaler: ScalerParams,
}

/// Persists and loads model bundles under a base directory
#[derive(Debug, Clone)]
pub struct ModelStore {
    base: PathBuf,
}

impl ModelStore {
    /// Create a store rooted at `base`. The directory is created on first save.
    pub fn new<P: Into<PathBuf>>(base: P) -> Self {
        Self { base: base.into() }
    }

    /// Directory a given entity's bundle lives in (whether or not it exists)
    pub fn bundle_dir(&self, entity_key: &str) -> PathBuf {
        self.base.join(sanitize_key(entity_key))
    }

    /// Whether a bundle directory exists for the entity
    pub fn contains(&self, entity_key: &str) -> bool {
        self.bundle_dir(entity_key).is_dir()
    }

    /// Persist a bundle for the entity, fully replacing any prior bundle.
    ///
    /// Distinct entity keys that sanitize to the same storage key share a
    /// bundle directory, so the later save overwrites the earlier one. Keying
    /// by numeric id avoids this; see [`sanitize_key`].
    pub fn save(&self, entity_key: &str, bundle: &ModelBundle) -> Result<PathBuf> {
        fs::create_dir_all(&self.base)?;

        let safe_key = sanitize_key(entity_key);
        let final_dir = self.base.join(&safe_key);
        let staging_dir = self.base.join(format!("{}.staging", safe_key));

        // Stage the full bundle before touching the live directory
        if staging_dir.exists() {
            fs::remove_dir_all(&staging_dir)?;
        }
        fs::create_dir(&staging_dir)?;
        fs::write(
            staging_dir.join(TOPOLOGY_FILE),
            serde_json::to_string_pretty(&bundle.topology)?,
        )?;
        fs::write(staging_dir.join(WEIGHTS_FILE), weights_to_bytes(&bundle.weights))?;
        fs::write(
            staging_dir.join(SCALER_FILE),
            serde_json::to_string_pretty(&bundle.scaler)?,
        )?;

        if final_dir.exists() {
            fs::remove_dir_all(&final_dir)?;
        }
        fs::rename(&staging_dir, &final_dir)?;

        tracing::info!(
            entity = entity_key,
            path = %final_dir.display(),
            weights = bundle.weights.len(),
            "saved model bundle"
        );
        Ok(final_dir)
    }

    /// Load the entity's bundle.
    ///
    /// A missing directory, a missing member file, or a corrupt member all
    /// surface as [`ForecastError::ModelNotFound`]; the underlying cause is
    /// logged so absence and corruption stay distinguishable in logs.
    pub fn load(&self, entity_key: &str) -> Result<ModelBundle> {
        let dir = self.bundle_dir(entity_key);
        if !dir.is_dir() {
            tracing::debug!(entity = entity_key, path = %dir.display(), "no bundle directory");
            return Err(ForecastError::ModelNotFound {
                entity: entity_key.to_string(),
            });
        }

        let topology: ModelTopology = match read_json(&dir.join(TOPOLOGY_FILE)) {
            Ok(t) => t,
            Err(e) => return Err(self.corrupt(entity_key, TOPOLOGY_FILE, e)),
        };
        let scaler: ScalerParams = match read_json(&dir.join(SCALER_FILE)) {
            Ok(s) => s,
            Err(e) => return Err(self.corrupt(entity_key, SCALER_FILE, e)),
        };
        let weights = match fs::read(dir.join(WEIGHTS_FILE)) {
            Ok(bytes) => match weights_from_bytes(&bytes) {
                Some(w) => w,
                None => {
                    return Err(self.corrupt(
                        entity_key,
                        WEIGHTS_FILE,
                        ForecastError::DataError(format!(
                            "weight file length {} is not a multiple of 8",
                            bytes.len()
                        )),
                    ))
                }
            },
            Err(e) => return Err(self.corrupt(entity_key, WEIGHTS_FILE, e.into())),
        };

        Ok(ModelBundle {
            topology,
            weights,
            scaler,
        })
    }

    /// Log a partial/corrupt bundle at warn and collapse it to `ModelNotFound`
    fn corrupt(&self, entity_key: &str, file: &str, cause: ForecastError) -> ForecastError {
        tracing::warn!(
            entity = entity_key,
            file = file,
            cause = %cause,
            "model bundle is partial or corrupt, treating as not found"
        );
        ForecastError::ModelNotFound {
            entity: entity_key.to_string(),
        }
    }
}

/// Derive the storage identity for an entity key: lowercase, every run of
/// characters outside `[a-z0-9]` collapsed to a single `_`, leading and
/// trailing `_` trimmed, and `unknown` for keys that sanitize to nothing.
///
/// Distinct keys can collide after sanitization (`"Widget #1"` and
/// `"Widget-1"` both become `widget_1`); the store does not disambiguate
/// them, which is why id-based keys are preferred.
pub fn sanitize_key(entity_key: &str) -> String {
    let mut safe = String::with_capacity(entity_key.len());
    let mut last_was_sep = false;
    for ch in entity_key.chars() {
        let lower = ch.to_ascii_lowercase();
        if lower.is_ascii_lowercase() || lower.is_ascii_digit() {
            safe.push(lower);
            last_was_sep = false;
        } else if !last_was_sep {
            safe.push('_');
            last_was_sep = true;
        }
    }

    let trimmed = safe.trim_matches('_');
    if trimmed.is_empty() {
        "unknown".to_string()
    } else {
        trimmed.to_string()
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn weights_to_bytes(weights: &[f64]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(weights.len() * 8);
    for w in weights {
        bytes.extend_from_slice(&w.to_le_bytes());
    }
    bytes
}

fn weights_from_bytes(bytes: &[u8]) -> Option<Vec<f64>> {
    if bytes.len() % 8 != 0 {
        return None;
    }
    Some(
        bytes
            .chunks_exact(8)
            .map(|chunk| f64::from_le_bytes(chunk.try_into().expect("8-byte chunk")))
            .collect(),
    )
}
