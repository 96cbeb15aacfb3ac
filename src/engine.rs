//! Training and inference orchestration for a single entity
//!
//! Training: scale the series, build the windowed dataset, fit the regressor,
//! persist the bundle. Inference: load the bundle, scale the caller's recent
//! window, predict recursively for the requested number of steps, and invert
//! every prediction back to the real scale.

use crate::error::{ForecastError, Result};
use crate::models::recurrent::{RecurrentConfig, TrainedRecurrentModel};
use crate::models::{SequenceModel, SequenceRegressor};
use crate::store::{ModelBundle, ModelStore};
use crate::{dataset, scaler};
use std::path::PathBuf;

/// Default input window width, in days
pub const DEFAULT_WINDOW: usize = 14;

/// Engine configuration: window width plus the regressor to fit
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Consecutive daily observations per model input
    pub window: usize,
    /// Regressor configuration used for every entity
    pub model: RecurrentConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            model: RecurrentConfig::default(),
        }
    }
}

/// Trains, persists, and serves one sequence model per entity
#[derive(Debug)]
pub struct ForecastEngine {
    store: ModelStore,
    config: EngineConfig,
}

impl ForecastEngine {
    /// Create an engine with the default window and regressor
    pub fn new(store: ModelStore) -> Self {
        Self {
            store,
            config: EngineConfig::default(),
        }
    }

    /// Create an engine with a custom configuration
    pub fn with_config(store: ModelStore, config: EngineConfig) -> Result<Self> {
        if config.window == 0 {
            return Err(ForecastError::InvalidParameter(
                "Window must be positive".to_string(),
            ));
        }
        Ok(Self { store, config })
    }

    /// The model store backing this engine
    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    /// Input window width models are trained with
    pub fn window(&self) -> usize {
        self.config.window
    }

    /// Train a model on an entity's gap-free daily series and persist it.
    ///
    /// Returns `Ok(None)` when the series yields no windowed examples; that is
    /// the expected insufficient-data outcome, logged here, and batch callers
    /// skip the entity rather than fail.
    pub fn train(&self, entity_key: &str, series: &[f64]) -> Result<Option<PathBuf>> {
        let (scaled, params) = scaler::fit(series);
        let examples = dataset::build(&scaled, self.config.window);
        if examples.is_empty() {
            tracing::info!(
                entity = entity_key,
                days = series.len(),
                window = self.config.window,
                "insufficient data, skipping training"
            );
            return Ok(None);
        }

        tracing::info!(
            entity = entity_key,
            days = series.len(),
            examples = examples.len(),
            "training model"
        );
        let trained = self.config.model.fit(&examples)?;

        let bundle = ModelBundle {
            topology: trained.topology(),
            weights: trained.weight_vec(),
            scaler: params,
        };
        let path = self.store.save(entity_key, &bundle)?;
        Ok(Some(path))
    }

    /// Forecast `steps` future values from an entity's trained model and its
    /// recent real-scale observations.
    ///
    /// The recent window must hold at least the model's window width; longer
    /// inputs use the trailing values. Predictions are made recursively, each
    /// step feeding the previous prediction back into the window, and every
    /// returned value is inverted to the real scale.
    pub fn forecast(
        &self,
        entity_key: &str,
        recent_window_real: &[f64],
        steps: usize,
    ) -> Result<Vec<f64>> {
        let bundle = self.store.load(entity_key)?;
        let model =
            TrainedRecurrentModel::from_parts(&bundle.topology, &bundle.weights).map_err(|e| {
                tracing::warn!(entity = entity_key, cause = %e, "persisted bundle unusable");
                ForecastError::ModelNotFound {
                    entity: entity_key.to_string(),
                }
            })?;

        let window = model.window();
        if recent_window_real.len() < window {
            return Err(ForecastError::InsufficientWindow {
                expected: window,
                actual: recent_window_real.len(),
            });
        }

        let tail = &recent_window_real[recent_window_real.len() - window..];
        let seed: Vec<f64> = tail.iter().map(|&v| scaler::apply(v, &bundle.scaler)).collect();

        let predictions = recursive_forecast(&model, &seed, steps)?;
        Ok(predictions
            .into_iter()
            .map(|p| scaler::invert(p, &bundle.scaler))
            .collect())
    }
}

/// Recursive multi-step prediction in scaled space.
///
/// Each step predicts from the current window, then slides the window by
/// appending the prediction and dropping the oldest value, so later steps are
/// conditioned on earlier predictions.
pub fn recursive_forecast<M: SequenceRegressor>(
    model: &M,
    seed_window: &[f64],
    steps: usize,
) -> Result<Vec<f64>> {
    let mut window = seed_window.to_vec();
    let mut predictions = Vec::with_capacity(steps);

    for _ in 0..steps {
        let next = model.predict_next(&window)?;
        predictions.push(next);
        window.push(next);
        window.remove(0);
    }

    Ok(predictions)
}
