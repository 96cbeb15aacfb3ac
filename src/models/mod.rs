//! Sequence regression models for demand forecasting
//!
//! A model consumes a fixed-size window of scaled daily observations and
//! predicts the next scaled value. Any regressor satisfying that shape
//! contract plugs into the engine; the recurrent network in [`recurrent`] is
//! the reference implementation.

use crate::dataset::WindowedExample;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Shape metadata persisted with a trained model so it can be rebuilt before
/// its weights are loaded back in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelTopology {
    /// Architecture discriminator, e.g. `"elman_rnn"`
    pub kind: String,
    /// Input window width the model was trained with
    pub window: usize,
    /// Hidden state width
    pub hidden: usize,
}

/// A trained sequence regressor
pub trait SequenceRegressor: Debug {
    /// Predict the next scaled value from a window of scaled observations.
    ///
    /// Inputs longer than the model's window use the trailing values; shorter
    /// inputs are a caller error.
    fn predict_next(&self, window: &[f64]) -> Result<f64>;

    /// Input window width this model expects
    fn window(&self) -> usize;

    /// Name of the model
    fn name(&self) -> &str;
}

/// A model configuration that can be fitted on windowed examples
pub trait SequenceModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: SequenceRegressor;

    /// Fit the model on a non-empty set of windowed examples
    fn fit(&self, examples: &[WindowedExample]) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod recurrent;
