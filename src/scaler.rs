//! Min-max normalization with persisted parameters
//!
//! Model inputs and outputs live in scaled space; everything user-visible is
//! inverted back through the same parameters the model was trained with.
//! Parameters are valid only for the series they were fitted on, so the model
//! store persists them alongside the weights as one bundle.

use serde::{Deserialize, Serialize};

/// Min-max parameters fitted on a training series, persisted next to the model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalerParams {
    pub min: f64,
    pub max: f64,
}

impl ScalerParams {
    /// Effective scaling range. A flat series has `max == min`; treating the
    /// range as 1 keeps both directions finite and maps the whole series to 0.
    fn range(&self) -> f64 {
        let range = self.max - self.min;
        if range == 0.0 {
            1.0
        } else {
            range
        }
    }
}

/// Fit min-max parameters on a series and return the scaled series with them.
///
/// Empty input fits a degenerate `{0, 0}` parameter set.
pub fn fit(series: &[f64]) -> (Vec<f64>, ScalerParams) {
    let min = series.iter().copied().fold(f64::INFINITY, f64::min);
    let max = series.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let params = if series.is_empty() {
        ScalerParams { min: 0.0, max: 0.0 }
    } else {
        ScalerParams { min, max }
    };

    let scaled = series.iter().map(|&v| apply(v, &params)).collect();
    (scaled, params)
}

/// Scale one real value into model space
pub fn apply(value: f64, params: &ScalerParams) -> f64 {
    (value - params.min) / params.range()
}

/// Map one model-space value back to the real scale. Must be called on every
/// model output before it is reported or persisted.
pub fn invert(value: f64, params: &ScalerParams) -> f64 {
    value * params.range() + params.min
}
