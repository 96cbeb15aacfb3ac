//! Elman recurrent network with a dense output head
//!
//! A single recurrent layer of `tanh` units reads the window one scalar at a
//! time; a dense head maps the final hidden state to one output. Training is
//! plain stochastic gradient descent on mean squared error with
//! backpropagation through time, deterministic for a fixed seed.

use crate::dataset::WindowedExample;
use crate::error::{ForecastError, Result};
use crate::models::{ModelTopology, SequenceModel, SequenceRegressor};
use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Architecture discriminator written into persisted topology files
pub const ELMAN_RNN_KIND: &str = "elman_rnn";

/// Bound on the output-error term, to keep SGD stable on tiny datasets
const GRAD_CLIP: f64 = 5.0;

/// Configuration for the recurrent regressor
#[derive(Debug, Clone)]
pub struct RecurrentConfig {
    /// Name of the model
    name: String,
    /// Hidden state width
    hidden: usize,
    /// Full passes over the training examples
    epochs: usize,
    /// SGD step size
    learning_rate: f64,
    /// Seed for weight initialization
    seed: u64,
}

impl Default for RecurrentConfig {
    fn default() -> Self {
        Self {
            name: "Elman RNN (hidden=16)".to_string(),
            hidden: 16,
            epochs: 40,
            learning_rate: 0.05,
            seed: 42,
        }
    }
}

impl RecurrentConfig {
    /// Create a configuration with the given hidden width
    pub fn new(hidden: usize) -> Result<Self> {
        if hidden == 0 {
            return Err(ForecastError::InvalidParameter(
                "Hidden width must be positive".to_string(),
            ));
        }

        Ok(Self {
            name: format!("Elman RNN (hidden={})", hidden),
            hidden,
            ..Self::default()
        })
    }

    /// Set the number of training epochs
    pub fn with_epochs(mut self, epochs: usize) -> Result<Self> {
        if epochs == 0 {
            return Err(ForecastError::InvalidParameter(
                "Epochs must be positive".to_string(),
            ));
        }
        self.epochs = epochs;
        Ok(self)
    }

    /// Set the SGD learning rate
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Result<Self> {
        if learning_rate <= 0.0 || !learning_rate.is_finite() {
            return Err(ForecastError::InvalidParameter(
                "Learning rate must be positive".to_string(),
            ));
        }
        self.learning_rate = learning_rate;
        Ok(self)
    }

    /// Set the initialization seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Trained recurrent regressor
///
/// Weight layout, also used for the flat persisted vector:
/// input-to-hidden `wx[h]`, hidden-to-hidden `wh[h * hidden + h']` (row per
/// target unit), hidden bias `bh[h]`, output head `wo[h]`, output bias `bo`.
#[derive(Debug, Clone)]
pub struct TrainedRecurrentModel {
    name: String,
    window: usize,
    hidden: usize,
    wx: Vec<f64>,
    wh: Vec<f64>,
    bh: Vec<f64>,
    wo: Vec<f64>,
    bo: f64,
}

impl SequenceModel for RecurrentConfig {
    type Trained = TrainedRecurrentModel;

    fn fit(&self, examples: &[WindowedExample]) -> Result<TrainedRecurrentModel> {
        let window = match examples.first() {
            Some(first) => first.input.len(),
            None => {
                return Err(ForecastError::DataError(
                    "Cannot fit on an empty example set".to_string(),
                ))
            }
        };
        if window == 0 {
            return Err(ForecastError::DataError(
                "Windowed examples have empty inputs".to_string(),
            ));
        }
        if examples.iter().any(|ex| ex.input.len() != window) {
            return Err(ForecastError::DataError(
                "Windowed examples have inconsistent widths".to_string(),
            ));
        }

        let h = self.hidden;
        let mut rng = StdRng::seed_from_u64(self.seed);
        let init = Normal::new(0.0, 0.1).map_err(|e| {
            ForecastError::InvalidParameter(format!("Weight init distribution: {}", e))
        })?;

        let mut model = TrainedRecurrentModel {
            name: self.name.clone(),
            window,
            hidden: h,
            wx: (0..h).map(|_| init.sample(&mut rng)).collect(),
            wh: (0..h * h).map(|_| init.sample(&mut rng)).collect(),
            bh: vec![0.0; h],
            wo: (0..h).map(|_| init.sample(&mut rng)).collect(),
            bo: 0.0,
        };

        let mut last_epoch_loss = 0.0;
        for _ in 0..self.epochs {
            let mut epoch_loss = 0.0;
            for example in examples {
                epoch_loss += model.sgd_step(example, self.learning_rate);
            }
            last_epoch_loss = epoch_loss / examples.len() as f64;
        }

        tracing::debug!(
            model = %self.name,
            examples = examples.len(),
            epochs = self.epochs,
            mse = last_epoch_loss,
            "fitted recurrent regressor"
        );

        Ok(model)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedRecurrentModel {
    /// Rebuild a trained model from persisted topology and a flat weight
    /// vector, validating both against the expected layout
    pub fn from_parts(topology: &ModelTopology, weights: &[f64]) -> Result<Self> {
        if topology.kind != ELMAN_RNN_KIND {
            return Err(ForecastError::DataError(format!(
                "Unknown model kind '{}'",
                topology.kind
            )));
        }
        if topology.window == 0 || topology.hidden == 0 {
            return Err(ForecastError::DataError(
                "Topology has zero window or hidden width".to_string(),
            ));
        }

        let h = topology.hidden;
        let expected = Self::weight_len(h);
        if weights.len() != expected {
            return Err(ForecastError::DataError(format!(
                "Weight vector length {} doesn't match topology ({} expected)",
                weights.len(),
                expected
            )));
        }

        let (wx, rest) = weights.split_at(h);
        let (wh, rest) = rest.split_at(h * h);
        let (bh, rest) = rest.split_at(h);
        let (wo, rest) = rest.split_at(h);

        Ok(Self {
            name: format!("Elman RNN (hidden={})", h),
            window: topology.window,
            hidden: h,
            wx: wx.to_vec(),
            wh: wh.to_vec(),
            bh: bh.to_vec(),
            wo: wo.to_vec(),
            bo: rest[0],
        })
    }

    /// Topology metadata for persistence
    pub fn topology(&self) -> ModelTopology {
        ModelTopology {
            kind: ELMAN_RNN_KIND.to_string(),
            window: self.window,
            hidden: self.hidden,
        }
    }

    /// Flatten the weights into the persisted layout
    pub fn weight_vec(&self) -> Vec<f64> {
        let mut weights = Vec::with_capacity(Self::weight_len(self.hidden));
        weights.extend_from_slice(&self.wx);
        weights.extend_from_slice(&self.wh);
        weights.extend_from_slice(&self.bh);
        weights.extend_from_slice(&self.wo);
        weights.push(self.bo);
        weights
    }

    /// Flat weight vector length for a given hidden width
    pub fn weight_len(hidden: usize) -> usize {
        hidden * hidden + 3 * hidden + 1
    }

    /// Run the window through the recurrent layer, returning the hidden state
    /// after every step and the dense-head output
    fn forward(&self, input: &[f64]) -> (Vec<Vec<f64>>, f64) {
        let h = self.hidden;
        let mut states = Vec::with_capacity(input.len());
        let mut prev = vec![0.0; h];

        for &x in input {
            let mut state = vec![0.0; h];
            for i in 0..h {
                let mut pre = self.wx[i] * x + self.bh[i];
                for j in 0..h {
                    pre += self.wh[i * h + j] * prev[j];
                }
                state[i] = pre.tanh();
            }
            states.push(state.clone());
            prev = state;
        }

        let last = states.last().expect("non-empty window");
        let output = self.wo.iter().zip(last).map(|(w, s)| w * s).sum::<f64>() + self.bo;
        (states, output)
    }

    /// One SGD update with backpropagation through time; returns the squared
    /// error before the update
    fn sgd_step(&mut self, example: &WindowedExample, lr: f64) -> f64 {
        let h = self.hidden;
        let (states, output) = self.forward(&example.input);
        let err = output - example.target;
        let d_out = (2.0 * err).clamp(-GRAD_CLIP, GRAD_CLIP);

        let mut g_wx = vec![0.0; h];
        let mut g_wh = vec![0.0; h * h];
        let mut g_bh = vec![0.0; h];

        // Output head gradients, and the seed for the backward recurrence
        let last = &states[states.len() - 1];
        let g_wo: Vec<f64> = last.iter().map(|s| d_out * s).collect();
        let g_bo = d_out;
        let mut d_state: Vec<f64> = self.wo.iter().map(|w| d_out * w).collect();

        for t in (0..example.input.len()).rev() {
            let state = &states[t];
            let prev: &[f64] = if t == 0 { &[] } else { &states[t - 1] };

            let mut d_prev = vec![0.0; h];
            for i in 0..h {
                let d_pre = d_state[i] * (1.0 - state[i] * state[i]);
                g_wx[i] += d_pre * example.input[t];
                g_bh[i] += d_pre;
                for j in 0..h {
                    let prev_j = if t == 0 { 0.0 } else { prev[j] };
                    g_wh[i * h + j] += d_pre * prev_j;
                    d_prev[j] += self.wh[i * h + j] * d_pre;
                }
            }
            d_state = d_prev;
        }

        for i in 0..h {
            self.wx[i] -= lr * g_wx[i];
            self.bh[i] -= lr * g_bh[i];
            self.wo[i] -= lr * g_wo[i];
        }
        for k in 0..h * h {
            self.wh[k] -= lr * g_wh[k];
        }
        self.bo -= lr * g_bo;

        err * err
    }
}

impl SequenceRegressor for TrainedRecurrentModel {
    fn predict_next(&self, window: &[f64]) -> Result<f64> {
        if window.len() < self.window {
            return Err(ForecastError::InsufficientWindow {
                expected: self.window,
                actual: window.len(),
            });
        }

        let tail = &window[window.len() - self.window..];
        let (_, output) = self.forward(tail);
        Ok(output)
    }

    fn window(&self) -> usize {
        self.window
    }

    fn name(&self) -> &str {
        &self.name
    }
}
