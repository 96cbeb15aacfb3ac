//! Supervised window dataset construction
//!
//! Slides a fixed-size window across a scalar series with stride 1, pairing
//! each window with the value that follows it.

/// One training pair: a window of consecutive observations and the next value
#[derive(Debug, Clone, PartialEq)]
pub struct WindowedExample {
    /// Exactly `window` consecutive scaled observations
    pub input: Vec<f64>,
    /// The observation immediately after the window
    pub target: f64,
}

/// Build the ordered set of windowed examples for a series.
///
/// Returns exactly `len - window` examples when `len > window`, and an empty
/// vector otherwise. Empty is the expected "insufficient data" signal, not an
/// error; batch callers skip the entity and move on.
pub fn build(series: &[f64], window: usize) -> Vec<WindowedExample> {
    if window == 0 || series.len() <= window {
        return Vec::new();
    }

    let mut examples = Vec::with_capacity(series.len() - window);
    for i in 0..series.len() - window {
        examples.push(WindowedExample {
            input: series[i..i + window].to_vec(),
            target: series[i + window],
        });
    }
    examples
}
