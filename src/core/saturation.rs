//! Saturation point detection.
//!
//! A curve saturates at the first module index from which `window`
//! consecutive relative deltas all stay strictly below `threshold`.

use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SaturationParams {
    /// Relative change considered negligible (exclusive bound).
    pub threshold: f64,
    /// Number of consecutive negligible deltas required.
    pub window: usize,
}

impl Default for SaturationParams {
    fn default() -> Self {
        Self {
            threshold: 0.01,
            window: 10,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SaturationError {
    #[error("module {module} has non-positive access time {value}")]
    NonPositive { module: usize, value: f64 },
}

/// Reject samples that would break relative deltas or a log axis.
pub fn validate_positive(values: &[f64]) -> Result<(), SaturationError> {
    match values
        .iter()
        .enumerate()
        .find(|(_, v)| !(v.is_finite() && **v > 0.0))
    {
        Some((i, &value)) => Err(SaturationError::NonPositive {
            module: i + 1,
            value,
        }),
        None => Ok(()),
    }
}

/// `|v[i+1] - v[i]| / v[i]` for each consecutive pair.
pub fn relative_deltas(values: &[f64]) -> Result<Vec<f64>, SaturationError> {
    validate_positive(values)?;
    Ok(values
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).abs() / pair[0])
        .collect())
}

/// First 1-based module index where the curve stops improving, if any.
pub fn find_saturation_point(
    values: &[f64],
    params: &SaturationParams,
) -> Result<Option<usize>, SaturationError> {
    let deltas = relative_deltas(values)?;
    Ok(first_stable_window(&deltas, params).map(|i| i + 1))
}

fn first_stable_window(deltas: &[f64], params: &SaturationParams) -> Option<usize> {
    let w = params.window;
    let scan = deltas.len().saturating_sub(w);
    (0..scan).find(|&i| deltas[i..i + w].iter().all(|&d| d < params.threshold))
}
