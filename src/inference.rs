//! Inference adapter around the opaque regression model.

use crate::assembler::FeatureVector;
use crate::error::{Result, TasadorError};
use crate::traits::Regressor;
use std::fmt;
use tracing::debug;

/// Rounds a raw prediction to 2 decimal places for display.
///
/// ```
/// use tasador::inference::round_price;
///
/// assert_eq!(round_price(250_000.004), 250_000.0);
/// assert_eq!(round_price(180_000.456), 180_000.46);
/// ```
#[must_use]
pub fn round_price(raw: f64) -> f64 {
    (raw * 100.0).round() / 100.0
}

/// Single-row prediction over a shared model.
pub struct InferenceAdapter {
    model: Box<dyn Regressor>,
}

impl fmt::Debug for InferenceAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceAdapter")
            .field("n_features", &self.model.n_features())
            .finish()
    }
}

impl InferenceAdapter {
    /// Wraps a loaded model.
    #[must_use]
    pub fn new(model: Box<dyn Regressor>) -> Self {
        Self { model }
    }

    /// Number of input columns the model declares, if any.
    #[must_use]
    pub fn n_features(&self) -> Option<usize> {
        self.model.n_features()
    }

    /// Predicts the price for one assembled row, rounded to 2 decimals.
    ///
    /// # Errors
    ///
    /// Returns `InferenceError` if the row width differs from the model's,
    /// the model call fails, or the model returns no value.
    pub fn predict(&self, vector: &FeatureVector) -> Result<f64> {
        if let Some(expected) = self.model.n_features() {
            if expected != vector.len() {
                return Err(TasadorError::inference(format!(
                    "model expects {expected} features, row has {}",
                    vector.len()
                )));
            }
        }

        let output = self.model.predict(&vector.to_row()).map_err(|e| match e {
            e @ TasadorError::InferenceError { .. } => e,
            other => TasadorError::inference(other),
        })?;

        let raw = output
            .first()
            .ok_or_else(|| TasadorError::inference("model returned no prediction"))?;
        if !raw.is_finite() {
            return Err(TasadorError::inference(format!("non-finite prediction {raw}")));
        }

        let price = round_price(raw);
        debug!(price, "prediction complete");
        Ok(price)
    }
}
