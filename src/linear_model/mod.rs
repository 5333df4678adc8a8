//! Linear models for regression.
//!
//! Holds the fitted parameters of an ordinary least squares model. Fitting
//! happens offline; this crate only loads and applies the result.

use crate::error::{Result, TasadorError};
use crate::primitives::{Matrix, Vector};
use crate::traits::Regressor;
use serde::{Deserialize, Serialize};

/// A fitted linear regression model.
///
/// The model equation is:
///
/// ```text
/// y = X β + b
/// ```
///
/// where `β` is the coefficient vector and `b` the intercept. Coefficients
/// are positional: column `j` of `X` must be the feature the model was
/// trained with at position `j`.
///
/// # Examples
///
/// ```
/// use tasador::prelude::*;
///
/// let model = LinearRegression::from_parts(vec![100.0, 5000.0], 20_000.0);
/// let x = Matrix::from_row(&[1200.0, 3.0]);
/// let y = model.predict(&x).unwrap();
/// assert_eq!(y.as_slice(), &[155_000.0]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    /// Coefficients for features (excluding intercept).
    coefficients: Vector<f64>,
    /// Intercept (bias) term.
    intercept: f64,
}

impl LinearRegression {
    /// Creates a model from fitted coefficients and intercept.
    #[must_use]
    pub fn from_parts(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients: Vector::from_vec(coefficients),
            intercept,
        }
    }

    /// Returns the coefficients (excluding intercept).
    #[must_use]
    pub fn coefficients(&self) -> &Vector<f64> {
        &self.coefficients
    }

    /// Returns the intercept term.
    #[must_use]
    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

impl Regressor for LinearRegression {
    /// Predicts target values for input data.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The number of columns differs from the number of coefficients
    /// - A prediction is NaN or infinite
    fn predict(&self, x: &Matrix<f64>) -> Result<Vector<f64>> {
        let result = x.matvec(&self.coefficients).map_err(|_| {
            TasadorError::inference(format!(
                "expected {} features, got {}",
                self.coefficients.len(),
                x.n_cols()
            ))
        })?;

        let result = result.add_scalar(self.intercept);
        if let Some(row) = result.iter().position(|y| !y.is_finite()) {
            return Err(TasadorError::inference(format!(
                "non-finite prediction for row {row}"
            )));
        }
        Ok(result)
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.coefficients.len())
    }
}
