//! Core traits for the estimation pipeline.
//!
//! The pre-trained model is an opaque collaborator: the pipeline only ever
//! sees it through [`Regressor`].

use crate::error::Result;
use crate::primitives::{Matrix, Vector};

/// A pre-trained regression model exposing batch prediction.
///
/// `predict` takes one row per request and returns one value per row.
/// Implementations must be shareable across sessions, hence `Send + Sync`.
///
/// # Examples
///
/// ```
/// use tasador::prelude::*;
///
/// let model = LinearRegression::from_parts(vec![2.0], 1.0);
/// let x = Matrix::from_vec(2, 1, vec![1.0, 2.0]).unwrap();
/// let y = model.predict(&x).unwrap();
/// assert_eq!(y.as_slice(), &[3.0, 5.0]);
/// ```
pub trait Regressor: Send + Sync {
    /// Predicts target values for input rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the rows have the wrong width or the model
    /// produces an unusable value.
    fn predict(&self, x: &Matrix<f64>) -> Result<Vector<f64>>;

    /// Number of input columns the model was trained on, if known.
    fn n_features(&self) -> Option<usize> {
        None
    }
}

impl<R: Regressor + ?Sized> Regressor for Box<R> {
    fn predict(&self, x: &Matrix<f64>) -> Result<Vector<f64>> {
        (**self).predict(x)
    }

    fn n_features(&self) -> Option<usize> {
        (**self).n_features()
    }
}
