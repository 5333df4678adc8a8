//! Core numeric primitives (Vector, Matrix).
//!
//! These are the shapes exchanged with the regression model: a `Matrix` of
//! request rows in, a `Vector` of values out.

mod matrix;
mod vector;

pub use matrix::Matrix;
pub use vector::Vector;
