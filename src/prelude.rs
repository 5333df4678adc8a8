//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use tasador::prelude::*;
//! ```

pub use crate::assembler::{FeatureVector, FeatureVectorAssembler};
pub use crate::config::PredictorConfig;
pub use crate::error::TasadorError;
pub use crate::features::{FeatureSpec, FormSubmission, NumericField};
pub use crate::history::{FieldValue, HistoryLedger, PendingRecord, PredictionRecord, PriceRange};
pub use crate::inference::InferenceAdapter;
pub use crate::linear_model::LinearRegression;
pub use crate::preprocessing::LabelEncoder;
pub use crate::primitives::{Matrix, Vector};
pub use crate::registry::{EncoderRegistry, UnknownCategoryPolicy};
pub use crate::session::{Estimate, Predictor, Session};
pub use crate::traits::Regressor;
