//! tasador: house price estimation from a pre-trained regression model.
//!
//! The crate covers the pipeline between a filled-in form and a displayed
//! price: categorical encoding, positional feature assembly, single-row
//! inference and a per-session prediction history with CSV export.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use tasador::prelude::*;
//!
//! let mut registry = EncoderRegistry::new();
//! registry.insert("mainroad", LabelEncoder::fit(["no", "yes"])).unwrap();
//! registry.insert("prefarea", LabelEncoder::fit(["no", "yes"])).unwrap();
//!
//! let assembler = FeatureVectorAssembler::new(FeatureSpec::housing(), registry);
//! let model = LinearRegression::from_parts(
//!     vec![250.0, 40_000.0, 60_000.0, 30_000.0, 20_000.0, 50_000.0, 75_000.0],
//!     100_000.0,
//! );
//! let predictor = Arc::new(Predictor::new(assembler, Box::new(model)));
//! let mut session = Session::new(predictor);
//!
//! let form = FormSubmission::new()
//!     .with_numeric("area", 4000.0)
//!     .with_numeric("bedrooms", 3.0)
//!     .with_numeric("bathrooms", 2.0)
//!     .with_numeric("stories", 2.0)
//!     .with_numeric("parking", 1.0)
//!     .with_selection("mainroad", "yes")
//!     .with_selection("prefarea", "no");
//!
//! let estimate = session.submit(&form).unwrap();
//! assert_eq!(estimate.price, 1_470_000.0);
//! assert_eq!(session.history(PriceRange::default()).len(), 1);
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Matrix and Vector containers
//! - [`traits`]: the `Regressor` seam for the opaque model
//! - [`linear_model`]: fitted linear regression
//! - [`preprocessing`]: label encoders
//! - [`registry`]: ordered encoder registry and unknown-category policy
//! - [`features`]: numeric feature spec and form submissions
//! - [`assembler`]: positional feature vector assembly
//! - [`inference`]: single-row prediction and rounding
//! - [`history`]: session prediction ledger and CSV export
//! - [`artifact`]: model and encoder persistence
//! - [`config`]: artifact paths and policy from the environment
//! - [`session`]: shared predictor and per-session state

pub mod artifact;
pub mod assembler;
pub mod config;
pub mod error;
pub mod features;
pub mod history;
pub mod inference;
pub mod linear_model;
pub mod prelude;
pub mod preprocessing;
pub mod primitives;
pub mod registry;
pub mod session;
pub mod traits;

pub use assembler::{FeatureVector, FeatureVectorAssembler};
pub use error::{Result, TasadorError};
pub use primitives::{Matrix, Vector};
pub use session::{Estimate, Predictor, Session};
pub use traits::Regressor;
