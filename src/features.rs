//! Feature spec and form submissions.
//!
//! A [`FeatureSpec`] fixes the numeric columns the model was trained on, in
//! training order. Categorical columns come from the
//! [`EncoderRegistry`](crate::registry::EncoderRegistry).

use crate::error::{Result, TasadorError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A numeric input field with a lower bound and a step granularity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericField {
    /// Column name, as used in submissions and exported history.
    pub name: String,
    /// Label shown next to the input.
    pub label: String,
    /// Smallest accepted value (inclusive).
    pub min: f64,
    /// Increment used by the input widget.
    pub step: f64,
}

impl NumericField {
    /// Creates a field description.
    #[must_use]
    pub fn new(name: impl Into<String>, label: impl Into<String>, min: f64, step: f64) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            min,
            step,
        }
    }

    /// Checks `value` against the field's bound.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the value is not finite or is below `min`.
    pub fn validate(&self, value: f64) -> Result<()> {
        if !value.is_finite() || value < self.min {
            return Err(TasadorError::InvalidInput {
                field: self.name.clone(),
                value: value.to_string(),
                constraint: format!(">= {}", self.min),
            });
        }
        Ok(())
    }
}

/// Ordered numeric fields of the model input.
///
/// # Examples
///
/// ```
/// use tasador::features::FeatureSpec;
///
/// let spec = FeatureSpec::housing();
/// let names: Vec<&str> = spec.names().collect();
/// assert_eq!(names, ["area", "bedrooms", "bathrooms", "stories", "parking"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSpec {
    numeric: Vec<NumericField>,
}

impl FeatureSpec {
    /// Creates a spec from fields in training order.
    #[must_use]
    pub fn new(numeric: Vec<NumericField>) -> Self {
        Self { numeric }
    }

    /// The housing form: area, bedrooms, bathrooms, stories, parking.
    #[must_use]
    pub fn housing() -> Self {
        Self::new(vec![
            NumericField::new("area", "Area (sq ft)", 100.0, 50.0),
            NumericField::new("bedrooms", "Bedrooms", 1.0, 1.0),
            NumericField::new("bathrooms", "Bathrooms", 1.0, 1.0),
            NumericField::new("stories", "Stories", 1.0, 1.0),
            NumericField::new("parking", "Parking Spaces", 0.0, 1.0),
        ])
    }

    /// Fields in training order.
    #[must_use]
    pub fn fields(&self) -> &[NumericField] {
        &self.numeric
    }

    /// Field names in training order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.numeric.iter().map(|f| f.name.as_str())
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&NumericField> {
        self.numeric.iter().find(|f| f.name == name)
    }

    /// Number of numeric fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.numeric.len()
    }

    /// Returns true if the feature spec has no numeric fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.numeric.is_empty()
    }
}

impl Default for FeatureSpec {
    fn default() -> Self {
        Self::housing()
    }
}

/// Raw values of one form submission.
///
/// Keys are field names; ordering comes from the `FeatureSpec` and registry, never
/// from the submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormSubmission {
    /// Numeric inputs by field name.
    pub numeric: HashMap<String, f64>,
    /// Selected label by categorical feature name.
    pub categorical: HashMap<String, String>,
}

impl FormSubmission {
    /// Creates an empty submission.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a numeric input.
    #[must_use]
    pub fn with_numeric(mut self, field: impl Into<String>, value: f64) -> Self {
        self.numeric.insert(field.into(), value);
        self
    }

    /// Sets a categorical selection.
    #[must_use]
    pub fn with_selection(mut self, feature: impl Into<String>, label: impl Into<String>) -> Self {
        self.categorical.insert(feature.into(), label.into());
        self
    }
}
