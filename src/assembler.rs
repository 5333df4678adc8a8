//! Feature vector assembly.
//!
//! Turns a [`FormSubmission`] into the flat positional row the model
//! consumes: numeric fields in `FeatureSpec` order, then one code per categorical
//! feature in registry order.

use crate::error::{Result, TasadorError};
use crate::features::{FeatureSpec, FormSubmission};
use crate::primitives::Matrix;
use crate::registry::{EncoderRegistry, UnknownCategoryPolicy};
use tracing::{debug, warn};

/// One assembled model input row.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Vec<f64>,
    substitutions: Vec<String>,
}

impl FeatureVector {
    /// Values in model column order.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the row has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The row as a 1×n matrix.
    #[must_use]
    pub fn to_row(&self) -> Matrix<f64> {
        Matrix::from_row(&self.values)
    }

    /// Features whose label was replaced by the sentinel code.
    #[must_use]
    pub fn substitutions(&self) -> &[String] {
        &self.substitutions
    }
}

/// Builds model input rows from form submissions.
///
/// # Examples
///
/// ```
/// use tasador::prelude::*;
///
/// let mut registry = EncoderRegistry::new();
/// registry.insert("mainroad", LabelEncoder::fit(["no", "yes"])).unwrap();
/// let assembler = FeatureVectorAssembler::new(FeatureSpec::housing(), registry);
///
/// let form = FormSubmission::new()
///     .with_numeric("area", 1200.0)
///     .with_numeric("bedrooms", 3.0)
///     .with_numeric("bathrooms", 2.0)
///     .with_numeric("stories", 1.0)
///     .with_numeric("parking", 0.0)
///     .with_selection("mainroad", "yes");
///
/// let row = assembler.assemble(&form).unwrap();
/// assert_eq!(row.as_slice(), &[1200.0, 3.0, 2.0, 1.0, 0.0, 1.0]);
/// ```
#[derive(Debug, Clone)]
pub struct FeatureVectorAssembler {
    spec: FeatureSpec,
    registry: EncoderRegistry,
    policy: UnknownCategoryPolicy,
}

impl FeatureVectorAssembler {
    /// Creates an assembler that rejects unknown labels.
    #[must_use]
    pub fn new(spec: FeatureSpec, registry: EncoderRegistry) -> Self {
        Self {
            spec,
            registry,
            policy: UnknownCategoryPolicy::Reject,
        }
    }

    /// Sets the unknown-label policy, applied to every categorical feature.
    #[must_use]
    pub fn with_policy(mut self, policy: UnknownCategoryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The numeric feature spec.
    #[must_use]
    pub fn spec(&self) -> &FeatureSpec {
        &self.spec
    }

    /// The categorical encoder registry.
    #[must_use]
    pub fn registry(&self) -> &EncoderRegistry {
        &self.registry
    }

    /// The unknown-label policy in force.
    #[must_use]
    pub fn policy(&self) -> UnknownCategoryPolicy {
        self.policy
    }

    /// Row width: numeric fields plus categorical features.
    #[must_use]
    pub fn width(&self) -> usize {
        self.spec.len() + self.registry.len()
    }

    /// Assembles the model row for `form`.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `UnknownFeature` for a submitted field outside the `FeatureSpec` or registry
    /// - `MissingInput` for a spec field or registry feature with no value
    /// - `InvalidInput` for a numeric value below its minimum
    /// - `UnknownCategory` for an unseen label under the reject policy
    pub fn assemble(&self, form: &FormSubmission) -> Result<FeatureVector> {
        self.check_keys(form)?;

        let mut values = Vec::with_capacity(self.width());
        for field in self.spec.fields() {
            let value = *form
                .numeric
                .get(&field.name)
                .ok_or_else(|| TasadorError::MissingInput {
                    field: field.name.clone(),
                })?;
            field.validate(value)?;
            values.push(value);
        }

        let mut substitutions = Vec::new();
        for feature in self.registry.features() {
            let label = form
                .categorical
                .get(feature)
                .ok_or_else(|| TasadorError::MissingInput {
                    field: feature.to_string(),
                })?;
            let (code, substituted) = self
                .registry
                .encode_with_policy(feature, label, self.policy)?;
            if substituted {
                warn!(feature, label = label.as_str(), code, "unknown label replaced by sentinel");
                substitutions.push(feature.to_string());
            }
            values.push(code as f64);
        }

        debug!(width = values.len(), substitutions = substitutions.len(), "assembled feature vector");
        Ok(FeatureVector {
            values,
            substitutions,
        })
    }

    fn check_keys(&self, form: &FormSubmission) -> Result<()> {
        if let Some(name) = form.numeric.keys().find(|k| self.spec.field(k).is_none()) {
            return Err(TasadorError::UnknownFeature {
                feature: name.clone(),
            });
        }
        if let Some(name) = form.categorical.keys().find(|k| !self.registry.contains(k)) {
            return Err(TasadorError::UnknownFeature {
                feature: name.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::LabelEncoder;
    use crate::registry::SENTINEL_CODE;

    fn assembler() -> FeatureVectorAssembler {
        let mut registry = EncoderRegistry::new();
        registry
            .insert("mainroad", LabelEncoder::fit(["no", "yes"]))
            .expect("fresh feature");
        registry
            .insert("basement", LabelEncoder::fit(["no", "yes"]))
            .expect("fresh feature");
        registry
            .insert(
                "furnishingstatus",
                LabelEncoder::fit(["furnished", "semi-furnished", "unfurnished"]),
            )
            .expect("fresh feature");
        FeatureVectorAssembler::new(FeatureSpec::housing(), registry)
    }

    fn form() -> FormSubmission {
        FormSubmission::new()
            .with_numeric("area", 7420.0)
            .with_numeric("bedrooms", 4.0)
            .with_numeric("bathrooms", 2.0)
            .with_numeric("stories", 3.0)
            .with_numeric("parking", 2.0)
            .with_selection("furnishingstatus", "semi-furnished")
            .with_selection("mainroad", "yes")
            .with_selection("basement", "no")
    }

    #[test]
    fn test_assemble_order() {
        let row = assembler().assemble(&form()).expect("valid form");
        assert_eq!(row.as_slice(), &[7420.0, 4.0, 2.0, 3.0, 2.0, 1.0, 0.0, 1.0]);
        assert!(row.substitutions().is_empty());
    }

    #[test]
    fn test_assemble_width() {
        let assembler = assembler();
        let row = assembler.assemble(&form()).expect("valid form");
        assert_eq!(row.len(), assembler.width());
        assert_eq!(row.len(), 5 + 3);
        assert_eq!(row.to_row().shape(), (1, 8));
    }

    #[test]
    fn test_assemble_is_deterministic() {
        let assembler = assembler();
        let first = assembler.assemble(&form()).expect("valid form");
        for _ in 0..20 {
            assert_eq!(assembler.assemble(&form()).expect("valid form"), first);
        }
    }

    #[test]
    fn test_unknown_label_rejected() {
        let form = form().with_selection("furnishingstatus", "palatial");
        let err = assembler().assemble(&form).unwrap_err();
        assert!(matches!(err, TasadorError::UnknownCategory { .. }));
    }

    #[test]
    fn test_unknown_label_sentinel_on_every_feature() {
        let assembler = assembler().with_policy(UnknownCategoryPolicy::sentinel());
        let form = form()
            .with_selection("mainroad", "?")
            .with_selection("basement", "?")
            .with_selection("furnishingstatus", "?");
        let row = assembler.assemble(&form).expect("sentinel policy proceeds");
        let sentinel = SENTINEL_CODE as f64;
        assert_eq!(&row.as_slice()[5..], &[sentinel, sentinel, sentinel]);
        assert_eq!(row.substitutions(), &["mainroad", "basement", "furnishingstatus"]);
    }

    #[test]
    fn test_missing_numeric() {
        let mut form = form();
        form.numeric.remove("stories");
        let err = assembler().assemble(&form).unwrap_err();
        assert!(matches!(err, TasadorError::MissingInput { field } if field == "stories"));
    }

    #[test]
    fn test_missing_selection() {
        let mut form = form();
        form.categorical.remove("basement");
        let err = assembler().assemble(&form).unwrap_err();
        assert!(matches!(err, TasadorError::MissingInput { field } if field == "basement"));
    }

    #[test]
    fn test_below_minimum() {
        let form = form().with_numeric("area", 50.0);
        let err = assembler().assemble(&form).unwrap_err();
        assert!(matches!(err, TasadorError::InvalidInput { field, .. } if field == "area"));
    }

    #[test]
    fn test_unknown_selection_key() {
        let form = form().with_selection("pool", "yes");
        let err = assembler()
            .with_policy(UnknownCategoryPolicy::sentinel())
            .assemble(&form)
            .unwrap_err();
        assert!(matches!(err, TasadorError::UnknownFeature { feature } if feature == "pool"));
    }

    #[test]
    fn test_unknown_numeric_key() {
        let form = form().with_numeric("garden", 10.0);
        let err = assembler().assemble(&form).unwrap_err();
        assert!(matches!(err, TasadorError::UnknownFeature { .. }));
    }
}
