//! Encoder registry for categorical features.
//!
//! The registry owns one [`LabelEncoder`] per categorical feature, in an
//! explicit order fixed when the registry is built or loaded. That order is
//! the order categorical codes are appended to the model's input row.

use crate::error::{Result, TasadorError};
use crate::preprocessing::LabelEncoder;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Code substituted for unknown labels under the sentinel policy.
pub const SENTINEL_CODE: i64 = -1;

/// What to do when a submitted label is not in a feature's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownCategoryPolicy {
    /// Fail with `UnknownCategory` and perform no inference.
    #[default]
    Reject,
    /// Substitute the given code and proceed. The model never saw this code
    /// during training, so the estimate may be degraded.
    Sentinel(i64),
}

impl UnknownCategoryPolicy {
    /// Sentinel policy with the canonical [`SENTINEL_CODE`].
    #[must_use]
    pub fn sentinel() -> Self {
        Self::Sentinel(SENTINEL_CODE)
    }
}

impl fmt::Display for UnknownCategoryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reject => write!(f, "reject"),
            Self::Sentinel(SENTINEL_CODE) => write!(f, "sentinel"),
            Self::Sentinel(code) => write!(f, "sentinel:{code}"),
        }
    }
}

impl FromStr for UnknownCategoryPolicy {
    type Err = TasadorError;

    /// Parses `reject`, `sentinel` or `sentinel:<code>`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || TasadorError::InvalidConfig {
            key: "unknown_category_policy".to_string(),
            value: s.to_string(),
        };
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "sentinel" => Ok(Self::sentinel()),
            other => other
                .strip_prefix("sentinel:")
                .and_then(|code| code.trim().parse::<i64>().ok())
                .map(Self::Sentinel)
                .ok_or_else(invalid),
        }
    }
}

/// A single categorical feature and its codec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct FeatureEncoder {
    name: String,
    classes: LabelEncoder,
}

/// Ordered collection of categorical encoders.
///
/// # Examples
///
/// ```
/// use tasador::preprocessing::LabelEncoder;
/// use tasador::registry::EncoderRegistry;
///
/// let mut registry = EncoderRegistry::new();
/// registry.insert("mainroad", LabelEncoder::fit(["yes", "no"])).unwrap();
/// registry.insert("furnishingstatus", LabelEncoder::fit(["furnished", "unfurnished"])).unwrap();
///
/// assert_eq!(registry.features().collect::<Vec<_>>(), ["mainroad", "furnishingstatus"]);
/// assert_eq!(registry.encode("mainroad", "yes").unwrap(), 1);
/// assert!(registry.encode("mainroad", "sometimes").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderRegistry {
    features: Vec<FeatureEncoder>,
}

impl EncoderRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a feature. Its position becomes its slot in the model row.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the feature is already registered.
    pub fn insert(&mut self, feature: impl Into<String>, encoder: LabelEncoder) -> Result<()> {
        let name = feature.into();
        if self.position(&name).is_some() {
            return Err(TasadorError::InvalidConfig {
                key: "feature".to_string(),
                value: name,
            });
        }
        self.features.push(FeatureEncoder {
            name,
            classes: encoder,
        });
        Ok(())
    }

    /// Feature names in their stable registry order.
    pub fn features(&self) -> impl Iterator<Item = &str> + '_ {
        self.features.iter().map(|f| f.name.as_str())
    }

    /// Number of categorical features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Returns true if no features are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Returns true if `feature` is registered.
    #[must_use]
    pub fn contains(&self, feature: &str) -> bool {
        self.position(feature).is_some()
    }

    fn position(&self, feature: &str) -> Option<usize> {
        self.features.iter().position(|f| f.name == feature)
    }

    fn encoder(&self, feature: &str) -> Result<&LabelEncoder> {
        self.features
            .iter()
            .find(|f| f.name == feature)
            .map(|f| &f.classes)
            .ok_or_else(|| TasadorError::UnknownFeature {
                feature: feature.to_string(),
            })
    }

    /// Known vocabulary of `feature`, in code order.
    ///
    /// # Errors
    ///
    /// Returns `UnknownFeature` if the feature is not registered.
    pub fn labels_for(&self, feature: &str) -> Result<&[String]> {
        self.encoder(feature).map(LabelEncoder::known_labels)
    }

    /// Encodes `label` for `feature`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCategory` if the label is outside the vocabulary, or
    /// `UnknownFeature` if the feature is not registered.
    pub fn encode(&self, feature: &str, label: &str) -> Result<i64> {
        self.encoder(feature)?
            .encode(label)
            .ok_or_else(|| TasadorError::UnknownCategory {
                feature: feature.to_string(),
                label: label.to_string(),
            })
    }

    /// Encodes `label`, applying `policy` to labels outside the vocabulary.
    ///
    /// Returns the code and whether the sentinel was substituted.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCategory` under [`UnknownCategoryPolicy::Reject`], and
    /// `UnknownFeature` under any policy.
    pub fn encode_with_policy(
        &self,
        feature: &str,
        label: &str,
        policy: UnknownCategoryPolicy,
    ) -> Result<(i64, bool)> {
        match (self.encode(feature, label), policy) {
            (Ok(code), _) => Ok((code, false)),
            (Err(TasadorError::UnknownCategory { .. }), UnknownCategoryPolicy::Sentinel(code)) => {
                Ok((code, true))
            }
            (Err(e), _) => Err(e),
        }
    }

    /// Returns the label behind `code` for `feature`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownFeature` if the feature is not registered, or
    /// `InvalidInput` if the code is out of range.
    pub fn decode(&self, feature: &str, code: i64) -> Result<&str> {
        let encoder = self.encoder(feature)?;
        encoder
            .decode(code)
            .ok_or_else(|| TasadorError::InvalidInput {
                field: feature.to_string(),
                value: code.to_string(),
                constraint: format!("code in 0..{}", encoder.n_classes()),
            })
    }
}

/// Human-readable name for a feature: `hot_water` becomes `Hot Water`.
#[must_use]
pub fn display_name(feature: &str) -> String {
    feature
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
