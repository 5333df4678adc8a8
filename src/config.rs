//! Predictor configuration.
//!
//! Values come from defaults, then the environment, then explicit builder
//! overrides:
//!
//! | Variable                 | Default               |
//! |--------------------------|-----------------------|
//! | `TASADOR_MODEL`          | `housing_model.tsdr`  |
//! | `TASADOR_ENCODERS`       | `label_encoders.json` |
//! | `TASADOR_UNKNOWN_POLICY` | `reject`              |

use crate::error::Result;
use crate::registry::UnknownCategoryPolicy;
use std::path::PathBuf;

/// Environment variable naming the model artifact.
pub const ENV_MODEL: &str = "TASADOR_MODEL";
/// Environment variable naming the encoder artifact.
pub const ENV_ENCODERS: &str = "TASADOR_ENCODERS";
/// Environment variable selecting the unknown-category policy.
pub const ENV_UNKNOWN_POLICY: &str = "TASADOR_UNKNOWN_POLICY";

/// Default model artifact path.
pub const DEFAULT_MODEL_PATH: &str = "housing_model.tsdr";
/// Default encoder artifact path.
pub const DEFAULT_ENCODERS_PATH: &str = "label_encoders.json";

/// Where to find artifacts and how to treat unseen labels.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictorConfig {
    /// Model artifact path.
    pub model_path: PathBuf,
    /// Encoder artifact path.
    pub encoders_path: PathBuf,
    /// Unknown-category policy for every categorical feature.
    pub policy: UnknownCategoryPolicy,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            encoders_path: PathBuf::from(DEFAULT_ENCODERS_PATH),
            policy: UnknownCategoryPolicy::Reject,
        }
    }
}

impl PredictorConfig {
    /// Defaults overridden by `TASADOR_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `TASADOR_UNKNOWN_POLICY` is not a valid
    /// policy.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(path) = lookup(ENV_MODEL).filter(|v| !v.trim().is_empty()) {
            config.model_path = PathBuf::from(path);
        }
        if let Some(path) = lookup(ENV_ENCODERS).filter(|v| !v.trim().is_empty()) {
            config.encoders_path = PathBuf::from(path);
        }
        if let Some(policy) = lookup(ENV_UNKNOWN_POLICY).filter(|v| !v.trim().is_empty()) {
            config.policy = policy.parse()?;
        }
        Ok(config)
    }

    /// Sets the model artifact path.
    #[must_use]
    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = path.into();
        self
    }

    /// Sets the encoder artifact path.
    #[must_use]
    pub fn with_encoders_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.encoders_path = path.into();
        self
    }

    /// Sets the unknown-category policy.
    #[must_use]
    pub fn with_policy(mut self, policy: UnknownCategoryPolicy) -> Self {
        self.policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TasadorError;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = PredictorConfig::from_lookup(lookup(&[])).expect("valid");
        assert_eq!(config, PredictorConfig::default());
        assert_eq!(config.model_path, PathBuf::from("housing_model.tsdr"));
        assert_eq!(config.policy, UnknownCategoryPolicy::Reject);
    }

    #[test]
    fn test_env_overrides() {
        let config = PredictorConfig::from_lookup(lookup(&[
            (ENV_MODEL, "/srv/model.tsdr"),
            (ENV_ENCODERS, "/srv/enc.json"),
            (ENV_UNKNOWN_POLICY, "sentinel"),
        ]))
        .expect("valid");
        assert_eq!(config.model_path, PathBuf::from("/srv/model.tsdr"));
        assert_eq!(config.encoders_path, PathBuf::from("/srv/enc.json"));
        assert_eq!(config.policy, UnknownCategoryPolicy::Sentinel(-1));
    }

    #[test]
    fn test_blank_values_ignored() {
        let config =
            PredictorConfig::from_lookup(lookup(&[(ENV_MODEL, "  "), (ENV_UNKNOWN_POLICY, "")]))
                .expect("valid");
        assert_eq!(config, PredictorConfig::default());
    }

    #[test]
    fn test_invalid_policy() {
        let err = PredictorConfig::from_lookup(lookup(&[(ENV_UNKNOWN_POLICY, "guess")])).unwrap_err();
        assert!(matches!(err, TasadorError::InvalidConfig { .. }));
    }

    #[test]
    fn test_builder_overrides() {
        let config = PredictorConfig::default()
            .with_model_path("m.tsdr")
            .with_encoders_path("e.json")
            .with_policy(UnknownCategoryPolicy::Sentinel(9));
        assert_eq!(config.model_path, PathBuf::from("m.tsdr"));
        assert_eq!(config.encoders_path, PathBuf::from("e.json"));
        assert_eq!(config.policy, UnknownCategoryPolicy::Sentinel(9));
    }
}
