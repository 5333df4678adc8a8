//! Preprocessing transformers for categorical features.
//!
//! # Example
//!
//! ```
//! use tasador::preprocessing::LabelEncoder;
//!
//! let encoder = LabelEncoder::fit(["yes", "no", "yes"]);
//! assert_eq!(encoder.known_labels(), &["no".to_string(), "yes".to_string()]);
//! assert_eq!(encoder.encode("yes"), Some(1));
//! assert_eq!(encoder.decode(0), Some("no"));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Bidirectional mapping between label strings and dense integer codes.
///
/// The code of a label is its position in the class list. Encoders loaded
/// from an artifact keep the persisted class order verbatim so codes match
/// the ones the model was trained with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct LabelEncoder {
    /// Known classes, indexed by code.
    classes: Vec<String>,
    /// Reverse index: label -> code.
    index: HashMap<String, usize>,
}

impl LabelEncoder {
    /// Builds an encoder from observed labels.
    ///
    /// Classes are the unique labels in sorted order.
    pub fn fit<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut classes: Vec<String> = labels.into_iter().map(Into::into).collect();
        classes.sort();
        classes.dedup();
        Self::with_index(classes)
    }

    /// Builds an encoder whose codes are exactly the positions of `classes`.
    ///
    /// # Errors
    ///
    /// Returns the offending label if `classes` contains a duplicate.
    pub fn from_classes(classes: Vec<String>) -> Result<Self, String> {
        let encoder = Self::with_index(classes);
        if encoder.index.len() != encoder.classes.len() {
            let duplicate = encoder
                .classes
                .iter()
                .enumerate()
                .find(|(code, label)| encoder.index.get(*label) != Some(code))
                .map(|(_, label)| label.clone())
                .unwrap_or_default();
            return Err(duplicate);
        }
        Ok(encoder)
    }

    fn with_index(classes: Vec<String>) -> Self {
        let index = classes
            .iter()
            .enumerate()
            .map(|(code, label)| (label.clone(), code))
            .collect();
        Self { classes, index }
    }

    /// Returns the known labels in code order.
    #[must_use]
    pub fn known_labels(&self) -> &[String] {
        &self.classes
    }

    /// Returns the number of known classes.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Returns the code for `label`, or `None` if it was never seen.
    #[must_use]
    pub fn encode(&self, label: &str) -> Option<i64> {
        self.index.get(label).map(|&code| code as i64)
    }

    /// Returns the label for `code`, or `None` if out of range.
    #[must_use]
    pub fn decode(&self, code: i64) -> Option<&str> {
        usize::try_from(code)
            .ok()
            .and_then(|i| self.classes.get(i))
            .map(String::as_str)
    }
}

impl TryFrom<Vec<String>> for LabelEncoder {
    type Error = String;

    fn try_from(classes: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_classes(classes).map_err(|label| format!("duplicate class '{label}'"))
    }
}

impl From<LabelEncoder> for Vec<String> {
    fn from(encoder: LabelEncoder) -> Self {
        encoder.classes
    }
}
