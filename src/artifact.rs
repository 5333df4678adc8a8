//! Model and encoder artifacts.
//!
//! Both artifacts are loaded once at startup. An absent file is reported as
//! `MissingArtifact`, which callers treat as fatal.
//!
//! # Model file layout
//!
//! ```text
//! ┌──────────────┬─────────┬──────────────────────────────┐
//! │ magic "TSDR" │ version │ bincode(LinearRegression)    │
//! │   4 bytes    │ 1 byte  │ rest of file                 │
//! └──────────────┴─────────┴──────────────────────────────┘
//! ```
//!
//! # Encoder file layout
//!
//! JSON: `{"features": [{"name": "mainroad", "classes": ["no", "yes"]}, ...]}`.
//! Array order is the registry order; class order is the code order.

use crate::error::{ArtifactKind, Result, TasadorError};
use crate::linear_model::LinearRegression;
use crate::registry::EncoderRegistry;
use std::fs;
use std::path::Path;
use tracing::info;

/// Model file magic bytes.
pub const MODEL_MAGIC: [u8; 4] = *b"TSDR";

/// Current model file format version.
pub const MODEL_FORMAT_VERSION: u8 = 1;

const HEADER_LEN: usize = MODEL_MAGIC.len() + 1;

fn read_artifact(path: &Path, kind: ArtifactKind) -> Result<Vec<u8>> {
    if !path.is_file() {
        return Err(TasadorError::MissingArtifact {
            kind,
            path: path.to_path_buf(),
        });
    }
    Ok(fs::read(path)?)
}

/// Saves a model to the `TSDR` format.
///
/// # Errors
///
/// Returns error on I/O failure or serialization error.
pub fn save_model(model: &LinearRegression, path: impl AsRef<Path>) -> Result<()> {
    let payload = bincode::serialize(model)
        .map_err(|e| TasadorError::Serialization(format!("Failed to serialize model: {e}")))?;

    let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
    bytes.extend_from_slice(&MODEL_MAGIC);
    bytes.push(MODEL_FORMAT_VERSION);
    bytes.extend_from_slice(&payload);

    fs::write(path, bytes)?;
    Ok(())
}

/// Loads a model saved with [`save_model`].
///
/// # Errors
///
/// Returns `MissingArtifact` if the file does not exist, `FormatError` on a
/// bad header, and `Serialization` if the payload cannot be decoded.
pub fn load_model(path: impl AsRef<Path>) -> Result<LinearRegression> {
    let path = path.as_ref();
    let bytes = read_artifact(path, ArtifactKind::Model)?;

    if bytes.len() < HEADER_LEN {
        return Err(TasadorError::format(format!(
            "file too small: {} bytes",
            bytes.len()
        )));
    }
    if bytes[..MODEL_MAGIC.len()] != MODEL_MAGIC {
        return Err(TasadorError::format("bad magic, expected TSDR"));
    }
    let version = bytes[MODEL_MAGIC.len()];
    if version != MODEL_FORMAT_VERSION {
        return Err(TasadorError::format(format!(
            "unsupported version {version}, expected {MODEL_FORMAT_VERSION}"
        )));
    }

    let model: LinearRegression = bincode::deserialize(&bytes[HEADER_LEN..])
        .map_err(|e| TasadorError::Serialization(format!("Failed to deserialize model: {e}")))?;
    info!(
        path = %path.display(),
        n_features = model.coefficients().len(),
        "loaded model artifact"
    );
    Ok(model)
}

/// Saves encoders as JSON.
///
/// # Errors
///
/// Returns error on I/O failure or serialization error.
pub fn save_encoders(registry: &EncoderRegistry, path: impl AsRef<Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(registry)
        .map_err(|e| TasadorError::Serialization(format!("Failed to serialize encoders: {e}")))?;
    fs::write(path, json)?;
    Ok(())
}

/// Loads encoders saved with [`save_encoders`].
///
/// # Errors
///
/// Returns `MissingArtifact` if the file does not exist, and `Serialization`
/// if the JSON is malformed or a feature lists a class twice.
pub fn load_encoders(path: impl AsRef<Path>) -> Result<EncoderRegistry> {
    let path = path.as_ref();
    let bytes = read_artifact(path, ArtifactKind::Encoders)?;

    let registry: EncoderRegistry = serde_json::from_slice(&bytes)
        .map_err(|e| TasadorError::Serialization(format!("Failed to parse encoders: {e}")))?;
    let mut seen = std::collections::HashSet::new();
    if let Some(duplicate) = registry.features().find(|f| !seen.insert(*f)) {
        return Err(TasadorError::format(format!(
            "feature '{duplicate}' listed twice"
        )));
    }

    info!(
        path = %path.display(),
        features = registry.len(),
        "loaded encoder artifact"
    );
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::LabelEncoder;
    use tempfile::TempDir;

    fn registry() -> EncoderRegistry {
        let mut registry = EncoderRegistry::new();
        registry
            .insert("prefarea", LabelEncoder::fit(["yes", "no"]))
            .expect("fresh feature");
        registry
            .insert("airconditioning", LabelEncoder::fit(["no", "yes"]))
            .expect("fresh feature");
        registry
    }

    #[test]
    fn test_model_round_trip() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("model.tsdr");
        let model = LinearRegression::from_parts(vec![250.5, 1e4, -3.0], 42.0);

        save_model(&model, &path).expect("save");
        let loaded = load_model(&path).expect("load");
        assert_eq!(loaded, model);
    }

    #[test]
    fn test_model_missing() {
        let dir = TempDir::new().expect("temp dir");
        let err = load_model(dir.path().join("absent.tsdr")).unwrap_err();
        assert!(matches!(
            err,
            TasadorError::MissingArtifact {
                kind: ArtifactKind::Model,
                ..
            }
        ));
    }

    #[test]
    fn test_model_directory_is_missing() {
        let dir = TempDir::new().expect("temp dir");
        let err = load_model(dir.path()).unwrap_err();
        assert!(matches!(err, TasadorError::MissingArtifact { .. }));
    }

    #[test]
    fn test_model_bad_magic() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("model.tsdr");
        fs::write(&path, b"GGUF\x01rest").expect("write");
        let err = load_model(&path).unwrap_err();
        assert!(err.to_string().contains("bad magic"));
    }

    #[test]
    fn test_model_bad_version() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("model.tsdr");
        fs::write(&path, b"TSDR\x09").expect("write");
        let err = load_model(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported version 9"));
    }

    #[test]
    fn test_model_truncated() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("model.tsdr");
        fs::write(&path, b"TS").expect("write");
        assert!(matches!(load_model(&path), Err(TasadorError::FormatError { .. })));

        fs::write(&path, b"TSDR\x01\x02").expect("write");
        assert!(matches!(load_model(&path), Err(TasadorError::Serialization(_))));
    }

    #[test]
    fn test_encoders_round_trip_preserves_order() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("encoders.json");
        let registry = registry();

        save_encoders(&registry, &path).expect("save");
        let loaded = load_encoders(&path).expect("load");
        assert_eq!(loaded, registry);
        let names: Vec<&str> = loaded.features().collect();
        assert_eq!(names, ["prefarea", "airconditioning"]);
    }

    #[test]
    fn test_encoders_codes_taken_verbatim() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("encoders.json");
        fs::write(
            &path,
            r#"{"features": [{"name": "mainroad", "classes": ["yes", "no"]}]}"#,
        )
        .expect("write");
        let loaded = load_encoders(&path).expect("load");
        assert_eq!(loaded.encode("mainroad", "yes").expect("known"), 0);
        assert_eq!(loaded.encode("mainroad", "no").expect("known"), 1);
    }

    #[test]
    fn test_encoders_duplicate_feature() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("encoders.json");
        fs::write(
            &path,
            r#"{"features": [{"name": "a", "classes": ["x"]}, {"name": "a", "classes": ["y"]}]}"#,
        )
        .expect("write");
        let err = load_encoders(&path).unwrap_err();
        assert!(err.to_string().contains("listed twice"));
    }

    #[test]
    fn test_encoders_missing() {
        let dir = TempDir::new().expect("temp dir");
        let err = load_encoders(dir.path().join("label_encoders.json")).unwrap_err();
        assert!(matches!(
            err,
            TasadorError::MissingArtifact {
                kind: ArtifactKind::Encoders,
                ..
            }
        ));
    }

    #[test]
    fn test_encoders_malformed() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("encoders.json");
        fs::write(&path, "{not json").expect("write");
        assert!(matches!(load_encoders(&path), Err(TasadorError::Serialization(_))));
    }
}
