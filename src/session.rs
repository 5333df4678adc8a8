//! Predictor and per-session state.
//!
//! A [`Predictor`] is built once per process from the artifacts and shared
//! read-only between sessions. Each [`Session`] owns its own history; it is
//! created when a user session starts and dropped when it ends.

use crate::artifact;
use crate::assembler::FeatureVectorAssembler;
use crate::config::PredictorConfig;
use crate::error::Result;
use crate::features::{FeatureSpec, FormSubmission};
use crate::history::{FieldValue, HistoryLedger, PendingRecord, PredictionRecord, PriceRange};
use crate::inference::InferenceAdapter;
use crate::registry::{EncoderRegistry, UnknownCategoryPolicy};
use crate::traits::Regressor;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of a successful prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    /// Price rounded to 2 decimal places.
    pub price: f64,
    /// Ledger id, when the estimate was recorded.
    pub record_id: Option<u64>,
    /// Features whose unknown label was replaced by the sentinel code.
    pub substitutions: Vec<String>,
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Estimated House Price: {}", FieldValue::Float(self.price))
    }
}

/// The shared, read-only estimation pipeline.
#[derive(Debug)]
pub struct Predictor {
    assembler: FeatureVectorAssembler,
    adapter: InferenceAdapter,
}

impl Predictor {
    /// Combines an assembler with a loaded model.
    #[must_use]
    pub fn new(assembler: FeatureVectorAssembler, model: Box<dyn Regressor>) -> Self {
        let adapter = InferenceAdapter::new(model);
        if let Some(expected) = adapter.n_features() {
            if expected != assembler.width() {
                warn!(
                    model_features = expected,
                    row_width = assembler.width(),
                    "model and encoders disagree on row width; predictions will fail"
                );
            }
        }
        Self { assembler, adapter }
    }

    /// Loads both artifacts for the housing form.
    ///
    /// # Errors
    ///
    /// Returns `MissingArtifact` if either artifact is absent, or a format
    /// error if one cannot be decoded.
    pub fn load(config: &PredictorConfig) -> Result<Self> {
        Self::load_with_spec(config, FeatureSpec::housing())
    }

    /// Loads both artifacts for a custom numeric spec.
    ///
    /// # Errors
    ///
    /// Same as [`Predictor::load`].
    pub fn load_with_spec(config: &PredictorConfig, spec: FeatureSpec) -> Result<Self> {
        let registry = artifact::load_encoders(&config.encoders_path)?;
        let model = artifact::load_model(&config.model_path)?;
        let assembler = FeatureVectorAssembler::new(spec, registry).with_policy(config.policy);
        info!(policy = %config.policy, width = assembler.width(), "predictor ready");
        Ok(Self::new(assembler, Box::new(model)))
    }

    /// The numeric feature spec.
    #[must_use]
    pub fn spec(&self) -> &FeatureSpec {
        self.assembler.spec()
    }

    /// The categorical encoder registry.
    #[must_use]
    pub fn registry(&self) -> &EncoderRegistry {
        self.assembler.registry()
    }

    /// The unknown-category policy in force.
    #[must_use]
    pub fn policy(&self) -> UnknownCategoryPolicy {
        self.assembler.policy()
    }

    /// Assembles and predicts without recording.
    ///
    /// # Errors
    ///
    /// Propagates assembly errors (`UnknownCategory`, `MissingInput`, ...)
    /// and `InferenceError`. No inference happens if assembly fails.
    pub fn predict(&self, form: &FormSubmission) -> Result<Estimate> {
        let vector = self.assembler.assemble(form)?;
        let price = self.adapter.predict(&vector)?;
        Ok(Estimate {
            price,
            record_id: None,
            substitutions: vector.substitutions().to_vec(),
        })
    }

    /// History record for a validated submission: numeric fields in spec
    /// order, then labels in registry order.
    fn pending_record(&self, form: &FormSubmission, price: f64) -> PendingRecord {
        let numeric = self.spec().names().filter_map(|name| {
            form.numeric
                .get(name)
                .map(|v| (name.to_string(), FieldValue::from_input(*v)))
        });
        let categorical = self.registry().features().filter_map(|name| {
            form.categorical
                .get(name)
                .map(|label| (name.to_string(), FieldValue::from(label.as_str())))
        });
        numeric
            .chain(categorical)
            .fold(PendingRecord::new(price), |record, (k, v)| record.with_field(k, v))
    }
}

/// One user's session: a shared predictor plus an owned history.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use tasador::prelude::*;
///
/// let mut registry = EncoderRegistry::new();
/// registry.insert("mainroad", LabelEncoder::fit(["no", "yes"])).unwrap();
/// let assembler = FeatureVectorAssembler::new(FeatureSpec::housing(), registry);
/// let model = LinearRegression::from_parts(vec![100.0, 0.0, 0.0, 0.0, 0.0, 5000.0], 0.0);
/// let predictor = Arc::new(Predictor::new(assembler, Box::new(model)));
///
/// let mut session = Session::new(Arc::clone(&predictor));
/// let form = FormSubmission::new()
///     .with_numeric("area", 1200.0)
///     .with_numeric("bedrooms", 3.0)
///     .with_numeric("bathrooms", 1.0)
///     .with_numeric("stories", 1.0)
///     .with_numeric("parking", 0.0)
///     .with_selection("mainroad", "yes");
///
/// let estimate = session.submit(&form).unwrap();
/// assert_eq!(estimate.price, 125_000.0);
/// assert_eq!(estimate.record_id, Some(1));
/// assert_eq!(
///     session.export(PriceRange::default()).unwrap(),
///     "area,bedrooms,bathrooms,stories,parking,mainroad,prediction,id\n\
///      1200,3,1,1,0,yes,125000.0,1\n"
/// );
/// ```
#[derive(Debug)]
pub struct Session {
    predictor: Arc<Predictor>,
    ledger: HistoryLedger,
}

impl Session {
    /// Starts a session with an empty history.
    #[must_use]
    pub fn new(predictor: Arc<Predictor>) -> Self {
        Self {
            predictor,
            ledger: HistoryLedger::new(),
        }
    }

    /// The shared predictor.
    #[must_use]
    pub fn predictor(&self) -> &Predictor {
        &self.predictor
    }

    /// Predicts and records the result in this session's history.
    ///
    /// Nothing is recorded when the prediction fails; the session stays
    /// usable for a corrected retry.
    ///
    /// # Errors
    ///
    /// Same as [`Predictor::predict`].
    pub fn submit(&mut self, form: &FormSubmission) -> Result<Estimate> {
        let mut estimate = self.predictor.predict(form).map_err(|e| {
            warn!(error = %e, "prediction rejected");
            e
        })?;
        let record = self
            .ledger
            .append(self.predictor.pending_record(form, estimate.price));
        info!(id = record.id(), price = estimate.price, "prediction recorded");
        estimate.record_id = Some(record.id());
        Ok(estimate)
    }

    /// Predicts without touching the history.
    ///
    /// # Errors
    ///
    /// Same as [`Predictor::predict`].
    pub fn estimate(&self, form: &FormSubmission) -> Result<Estimate> {
        self.predictor.predict(form)
    }

    /// History entries priced within `range`, newest-first.
    #[must_use]
    pub fn history(&self, range: PriceRange) -> Vec<&PredictionRecord> {
        self.ledger.filter(range)
    }

    /// CSV export of history entries priced within `range`.
    ///
    /// # Errors
    ///
    /// Returns an error if CSV serialization fails.
    pub fn export(&self, range: PriceRange) -> Result<String> {
        self.ledger.export(range)
    }

    /// Empties the history without resetting ids.
    pub fn clear_history(&mut self) {
        self.ledger.clear();
    }

    /// Read access to the ledger.
    #[must_use]
    pub fn ledger(&self) -> &HistoryLedger {
        &self.ledger
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TasadorError;
    use crate::linear_model::LinearRegression;
    use crate::preprocessing::LabelEncoder;
    use crate::registry::SENTINEL_CODE;
    use tempfile::TempDir;

    fn predictor(policy: UnknownCategoryPolicy) -> Predictor {
        let mut registry = EncoderRegistry::new();
        registry
            .insert("mainroad", LabelEncoder::fit(["no", "yes"]))
            .expect("fresh feature");
        registry
            .insert(
                "furnishingstatus",
                LabelEncoder::fit(["furnished", "semi-furnished", "unfurnished"]),
            )
            .expect("fresh feature");
        let assembler =
            FeatureVectorAssembler::new(FeatureSpec::housing(), registry).with_policy(policy);
        // price = 100*area + 10000*bedrooms + 1000*mainroad - 500*furnishing + 0.125
        let model = LinearRegression::from_parts(
            vec![100.0, 10_000.0, 0.0, 0.0, 0.0, 1_000.0, -500.0],
            0.125,
        );
        Predictor::new(assembler, Box::new(model))
    }

    fn form(area: f64) -> FormSubmission {
        FormSubmission::new()
            .with_numeric("area", area)
            .with_numeric("bedrooms", 2.0)
            .with_numeric("bathrooms", 1.0)
            .with_numeric("stories", 1.0)
            .with_numeric("parking", 1.0)
            .with_selection("mainroad", "yes")
            .with_selection("furnishingstatus", "unfurnished")
    }

    #[test]
    fn test_predict_rounds_and_does_not_record() {
        let predictor = Arc::new(predictor(UnknownCategoryPolicy::Reject));
        let session = Session::new(Arc::clone(&predictor));
        let estimate = session.estimate(&form(1000.0)).expect("valid form");
        // 100000 + 20000 + 1000 - 1000 + 0.125
        assert_eq!(estimate.price, 120_000.13);
        assert_eq!(estimate.record_id, None);
        assert!(session.ledger().is_empty());
    }

    #[test]
    fn test_submit_records_newest_first() {
        let mut session = Session::new(Arc::new(predictor(UnknownCategoryPolicy::Reject)));
        session.submit(&form(1000.0)).expect("valid form");
        let second = session.submit(&form(2000.0)).expect("valid form");
        assert_eq!(second.record_id, Some(2));

        let history = session.history(PriceRange::default());
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id(), 2);
        assert_eq!(history[0].prediction(), second.price);
    }

    #[test]
    fn test_submit_unknown_label_records_nothing() {
        let mut session = Session::new(Arc::new(predictor(UnknownCategoryPolicy::Reject)));
        let bad = form(1000.0).with_selection("mainroad", "gravel");
        let err = session.submit(&bad).unwrap_err();
        assert!(matches!(err, TasadorError::UnknownCategory { .. }));
        assert!(session.ledger().is_empty());
        assert_eq!(session.ledger().next_id(), 1);

        let ok = session.submit(&form(1000.0)).expect("session still usable");
        assert_eq!(ok.record_id, Some(1));
    }

    #[test]
    fn test_submit_sentinel_reports_substitution() {
        let mut session = Session::new(Arc::new(predictor(UnknownCategoryPolicy::sentinel())));
        let odd = form(1000.0).with_selection("furnishingstatus", "partly");
        let estimate = session.submit(&odd).expect("sentinel proceeds");
        assert_eq!(estimate.substitutions, ["furnishingstatus"]);
        // furnishing code -1 contributes +500 instead of -1000
        assert_eq!(estimate.price, 121_500.13);
        assert_eq!(SENTINEL_CODE, -1);

        let record = session.ledger().latest().expect("recorded");
        assert_eq!(
            record.get("furnishingstatus"),
            Some(FieldValue::Text("partly".to_string()))
        );
    }

    #[test]
    fn test_record_field_order() {
        let mut session = Session::new(Arc::new(predictor(UnknownCategoryPolicy::Reject)));
        session.submit(&form(1500.0)).expect("valid form");
        let csv = session.export(PriceRange::default()).expect("writes");
        let header = csv.lines().next().expect("header");
        assert_eq!(
            header,
            "area,bedrooms,bathrooms,stories,parking,mainroad,furnishingstatus,prediction,id"
        );
    }

    #[test]
    fn test_clear_history_keeps_ids() {
        let mut session = Session::new(Arc::new(predictor(UnknownCategoryPolicy::Reject)));
        session.submit(&form(1000.0)).expect("valid form");
        session.clear_history();
        assert!(session.history(PriceRange::default()).is_empty());
        let next = session.submit(&form(1000.0)).expect("valid form");
        assert_eq!(next.record_id, Some(2));
    }

    #[test]
    fn test_sessions_are_independent() {
        let predictor = Arc::new(predictor(UnknownCategoryPolicy::Reject));
        let mut alice = Session::new(Arc::clone(&predictor));
        let mut bob = Session::new(Arc::clone(&predictor));
        alice.submit(&form(1000.0)).expect("valid form");
        alice.submit(&form(1000.0)).expect("valid form");
        let first_for_bob = bob.submit(&form(1000.0)).expect("valid form");
        assert_eq!(first_for_bob.record_id, Some(1));
        assert_eq!(alice.ledger().len(), 2);
        assert_eq!(bob.ledger().len(), 1);
    }

    #[test]
    fn test_predictor_shared_across_threads() {
        let predictor = Arc::new(predictor(UnknownCategoryPolicy::Reject));
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let predictor = Arc::clone(&predictor);
                std::thread::spawn(move || {
                    let mut session = Session::new(predictor);
                    for _ in 0..=i {
                        session.submit(&form(1000.0)).expect("valid form");
                    }
                    session.ledger().len()
                })
            })
            .collect();
        let lens: Vec<usize> = handles
            .into_iter()
            .map(|h| h.join().expect("thread finished"))
            .collect();
        assert_eq!(lens, [1, 2, 3, 4]);
    }

    #[test]
    fn test_width_mismatch_is_per_request() {
        let mut registry = EncoderRegistry::new();
        registry
            .insert("mainroad", LabelEncoder::fit(["no", "yes"]))
            .expect("fresh feature");
        let assembler = FeatureVectorAssembler::new(FeatureSpec::housing(), registry);
        let predictor = Predictor::new(assembler, Box::new(LinearRegression::from_parts(vec![1.0], 0.0)));
        let mut session = Session::new(Arc::new(predictor));
        let mut form = form(1000.0);
        form.categorical.remove("furnishingstatus");
        let err = session.submit(&form).unwrap_err();
        assert!(matches!(err, TasadorError::InferenceError { .. }));
        assert!(session.ledger().is_empty());
    }

    #[test]
    fn test_load_reports_missing_artifacts() {
        let dir = TempDir::new().expect("temp dir");
        let config = PredictorConfig::default()
            .with_model_path(dir.path().join("model.tsdr"))
            .with_encoders_path(dir.path().join("encoders.json"));
        let err = Predictor::load(&config).unwrap_err();
        assert!(matches!(err, TasadorError::MissingArtifact { .. }));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_load_from_artifacts() {
        let dir = TempDir::new().expect("temp dir");
        let source = predictor(UnknownCategoryPolicy::Reject);
        let config = PredictorConfig::default()
            .with_model_path(dir.path().join("model.tsdr"))
            .with_encoders_path(dir.path().join("encoders.json"))
            .with_policy(UnknownCategoryPolicy::sentinel());
        artifact::save_encoders(source.registry(), &config.encoders_path).expect("save");
        artifact::save_model(
            &LinearRegression::from_parts(vec![100.0, 10_000.0, 0.0, 0.0, 0.0, 1_000.0, -500.0], 0.125),
            &config.model_path,
        )
        .expect("save");

        let loaded = Predictor::load(&config).expect("load");
        assert_eq!(loaded.policy(), UnknownCategoryPolicy::sentinel());
        assert_eq!(
            loaded.predict(&form(1000.0)).expect("valid form").price,
            source.predict(&form(1000.0)).expect("valid form").price
        );
    }

    #[test]
    fn test_estimate_display() {
        let estimate = Estimate {
            price: 250_000.0,
            record_id: None,
            substitutions: Vec::new(),
        };
        assert_eq!(estimate.to_string(), "Estimated House Price: 250000.0");
    }
}
