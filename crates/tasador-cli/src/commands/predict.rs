//! Predict command implementation
//!
//! One form submission, one estimate. Omitted fields take the value the form
//! would show pre-filled: the field minimum for numbers, the first known
//! label for selectors.

use crate::error::{CliError, Result};
use crate::output;
use clap::Args;
use tasador::features::FormSubmission;
use tasador::registry::display_name;
use tasador::Predictor;

/// House attributes for a single estimate
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct PredictArgs {
    /// Area in square feet (min 100)
    #[arg(long)]
    pub area: Option<f64>,

    /// Bedrooms (min 1)
    #[arg(long)]
    pub bedrooms: Option<f64>,

    /// Bathrooms (min 1)
    #[arg(long)]
    pub bathrooms: Option<f64>,

    /// Stories (min 1)
    #[arg(long)]
    pub stories: Option<f64>,

    /// Parking spaces (min 0)
    #[arg(long)]
    pub parking: Option<f64>,

    /// Categorical selection as feature=label (repeatable)
    #[arg(short, long = "select", value_name = "FEATURE=LABEL")]
    pub selections: Vec<String>,
}

impl PredictArgs {
    fn numeric(&self, field: &str) -> Option<f64> {
        match field {
            "area" => self.area,
            "bedrooms" => self.bedrooms,
            "bathrooms" => self.bathrooms,
            "stories" => self.stories,
            "parking" => self.parking,
            _ => None,
        }
    }
}

/// Splits `feature=label`.
pub(crate) fn parse_selection(raw: &str) -> Result<(String, String)> {
    raw.split_once('=')
        .map(|(feature, label)| (feature.trim().to_string(), label.trim().to_string()))
        .filter(|(feature, _)| !feature.is_empty())
        .ok_or_else(|| CliError::InvalidArgument(format!("expected FEATURE=LABEL, got '{raw}'")))
}

/// Builds the submission the form would send for these arguments.
pub(crate) fn build_submission(predictor: &Predictor, args: &PredictArgs) -> Result<FormSubmission> {
    let mut form = FormSubmission::new();
    for field in predictor.spec().fields() {
        let value = args.numeric(&field.name).unwrap_or(field.min);
        form = form.with_numeric(field.name.clone(), value);
    }

    for raw in &args.selections {
        let (feature, label) = parse_selection(raw)?;
        form = form.with_selection(feature, label);
    }

    let registry = predictor.registry();
    for feature in registry.features() {
        if form.categorical.contains_key(feature) {
            continue;
        }
        if let Some(first) = registry.labels_for(feature)?.first() {
            form = form.with_selection(feature, first.clone());
        }
    }
    Ok(form)
}

/// Run the predict command
pub(crate) fn run(predictor: &Predictor, args: &PredictArgs) -> Result<()> {
    let form = build_submission(predictor, args)?;
    let estimate = predictor.predict(&form)?;

    output::section("House");
    for field in predictor.spec().fields() {
        output::kv(&field.label, form.numeric[&field.name]);
    }
    for feature in predictor.registry().features() {
        output::kv(&display_name(feature), &form.categorical[feature]);
    }

    for feature in &estimate.substitutions {
        output::warning(&format!(
            "'{}' is not a known {feature}; estimate may be unreliable",
            form.categorical[feature]
        ));
    }
    println!();
    output::success(&estimate.to_string());
    Ok(())
}
