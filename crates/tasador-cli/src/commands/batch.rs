//! Batch command implementation
//!
//! Replays a CSV of form submissions through one session, then shows and
//! optionally exports the price-filtered history.

use crate::error::{CliError, Result};
use crate::output;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tasador::error::TasadorError;
use tasador::features::{FeatureSpec, FormSubmission};
use tasador::history::PriceRange;
use tasador::{Predictor, Session};

/// Turns one CSV row into a submission.
///
/// Columns named after a numeric field are parsed as numbers, every other
/// column is a categorical selection. Empty cells are left out so the
/// assembler reports them as missing.
pub(crate) fn row_to_submission(
    spec: &FeatureSpec,
    headers: &csv::StringRecord,
    row: &csv::StringRecord,
) -> std::result::Result<FormSubmission, TasadorError> {
    let mut form = FormSubmission::new();
    for (column, cell) in headers.iter().zip(row.iter()) {
        let cell = cell.trim();
        if cell.is_empty() {
            continue;
        }
        if spec.field(column).is_some() {
            let value: f64 = cell.parse().map_err(|_| TasadorError::InvalidInput {
                field: column.to_string(),
                value: cell.to_string(),
                constraint: "a number".to_string(),
            })?;
            form = form.with_numeric(column, value);
        } else {
            form = form.with_selection(column, cell);
        }
    }
    Ok(form)
}

/// Run the batch command
pub(crate) fn run(
    predictor: Arc<Predictor>,
    input: &Path,
    min_price: Option<f64>,
    max_price: Option<f64>,
    export: Option<&Path>,
) -> Result<()> {
    if !input.is_file() {
        return Err(CliError::FileNotFound(input.to_path_buf()));
    }

    let mut reader = csv::Reader::from_path(input)?;
    let headers = reader.headers()?.clone();
    let mut session = Session::new(predictor);

    output::section("Estimates");
    let mut failed = 0usize;
    for (index, row) in reader.records().enumerate() {
        let row = row?;
        let line = index + 1;
        let outcome = row_to_submission(session.predictor().spec(), &headers, &row)
            .and_then(|form| session.submit(&form));
        match outcome {
            Ok(estimate) => {
                for feature in &estimate.substitutions {
                    output::warning(&format!("row {line}: unknown {feature} label"));
                }
                output::success(&format!("row {line}: {estimate}"));
            }
            Err(e) if e.is_recoverable() => {
                failed += 1;
                output::fail(&format!("row {line}: {e}"));
            }
            Err(e) => return Err(e.into()),
        }
    }

    let range = PriceRange::new(min_price, max_price);
    let shown = session.history(range);
    output::section("History");
    output::kv("Recorded", session.ledger().len());
    output::kv("Failed", failed);
    output::kv("In range", shown.len());
    for record in &shown {
        println!("  #{} {}", record.id(), record.prediction());
    }

    if let Some(path) = export {
        let table = session.export(range)?;
        fs::write(path, table)?;
        println!();
        output::success(&format!("Exported {} rows to {}", shown.len(), path.display()));
    }
    Ok(())
}
