//! Labels command implementation
//!
//! Shows what each categorical selector offers, with the code the model sees.

use crate::error::Result;
use crate::output;
use tasador::registry::display_name;
use tasador::Predictor;

/// Run the labels command
pub(crate) fn run(predictor: &Predictor, feature: Option<&str>) -> Result<()> {
    let registry = predictor.registry();
    let features: Vec<&str> = match feature {
        Some(name) => {
            registry.labels_for(name)?;
            vec![name]
        }
        None => registry.features().collect(),
    };

    if features.is_empty() {
        output::warning("encoder artifact defines no categorical features");
        return Ok(());
    }

    for name in features {
        output::section(&format!("{} ({name})", display_name(name)));
        for label in registry.labels_for(name)? {
            let code = registry.encode(name, label)?;
            output::kv(label, code);
        }
    }
    Ok(())
}
