use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use deepsearch_form::FormSpec;

use crate::options::WizardOptions;

/// Reads and checks a JSON form definition.
pub fn load_form_spec(path: &Path) -> Result<FormSpec> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("deepsearch: failed to read form spec {}", path.display()))?;
    FormSpec::from_json_str(&raw)
        .with_context(|| format!("deepsearch: form spec {} is invalid", path.display()))
}

/// Reads session options; missing keys keep their defaults.
pub fn load_options(path: &Path) -> Result<WizardOptions> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("deepsearch: failed to read options {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("deepsearch: options file {} is not valid JSON", path.display()))
}
