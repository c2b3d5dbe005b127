use std::{fs, path::Path};

use anyhow::{Context, Result};

use crate::{
    inputs::PartialRoiInputs,
    schema::{Estimator, EstimatorSchema},
};

/// Supported document encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// `.toml` files.
    Toml,
    /// Everything else.
    Json,
}

impl DocumentFormat {
    /// Picks the format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

/// Loads an estimator schema from a TOML or JSON file.
pub fn load_schema(path: impl AsRef<Path>) -> Result<EstimatorSchema> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading estimator schema {}", path.display()))?;
    let schema = match DocumentFormat::from_path(path) {
        DocumentFormat::Toml => EstimatorSchema::from_toml_str(&raw),
        DocumentFormat::Json => EstimatorSchema::from_json_str(&raw),
    }
    .with_context(|| format!("parsing {}", path.display()))?;
    Ok(schema)
}

/// Loads and validates an estimator schema.
pub fn load_estimator(path: impl AsRef<Path>) -> Result<Estimator> {
    let path = path.as_ref();
    let schema = load_schema(path)?;
    Estimator::new(schema).with_context(|| format!("validating {}", path.display()))
}

/// Loads saved form state (partial inputs) from a TOML or JSON file.
pub fn load_inputs(path: impl AsRef<Path>) -> Result<PartialRoiInputs> {
    let path = path.as_ref();
    let raw =
        fs::read_to_string(path).with_context(|| format!("reading inputs {}", path.display()))?;
    let inputs = match DocumentFormat::from_path(path) {
        DocumentFormat::Toml => toml::from_str(&raw)
            .with_context(|| format!("parsing {}", path.display()))?,
        DocumentFormat::Json => serde_json::from_str(&raw)
            .with_context(|| format!("parsing {}", path.display()))?,
    };
    Ok(inputs)
}
