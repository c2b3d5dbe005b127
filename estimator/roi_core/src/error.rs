use thiserror::Error;

/// Errors raised while parsing or validating an estimator schema.
///
/// Computation never fails once an [`crate::Estimator`] exists; every variant here is a
/// load-time configuration problem.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The JSON document could not be decoded.
    #[error("invalid schema json: {0}")]
    Json(#[from] serde_json::Error),
    /// The TOML document could not be decoded.
    #[error("invalid schema toml: {0}")]
    Toml(#[from] toml::de::Error),
    /// No group contains a tier, so there is nothing to select.
    #[error("schema defines no pricing tiers")]
    NoTiers,
    /// A tier carries a cost that is negative or not a number.
    #[error("tier {tier}: {field} must be a finite, non-negative amount (got {value})")]
    InvalidCost {
        /// Offending tier key.
        tier: String,
        /// Offending field.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// A setup range has its bounds reversed.
    #[error("tier {tier}: setup range low {low} exceeds high {high}")]
    InvalidSetupRange {
        /// Offending tier key.
        tier: String,
        /// Lower bound.
        low: f64,
        /// Upper bound.
        high: f64,
    },
    /// An industry multiplier is negative or not a number.
    #[error("industry factor for {industry} must be finite and non-negative (got {value})")]
    InvalidIndustryFactor {
        /// Industry name.
        industry: String,
        /// Rejected multiplier.
        value: f64,
    },
    /// Tuning constants are out of range.
    #[error("invalid assumptions: {0}")]
    InvalidAssumptions(String),
}
