#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rust_2018_idioms,
    missing_docs
)]

//! ROI estimator core – resolves pricing tiers, normalises form input, and projects
//! gains, time saved, payback and multi-year profit for each tier.

/// Schema types and the validated estimator handle.
pub mod schema;

/// Load-time errors.
pub mod error;

/// Schema and input document loading.
pub mod config;

/// Tier flattening and default selection.
pub mod tiers;

/// Raw form input coercion.
pub mod inputs;

/// Per-tier projections.
pub mod calculator;

/// Interactive estimator state.
pub mod session;

/// Read-only snapshots.
pub mod snapshot;

/// Display formatting.
pub mod format;

/// Telemetry for estimator consumers.
pub mod telemetry;

pub use calculator::{
    compare_tiers, compute_tier_result, industry_factor, Payback, RoiTierResult, TierCosts,
    TierResultRequest,
};
pub use error::SchemaError;
pub use inputs::{
    coerce_inputs, default_inputs, InputField, InputValue, PartialRoiInputs, RoiInputs,
};
pub use schema::{
    CostRange, Estimator, EstimatorAssumptions, EstimatorSchema, TierDefinition, TierGroup,
    TierKind, TierPricing,
};
pub use session::EstimatorSession;
pub use snapshot::{MetricCard, RoiSnapshot};
pub use telemetry::{EstimatorTelemetry, EstimatorTelemetryBuilder};
pub use tiers::{default_tier_key, find_tier, resolve_tier_configs, TierConfig};
