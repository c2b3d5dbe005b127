use std::sync::Arc;

use roi_logging::LogLevel;
use serde_json::json;
use uuid::Uuid;

use crate::{
    calculator::{compare_tiers, compute_tier_result, RoiTierResult, TierResultRequest},
    inputs::{coerce_inputs, InputField, InputValue, PartialRoiInputs, RoiInputs},
    schema::{Estimator, TierDefinition},
    snapshot::RoiSnapshot,
    telemetry::EstimatorTelemetry,
};

/// Interactive estimator state: the form, the selected tier and the setup toggle.
///
/// Results are recomputed on every call to [`EstimatorSession::result`]; nothing is cached.
#[derive(Debug, Clone)]
pub struct EstimatorSession {
    id: Uuid,
    estimator: Arc<Estimator>,
    raw: PartialRoiInputs,
    inputs: RoiInputs,
    tier_key: String,
    show_setup: bool,
    telemetry: Option<EstimatorTelemetry>,
}

impl EstimatorSession {
    /// Opens a session with default inputs and the default tier.
    #[must_use]
    pub fn new(estimator: Arc<Estimator>) -> Self {
        Self::with_inputs(estimator, PartialRoiInputs::default())
    }

    /// Opens a session prefilled from saved form state.
    #[must_use]
    pub fn with_inputs(estimator: Arc<Estimator>, raw: PartialRoiInputs) -> Self {
        let inputs = coerce_inputs(estimator.schema(), Some(&raw));
        let tier = estimator.resolve_tier(None);
        let tier_key = tier.key.clone();
        let show_setup = setup_default(tier);
        Self {
            id: Uuid::new_v4(),
            estimator,
            raw,
            inputs,
            tier_key,
            show_setup,
            telemetry: None,
        }
    }

    /// Attaches telemetry.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: EstimatorTelemetry) -> Self {
        self.telemetry = Some(telemetry);
        self.log(
            LogLevel::Info,
            "estimator.session.opened",
            &json!({ "tier": self.tier_key }),
        );
        self
    }

    /// Session id.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Estimator backing this session.
    #[must_use]
    pub fn estimator(&self) -> &Estimator {
        &self.estimator
    }

    /// Coerced inputs.
    #[must_use]
    pub const fn inputs(&self) -> &RoiInputs {
        &self.inputs
    }

    /// Form state as entered.
    #[must_use]
    pub const fn raw_inputs(&self) -> &PartialRoiInputs {
        &self.raw
    }

    /// Selected tier key.
    #[must_use]
    pub fn tier_key(&self) -> &str {
        &self.tier_key
    }

    /// Whether the setup investment is currently displayed.
    #[must_use]
    pub const fn show_setup(&self) -> bool {
        self.show_setup
    }

    /// Applies one field edit and returns the re-coerced inputs.
    pub fn set_field(&mut self, field: InputField, value: impl Into<InputValue>) -> &RoiInputs {
        self.raw.set(field, value.into());
        self.inputs = coerce_inputs(self.estimator.schema(), Some(&self.raw));
        self.log(
            LogLevel::Debug,
            "estimator.field.updated",
            &json!({ "field": field.label(), "inputs": self.inputs }),
        );
        &self.inputs
    }

    /// Selects a tier; unknown keys select the default tier. Returns the key in effect.
    pub fn select_tier(&mut self, key: &str) -> &str {
        let tier = self.estimator.resolve_tier(Some(key));
        if tier.key != key {
            self.log(
                LogLevel::Warn,
                "estimator.tier.unknown",
                &json!({ "requested": key, "fallback": tier.key }),
            );
        }
        self.tier_key = tier.key.clone();
        self.show_setup = setup_default(tier);
        self.log(
            LogLevel::Info,
            "estimator.tier.selected",
            &json!({ "tier": self.tier_key, "kind": tier.kind().label() }),
        );
        &self.tier_key
    }

    /// Flips the setup-investment display. Tiers without a setup range keep it hidden.
    pub fn toggle_setup(&mut self) -> bool {
        let tier = self.estimator.resolve_tier(Some(self.tier_key.as_str()));
        self.show_setup = setup_default(tier) && !self.show_setup;
        self.log(
            LogLevel::Debug,
            "estimator.setup.toggled",
            &json!({ "tier": self.tier_key, "showSetup": self.show_setup }),
        );
        self.show_setup
    }

    /// Restores default inputs and the default tier.
    pub fn reset(&mut self) {
        self.raw = PartialRoiInputs::default();
        self.inputs = coerce_inputs(self.estimator.schema(), None);
        let tier = self.estimator.resolve_tier(None);
        self.tier_key = tier.key.clone();
        self.show_setup = setup_default(tier);
        self.log(LogLevel::Info, "estimator.session.reset", &json!({}));
    }

    /// Result for the selected tier.
    #[must_use]
    pub fn result(&self) -> RoiTierResult {
        compute_tier_result(TierResultRequest {
            estimator: self.estimator.as_ref(),
            inputs: &self.inputs,
            tier_key: Some(self.tier_key.as_str()),
        })
    }

    /// Results for every tier, in schema order.
    #[must_use]
    pub fn compare(&self) -> Vec<RoiTierResult> {
        compare_tiers(&self.estimator, &self.inputs)
    }

    /// Read-only snapshot of the current state.
    #[must_use]
    pub fn snapshot(&self) -> RoiSnapshot {
        RoiSnapshot::from_result(
            &self.estimator,
            self.inputs.clone(),
            self.result(),
            self.show_setup,
        )
    }

    fn log(&self, level: LogLevel, message: &str, metadata: &serde_json::Value) {
        if let Some(telemetry) = &self.telemetry {
            let mut metadata = metadata.clone();
            if let Some(fields) = metadata.as_object_mut() {
                fields.insert("session".into(), json!(self.id));
            }
            let _ = telemetry.log(level, message, &metadata);
        }
    }
}

fn setup_default(tier: &TierDefinition) -> bool {
    tier.setup_range.is_some_and(|range| range.high > 0.0)
}
