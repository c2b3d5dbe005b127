use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{error::SchemaError, inputs::PartialRoiInputs, tiers};

/// Industry key used when the selected industry has no factor of its own.
pub const FALLBACK_INDUSTRY: &str = "Other";

/// Declarative estimator configuration for one product or plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimatorSchema {
    /// Industry name to workload multiplier, in dropdown order.
    #[serde(default)]
    pub industry_factors: IndexMap<String, f64>,
    /// Tier groups in display order. The first group owns the overall default tier.
    #[serde(default)]
    pub groups: Vec<TierGroup>,
    /// Static insights shown next to every result.
    #[serde(default)]
    pub summary_output: SummaryOutput,
    /// Form values used before the visitor edits anything.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_inputs: Option<PartialRoiInputs>,
    /// Tuning constants for the gain and time-saved ranges.
    #[serde(default)]
    pub assumptions: EstimatorAssumptions,
}

impl EstimatorSchema {
    /// Parses a schema from JSON.
    pub fn from_json_str(raw: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Parses a schema from TOML.
    pub fn from_toml_str(raw: &str) -> Result<Self, SchemaError> {
        Ok(toml::from_str(raw)?)
    }

    /// Total number of tiers across all groups.
    #[must_use]
    pub fn tier_count(&self) -> usize {
        self.groups.iter().map(|group| group.tiers.len()).sum()
    }
}

/// Static copy rendered with every estimate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryOutput {
    /// Insight bullet points.
    #[serde(default)]
    pub points: Vec<String>,
}

/// A named set of tiers, e.g. "Subscription" or "Self-hosted".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierGroup {
    /// Group identifier.
    pub key: String,
    /// Display label.
    pub label: String,
    /// Tiers in display order.
    #[serde(default)]
    pub tiers: Vec<TierDefinition>,
}

/// One pricing or deployment option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierDefinition {
    /// Identifier, unique within the schema.
    pub key: String,
    /// Display label.
    pub label: String,
    /// Marks the preselected tier of its group.
    #[serde(default)]
    pub is_group_default: bool,
    /// Optional implementation/setup investment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup_range: Option<CostRange>,
    /// Cost structure, tagged by `kind`.
    #[serde(flatten)]
    pub pricing: TierPricing,
}

impl TierDefinition {
    /// Discriminator of the pricing shape.
    #[must_use]
    pub const fn kind(&self) -> TierKind {
        match self.pricing {
            TierPricing::Subscription(_) => TierKind::Subscription,
            TierPricing::SelfHosted(_) => TierKind::SelfHosted,
        }
    }

    /// Whether the tier is a one-time buyout.
    #[must_use]
    pub const fn is_self_hosted(&self) -> bool {
        matches!(self.kind(), TierKind::SelfHosted)
    }
}

/// Tier discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TierKind {
    /// Recurring subscription.
    Subscription,
    /// Self-hosted buyout.
    SelfHosted,
}

impl TierKind {
    /// Label for logging.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Subscription => "subscription",
            Self::SelfHosted => "selfHosted",
        }
    }
}

/// Cost structure of a tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TierPricing {
    /// Billed monthly and/or annually.
    Subscription(SubscriptionPricing),
    /// Bought once, then maintained yearly.
    SelfHosted(SelfHostedPricing),
}

/// Recurring subscription prices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPricing {
    /// Price per month.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_cost: Option<f64>,
    /// Price per year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_cost: Option<f64>,
}

/// Buyout prices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfHostedPricing {
    /// License purchase price.
    pub one_time_cost: f64,
    /// Ongoing maintenance per year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_cost: Option<f64>,
}

/// Inclusive cost range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostRange {
    /// Lower bound.
    pub low: f64,
    /// Upper bound.
    pub high: f64,
}

impl CostRange {
    /// Midpoint of the range.
    #[must_use]
    pub fn midpoint(self) -> f64 {
        (self.low + self.high) / 2.0
    }
}

/// Tunable constants behind the low/high gain bounds and time saved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimatorAssumptions {
    /// Conservative revenue lift as a fraction of monthly deal volume.
    #[serde(default = "default_lift_low")]
    pub lift_low: f64,
    /// Optimistic revenue lift as a fraction of monthly deal volume.
    #[serde(default = "default_lift_high")]
    pub lift_high: f64,
    /// Share of per-deal effort removed by automation, before the industry factor.
    #[serde(default = "default_automation_reduction")]
    pub automation_reduction: f64,
    /// Upper bound for the industry-adjusted reduction.
    #[serde(default = "default_max_automation_reduction")]
    pub max_automation_reduction: f64,
}

impl Default for EstimatorAssumptions {
    fn default() -> Self {
        Self {
            lift_low: default_lift_low(),
            lift_high: default_lift_high(),
            automation_reduction: default_automation_reduction(),
            max_automation_reduction: default_max_automation_reduction(),
        }
    }
}

impl EstimatorAssumptions {
    fn validate(&self) -> Result<(), SchemaError> {
        let fractions = [
            ("liftLow", self.lift_low),
            ("liftHigh", self.lift_high),
            ("automationReduction", self.automation_reduction),
            ("maxAutomationReduction", self.max_automation_reduction),
        ];
        if let Some((name, value)) = fractions
            .iter()
            .find(|(_, value)| !value.is_finite() || !(0.0..=1.0).contains(value))
        {
            return Err(SchemaError::InvalidAssumptions(format!(
                "{name} must be a fraction between 0 and 1 (got {value})"
            )));
        }
        if self.lift_low > self.lift_high {
            return Err(SchemaError::InvalidAssumptions(format!(
                "liftLow {} exceeds liftHigh {}",
                self.lift_low, self.lift_high
            )));
        }
        Ok(())
    }
}

const fn default_lift_low() -> f64 {
    0.10
}

const fn default_lift_high() -> f64 {
    0.25
}

const fn default_automation_reduction() -> f64 {
    0.40
}

const fn default_max_automation_reduction() -> f64 {
    0.90
}

/// Validated, read-only estimator handle.
#[derive(Debug, Clone)]
pub struct Estimator {
    schema: EstimatorSchema,
    default_key: String,
    default_tier: TierDefinition,
}

impl Estimator {
    /// Validates a schema and resolves its default tier.
    pub fn new(schema: EstimatorSchema) -> Result<Self, SchemaError> {
        for (industry, factor) in &schema.industry_factors {
            if !factor.is_finite() || *factor < 0.0 {
                return Err(SchemaError::InvalidIndustryFactor {
                    industry: industry.clone(),
                    value: *factor,
                });
            }
        }
        for tier in schema.groups.iter().flat_map(|group| &group.tiers) {
            validate_tier(tier)?;
        }
        schema.assumptions.validate()?;
        let default_key = tiers::default_tier_key(&schema)
            .ok_or(SchemaError::NoTiers)?
            .to_string();
        let default_tier = tiers::find_tier(&schema, &default_key)
            .ok_or(SchemaError::NoTiers)?
            .tier
            .clone();
        Ok(Self {
            schema,
            default_key,
            default_tier,
        })
    }

    /// Parses and validates a JSON schema.
    pub fn from_json_str(raw: &str) -> Result<Self, SchemaError> {
        Self::new(EstimatorSchema::from_json_str(raw)?)
    }

    /// Parses and validates a TOML schema.
    pub fn from_toml_str(raw: &str) -> Result<Self, SchemaError> {
        Self::new(EstimatorSchema::from_toml_str(raw)?)
    }

    /// Underlying schema.
    #[must_use]
    pub const fn schema(&self) -> &EstimatorSchema {
        &self.schema
    }

    /// Key of the tier preselected when nothing else is chosen.
    #[must_use]
    pub fn default_tier_key(&self) -> &str {
        &self.default_key
    }

    /// Tier for a key. Missing or unknown keys resolve to the default tier.
    #[must_use]
    pub fn resolve_tier(&self, key: Option<&str>) -> &TierDefinition {
        key.and_then(|key| tiers::find_tier(&self.schema, key))
            .map_or(&self.default_tier, |config| config.tier)
    }

    /// Whether a key names a tier of this schema.
    #[must_use]
    pub fn has_tier(&self, key: &str) -> bool {
        tiers::find_tier(&self.schema, key).is_some()
    }

    /// Tuning constants in effect.
    #[must_use]
    pub const fn assumptions(&self) -> &EstimatorAssumptions {
        &self.schema.assumptions
    }
}

fn validate_tier(tier: &TierDefinition) -> Result<(), SchemaError> {
    let check = |field: &'static str, value: f64| {
        if value.is_finite() && value >= 0.0 {
            Ok(())
        } else {
            Err(SchemaError::InvalidCost {
                tier: tier.key.clone(),
                field,
                value,
            })
        }
    };
    match &tier.pricing {
        TierPricing::Subscription(pricing) => {
            if let Some(monthly) = pricing.monthly_cost {
                check("monthlyCost", monthly)?;
            }
            if let Some(annual) = pricing.annual_cost {
                check("annualCost", annual)?;
            }
        }
        TierPricing::SelfHosted(pricing) => {
            check("oneTimeCost", pricing.one_time_cost)?;
            if let Some(maintenance) = pricing.maintenance_cost {
                check("maintenanceCost", maintenance)?;
            }
        }
    }
    if let Some(range) = tier.setup_range {
        check("setupRange.low", range.low)?;
        check("setupRange.high", range.high)?;
        if range.low > range.high {
            return Err(SchemaError::InvalidSetupRange {
                tier: tier.key.clone(),
                low: range.low,
                high: range.high,
            });
        }
    }
    Ok(())
}
