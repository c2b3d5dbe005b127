//! Tier result calculation.
//!
//! Every function here is pure: the same estimator, inputs and tier always produce the
//! same result, and no input shape makes them fail. Unknown tiers resolve to the default
//! tier, unknown industries to the `"Other"` factor (or 1.0).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    inputs::RoiInputs,
    schema::{CostRange, Estimator, TierDefinition, TierPricing, FALLBACK_INDUSTRY},
    tiers,
};

/// Months in the one, five and ten year projections.
const YEAR_1_MONTHS: f64 = 12.0;
const YEAR_5_MONTHS: f64 = 60.0;
const YEAR_10_MONTHS: f64 = 120.0;

/// Arguments of [`compute_tier_result`].
#[derive(Debug, Clone, Copy)]
pub struct TierResultRequest<'a> {
    /// Validated schema.
    pub estimator: &'a Estimator,
    /// Coerced inputs.
    pub inputs: &'a RoiInputs,
    /// Selected tier; `None` or an unknown key selects the default tier.
    pub tier_key: Option<&'a str>,
}

/// Months until the upfront investment is recovered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "months", rename_all = "camelCase")]
pub enum Payback {
    /// The tier has no upfront investment to recover.
    NotApplicable,
    /// Recovered after this many months.
    Months(f64),
    /// Monthly net benefit is zero or negative, so the investment is never recovered.
    NotAchievable,
}

impl Payback {
    /// Month count when payback is reachable.
    #[must_use]
    pub const fn months(self) -> Option<f64> {
        match self {
            Self::Months(months) => Some(months),
            Self::NotApplicable | Self::NotAchievable => None,
        }
    }
}

/// Cost shape of the selected tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierCosts {
    /// Subscription price per month.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_cost: Option<f64>,
    /// Subscription price per year, or yearly maintenance for self-hosted tiers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_cost: Option<f64>,
    /// Buyout price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_time_cost: Option<f64>,
    /// Setup investment range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setup_range: Option<CostRange>,
    /// Recurring cost per month used for net gains.
    pub normalized_monthly_cost: f64,
}

impl TierCosts {
    /// Resolves the cost shape of a tier.
    ///
    /// Subscriptions bill the monthly price when present, otherwise a twelfth of the
    /// annual price. Self-hosted tiers carry a twelfth of their maintenance; the buyout
    /// price never enters the monthly figure.
    #[must_use]
    pub fn resolve(tier: &TierDefinition) -> Self {
        match &tier.pricing {
            TierPricing::Subscription(pricing) => Self {
                monthly_cost: pricing.monthly_cost,
                annual_cost: pricing.annual_cost,
                one_time_cost: None,
                setup_range: tier.setup_range,
                normalized_monthly_cost: pricing
                    .monthly_cost
                    .or_else(|| pricing.annual_cost.map(|annual| annual / 12.0))
                    .unwrap_or(0.0),
            },
            TierPricing::SelfHosted(pricing) => Self {
                monthly_cost: None,
                annual_cost: pricing.maintenance_cost,
                one_time_cost: Some(pricing.one_time_cost),
                setup_range: tier.setup_range,
                normalized_monthly_cost: pricing.maintenance_cost.unwrap_or(0.0) / 12.0,
            },
        }
    }

    /// Buyout price plus the top of the setup range.
    #[must_use]
    pub fn upfront_investment(&self) -> f64 {
        self.one_time_cost.unwrap_or(0.0) + self.setup_range.map_or(0.0, |range| range.high)
    }
}

/// Everything the estimator shows for one tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiTierResult {
    /// Key of the tier actually used.
    pub tier_key: String,
    /// Tier actually used.
    pub tier: TierDefinition,
    /// Resolved costs.
    pub costs: TierCosts,
    /// Industry multiplier applied.
    pub industry_factor: f64,
    /// Conservative monthly gain after costs.
    pub gain_low: f64,
    /// Optimistic monthly gain after costs.
    pub gain_high: f64,
    /// Conservative monthly gain before costs.
    pub gross_gain_low: f64,
    /// Optimistic monthly gain before costs.
    pub gross_gain_high: f64,
    /// Hours saved per month.
    pub time_saved_monthly: f64,
    /// Hours saved per year.
    pub time_saved_annual: f64,
    /// Share of manual effort removed, 0-100.
    pub automation_reduction_percent: f64,
    /// Expected monthly gain after costs, the midpoint of the low/high bounds.
    pub monthly_net_benefit: f64,
    /// First-year profit.
    pub year1_profit: f64,
    /// Five-year profit.
    pub year5_profit: f64,
    /// Ten-year profit.
    pub year10_profit: f64,
    /// Months to recover the upfront investment.
    pub payback_months: Payback,
    /// Raw buyout price, self-hosted tiers only.
    pub buyout_setup: Option<f64>,
    /// Raw yearly maintenance, self-hosted tiers only.
    pub buyout_maintenance: Option<f64>,
    /// Whether setup investment is shown by default.
    pub show_setup_default: bool,
}

/// Multiplier for an industry: its own factor, else `"Other"`, else 1.0.
#[must_use]
pub fn industry_factor(factors: &IndexMap<String, f64>, industry: &str) -> f64 {
    factors
        .get(industry)
        .or_else(|| factors.get(FALLBACK_INDUSTRY))
        .copied()
        .unwrap_or(1.0)
}

/// Computes the result for the requested tier, falling back to the default tier.
#[must_use]
pub fn compute_tier_result(request: TierResultRequest<'_>) -> RoiTierResult {
    let tier = request.estimator.resolve_tier(request.tier_key);
    compute_for_tier(request.estimator, request.inputs, tier)
}

/// Computes one result per resolved tier, in schema order.
#[must_use]
pub fn compare_tiers(estimator: &Estimator, inputs: &RoiInputs) -> Vec<RoiTierResult> {
    tiers::resolve_tier_configs(estimator.schema())
        .into_iter()
        .map(|config| compute_for_tier(estimator, inputs, config.tier))
        .collect()
}

fn compute_for_tier(
    estimator: &Estimator,
    inputs: &RoiInputs,
    tier: &TierDefinition,
) -> RoiTierResult {
    let assumptions = estimator.assumptions();
    let factor = industry_factor(&estimator.schema().industry_factors, &inputs.industry);
    let deals = f64::from(inputs.monthly_deals_closed);

    let opportunity = inputs.average_deal_amount * deals * factor;
    let reduction = (assumptions.automation_reduction * factor)
        .min(assumptions.max_automation_reduction);
    let operating_savings = inputs.monthly_operating_cost * reduction;
    let gross_gain_low = opportunity.mul_add(assumptions.lift_low, operating_savings);
    let gross_gain_high = opportunity.mul_add(assumptions.lift_high, operating_savings);

    let costs = TierCosts::resolve(tier);
    let gain_low = gross_gain_low - costs.normalized_monthly_cost;
    let gain_high = gross_gain_high - costs.normalized_monthly_cost;
    let monthly_net_benefit = (gain_low + gain_high) / 2.0;

    let time_saved_monthly = inputs.average_time_per_deal_hours * deals * reduction;

    let one_time = costs.one_time_cost.unwrap_or(0.0);
    let upfront = costs.upfront_investment();
    let payback_months = if upfront <= 0.0 {
        Payback::NotApplicable
    } else if monthly_net_benefit <= 0.0 {
        Payback::NotAchievable
    } else {
        Payback::Months(upfront / monthly_net_benefit)
    };

    let (buyout_setup, buyout_maintenance) = match &tier.pricing {
        TierPricing::SelfHosted(pricing) => (
            Some(pricing.one_time_cost),
            Some(pricing.maintenance_cost.unwrap_or(0.0)),
        ),
        TierPricing::Subscription(_) => (None, None),
    };

    RoiTierResult {
        tier_key: tier.key.clone(),
        tier: tier.clone(),
        costs,
        industry_factor: factor,
        gain_low,
        gain_high,
        gross_gain_low,
        gross_gain_high,
        time_saved_monthly,
        time_saved_annual: time_saved_monthly * 12.0,
        automation_reduction_percent: reduction * 100.0,
        monthly_net_benefit,
        year1_profit: YEAR_1_MONTHS.mul_add(monthly_net_benefit, -one_time),
        year5_profit: YEAR_5_MONTHS.mul_add(monthly_net_benefit, -one_time),
        year10_profit: YEAR_10_MONTHS.mul_add(monthly_net_benefit, -one_time),
        payback_months,
        buyout_setup,
        buyout_maintenance,
        show_setup_default: tier.setup_range.is_some_and(|range| range.high > 0.0),
    }
}
