use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    calculator::{compute_tier_result, RoiTierResult, TierResultRequest},
    format,
    inputs::{coerce_inputs, PartialRoiInputs, RoiInputs},
    schema::Estimator,
};

/// One labelled value ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricCard {
    /// Card title.
    pub label: String,
    /// Formatted value.
    pub value: String,
}

impl MetricCard {
    fn new(label: &str, value: String) -> Self {
        Self {
            label: label.to_string(),
            value,
        }
    }
}

/// Read-only projection for embedding without an interactive form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiSnapshot {
    /// Tier key in effect.
    pub tier_key: String,
    /// Tier label.
    pub tier_label: String,
    /// Inputs after coercion.
    pub inputs: RoiInputs,
    /// Raw computed result.
    pub result: RoiTierResult,
    /// Display cards in render order.
    pub metrics: Vec<MetricCard>,
    /// Static insights from the schema.
    pub summary_points: Vec<String>,
}

impl RoiSnapshot {
    /// Coerces possibly partial inputs and computes the requested (or default) tier.
    #[must_use]
    pub fn build(
        estimator: &Estimator,
        partial: Option<&PartialRoiInputs>,
        tier_key: Option<&str>,
    ) -> Self {
        let inputs = coerce_inputs(estimator.schema(), partial);
        let result = compute_tier_result(TierResultRequest {
            estimator,
            inputs: &inputs,
            tier_key,
        });
        let show_setup = result.show_setup_default;
        Self::from_result(estimator, inputs, result, show_setup)
    }

    /// Wraps an already computed result. The setup card is rendered only when
    /// `show_setup` is set.
    #[must_use]
    pub fn from_result(
        estimator: &Estimator,
        inputs: RoiInputs,
        result: RoiTierResult,
        show_setup: bool,
    ) -> Self {
        Self {
            tier_key: result.tier_key.clone(),
            tier_label: result.tier.label.clone(),
            metrics: metric_cards(&result, show_setup),
            summary_points: estimator.schema().summary_output.points.clone(),
            inputs,
            result,
        }
    }

    /// Looks a card up by label.
    #[must_use]
    pub fn metric(&self, label: &str) -> Option<&str> {
        self.metrics
            .iter()
            .find(|card| card.label == label)
            .map(|card| card.value.as_str())
    }
}

fn metric_cards(result: &RoiTierResult, show_setup: bool) -> Vec<MetricCard> {
    let mut cards = vec![
        MetricCard::new(
            "Monthly gain",
            format!(
                "{} - {}",
                format::currency(result.gain_low),
                format::currency(result.gain_high)
            ),
        ),
        MetricCard::new(
            "Monthly net benefit",
            format::currency(result.monthly_net_benefit),
        ),
        MetricCard::new("Time saved per month", format::hours(result.time_saved_monthly)),
        MetricCard::new("Time saved per year", format::hours(result.time_saved_annual)),
        MetricCard::new(
            "Automation",
            format::percent(result.automation_reduction_percent),
        ),
        MetricCard::new("Year 1 profit", format::currency(result.year1_profit)),
        MetricCard::new("5-year profit", format::compact_currency(result.year5_profit)),
        MetricCard::new("10-year profit", format::compact_currency(result.year10_profit)),
        MetricCard::new("Payback", format::payback(result.payback_months)),
    ];
    if show_setup {
        if let Some(range) = result.costs.setup_range {
            cards.push(MetricCard::new(
                "Setup investment",
                format!(
                    "{} - {}",
                    format::currency(range.low),
                    format::currency(range.high)
                ),
            ));
        }
    }
    if let Some(buyout) = result.buyout_setup {
        cards.push(MetricCard::new("Buyout", format::currency(buyout)));
    }
    if let Some(maintenance) = result.buyout_maintenance {
        cards.push(MetricCard::new(
            "Annual maintenance",
            format::currency(maintenance),
        ));
    }
    cards
}

impl fmt::Display for RoiSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.tier_label, self.tier_key)?;
        writeln!(
            f,
            "  inputs: {} x {} deals/month, {} h/deal, {} opex, {}",
            format::currency(self.inputs.average_deal_amount),
            self.inputs.monthly_deals_closed,
            self.inputs.average_time_per_deal_hours,
            format::currency(self.inputs.monthly_operating_cost),
            self.inputs.industry
        )?;
        let width = self
            .metrics
            .iter()
            .map(|card| card.label.len())
            .max()
            .unwrap_or(0);
        for card in &self.metrics {
            writeln!(f, "  {:<width$}  {}", card.label, card.value)?;
        }
        for point in &self.summary_points {
            writeln!(f, "  * {point}")?;
        }
        Ok(())
    }
}
