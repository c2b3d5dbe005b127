use serde::{Deserialize, Serialize};

use crate::schema::{EstimatorSchema, FALLBACK_INDUSTRY};

/// Deal amount used when nothing usable was supplied.
pub const DEFAULT_DEAL_AMOUNT: f64 = 5_000.0;
/// Deals per month used when nothing usable was supplied.
pub const DEFAULT_MONTHLY_DEALS: u32 = 10;
/// Hours per deal used when nothing usable was supplied.
pub const DEFAULT_HOURS_PER_DEAL: f64 = 5.0;
/// Operating cost used when nothing usable was supplied.
pub const DEFAULT_OPERATING_COST: f64 = 0.0;
/// Smallest accepted deal amount.
pub const MIN_DEAL_AMOUNT: f64 = 1.0;
/// Smallest accepted hours per deal.
pub const MIN_HOURS_PER_DEAL: f64 = 1.0;
/// Largest accepted deal amount.
pub const MAX_DEAL_AMOUNT: f64 = 1.0e12;
/// Largest accepted deals per month.
pub const MAX_MONTHLY_DEALS: u32 = 1_000_000;
/// Largest accepted hours per deal.
pub const MAX_HOURS_PER_DEAL: f64 = 1.0e6;
/// Largest accepted monthly operating cost.
pub const MAX_OPERATING_COST: f64 = 1.0e12;

/// Fully populated business inputs, ready for calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiInputs {
    /// Average revenue per closed deal.
    pub average_deal_amount: f64,
    /// Deals closed per month, at least one.
    pub monthly_deals_closed: u32,
    /// Hours of manual work per deal, at least one.
    pub average_time_per_deal_hours: f64,
    /// Monthly operating cost, never negative.
    pub monthly_operating_cost: f64,
    /// Industry name; may be unknown to the schema.
    pub industry: String,
}

/// Raw form value: either a number or whatever text the field holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    /// Numeric value.
    Number(f64),
    /// Text value, e.g. `"12,500"` or `""` for a cleared field.
    Text(String),
}

impl InputValue {
    /// Numeric reading of the value, if it is a finite number.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            Self::Number(value) => *value,
            Self::Text(text) => {
                let cleaned: String = text
                    .chars()
                    .filter(|c| !matches!(c, '$' | ',' | '_') && !c.is_whitespace())
                    .collect();
                if cleaned.is_empty() {
                    return None;
                }
                cleaned.parse().ok()?
            }
        };
        value.is_finite().then_some(value)
    }

    /// Text reading of the value, if it is non-blank text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) if !text.trim().is_empty() => Some(text),
            _ => None,
        }
    }
}

impl From<f64> for InputValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u32> for InputValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for InputValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for InputValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Possibly partial, possibly stringy form state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialRoiInputs {
    /// Average deal amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_deal_amount: Option<InputValue>,
    /// Deals per month.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_deals_closed: Option<InputValue>,
    /// Hours per deal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_time_per_deal_hours: Option<InputValue>,
    /// Monthly operating cost.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_operating_cost: Option<InputValue>,
    /// Industry name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<InputValue>,
}

impl PartialRoiInputs {
    /// Replaces a single field.
    pub fn set(&mut self, field: InputField, value: InputValue) {
        *self.slot(field) = Some(value);
    }

    /// Current raw value of a field.
    #[must_use]
    pub const fn get(&self, field: InputField) -> Option<&InputValue> {
        match field {
            InputField::AverageDealAmount => self.average_deal_amount.as_ref(),
            InputField::MonthlyDealsClosed => self.monthly_deals_closed.as_ref(),
            InputField::AverageTimePerDealHours => self.average_time_per_deal_hours.as_ref(),
            InputField::MonthlyOperatingCost => self.monthly_operating_cost.as_ref(),
            InputField::Industry => self.industry.as_ref(),
        }
    }

    fn slot(&mut self, field: InputField) -> &mut Option<InputValue> {
        match field {
            InputField::AverageDealAmount => &mut self.average_deal_amount,
            InputField::MonthlyDealsClosed => &mut self.monthly_deals_closed,
            InputField::AverageTimePerDealHours => &mut self.average_time_per_deal_hours,
            InputField::MonthlyOperatingCost => &mut self.monthly_operating_cost,
            InputField::Industry => &mut self.industry,
        }
    }
}

impl From<&RoiInputs> for PartialRoiInputs {
    fn from(inputs: &RoiInputs) -> Self {
        Self {
            average_deal_amount: Some(inputs.average_deal_amount.into()),
            monthly_deals_closed: Some(inputs.monthly_deals_closed.into()),
            average_time_per_deal_hours: Some(inputs.average_time_per_deal_hours.into()),
            monthly_operating_cost: Some(inputs.monthly_operating_cost.into()),
            industry: Some(inputs.industry.as_str().into()),
        }
    }
}

/// Editable form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputField {
    /// Average deal amount.
    AverageDealAmount,
    /// Deals per month.
    MonthlyDealsClosed,
    /// Hours per deal.
    AverageTimePerDealHours,
    /// Monthly operating cost.
    MonthlyOperatingCost,
    /// Industry.
    Industry,
}

impl InputField {
    /// Every field, in form order.
    pub const ALL: [Self; 5] = [
        Self::AverageDealAmount,
        Self::MonthlyDealsClosed,
        Self::AverageTimePerDealHours,
        Self::MonthlyOperatingCost,
        Self::Industry,
    ];

    /// Label for logging.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AverageDealAmount => "averageDealAmount",
            Self::MonthlyDealsClosed => "monthlyDealsClosed",
            Self::AverageTimePerDealHours => "averageTimePerDealHours",
            Self::MonthlyOperatingCost => "monthlyOperatingCost",
            Self::Industry => "industry",
        }
    }
}

/// Normalises raw form state into complete, bounded inputs.
///
/// Missing, blank or non-numeric values fall back to the schema's `defaultInputs`,
/// then to the crate constants. Unknown industries are kept as typed; the calculator
/// resolves their factor.
#[must_use]
pub fn coerce_inputs(schema: &EstimatorSchema, partial: Option<&PartialRoiInputs>) -> RoiInputs {
    let defaults = default_inputs(schema);
    match partial {
        Some(partial) => merge(partial, &defaults),
        None => defaults,
    }
}

/// Inputs shown before the visitor edits anything.
#[must_use]
pub fn default_inputs(schema: &EstimatorSchema) -> RoiInputs {
    let fallback = RoiInputs {
        average_deal_amount: DEFAULT_DEAL_AMOUNT,
        monthly_deals_closed: DEFAULT_MONTHLY_DEALS,
        average_time_per_deal_hours: DEFAULT_HOURS_PER_DEAL,
        monthly_operating_cost: DEFAULT_OPERATING_COST,
        industry: schema
            .industry_factors
            .keys()
            .next()
            .map_or_else(|| FALLBACK_INDUSTRY.to_string(), Clone::clone),
    };
    match &schema.default_inputs {
        Some(configured) => merge(configured, &fallback),
        None => fallback,
    }
}

fn merge(partial: &PartialRoiInputs, defaults: &RoiInputs) -> RoiInputs {
    let number = |value: &Option<InputValue>| value.as_ref().and_then(InputValue::as_number);
    RoiInputs {
        average_deal_amount: number(&partial.average_deal_amount)
            .map_or(defaults.average_deal_amount, |value| {
                value.clamp(MIN_DEAL_AMOUNT, MAX_DEAL_AMOUNT)
            }),
        monthly_deals_closed: number(&partial.monthly_deals_closed)
            .map_or(defaults.monthly_deals_closed, whole_deals),
        average_time_per_deal_hours: number(&partial.average_time_per_deal_hours)
            .map_or(defaults.average_time_per_deal_hours, |value| {
                value.clamp(MIN_HOURS_PER_DEAL, MAX_HOURS_PER_DEAL)
            }),
        monthly_operating_cost: number(&partial.monthly_operating_cost)
            .map_or(defaults.monthly_operating_cost, |value| {
                value.clamp(0.0, MAX_OPERATING_COST)
            }),
        industry: partial
            .industry
            .as_ref()
            .and_then(InputValue::as_text)
            .map_or_else(|| defaults.industry.clone(), str::to_string),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_deals(value: f64) -> u32 {
    value.round().clamp(1.0, f64::from(MAX_MONTHLY_DEALS)) as u32
}
