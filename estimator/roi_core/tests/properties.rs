use proptest::prelude::*;
use roi_core::{
    coerce_inputs, compute_tier_result, default_tier_key, resolve_tier_configs, Estimator,
    EstimatorSchema, InputValue, PartialRoiInputs, RoiInputs, TierResultRequest,
};
use serde_json::json;

const SCHEMA: &str = r#"{
    "industryFactors": { "Real Estate": 1.2, "Healthcare": 1.5, "Other": 1 },
    "groups": [
        {
            "key": "subscription",
            "label": "Subscription",
            "tiers": [
                { "key": "starter", "label": "Starter", "kind": "subscription", "monthlyCost": 500 },
                { "key": "scale", "label": "Scale", "kind": "subscription", "annualCost": 24000, "isGroupDefault": true }
            ]
        },
        {
            "key": "buyout",
            "label": "Self-hosted",
            "tiers": [
                {
                    "key": "buyout",
                    "label": "Full buyout",
                    "kind": "selfHosted",
                    "oneTimeCost": 20000,
                    "maintenanceCost": 3600,
                    "setupRange": { "low": 5000, "high": 15000 }
                },
                {
                    "key": "license",
                    "label": "License only",
                    "kind": "selfHosted",
                    "oneTimeCost": 9000
                }
            ]
        }
    ]
}"#;

const TIER_KEYS: [&str; 4] = ["starter", "scale", "buyout", "license"];
const INDUSTRIES: [&str; 4] = ["Real Estate", "Healthcare", "Other", "does-not-exist"];

fn estimator() -> Estimator {
    Estimator::from_json_str(SCHEMA).unwrap()
}

fn inputs_strategy() -> impl Strategy<Value = RoiInputs> {
    (
        1.0..1_000_000.0f64,
        1u32..500,
        1.0..200.0f64,
        0.0..100_000.0f64,
        prop::sample::select(INDUSTRIES.to_vec()),
    )
        .prop_map(|(amount, deals, hours, cost, industry)| RoiInputs {
            average_deal_amount: amount,
            monthly_deals_closed: deals,
            average_time_per_deal_hours: hours,
            monthly_operating_cost: cost,
            industry: industry.to_string(),
        })
}

fn raw_value() -> impl Strategy<Value = Option<InputValue>> {
    prop_oneof![
        Just(None),
        any::<f64>().prop_map(|value| Some(InputValue::Number(value))),
        ".{0,12}".prop_map(|text| Some(InputValue::Text(text))),
        (-1_000_000i64..1_000_000).prop_map(|value| Some(InputValue::Text(value.to_string()))),
    ]
}

fn partial_strategy() -> impl Strategy<Value = PartialRoiInputs> {
    (raw_value(), raw_value(), raw_value(), raw_value(), raw_value()).prop_map(
        |(amount, deals, hours, cost, industry)| PartialRoiInputs {
            average_deal_amount: amount,
            monthly_deals_closed: deals,
            average_time_per_deal_hours: hours,
            monthly_operating_cost: cost,
            industry,
        },
    )
}

/// Groups of `(key index, isGroupDefault)` tiers; keys repeat across and within groups.
fn group_shapes() -> impl Strategy<Value = Vec<Vec<(usize, bool)>>> {
    prop::collection::vec(
        prop::collection::vec((0usize..4, any::<bool>()), 0..4),
        1..5,
    )
}

fn schema_from_shapes(groups: &[Vec<(usize, bool)>]) -> EstimatorSchema {
    let groups: Vec<_> = groups
        .iter()
        .enumerate()
        .map(|(group, tiers)| {
            let tiers: Vec<_> = tiers
                .iter()
                .map(|(key, is_default)| {
                    json!({
                        "key": TIER_KEYS[*key],
                        "label": TIER_KEYS[*key],
                        "kind": "subscription",
                        "monthlyCost": 100,
                        "isGroupDefault": is_default,
                    })
                })
                .collect();
            json!({ "key": format!("group-{group}"), "label": "Group", "tiers": tiers })
        })
        .collect();
    let document = json!({ "industryFactors": { "Other": 1 }, "groups": groups });
    EstimatorSchema::from_json_str(&document.to_string()).unwrap()
}

fn compute(estimator: &Estimator, inputs: &RoiInputs, tier_key: &str) -> roi_core::RoiTierResult {
    compute_tier_result(TierResultRequest {
        estimator,
        inputs,
        tier_key: Some(tier_key),
    })
}

proptest! {
    #[test]
    fn prop_results_are_deterministic(
        inputs in inputs_strategy(),
        tier in prop::sample::select(TIER_KEYS.to_vec()),
    ) {
        let estimator = estimator();
        let first = compute(&estimator, &inputs, tier);
        let second = compute(&estimator, &inputs, tier);
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn prop_coercion_is_complete(partial in partial_strategy()) {
        let estimator = estimator();
        let inputs = coerce_inputs(estimator.schema(), Some(&partial));
        prop_assert!(inputs.average_deal_amount.is_finite());
        prop_assert!(inputs.average_deal_amount > 0.0);
        prop_assert!(inputs.monthly_deals_closed >= 1);
        prop_assert!(inputs.average_time_per_deal_hours.is_finite());
        prop_assert!(inputs.average_time_per_deal_hours >= 1.0);
        prop_assert!(inputs.monthly_operating_cost.is_finite());
        prop_assert!(inputs.monthly_operating_cost >= 0.0);
        prop_assert!(!inputs.industry.trim().is_empty());
    }

    #[test]
    fn prop_unknown_tier_matches_default(
        inputs in inputs_strategy(),
        key in "[a-z]{1,12}",
    ) {
        prop_assume!(!TIER_KEYS.contains(&key.as_str()));
        let estimator = estimator();
        let fallback = compute(&estimator, &inputs, &key);
        let default = compute(&estimator, &inputs, estimator.default_tier_key());
        prop_assert_eq!(fallback, default);
    }

    #[test]
    fn prop_unknown_industry_uses_other(inputs in inputs_strategy()) {
        let estimator = estimator();
        let unknown = RoiInputs { industry: "does-not-exist".into(), ..inputs.clone() };
        let other = RoiInputs { industry: "Other".into(), ..inputs };
        let unknown = compute(&estimator, &unknown, "buyout");
        let other = compute(&estimator, &other, "buyout");
        prop_assert_eq!(unknown.industry_factor, 1.0);
        prop_assert_eq!(unknown.gain_low, other.gain_low);
        prop_assert_eq!(unknown.time_saved_monthly, other.time_saved_monthly);
    }

    #[test]
    fn prop_more_deals_never_hurt(
        inputs in inputs_strategy(),
        extra in 1u32..100,
        tier in prop::sample::select(TIER_KEYS.to_vec()),
    ) {
        let estimator = estimator();
        let more = RoiInputs {
            monthly_deals_closed: inputs.monthly_deals_closed + extra,
            ..inputs.clone()
        };
        let base = compute(&estimator, &inputs, tier);
        let bigger = compute(&estimator, &more, tier);
        prop_assert!(bigger.gain_low >= base.gain_low);
        prop_assert!(bigger.gain_high >= base.gain_high);
        prop_assert!(bigger.time_saved_monthly >= base.time_saved_monthly);
        prop_assert!(bigger.year1_profit >= base.year1_profit);
    }

    #[test]
    fn prop_setup_flag_tracks_setup_range(
        inputs in inputs_strategy(),
        tier in prop::sample::select(TIER_KEYS.to_vec()),
    ) {
        let estimator = estimator();
        let result = compute(&estimator, &inputs, tier);
        let expected = result.tier.setup_range.is_some_and(|range| range.high > 0.0);
        prop_assert_eq!(result.show_setup_default, expected);
    }
}

proptest! {
    #[test]
    fn prop_default_key_is_always_resolvable(groups in group_shapes()) {
        let schema = schema_from_shapes(&groups);
        let configs = resolve_tier_configs(&schema);
        match default_tier_key(&schema) {
            Some(key) => {
                prop_assert!(configs.iter().any(|config| config.key == key));
                let first_group = groups.iter().find(|tiers| !tiers.is_empty()).unwrap();
                let expected = first_group
                    .iter()
                    .find(|(_, is_default)| *is_default)
                    .unwrap_or(&first_group[0]);
                prop_assert_eq!(key, TIER_KEYS[expected.0]);
                let estimator = Estimator::new(schema.clone()).unwrap();
                prop_assert_eq!(estimator.default_tier_key(), key);
                prop_assert_eq!(estimator.resolve_tier(None).key.as_str(), key);
            }
            None => {
                prop_assert!(configs.is_empty());
            }
        }
    }
}

#[test]
fn default_key_of_fixed_schema() {
    let estimator = estimator();
    let key = default_tier_key(estimator.schema()).unwrap();
    assert_eq!(key, "scale");
    assert!(resolve_tier_configs(estimator.schema())
        .iter()
        .any(|config| config.key == key));
}

#[test]
fn self_hosted_example_scenario() {
    let estimator = estimator();
    let partial = PartialRoiInputs {
        average_deal_amount: Some(InputValue::Number(10_000.0)),
        monthly_deals_closed: Some(InputValue::Number(5.0)),
        average_time_per_deal_hours: Some(InputValue::Number(10.0)),
        monthly_operating_cost: Some(InputValue::Number(2_000.0)),
        industry: Some("Real Estate".into()),
    };
    let inputs = coerce_inputs(estimator.schema(), Some(&partial));
    let result = compute(&estimator, &inputs, "buyout");
    assert!(result.show_setup_default);
    assert!(result.payback_months.months().is_some_and(f64::is_finite));
    let expected = 12.0 * result.monthly_net_benefit - 20_000.0;
    assert!((result.year1_profit - expected).abs() < 1e-6);
}
