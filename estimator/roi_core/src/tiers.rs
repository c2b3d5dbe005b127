use serde::Serialize;

use crate::schema::{EstimatorSchema, TierDefinition};

/// A tier flattened out of its group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierConfig<'a> {
    /// Tier key.
    pub key: &'a str,
    /// Tier definition.
    pub tier: &'a TierDefinition,
    /// Owning group key.
    pub group: &'a str,
    /// Owning group label.
    pub group_label: &'a str,
    /// Whether this tier is the default of its group.
    pub is_group_default: bool,
}

/// Flattens every group into one list, preserving schema order.
///
/// Each group has exactly one default: the first tier flagged `isGroupDefault`,
/// otherwise its first tier. Duplicate keys are kept as-is.
#[must_use]
pub fn resolve_tier_configs(schema: &EstimatorSchema) -> Vec<TierConfig<'_>> {
    let mut configs = Vec::with_capacity(schema.tier_count());
    for group in &schema.groups {
        let default_index = group
            .tiers
            .iter()
            .position(|tier| tier.is_group_default)
            .unwrap_or(0);
        configs.extend(group.tiers.iter().enumerate().map(|(index, tier)| TierConfig {
            key: &tier.key,
            tier,
            group: &group.key,
            group_label: &group.label,
            is_group_default: index == default_index,
        }));
    }
    configs
}

/// Default tier of the first group that has any tiers.
#[must_use]
pub fn default_tier_key(schema: &EstimatorSchema) -> Option<&str> {
    resolve_tier_configs(schema)
        .into_iter()
        .find(|config| config.is_group_default)
        .map(|config| config.key)
}

/// Looks a tier up by key. With duplicate keys the last entry wins.
#[must_use]
pub fn find_tier<'a>(schema: &'a EstimatorSchema, key: &str) -> Option<TierConfig<'a>> {
    resolve_tier_configs(schema)
        .into_iter()
        .rev()
        .find(|config| config.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{SelfHostedPricing, SubscriptionPricing, TierGroup, TierPricing};

    fn subscription(key: &str, is_group_default: bool) -> TierDefinition {
        TierDefinition {
            key: key.into(),
            label: key.to_uppercase(),
            is_group_default,
            setup_range: None,
            pricing: TierPricing::Subscription(SubscriptionPricing {
                monthly_cost: Some(100.0),
                annual_cost: None,
            }),
        }
    }

    fn buyout(key: &str) -> TierDefinition {
        TierDefinition {
            key: key.into(),
            label: key.to_uppercase(),
            is_group_default: false,
            setup_range: None,
            pricing: TierPricing::SelfHosted(SelfHostedPricing {
                one_time_cost: 10_000.0,
                maintenance_cost: None,
            }),
        }
    }

    fn schema(groups: Vec<TierGroup>) -> EstimatorSchema {
        EstimatorSchema {
            industry_factors: indexmap::IndexMap::new(),
            groups,
            summary_output: crate::schema::SummaryOutput::default(),
            default_inputs: None,
            assumptions: crate::schema::EstimatorAssumptions::default(),
        }
    }

    fn group(key: &str, tiers: Vec<TierDefinition>) -> TierGroup {
        TierGroup {
            key: key.into(),
            label: format!("{key} plans"),
            tiers,
        }
    }

    #[test]
    fn flattens_in_schema_order() {
        let schema = schema(vec![
            group("monthly", vec![subscription("basic", false), subscription("pro", false)]),
            group("buyout", vec![buyout("license")]),
        ]);
        let configs = resolve_tier_configs(&schema);
        let keys: Vec<_> = configs.iter().map(|config| config.key).collect();
        assert_eq!(keys, vec!["basic", "pro", "license"]);
        assert_eq!(configs[2].group, "buyout");
        assert_eq!(configs[2].group_label, "buyout plans");
    }

    #[test]
    fn marked_tier_wins_group_default() {
        let schema = schema(vec![group(
            "monthly",
            vec![subscription("basic", false), subscription("pro", true)],
        )]);
        let defaults: Vec<_> = resolve_tier_configs(&schema)
            .into_iter()
            .map(|config| config.is_group_default)
            .collect();
        assert_eq!(defaults, vec![false, true]);
        assert_eq!(default_tier_key(&schema), Some("pro"));
    }

    #[test]
    fn first_tier_is_default_when_unmarked() {
        let schema = schema(vec![
            group("monthly", vec![subscription("basic", false), subscription("pro", false)]),
            group("buyout", vec![buyout("license")]),
        ]);
        let configs = resolve_tier_configs(&schema);
        assert!(configs[0].is_group_default);
        assert!(configs[2].is_group_default);
        assert_eq!(default_tier_key(&schema), Some("basic"));
    }

    #[test]
    fn empty_leading_group_is_skipped() {
        assert_eq!(default_tier_key(&schema(vec![])), None);
        let schema = schema(vec![group("empty", vec![]), group("buyout", vec![buyout("license")])]);
        assert_eq!(default_tier_key(&schema), Some("license"));
    }

    #[test]
    fn duplicate_keys_resolve_to_last_entry() {
        let schema = schema(vec![
            group("monthly", vec![subscription("shared", false)]),
            group("buyout", vec![buyout("shared")]),
        ]);
        assert_eq!(resolve_tier_configs(&schema).len(), 2);
        let found = find_tier(&schema, "shared").unwrap();
        assert_eq!(found.group, "buyout");
        assert!(find_tier(&schema, "missing").is_none());
    }
}
