use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use roi_core::{
    config, format, resolve_tier_configs, EstimatorSession, EstimatorTelemetry, InputField,
    InputValue, PartialRoiInputs, RoiSnapshot,
};
use roi_logging::LogLevel;
use serde_json::json;

#[derive(Parser, Debug)]
#[command(name = "roi", version, about = "ROI estimator snapshots and tier comparisons")]
struct Cli {
    /// Appends JSON-line telemetry to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lists the tiers of a schema.
    Tiers {
        #[arg(long)]
        schema: PathBuf,
    },
    /// Prints a snapshot for one tier.
    Snapshot {
        #[arg(long)]
        schema: PathBuf,
        /// Tier key; unknown keys fall back to the default tier.
        #[arg(long)]
        tier: Option<String>,
        #[command(flatten)]
        inputs: InputArgs,
        #[arg(long)]
        json: bool,
    },
    /// Prints one row per tier.
    Compare {
        #[arg(long)]
        schema: PathBuf,
        #[command(flatten)]
        inputs: InputArgs,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Default)]
struct InputArgs {
    /// Saved form state (TOML or JSON) applied before the flags below.
    #[arg(long)]
    inputs: Option<PathBuf>,
    #[arg(long)]
    deal_amount: Option<String>,
    #[arg(long)]
    deals: Option<String>,
    #[arg(long)]
    hours: Option<String>,
    #[arg(long)]
    operating_cost: Option<String>,
    #[arg(long)]
    industry: Option<String>,
}

impl InputArgs {
    fn into_partial(self) -> Result<PartialRoiInputs> {
        let mut partial = match &self.inputs {
            Some(path) => config::load_inputs(path)?,
            None => PartialRoiInputs::default(),
        };
        let overrides = [
            (InputField::AverageDealAmount, self.deal_amount),
            (InputField::MonthlyDealsClosed, self.deals),
            (InputField::AverageTimePerDealHours, self.hours),
            (InputField::MonthlyOperatingCost, self.operating_cost),
            (InputField::Industry, self.industry),
        ];
        for (field, value) in overrides {
            if let Some(value) = value {
                partial.set(field, InputValue::Text(value));
            }
        }
        Ok(partial)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let telemetry = build_telemetry(cli.log_file.as_deref())?;
    match cli.command {
        Commands::Tiers { schema } => handle_tiers(&schema),
        Commands::Snapshot {
            schema,
            tier,
            inputs,
            json,
        } => handle_snapshot(&schema, tier.as_deref(), inputs, json, telemetry),
        Commands::Compare {
            schema,
            inputs,
            json,
        } => handle_compare(&schema, inputs, json, telemetry),
    }
}

fn build_telemetry(log_file: Option<&Path>) -> Result<EstimatorTelemetry> {
    let builder = EstimatorTelemetry::builder("roi-cli");
    match log_file {
        Some(path) => builder.log_path(path).build(),
        None => builder.build(),
    }
}

fn handle_tiers(schema: &Path) -> Result<()> {
    let estimator = config::load_estimator(schema)?;
    let default_key = estimator.default_tier_key();
    for config in resolve_tier_configs(estimator.schema()) {
        let marker = if config.key == default_key { "*" } else { " " };
        println!(
            "{marker} {} | {} | {} | {}",
            config.key,
            config.tier.label,
            config.group_label,
            config.tier.kind().label()
        );
    }
    Ok(())
}

fn open_session(
    schema: &Path,
    inputs: InputArgs,
    telemetry: EstimatorTelemetry,
) -> Result<EstimatorSession> {
    let estimator = Arc::new(config::load_estimator(schema)?);
    let partial = inputs.into_partial()?;
    Ok(EstimatorSession::with_inputs(estimator, partial).with_telemetry(telemetry))
}

fn handle_snapshot(
    schema: &Path,
    tier: Option<&str>,
    inputs: InputArgs,
    json: bool,
    telemetry: EstimatorTelemetry,
) -> Result<()> {
    let mut session = open_session(schema, inputs, telemetry.clone())?;
    if let Some(tier) = tier {
        session.select_tier(tier);
    }
    let snapshot: RoiSnapshot = session.snapshot();
    telemetry.log(
        LogLevel::Info,
        "roi.snapshot.rendered",
        &json!({ "session": session.id(), "tier": snapshot.tier_key }),
    )?;
    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{snapshot}");
    }
    Ok(())
}

fn handle_compare(
    schema: &Path,
    inputs: InputArgs,
    json: bool,
    telemetry: EstimatorTelemetry,
) -> Result<()> {
    let session = open_session(schema, inputs, telemetry.clone())?;
    let results = session.compare();
    telemetry.log(
        LogLevel::Info,
        "roi.compare.rendered",
        &json!({ "session": session.id(), "tiers": results.len() }),
    )?;
    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }
    for result in results {
        println!(
            "{} | {} | net {}/mo | year 1 {} | 5y {} | payback {}",
            result.tier_key,
            result.tier.label,
            format::currency(result.monthly_net_benefit),
            format::currency(result.year1_profit),
            format::compact_currency(result.year5_profit),
            format::payback(result.payback_months)
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn cli_parses_snapshot_flags() {
        let cli = Cli::parse_from([
            "roi",
            "snapshot",
            "--schema",
            "estimator.toml",
            "--tier",
            "buyout",
            "--deal-amount",
            "$10,000",
            "--deals",
            "5",
            "--json",
        ]);
        match cli.command {
            Commands::Snapshot {
                tier, inputs, json, ..
            } => {
                assert_eq!(tier.as_deref(), Some("buyout"));
                assert_eq!(inputs.deal_amount.as_deref(), Some("$10,000"));
                assert!(json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn bundled_fixture_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/estimator.toml");
        let estimator = config::load_estimator(&path).unwrap();
        assert_eq!(estimator.default_tier_key(), "growth");
        assert_eq!(estimator.schema().tier_count(), 4);
        let snapshot = RoiSnapshot::build(&estimator, None, Some("buyout"));
        assert_eq!(snapshot.inputs.industry, "Real Estate");
        assert!(snapshot.result.payback_months.months().is_some());
    }

    #[test]
    fn flags_override_saved_inputs() {
        let dir = tempdir().unwrap();
        let saved = dir.path().join("inputs.json");
        fs::write(&saved, r#"{ "averageDealAmount": 9000, "monthlyDealsClosed": 2 }"#).unwrap();
        let args = InputArgs {
            inputs: Some(saved),
            deals: Some("7".into()),
            ..InputArgs::default()
        };
        let partial = args.into_partial().unwrap();
        assert_eq!(partial.average_deal_amount, Some(InputValue::Number(9000.0)));
        assert_eq!(partial.monthly_deals_closed, Some(InputValue::Text("7".into())));
    }

    #[test]
    fn snapshot_command_writes_telemetry() {
        let dir = tempdir().unwrap();
        let schema = dir.path().join("estimator.toml");
        fs::write(
            &schema,
            r#"
                [industryFactors]
                Other = 1.0

                [[groups]]
                key = "plans"
                label = "Plans"

                [[groups.tiers]]
                key = "pro"
                label = "Pro"
                kind = "subscription"
                monthlyCost = 250.0
            "#,
        )
        .unwrap();
        let log = dir.path().join("roi.log");
        let telemetry = build_telemetry(Some(log.as_path())).unwrap();
        handle_snapshot(&schema, Some("missing"), InputArgs::default(), true, telemetry).unwrap();
        let content = fs::read_to_string(&log).unwrap();
        assert!(content.contains("estimator.tier.unknown"));
        assert!(content.contains("roi.snapshot.rendered"));
    }
}
