#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the pest map toolchain.
//!
//! Generates the synthetic observation dataset, prints threat rankings and
//! dashboard summaries as JSON, or starts the API server.

use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use pest_map_analytics::{
    cost_benefit, filter_observations, monthly_trend, recommend, summarize, town_breakdown,
};
use pest_map_analytics_models::{
    CostBenefit, KpiSummary, MonthlyTrendPoint, ScoringProfile, TownStats,
};
use pest_map_dataset_models::{Observation, ObservationFilter};
use pest_map_generate::{DEFAULT_SEED, GeneratorConfig, generate_seeded};
use pest_map_pest_models::{Crop, Disease, Town};
use pest_map_server::{ServerConfig, run_server};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "pest_map", about = "Pest and disease threat toolchain")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the generated dataset as JSON
    Generate {
        /// Random seed
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
    /// Rank diseases by threat index
    Rank {
        /// Random seed
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
        /// Scoring profile (`standard` or `extended`)
        #[arg(long, default_value_t = ScoringProfile::Standard)]
        profile: ScoringProfile,
        /// Number of top entries to print
        #[arg(long)]
        limit: Option<usize>,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Print headline figures, monthly trend, town breakdown and cost-benefit
    Summary {
        /// Random seed
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Start the API server
    Serve {
        /// Address to bind to (defaults to `BIND_ADDR`)
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on (defaults to `PORT`)
        #[arg(long)]
        port: Option<u16>,
        /// Random seed (defaults to `PEST_MAP_SEED`)
        #[arg(long)]
        seed: Option<u64>,
        /// Dataset cache lifetime in seconds (defaults to `PEST_MAP_CACHE_TTL_SECS`)
        #[arg(long)]
        cache_ttl: Option<u64>,
    },
}

/// Column filters. Each flag may be repeated; an omitted flag leaves that
/// column unrestricted.
#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Calendar month (1-12)
    #[arg(long = "month", value_parser = clap::value_parser!(u32).range(1..=12))]
    months: Vec<u32>,
    /// Town name, e.g. `LUYANG`
    #[arg(long = "town")]
    towns: Vec<Town>,
    /// Crop name, e.g. `PEACH`
    #[arg(long = "crop")]
    crops: Vec<Crop>,
    /// Pest or disease name, e.g. `BROWN_ROT`
    #[arg(long = "disease")]
    diseases: Vec<Disease>,
}

impl From<FilterArgs> for ObservationFilter {
    fn from(args: FilterArgs) -> Self {
        Self {
            months: args.months,
            towns: args.towns,
            crops: args.crops,
            diseases: args.diseases,
            bbox: None,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryReport {
    summary: Option<KpiSummary>,
    monthly_trend: Vec<MonthlyTrendPoint>,
    towns: Vec<TownStats>,
    cost_benefit: Vec<CostBenefit>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { seed, pretty } => {
            let dataset = load(seed)?;
            let json = if pretty {
                serde_json::to_string_pretty(&dataset)?
            } else {
                serde_json::to_string(&dataset)?
            };
            println!("{json}");
        }
        Commands::Rank {
            seed,
            profile,
            limit,
            filter,
        } => {
            let subset = select(seed, filter)?;
            let ranked = recommend(&subset, profile, limit);
            println!("{}", serde_json::to_string_pretty(&ranked)?);
        }
        Commands::Summary { seed, filter } => {
            let filter = ObservationFilter::from(filter);
            let subset = filter_observations(&load(seed)?, &filter);
            let report = SummaryReport {
                summary: summarize(&subset, &filter.towns),
                monthly_trend: monthly_trend(&subset),
                towns: town_breakdown(&subset),
                cost_benefit: cost_benefit(&subset),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Serve {
            bind,
            port,
            seed,
            cache_ttl,
        } => {
            let config = server_config(ServerConfig::from_env(), bind, port, seed, cache_ttl);
            actix_web::rt::System::new().block_on(run_server(config))?;
        }
    }

    Ok(())
}

fn load(seed: u64) -> Result<Vec<Observation>, Box<dyn std::error::Error>> {
    let dataset = generate_seeded(&GeneratorConfig::default().with_seed(seed))?;
    log::info!("Generated {} observations (seed {seed})", dataset.len());
    Ok(dataset)
}

fn select(seed: u64, filter: FilterArgs) -> Result<Vec<Observation>, Box<dyn std::error::Error>> {
    let filter = ObservationFilter::from(filter);
    Ok(filter_observations(&load(seed)?, &filter))
}

/// Applies command-line overrides on top of the environment configuration.
fn server_config(
    base: ServerConfig,
    bind: Option<String>,
    port: Option<u16>,
    seed: Option<u64>,
    cache_ttl: Option<u64>,
) -> ServerConfig {
    ServerConfig {
        bind_addr: bind.unwrap_or(base.bind_addr),
        port: port.unwrap_or(base.port),
        seed: seed.unwrap_or(base.seed),
        cache_ttl: cache_ttl.map_or(base.cache_ttl, Duration::from_secs),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_repeated_filter_flags() {
        let cli = Cli::try_parse_from([
            "pest_map",
            "rank",
            "--profile",
            "extended",
            "--limit",
            "3",
            "--town",
            "LUYANG",
            "--town",
            "WAWU",
            "--month",
            "7",
            "--disease",
            "BROWN_ROT",
        ])
        .unwrap();

        let Commands::Rank {
            seed,
            profile,
            limit,
            filter,
        } = cli.command
        else {
            panic!("expected rank");
        };
        assert_eq!(seed, DEFAULT_SEED);
        assert_eq!(profile, ScoringProfile::Extended);
        assert_eq!(limit, Some(3));

        let filter = ObservationFilter::from(filter);
        assert_eq!(filter.towns, vec![Town::Luyang, Town::Wawu]);
        assert_eq!(filter.months, vec![7]);
        assert_eq!(filter.diseases, vec![Disease::BrownRot]);
        assert!(filter.crops.is_empty());
    }

    #[test]
    fn rejects_out_of_range_month() {
        assert!(Cli::try_parse_from(["pest_map", "summary", "--month", "13"]).is_err());
        assert!(Cli::try_parse_from(["pest_map", "summary", "--town", "NOWHERE"]).is_err());
    }

    #[test]
    fn serve_flags_override_environment() {
        let base = ServerConfig::default();
        let config = server_config(base.clone(), None, Some(9000), Some(7), Some(60));
        assert_eq!(config.bind_addr, base.bind_addr);
        assert_eq!(config.port, 9000);
        assert_eq!(config.seed, 7);
        assert_eq!(config.cache_ttl, Duration::from_secs(60));

        assert_eq!(server_config(base.clone(), None, None, None, None), base);
    }

    #[test]
    fn empty_filter_selects_everything() {
        let all = load(DEFAULT_SEED).unwrap();
        let subset = select(DEFAULT_SEED, FilterArgs::default()).unwrap();
        assert_eq!(subset, all);
    }
}
