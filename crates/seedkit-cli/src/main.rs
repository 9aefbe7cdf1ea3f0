//! seedkit CLI: seed synthetic ad-platform data for a tenant.
//!
//! stdout carries only the outcome JSON; logs go to stderr.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use seedkit_core::manifest::EXIT_FAILURE;
use seedkit_core::prelude::{Platform, SeedRequest, SeedkitConfig};
use seedkit_exec::steps::scenario;
use seedkit_exec::Seeder;
use seedkit_io::{
    FixtureProvider, FsFixtureProvider, MemoryDataStore, ScenarioLoader, StaticScenarioLoader,
    YamlScenarioLoader,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "seedkit")]
#[command(about = "Safety-gated synthetic data seeding for ad-platform tenants", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a scenario and write it for a tenant
    Seed(SeedArgs),

    /// Inspect scenario definitions
    Scenarios {
        #[command(subcommand)]
        command: ScenarioCommands,
    },

    /// List supported platforms
    Platforms,
}

#[derive(Args)]
struct SeedArgs {
    /// Tenant to seed
    #[arg(long)]
    tenant: String,

    /// Scenario id (built-in, or a file in --scenario-dir)
    #[arg(long)]
    scenario: String,

    /// Generator seed
    #[arg(long)]
    seed: u64,

    /// Days to generate (defaults to the scenario's default)
    #[arg(long)]
    days: Option<u32>,

    /// Comma-separated platforms, e.g. google,facebook (default: all)
    #[arg(long)]
    platforms: Option<String>,

    /// Generate and report, write nothing
    #[arg(long)]
    dry_run: bool,

    /// Seed even if the tenant already holds real data
    #[arg(long)]
    allow_real_tenant: bool,

    /// Directory of YAML scenarios (overrides SEEDKIT_SCENARIO_DIR)
    #[arg(long)]
    scenario_dir: Option<PathBuf>,

    /// Directory of fixtures (overrides SEEDKIT_FIXTURE_DIR)
    #[arg(long)]
    fixture_dir: Option<PathBuf>,

    /// Also write the outcome JSON to this path
    #[arg(long)]
    manifest_out: Option<PathBuf>,
}

#[derive(Subcommand)]
enum ScenarioCommands {
    /// Load and validate a scenario (and its fixture, if any)
    Validate {
        #[arg(short, long)]
        scenario: String,

        #[arg(long)]
        scenario_dir: Option<PathBuf>,

        #[arg(long)]
        fixture_dir: Option<PathBuf>,
    },

    /// List known scenario ids
    List {
        #[arg(long)]
        scenario_dir: Option<PathBuf>,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let cfg = SeedkitConfig::from_env();

    let code = match cli.command {
        Commands::Seed(args) => match run_seed(&cfg, args) {
            Ok(code) => code,
            Err(e) => {
                eprintln!("Error: {}", e);
                EXIT_FAILURE
            }
        },
        Commands::Scenarios {
            command:
                ScenarioCommands::Validate {
                    scenario,
                    scenario_dir,
                    fixture_dir,
                },
        } => match validate_scenario(&cfg, &scenario, scenario_dir, fixture_dir) {
            Ok(summary) => {
                println!("✓ {}", summary);
                0
            }
            Err(e) => {
                eprintln!("Validation failed: {}", e);
                EXIT_FAILURE
            }
        },
        Commands::Scenarios {
            command: ScenarioCommands::List { scenario_dir },
        } => match loader_for(&cfg, scenario_dir).list() {
            Ok(ids) => {
                for id in ids {
                    println!("{}", id);
                }
                0
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                EXIT_FAILURE
            }
        },
        Commands::Platforms => {
            for p in Platform::ALL {
                println!("{}", p);
            }
            0
        }
    };

    std::process::exit(code);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn loader_for(cfg: &SeedkitConfig, dir: Option<PathBuf>) -> Arc<dyn ScenarioLoader> {
    match dir.or_else(|| cfg.scenario_dir.clone().map(PathBuf::from)) {
        Some(dir) => Arc::new(YamlScenarioLoader::new(dir)),
        None => Arc::new(StaticScenarioLoader::builtin()),
    }
}

fn fixtures_for(cfg: &SeedkitConfig, dir: Option<PathBuf>) -> Option<Arc<dyn FixtureProvider>> {
    dir.or_else(|| cfg.fixture_dir.clone().map(PathBuf::from))
        .map(|d| Arc::new(FsFixtureProvider::new(d)) as Arc<dyn FixtureProvider>)
}

fn build_request(args: &SeedArgs) -> Result<SeedRequest, Box<dyn std::error::Error>> {
    let mut req = SeedRequest::new(args.tenant.as_str(), args.scenario.as_str(), args.seed)
        .dry_run(args.dry_run)
        .allow_real_tenant(args.allow_real_tenant);
    if let Some(days) = args.days {
        req = req.with_days(days);
    }
    if let Some(list) = &args.platforms {
        req = req.with_platforms(Platform::parse_list(list)?);
    }
    Ok(req)
}

fn run_seed(cfg: &SeedkitConfig, args: SeedArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let request = build_request(&args)?;

    let mut seeder = Seeder::new(
        cfg.safety.clone(),
        loader_for(cfg, args.scenario_dir),
        Arc::new(MemoryDataStore::new()),
    );
    if let Some(fx) = fixtures_for(cfg, args.fixture_dir) {
        seeder = seeder.with_fixtures(fx);
    }

    let outcome = seeder.run(&request);
    let json = serde_json::to_string_pretty(&outcome)?;
    println!("{}", json);
    if let Some(path) = args.manifest_out {
        fs::write(&path, &json)?;
        tracing::info!(path = %path.display(), "outcome written");
    }
    Ok(outcome.exit_code)
}

fn validate_scenario(
    cfg: &SeedkitConfig,
    id: &str,
    scenario_dir: Option<PathBuf>,
    fixture_dir: Option<PathBuf>,
) -> Result<String, Box<dyn std::error::Error>> {
    let loader = loader_for(cfg, scenario_dir);
    let fixtures = fixtures_for(cfg, fixture_dir);
    let descriptor = scenario::load(loader.as_ref(), &id.into())?.value;
    let prepared = scenario::validate(&descriptor, fixtures.as_deref())?.value;
    Ok(format!(
        "Scenario '{}' is valid ({}, {} default days)",
        prepared.scenario.id, prepared.scenario.trend, prepared.scenario.default_days
    ))
}
