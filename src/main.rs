use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

use birdbook_seed::app::seed_use_case::SeedUseCase;
use birdbook_seed::app::wait_use_case::wait_for_services;
use birdbook_seed::config::{ConfigOverrides, SeedConfig};
use birdbook_seed::fixtures;
use birdbook_seed::infra::gateway_factory;
use birdbook_seed::infra::http_client::ReqwestHealthProbe;
use birdbook_seed::infra::image_library::ImageLibrary;
use birdbook_seed::logging;
use birdbook_seed::types::Flavor;

#[derive(Parser)]
#[command(name = "birdbook-seed")]
#[command(about = "Populate a BirdBook deployment with demo users, birds, groups and sightings")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to ./seed.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// API gateway base URL
    #[arg(long, global = true)]
    gateway: Option<String>,

    /// Backend API generation: legacy or multipart
    #[arg(long, global = true)]
    flavor: Option<Flavor>,

    /// Directory with images to upload (e.g. barred_owl.jpg)
    #[arg(long, global = true)]
    images_dir: Option<PathBuf>,

    /// Health check attempts per service
    #[arg(long, global = true)]
    max_retries: Option<u32>,

    /// Seconds between health check attempts
    #[arg(long, global = true)]
    retry_delay_secs: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Wait until every service reports healthy
    Wait,
    /// Wait for the services, then create the demo data
    Seed {
        /// Assume the services are already up
        #[arg(long)]
        skip_wait: bool,
    },
    /// Print the demo data set as JSON without contacting any service
    Fixtures,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            gateway_url: self.gateway.clone(),
            flavor: self.flavor,
            images_dir: self.images_dir.clone(),
            max_retries: self.max_retries,
            retry_delay_secs: self.retry_delay_secs,
        }
    }
}

async fn wait(config: &SeedConfig) -> anyhow::Result<()> {
    let probe = ReqwestHealthProbe::new(config.health_timeout())?;
    wait_for_services(
        &probe,
        &config.services,
        config.retry_policy(),
        config.settle_delay(),
    )
    .await?;
    Ok(())
}

async fn seed(config: &SeedConfig, skip_wait: bool) -> anyhow::Result<()> {
    if !skip_wait {
        wait(config).await?;
    }

    let api = gateway_factory::for_config(config)?;
    let images = ImageLibrary::new(config.images_dir.clone());
    if images.is_enabled() {
        info!("Uploading images where available");
    }

    let use_case = SeedUseCase::new(api.as_ref(), &images, &config.admin, config.retry_policy());
    let report = use_case.run(&fixtures::all()).await?;
    report.print_summary();
    Ok(())
}

fn print_fixtures() -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&fixtures::all())?);
    Ok(())
}

async fn run(command: Commands, config: &SeedConfig) -> anyhow::Result<()> {
    match command {
        Commands::Wait => {
            println!("⏳ Waiting for services...");
            wait(config).await?;
            println!("✅ All services are ready");
        }
        Commands::Seed { skip_wait } => {
            println!("🌱 Seeding {} ({} flavor)...", config.base_url(), config.flavor);
            seed(config, skip_wait).await?;
            println!("✅ Data seeding completed");
        }
        Commands::Fixtures => print_fixtures()?,
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // No network, no log files
    if matches!(cli.command, Commands::Fixtures) {
        return finish(print_fixtures());
    }

    dotenv::dotenv().ok();
    let _guard = logging::init_logging();

    finish(start(cli).await)
}

async fn start(cli: Cli) -> anyhow::Result<()> {
    let mut config = SeedConfig::load(cli.config.as_deref()).context("loading configuration")?;
    config.apply_overrides(cli.overrides())?;

    tokio::select! {
        res = run(cli.command, &config) => res,
        _ = tokio::signal::ctrl_c() => Err(anyhow!("Seeding interrupted by user")),
    }
}

/// Report a failure once and map it to exit status 1
fn finish(outcome: anyhow::Result<()>) -> ExitCode {
    ExitCode::from(exit_status(outcome))
}

fn exit_status(outcome: anyhow::Result<()>) -> u8 {
    match outcome {
        Ok(()) => 0,
        Err(e) => {
            error!("✗ Seeding failed: {:#}", e);
            eprintln!("❌ Seeding failed: {:#}", e);
            1
        }
    }
}
