#![allow(clippy::doc_markdown)]
//! `cnoise` - inspect CPU tier detection and sample coherent noise.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use cnoise_core::{
    cpu::cpu_features, detect_tier, supported_tiers, CpuFeatures, InstructionTier, NoiseConfig,
    Quality,
};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// cnoise - coherent 3D gradient noise with runtime SIMD dispatch
#[derive(Parser, Debug)]
#[command(name = "cnoise")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    overrides: Overrides,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Flags layered on top of the loaded configuration.
#[derive(ClapArgs, Debug)]
struct Overrides {
    /// TOML configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Smoothing quality: fast, standard, best
    #[arg(long, global = true)]
    quality: Option<Quality>,

    /// Noise seed
    #[arg(long, global = true, allow_negative_numbers = true)]
    seed: Option<i32>,

    /// Force an instruction tier (fallback, sse2, sse41, avx, avx2, avx512, neon)
    #[arg(long, global = true)]
    tier: Option<InstructionTier>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the detected instruction tier and decoded CPU features
    Detect {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Sample one point with the scalar kernel
    Sample {
        #[arg(allow_negative_numbers = true)]
        x: f32,
        #[arg(allow_negative_numbers = true)]
        y: f32,
        #[arg(allow_negative_numbers = true)]
        z: f32,
    },
    /// Sample a row along x through the dispatched kernel, printed as JSON
    Row {
        /// First x coordinate
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        start: f32,
        /// Distance between consecutive x coordinates
        #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
        step: f32,
        /// Number of samples
        #[arg(long, default_value_t = 16)]
        count: usize,
        #[arg(allow_negative_numbers = true)]
        y: f32,
        #[arg(allow_negative_numbers = true)]
        z: f32,
    },
}

#[derive(Serialize)]
struct DetectReport {
    tier: InstructionTier,
    lanes: usize,
    supported: Vec<InstructionTier>,
    features: CpuFeatures,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Loads the layered configuration and applies command-line overrides.
fn resolve_config(overrides: &Overrides) -> Result<NoiseConfig> {
    let mut config = NoiseConfig::load(overrides.config.as_deref())
        .context("Failed to load noise configuration")?;
    if let Some(quality) = overrides.quality {
        config.quality = quality;
    }
    if let Some(seed) = overrides.seed {
        config.seed = seed;
    }
    if overrides.tier.is_some() {
        config.tier = overrides.tier;
    }
    tracing::debug!(?config, "resolved configuration");
    Ok(config)
}

fn run_detect(json: bool) -> Result<()> {
    let report = DetectReport {
        tier: detect_tier(),
        lanes: detect_tier().lanes(),
        supported: supported_tiers(),
        features: cpu_features(),
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Detected tier: {} ({} lanes)", report.tier, report.lanes);
    let supported: Vec<&str> = report.supported.iter().map(|t| t.as_str()).collect();
    println!("Supported tiers: {}", supported.join(", "));
    let f = &report.features;
    println!(
        "Features: sse2={} sse4.1={} avx={} avx2={} avx512f={} osxsave={} neon={}",
        f.sse2, f.sse41, f.avx, f.avx2, f.avx512f, f.osxsave, f.neon
    );
    println!(
        "XCR0: {:#x} (ymm state: {}, zmm state: {})",
        f.xcr0,
        f.os_ymm_enabled(),
        f.os_zmm_enabled()
    );
    Ok(())
}

fn run_row(config: &NoiseConfig, start: f32, step: f32, count: usize, y: f32, z: f32) -> Result<()> {
    let engine = config
        .engine()
        .with_context(|| format!("Cannot sample with tier {:?}", config.tier))?;
    #[allow(clippy::cast_precision_loss)] // sample index as coordinate offset
    let xs: Vec<f32> = (0..count).map(|i| start + step * i as f32).collect();
    let row = engine.sample_row(&xs, y, z, config.seed, config.quality);
    tracing::debug!(tier = %engine.tier(), count, "row sampled");
    println!("{}", serde_json::to_string(&row)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Detect { json } => run_detect(json),
        Command::Sample { x, y, z } => {
            let config = resolve_config(&cli.overrides)?;
            let value = cnoise_core::coherent_noise_3d(x, y, z, config.seed, config.quality);
            println!("{value}");
            Ok(())
        }
        Command::Row {
            start,
            step,
            count,
            y,
            z,
        } => {
            let config = resolve_config(&cli.overrides)?;
            run_row(&config, start, step, count, y, z)
        }
    }
}
