use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use proxysub::generator::formats::singbox::{proxy_to_singbox, to_json_string};
use proxysub::generator::formats::subscription::{
    proxy_to_sub_base64, proxy_to_sub_text, proxy_to_universal,
};
use proxysub::parser::explodes::explode_sub;
use proxysub::{OutboundGenerator, Settings, Validator};

/// Convert and validate proxy subscriptions and sing-box configurations
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML or YAML settings file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a sing-box configuration or a subscription
    Validate {
        /// File to validate
        file: PathBuf,

        /// Kind of content in the file
        #[arg(long = "type", value_enum, default_value_t = InputType::Singbox)]
        input_type: InputType,
    },
    /// Decode a subscription and re-emit it in another format
    Convert {
        /// Subscription file, plain or base64
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Target::Singbox)]
        target: Target,

        /// Seed for generated secrets, for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Write to this file instead of stdout
        #[arg(short, long, value_name = "OUTPUT_FILE")]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum InputType {
    Singbox,
    Subscription,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Target {
    Singbox,
    Text,
    Base64,
    Universal,
}

fn main() -> ExitCode {
    // Initialize the logger
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let args = Args::parse();
    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let settings = match &args.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };

    match args.command {
        Command::Validate { file, input_type } => validate(&settings, &file, input_type),
        Command::Convert {
            file,
            target,
            seed,
            output,
        } => {
            convert(&settings, &file, target, seed, output.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn validate(settings: &Settings, file: &Path, input_type: InputType) -> Result<ExitCode> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let validator = Validator::new(settings.validator.clone());
    let report = match input_type {
        InputType::Singbox => validator.validate_str(&content),
        InputType::Subscription => validator.validate_subscription(&content),
    };

    println!("{}", report);
    info!(
        "{}: {} error(s), {} warning(s)",
        file.display(),
        report.errors().len(),
        report.warnings().len()
    );

    Ok(if report.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn convert(
    settings: &Settings,
    file: &Path,
    target: Target,
    seed: Option<u64>,
    output: Option<&Path>,
) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let batch = explode_sub(&content);
    if batch.is_empty() {
        warn!("{} contains no proxy entries", file.display());
    }
    if !batch.failures.is_empty() {
        warn!("Skipped {} undecodable line(s)", batch.failures.len());
    }
    info!("Decoded {} proxy record(s)", batch.records.len());

    let rendered = match target {
        Target::Text => proxy_to_sub_text(&batch.records),
        Target::Base64 => proxy_to_sub_base64(&batch.records),
        Target::Universal => proxy_to_universal(&batch.records),
        Target::Singbox => {
            let rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let mut generator = OutboundGenerator::with_settings(rng, settings.generator.clone());
            let build = proxy_to_singbox(&batch.records, &mut generator, &settings.aggregate);
            for failure in &build.failures {
                warn!("Record {} not converted: {}", failure.index, failure.error);
            }
            let proxies = build.config.outbounds.iter().filter(|o| o.is_proxy()).count();
            info!("Generated {} proxy outbound(s)", proxies);
            to_json_string(&build.config).context("failed to serialize configuration")?
        }
    };

    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("Successfully wrote {}", path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}
