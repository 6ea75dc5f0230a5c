//! # stackctl
//!
//! Converts stack manifests into swarm-style services offline.
//!
//! ## Usage
//!
//! ```bash
//! # Dump objects of a stack and convert them
//! kubectl get replicasets,daemonsets,services -n my-stack -o yaml > snapshot.yaml
//! stackctl convert snapshot.yaml
//!
//! # List services like `docker stack services`
//! stackctl services snapshot.yaml --stack my-stack
//! ```
//!
//! Label keys and name suffixes come from the environment, see
//! [`ConverterConfig`](stack_service_converter::ConverterConfig).

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info};

use stack_service_converter::conversion::{AnyOf, LabelMatcher, SuffixMatcher};
use stack_service_converter::output::{render, OutputFormat};
use stack_service_converter::{Converter, ConverterConfig, Snapshot};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("BUILD_GIT_HASH"),
    ", built ",
    env!("BUILD_DATETIME"),
    ")"
);

/// Stack service converter CLI
#[derive(Parser)]
#[command(name = "stackctl")]
#[command(
    about = "Convert Kubernetes stack objects into swarm-style services",
    version,
    long_version = LONG_VERSION,
    after_help = "\
Examples:
  stackctl convert snapshot.yaml
  stackctl convert snapshot.yaml --format yaml
  stackctl services snapshot.yaml --stack my-stack
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Also tie published services to a logical service through the service name label
    #[arg(long, global = true)]
    match_labels: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a snapshot and print the services
    Convert {
        /// Manifest file (YAML or JSON) holding replica sets, daemon sets and services
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// List the services of a snapshot
    Services {
        /// Manifest file (YAML or JSON) holding replica sets, daemon sets and services
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Only show services of this stack
        #[arg(short, long)]
        stack: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ConverterConfig::from_env();

    // Logs go to stderr, stdout carries the converted services
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.to_lowercase().into()),
        )
        .with_writer(std::io::stderr)
        .init();

    config.validate().context("Invalid converter configuration")?;

    let converter = build_converter(config, cli.match_labels);
    debug!("Using converter {converter:?}");

    match cli.command {
        Commands::Convert { file, format } => {
            let services = convert_file(&converter, &file)?;
            print!("{}", ensure_trailing_newline(render(&services, format)?));
        }
        Commands::Services {
            file,
            stack,
            format,
        } => {
            let mut services = convert_file(&converter, &file)?;
            if let Some(stack) = stack.as_deref() {
                services.retain(|service| service.belongs_to(stack));
            }
            print!("{}", ensure_trailing_newline(render(&services, format)?));
        }
    }

    Ok(())
}

fn build_converter(config: ConverterConfig, match_labels: bool) -> Converter {
    if match_labels {
        let matcher = AnyOf::new()
            .with(SuffixMatcher::from_config(&config))
            .with(LabelMatcher::new(config.service_name_label.as_str()));
        Converter::new(config).with_matcher(matcher)
    } else {
        Converter::new(config)
    }
}

fn convert_file(
    converter: &Converter,
    file: &std::path::Path,
) -> Result<Vec<stack_service_converter::SwarmService>> {
    let snapshot = Snapshot::load(file)?;
    if snapshot.is_empty() {
        info!("No replica sets, daemon sets or services in {}", file.display());
    }

    let services = snapshot
        .convert(converter)
        .with_context(|| format!("Failed to convert {}", file.display()))?;
    info!("Converted {} services from {}", services.len(), file.display());
    Ok(services)
}

fn ensure_trailing_newline(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}
