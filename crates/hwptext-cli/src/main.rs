//! hwptext command-line interface.
//!
//! Extracted text goes to stdout. Everything else (the strategy line, logs and
//! errors) goes to stderr so the output can be piped safely.

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use hwptext::core::config::ExtractionConfig;
use hwptext::core::extractor::Extractor;
use hwptext::text::EncodingDetector;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;

#[derive(Parser)]
#[command(name = "hwptext")]
#[command(about = "Extract readable text from HWP and HWPX documents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract normalized text from a document
    Extract {
        /// Path to the .hwp or .hwpx file
        path: PathBuf,

        /// Configuration file (TOML or JSON). Defaults to a discovered hwptext.toml
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Run the encoding detector over a raw byte file
    Decode {
        /// File holding undeclared-encoding bytes
        path: PathBuf,

        /// Configuration file (TOML or JSON). Defaults to a discovered hwptext.toml
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Extract { path, config, format } => cmd_extract(&path, config.as_deref(), format),
        Commands::Decode { path, config } => cmd_decode(&path, config.as_deref()),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<ExtractionConfig> {
    match path {
        Some(path) => ExtractionConfig::from_file(path)
            .map_err(|e| anyhow!("Failed to load configuration from {}: {e}", path.display())),
        None => {
            let discovered =
                ExtractionConfig::discover().map_err(|e| anyhow!("Failed to load discovered configuration: {e}"))?;
            if discovered.is_some() {
                debug!("Using discovered hwptext.toml");
            }
            Ok(discovered.unwrap_or_default())
        }
    }
}

fn cmd_extract(path: &Path, config: Option<&Path>, format: OutputFormat) -> Result<()> {
    let config = load_config(config)?;
    let extractor = Extractor::with_detected_capabilities(config);

    let result = extractor.extract_file(path)?;
    eprintln!("Decoded using {} path.", result.label);

    let mut stdout = io::stdout().lock();
    match format {
        OutputFormat::Text => stdout.write_all(result.content.as_bytes())?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut stdout, &result)?;
            stdout.write_all(b"\n")?;
        }
    }
    stdout.flush()?;
    Ok(())
}

fn cmd_decode(path: &Path, config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let raw = std::fs::read(path).map_err(|e| anyhow!("Failed to read {}: {e}", path.display()))?;

    let detection = EncodingDetector::new(config.detector).detect(&raw);
    match detection.candidate {
        Some(candidate) => eprintln!(
            "Decoded as {} (score {:.3}{})",
            candidate,
            detection.score,
            if detection.narrowed { ", narrowed" } else { "" }
        ),
        None => eprintln!("No candidate decoded the input"),
    }

    let mut stdout = io::stdout().lock();
    stdout.write_all(detection.text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
