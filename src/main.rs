//! `pitch-volume` command line tool.
//!
//! Reads a PITCH feed from a file or stdin and prints the symbols with the
//! most traded shares.
//!
//! ```bash
//! pitch-volume pitch_example_data
//! pitch-volume --config pitch.toml --format json < pitch_example_data
//! RUST_LOG=pitch_volume=debug pitch-volume -n 20 pitch_example_data
//! ```

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pitch_volume::config::MalformedPolicy;
use pitch_volume::report::{render_json, render_table};
use pitch_volume::{Config, ReplayEngine};

/// Rank symbols by shares traded in a PITCH feed
#[derive(Parser, Debug)]
#[command(name = "pitch-volume", version, about, long_about = None)]
struct Cli {
    /// Feed file ("-" for stdin); defaults to the config's input, then stdin
    input: Option<PathBuf>,

    /// TOML file with field layout and run settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of symbols to show
    #[arg(short = 'n', long)]
    top: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    format: Format,

    /// Warn about undecodable records instead of aborting
    #[arg(long)]
    skip_malformed: bool,

    /// Records carry no leading marker character
    #[arg(long)]
    no_marker: bool,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Table,
    Json,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(io::stderr)
        .init();
}

fn build_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(top) = cli.top {
        config = config.with_top_n(top);
    }
    if cli.skip_malformed {
        config = config.with_malformed_policy(MalformedPolicy::Skip);
    }
    if cli.no_marker {
        config = config.with_leading_marker(None);
    }
    if let Some(input) = &cli.input {
        config = config.with_input(Some(input.clone()));
    }

    config.validate()?;
    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    let config = build_config(&cli)?;
    let mut engine = ReplayEngine::new(&config);

    match config.input().filter(|p| p.as_os_str() != "-") {
        Some(path) => {
            info!(path = %path.display(), "reading feed");
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            engine
                .replay(BufReader::new(file))
                .with_context(|| format!("replaying {}", path.display()))?;
        }
        None => {
            info!("reading feed from stdin");
            engine.replay(io::stdin().lock()).context("replaying stdin")?;
        }
    }

    let ranking = engine.ranking();
    let output = match cli.format {
        Format::Table => render_table(&ranking),
        Format::Json => render_json(&ranking, engine.stats())? + "\n",
    };

    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(cli)
}
