//! Command-line entry point.
//!
//! Loads a run configuration (classic numeric record, YAML, or JSON,
//! chosen by file extension), runs every replication, and writes the
//! report. Fatal conditions map to distinct exit codes: configuration
//! errors 1, queue overflow 2, exhausted event schedule 3, I/O failures 4.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};

use tandemsim::config::ConfigError;
use tandemsim::{results_to_csv, results_to_json, ReplicationDriver, RunError, SimConfig};

#[derive(Parser)]
#[command(
    name = "tandemsim",
    version,
    about = "Discrete-event simulator for tandem queueing networks"
)]
struct Cli {
    /// Input parameters: a numeric record file, or a .yaml/.yml/.json
    /// configuration
    input: PathBuf,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value = "text")]
    format: Format,

    /// Override the configured variate-stream seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the configured replication count
    #[arg(long)]
    replications: Option<u32>,

    /// Override the configured log level
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
    Csv,
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        process::exit(err.exit_code());
    }
}

fn run(cli: Cli) -> Result<(), RunError> {
    let mut config = SimConfig::from_file(&cli.input)?;
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(replications) = cli.replications {
        config.replications = replications;
    }
    config.validate()?;

    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    tandemsim::init_logging(level);

    let mut out = open_output(cli.output.as_ref())?;
    let mut driver = ReplicationDriver::new(config);

    match cli.format {
        Format::Text => {
            driver.run_with_report(&mut out)?;
        }
        Format::Json => {
            let results = driver.run_all()?;
            let json = results_to_json(&results).map_err(ConfigError::Json)?;
            writeln!(out, "{json}")?;
        }
        Format::Csv => {
            let results = driver.run_all()?;
            write!(out, "{}", results_to_csv(&results))?;
        }
    }

    out.flush()?;
    Ok(())
}

fn open_output(path: Option<&PathBuf>) -> Result<Box<dyn Write>, RunError> {
    match path {
        Some(path) => Ok(Box::new(BufWriter::new(File::create(path)?))),
        None => Ok(Box::new(std::io::stdout().lock())),
    }
}
