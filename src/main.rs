use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;
use perfsum::config::Config;
use perfsum::error::PerfError;
use perfsum::ingest::{Source, ingest_all};
use perfsum::path::format_path_for_display;
use perfsum::styling::{eprintln, error_message, print, success_message, warning_message};

#[derive(Parser)]
#[command(name = "perfsum")]
#[command(about = "Compare build task timings across builds", long_about = None)]
#[command(version)]
struct Cli {
    /// Build logs with a performance summary, or *.trace.jsonl captures
    inputs: Vec<PathBuf>,

    /// Run a build command and read the summary from its output
    #[arg(short, long = "run", value_name = "COMMAND")]
    run: Vec<String>,

    /// Where to write the CSV
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Config file (defaults to .config/perfsum.toml if present)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the CSV instead of writing a file
    #[arg(long, conflicts_with = "output")]
    stdout: bool,

    /// More logging (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => {
            let cwd = std::env::current_dir().context("Failed to read current directory")?;
            Config::discover(&cwd)?
        }
    };

    let sources: Vec<Source> = cli
        .inputs
        .into_iter()
        .map(Source::from_path)
        .chain(cli.run.into_iter().map(Source::ExternalTool))
        .collect();

    if sources.is_empty() {
        anyhow::bail!("No inputs given; pass build logs, trace captures, or --run <COMMAND>");
    }

    let aggregate = ingest_all(&sources, &config)?;
    let matrix = aggregate.render();
    if matrix.rows.is_empty() {
        eprintln!("{}", warning_message("No tasks found in any input"));
    }

    if cli.stdout {
        print!("{}", matrix.to_csv());
        return Ok(());
    }

    let output = config.output_path(cli.output.as_deref());
    matrix.write_csv(&output)?;
    eprintln!(
        "{}",
        success_message(format!(
            "Wrote {} tasks across {} builds to {}",
            matrix.rows.len(),
            matrix.columns.len(),
            format_path_for_display(&output)
        ))
    );

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        match err.downcast_ref::<PerfError>() {
            Some(perf_error) => eprintln!("{}", perf_error.styled()),
            None => eprintln!("{}", error_message(format!("{err:#}"))),
        }
        process::exit(1);
    }
}
