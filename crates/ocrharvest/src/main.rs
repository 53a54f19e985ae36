use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

use ocrharvest::config::{expand_home, load_config, parse_language_tags, RunConfig};
use ocrharvest::{ConsoleProgress, Pipeline, PipelineConfig, RunReport, TesseractEngine};

#[derive(Parser)]
#[command(name = "ocrharvest", version)]
#[command(about = "OCR a folder of screenshots into text files, a markdown digest and a link list")]
struct Args {
    /// Directory containing the images to process
    input_dir: String,

    /// Directory receiving txt/, all_text.md, all_text.txt, urls.txt and urls.csv
    output_dir: String,

    /// Comma-separated BCP-47 language hints, e.g. "en-US,pl-PL"
    language_tags: Option<String>,

    /// Number of OCR threads (0 uses every CPU)
    #[arg(long, value_parser = clap::value_parser!(u16).range(0..=256))]
    workers: Option<u16>,

    /// JSON run configuration
    #[arg(long)]
    config: Option<String>,

    /// Directory with Tesseract traineddata files
    #[arg(long)]
    tessdata: Option<String>,

    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Raise log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                // --help and --version
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(e) = init_logging(args.log_format, args.verbose) {
        eprintln!("Failed to initialize logging: {:#}", e);
        return ExitCode::FAILURE;
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(format: LogFormat, verbose: u8) -> anyhow::Result<()> {
    tracing_log::LogTracer::init().context("installing log bridge")?;

    let default_directive = match verbose {
        0 => "ocrharvest=warn",
        1 => "ocrharvest=info",
        _ => "ocrharvest=debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => tracing::subscriber::set_global_default(
            registry.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
        ),
        LogFormat::Json => tracing::subscriber::set_global_default(
            registry.with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            ),
        ),
    }
    .context("installing tracing subscriber")
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut run_config = match &args.config {
        Some(path) => load_config(expand_home(path))
            .with_context(|| format!("loading configuration from {}", path))?,
        None => RunConfig::default(),
    };

    if let Some(tags) = &args.language_tags {
        run_config.languages = parse_language_tags(tags);
    }
    if let Some(workers) = args.workers {
        run_config.workers = usize::from(workers);
    }
    if let Some(dir) = args.tessdata {
        run_config.tessdata_dir = Some(dir);
    }

    let config = Arc::new(PipelineConfig::from_config(
        &run_config,
        expand_home(&args.input_dir),
        expand_home(&args.output_dir),
    ));

    tracing::info!(
        languages = ?config.languages,
        workers = config.workers,
        "Starting OCR run"
    );

    let engine = TesseractEngine::from_config(&run_config);
    let pipeline = Pipeline::new(config, Arc::new(engine));
    match pipeline.run(&ConsoleProgress)? {
        RunReport::NoImages => tracing::info!("Nothing to do"),
        RunReport::Completed(summary) => {
            if summary.failed_count > 0 {
                tracing::warn!(
                    "{} of {} images produced no text due to OCR failures",
                    summary.failed_count,
                    summary.image_count
                );
            }
        }
    }

    Ok(())
}
