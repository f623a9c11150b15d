use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::info;

use langprox::config::Config;
use langprox::similarity::MetricMode;

/// Langprox: how close are languages to each other, word by word?
///
/// Compares translations of the same source words across languages, by
/// spelling and by pronunciation, and reports proximity tables, outliers,
/// and language and topic communities.
#[derive(Parser)]
#[command(name = "langprox", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the analysis pipeline and write result tables
    Run {
        /// Which metric to run (default: all)
        #[arg(long, value_enum, default_value = "all")]
        mode: ModeArg,

        /// Directory containing the input word tables
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Directory to write result tables to (default: data dir)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// |z| above which a value is an outlier (default: 2.0)
        #[arg(long)]
        z_threshold: Option<f64>,

        /// Cosine similarity above which two topics are linked (default: 0.995)
        #[arg(long)]
        topic_threshold: Option<f64>,

        /// Louvain resolution (default: 1.0)
        #[arg(long)]
        resolution: Option<f64>,

        /// Seed for the community detection visit order
        #[arg(long)]
        seed: Option<u64>,

        /// Don't draw progress bars
        #[arg(long)]
        no_progress: bool,
    },

    /// Show which result tables exist and when they were produced
    Status {
        /// Output directory to inspect (default: data dir)
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Lexical,
    Phonetic,
    All,
}

impl ModeArg {
    fn modes(self) -> Vec<MetricMode> {
        match self {
            ModeArg::Lexical => vec![MetricMode::Lexical],
            ModeArg::Phonetic => vec![MetricMode::Phonetic],
            ModeArg::All => MetricMode::ALL.to_vec(),
        }
    }
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("langprox=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            mode,
            data_dir,
            output_dir,
            z_threshold,
            topic_threshold,
            resolution,
            seed,
            no_progress,
        } => {
            let mut config = Config::load()?;
            if let Some(dir) = data_dir {
                // An explicit data dir also moves the default output dir,
                // unless one was given too.
                if output_dir.is_none() && config.output_dir == config.data_dir {
                    config.output_dir = dir.clone();
                }
                config.data_dir = dir;
            }
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            if let Some(z) = z_threshold {
                config.z_threshold = z;
            }
            if let Some(t) = topic_threshold {
                config.topic_threshold = t;
            }
            if let Some(r) = resolution {
                config.resolution = r;
            }
            if seed.is_some() {
                config.seed = seed;
            }
            if no_progress {
                config.show_progress = false;
            }
            config.validate()?;

            let modes = mode.modes();
            info!(modes = modes.len(), output = %config.output_dir.display(), "Running analysis");
            let results = langprox::pipeline::run_all(&config, &modes);
            langprox::output::terminal::display_run_results(&results);

            if results.iter().all(|(_, r)| r.is_err()) {
                anyhow::bail!("every requested analysis run failed");
            }
        }

        Commands::Status { output_dir } => {
            let mut config = Config::load()?;
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            langprox::status::show(&config)?;
        }
    }

    Ok(())
}
