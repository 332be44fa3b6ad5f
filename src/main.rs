use anyhow::{bail, Context, Result};
use chrono::{Datelike, Local};
use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use secret_santa::{
    load_dataset, reporter_for, save_dataset, Dataset, DatasetValidator, DrawConfig, DrawEngine,
    OutputFormat, SantaError, Severity,
};

#[derive(Parser)]
#[command(name = "secret-santa")]
#[command(about = "Draw this year's Secret Santa from a family data file", long_about = None)]
#[command(version)]
struct Cli {
    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw a new year and append it to the data file
    Draw {
        /// Data file (JSON)
        file: PathBuf,

        /// Year to draw (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,

        /// Seed for a reproducible draw
        #[arg(long)]
        seed: Option<u64>,

        /// Give up after this many solver attempts per population
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        max_attempts: Option<u32>,

        /// Years a giver must not repeat a recipient from
        #[arg(long)]
        recent_years: Option<usize>,

        /// Draw configuration file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Print the draw without saving it
        #[arg(long)]
        dry_run: bool,
    },

    /// Check the data file for inconsistencies
    Check {
        /// Data file (JSON)
        file: PathBuf,
    },

    /// Print a year that was already drawn
    Show {
        /// Data file (JSON)
        file: PathBuf,

        /// Year to show (defaults to the most recent)
        #[arg(long)]
        year: Option<i32>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(io::stderr),
        )
        .init();

    match cli.command {
        Commands::Draw {
            file,
            year,
            seed,
            max_attempts,
            recent_years,
            config,
            format,
            dry_run,
        } => {
            let mut config = match config {
                Some(path) => DrawConfig::from_file(&path)
                    .with_context(|| format!("Failed to load draw config {}", path.display()))?,
                None => DrawConfig::default(),
            };
            if let Some(seed) = seed {
                config = config.with_seed(seed);
            }
            if let Some(max) = max_attempts {
                config = config.with_max_attempts(max);
            }
            if let Some(years) = recent_years {
                config = config.with_recent_years(years);
            }

            run_draw(&file, year.unwrap_or_else(|| Local::now().year()), config, format, dry_run)
        }
        Commands::Check { file } => run_check(&file),
        Commands::Show { file, year, format } => run_show(&file, year, format),
    }
}

fn load_checked(file: &Path) -> Result<Dataset> {
    let data = load_dataset(file)?;

    let warnings = DatasetValidator::validate(&data).into_result().map_err(|err| {
        if let SantaError::InvalidDataset { errors } = &err {
            for issue in errors {
                eprintln!("❌ {}", issue);
            }
        }
        err
    })?;
    for issue in &warnings {
        warn!("{}", issue);
    }

    Ok(data)
}

fn run_draw(
    file: &Path,
    year: i32,
    config: DrawConfig,
    format: OutputFormat,
    dry_run: bool,
) -> Result<()> {
    let mut data = load_checked(file)?;

    let mut engine = DrawEngine::from_config(config);
    let entry = engine.run(&mut data, year)?;

    reporter_for(format, io::stdout().lock()).report(&entry)?;

    if dry_run {
        eprintln!("Dry run, {} not modified", file.display());
        return Ok(());
    }

    save_dataset(&data, file).with_context(|| format!("Failed to save {}", file.display()))?;
    eprintln!("✓ Saved {} to {}", year, file.display());

    Ok(())
}

fn run_check(file: &Path) -> Result<()> {
    let data = load_dataset(file)?;
    let report = DatasetValidator::validate(&data);

    for issue in &report.issues {
        match issue.severity {
            Severity::Error => println!("❌ {}", issue),
            Severity::Warning => println!("⚠️  {}", issue),
        }
    }
    println!(
        "{} adults, {} kids, {} families, {} years of history: {}",
        data.adults.len(),
        data.kids.len(),
        data.families.len(),
        data.history.len(),
        report.summary()
    );

    if report.has_errors() {
        bail!("{} is inconsistent", file.display());
    }
    Ok(())
}

fn run_show(file: &Path, year: Option<i32>, format: OutputFormat) -> Result<()> {
    let data = load_dataset(file)?;

    let entry = match year {
        Some(year) => data.entry_for(year),
        None => data.most_recent_entry(),
    };
    let Some(entry) = entry else {
        match year {
            Some(year) => bail!("No draw for {} in {}", year, file.display()),
            None => bail!("{} has no history yet", file.display()),
        }
    };

    reporter_for(format, io::stdout().lock()).report(entry)?;
    Ok(())
}
