//! fsheat - Data temperature analysis for HDFS namespace snapshots.
//!
//! Usage:
//!   fsheat --image-xml IMAGE.xml --dfs-path /user/hive     Analyze an XML dump
//!   fsheat --image-file fsimage_N --dfs-path /user/hive    Convert with `hdfs oiv`, then analyze
//!   fsheat --fetch-image --dfs-path /user/hive             Fetch, convert, then analyze
//!   fsheat --help                                          Show help

mod hdfs;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, ValueEnum};
use color_eyre::eyre::{Context, Result, bail, eyre};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use fsheat_analyze::{
    DirectorySummary, TemperatureAnalyzer, TemperatureReport, Traversal, normalize_path, resolve,
    split_path,
};
use fsheat_core::{AnalyzeConfig, Snapshot, TemperatureThresholds};
use fsheat_image::SnapshotLoader;

#[derive(Parser)]
#[command(
    name = "fsheat",
    version,
    about = "Data temperature analysis for HDFS namespace snapshots",
    long_about = "fsheat classifies every file under an HDFS path as hot, warm or cold by \
                  the age of its modification and access times, using an offline fsimage \
                  dump instead of querying the NameNode."
)]
struct Cli {
    /// Fetch the latest fsimage from the NameNode
    #[arg(long)]
    fetch_image: bool,

    /// Directory the fetched fsimage is stored in
    #[arg(long, default_value = "/tmp")]
    fetch_dir: PathBuf,

    /// Binary fsimage file to convert
    #[arg(long, conflicts_with = "fetch_image")]
    image_file: Option<PathBuf>,

    /// Directory the converted XML is written to
    #[arg(long, default_value = "/tmp")]
    convert_dir: PathBuf,

    /// Already converted fsimage XML (skips fetching and converting)
    #[arg(long)]
    image_xml: Option<PathBuf>,

    /// DFS path of the subtree to analyze
    #[arg(long)]
    dfs_path: String,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Reference time in epoch milliseconds (defaults to now)
    #[arg(long)]
    now: Option<i64>,

    /// Files younger than this many days are hot
    #[arg(long, default_value = "7")]
    hot_days: u32,

    /// Files younger than this many days (and not hot) are warm
    #[arg(long, default_value = "30")]
    warm_days: u32,

    /// Traverse top-level subdirectories in parallel
    #[arg(long)]
    parallel: bool,

    /// Number of worker threads for parallel traversal (0 = auto-detect)
    #[arg(long, default_value = "0")]
    threads: usize,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Single JSON document emitted by `--format json`.
#[derive(Serialize)]
struct JsonOutput<'a> {
    directories: &'a IndexMap<String, DirectorySummary>,
    report: &'a TemperatureReport,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    if split_path(&cli.dfs_path).is_err() {
        bail!("Analyzing root path is not supported.");
    }

    let config = analyze_config(&cli)?;
    let image_xml = locate_xml(&cli)?;

    let snapshot = load_snapshot(&image_xml)?;
    let (path, traversal) = run_analysis(&snapshot, &config, cli.format)?;

    eprintln!();
    eprintln!("Creating report");
    let report = traversal.report(&path).context("Failed to create report")?;

    let mut stdout = io::stdout().lock();
    match cli.format {
        OutputFormat::Text => {
            writeln!(stdout, "{}", serde_json::to_string_pretty(&report)?)?;
        }
        OutputFormat::Json => {
            let output = JsonOutput {
                directories: &traversal.summaries,
                report: &report,
            };
            writeln!(stdout, "{}", serde_json::to_string_pretty(&output)?)?;
        }
    }

    Ok(())
}

/// Install a stderr subscriber; `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .try_init()
        .map_err(|e| eyre!("Failed to initialize logging: {e}"))
}

fn analyze_config(cli: &Cli) -> Result<AnalyzeConfig> {
    let thresholds = TemperatureThresholds::from_days(cli.hot_days, cli.warm_days)
        .context("Invalid temperature thresholds")?;

    let mut builder = AnalyzeConfig::builder();
    builder
        .dfs_path(cli.dfs_path.as_str())
        .thresholds(thresholds)
        .parallel(cli.parallel || cli.threads > 0)
        .threads(cli.threads);
    if let Some(now) = cli.now {
        builder.now_millis(now);
    }
    builder.build().context("Invalid configuration")
}

/// Work out which XML dump to read, fetching and converting as needed.
fn locate_xml(cli: &Cli) -> Result<PathBuf> {
    if let Some(xml) = &cli.image_xml {
        return Ok(xml.clone());
    }

    let image = if cli.fetch_image {
        hdfs::fetch_image(&cli.fetch_dir)?
    } else {
        cli.image_file
            .clone()
            .ok_or_else(|| eyre!("One of --image-xml, --image-file or --fetch-image is required"))?
    };

    hdfs::convert_image(&image, &cli.convert_dir)
}

fn load_snapshot(image_xml: &Path) -> Result<Snapshot> {
    eprintln!("Parsing {} ...", image_xml.display());

    let loader = SnapshotLoader::new();
    let snapshot = loader
        .load_file(image_xml)
        .with_context(|| format!("Failed to load {}", image_xml.display()))?;

    eprintln!("Total number of inodes: {}.", snapshot.stats.total_inodes);
    eprintln!(
        "{} directories, {} files, {}.",
        snapshot.stats.total_dirs,
        snapshot.stats.total_files,
        format_size(snapshot.stats.total_size)
    );
    Ok(snapshot)
}

/// Resolve the requested path and traverse it, printing directory lines
/// in text mode. Returns the normalized path with the traversal.
fn run_analysis(
    snapshot: &Snapshot,
    config: &AnalyzeConfig,
    format: OutputFormat,
) -> Result<(String, Traversal)> {
    let segments = split_path(&config.dfs_path)?;
    let path = normalize_path(&segments);

    eprintln!();
    eprintln!("Analyzing {path} ...");

    let start = resolve(snapshot.root, &segments, snapshot)?;
    let analyzer = TemperatureAnalyzer::from_config(config);

    let traversal = if config.parallel {
        let traversal = analyzer.traverse_parallel(snapshot, start, &path, config.threads)?;
        if let OutputFormat::Text = format {
            let mut stdout = io::stdout().lock();
            for (dir, summary) in &traversal.summaries {
                writeln!(stdout, "|-{dir}\t{summary}")?;
            }
        }
        traversal
    } else {
        let mut stdout = io::stdout().lock();
        let mut write_error = None;
        let traversal = analyzer.traverse_with(snapshot, start, &path, |visit| {
            if !matches!(format, OutputFormat::Text) || write_error.is_some() {
                return;
            }
            let line = match visit.summary {
                Some(summary) => writeln!(stdout, "|-{}\t{summary}", visit.path),
                None => writeln!(stdout, "|-{}\t", visit.path),
            };
            if let Err(e) = line {
                write_error = Some(e);
            }
        })?;
        if let Some(e) = write_error {
            return Err(e).context("Failed to write directory summary");
        }
        traversal
    };

    info!(
        directories = traversal.stats.directories_visited,
        files = traversal.total_files(),
        symlinks = traversal.stats.symlinks_skipped,
        "analysis finished"
    );
    Ok((path, traversal))
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}
