use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use rayon::prelude::*;
use time::format_description::well_known::Rfc3339;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use trackstats::{AnalysisConfig, GpxReader, TrackSummary};

#[derive(Parser)]
#[command(name = "trackstats")]
#[command(about = "Elevation and distance metrics for GPX tracks", long_about = None)]
struct Cli {
    /// GPX files to analyze
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Print one JSON summary per line instead of text
    #[arg(long)]
    json: bool,

    /// Elevation-gain threshold in kilometers (overrides TRACKSTATS_GAIN_THRESHOLD_KM)
    #[arg(long)]
    threshold: Option<f64>,
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn analyze(path: &Path, config: &AnalysisConfig) -> anyhow::Result<TrackSummary> {
    let activity =
        GpxReader::load_file(path).with_context(|| format!("reading {}", path.display()))?;
    let summary = activity
        .summary(config)
        .with_context(|| format!("analyzing {}", path.display()))?;
    Ok(summary)
}

fn format_time(time: Option<time::OffsetDateTime>) -> String {
    time.and_then(|t| t.format(&Rfc3339).ok())
        .unwrap_or_else(|| "-".to_string())
}

fn print_text(path: &Path, summary: &TrackSummary) {
    println!("{}", path.display());
    println!("  name:            {}", summary.name.as_deref().unwrap_or("-"));
    println!(
        "  activity type:   {}",
        summary.activity_type.map_or("-", |t| t.as_str())
    );
    println!("  points:          {}", summary.point_count);
    println!("  distance:        {:.4} km", summary.total_distance_km);
    println!(
        "  elevation:       min {:.1} m, max {:.1} m, avg {:.1} m",
        summary.min_elevation, summary.max_elevation, summary.avg_elevation
    );
    println!("  elevation gain:  {:.1} m", summary.elevation_gain);
    println!("  start:           {}", format_time(summary.started_at));
    println!("  end:             {}", format_time(summary.ended_at));
    if let Some(secs) = summary.duration_seconds {
        println!(
            "  duration:        {}:{:02}:{:02}",
            secs / 3600,
            (secs % 3600) / 60,
            secs % 60
        );
    }
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut config = AnalysisConfig::from_env();
    if let Some(threshold) = cli.threshold {
        anyhow::ensure!(
            threshold.is_finite() && threshold >= 0.0,
            "threshold must be a non-negative number"
        );
        config.gain_threshold_km = threshold;
    }
    tracing::debug!(?config, files = cli.files.len(), "Starting analysis");

    let results: Vec<_> = cli
        .files
        .par_iter()
        .map(|path| (path, analyze(path, &config)))
        .collect();

    let mut failed = 0usize;
    for (path, result) in results {
        match result {
            Ok(summary) if cli.json => println!("{}", serde_json::to_string(&summary)?),
            Ok(summary) => print_text(path, &summary),
            Err(e) => {
                tracing::error!("{e:#}");
                failed += 1;
            }
        }
    }

    anyhow::ensure!(
        failed == 0,
        "{failed} of {} files could not be analyzed",
        cli.files.len()
    );
    Ok(())
}
