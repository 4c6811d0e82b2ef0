//! MetroPulse CLI
//!
//! Usage:
//!   metropulse --station "Bedford Av"        # Full station report
//!   metropulse --stations                    # Overview of every station
//!   metropulse --clusters                    # Cluster summaries
//!   metropulse --locate 40.739 -74.002       # Borough only
//!   metropulse --station "Bedford Av" --json # JSON output

use anyhow::{bail, Result};
use clap::Parser;
use colored::{Color, Colorize};
use std::path::PathBuf;
use std::time::Duration;

use metropulse::config::{
    AppConfig, PolishConfig, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL,
    DEFAULT_POLISH_TIMEOUT_SECS,
};
use metropulse::core::{build_polisher, classify_borough, Engine, NarrativeCache, StartupTables};
use metropulse::types::{Borough, ClusterSummary, StationOverview, StationReport, TimeDna};
use metropulse::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "metropulse",
    version = VERSION,
    about = "MetroPulse - semantic profiles for NYC subway stations",
    long_about = "MetroPulse turns ridership pulses, amenity counts and coordinates into a\n\
                  per-station profile: borough, TimeDNA, vitality/office percentiles and a\n\
                  persona narrative generated once and cached forever.\n\n\
                  Modes:\n  \
                  --station NAME   Full report for one station (generates the narrative)\n  \
                  --stations       Overview of every station\n  \
                  --clusters       Cluster summaries with archetype chart data\n  \
                  --locate LAT LON Borough for a coordinate"
)]
struct Args {
    /// Station identity (exact, case-sensitive)
    #[arg(long)]
    station: Option<String>,

    /// List every station
    #[arg(long)]
    stations: bool,

    /// List cluster summaries
    #[arg(long)]
    clusters: bool,

    /// Classify a coordinate pair
    #[arg(long, num_args = 2, value_names = ["LAT", "LON"], allow_negative_numbers = true)]
    locate: Option<Vec<f64>>,

    /// Directory holding stations.json, hourly_ridership.json, cluster_profiles.json, personas.json
    #[arg(long, env = "METROPULSE_DATA_DIR", default_value = "./data")]
    data_dir: PathBuf,

    /// Narrative cache file (default: <data-dir>/narratives.json)
    #[arg(long, env = "METROPULSE_CACHE_FILE")]
    cache_file: Option<PathBuf>,

    /// API key for the text-polish model
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    gemini_api_key: Option<String>,

    /// Text-polish model
    #[arg(long, default_value = DEFAULT_GEMINI_MODEL)]
    gemini_model: String,

    /// Text-polish API base URL
    #[arg(long, default_value = DEFAULT_GEMINI_BASE_URL)]
    gemini_base_url: String,

    /// Seconds before a polish call is abandoned
    #[arg(long, default_value_t = DEFAULT_POLISH_TIMEOUT_SECS)]
    polish_timeout_secs: u64,

    /// Never call the text-polish model
    #[arg(long)]
    no_polish: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,
}

impl Args {
    fn app_config(&self) -> AppConfig {
        let polish = PolishConfig {
            enabled: !self.no_polish,
            api_key: self.gemini_api_key.clone(),
            base_url: self.gemini_base_url.clone(),
            model: self.gemini_model.clone(),
            timeout: Duration::from_secs(self.polish_timeout_secs),
        };
        AppConfig::new(self.data_dir.clone(), self.cache_file.clone(), polish)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if args.no_color {
        colored::control::set_override(false);
    }

    if let Some(ref coords) = args.locate {
        return run_locate(coords, &args);
    }

    let config = args.app_config();
    let engine = build_engine(&config);

    if let Some(ref station) = args.station {
        run_station(&engine, station, &args).await
    } else if args.stations {
        run_stations(&engine, &args)
    } else if args.clusters {
        run_clusters(&engine, &args)
    } else {
        bail!("no mode given, use --station, --stations, --clusters or --locate (see --help)")
    }
}

fn build_engine(config: &AppConfig) -> Engine {
    let tables = StartupTables::load(config.data_dir());
    let cache = NarrativeCache::load(config.cache_file.clone());
    let polisher = build_polisher(&config.polish);
    Engine::new(tables, cache, polisher).with_polish_timeout(config.polish.timeout)
}

/// Borough for a single coordinate pair
fn run_locate(coords: &[f64], args: &Args) -> Result<()> {
    let (lat, lon) = match coords {
        [lat, lon] => (*lat, *lon),
        _ => bail!("--locate takes exactly LAT LON"),
    };
    let borough = classify_borough(Some(lat), Some(lon));

    if args.json {
        println!("{}", serde_json::json!({ "lat": lat, "lon": lon, "borough": borough }));
    } else {
        println!("{:.4}, {:.4} → {}", lat, lon, borough.label().color(borough_color(borough)).bold());
    }
    Ok(())
}

/// Full report for one station
async fn run_station(engine: &Engine, station: &str, args: &Args) -> Result<()> {
    let report = match engine.report(station).await {
        Some(report) => report,
        None => {
            let sentinel = engine.narrative(station).await.record;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&sentinel)?);
            } else {
                println!("{} {}", sentinel.persona.red().bold(), sentinel.description.dimmed());
            }
            return Ok(());
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn run_stations(engine: &Engine, args: &Args) -> Result<()> {
    let overviews = engine.station_overviews();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&overviews)?);
    } else {
        for overview in &overviews {
            print_overview(overview);
        }
        println!("\n{} stations", overviews.len());
    }
    Ok(())
}

fn run_clusters(engine: &Engine, args: &Args) -> Result<()> {
    let summaries = engine.cluster_summaries();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else {
        for summary in &summaries {
            print_cluster(summary);
        }
    }
    Ok(())
}

fn borough_color(borough: Borough) -> Color {
    match borough {
        Borough::Manhattan => Color::Cyan,
        Borough::Brooklyn => Color::Magenta,
        Borough::Queens => Color::Yellow,
        Borough::Bronx => Color::Green,
        Borough::StatenIsland => Color::Blue,
        Borough::Unknown => Color::BrightBlack,
    }
}

fn format_dna(dna: &TimeDna) -> String {
    format!(
        "morning={} lunch={} evening={} night={}",
        dna.morning, dna.lunch, dna.evening, dna.night
    )
}

fn print_report(report: &StationReport) {
    let source = if report.is_ai_generated { "polished" } else { "rule-based" };

    println!("{}", report.identity.bold());
    println!("  {}", report.persona.color(borough_color(report.borough)).bold());
    println!("  borough:  {}", report.borough);
    println!("  timedna:  {}", format_dna(&report.time_dna));
    println!(
        "  scores:   vitality={:.1} office={:.1} retail_gap={:.1}",
        report.vitality_score, report.office_score, report.retail_gap
    );
    println!();
    println!("  {}", report.description);
    println!("  {}", format!("({})", source).dimmed());
}

fn print_overview(overview: &StationOverview) {
    let borough = overview.metrics.borough;
    println!(
        "{:<32} {:<14} vit={:>5.1} off={:>5.1} gap={:.1} | {} | {}",
        overview.station,
        borough.label().color(borough_color(borough)),
        overview.metrics.weekend_vitality * 100.0,
        overview.metrics.office_density,
        overview.metrics.retail_gap,
        format_dna(&overview.time_dna).dimmed(),
        overview.persona_name
    );
}

fn print_cluster(summary: &ClusterSummary) {
    println!(
        "{} {} ({} stations, avg bars {:.1}, e.g. {})",
        format!("[{}]", summary.cluster_id).bold(),
        summary.persona.name.cyan(),
        summary.station_count,
        summary.avg_bars,
        summary.example_station
    );
    if !summary.persona.description.is_empty() {
        println!("    {}", summary.persona.description.dimmed());
    }
}
