//! ecldash CLI binary.
//!
//! Serves the web dashboard or exports relative-change tables and figure
//! payloads from the command line.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ecldash::data::AppConfig;
use ecldash::output::{quarter_change_figures, ExportFormat, Exporter};
use ecldash::pipeline::segment_changes;
use ecldash::transform::{DashboardView, ReportingQuarter, Selection};

#[derive(Parser)]
#[command(name = "ecldash")]
#[command(about = "Quarterly ECL disclosure comparison dashboard", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the segment configuration file
    #[arg(long, global = true, default_value = "ecldash.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the web dashboard
    Serve {
        /// Listen address
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: SocketAddr,
    },

    /// Export change tables and figure payloads for a segment
    Export {
        /// Segment name, e.g. UK
        segment: String,

        /// Quarter tokens to compare (two or more), e.g. 4Q19,4Q20
        #[arg(long, value_delimiter = ',', required = true)]
        dates: Vec<String>,

        /// Firms to include (comma separated; empty means all)
        #[arg(long, value_delimiter = ',')]
        firms: Vec<String>,

        /// Dashboard view slug (ecl, stage2, stage3, coverage); default all
        #[arg(long)]
        view: Option<String>,

        /// Output format (csv, json or pretty-json)
        #[arg(long, default_value = "csv")]
        format: String,

        /// Output directory
        #[arg(long, default_value = "out")]
        out: PathBuf,
    },

    /// List configured segments, firms and quarters
    Segments,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = AppConfig::from_path(&cli.config)?;

    match cli.command {
        Commands::Serve { addr } => {
            ecldash_web::serve(addr, config).await?;
        }
        Commands::Export {
            segment,
            dates,
            firms,
            view,
            format,
            out,
        } => {
            export(&config, &segment, &dates, firms, view.as_deref(), &format, &out)?;
        }
        Commands::Segments => {
            list_segments(&config);
        }
    }

    Ok(())
}

fn parse_format(format: &str) -> Result<ExportFormat, String> {
    match format {
        "csv" => Ok(ExportFormat::Csv),
        "json" => Ok(ExportFormat::Json),
        "pretty-json" => Ok(ExportFormat::PrettyJson),
        other => Err(format!("unknown format: {other} (csv, json, pretty-json)")),
    }
}

fn parse_views(view: Option<&str>) -> Result<Vec<DashboardView>, String> {
    match view {
        None => Ok(DashboardView::ALL.to_vec()),
        Some(slug) => DashboardView::from_slug(slug)
            .map(|v| vec![v])
            .ok_or_else(|| format!("unknown view: {slug} (ecl, stage2, stage3, coverage)")),
    }
}

fn export(
    config: &AppConfig,
    segment_name: &str,
    dates: &[String],
    firms: Vec<String>,
    view: Option<&str>,
    format: &str,
    out: &std::path::Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let segment = config.segment(segment_name)?;
    let quarters = ReportingQuarter::parse_all(dates)?;
    let selection = Selection::firms(firms);
    let format = parse_format(format)?;
    let views = parse_views(view)?;
    let exporter = Exporter::new(out)?;

    for view in views {
        let changes = segment_changes(segment, &quarters, &selection, view)?;
        let figures = quarter_change_figures(&changes, view.label())?;

        let changes_path = exporter.export_changes(view.slug(), &changes, format)?;
        let figures_path = exporter.export_figures(view.slug(), &figures)?;
        println!(
            "{}: wrote {} and {}",
            view.label(),
            changes_path.display(),
            figures_path.display()
        );
    }

    Ok(())
}

fn list_segments(config: &AppConfig) {
    for (name, segment) in &config.segments {
        println!("{name}");
        println!("  data dir: {}", segment.data_dir.display());
        println!("  quarters: {}", segment.dates.join(", "));
        println!("  firms:    {}", segment.firms.join(", "));
    }
}
