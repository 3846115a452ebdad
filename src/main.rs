use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use sleepdash::csv_reader;
use sleepdash::data::RawTable;
use sleepdash::{parse_views, Dashboard, DashboardConfig, ViewState};
use std::io::{self, Read, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sleepdash")]
#[command(about = "Compute sleep-health dashboard charts from CSV data", long_about = None)]
struct Args {
    /// View selection (e.g., 'occupation_treemap(min_sample: 3) | bmi_sunburst()'); every chart when omitted
    views: Option<String>,

    /// Read the dataset from this file instead of stdin
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// The dataset is a JSON array of objects rather than CSV
    #[arg(long)]
    json: bool,

    /// JSON file with canvas sizes and thresholds
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn load_table(args: &Args) -> sleepdash::Result<RawTable> {
    match (&args.input, args.json) {
        (Some(path), false) => csv_reader::read_csv_from_path(path),
        (None, false) => csv_reader::read_csv_from_stdin(),
        (Some(path), true) => RawTable::from_json_str(&std::fs::read_to_string(path)?),
        (None, true) => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            RawTable::from_json_str(&text)
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => DashboardConfig::from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => DashboardConfig::default(),
    };

    // Parse the view selection
    let views = match &args.views {
        Some(dsl) => parse_views(dsl).context("Failed to parse view selection")?,
        None => ViewState::all(),
    };

    let table = match load_table(&args) {
        Ok(table) => table,
        Err(e) => {
            error!("failed to load dataset: {}", e);
            return Err(e).context("Failed to load dataset");
        }
    };
    info!("loaded {} rows, rendering {} view(s)", table.len(), views.len());

    let mut dashboard = Dashboard::from_table(&table, config);
    let outputs = dashboard.render_all(&views);

    // Write JSON to stdout
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if args.pretty {
        serde_json::to_writer_pretty(&mut handle, &outputs)
    } else {
        serde_json::to_writer(&mut handle, &outputs)
    }
    .context("Failed to write charts to stdout")?;
    writeln!(handle).context("Failed to write to stdout")?;
    handle.flush().context("Failed to flush stdout")?;

    Ok(())
}
