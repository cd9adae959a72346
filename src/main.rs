use analytics::{DashboardEngine, DashboardSnapshot, MetricsSummarizer, SalesLedger};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use configuration::{Config, DashboardDefaults};
use core_types::{FilterState, Granularity, GroupedPoint, RawSalesRecord, SummaryMetric};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// The main entry point for the Sales Pulse dashboard engine.
fn main() -> Result<()> {
    // Optional .env file with SALES_PULSE__* overrides.
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Parse command-line arguments
    let cli = Cli::parse();
    let config = configuration::load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {:?}", cli.config))?;

    // Execute the appropriate command
    match cli.command {
        Commands::Dashboard(args) => handle_dashboard(args, &config),
        Commands::Summary(args) => handle_summary(args, &config),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Sales analytics for dashboards: grouped series, anomalies, year-over-year
/// and period-to-date cards.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. A missing file means defaults.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recompute the full dashboard: series plus summary cards.
    Dashboard(DashboardArgs),
    /// Print only the period-to-date summary cards.
    Summary(SummaryArgs),
}

#[derive(Parser)]
struct DashboardArgs {
    /// JSON file holding an array of `{ "date": ..., "amount": ... }` records.
    #[arg(long)]
    records: PathBuf,

    /// First day of the chart range (format: YYYY-MM-DD). Defaults to the earliest record.
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last day of the chart range (format: YYYY-MM-DD). Defaults to the latest record.
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Bucket width: day, week, month, quarter or year.
    #[arg(long)]
    granularity: Option<Granularity>,

    /// Flag anomalies even if the config turns them off.
    #[arg(long, overrides_with = "no_anomalies")]
    anomalies: bool,

    /// Skip anomaly flagging.
    #[arg(long, overrides_with = "anomalies")]
    no_anomalies: bool,

    /// Draw the moving-average overlay even if the config turns it off.
    #[arg(long, overrides_with = "no_moving_average")]
    moving_average: bool,

    /// Skip the moving-average overlay.
    #[arg(long, overrides_with = "moving_average")]
    no_moving_average: bool,

    /// Pair each point with the prior year even if the config turns it off.
    #[arg(long, overrides_with = "no_past_period")]
    past_period: bool,

    /// Skip the prior-year comparison.
    #[arg(long, overrides_with = "past_period")]
    no_past_period: bool,

    /// Evaluate the summary cards as of this date instead of today.
    #[arg(long)]
    reference_date: Option<NaiveDate>,

    /// Print the snapshot as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

impl DashboardArgs {
    /// Builds the filter, letting explicit flags win over the config defaults.
    fn filter(
        &self,
        defaults: &DashboardDefaults,
        ledger: &SalesLedger,
        fallback: NaiveDate,
    ) -> FilterState {
        FilterState {
            start_date: self.from.or(ledger.first_date()).unwrap_or(fallback),
            end_date: self.to.or(ledger.last_date()).unwrap_or(fallback),
            granularity: self.granularity.unwrap_or(defaults.granularity),
            show_anomalies: toggle(self.anomalies, self.no_anomalies)
                .unwrap_or(defaults.show_anomalies),
            show_moving_average: toggle(self.moving_average, self.no_moving_average)
                .unwrap_or(defaults.show_moving_average),
            show_past_period: toggle(self.past_period, self.no_past_period)
                .unwrap_or(defaults.show_past_period),
        }
    }
}

/// `None` when neither flag of an on/off pair was given.
fn toggle(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

#[derive(Parser)]
struct SummaryArgs {
    /// JSON file holding an array of `{ "date": ..., "amount": ... }` records.
    #[arg(long)]
    records: PathBuf,

    /// Evaluate the summary cards as of this date instead of today.
    #[arg(long)]
    reference_date: Option<NaiveDate>,

    /// Print the cards as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

// ==============================================================================
// Command Logic
// ==============================================================================

/// Handles a single dashboard recompute.
fn handle_dashboard(args: DashboardArgs, config: &Config) -> Result<()> {
    let raw = read_records(&args.records)?;
    let ledger = SalesLedger::from_raw(&raw);

    let mut settings = config.analytics.clone();
    if args.reference_date.is_some() {
        settings.reference_date = args.reference_date;
    }
    let engine = DashboardEngine::from_settings(&settings, Local::now().date_naive())?;

    let filter = args.filter(&config.dashboard, &ledger, engine.reference_date());

    let snapshot = engine.recompute_ledger(&ledger, &filter);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!(
        "Sales by {} from {} to {}",
        filter.granularity, filter.start_date, filter.end_date
    );
    println!("{}", series_table(&snapshot.series));
    println!("Summary as of {}", engine.reference_date());
    println!("{}", summary_table(&snapshot.summary));
    print_diagnostics(&snapshot);
    Ok(())
}

/// Handles the summary-only command.
fn handle_summary(args: SummaryArgs, config: &Config) -> Result<()> {
    let raw = read_records(&args.records)?;
    let ledger = SalesLedger::from_raw(&raw);
    let reference_date = args
        .reference_date
        .or(config.analytics.reference_date)
        .unwrap_or_else(|| Local::now().date_naive());

    let cards = MetricsSummarizer::new().summarize(&ledger, reference_date);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&cards)?);
    } else {
        println!("Summary as of {}", reference_date);
        println!("{}", summary_table(&cards));
        if !ledger.rejected().is_empty() {
            println!("Excluded {} malformed record(s).", ledger.rejected().len());
        }
    }
    Ok(())
}

fn read_records(path: &Path) -> Result<Vec<RawSalesRecord>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read records from {:?}", path))?;
    let records: Vec<RawSalesRecord> = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse records in {:?}", path))?;
    tracing::debug!(count = records.len(), "Loaded raw sales records.");
    Ok(records)
}

fn series_table(series: &[GroupedPoint]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Period",
        "Total",
        "Moving Avg",
        "Anomaly",
        "Prior Year",
        "Change %",
    ]);
    for point in series {
        table.add_row(vec![
            point.label.clone(),
            point.total_amount.round_dp(2).to_string(),
            optional(point.moving_average),
            if point.is_anomaly { "yes".to_string() } else { String::new() },
            optional(point.prior_year_amount),
            optional(point.percent_change_vs_prior_year),
        ]);
    }
    table
}

fn summary_table(cards: &[SummaryMetric]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Window", "Current", "Prior Year", "Change %", "Direction"]);
    for card in cards {
        table.add_row(vec![
            card.window.to_string(),
            card.current_value.round_dp(2).to_string(),
            card.prior_value.round_dp(2).to_string(),
            optional(card.percent_change),
            card.direction.to_string(),
        ]);
    }
    table
}

fn print_diagnostics(snapshot: &DashboardSnapshot) {
    let diagnostics = &snapshot.diagnostics;
    if diagnostics.inverted_range {
        println!("The start date is after the end date; no series was produced.");
    }
    if diagnostics.excluded_records > 0 {
        println!("Excluded {} malformed record(s):", diagnostics.excluded_records);
        for rejection in &diagnostics.rejections {
            println!("  #{}: {}", rejection.index, rejection.reason);
        }
    }
}

fn optional(value: Option<Decimal>) -> String {
    value
        .map(|v| v.round_dp(2).to_string())
        .unwrap_or_else(|| "N/A".to_string())
}
