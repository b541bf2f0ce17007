use analytics::{AnalyticsEngine, SummaryRow};
use clap::{Args, Parser, Subcommand, ValueEnum};
use comfy_table::Table;
use configuration::{ServerOverrides, Settings};
use core_types::Column;
use dataset::load_dataset;
use std::path::PathBuf;
use std::sync::Arc;

/// The main entry point for the Ripple analytics application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load RIPPLE__* overrides from a .env file, if there is one.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let mut settings = configuration::load_config(&cli.config)?;
    let _log_guard = configuration::init_tracing(&settings.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Serve(overrides) => {
            settings.apply_overrides(&overrides)?;
            tracing::info!(
                config = %cli.config.display(),
                data = %settings.data.path.display(),
                "Starting analytics server."
            );
            web_server::run_server(settings).await
        }
        Commands::Report(args) => handle_report(args, settings),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Read-only analytics over a historical kline dataset.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path of the TOML settings file. A missing file means "all defaults".
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the dataset and serve the analytics over HTTP.
    Serve(ServerOverrides),
    /// Load the dataset, compute one view and print it.
    Report(ReportArgs),
}

#[derive(Args)]
struct ReportArgs {
    /// The analytics view to compute.
    #[arg(value_enum)]
    view: View,

    /// Path of the kline CSV file, overriding `data.path`.
    #[arg(long)]
    data: Option<PathBuf>,

    /// RSI lookback (rsi view only).
    #[arg(long)]
    window: Option<usize>,

    /// Comma-separated columns to correlate (correlation view only).
    #[arg(long, value_delimiter = ',')]
    columns: Vec<Column>,
}

#[derive(Clone, Copy, ValueEnum)]
enum View {
    Summary,
    Clean,
    MonthlyStatistics,
    PriceTrends,
    TradeAnalysis,
    Correlation,
    Rsi,
    DailyClosingPrice,
    PricePrediction,
}

// ==============================================================================
// Report Command Logic
// ==============================================================================

/// Loads the dataset once and prints the requested view to stdout.
fn handle_report(args: ReportArgs, settings: Settings) -> anyhow::Result<()> {
    let path = args.data.unwrap_or(settings.data.path);
    let engine = AnalyticsEngine::new(Arc::new(load_dataset(&path)?));

    let output = match args.view {
        View::Summary => render_summary(&engine.summarize()),
        View::Clean => serde_json::to_string_pretty(&engine.clean())?,
        View::MonthlyStatistics => serde_json::to_string_pretty(&engine.monthly_statistics()?)?,
        View::PriceTrends => serde_json::to_string_pretty(&engine.price_trends()?)?,
        View::TradeAnalysis => serde_json::to_string_pretty(&engine.trade_analysis()?)?,
        View::Correlation => {
            let columns = if args.columns.is_empty() {
                settings.analytics.correlation_columns
            } else {
                args.columns
            };
            serde_json::to_string_pretty(&engine.correlate(Some(columns.as_slice()))?)?
        }
        View::Rsi => {
            let window = args.window.unwrap_or(settings.analytics.rsi_window);
            serde_json::to_string_pretty(&engine.rsi(Some(window))?)?
        }
        View::DailyClosingPrice => serde_json::to_string_pretty(&engine.daily_closing_price()?)?,
        View::PricePrediction => serde_json::to_string_pretty(&engine.price_prediction())?,
    };

    println!("{output}");
    Ok(())
}

/// Renders the data summary as a statistic-by-column table.
fn render_summary(rows: &[SummaryRow]) -> String {
    let mut table = Table::new();
    let mut header = vec!["statistic".to_string()];
    header.extend(Column::NUMERIC.iter().map(|c| c.label().to_string()));
    table.set_header(header);

    for row in rows {
        let mut cells = vec![row.statistic().to_string()];
        match row {
            SummaryRow::Statistic { .. } => {
                cells.extend(Column::NUMERIC.iter().map(|c| match row.value(*c) {
                    Some(value) => format!("{value:.6}"),
                    None => "-".to_string(),
                }));
            }
            SummaryRow::RecordCount { value, .. } => cells.push(value.to_string()),
        }
        table.add_row(cells);
    }

    table.to_string()
}
