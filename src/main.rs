use std::path::PathBuf;

use clap::Parser;
use eyre::eyre;
use stock_analysis::{
    config::{AnalysisConfig, AveragePolicy},
    loader::FileFormat,
    model::StockCollection,
    report::StockReport,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stock-analysis")]
#[command(about = "Load daily trading data and analyse stocks", long_about = None)]
struct Cli {
    /// Data files to load in order; `.csv` or `.trp`
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Stock codes to report on (default: every loaded stock)
    #[arg(short, long = "stock")]
    stocks: Vec<String>,

    /// Moving average window in days
    #[arg(long, default_value_t = AnalysisConfig::default().moving_average_days)]
    days: usize,

    /// Minimum open-over-previous-close rise counted as a gap up
    #[arg(long, default_value_t = AnalysisConfig::default().gap_up_delta)]
    delta: f64,

    /// Moving average divisor for histories shorter than the window
    #[arg(long, value_enum, default_value_t = AveragePolicy::default())]
    policy: AveragePolicy,

    /// Print the reports as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AnalysisConfig::default()
        .with_moving_average_days(cli.days)
        .with_gap_up_delta(cli.delta)
        .with_average_policy(cli.policy);

    let mut stocks = StockCollection::new();
    for path in &cli.files {
        let count = FileFormat::load_path(path, &mut stocks)?;
        info!(path = %path.display(), count, "loaded");
    }

    let codes = if cli.stocks.is_empty() {
        stocks.codes().into_iter().map(str::to_owned).collect()
    } else {
        cli.stocks
    };

    let mut reports = Vec::new();
    for code in &codes {
        let stock = stocks
            .get(code)
            .ok_or_else(|| eyre!("no trading data loaded for {code}"))?;
        reports.push(StockReport::build(stock, &config)?);
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    for r in &reports {
        println!("Average Volume of {} is {}", r.code, r.average_volume);
        println!(
            "Highest & Lowest trading price of {} is ({}, {})",
            r.code, r.high, r.low
        );
        println!(
            "Moving average of {} over last {} days is {:.2}",
            r.code, r.moving_average_days, r.moving_average
        );
        match &r.last_gap_up {
            Some(date) => println!("Last gap up date of {} is {date}", r.code),
            None => println!("{} has no gap up", r.code),
        }
    }

    Ok(())
}
