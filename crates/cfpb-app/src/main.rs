//! Main application entry point

use std::path::PathBuf;
use std::sync::Arc;
use anyhow::{Context, Result};
use arrow::util::pretty::pretty_format_batches;
use chrono::NaiveDate;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cfpb_core::Selection;
use cfpb_data::{export, ComplaintCache, DashboardConfig, FilterOptions, SqliteStore, Summary};

mod create_sample_db;

/// Rows of the filtered view printed below the summary
const PREVIEW_ROWS: usize = 10;

/// Filter and summarize consumer complaints from a local database.
#[derive(Parser, Debug)]
#[command(name = "complaints-dash", version)]
struct Args {
    /// JSON configuration file.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Database file (overrides the configuration).
    #[arg(long, value_name = "PATH")]
    db: Option<PathBuf>,

    /// First day of the date range.
    #[arg(long, value_name = "YYYY-MM-DD", value_parser = parse_day)]
    from: Option<NaiveDate>,

    /// Last day of the date range.
    #[arg(long, value_name = "YYYY-MM-DD", value_parser = parse_day)]
    to: Option<NaiveDate>,

    /// Keep this company (repeatable).
    #[arg(long = "company", value_name = "NAME")]
    companies: Vec<String>,

    /// Keep this product (repeatable).
    #[arg(long = "product", value_name = "NAME")]
    products: Vec<String>,

    /// Write the filtered view as CSV.
    #[arg(long, value_name = "FILE")]
    export: Option<PathBuf>,

    /// Write a demo database and exit.
    #[arg(long, value_name = "PATH")]
    create_sample: Option<PathBuf>,
}

impl Args {
    fn selection(&self) -> Selection {
        Selection {
            start_date: self.from,
            end_date: self.to,
            companies: self.companies.iter().cloned().collect(),
            products: self.products.iter().cloned().collect(),
        }
    }
}

fn parse_day(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("'{}' is not a YYYY-MM-DD date: {}", value, e))
}

fn load_config(args: &Args) -> Result<DashboardConfig> {
    let mut config = match &args.config {
        Some(path) => DashboardConfig::from_file(path)
            .with_context(|| format!("Failed to read configuration {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    if let Some(db) = &args.db {
        config.db_path = db.clone();
    }
    config.validate()?;
    Ok(config)
}

fn print_options(options: &FilterOptions) {
    if let (Some(min), Some(max)) = (options.min_date, options.max_date) {
        println!("Date range: {} .. {}", min, max);
    }
    println!("Companies ({}): {}", options.top_companies.len(), options.top_companies.join(", "));
    println!("Products ({}): {}", options.products.len(), options.products.join(", "));
}

fn print_summary(summary: &Summary) {
    let percent = |rate: Option<f64>| {
        rate.map(|r| format!("{:.1}%", r * 100.0))
            .unwrap_or_else(|| "n/a".to_string())
    };
    let top = |entry: &Option<cfpb_data::CategoryCount>| {
        entry.as_ref()
            .map(|c| format!("{} ({})", c.value, c.count))
            .unwrap_or_else(|| "n/a".to_string())
    };

    println!("Total complaints: {}", summary.total_complaints);
    println!("Timely responses: {}", percent(summary.timely_rate));
    println!("Disputed: {}", percent(summary.disputed_rate));
    println!("Top company: {}", top(&summary.top_company));
    println!("Top product: {}", top(&summary.top_product));
    println!("Top issue: {}", top(&summary.top_issue));

    if !summary.by_month.is_empty() {
        println!("Complaints by month:");
        for month in &summary.by_month {
            println!("  {}  {}", month.value, month.count);
        }
    }
}

fn run(args: Args) -> Result<()> {
    if let Some(path) = &args.create_sample {
        let rows = create_sample_db::create_sample_database(path)
            .with_context(|| format!("Failed to create sample database {}", path.display()))?;
        println!("Sample database with {} complaints written to {}", rows, path.display());
        return Ok(());
    }

    let config = load_config(&args)?;
    let store = SqliteStore::from_config(&config)?;
    let cache = ComplaintCache::new(Arc::new(store), config.cache_ttl);

    let table = cache.get()?;
    if table.num_rows() == 0 {
        println!("No data available in {}", config.db_path.display());
        return Ok(());
    }

    let options = FilterOptions::from_table(&table, config.top_companies)?;
    print_options(&options);
    println!();

    let filtered = cfpb_data::apply(&table, &args.selection())?;
    info!("Selection kept {} of {} complaints", filtered.num_rows(), table.num_rows());

    if filtered.num_rows() == 0 {
        println!("No complaints match the selected filters");
        return Ok(());
    }

    print_summary(&Summary::from_table(&filtered)?);
    println!();

    let preview = filtered.slice(0, filtered.num_rows().min(PREVIEW_ROWS));
    println!("{}", pretty_format_batches(&[preview])?);

    if let Some(path) = &args.export {
        export::export_csv(&filtered, path)?;
        println!("Exported {} rows to {}", filtered.num_rows(), path.display());
    }

    Ok(())
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting complaints dashboard");

    let args = Args::parse();
    run(args)
}
