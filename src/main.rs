use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing::{error, info};

use tick_stocks::api::YahooClient;
use tick_stocks::database_sqlx::DatabaseManagerSqlx;
use tick_stocks::models::Config;
use tick_stocks::pipeline::Pipeline;
use tick_stocks::resolver;
use tick_stocks::sinks::{ConsoleSink, CsvExportSink, DatabaseSink, Sink};
use tick_stocks::utils::{init_logging, prompt_line, prompt_yes_no};

/// Daily stock price fetcher with SMA(20)/RSI(14) indicators
#[derive(Parser)]
#[command(name = "tick-stocks")]
#[command(version)]
#[command(about = "Fetch daily stock prices, compute SMA(20) and RSI(14), and print, export or store them")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch price history and write it to the selected outputs
    Fetch(FetchArgs),
    /// Print the stored records for a ticker
    Show {
        ticker: String,
    },
    /// List tickers that have stored records
    Tickers,
}

#[derive(Args)]
struct FetchArgs {
    /// Ticker symbols to process in order (prompts when omitted on a terminal)
    tickers: Vec<String>,

    /// Relative period such as 1mo, 3mo or 1y
    #[arg(long, short = 'p')]
    period: Option<String>,

    /// Use the configured default ticker list instead of prompting
    #[arg(long)]
    defaults: bool,

    /// Print a summary of each series
    #[arg(long)]
    console: bool,

    /// Export each series to <export-dir>/<TICKER>_stock_data.csv
    #[arg(long)]
    csv: bool,

    /// Directory for CSV exports (implies --csv)
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Export to this exact file (implies --csv, single ticker only)
    #[arg(long, conflicts_with = "export_dir")]
    export_file: Option<PathBuf>,

    /// Upsert rows into the SQLite store
    #[arg(long)]
    db: bool,
}

impl FetchArgs {
    fn wants_csv(&self) -> bool {
        self.csv || self.export_dir.is_some() || self.export_file.is_some()
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_logging("tick_stocks=info");

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    match cli.command {
        Command::Fetch(args) => run_fetch(args, &config).await,
        Command::Show { ticker } => show_records(&ticker, &config).await,
        Command::Tickers => list_tickers(&config).await,
    }
}

async fn open_database(config: &Config) -> Result<DatabaseManagerSqlx> {
    DatabaseManagerSqlx::new(&config.database_path).await.map_err(|e| {
        error!("Failed to initialize database: {}", e);
        anyhow!(e).context(format!("Cannot open store at {}", config.database_path))
    })
}

/// Open the store for reading; a missing file is an error, never created
async fn open_existing_database(config: &Config) -> Result<DatabaseManagerSqlx> {
    DatabaseManagerSqlx::open_existing(&config.database_path).await.map_err(|e| {
        error!("Failed to open database: {}", e);
        anyhow!(e).context(format!("No store at {} (check DATABASE_PATH)", config.database_path))
    })
}

fn csv_sink(args: &FetchArgs, config: &Config) -> CsvExportSink {
    match (&args.export_file, &args.export_dir) {
        (Some(file), _) => CsvExportSink::to_file(file),
        (None, Some(dir)) => CsvExportSink::in_directory(dir),
        (None, None) => CsvExportSink::in_directory(&config.export_dir),
    }
}

async fn run_fetch(args: FetchArgs, config: &Config) -> Result<()> {
    let period = args.period.clone().unwrap_or_else(|| config.default_period.clone());
    let interactive = args.tickers.is_empty() && !args.defaults && io::stdin().is_terminal();

    let tickers = if !args.tickers.is_empty() {
        args.tickers.clone()
    } else if interactive {
        Vec::new()
    } else {
        config.default_tickers.clone()
    };

    if args.export_file.is_some() && tickers.len() > 1 {
        return Err(anyhow!("--export-file can only be used with a single ticker"));
    }

    let provider = YahooClient::new(config)?;
    let database = if args.db {
        Some(open_database(config).await?)
    } else {
        None
    };

    let mut sinks: Vec<Box<dyn Sink>> = Vec::new();
    if args.console || interactive || !(args.wants_csv() || args.db) {
        sinks.push(Box::new(ConsoleSink));
    }
    if args.wants_csv() {
        sinks.push(Box::new(csv_sink(&args, config)));
    }
    if let Some(db) = &database {
        sinks.push(Box::new(DatabaseSink::new(db.clone())));
    }

    let pipeline = Pipeline::new(provider, sinks);

    let result = if interactive {
        run_interactive(&pipeline, &args, config).await
    } else {
        let summary = pipeline.run(&tickers, &period).await;
        println!("\n=== Run Summary ===");
        println!("{}", summary);
        Ok(())
    };

    if let Some(db) = database {
        db.close().await;
    }
    result
}

/// Prompt for one ticker and period, then optionally save the result to CSV
async fn run_interactive(pipeline: &Pipeline<YahooClient>, args: &FetchArgs, config: &Config) -> Result<()> {
    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout();

    let raw_ticker = prompt_line(&mut stdin, &mut stdout, "Enter stock ticker (e.g., AAPL, MSFT, GOOGL): ")?;
    let raw_period = match &args.period {
        Some(period) => period.clone(),
        None => {
            let answer = prompt_line(&mut stdin, &mut stdout, "Enter time period (e.g., 1mo, 3mo, 1y): ")?;
            if answer.is_empty() {
                config.default_period.clone()
            } else {
                answer.to_lowercase()
            }
        }
    };

    let request = match resolver::resolve(&raw_ticker, &raw_period) {
        Ok(request) => request,
        Err(e) => {
            println!("❌ {}", e);
            return Ok(());
        }
    };

    let rows = match pipeline.fetch_rows(&request).await {
        Ok(Some(rows)) => rows,
        Ok(None) => {
            println!("No data found for {}. Please check the ticker symbol and try again.", request.ticker);
            return Ok(());
        }
        Err(e) => {
            println!("❌ Failed to fetch data for {}: {}", request.ticker, e);
            return Ok(());
        }
    };

    if let Err(e) = pipeline.write_rows(&request.ticker, &rows).await {
        println!("❌ {}: {}", request.ticker, e);
        return Ok(());
    }

    if !args.wants_csv() && prompt_yes_no(&mut stdin, &mut stdout, "\nSave to CSV? (y/n): ")? {
        match csv_sink(args, config).write(&request.ticker, &rows).await {
            Ok(_) => println!("Data saved successfully!"),
            Err(e) => println!("❌ {}", e),
        }
    }

    Ok(())
}

async fn show_records(ticker: &str, config: &Config) -> Result<()> {
    let database = open_existing_database(config).await?;
    let records = database.get_records_by_ticker(ticker).await;
    database.close().await;
    let records = records?;

    if records.is_empty() {
        println!("No stored records for {}", ticker.trim().to_uppercase());
        return Ok(());
    }

    let fmt_opt = |v: Option<f64>| v.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".to_string());

    println!("Date       |     Open |     High |      Low |    Close |       Volume |    SMA20 |  RSI14");
    println!("-----------|----------|----------|----------|----------|--------------|----------|-------");
    for r in &records {
        println!(
            "{} | {:>8} | {:>8} | {:>8} | {:>8} | {:>12} | {:>8} | {:>6}",
            r.date,
            fmt_opt(r.open),
            fmt_opt(r.high),
            fmt_opt(r.low),
            fmt_opt(r.close),
            r.volume.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string()),
            fmt_opt(r.sma20),
            fmt_opt(r.rsi14)
        );
    }
    info!("Displayed {} records", records.len());
    Ok(())
}

async fn list_tickers(config: &Config) -> Result<()> {
    let database = open_existing_database(config).await?;
    let tickers = database.get_available_tickers().await;
    database.close().await;

    for ticker in tickers? {
        println!("{}", ticker);
    }
    Ok(())
}
