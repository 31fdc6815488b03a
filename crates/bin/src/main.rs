//! Hobart CLI binary.
//!
//! Provides command-line interface for the Hobart filing and factor
//! pipelines.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use hobart::load_returns;
use hobart::universe::{DollarVolumeScreen, Sector, SectorMap};
use hobart_data::bundle::EquityBundle;
use hobart_data::edgar::{EdgarClient, EdgarConfig, FilingQuery, FilingReader, TickerTable};
use hobart_model::{ModelConfig, RiskModel};
use hobart_output::{FilingPreview, SeriesChart, cumulative, frame_preview, to_ascii_table};
use hobart_text::{Normalizer, cosine_similarity, jaccard_similarity};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "hobart")]
#[command(about = "Hobart: factor models over SEC filings and price data", long_about = None)]
#[command(version)]
struct Cli {
    /// Default the log filter to debug instead of warn
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download filings and normalize their text
    Filings {
        /// Ticker/CIK table CSV path
        #[arg(long)]
        tickers: PathBuf,

        /// Form type to pull
        #[arg(long, default_value = "10-K")]
        form: String,

        /// Keep filings dated at or before this date (YYYY-MM-DD)
        #[arg(long)]
        cutoff: NaiveDate,

        /// Keep filings dated strictly after this date
        #[arg(long)]
        start_date: Option<NaiveDate>,

        /// Leading tokens shown per filing preview
        #[arg(long, default_value = "8")]
        preview_tokens: usize,
    },

    /// Fit a statistical factor model over a price bundle
    Factors {
        /// Directory of per-symbol OHLCV CSV files
        #[arg(long)]
        bundle: PathBuf,

        /// First session of the returns window (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,

        /// Last session of the returns window (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,

        /// Number of factors to retain
        #[arg(long)]
        components: usize,

        /// Universe size kept by the dollar volume screen
        #[arg(long, default_value = "500")]
        top_n: usize,

        /// Trailing sessions averaged by the dollar volume screen
        #[arg(long, default_value = "120")]
        window: usize,

        /// Portfolio weights CSV (symbol,weight) for factor exposures
        #[arg(long)]
        weights: Option<PathBuf>,

        /// Sector classification CSV (symbol,sector_code)
        #[arg(long)]
        sectors: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    match cli.command {
        Commands::Filings {
            tickers,
            form,
            cutoff,
            start_date,
            preview_tokens,
        } => {
            run_filings(&tickers, &form, cutoff, start_date, preview_tokens).await?;
        }
        Commands::Factors {
            bundle,
            start,
            end,
            components,
            top_n,
            window,
            weights,
            sectors,
        } => {
            run_factors(
                &bundle,
                start,
                end,
                components,
                top_n,
                window,
                weights.as_deref(),
                sectors.as_deref(),
            )?;
        }
    }

    Ok(())
}

async fn run_filings(
    tickers: &Path,
    form: &str,
    cutoff: NaiveDate,
    start_date: Option<NaiveDate>,
    preview_tokens: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║{:^62}║", format!("FILING INGESTION: {}", form.to_uppercase()));
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("Form: {}", form);
    println!("Cutoff: {}", cutoff);
    if let Some(start) = start_date {
        println!("Window start: {} (exclusive)", start);
    }

    let config = load_edgar_config();
    println!();

    print!("Loading ticker table...");
    std::io::Write::flush(&mut std::io::stdout())?;
    let table = match TickerTable::from_csv_path(tickers) {
        Ok(t) => {
            println!(" ✓ ({} tickers)", t.len());
            t
        }
        Err(e) => {
            println!(" ✗");
            return Err(format!("Failed to load ticker table: {}", e).into());
        }
    };

    let reader = FilingReader::new(EdgarClient::from_config(&config)?, table, Normalizer::new()?);

    let mut query = FilingQuery::new(form, cutoff);
    if let Some(start) = start_date {
        query = query.since(start);
    }

    // Progress over tickers; the downloads are the slow step
    let pb = ProgressBar::new(reader.table().len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("valid template")
            .progress_chars("█▓░"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    let by_ticker = reader
        .all_filings(&query, |ticker| {
            pb.set_message(format!("Pulling {}...", ticker));
            pb.inc(1);
        })
        .await;
    pb.finish_with_message(format!("Pulled {} tickers", by_ticker.len()));

    for (ticker, filings) in &by_ticker {
        println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!("{}", ticker);
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

        if filings.is_empty() {
            println!("  No {} filings in the window.", form);
            continue;
        }

        for (date, docs) in filings {
            let preview = FilingPreview::from_documents(*date, docs, preview_tokens);
            println!("{}", preview.render());
        }

        // Year-over-year similarity between consecutive filings, first
        // matching sub-document of each
        let with_docs: Vec<(NaiveDate, &Vec<String>)> = filings
            .iter()
            .filter_map(|(date, docs)| docs.first().map(|d| (*date, d)))
            .collect();

        if with_docs.len() >= 2 {
            let mut dates = Vec::new();
            let mut jaccard = Vec::new();
            let mut cosine = Vec::new();
            for pair in with_docs.windows(2) {
                dates.push(pair[1].0);
                jaccard.push(jaccard_similarity(pair[0].1, pair[1].1));
                cosine.push(cosine_similarity(pair[0].1, pair[1].1));
            }

            let mut chart = SeriesChart::new(format!("Filing similarity: {}", ticker));
            chart.add_series("jaccard", dates.clone(), jaccard);
            chart.add_series("cosine", dates, cosine);
            println!("{}", chart.render(60, 12)?);
        }
    }

    let total_filings: usize = by_ticker.values().map(BTreeMap::len).sum();
    println!("\n════════════════════════════════════════════════════════════════");
    println!("  Tickers:  {}", by_ticker.len());
    println!("  Filings:  {}", total_filings);
    println!("════════════════════════════════════════════════════════════════\n");

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_factors(
    bundle_dir: &Path,
    start: NaiveDate,
    end: NaiveDate,
    components: usize,
    top_n: usize,
    window: usize,
    weights: Option<&Path>,
    sectors: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║{:^62}║", format!("FACTOR MODEL: {} COMPONENTS", components));
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("Window: {} to {}", start, end);
    println!(
        "Screen: top {} by {}-session average dollar volume",
        top_n, window
    );
    println!();

    print!("Loading price bundle...");
    std::io::Write::flush(&mut std::io::stdout())?;
    let bundle = match EquityBundle::load(bundle_dir) {
        Ok(b) => {
            println!(" ✓ ({} symbols)", b.len());
            b
        }
        Err(e) => {
            println!(" ✗");
            return Err(format!("Failed to load bundle: {}", e).into());
        }
    };

    print!("Loading returns...");
    std::io::Write::flush(&mut std::io::stdout())?;
    let screen = DollarVolumeScreen::new(window, top_n);
    let panel = match load_returns(&bundle, &screen, start, end) {
        Ok(p) => {
            println!(" ✓ ({} sessions × {} securities)", p.n_dates(), p.n_securities());
            p
        }
        Err(e) => {
            println!(" ✗");
            return Err(format!("Failed to load returns: {}", e).into());
        }
    };

    print!("Fitting {} components...", components);
    std::io::Write::flush(&mut std::io::stdout())?;
    let mut model = RiskModel::new(ModelConfig::new(components));
    match model.fit(&panel) {
        Ok(()) => println!(" ✓"),
        Err(e) => {
            println!(" ✗");
            return Err(format!("Fit failed: {}", e).into());
        }
    }

    let ratios = model
        .explained_variance_ratio()
        .ok_or("model produced no artifacts")?;

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("EXPLAINED VARIANCE");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

    let headers = vec!["factor".to_string(), "explained_variance_ratio".to_string()];
    let rows: Vec<Vec<String>> = ratios
        .iter()
        .enumerate()
        .map(|(i, ratio)| vec![(i + 1).to_string(), format!("{:.4}", ratio)])
        .collect();
    println!("{}", to_ascii_table(&headers, &rows));
    println!("\n  Total explained: {:.1}%", ratios.sum() * 100.0);

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("FACTOR BETAS");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

    let betas = model.betas_frame()?;
    println!("{}", frame_preview(&betas, 8)?);

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("CUMULATIVE FACTOR RETURNS");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

    let factor_returns = model.factor_returns().ok_or("model produced no artifacts")?;
    let dates = model
        .dates()
        .ok_or("model produced no artifacts")?
        .to_vec();

    let mut chart = SeriesChart::new("Cumulative factor returns");
    for j in 0..components {
        let series = factor_returns.column(j).to_vec();
        chart.add_series(format!("F{}", j + 1), dates.clone(), cumulative(&series));
    }
    println!("{}", chart.render(60, 14)?);

    if let Some(weights_path) = weights {
        println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!("PORTFOLIO FACTOR EXPOSURES");
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

        let portfolio = read_weights(weights_path)?;
        println!("  Positions: {}", portfolio.len());

        let exposures = model.factor_exposures(&portfolio)?;
        for (i, value) in exposures.iter().enumerate() {
            println!("  {:<6} {:>12.6}", format!("F{}", i + 1), value);
        }
    }

    if let Some(sectors_path) = sectors {
        println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!("UNIVERSE SECTOR BREAKDOWN");
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

        let map = SectorMap::from_csv_path(sectors_path)?;
        let securities = model.securities().ok_or("model produced no artifacts")?;

        let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
        for symbol in securities {
            *counts.entry(map.code_for(symbol)).or_insert(0) += 1;
        }

        let headers = vec!["sector".to_string(), "securities".to_string()];
        let rows: Vec<Vec<String>> = counts
            .iter()
            .map(|(code, count)| {
                let name = Sector::from_code(*code)
                    .map_or_else(|| "Unclassified".to_string(), |s| s.name().to_string());
                vec![name, count.to_string()]
            })
            .collect();
        println!("{}", to_ascii_table(&headers, &rows));
    }

    println!("\n════════════════════════════════════════════════════════════════\n");

    Ok(())
}

#[derive(Debug, Deserialize)]
struct WeightRow {
    symbol: String,
    weight: f64,
}

fn read_weights(path: &Path) -> Result<Vec<(String, f64)>, Box<dyn std::error::Error>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut weights = Vec::new();
    for row in reader.deserialize() {
        let row: WeightRow = row?;
        weights.push((row.symbol.to_uppercase(), row.weight));
    }
    Ok(weights)
}

/// Read `$CONFIG_DIR/hobart/config.json` if present, else defaults.
fn load_edgar_config() -> EdgarConfig {
    let Some(path) = dirs::config_dir().map(|dir| dir.join("hobart/config.json")) else {
        return EdgarConfig::default();
    };
    match std::fs::read_to_string(&path) {
        Ok(body) => match serde_json::from_str(&body) {
            Ok(config) => {
                println!("  Config: {}", path.display());
                config
            }
            Err(e) => {
                eprintln!("Warning: Ignoring malformed config {}: {}", path.display(), e);
                EdgarConfig::default()
            }
        },
        Err(_) => EdgarConfig::default(),
    }
}
