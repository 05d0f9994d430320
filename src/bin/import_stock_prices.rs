// src/bin/import_stock_prices.rs

use std::env;
use std::fs::File;
use std::io;

use chrono::NaiveDate;
use sea_orm::Database;

use stock_prices_backend::config::ENV_DATABASE_URL;
use stock_prices_backend::models::stock::StockRecord;
use stock_prices_backend::services::ingestion;
use stock_prices_backend::services::stock_store::{SeaOrmStockStore, StockStore};

/// Expected header of a daily history export
const EXPECTED_HEADER: [&str; 7] = ["Date", "Open", "High", "Low", "Close", "Adj Close", "Volume"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Usage: cargo run --bin import_stock_prices -- AAPL.csv [--skip-existing]
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <prices.csv> [--skip-existing]", args[0]);
        std::process::exit(1);
    }

    let file_path = &args[1];
    let skip_existing = args.iter().skip(2).any(|a| a == "--skip-existing");
    let database_url =
        env::var(ENV_DATABASE_URL).map_err(|_| format!("{} must be set", ENV_DATABASE_URL))?;

    let db = Database::connect(&database_url).await?;
    let store = SeaOrmStockStore::new(&db);

    println!("Parsing {}...", file_path);
    let parsed = parse_csv_file(file_path)?;
    println!(
        "Found {} rows ({} skipped as incomplete)",
        parsed.records.len(),
        parsed.incomplete
    );

    let mut records = parsed.records;
    if skip_existing {
        let before = records.len();
        let mut fresh = Vec::with_capacity(before);
        for record in records {
            if !store.exists_by_date(record.date).await? {
                fresh.push(record);
            }
        }
        println!("   Skipping {} dates already in the database", before - fresh.len());
        records = fresh;
    }

    println!("Importing to database...");
    let summary = ingestion::ingest(&store, &records).await?;

    println!("\nImport complete!");
    println!("   Imported: {}", summary.created_count);
    if summary.skipped_count > 0 {
        println!("   Skipped (storage conflicts): {}", summary.skipped_count);
    }
    println!("   Total rows: {}", summary.total_count);

    Ok(())
}

#[derive(Debug)]
struct ParsedFile {
    records: Vec<StockRecord>,
    incomplete: usize,
}

fn parse_csv_file(path: &str) -> Result<ParsedFile, Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    parse_csv(file)
}

fn parse_csv<R: io::Read>(input: R) -> Result<ParsedFile, Box<dyn std::error::Error>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader.headers()?;
    if headers.iter().ne(EXPECTED_HEADER) {
        return Err(format!("unexpected header: {:?}", headers).into());
    }

    let mut records = Vec::new();
    let mut incomplete = 0;

    for (idx, result) in reader.records().enumerate() {
        let row = result?;
        // header is line 1
        let line_no = row.position().map_or(idx as u64 + 2, |p| p.line());
        let field = |i: usize| row.get(i).unwrap_or_default();

        if row.iter().any(|f| f.eq_ignore_ascii_case("null") || f.is_empty()) {
            incomplete += 1;
            continue;
        }

        let price = |i: usize| -> Result<f64, String> {
            field(i)
                .parse::<f64>()
                .map_err(|e| format!("line {}: bad {} {:?}: {}", line_no, EXPECTED_HEADER[i], field(i), e))
        };

        records.push(StockRecord {
            date: NaiveDate::parse_from_str(field(0), "%Y-%m-%d")
                .map_err(|e| format!("line {}: bad date {:?}: {}", line_no, field(0), e))?,
            open: price(1)?,
            high: price(2)?,
            low: price(3)?,
            close: price(4)?,
            adj_close: price(5)?,
            volume: field(6)
                .parse::<i64>()
                .map_err(|e| format!("line {}: bad volume {:?}: {}", line_no, field(6), e))?,
        });
    }

    Ok(ParsedFile {
        records,
        incomplete,
    })
}
