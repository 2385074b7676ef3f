use serde::Serialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{error, info};

use crate::aggregator::Aggregator;
use crate::error::{Error, Result};
use crate::provider::DataProvider;
use crate::types::{AssetRecord, BalanceRequest};

pub const DEFAULT_DATE: &str = "31/12/2022";
pub const DEFAULT_TIME: &str = "23:59:59";
pub const DEFAULT_OUTPUT: &str = "retrieved-data.csv";

pub const OUTPUT_HEADERS: [&str; 10] = [
    "Address",
    "Chain",
    "Token Name",
    "Token Symbol",
    "Token Address",
    "Balance",
    "Block Number",
    "Token Checker",
    "Usd Rate",
    "Usd Value",
];

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub date: String,
    pub time: String,
    /// Abort the run on the first failing row instead of recording it.
    pub fail_fast: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            date: DEFAULT_DATE.to_string(),
            time: DEFAULT_TIME.to_string(),
            fail_fast: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowFailure {
    pub line: u64,
    pub address: String,
    pub chain: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub rows: usize,
    pub records: usize,
    pub failures: Vec<RowFailure>,
}

impl BatchSummary {
    pub fn succeeded(&self) -> usize {
        self.rows - self.failures.len()
    }
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    address: &'a str,
    chain: &'a str,
    token_name: &'a str,
    token_symbol: &'a str,
    token_address: &'a str,
    balance: &'a str,
    block_number: u64,
    token_checker: &'a str,
    usd_rate: Option<f64>,
    usd_value: Option<f64>,
}

impl<'a> From<&'a AssetRecord> for CsvRow<'a> {
    fn from(record: &'a AssetRecord) -> Self {
        Self {
            address: &record.account_address,
            chain: record.chain.id(),
            token_name: &record.asset_name,
            token_symbol: &record.asset_symbol,
            token_address: &record.contract_address,
            balance: &record.balance_exact,
            block_number: record.block_number,
            token_checker: &record.checker_url,
            usd_rate: record.usd_price,
            usd_value: record.usd_value,
        }
    }
}

/// Read `address,chain` rows (no header) from `input` and write one CSV row
/// per asset to `output`.
///
/// A row that fails is recorded in the summary and the run moves on, unless
/// `options.fail_fast` is set.
pub async fn run_batch<P, R, W>(
    aggregator: &Aggregator<P>,
    input: R,
    output: W,
    options: &BatchOptions,
) -> Result<BatchSummary>
where
    P: DataProvider,
    R: Read,
    W: Write,
{
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(output);
    wtr.write_record(OUTPUT_HEADERS)?;

    let mut summary = BatchSummary::default();

    for (index, result) in rdr.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) if options.fail_fast => return Err(e.into()),
            Err(e) => {
                let line = e
                    .position()
                    .map(|p| p.line())
                    .unwrap_or(index as u64 + 1);
                error!("Row {} could not be read: {}", line, e);
                summary.rows += 1;
                summary.failures.push(RowFailure {
                    line,
                    address: String::new(),
                    chain: String::new(),
                    error: Error::from(e).to_string(),
                });
                continue;
            }
        };
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(index as u64 + 1);
        let address = record.get(0).unwrap_or_default().to_string();
        let chain = record.get(1).unwrap_or_default().to_string();
        summary.rows += 1;

        let outcome = if chain.is_empty() {
            Err(Error::InvalidRequest(
                "expected two columns: address, chain".to_string(),
            ))
        } else {
            let request = BalanceRequest {
                address: address.clone(),
                chain: chain.clone(),
                date: options.date.clone(),
                timestamp: options.time.clone(),
            };
            aggregator.report(&request).await
        };

        match outcome {
            Ok(records) => {
                for asset in &records {
                    wtr.serialize(CsvRow::from(asset))?;
                }
                summary.records += records.len();
            }
            Err(e) if options.fail_fast => return Err(e),
            Err(e) => {
                error!("Row {} ({} on {}) failed: {}", line, address, chain, e);
                summary.failures.push(RowFailure {
                    line,
                    address,
                    chain,
                    error: e.to_string(),
                });
            }
        }
    }

    wtr.flush()?;
    info!(
        "Batch complete: {} rows, {} records, {} failures",
        summary.rows,
        summary.records,
        summary.failures.len()
    );

    Ok(summary)
}

/// [`run_batch`] over files on disk
pub async fn run_batch_file<P: DataProvider>(
    aggregator: &Aggregator<P>,
    input: &Path,
    output: &Path,
    options: &BatchOptions,
) -> Result<BatchSummary> {
    let input = File::open(input)?;
    let output = File::create(output)?;

    run_batch(aggregator, input, output, options).await
}
