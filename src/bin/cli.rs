use anyhow::Result;
use clap::{Parser, Subcommand};
use proof_of_balance::{
    BalanceRequest, BatchOptions, ChainRegistry, Settings, DEFAULT_DATE, DEFAULT_OUTPUT,
    DEFAULT_TIME,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "proof-of-balance")]
#[command(about = "Historical wallet balances and USD values across EVM chains", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve POST /balances over HTTP
    Serve {
        #[arg(short, long, env = "PORT", default_value_t = 8000)]
        port: u16,
    },

    /// Read address,chain rows from a CSV file and write one row per asset
    Batch {
        /// Input CSV with the wallet address in column A and the chain in column B
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,

        /// Date as dd/mm/yyyy or yyyy-mm-dd (UTC)
        #[arg(short, long, default_value = DEFAULT_DATE)]
        date: String,

        /// Time as HH:MM:SS or HH:MM (UTC)
        #[arg(short, long, default_value = DEFAULT_TIME)]
        time: String,

        /// Stop at the first failing row
        #[arg(long)]
        fail_fast: bool,
    },

    /// Query balances for a single address
    Query {
        /// The wallet address to query
        #[arg(short, long)]
        address: String,

        /// Chain to query (eth, matic, bnb, ...)
        #[arg(short, long, default_value = "eth")]
        chain: String,

        #[arg(short, long, default_value = DEFAULT_DATE)]
        date: String,

        #[arg(short, long, default_value = DEFAULT_TIME)]
        time: String,

        /// Print the JSON report instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Resolve the block number at a point in time
    Block {
        #[arg(short, long)]
        chain: String,

        #[arg(short, long, default_value = DEFAULT_DATE)]
        date: String,

        #[arg(short, long, default_value = DEFAULT_TIME)]
        time: String,
    },

    /// List supported chains and their aliases
    Chains,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if let Err(e) = run(args.command).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(command: Command) -> Result<()> {
    if let Command::Chains = command {
        print_chains(&ChainRegistry::load()?);
        return Ok(());
    }

    let settings = Settings::from_env()?;
    let aggregator = proof_of_balance::connect(&settings)?;

    match command {
        Command::Serve { port } => {
            proof_of_balance::serve(Arc::new(aggregator), port).await?;
        }
        Command::Batch {
            input,
            output,
            date,
            time,
            fail_fast,
        } => {
            let options = BatchOptions {
                date,
                time,
                fail_fast,
            };
            let summary =
                proof_of_balance::run_batch_file(&aggregator, &input, &output, &options).await?;

            println!(
                "Processed {} addresses: {} succeeded, {} failed. {} rows written to {}",
                summary.rows,
                summary.succeeded(),
                summary.failures.len(),
                summary.records,
                output.display()
            );
            for failure in &summary.failures {
                eprintln!(
                    "  line {}: {} on {}: {}",
                    failure.line, failure.address, failure.chain, failure.error
                );
            }
            if !summary.failures.is_empty() {
                std::process::exit(1);
            }
        }
        Command::Query {
            address,
            chain,
            date,
            time,
            json,
        } => {
            let request = BalanceRequest {
                address,
                chain,
                date,
                timestamp: time,
            };
            let records = aggregator.report(&request).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
                return Ok(());
            }

            println!("Address: {}", request.address);
            if let Some(first) = records.first() {
                println!("Chain: {} at block {}", first.chain, first.block_number);
            }
            println!("{}", "=".repeat(72));
            for record in &records {
                let usd = record
                    .usd_value
                    .map(|v| format!("${:.2}", v))
                    .unwrap_or_default();
                let spam = if record.possible_spam { " (possible spam)" } else { "" };
                println!(
                    "{:8} | {:>28} | {:>14}{}",
                    record.asset_symbol, record.balance_exact, usd, spam
                );
            }
            println!("{}", "=".repeat(72));
        }
        Command::Block { chain, date, time } => {
            let chain = aggregator.registry().resolve(&chain)?.id;
            let block =
                proof_of_balance::resolve_block(aggregator.provider(), chain, &date, &time).await?;
            println!("{}", block);
        }
        Command::Chains => {}
    }

    Ok(())
}

fn print_chains(registry: &ChainRegistry) {
    for chain in registry.chains() {
        println!(
            "{:10} {:20} {:6} {}",
            chain.id.id(),
            chain.name,
            chain.native_token.symbol,
            chain.aliases.join(", ")
        );
    }
}
