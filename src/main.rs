//! Transaction Summary CLI
//!
//! Summarizes a CSV of transactions, stores each parsed transaction in
//! SQLite, queues an HTML summary email and prints the per-month report.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- txns.csv > summary.csv
//! ```
//!
//! # Environment Variables
//!
//! Read from the process environment and an optional `.env` file:
//!
//! - `SUMMARY_DB_PATH`: SQLite database file (default `transactions.db`)
//! - `SUMMARY_OUTBOX_DIR`: pickup directory for the email (default `outbox`)
//! - `FROM_EMAIL`, `TO_EMAIL`, `SUMMARY_SUBJECT`: email addressing
//! - `RUST_LOG`: Set to `debug` or `info` to control logging verbosity

use log::info;
use std::env;
use std::io;
use std::path::Path;
use std::process;
use txn_summary::{
    Config, CsvFileSource, EmailMessage, Mailer, OutboxMailer, Result, SqliteStore, SummaryError,
    TransactionProcessor, TransactionSink,
};

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(SummaryError::MissingArgument);
    }
    let input_path = Path::new(&args[1]);

    if let Ok(path) = dotenvy::dotenv() {
        info!("Loaded environment from {}", path.display());
    }
    let config = Config::from_env()?;

    let processor = TransactionProcessor::new(CsvFileSource);
    let batch = processor.process(input_path)?;
    info!(
        "Processed {} transactions in {} periods; total balance {}",
        batch.transactions.len(),
        batch.result.summary_by_period.len(),
        batch.result.total_balance
    );

    let mut store = SqliteStore::open(&config.database_path)?;
    store.save_all(&batch.transactions)?;

    let mailer = OutboxMailer::new(&config.mail.outbox_dir);
    mailer.send(&EmailMessage::summary(&config.mail, &batch.result)?)?;

    let stdout = io::stdout();
    let handle = stdout.lock();
    batch.result.write_csv(handle)?;

    Ok(())
}
