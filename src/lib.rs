//! # Transaction Summary
//!
//! Reads a CSV of dated transactions, groups them by calendar month and
//! computes totals and credit/debit averages, globally and per month.
//! Parsed transactions can be stored in SQLite and the summary rendered as
//! an HTML email.
//!
//! ## Design Principles
//!
//! - **Exact arithmetic**: amounts are `rust_decimal` values, rounded to 2
//!   places only when displayed
//! - **Lenient rows, strict structure**: unparseable rows are skipped, an
//!   unreadable or non-CSV input aborts the run
//! - **Deterministic output**: periods are reported in ascending `YYYY-MM` order
//! - **Narrow seams**: input, persistence and mail delivery sit behind the
//!   [`RecordSource`], [`TransactionSink`] and [`Mailer`] traits
//!
//! ## Example
//!
//! ```
//! use std::io::Cursor;
//! use txn_summary::{aggregate_in_year, read_records};
//!
//! let csv = "Id,Date,Transaction\n0,7/15,+60.5\n1,7/28,-10.3\n";
//! let records = read_records(Cursor::new(csv)).unwrap();
//! let result = aggregate_in_year(&records, 2024);
//! assert_eq!(result.total_balance.to_string(), "50.20");
//! assert_eq!(result.summary_by_period["2024-07"].transaction_count, 2);
//! ```

pub mod amount;
pub mod config;
pub mod email;
pub mod engine;
pub mod error;
pub mod record;
pub mod store;
pub mod summary;
pub mod transaction;

pub use amount::Amount;
pub use config::{Config, MailConfig};
pub use email::{render_html, write_html, EmailData, EmailMessage, Mailer, OutboxMailer};
pub use engine::{aggregate, aggregate_in_year, ProcessedBatch, TransactionProcessor};
pub use error::{Result, SummaryError};
pub use record::{read_records, CsvFileSource, RawRecord, RecordSource};
pub use store::{SqliteStore, StoredTransaction, TransactionSink};
pub use summary::{AggregateResult, PeriodSummary};
pub use transaction::ParsedTransaction;
