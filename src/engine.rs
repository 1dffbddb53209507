//! Core aggregation engine.
//!
//! Turns raw records into an [`AggregateResult`]: rows are parsed into dated
//! amounts, grouped into `YYYY-MM` buckets and tallied into credits and
//! debits, both globally and per bucket. Rows that do not parse are skipped.
//! Nothing in this module performs I/O except [`TransactionProcessor::process`],
//! which delegates reading to its [`RecordSource`].

use crate::amount::Amount;
use crate::error::Result;
use crate::record::{RawRecord, RecordSource};
use crate::summary::{AggregateResult, PeriodSummary, SignedTally};
use crate::transaction::ParsedTransaction;
use chrono::{Datelike, Local};
use log::debug;
use std::collections::BTreeMap;
use std::path::Path;

/// Amounts grouped by `YYYY-MM`, each bucket in input order.
pub type PeriodBuckets = BTreeMap<String, Vec<Amount>>;

/// Aggregates records, resolving dates against the current local year.
///
/// The first record is the header and is ignored.
pub fn aggregate(records: &[RawRecord]) -> AggregateResult {
    aggregate_in_year(records, current_year())
}

/// Aggregates records, resolving dates against `year`.
pub fn aggregate_in_year(records: &[RawRecord], year: i32) -> AggregateResult {
    summarize(&parse_transactions(records, year))
}

/// Parses every data record, skipping the header and any row that does not parse.
pub fn parse_transactions(records: &[RawRecord], year: i32) -> Vec<ParsedTransaction> {
    records
        .iter()
        .enumerate()
        .skip(1)
        .filter_map(|(row_idx, record)| {
            let parsed = ParsedTransaction::from_record(record, year);
            if parsed.is_none() {
                debug!("Row {}: Skipping unparseable record", row_idx + 1);
            }
            parsed
        })
        .collect()
}

/// Groups amounts into period buckets.
pub fn group_by_period(transactions: &[ParsedTransaction]) -> PeriodBuckets {
    let mut buckets = PeriodBuckets::new();
    for tx in transactions {
        buckets.entry(tx.period()).or_default().push(tx.amount);
    }
    buckets
}

/// Computes global totals and per-period summaries of parsed transactions.
///
/// A transaction whose amount would overflow a running total is skipped
/// like an unparseable row.
pub fn summarize(transactions: &[ParsedTransaction]) -> AggregateResult {
    tally(transactions).0
}

/// Aggregates `transactions` and reports which of them were counted.
///
/// Buckets are visited in period order and each bucket in input order. The
/// returned flags are indexed like `transactions`.
fn tally(transactions: &[ParsedTransaction]) -> (AggregateResult, Vec<bool>) {
    let mut buckets: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (idx, tx) in transactions.iter().enumerate() {
        buckets.entry(tx.period()).or_default().push(idx);
    }

    let mut counted = vec![false; transactions.len()];
    let mut overall = SignedTally::default();
    let mut summary_by_period = BTreeMap::new();

    for (period, indices) in buckets {
        let mut bucket = SignedTally::default();
        for idx in indices {
            let amount = transactions[idx].amount;
            let (mut next_overall, mut next_bucket) = (overall, bucket);
            if next_overall.record(amount) && next_bucket.record(amount) {
                overall = next_overall;
                bucket = next_bucket;
                counted[idx] = true;
            } else {
                debug!(
                    "{}: Skipping transaction {}, running total overflows",
                    period,
                    idx + 1
                );
            }
        }
        if bucket.count() > 0 {
            summary_by_period.insert(period, PeriodSummary::from_tally(&bucket));
        }
    }

    let result = AggregateResult {
        total_balance: overall.balance(),
        average_credit: overall.credits.mean(),
        average_debit: overall.debits.mean(),
        summary_by_period,
    };
    (result, counted)
}

fn current_year() -> i32 {
    Local::now().year()
}

/// Parsed transactions together with their aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessedBatch {
    /// Every successfully parsed transaction, in input order.
    pub transactions: Vec<ParsedTransaction>,

    /// Totals and per-period summaries of `transactions`.
    pub result: AggregateResult,
}

/// Reads records from a source and aggregates them.
///
/// The year used to resolve `M/D` dates is fixed when the processor is
/// created. Dates near a year boundary are not disambiguated: `12/31`
/// processed on January 1 lands in the new year.
pub struct TransactionProcessor<S: RecordSource> {
    source: S,
    year: i32,
}

impl<S: RecordSource> TransactionProcessor<S> {
    /// Creates a processor that resolves dates against the current year.
    pub fn new(source: S) -> Self {
        Self::with_year(source, current_year())
    }

    /// Creates a processor that resolves dates against `year`.
    pub fn with_year(source: S, year: i32) -> Self {
        TransactionProcessor { source, year }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Reads `origin` and aggregates it.
    ///
    /// Fails only if the source fails; bad rows are skipped. The returned
    /// transactions are exactly the ones the result counts.
    pub fn process(&self, origin: &Path) -> Result<ProcessedBatch> {
        let records = self.source.read(origin)?;
        let parsed = parse_transactions(&records, self.year);
        let (result, counted) = tally(&parsed);
        let transactions: Vec<ParsedTransaction> = parsed
            .into_iter()
            .zip(counted)
            .filter_map(|(tx, counted)| counted.then_some(tx))
            .collect();

        debug!(
            "Parsed {} of {} data rows from {}",
            transactions.len(),
            records.len().saturating_sub(1),
            origin.display()
        );

        Ok(ProcessedBatch {
            transactions,
            result,
        })
    }
}
