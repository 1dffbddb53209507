//! Aggregation results: global totals and per-period summaries.

use crate::amount::Amount;
use crate::error::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

/// Running sum and count of one class of amounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Tally {
    pub total: Amount,
    pub count: usize,
}

impl Tally {
    /// Adds `amount`, leaving the tally untouched and returning `false` if the total would overflow.
    pub fn record(&mut self, amount: Amount) -> bool {
        match self.total.checked_add(amount) {
            Some(total) => {
                self.total = total;
                self.count += 1;
                true
            }
            None => false,
        }
    }

    pub fn mean(&self) -> Amount {
        Amount::mean(self.total, self.count)
    }
}

/// Credits and debits of a group of amounts, tallied separately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct SignedTally {
    pub credits: Tally,
    pub debits: Tally,
}

impl SignedTally {
    /// Adds an amount to the credit side if strictly positive, to the debit side otherwise.
    ///
    /// Returns `false` without recording anything if that side's total would overflow.
    pub fn record(&mut self, amount: Amount) -> bool {
        if amount.is_credit() {
            self.credits.record(amount)
        } else {
            self.debits.record(amount)
        }
    }

    pub fn count(&self) -> usize {
        self.credits.count + self.debits.count
    }

    /// Credits are never negative and debits never positive, so this cannot overflow.
    pub fn balance(&self) -> Amount {
        self.credits.total + self.debits.total
    }
}

/// Statistics for one `YYYY-MM` period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PeriodSummary {
    /// Number of transactions in the period, credits and debits alike.
    pub transaction_count: usize,

    /// Mean of the period's positive amounts, zero if there are none.
    pub average_credit: Amount,

    /// Mean of the period's zero or negative amounts, zero if there are none.
    /// Keeps its sign.
    pub average_debit: Amount,
}

impl PeriodSummary {
    pub(crate) fn from_tally(tally: &SignedTally) -> Self {
        PeriodSummary {
            transaction_count: tally.count(),
            average_credit: tally.credits.mean(),
            average_debit: tally.debits.mean(),
        }
    }
}

/// The complete output of one aggregation run.
///
/// # Ordering
///
/// Periods are kept in a `BTreeMap`, so every iteration (CSV report, email)
/// is in ascending `YYYY-MM` order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AggregateResult {
    /// Signed sum of every parsed amount.
    pub total_balance: Amount,

    /// Mean of all positive amounts across all periods.
    pub average_credit: Amount,

    /// Mean of all zero or negative amounts across all periods.
    pub average_debit: Amount,

    /// Per-period statistics keyed by `YYYY-MM`.
    pub summary_by_period: BTreeMap<String, PeriodSummary>,
}

#[derive(Serialize)]
struct PeriodRow<'a> {
    period: &'a str,
    transactions: usize,
    average_credit: Amount,
    average_debit: Amount,
}

impl AggregateResult {
    /// Total number of transactions across every period.
    pub fn transaction_count(&self) -> usize {
        self.summary_by_period
            .values()
            .map(|s| s.transaction_count)
            .sum()
    }

    /// Writes the per-period summary as CSV.
    ///
    /// One row per period in ascending order; amounts have 2 decimal places.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        for (period, summary) in &self.summary_by_period {
            csv_writer.serialize(PeriodRow {
                period,
                transactions: summary.transaction_count,
                average_credit: summary.average_credit,
                average_debit: summary.average_debit,
            })?;
        }

        if self.summary_by_period.is_empty() {
            csv_writer.write_record(["period", "transactions", "average_credit", "average_debit"])?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}
