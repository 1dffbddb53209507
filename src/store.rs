//! SQLite persistence of individual transactions.

use crate::amount::Amount;
use crate::error::{Result, SummaryError};
use crate::transaction::ParsedTransaction;
use log::debug;
use rusqlite::{params, Connection};
use std::path::Path;
use std::str::FromStr;

const CREATE_TRANSACTIONS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS transactions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        amount TEXT NOT NULL
    )";

const INSERT_TRANSACTION: &str = "INSERT INTO transactions (date, amount) VALUES (?1, ?2)";

/// Receives each successfully parsed transaction of a run.
pub trait TransactionSink {
    fn save(&mut self, tx: &ParsedTransaction) -> Result<()>;

    /// Saves a batch, in order.
    fn save_all(&mut self, transactions: &[ParsedTransaction]) -> Result<()> {
        for tx in transactions {
            self.save(tx)?;
        }
        Ok(())
    }
}

/// A transaction as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredTransaction {
    pub id: i64,

    /// `YYYY-MM-DD`
    pub date: String,

    pub amount: Amount,
}

/// Transactions table in a SQLite database.
///
/// Amounts are stored as decimal text so they read back exactly.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path` and ensures the table exists.
    pub fn open(path: &Path) -> Result<Self> {
        debug!("Opening transaction store at {}", path.display());
        Self::init(Connection::open(path)?)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(CREATE_TRANSACTIONS_TABLE, [])?;
        Ok(SqliteStore { conn })
    }

    /// Returns every stored transaction in insertion order.
    pub fn all_transactions(&self) -> Result<Vec<StoredTransaction>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, date, amount FROM transactions ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (id, date, value) = row?;
            let amount = Amount::from_str(&value)
                .map_err(|_| SummaryError::InvalidStoredAmount { id, value })?;
            out.push(StoredTransaction { id, date, amount });
        }
        Ok(out)
    }

    /// Number of stored transactions.
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(count.max(0) as usize)
    }
}

impl TransactionSink for SqliteStore {
    fn save(&mut self, tx: &ParsedTransaction) -> Result<()> {
        self.conn.execute(
            INSERT_TRANSACTION,
            params![tx.date_key(), tx.amount.value().to_string()],
        )?;
        Ok(())
    }

    /// Saves the batch inside one SQL transaction; nothing is written if any insert fails.
    fn save_all(&mut self, transactions: &[ParsedTransaction]) -> Result<()> {
        let db_tx = self.conn.transaction()?;
        {
            let mut stmt = db_tx.prepare(INSERT_TRANSACTION)?;
            for tx in transactions {
                stmt.execute(params![tx.date_key(), tx.amount.value().to_string()])?;
            }
        }
        db_tx.commit()?;

        debug!("Stored {} transactions", transactions.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tx(y: i32, m: u32, d: u32, amount: &str) -> ParsedTransaction {
        ParsedTransaction {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            amount: Amount::from_str(amount).unwrap(),
        }
    }

    #[test]
    fn test_creates_table() {
        let store = SqliteStore::open_in_memory().unwrap();
        let name: String = store
            .conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type='table' AND name='transactions'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(name, "transactions");
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_save_and_read_back() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.save(&tx(2024, 6, 14, "100.50")).unwrap();

        let stored = store.all_transactions().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].date, "2024-06-14");
        assert_eq!(stored[0].amount, Amount::from_str("100.5").unwrap());
    }

    #[test]
    fn test_save_all_keeps_order_and_precision() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let batch = vec![
            tx(2024, 7, 15, "+60.5"),
            tx(2024, 7, 28, "-10.3"),
            tx(2024, 8, 13, "0.0001"),
        ];
        store.save_all(&batch).unwrap();

        let stored = store.all_transactions().unwrap();
        let dates: Vec<&str> = stored.iter().map(|s| s.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-07-15", "2024-07-28", "2024-08-13"]);
        assert_eq!(stored[2].amount.value().to_string(), "0.0001");
        assert_eq!(stored[1].amount, batch[1].amount);
    }

    #[test]
    fn test_reopen_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transactions.db");

        SqliteStore::open(&path)
            .unwrap()
            .save_all(&[tx(2024, 1, 1, "1")])
            .unwrap();
        let mut store = SqliteStore::open(&path).unwrap();
        store.save(&tx(2024, 1, 2, "2")).unwrap();

        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_invalid_stored_amount() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .conn
            .execute(
                "INSERT INTO transactions (date, amount) VALUES ('2024-01-01', 'oops')",
                [],
            )
            .unwrap();

        match store.all_transactions().unwrap_err() {
            SummaryError::InvalidStoredAmount { value, .. } => assert_eq!(value, "oops"),
            other => panic!("Expected InvalidStoredAmount, got {:?}", other),
        }
    }
}
