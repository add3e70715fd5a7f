//! Defines the ledger store trait and an implementation backed by one CSV
//! record per user.

use std::{
    collections::HashMap,
    fs, io,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use time::Date;

use crate::{
    Error,
    export::ledger_to_csv,
    transaction::{DATE_FORMAT, Ledger, Transaction},
    user::Username,
};

/// Handles the persistence of per-user transaction ledgers.
pub trait LedgerStore {
    /// The user's transaction sequence, or an empty ledger if no backing
    /// record exists.
    fn load(&self, username: &Username) -> Result<Ledger, Error>;

    /// Append a transaction to the user's ledger, persist the full ledger
    /// and return the updated ledger.
    fn append(&self, username: &Username, transaction: Transaction) -> Result<Ledger, Error>;

    /// Overwrite the user's backing record with the given ledger verbatim.
    fn save(&self, username: &Username, ledger: &Ledger) -> Result<(), Error>;
}

/// A ledger store persisted as one CSV file per user under a data directory.
///
/// Each file carries the fixed four-column schema Date, Type, Category,
/// Amount. Ledgers are logically partitioned by username, so operations by
/// different users never interfere. Appends by the *same* user (e.g. two
/// browser tabs) serialize behind a per-user write lock instead of silently
/// losing the earlier write.
#[derive(Debug)]
pub struct CsvLedgerStore {
    data_dir: PathBuf,
    write_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl CsvLedgerStore {
    /// Create a ledger store that keeps its records under `data_dir`.
    ///
    /// The directory is not created until the first ledger is saved.
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            write_locks: Mutex::new(HashMap::new()),
        }
    }

    fn ledger_path(&self, username: &Username) -> PathBuf {
        self.data_dir.join(format!("{username}.csv"))
    }

    /// Get the write lock guarding `username`'s backing record.
    ///
    /// # Panics
    ///
    /// Panics if the lock table mutex is poisoned.
    fn write_lock_for(&self, username: &Username) -> Arc<Mutex<()>> {
        self.write_locks
            .lock()
            .unwrap()
            .entry(username.to_string())
            .or_default()
            .clone()
    }

    /// Read and parse `username`'s backing record without taking the write
    /// lock.
    ///
    /// A missing file is an empty ledger. An unreadable or corrupt file is
    /// also treated as empty, but logged since it may indicate data loss.
    fn read_ledger(&self, username: &Username) -> Ledger {
        let path = self.ledger_path(username);

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ledger::new(),
            Err(error) => {
                tracing::warn!("treating unreadable ledger record {path:?} as empty: {error}");
                return Ledger::new();
            }
        };

        match parse_ledger(&text) {
            Ok(ledger) => ledger,
            Err(error) => {
                tracing::warn!("treating corrupt ledger record {path:?} as empty: {error}");
                Ledger::new()
            }
        }
    }

    /// Overwrite `username`'s backing record without taking the write lock.
    fn write_ledger(&self, username: &Username, ledger: &Ledger) -> Result<(), Error> {
        fs::create_dir_all(&self.data_dir)
            .map_err(|error| Error::StorageError(error.to_string()))?;

        let text = ledger_to_csv(ledger)?;

        fs::write(self.ledger_path(username), text)
            .map_err(|error| Error::StorageError(error.to_string()))
    }
}

impl LedgerStore for CsvLedgerStore {
    fn load(&self, username: &Username) -> Result<Ledger, Error> {
        Ok(self.read_ledger(username))
    }

    /// # Panics
    ///
    /// Panics if the user's write lock is poisoned.
    fn append(&self, username: &Username, transaction: Transaction) -> Result<Ledger, Error> {
        let lock = self.write_lock_for(username);
        let _guard = lock.lock().unwrap();

        let mut ledger = self.read_ledger(username);
        ledger.push(transaction);
        self.write_ledger(username, &ledger)?;

        Ok(ledger)
    }

    /// # Panics
    ///
    /// Panics if the user's write lock is poisoned.
    fn save(&self, username: &Username, ledger: &Ledger) -> Result<(), Error> {
        let lock = self.write_lock_for(username);
        let _guard = lock.lock().unwrap();

        self.write_ledger(username, ledger)
    }
}

/// Parse the contents of a ledger record.
///
/// Expects the header row followed by one Date, Type, Category, Amount row
/// per transaction.
fn parse_ledger(text: &str) -> Result<Ledger, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let mut transactions = Vec::new();

    for record in reader.records() {
        let record = record.map_err(|error| Error::InvalidRecord(error.to_string()))?;
        transactions.push(parse_record(&record)?);
    }

    Ok(Ledger::from_transactions(transactions))
}

fn parse_record(record: &csv::StringRecord) -> Result<Transaction, Error> {
    let field = |column: usize| {
        record
            .get(column)
            .ok_or_else(|| Error::InvalidRecord(format!("missing column {column}")))
    };

    let raw_date = field(0)?;
    let date = Date::parse(raw_date, &DATE_FORMAT)
        .map_err(|_| Error::InvalidDate(raw_date.to_string()))?;
    let kind = field(1)?.parse()?;
    let category = field(2)?.parse()?;
    let raw_amount = field(3)?;
    let amount: f64 = raw_amount
        .parse()
        .map_err(|_| Error::InvalidRecord(format!("could not parse amount \"{raw_amount}\"")))?;

    Transaction::new(date, kind, category, amount)
}
