//! Defines the core data models for the transaction ledger.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::Error;

/// The date format used for ledger records, exports and HTML date inputs,
/// e.g. "2024-01-10".
pub(crate) const DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day]");

/// Format `date` with [DATE_FORMAT].
pub(crate) fn format_date(date: Date) -> String {
    date.format(&DATE_FORMAT)
        .expect("formatting a date with a date-only format description cannot fail")
}

/// Whether a transaction brought money in or took money out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Money earned, e.g. a salary payment.
    Income,
    /// Money spent, e.g. a supermarket purchase.
    Expense,
}

impl TransactionKind {
    /// Both transaction types, in the order they appear in forms.
    pub const ALL: [TransactionKind; 2] = [TransactionKind::Income, TransactionKind::Expense];

    /// Get the name of the transaction type as used in ledger records.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Income" => Ok(TransactionKind::Income),
            "Expense" => Ok(TransactionKind::Expense),
            _ => Err(Error::InvalidTransactionKind(s.to_string())),
        }
    }
}

/// The category a transaction belongs to.
///
/// The set of categories is fixed, there is no user-defined categorisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Regular income from employment.
    Salary,
    /// Groceries and eating out.
    Food,
    /// Public transport, fuel and vehicle costs.
    Transport,
    /// Clothing, gadgets and other discretionary purchases.
    Shopping,
    /// Rent, utilities and subscriptions.
    Bills,
    /// Medical costs, insurance and fitness.
    Health,
    /// Anything that does not fit the other categories.
    Other,
}

impl Category {
    /// All categories, in the order they appear in forms and charts.
    pub const ALL: [Category; 7] = [
        Category::Salary,
        Category::Food,
        Category::Transport,
        Category::Shopping,
        Category::Bills,
        Category::Health,
        Category::Other,
    ];

    /// Get the name of the category as used in ledger records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Salary => "Salary",
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Shopping => "Shopping",
            Category::Bills => "Bills",
            Category::Health => "Health",
            Category::Other => "Other",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| Error::InvalidCategory(s.to_string()))
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// Transactions are immutable once created, there is no edit or delete
/// operation. Each transaction belongs to exactly one user's ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// When the transaction happened.
    pub date: Date,
    /// Whether money was earned or spent.
    pub kind: TransactionKind,
    /// The category the transaction belongs to.
    pub category: Category,
    /// The amount of money involved. Always greater than zero.
    pub amount: f64,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidAmount] if `amount` is zero or negative.
    pub fn new(
        date: Date,
        kind: TransactionKind,
        category: Category,
        amount: f64,
    ) -> Result<Self, Error> {
        if amount <= 0.0 {
            return Err(Error::InvalidAmount(amount));
        }

        Ok(Self {
            date,
            kind,
            category,
            amount,
        })
    }

    /// The transaction date formatted for ledger records and exports.
    pub fn date_string(&self) -> String {
        format_date(self.date)
    }
}

/// The ordered sequence of one user's transactions.
///
/// Insertion order is preserved and the sequence is append-only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    transactions: Vec<Transaction>,
}

impl Ledger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger from an existing sequence of transactions,
    /// preserving their order.
    pub fn from_transactions(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }

    /// Append a transaction to the end of the ledger.
    pub fn push(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    /// The transactions in insertion order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// The number of transactions in the ledger.
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Whether the ledger contains no transactions.
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

#[cfg(test)]
mod transaction_tests {
    use time::macros::date;

    use crate::Error;

    use super::{Category, Ledger, Transaction, TransactionKind};

    #[test]
    fn new_fails_on_zero_amount() {
        let result = Transaction::new(
            date!(2024 - 01 - 10),
            TransactionKind::Expense,
            Category::Food,
            0.0,
        );

        assert_eq!(result, Err(Error::InvalidAmount(0.0)));
    }

    #[test]
    fn new_fails_on_negative_amount() {
        let result = Transaction::new(
            date!(2024 - 01 - 10),
            TransactionKind::Expense,
            Category::Food,
            -12.5,
        );

        assert_eq!(result, Err(Error::InvalidAmount(-12.5)));
    }

    #[test]
    fn new_succeeds_on_positive_amount() {
        let transaction = Transaction::new(
            date!(2024 - 01 - 10),
            TransactionKind::Income,
            Category::Salary,
            1234.56,
        )
        .unwrap();

        assert_eq!(transaction.amount, 1234.56);
        assert_eq!(transaction.date_string(), "2024-01-10");
    }

    #[test]
    fn kind_round_trips_through_strings() {
        for kind in TransactionKind::ALL {
            assert_eq!(kind.as_str().parse::<TransactionKind>(), Ok(kind));
        }
    }

    #[test]
    fn kind_fails_on_unknown_string() {
        let result = "Transfer".parse::<TransactionKind>();

        assert_eq!(
            result,
            Err(Error::InvalidTransactionKind("Transfer".to_string()))
        );
    }

    #[test]
    fn category_round_trips_through_strings() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>(), Ok(category));
        }
    }

    #[test]
    fn category_fails_on_unknown_string() {
        let result = "Groceries".parse::<Category>();

        assert_eq!(result, Err(Error::InvalidCategory("Groceries".to_string())));
    }

    #[test]
    fn ledger_preserves_insertion_order() {
        let mut ledger = Ledger::new();
        let amounts = [30.0, 10.0, 20.0];

        for amount in amounts {
            ledger.push(
                Transaction::new(
                    date!(2024 - 02 - 01),
                    TransactionKind::Expense,
                    Category::Other,
                    amount,
                )
                .unwrap(),
            );
        }

        assert_eq!(ledger.len(), amounts.len());

        let stored: Vec<f64> = ledger
            .transactions()
            .iter()
            .map(|transaction| transaction.amount)
            .collect();
        assert_eq!(stored, amounts);
    }
}
