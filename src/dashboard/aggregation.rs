//! Pure aggregation functions over a ledger snapshot.
//!
//! Everything in this module is a single-pass, stateless transformation:
//! totals, budget alerts, monthly grouping and per-category sums. Nothing
//! here touches persistence.

use std::collections::HashMap;

use time::Date;

use crate::transaction::{Category, Transaction, TransactionKind};

/// The fixed budget for the Food category.
///
/// A static policy constant, not configurable per user.
pub const FOOD_BUDGET_LIMIT: f64 = 5000.0;

/// The income, expense and balance totals of a ledger.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LedgerTotals {
    /// The sum of all income amounts.
    pub income: f64,
    /// The sum of all expense amounts.
    pub expenses: f64,
    /// Income minus expenses.
    pub balance: f64,
}

/// Sum the income and expense amounts of `transactions`.
pub fn totals(transactions: &[Transaction]) -> LedgerTotals {
    let mut income = 0.0;
    let mut expenses = 0.0;

    for transaction in transactions {
        match transaction.kind {
            TransactionKind::Income => income += transaction.amount,
            TransactionKind::Expense => expenses += transaction.amount,
        }
    }

    LedgerTotals {
        income,
        expenses,
        balance: income - expenses,
    }
}

/// A condition worth warning the user about on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BudgetAlert {
    /// Total expenses exceed total income.
    Overspend {
        /// The sum of all income amounts.
        income: f64,
        /// The sum of all expense amounts.
        expenses: f64,
    },
    /// The amounts in a category add up to more than its fixed budget.
    CategoryOverBudget {
        /// The category that went over budget.
        category: Category,
        /// The sum of all amounts in the category.
        total: f64,
        /// The budget the sum exceeded.
        limit: f64,
    },
}

/// Check `transactions` for alert conditions.
///
/// Emits [BudgetAlert::Overspend] when total expenses exceed total income
/// and [BudgetAlert::CategoryOverBudget] when the Food amounts add up to
/// more than [FOOD_BUDGET_LIMIT]. The Food sum counts all amounts in the
/// category regardless of transaction type.
pub fn budget_alerts(transactions: &[Transaction]) -> Vec<BudgetAlert> {
    let mut alerts = Vec::new();

    let totals = totals(transactions);

    if totals.expenses > totals.income {
        alerts.push(BudgetAlert::Overspend {
            income: totals.income,
            expenses: totals.expenses,
        });
    }

    let food_total: f64 = transactions
        .iter()
        .filter(|transaction| transaction.category == Category::Food)
        .map(|transaction| transaction.amount)
        .sum();

    if food_total > FOOD_BUDGET_LIMIT {
        alerts.push(BudgetAlert::CategoryOverBudget {
            category: Category::Food,
            total: food_total,
            limit: FOOD_BUDGET_LIMIT,
        });
    }

    alerts
}

/// The amounts of one transaction type summed over one calendar month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyTotal {
    /// The month, as a date truncated to the first day of the month.
    pub month: Date,
    /// The transaction type that was summed.
    pub kind: TransactionKind,
    /// The sum of the amounts.
    pub total: f64,
}

/// Group `transactions` by calendar month and transaction type, summing
/// amounts.
///
/// The result is ordered by chronological month, then by transaction type in
/// the order the types were first encountered within that month.
pub fn monthly_breakdown(transactions: &[Transaction]) -> Vec<MonthlyTotal> {
    let mut breakdown: Vec<MonthlyTotal> = Vec::new();

    for transaction in transactions {
        let month = transaction.date.replace_day(1).unwrap();

        match breakdown
            .iter_mut()
            .find(|entry| entry.month == month && entry.kind == transaction.kind)
        {
            Some(entry) => entry.total += transaction.amount,
            None => breakdown.push(MonthlyTotal {
                month,
                kind: transaction.kind,
                total: transaction.amount,
            }),
        }
    }

    // A stable sort keeps the first-encounter order of types within a month.
    breakdown.sort_by_key(|entry| entry.month);

    breakdown
}

/// Group `transactions` by category and transaction type, summing amounts.
///
/// The grouping is deterministic but carries no ordering guarantee, callers
/// that render the result should impose their own order.
pub fn category_breakdown(
    transactions: &[Transaction],
) -> HashMap<(Category, TransactionKind), f64> {
    let mut breakdown = HashMap::new();

    for transaction in transactions {
        *breakdown
            .entry((transaction.category, transaction.kind))
            .or_insert(0.0) += transaction.amount;
    }

    breakdown
}

#[cfg(test)]
mod aggregation_tests {
    use time::macros::date;

    use crate::transaction::{Category, Transaction, TransactionKind};

    use super::{
        BudgetAlert, FOOD_BUDGET_LIMIT, budget_alerts, category_breakdown, monthly_breakdown,
        totals,
    };

    fn transaction(
        date: time::Date,
        kind: TransactionKind,
        category: Category,
        amount: f64,
    ) -> Transaction {
        Transaction::new(date, kind, category, amount).unwrap()
    }

    fn income(date: time::Date, amount: f64) -> Transaction {
        transaction(date, TransactionKind::Income, Category::Salary, amount)
    }

    fn expense(date: time::Date, category: Category, amount: f64) -> Transaction {
        transaction(date, TransactionKind::Expense, category, amount)
    }

    #[test]
    fn totals_sum_each_transaction_type() {
        let transactions = [
            income(date!(2024 - 01 - 01), 1000.0),
            expense(date!(2024 - 01 - 05), Category::Food, 300.0),
            income(date!(2024 - 02 - 01), 500.0),
            expense(date!(2024 - 02 - 10), Category::Bills, 200.0),
        ];

        let totals = totals(&transactions);

        assert_eq!(totals.income, 1500.0);
        assert_eq!(totals.expenses, 500.0);
        assert_eq!(totals.balance, totals.income - totals.expenses);
    }

    #[test]
    fn totals_of_empty_ledger_are_zero() {
        let totals = totals(&[]);

        assert_eq!(totals.income, 0.0);
        assert_eq!(totals.expenses, 0.0);
        assert_eq!(totals.balance, 0.0);
    }

    #[test]
    fn overspending_emits_an_alert() {
        let transactions = [
            income(date!(2024 - 01 - 01), 1000.0),
            expense(date!(2024 - 01 - 05), Category::Shopping, 1500.0),
        ];

        let alerts = budget_alerts(&transactions);

        assert_eq!(
            alerts,
            vec![BudgetAlert::Overspend {
                income: 1000.0,
                expenses: 1500.0,
            }]
        );
    }

    #[test]
    fn food_spending_over_the_limit_emits_an_alert() {
        let transactions = [
            income(date!(2024 - 01 - 01), 10000.0),
            expense(date!(2024 - 01 - 10), Category::Food, 3000.0),
            expense(date!(2024 - 01 - 15), Category::Food, 3000.0),
        ];

        let alerts = budget_alerts(&transactions);

        assert_eq!(
            alerts,
            vec![BudgetAlert::CategoryOverBudget {
                category: Category::Food,
                total: 6000.0,
                limit: FOOD_BUDGET_LIMIT,
            }]
        );
    }

    #[test]
    fn ledger_within_budget_emits_no_alerts() {
        let transactions = [
            income(date!(2024 - 01 - 01), 2000.0),
            expense(date!(2024 - 01 - 05), Category::Food, 100.0),
            expense(date!(2024 - 01 - 10), Category::Bills, 900.0),
        ];

        let alerts = budget_alerts(&transactions);

        assert!(alerts.is_empty());
    }

    #[test]
    fn food_at_exactly_the_limit_does_not_alert() {
        let transactions = [
            income(date!(2024 - 01 - 01), 10000.0),
            expense(date!(2024 - 01 - 10), Category::Food, FOOD_BUDGET_LIMIT),
        ];

        let alerts = budget_alerts(&transactions);

        assert!(alerts.is_empty());
    }

    #[test]
    fn monthly_breakdown_groups_by_month_and_type() {
        let transactions = [
            expense(date!(2024 - 02 - 14), Category::Food, 40.0),
            income(date!(2024 - 01 - 01), 1000.0),
            expense(date!(2024 - 01 - 05), Category::Bills, 200.0),
            expense(date!(2024 - 01 - 20), Category::Food, 100.0),
            income(date!(2024 - 02 - 01), 1000.0),
        ];

        let breakdown = monthly_breakdown(&transactions);

        let summary: Vec<(time::Date, TransactionKind, f64)> = breakdown
            .iter()
            .map(|entry| (entry.month, entry.kind, entry.total))
            .collect();

        assert_eq!(
            summary,
            vec![
                // January: income first since it was encountered first.
                (date!(2024 - 01 - 01), TransactionKind::Income, 1000.0),
                (date!(2024 - 01 - 01), TransactionKind::Expense, 300.0),
                // February: the expense came first in the ledger.
                (date!(2024 - 02 - 01), TransactionKind::Expense, 40.0),
                (date!(2024 - 02 - 01), TransactionKind::Income, 1000.0),
            ]
        );
    }

    #[test]
    fn category_breakdown_groups_by_category_and_type() {
        let transactions = [
            income(date!(2024 - 01 - 01), 1000.0),
            expense(date!(2024 - 01 - 05), Category::Food, 100.0),
            expense(date!(2024 - 01 - 10), Category::Food, 50.0),
            expense(date!(2024 - 01 - 15), Category::Transport, 25.0),
        ];

        let breakdown = category_breakdown(&transactions);

        assert_eq!(breakdown.len(), 3);
        assert_eq!(
            breakdown[&(Category::Salary, TransactionKind::Income)],
            1000.0
        );
        assert_eq!(
            breakdown[&(Category::Food, TransactionKind::Expense)],
            150.0
        );
        assert_eq!(
            breakdown[&(Category::Transport, TransactionKind::Expense)],
            25.0
        );
    }
}
