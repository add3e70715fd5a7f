//! Metric cards and alert banners for the dashboard.

use maud::{Markup, html};

use crate::{
    dashboard::aggregation::{BudgetAlert, LedgerTotals},
    html::format_currency,
};

const CARD_STYLE: &str = "flex flex-col gap-1 p-4 bg-white rounded-lg shadow \
    dark:bg-gray-800";
const CARD_LABEL_STYLE: &str = "text-sm text-gray-500 dark:text-gray-400";
const CARD_VALUE_STYLE: &str = "text-2xl font-semibold";

/// Renders the Total Income, Total Expense and Balance metric cards.
pub(super) fn metric_cards(totals: &LedgerTotals) -> Markup {
    let metrics = [
        ("Total Income", totals.income),
        ("Total Expense", totals.expenses),
        ("Balance", totals.balance),
    ];

    html! {
        section class="w-full grid grid-cols-1 sm:grid-cols-3 gap-4 mb-4"
        {
            @for (label, value) in metrics
            {
                div class=(CARD_STYLE)
                {
                    span class=(CARD_LABEL_STYLE) { (label) }
                    span class=(CARD_VALUE_STYLE) { (format_currency(value)) }
                }
            }
        }
    }
}

const ERROR_BANNER_STYLE: &str = "w-full p-4 mb-4 text-red-800 bg-red-100 \
    rounded-lg dark:bg-red-900 dark:text-red-200";
const WARNING_BANNER_STYLE: &str = "w-full p-4 mb-4 text-yellow-800 bg-yellow-100 \
    rounded-lg dark:bg-yellow-900 dark:text-yellow-200";

/// Renders one banner per budget alert.
///
/// Overspending renders as an error, a category over budget as a warning.
pub(super) fn alert_banners(alerts: &[BudgetAlert]) -> Markup {
    html! {
        @for alert in alerts
        {
            (alert_banner(alert))
        }
    }
}

fn alert_banner(alert: &BudgetAlert) -> Markup {
    let (style, message) = match alert {
        BudgetAlert::Overspend { income, expenses } => (
            ERROR_BANNER_STYLE,
            format!(
                "⚠ You are spending more than your income! Spent {} against {} earned.",
                format_currency(*expenses),
                format_currency(*income)
            ),
        ),
        BudgetAlert::CategoryOverBudget {
            category,
            total,
            limit,
        } => (
            WARNING_BANNER_STYLE,
            format!(
                "🍔 Too much spending on {category}: {} is over the {} budget.",
                format_currency(*total),
                format_currency(*limit)
            ),
        ),
    };

    html! {
        div class=(style) { (message) }
    }
}
