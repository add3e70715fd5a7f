//! The transaction table shown on the dashboard.

use maud::{Markup, html};

use crate::{
    html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency},
    transaction::{Transaction, TransactionKind},
};

/// Renders the full ledger as a table, in insertion order.
pub(super) fn transaction_table(transactions: &[Transaction]) -> Markup {
    html! {
        section class="w-full mb-4 overflow-x-auto rounded-lg shadow"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                    }
                }

                tbody
                {
                    @for transaction in transactions
                    {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { (transaction.date_string()) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                span class=(kind_badge_style(transaction.kind))
                                {
                                    (transaction.kind)
                                }
                            }
                            td class=(TABLE_CELL_STYLE) { (transaction.category) }
                            td class=(TABLE_CELL_STYLE) { (format_currency(transaction.amount)) }
                        }
                    }
                }
            }
        }
    }
}

fn kind_badge_style(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Income => {
            "inline-flex items-center px-2.5 py-0.5 text-xs font-semibold \
            text-green-800 bg-green-100 rounded-full dark:bg-green-900 dark:text-green-300"
        }
        TransactionKind::Expense => {
            "inline-flex items-center px-2.5 py-0.5 text-xs font-semibold \
            text-red-800 bg-red-100 rounded-full dark:bg-red-900 dark:text-red-300"
        }
    }
}
