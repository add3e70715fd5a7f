//! The dashboard page: metric cards, budget alerts, the transaction table
//! and charts.

pub mod aggregation;
mod cards;
mod charts;
mod tables;

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use maud::html;

use crate::{
    AppState,
    auth::Session,
    dashboard::{
        aggregation::{budget_alerts, totals},
        cards::{alert_banners, metric_cards},
        charts::{charts_script, charts_view, dashboard_charts},
        tables::transaction_table,
    },
    endpoints,
    error::internal_error_response,
    html::{HeadElement, LINK_STYLE, PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
    stores::LedgerStore,
};

/// The CDN location of the ECharts library used by the dashboard charts.
const ECHARTS_SCRIPT_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@5.6.0/dist/echarts.min.js";

/// Display the dashboard for the logged-in user.
///
/// Shows the metric cards, budget alerts, the transaction table, the charts
/// and the export links. Before the first transaction an empty state is
/// shown instead.
pub async fn get_dashboard_page(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Response {
    let ledger = match state.ledgers.load(&session.username) {
        Ok(ledger) => ledger,
        Err(error) => {
            tracing::error!("could not load ledger for {}: {error}", session.username);
            return internal_error_response();
        }
    };

    let transactions = ledger.transactions();

    if transactions.is_empty() {
        let content = html! {
            (NavBar::new(endpoints::DASHBOARD_VIEW).into_html())

            div class=(PAGE_CONTAINER_STYLE)
            {
                h1 class="text-2xl font-bold mb-2" { "Welcome, " (session.username) "!" }

                p class="text-gray-500 dark:text-gray-400"
                {
                    "No transactions yet. "

                    a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                    {
                        "Add your first transaction"
                    }

                    " to see your dashboard."
                }
            }
        };

        return base("Dashboard", &[], &content).into_response();
    }

    let totals = totals(transactions);
    let alerts = budget_alerts(transactions);
    let charts = dashboard_charts(transactions);

    let head_elements = [
        HeadElement::ScriptLink(ECHARTS_SCRIPT_URL.to_owned()),
        charts_script(&charts),
    ];

    let content = html! {
        (NavBar::new(endpoints::DASHBOARD_VIEW).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-xl"
            {
                h1 class="text-2xl font-bold mb-4" { "Welcome, " (session.username) "!" }

                (metric_cards(&totals))
                (alert_banners(&alerts))

                h2 class="text-xl font-semibold mb-2" { "📋 Your Transactions" }
                (transaction_table(transactions))

                (charts_view(&charts))

                div class="flex gap-4 mb-4"
                {
                    a href=(endpoints::EXPORT_CSV) class=(LINK_STYLE) { "Download CSV" }
                    a href=(endpoints::EXPORT_REPORT) class=(LINK_STYLE) { "Download Report" }
                }
            }
        }
    };

    base("Dashboard", &head_elements, &content).into_response()
}
