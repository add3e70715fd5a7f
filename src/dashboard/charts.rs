//! Chart generation for the dashboard.
//!
//! Builds two ECharts visualizations from the aggregation results:
//! a category breakdown bar chart and a monthly trend line chart. Each chart
//! is generated as JSON configuration for the ECharts library and rendered
//! with a container div and a JavaScript initialization snippet.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisType, Tooltip, Trigger},
    series::{Bar, Line},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    dashboard::aggregation::{category_breakdown, monthly_breakdown},
    html::HeadElement,
    transaction::{Category, Transaction, TransactionKind, format_date},
};

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Build all dashboard charts for `transactions`.
pub(super) fn dashboard_charts(transactions: &[Transaction]) -> Vec<DashboardChart> {
    vec![
        DashboardChart {
            id: "category-breakdown-chart",
            options: category_chart(transactions).to_string(),
        },
        DashboardChart {
            id: "monthly-trend-chart",
            options: monthly_trend_chart(transactions).to_string(),
        },
    ]
}

/// Renders the HTML containers for dashboard charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section id="charts" class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div id=(chart.id) class="min-h-[380px] rounded bg-white dark:bg-gray-100" {}
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances with responsive
/// resizing.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    chart.setOption({});

                    window.addEventListener('resize', chart.resize);
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{script_content}\n}});"
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// Per-category income and expense totals as a grouped bar chart.
fn category_chart(transactions: &[Transaction]) -> Chart {
    let breakdown = category_breakdown(transactions);

    // Only categories that actually occur, in the fixed category order.
    let categories: Vec<Category> = Category::ALL
        .into_iter()
        .filter(|category| {
            TransactionKind::ALL
                .into_iter()
                .any(|kind| breakdown.contains_key(&(*category, kind)))
        })
        .collect();

    let labels: Vec<String> = categories
        .iter()
        .map(|category| category.to_string())
        .collect();

    let mut chart = Chart::new()
        .title(Title::new().text("Category Breakdown"))
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .legend(Legend::new())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(Axis::new().type_(AxisType::Value));

    for kind in TransactionKind::ALL {
        let values: Vec<f64> = categories
            .iter()
            .map(|category| breakdown.get(&(*category, kind)).copied().unwrap_or(0.0))
            .collect();

        chart = chart.series(Bar::new().name(kind.as_str()).data(values));
    }

    chart
}

/// Per-month income and expense totals as a line chart.
fn monthly_trend_chart(transactions: &[Transaction]) -> Chart {
    let breakdown = monthly_breakdown(transactions);

    // The breakdown is sorted chronologically, so deduplicating in order
    // gives the x-axis months.
    let mut months = Vec::new();
    for entry in &breakdown {
        if months.last() != Some(&entry.month) {
            months.push(entry.month);
        }
    }

    let labels: Vec<String> = months.iter().map(|month| format_date(*month)).collect();

    let mut chart = Chart::new()
        .title(Title::new().text("Monthly Trend"))
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .legend(Legend::new())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(Axis::new().type_(AxisType::Value));

    for kind in TransactionKind::ALL {
        let values: Vec<f64> = months
            .iter()
            .map(|month| {
                breakdown
                    .iter()
                    .find(|entry| entry.month == *month && entry.kind == kind)
                    .map(|entry| entry.total)
                    .unwrap_or(0.0)
            })
            .collect();

        chart = chart.series(Line::new().name(kind.as_str()).data(values));
    }

    chart
}

#[cfg(test)]
mod charts_tests {
    use time::macros::date;

    use crate::transaction::{Category, Transaction, TransactionKind};

    use super::dashboard_charts;

    #[test]
    fn dashboard_charts_produce_json_options() {
        let transactions = [
            Transaction::new(
                date!(2024 - 01 - 01),
                TransactionKind::Income,
                Category::Salary,
                1000.0,
            )
            .unwrap(),
            Transaction::new(
                date!(2024 - 01 - 05),
                TransactionKind::Expense,
                Category::Food,
                100.0,
            )
            .unwrap(),
        ];

        let charts = dashboard_charts(&transactions);

        assert_eq!(charts.len(), 2);

        for chart in charts {
            serde_json::from_str::<serde_json::Value>(&chart.options)
                .expect("chart options should be valid JSON");
        }
    }
}
