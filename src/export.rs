//! Serializes a ledger for download: the tabular CSV export and the
//! printable report.

use axum::{
    Extension,
    extract::State,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};

use crate::{
    AppState, Error,
    auth::Session,
    error::internal_error_response,
    stores::LedgerStore,
    transaction::Ledger,
};

/// The title line of the printable report.
pub const REPORT_TITLE: &str = "Expense Report";

/// The fixed four-column schema of ledger records and the tabular export.
pub const CSV_HEADERS: [&str; 4] = ["Date", "Type", "Category", "Amount"];

/// Serialize the full ledger as CSV with the fixed four-column schema.
///
/// This is both the export format and the on-disk ledger record format.
///
/// # Errors
///
/// Returns an [Error::SerializationError] if a row could not be written.
pub fn ledger_to_csv(ledger: &Ledger) -> Result<String, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(CSV_HEADERS)
        .map_err(|error| Error::SerializationError(error.to_string()))?;

    for transaction in ledger.transactions() {
        let amount = transaction.amount.to_string();
        writer
            .write_record([
                transaction.date_string().as_str(),
                transaction.kind.as_str(),
                transaction.category.as_str(),
                amount.as_str(),
            ])
            .map_err(|error| Error::SerializationError(error.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::SerializationError(error.to_string()))?;

    String::from_utf8(bytes).map_err(|error| Error::SerializationError(error.to_string()))
}

/// Render the ledger as a printable plain-text report.
///
/// The report starts with the fixed title line, followed by one line per
/// transaction in insertion order.
pub fn render_report(ledger: &Ledger) -> String {
    let mut lines = vec![REPORT_TITLE.to_string()];

    for transaction in ledger.transactions() {
        lines.push(format!(
            "{} | {} | {} | {}",
            transaction.date_string(),
            transaction.kind,
            transaction.category,
            transaction.amount
        ));
    }

    lines.join("\n")
}

/// Download the logged-in user's full ledger as a CSV file.
pub async fn get_csv_export(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Response {
    let ledger = match state.ledgers.load(&session.username) {
        Ok(ledger) => ledger,
        Err(error) => {
            tracing::error!("could not load ledger for CSV export: {error}");
            return internal_error_response();
        }
    };

    match ledger_to_csv(&ledger) {
        Ok(text) => download_response("text/csv; charset=utf-8", "transactions.csv", text),
        Err(error) => {
            tracing::error!("could not serialize ledger for CSV export: {error}");
            internal_error_response()
        }
    }
}

/// Download the logged-in user's ledger as a printable plain-text report.
pub async fn get_report_export(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Response {
    let ledger = match state.ledgers.load(&session.username) {
        Ok(ledger) => ledger,
        Err(error) => {
            tracing::error!("could not load ledger for report export: {error}");
            return internal_error_response();
        }
    };

    let file_name = format!("report_{}.txt", session.username);

    download_response("text/plain; charset=utf-8", &file_name, render_report(&ledger))
}

fn download_response(content_type: &str, file_name: &str, body: String) -> Response {
    (
        [
            (CONTENT_TYPE, content_type.to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    )
        .into_response()
}
