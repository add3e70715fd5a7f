//! The page and endpoint for recording a new transaction.

use axum::{
    Extension, Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    AppState, Error,
    auth::Session,
    endpoints,
    error::internal_error_response,
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
    stores::LedgerStore,
    transaction::{Category, DATE_FORMAT, Transaction, TransactionKind, format_date},
};

fn select_input(name: &str, label: &str, options: &[&str], selected: &str) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            select name=(name) id=(name) class=(FORM_TEXT_INPUT_STYLE) required
            {
                @for option in options
                {
                    option value=(option) selected[*option == selected] { (option) }
                }
            }
        }
    }
}

fn new_transaction_form(form: &NewTransactionForm, error_message: Option<&str>) -> Markup {
    let kinds: Vec<&str> = TransactionKind::ALL.iter().map(|kind| kind.as_str()).collect();
    let categories: Vec<&str> = Category::ALL
        .iter()
        .map(|category| category.as_str())
        .collect();

    html! {
        form
            hx-post=(endpoints::TRANSACTIONS_API)
            class="w-full max-w-md space-y-4 md:space-y-6 mt-6"
        {
            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                input
                    type="date"
                    name="date"
                    id="date"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required
                    value=(form.date);
            }

            (select_input("kind", "Type", &kinds, form.kind.as_str()))
            (select_input("category", "Category", &categories, form.category.as_str()))

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                input
                    type="number"
                    name="amount"
                    id="amount"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required
                    min="0.01"
                    step="0.01"
                    value=(form.amount);
            }

            @if let Some(error_message) = error_message
            {
                p class="text-red-500 text-base" { (error_message) }
            }

            button type="submit" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                "Save Transaction"
            }
        }
    }
}

fn new_transaction_page(form: &NewTransactionForm, error_message: Option<&str>) -> Markup {
    let content = html! {
        (NavBar::new(endpoints::NEW_TRANSACTION_VIEW).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold" { "➕ Add New Transaction" }

            (new_transaction_form(form, error_message))
        }
    };

    base("Add Transaction", &[], &content)
}

/// Display the page for recording a new transaction.
///
/// The date input defaults to today.
pub async fn get_new_transaction_page() -> Response {
    let form = NewTransactionForm {
        date: format_date(OffsetDateTime::now_utc().date()),
        ..Default::default()
    };

    new_transaction_page(&form, None).into_response()
}

/// The raw data entered by the user in the new transaction form.
///
/// Fields are kept as strings and parsed by the endpoint so that the form
/// can be re-rendered with the user's input when a field is invalid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransactionForm {
    /// The transaction date, e.g. "2024-01-10".
    pub date: String,
    /// The transaction type, "Income" or "Expense".
    pub kind: String,
    /// The transaction category, e.g. "Food".
    pub category: String,
    /// The transaction amount.
    pub amount: String,
}

impl Default for NewTransactionForm {
    fn default() -> Self {
        Self {
            date: String::new(),
            kind: TransactionKind::Expense.as_str().to_string(),
            category: Category::Other.as_str().to_string(),
            amount: String::new(),
        }
    }
}

impl NewTransactionForm {
    fn parse(&self) -> Result<Transaction, Error> {
        let date = Date::parse(&self.date, &DATE_FORMAT)
            .map_err(|_| Error::InvalidDate(self.date.clone()))?;
        let kind: TransactionKind = self.kind.parse()?;
        let category: Category = self.category.parse()?;
        let amount: f64 = self.amount.parse().map_err(|_| {
            Error::InvalidRecord(format!("could not parse amount \"{}\"", self.amount))
        })?;

        Transaction::new(date, kind, category, amount)
    }
}

/// Handler for recording a new transaction via the POST method.
///
/// On success the transaction is appended to the logged-in user's ledger and
/// the client is redirected to the dashboard. Invalid input re-renders the
/// form with an error message.
pub async fn create_transaction(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Form(form): Form<NewTransactionForm>,
) -> Response {
    let transaction = match form.parse() {
        Ok(transaction) => transaction,
        Err(error) => {
            let message = error.to_string();

            return new_transaction_page(&form, Some(&message)).into_response();
        }
    };

    match state.ledgers.append(&session.username, transaction) {
        Ok(_) => (
            HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!(
                "could not save transaction for {}: {error}",
                session.username
            );

            internal_error_response()
        }
    }
}

#[cfg(test)]
mod new_transaction_tests {
    use axum::{Extension, Router, routing::post};
    use axum_htmx::HX_REDIRECT;
    use axum_test::TestServer;
    use tempfile::tempdir;
    use time::macros::date;

    use crate::{
        AppState,
        auth::Session,
        endpoints,
        stores::{CsvLedgerStore, LedgerStore},
        transaction::{Category, TransactionKind},
        user::Username,
    };

    use super::create_transaction;

    fn get_test_server() -> (tempfile::TempDir, TestServer, std::sync::Arc<CsvLedgerStore>) {
        let data_dir = tempdir().unwrap();
        let state = AppState::new(data_dir.path(), "averysecretsecret");
        let ledgers = state.ledgers.clone();
        let session = Session {
            username: Username::new("alice").unwrap(),
        };

        // Stub out the auth guard by injecting the session directly.
        let app = Router::new()
            .route(endpoints::TRANSACTIONS_API, post(create_transaction))
            .layer(Extension(session))
            .with_state(state);

        let server = TestServer::try_new(app).expect("Could not create test server.");

        (data_dir, server, ledgers)
    }

    #[tokio::test]
    async fn create_transaction_appends_to_the_ledger() {
        let (_data_dir, server, ledgers) = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .form(&[
                ("date", "2024-01-10"),
                ("kind", "Expense"),
                ("category", "Food"),
                ("amount", "42.50"),
            ])
            .await;

        response.assert_status_see_other();
        assert_eq!(response.header(HX_REDIRECT), endpoints::DASHBOARD_VIEW);

        let ledger = ledgers.load(&Username::new("alice").unwrap()).unwrap();
        assert_eq!(ledger.len(), 1);

        let transaction = &ledger.transactions()[0];
        assert_eq!(transaction.date, date!(2024 - 01 - 10));
        assert_eq!(transaction.kind, TransactionKind::Expense);
        assert_eq!(transaction.category, Category::Food);
        assert_eq!(transaction.amount, 42.5);
    }

    #[tokio::test]
    async fn create_transaction_rejects_non_positive_amounts() {
        let (_data_dir, server, ledgers) = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .form(&[
                ("date", "2024-01-10"),
                ("kind", "Expense"),
                ("category", "Food"),
                ("amount", "0"),
            ])
            .await;

        response.assert_status_ok();
        assert!(response.text().contains("greater than zero"));
        assert!(ledgers.load(&Username::new("alice").unwrap()).unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_transaction_rejects_invalid_dates() {
        let (_data_dir, server, _ledgers) = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .form(&[
                ("date", "10/01/2024"),
                ("kind", "Expense"),
                ("category", "Food"),
                ("amount", "10"),
            ])
            .await;

        response.assert_status_ok();
        assert!(response.text().contains("as a date"));
    }
}
