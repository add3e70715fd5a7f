//! This file defines the routes for displaying the log-in page and handling
//! log-in requests.

use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::{
    AppState,
    auth::{authenticate, set_auth_cookie},
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, LINK_STYLE, auth_card, base, password_input, text_input},
    user::Username,
};

/// The error shown when the username or password is wrong.
///
/// The same message is used for both cases so that log-in responses cannot
/// be used to enumerate registered usernames.
pub const INVALID_CREDENTIALS_ERROR_MSG: &str = "Incorrect username or password.";

fn log_in_form(username: &str, error_message: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::LOG_IN_API)
            class="space-y-4 md:space-y-6"
        {
            (text_input("username", "Username", username, None))
            (password_input("password", "Password", error_message))

            button type="submit" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                "Log in"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Don't have an account yet? "

                a href=(endpoints::REGISTER_VIEW) tabindex="0" class=(LINK_STYLE)
                {
                    "Register here"
                }
            }
        }
    }
}

/// Display the log-in page.
pub async fn get_log_in_page() -> Response {
    let content = auth_card("Log in", &log_in_form("", None));

    base("Log in", &[], &content).into_response()
}

/// The raw data entered by the user in the log-in form.
///
/// The username and password are stored as plain strings. There is no need
/// for validation here since they will be compared against the stored
/// credentials, which have been verified at registration.
#[derive(Debug, Serialize, Deserialize)]
pub struct LogInData {
    /// Username entered during log-in.
    pub username: String,
    /// Password entered during log-in.
    pub password: String,
}

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in request, the auth cookie is set and the client is
/// redirected to the dashboard page. Otherwise, the form is returned with an
/// error message explaining the problem.
pub async fn post_log_in(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<LogInData>,
) -> Response {
    // An invalid username cannot be registered, so it gets the same response
    // as any other unknown username.
    let Ok(username) = Username::new(&user_data.username) else {
        return log_in_form(&user_data.username, Some(INVALID_CREDENTIALS_ERROR_MSG))
            .into_response();
    };

    if !authenticate(
        state.credentials.as_ref(),
        &user_data.username,
        &user_data.password,
    ) {
        return log_in_form(&user_data.username, Some(INVALID_CREDENTIALS_ERROR_MSG))
            .into_response();
    }

    let jar = set_auth_cookie(jar, &username, state.cookie_duration);

    (
        StatusCode::SEE_OTHER,
        HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
        jar,
    )
        .into_response()
}

#[cfg(test)]
mod log_in_tests {
    use axum::{Router, routing::post};
    use axum_htmx::HX_REDIRECT;
    use axum_test::TestServer;
    use tempfile::tempdir;

    use crate::{AppState, auth::register, endpoints};

    use super::{INVALID_CREDENTIALS_ERROR_MSG, post_log_in};

    fn get_test_server(registered: Option<(&str, &str)>) -> (tempfile::TempDir, TestServer) {
        let data_dir = tempdir().unwrap();
        let state = AppState::new(data_dir.path(), "averysecretsecret");

        if let Some((username, password)) = registered {
            register(state.credentials.as_ref(), username, password)
                .expect("Could not create test user");
        }

        let app = Router::new()
            .route(endpoints::LOG_IN_API, post(post_log_in))
            .with_state(state);

        let server = TestServer::try_new(app).expect("Could not create test server.");

        (data_dir, server)
    }

    #[tokio::test]
    async fn log_in_succeeds_with_valid_credentials() {
        let (_data_dir, server) = get_test_server(Some(("alice", "pw1")));

        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[("username", "alice"), ("password", "pw1")])
            .await;

        response.assert_status_see_other();
        assert_eq!(response.header(HX_REDIRECT), endpoints::DASHBOARD_VIEW);
        assert!(response.cookies().iter().next().is_some());
    }

    #[tokio::test]
    async fn log_in_fails_with_incorrect_password() {
        let (_data_dir, server) = get_test_server(Some(("alice", "pw1")));

        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[("username", "alice"), ("password", "pw2")])
            .await;

        response.assert_status_ok();
        assert!(response.text().contains(INVALID_CREDENTIALS_ERROR_MSG));
    }

    #[tokio::test]
    async fn log_in_fails_with_unknown_username() {
        let (_data_dir, server) = get_test_server(None);

        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[("username", "nobody"), ("password", "pw1")])
            .await;

        response.assert_status_ok();
        assert!(response.text().contains(INVALID_CREDENTIALS_ERROR_MSG));
    }
}
