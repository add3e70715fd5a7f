//! The registration page and the endpoint for creating a new account.

use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::register,
    endpoints,
    error::internal_error_response,
    html::{BUTTON_PRIMARY_STYLE, LINK_STYLE, auth_card, base, password_input, text_input},
};

/// The error shown when the chosen username is already registered.
pub const USERNAME_TAKEN_ERROR_MSG: &str = "Username already exists";

#[derive(Default)]
struct RegistrationFormErrors<'a> {
    username: Option<&'a str>,
    password: Option<&'a str>,
    confirm_password: Option<&'a str>,
}

fn registration_form(username: &str, errors: &RegistrationFormErrors) -> Markup {
    html! {
        form
            hx-post=(endpoints::REGISTER_API)
            class="space-y-4 md:space-y-6"
        {
            (text_input("username", "Username", username, errors.username))
            (password_input("password", "Password", errors.password))
            (password_input("confirm_password", "Confirm Password", errors.confirm_password))

            button type="submit" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                "Create Account"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "

                a href=(endpoints::LOG_IN_VIEW) tabindex="0" class=(LINK_STYLE)
                {
                    "Log in here"
                }
            }
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let content = auth_card(
        "Create Account",
        &registration_form("", &RegistrationFormErrors::default()),
    );

    base("Register", &[], &content).into_response()
}

/// The raw data entered by the user in the registration form.
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterForm {
    /// The username to register.
    pub username: String,
    /// The chosen password.
    pub password: String,
    /// The chosen password, again, to catch typos.
    pub confirm_password: String,
}

/// Handler for registration requests via the POST method.
///
/// On success the client is redirected to the log-in page. Otherwise, the
/// form is returned with an error message explaining the problem.
pub async fn post_register(
    State(state): State<AppState>,
    Form(user_data): Form<RegisterForm>,
) -> Response {
    if user_data.password.is_empty() {
        return registration_form(
            &user_data.username,
            &RegistrationFormErrors {
                password: Some("Password cannot be empty"),
                ..Default::default()
            },
        )
        .into_response();
    }

    if user_data.password != user_data.confirm_password {
        return registration_form(
            &user_data.username,
            &RegistrationFormErrors {
                confirm_password: Some("Passwords do not match"),
                ..Default::default()
            },
        )
        .into_response();
    }

    match register(
        state.credentials.as_ref(),
        &user_data.username,
        &user_data.password,
    ) {
        Ok(_) => (
            HxRedirect(endpoints::LOG_IN_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::UsernameTaken(_)) => registration_form(
            &user_data.username,
            &RegistrationFormErrors {
                username: Some(USERNAME_TAKEN_ERROR_MSG),
                ..Default::default()
            },
        )
        .into_response(),
        Err(error @ Error::InvalidUsername(_)) => {
            let message = error.to_string();

            registration_form(
                &user_data.username,
                &RegistrationFormErrors {
                    username: Some(&message),
                    ..Default::default()
                },
            )
            .into_response()
        }
        Err(error) => {
            tracing::error!("An unhandled error occurred while registering a new user: {error}");

            internal_error_response()
        }
    }
}
