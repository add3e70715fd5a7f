//! Implements user registration and credential verification, plus the
//! cookie-based session handling and the middleware that guards protected
//! routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use axum_htmx::HxRedirect;
use time::{Duration, OffsetDateTime};

use crate::{
    AppState, Error,
    endpoints,
    password::PasswordHash,
    stores::CredentialStore,
    user::{User, Username},
};

/// Register a new user.
///
/// Validates the username, hashes the password with a salt and inserts the
/// credential into `store`, which persists the full record immediately.
///
/// # Errors
///
/// - [Error::InvalidUsername] if the username is empty or contains
///   disallowed characters.
/// - [Error::UsernameTaken] if the username is already registered.
/// - [Error::HashingError] if the password could not be hashed.
/// - [Error::StorageError] if the credential record could not be written.
pub fn register<C: CredentialStore>(
    store: &C,
    raw_username: &str,
    password: &str,
) -> Result<Username, Error> {
    let username = Username::new(raw_username)?;

    if store.get(&username)?.is_some() {
        return Err(Error::UsernameTaken(username.to_string()));
    }

    let password_hash = PasswordHash::from_raw_password(password, PasswordHash::DEFAULT_COST)?;

    store.put(User::new(username.clone(), password_hash))?;

    Ok(username)
}

/// Check `password` against the stored hash for `raw_username`.
///
/// Returns `false` for an unknown username, a wrong password, or any error
/// along the way. The three cases are deliberately indistinguishable so the
/// login flow cannot be used to enumerate registered usernames.
pub fn authenticate<C: CredentialStore>(store: &C, raw_username: &str, password: &str) -> bool {
    let Ok(username) = Username::new(raw_username) else {
        return false;
    };

    match store.get(&username) {
        Ok(Some(user)) => user.password_hash.verify(password).unwrap_or_else(|error| {
            tracing::error!("could not verify password for {username}: {error}");
            false
        }),
        Ok(None) => false,
        Err(error) => {
            tracing::error!("could not read credential store: {error}");
            false
        }
    }
}

/// The name of the cookie holding the logged-in username.
pub(crate) const COOKIE_USERNAME: &str = "username";

/// The default duration for which auth cookies are valid.
pub(crate) const DEFAULT_COOKIE_DURATION: Duration = Duration::hours(2);

/// The context of one authenticated interaction.
///
/// Created by the auth middleware from the session cookie and placed into
/// request extensions, so every handler receives the identity explicitly
/// instead of reading shared mutable session state.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// The name of the logged-in user.
    pub username: Username,
}

/// Add an auth cookie to the cookie jar, indicating that a user is logged in
/// and authenticated.
///
/// Sets the expiry of the cookie to `duration` from the current time.
///
/// Returns the cookie jar with the cookie added.
pub(crate) fn set_auth_cookie(
    jar: PrivateCookieJar,
    username: &Username,
    duration: Duration,
) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_USERNAME, username.to_string()))
            // The cookie is set from an /api route but read on every page.
            .path("/")
            .expires(OffsetDateTime::now_utc() + duration)
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(true),
    )
}

/// Set the auth cookie to an invalid value and set its max age to zero,
/// which should delete the cookie on the client side.
pub(crate) fn invalidate_auth_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_USERNAME, "deleted"))
            .path("/")
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(true),
    )
}

/// Extract the session from the auth cookie.
///
/// # Errors
///
/// Returns [Error::InvalidCredentials] if the cookie is missing or its
/// contents are not a valid username.
pub(crate) fn get_session_from_cookies(jar: &PrivateCookieJar) -> Result<Session, Error> {
    match jar.get(COOKIE_USERNAME) {
        Some(cookie) => Username::new(cookie.value_trimmed())
            .map(|username| Session { username })
            .map_err(|_| Error::InvalidCredentials),
        None => Err(Error::InvalidCredentials),
    }
}

#[inline]
async fn auth_guard_internal(
    state: AppState,
    request: Request,
    next: Next,
    get_redirect: impl Fn() -> Response,
) -> Response {
    let (mut parts, body) = request.into_parts();

    let jar = match PrivateCookieJar::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(err) => {
            tracing::error!("Error getting cookie jar: {err:?}. Redirecting to log in page.");
            return get_redirect();
        }
    };

    let session = match get_session_from_cookies(&jar) {
        Ok(session) => session,
        Err(_) => return get_redirect(),
    };

    parts.extensions.insert(session);
    let request = Request::from_parts(parts, body);

    next.run(request).await
}

/// Middleware function that checks for a valid authorization cookie.
/// The session is placed into the request and then the request executed
/// normally if the cookie is valid, otherwise a redirect to the log-in page
/// is returned.
///
/// **Note**: Route handlers can use the function argument
/// `Extension(session): Extension<Session>` to receive the session.
pub async fn auth_guard(State(state): State<AppState>, request: Request, next: Next) -> Response {
    auth_guard_internal(state, request, next, || {
        Redirect::to(endpoints::LOG_IN_VIEW).into_response()
    })
    .await
}

/// Middleware function that checks for a valid authorization cookie.
/// The session is placed into the request and then the request executed
/// normally if the cookie is valid, otherwise an HTMX redirect to the log-in
/// page is returned.
///
/// **Note**: Route handlers can use the function argument
/// `Extension(session): Extension<Session>` to receive the session.
pub async fn auth_guard_hx(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    auth_guard_internal(state, request, next, || {
        (HxRedirect(endpoints::LOG_IN_VIEW.to_owned()), StatusCode::OK).into_response()
    })
    .await
}

#[cfg(test)]
mod credential_tests {
    use tempfile::tempdir;

    use crate::{Error, stores::JsonCredentialStore};

    use super::{authenticate, register};

    fn get_test_store() -> (tempfile::TempDir, JsonCredentialStore) {
        let data_dir = tempdir().unwrap();
        let store = JsonCredentialStore::new(data_dir.path().join("users.json"));

        (data_dir, store)
    }

    #[test]
    fn register_then_authenticate_round_trips() {
        let (_data_dir, store) = get_test_store();

        register(&store, "alice", "pw1").unwrap();

        assert!(authenticate(&store, "alice", "pw1"));
        assert!(!authenticate(&store, "alice", "pw2"));
    }

    #[test]
    fn register_duplicate_username_fails() {
        let (_data_dir, store) = get_test_store();

        register(&store, "alice", "pw1").unwrap();
        let result = register(&store, "alice", "pw2");

        assert_eq!(result, Err(Error::UsernameTaken("alice".to_string())));
        // The original credentials still work.
        assert!(authenticate(&store, "alice", "pw1"));
        assert!(!authenticate(&store, "alice", "pw2"));
    }

    #[test]
    fn register_rejects_invalid_usernames() {
        let (_data_dir, store) = get_test_store();

        let result = register(&store, "../alice", "pw1");

        assert_eq!(
            result,
            Err(Error::InvalidUsername("../alice".to_string()))
        );
    }

    #[test]
    fn authenticate_unknown_username_is_false() {
        let (_data_dir, store) = get_test_store();

        assert!(!authenticate(&store, "nobody", "pw1"));
    }

    #[test]
    fn authenticate_invalid_username_is_false() {
        let (_data_dir, store) = get_test_store();

        assert!(!authenticate(&store, "", "pw1"));
    }
}
