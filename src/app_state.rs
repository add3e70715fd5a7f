//! Implements a struct that holds the state of the web server.

use std::{path::Path, sync::Arc};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{
    auth::DEFAULT_COOKIE_DURATION,
    stores::{CsvLedgerStore, JsonCredentialStore},
};

/// The file name of the shared credential record under the data directory.
const CREDENTIAL_RECORD_FILE: &str = "users.json";

/// The state of the web server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,

    /// The shared credential record mapping usernames to password hashes.
    pub credentials: Arc<JsonCredentialStore>,

    /// The per-user transaction ledgers.
    pub ledgers: Arc<CsvLedgerStore>,
}

impl AppState {
    /// Create a new [AppState] with file-backed stores under `data_dir`.
    ///
    /// `data_dir` is created lazily on the first write, so pointing the app
    /// at a fresh directory just works.
    pub fn new(data_dir: &Path, cookie_secret: &str) -> Self {
        Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            credentials: Arc::new(JsonCredentialStore::new(
                data_dir.join(CREDENTIAL_RECORD_FILE),
            )),
            ledgers: Arc::new(CsvLedgerStore::new(data_dir.to_owned())),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Create a signing key for cookies from a `secret` string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}
