//! Defines the credential store trait and an implementation backed by a
//! single JSON record.

use std::{
    collections::HashMap,
    fs, io,
    path::PathBuf,
    sync::Mutex,
};

use crate::{
    Error,
    password::PasswordHash,
    user::{User, Username},
};

/// Handles the creation and retrieval of user credentials.
pub trait CredentialStore {
    /// Get the user with the given username, or `None` if no such user has
    /// registered.
    fn get(&self, username: &Username) -> Result<Option<User>, Error>;

    /// Insert a new user and persist the full store immediately.
    ///
    /// Returns [Error::UsernameTaken] if the username is already present.
    fn put(&self, user: User) -> Result<(), Error>;
}

/// A credential store persisted as one JSON object mapping username to
/// password hash, covering all users.
///
/// The record is read in full on every operation and written in full after
/// any mutation, there is no in-memory caching across requests. A missing or
/// corrupt record is treated as an empty store rather than an error. The
/// read-modify-write cycle in [CredentialStore::put] runs behind a write
/// lock so concurrent registrations within the process cannot clobber each
/// other.
#[derive(Debug)]
pub struct JsonCredentialStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonCredentialStore {
    /// Create a credential store backed by the JSON record at `path`.
    ///
    /// The file is not created until the first user registers.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    /// Read the full username to password hash mapping.
    ///
    /// A missing file is an empty store. An unreadable or corrupt file is
    /// also treated as empty, but logged since it may indicate data loss.
    fn read_record(&self) -> HashMap<String, String> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return HashMap::new(),
            Err(error) => {
                tracing::warn!(
                    "treating unreadable credential record {:?} as empty: {error}",
                    self.path
                );
                return HashMap::new();
            }
        };

        match serde_json::from_str(&text) {
            Ok(record) => record,
            Err(error) => {
                tracing::warn!(
                    "treating corrupt credential record {:?} as empty: {error}",
                    self.path
                );
                HashMap::new()
            }
        }
    }

    /// Overwrite the backing record with the given mapping.
    fn write_record(&self, record: &HashMap<String, String>) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|error| Error::StorageError(error.to_string()))?;
        }

        let text = serde_json::to_string_pretty(record)
            .map_err(|error| Error::SerializationError(error.to_string()))?;

        fs::write(&self.path, text).map_err(|error| Error::StorageError(error.to_string()))
    }
}

impl CredentialStore for JsonCredentialStore {
    fn get(&self, username: &Username) -> Result<Option<User>, Error> {
        let user = self.read_record().get(username.as_str()).map(|hash| {
            User::new(username.clone(), PasswordHash::new_unchecked(hash))
        });

        Ok(user)
    }

    /// Create and insert a new user into the backing record.
    ///
    /// # Panics
    ///
    /// Panics if the write lock is poisoned.
    ///
    /// # Errors
    ///
    /// Returns [Error::UsernameTaken] if the username is already registered,
    /// or [Error::StorageError] if the record could not be written.
    fn put(&self, user: User) -> Result<(), Error> {
        let _guard = self.write_lock.lock().unwrap();

        let mut record = self.read_record();

        if record.contains_key(user.username.as_str()) {
            return Err(Error::UsernameTaken(user.username.to_string()));
        }

        record.insert(
            user.username.to_string(),
            user.password_hash.as_ref().to_string(),
        );

        self.write_record(&record)
    }
}

#[cfg(test)]
mod json_credential_store_tests {
    use std::fs;

    use tempfile::tempdir;

    use crate::{
        Error,
        password::PasswordHash,
        user::{User, Username},
    };

    use super::{CredentialStore, JsonCredentialStore};

    const TEST_COST: u32 = 4;

    fn new_user(username: &str, password: &str) -> User {
        User::new(
            Username::new(username).unwrap(),
            PasswordHash::from_raw_password(password, TEST_COST).unwrap(),
        )
    }

    #[test]
    fn get_returns_none_for_missing_record() {
        let data_dir = tempdir().unwrap();
        let store = JsonCredentialStore::new(data_dir.path().join("users.json"));

        let user = store.get(&Username::new("alice").unwrap()).unwrap();

        assert_eq!(user, None);
    }

    #[test]
    fn put_then_get_round_trips_the_user() {
        let data_dir = tempdir().unwrap();
        let store = JsonCredentialStore::new(data_dir.path().join("users.json"));
        let user = new_user("alice", "correcthorsebatterystaple");

        store.put(user.clone()).unwrap();
        let got = store.get(&user.username).unwrap();

        assert_eq!(got, Some(user));
    }

    #[test]
    fn put_duplicate_username_fails_and_keeps_original_hash() {
        let data_dir = tempdir().unwrap();
        let store = JsonCredentialStore::new(data_dir.path().join("users.json"));
        let first = new_user("alice", "pw1");

        store.put(first.clone()).unwrap();
        let result = store.put(new_user("alice", "pw2"));

        assert_eq!(result, Err(Error::UsernameTaken("alice".to_string())));

        let stored = store.get(&first.username).unwrap().unwrap();
        assert_eq!(stored.password_hash, first.password_hash);
    }

    #[test]
    fn corrupt_record_is_treated_as_empty() {
        let data_dir = tempdir().unwrap();
        let path = data_dir.path().join("users.json");
        fs::write(&path, "{ not json").unwrap();
        let store = JsonCredentialStore::new(path);

        let user = store.get(&Username::new("alice").unwrap()).unwrap();

        assert_eq!(user, None);
    }

    #[test]
    fn put_succeeds_over_corrupt_record() {
        let data_dir = tempdir().unwrap();
        let path = data_dir.path().join("users.json");
        fs::write(&path, "[1, 2, 3]").unwrap();
        let store = JsonCredentialStore::new(path);
        let user = new_user("bob", "hunter2hunter2");

        store.put(user.clone()).unwrap();

        assert_eq!(store.get(&user.username).unwrap(), Some(user));
    }

    #[test]
    fn users_are_stored_in_a_single_shared_record() {
        let data_dir = tempdir().unwrap();
        let path = data_dir.path().join("users.json");
        let store = JsonCredentialStore::new(path.clone());

        store.put(new_user("alice", "pw1")).unwrap();
        store.put(new_user("bob", "pw2")).unwrap();

        let record: std::collections::HashMap<String, String> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(record.len(), 2);
        assert!(record.contains_key("alice"));
        assert!(record.contains_key("bob"));
    }
}
