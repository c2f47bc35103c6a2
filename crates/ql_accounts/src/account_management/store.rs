//! [`AccountStore`] implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use ql_core::{err, file_utils, info, IntoIoError, IntoJsonError, IoError, JsonFileError};

use super::{traits::AccountStore, types::Account};

pub const ACCOUNTS_FILE: &str = "accounts.json";

/// The account database, as stored in `accounts.json`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDatabase {
    /// Shared by every Mojang session. Created on the first login.
    pub client_token: Option<String>,
    /// UUID of the selected account.
    pub selected_account: Option<String>,
    #[serde(default)]
    pub accounts: BTreeMap<String, Account>,
}

impl AccountDatabase {
    fn get(&self, uuid: &str) -> Option<&Account> {
        self.accounts.get(uuid)
    }

    fn list(&self) -> Vec<&Account> {
        self.accounts.values().collect()
    }

    fn upsert(&mut self, account: Account) -> Account {
        self.selected_account = Some(account.uuid.clone());
        self.accounts.insert(account.uuid.clone(), account.clone());
        account
    }

    fn remove(&mut self, uuid: &str) -> Option<Account> {
        let removed = self.accounts.remove(uuid)?;
        if self.selected_account.as_deref() == Some(uuid) {
            self.selected_account = self.accounts.keys().next().cloned();
        }
        Some(removed)
    }

    fn selected(&self) -> Option<&Account> {
        self.selected_account
            .as_deref()
            .and_then(|uuid| self.accounts.get(uuid))
    }

    fn set_selected(&mut self, uuid: &str) -> bool {
        if !self.accounts.contains_key(uuid) {
            return false;
        }
        self.selected_account = Some(uuid.to_owned());
        true
    }

    /// Points a dangling or missing selection at the first account.
    fn fix_selection(&mut self) {
        if self.selected().is_none() {
            self.selected_account = self.accounts.keys().next().cloned();
        }
    }
}

/// Keeps accounts in memory only.
///
/// Useful for tests and for embedding the account layer somewhere
/// that persists state on its own.
#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    db: AccountDatabase,
    persist_count: Arc<AtomicUsize>,
}

impl MemoryAccountStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_database(mut db: AccountDatabase) -> Self {
        db.fix_selection();
        Self {
            db,
            persist_count: Arc::default(),
        }
    }

    /// How many times [`AccountStore::persist`] was called.
    #[must_use]
    pub fn persist_count(&self) -> usize {
        self.persist_count.load(Ordering::SeqCst)
    }

    /// Shared handle to the persist counter, still readable
    /// after the store has been handed to an `AccountManager`.
    #[must_use]
    pub fn persist_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.persist_count)
    }

    #[must_use]
    pub fn database(&self) -> &AccountDatabase {
        &self.db
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    fn get(&self, uuid: &str) -> Option<&Account> {
        self.db.get(uuid)
    }

    fn accounts(&self) -> Vec<&Account> {
        self.db.list()
    }

    fn upsert(&mut self, account: Account) -> Account {
        self.db.upsert(account)
    }

    fn remove(&mut self, uuid: &str) -> Option<Account> {
        self.db.remove(uuid)
    }

    fn selected(&self) -> Option<&Account> {
        self.db.selected()
    }

    fn set_selected(&mut self, uuid: &str) -> bool {
        self.db.set_selected(uuid)
    }

    fn client_token(&self) -> Option<&str> {
        self.db.client_token.as_deref()
    }

    fn set_client_token(&mut self, token: String) {
        self.db.client_token = Some(token);
    }

    async fn persist(&self) -> Result<(), JsonFileError> {
        self.persist_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Stores accounts in a JSON file,
/// `QuantumLauncher/accounts.json` by default.
#[derive(Debug)]
pub struct JsonAccountStore {
    path: PathBuf,
    db: AccountDatabase,
}

impl JsonAccountStore {
    /// Loads the store from the launcher directory.
    ///
    /// # Errors
    /// - if the launcher directory couldn't be found or created
    /// - see [`JsonAccountStore::load`]
    pub fn load_default() -> Result<Self, JsonFileError> {
        let dir = file_utils::get_launcher_dir()?;
        Self::load(dir.join(ACCOUNTS_FILE))
    }

    /// Loads the store from `path`.
    ///
    /// This is designed to *not* fail fast: a missing file
    /// creates an empty store, and a corrupted one is backed up
    /// to `<path>.bak` and replaced (with an error log message).
    ///
    /// # Errors
    /// - if the file couldn't be read or written (permissions, etc.)
    /// - if a corrupted file couldn't be backed up, in which
    ///   case it is left as it was
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, JsonFileError> {
        let path = path.into();
        if !path.exists() {
            return Self::create(path);
        }

        let text = std::fs::read_to_string(&path).path(&path)?;
        let mut db: AccountDatabase = match serde_json::from_str(&text).json(text) {
            Ok(db) => db,
            Err(error) => {
                err!("Invalid account database! This may be a sign of corruption!\nError: {error}");
                let backup = backup_path(&path);
                if let Err(copy_err) = std::fs::copy(&path, &backup) {
                    err!(
                        "Could not back up the account database to {}, leaving it untouched: {copy_err}",
                        backup.display()
                    );
                    return Err(IoError {
                        error: copy_err,
                        path: backup,
                    }
                    .into());
                }
                return Self::create(path);
            }
        };
        db.fix_selection();

        info!(
            "Loaded {} account(s) from {}",
            db.accounts.len(),
            path.display()
        );
        Ok(Self { path, db })
    }

    fn create(path: PathBuf) -> Result<Self, JsonFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).path(parent)?;
        }
        let db = AccountDatabase::default();
        let text = serde_json::to_string_pretty(&db).json_to()?;
        std::fs::write(&path, text.as_bytes()).path(&path)?;
        Ok(Self { path, db })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

#[async_trait]
impl AccountStore for JsonAccountStore {
    fn get(&self, uuid: &str) -> Option<&Account> {
        self.db.get(uuid)
    }

    fn accounts(&self) -> Vec<&Account> {
        self.db.list()
    }

    fn upsert(&mut self, account: Account) -> Account {
        self.db.upsert(account)
    }

    fn remove(&mut self, uuid: &str) -> Option<Account> {
        self.db.remove(uuid)
    }

    fn selected(&self) -> Option<&Account> {
        self.db.selected()
    }

    fn set_selected(&mut self, uuid: &str) -> bool {
        self.db.set_selected(uuid)
    }

    fn client_token(&self) -> Option<&str> {
        self.db.client_token.as_deref()
    }

    fn set_client_token(&mut self, token: String) {
        self.db.client_token = Some(token);
    }

    async fn persist(&self) -> Result<(), JsonFileError> {
        let text = serde_json::to_string_pretty(&self.db).json_to()?;
        tokio::fs::write(&self.path, text.as_bytes())
            .await
            .path(&self.path)?;
        Ok(())
    }
}
