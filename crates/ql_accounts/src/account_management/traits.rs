//! Core traits for account management
//!
//! The authentication servers and the account database are
//! collaborators of [`AccountManager`](super::AccountManager);
//! these traits are the seams it talks to them through.

use async_trait::async_trait;

use super::errors::{MicrosoftErrorCode, MojangErrorCode, ProviderResult};
use super::types::*;
use ql_core::JsonFileError;

/// Client for the Mojang (Yggdrasil) authentication server.
///
/// Expected failures come back as [`ProviderError::Reported`](super::ProviderError::Reported),
/// anything else as [`ProviderError::Transport`](super::ProviderError::Transport).
#[async_trait]
pub trait MojangAuth: Send + Sync {
    /// Log in with a username (or email) and password.
    async fn authenticate(
        &self,
        username: &str,
        password: &SecureString,
        client_token: Option<&str>,
    ) -> ProviderResult<MojangSession, MojangErrorCode>;

    /// Check whether an access token is still usable.
    async fn validate(
        &self,
        access_token: &AccessToken,
        client_token: Option<&str>,
    ) -> ProviderResult<bool, MojangErrorCode>;

    /// Revoke an access token.
    async fn invalidate(
        &self,
        access_token: &AccessToken,
        client_token: Option<&str>,
    ) -> ProviderResult<(), MojangErrorCode>;

    /// Exchange an invalid access token for a fresh one.
    async fn refresh(
        &self,
        access_token: &AccessToken,
        client_token: Option<&str>,
    ) -> ProviderResult<MojangSession, MojangErrorCode>;
}

/// Client for the Microsoft -> Xbox Live -> game services login chain.
#[async_trait]
pub trait MicrosoftAuth: Send + Sync {
    /// Exchange the authorization code from the browser login.
    async fn exchange_entry_code(
        &self,
        code: &str,
    ) -> ProviderResult<MicrosoftToken, MicrosoftErrorCode>;

    /// Mint a new Microsoft access token from a refresh token.
    async fn exchange_refresh_token(
        &self,
        refresh_token: &AccessToken,
    ) -> ProviderResult<MicrosoftToken, MicrosoftErrorCode>;

    async fn get_xbl_token(
        &self,
        ms_access_token: &AccessToken,
    ) -> ProviderResult<XblToken, MicrosoftErrorCode>;

    async fn get_xsts_token(&self, xbl: &XblToken)
        -> ProviderResult<XstsToken, MicrosoftErrorCode>;

    async fn get_game_token(
        &self,
        xsts: &XstsToken,
    ) -> ProviderResult<GameToken, MicrosoftErrorCode>;

    async fn get_profile(
        &self,
        game_token: &AccessToken,
    ) -> ProviderResult<GameProfile, MicrosoftErrorCode>;
}

/// Persistent account database.
///
/// Holds every account, which one is selected and the client
/// token shared by all Mojang sessions. Mutations only touch
/// memory; nothing reaches disk until [`AccountStore::persist`].
#[async_trait]
pub trait AccountStore: Send + Sync {
    fn get(&self, uuid: &str) -> Option<&Account>;

    /// All accounts, ordered by UUID.
    fn accounts(&self) -> Vec<&Account>;

    /// Inserts or replaces an account (by UUID) and selects it.
    fn upsert(&mut self, account: Account) -> Account;

    /// Removes an account. If it was selected, the first remaining
    /// account becomes selected (or none, if the store is empty).
    fn remove(&mut self, uuid: &str) -> Option<Account>;

    fn selected(&self) -> Option<&Account>;

    /// Returns `false` (and keeps the old selection) if `uuid` is unknown.
    fn set_selected(&mut self, uuid: &str) -> bool;

    fn client_token(&self) -> Option<&str>;

    fn set_client_token(&mut self, token: String);

    /// Writes the current state to durable storage.
    async fn persist(&self) -> Result<(), JsonFileError>;
}

/// Source of the current time, in Unix milliseconds.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}
