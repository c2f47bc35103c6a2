//! Main account manager implementation

use std::sync::Arc;

use ql_core::{err, info, pt};

use crate::account_management::{
    errors::*,
    providers::*,
    traits::{AccountStore, Clock, MicrosoftAuth, MojangAuth, SystemClock},
    types::*,
};

/// Adds, removes and validates accounts.
///
/// Every mutating operation saves the store before returning.
/// Operations take `&mut self`, so two of them can never overlap.
pub struct AccountManager {
    store: Box<dyn AccountStore>,
    mojang: Arc<dyn MojangAuth>,
    microsoft: Arc<dyn MicrosoftAuth>,
    clock: Arc<dyn Clock>,
}

impl AccountManager {
    pub fn new(
        store: Box<dyn AccountStore>,
        mojang: Arc<dyn MojangAuth>,
        microsoft: Arc<dyn MicrosoftAuth>,
    ) -> Self {
        Self {
            store,
            mojang,
            microsoft,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the system clock used for token expiry checks.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn store(&self) -> &dyn AccountStore {
        self.store.as_ref()
    }

    #[must_use]
    pub fn accounts(&self) -> Vec<&Account> {
        self.store.accounts()
    }

    #[must_use]
    pub fn selected_account(&self) -> Option<&Account> {
        self.store.selected()
    }

    /// # Errors
    /// - [`AccountError::AccountNotFound`] if there's no such account
    /// - [`AccountError::Store`] if the accounts couldn't be saved
    pub async fn select_account(&mut self, uuid: &str) -> Result<()> {
        if !self.store.set_selected(uuid) {
            return Err(AccountError::AccountNotFound(uuid.to_owned()));
        }
        self.store.persist().await?;
        Ok(())
    }

    /// Logs into a Mojang account and stores it.
    ///
    /// # Errors
    /// - [`MojangErrorCode::NotPaid`] if the account doesn't own the game
    /// - the error reported by the server
    /// - [`MojangErrorCode::Unknown`] if the server couldn't be reached
    /// - [`AccountError::Store`] if the accounts couldn't be saved
    pub async fn add_mojang_account(
        &mut self,
        username: &str,
        password: &SecureString,
    ) -> Result<Account> {
        info!("Logging into Mojang... ({username})");
        let client_token = self.store.client_token().map(str::to_owned);
        let session = self
            .mojang
            .authenticate(username, password, client_token.as_deref())
            .await
            .map_err(|e| AccountError::Mojang(mojang_error("Error while logging in", e)))?;

        let Some(profile) = session.selected_profile else {
            err!("Mojang login failed: account {username} doesn't own the game");
            return Err(AccountError::Mojang(MojangErrorCode::NotPaid));
        };

        let account = self.store.upsert(Account {
            uuid: profile.id,
            username: username.to_owned(),
            display_name: profile.name,
            access_token: session.access_token,
            kind: AccountKind::Mojang,
        });
        if self.store.client_token().is_none() {
            self.store.set_client_token(session.client_token);
        }
        self.store.persist().await?;

        info!("Added Mojang account {} ({})", account.display_name, account.uuid);
        Ok(account)
    }

    /// Creates an offline account. Never touches the network.
    ///
    /// # Errors
    /// - [`AccountError::InvalidUsername`] unless `username` is
    ///   1 to 16 letters, digits or underscores
    /// - [`AccountError::Store`] if the accounts couldn't be saved
    pub async fn add_offline_account(&mut self, username: &str) -> Result<Account> {
        let username = OfflineUsername::new(username).inspect_err(|_| {
            err!("Offline login failed: invalid username format ({username:?})");
        })?;

        let account = self.store.upsert(Account {
            uuid: username.uuid(),
            username: username.as_str().to_owned(),
            display_name: username.as_str().to_owned(),
            access_token: AccessToken::offline(),
            kind: AccountKind::Offline,
        });
        if self.store.client_token().is_none() {
            self.store.set_client_token(offline_uuid(CLIENT_TOKEN_SEED));
        }
        self.store.persist().await?;

        info!("Added offline account {} ({})", account.display_name, account.uuid);
        Ok(account)
    }

    /// Completes a Microsoft login with the authorization code
    /// from the browser, and stores the account.
    ///
    /// # Errors
    /// - the error of the first login step that failed
    /// - [`AccountError::Store`] if the accounts couldn't be saved
    pub async fn add_microsoft_account(&mut self, auth_code: &str) -> Result<Account> {
        info!("Logging into Microsoft...");
        let auth = microsoft_auth_flow(self.microsoft.as_ref(), AuthMode::Full(auth_code))
            .await
            .map_err(AccountError::Microsoft)?;
        let Some(ms_token) = auth.access_token else {
            err!("Microsoft login returned no Microsoft token");
            return Err(AccountError::Microsoft(MicrosoftErrorCode::Unknown));
        };

        let now = self.clock.now_ms();
        let account = self.store.upsert(Account {
            uuid: auth.profile.id,
            username: auth.profile.name.clone(),
            display_name: auth.profile.name,
            access_token: auth.game_token.access_token,
            kind: AccountKind::Microsoft {
                expires_at: expiry_date(now, auth.game_token.expires_in),
                microsoft: MicrosoftSession {
                    access_token: ms_token.access_token,
                    refresh_token: ms_token.refresh_token,
                    expires_at: expiry_date(now, ms_token.expires_in),
                },
            },
        });
        self.store.persist().await?;

        info!("Added Microsoft account {} ({})", account.display_name, account.uuid);
        Ok(account)
    }

    /// Removes any kind of account.
    ///
    /// # Errors
    /// See [`AccountManager::remove_mojang_account`] and
    /// [`AccountManager::remove_microsoft_account`].
    pub async fn remove_account(&mut self, uuid: &str) -> Result<()> {
        match self.get_account(uuid)?.provider() {
            AccountProvider::Mojang | AccountProvider::Offline => {
                self.remove_mojang_account(uuid).await
            }
            AccountProvider::Microsoft => self.remove_microsoft_account(uuid).await,
        }
    }

    /// Removes a Mojang or offline account.
    ///
    /// Mojang sessions are invalidated on the server first, and the
    /// account is only removed locally once that succeeded.
    ///
    /// # Errors
    /// - [`AccountError::AccountNotFound`] if there's no such account
    /// - [`AccountError::UnsupportedProvider`] for Microsoft accounts
    /// - the error reported by the server while invalidating
    /// - [`AccountError::Store`] if the accounts couldn't be saved
    pub async fn remove_mojang_account(&mut self, uuid: &str) -> Result<()> {
        let account = self.get_account(uuid)?;
        match account.kind {
            AccountKind::Offline => {}
            AccountKind::Mojang => {
                let client_token = self.store.client_token().map(str::to_owned);
                self.mojang
                    .invalidate(&account.access_token, client_token.as_deref())
                    .await
                    .map_err(|e| {
                        AccountError::Mojang(mojang_error("Error while removing account", e))
                    })?;
            }
            AccountKind::Microsoft { .. } => {
                return Err(AccountError::UnsupportedProvider(AccountProvider::Microsoft));
            }
        }

        self.store.remove(uuid);
        self.store.persist().await?;
        info!("Removed account {} ({uuid})", account.display_name);
        Ok(())
    }

    /// Removes a Microsoft account locally.
    ///
    /// Signing out of Microsoft in the browser is up to the caller.
    ///
    /// # Errors
    /// - [`AccountError::AccountNotFound`] if there's no such account
    /// - [`AccountError::UnsupportedProvider`] for other kinds of accounts
    /// - [`AccountError::Store`] if the accounts couldn't be saved
    pub async fn remove_microsoft_account(&mut self, uuid: &str) -> Result<()> {
        let account = self.get_account(uuid)?;
        if account.provider() != AccountProvider::Microsoft {
            return Err(AccountError::UnsupportedProvider(account.provider()));
        }

        self.store.remove(uuid);
        self.store.persist().await?;
        info!("Removed account {} ({uuid})", account.display_name);
        Ok(())
    }

    /// Makes sure the selected account can be used to play,
    /// refreshing its tokens if needed.
    ///
    /// Returns `false` if the user has to log in again
    /// (or if no account is selected). Errors are logged, not returned.
    pub async fn validate_selected(&mut self) -> bool {
        let Some(account) = self.store.selected().cloned() else {
            err!("Can't validate account: no account selected");
            return false;
        };

        match account.kind.clone() {
            AccountKind::Offline => true,
            AccountKind::Mojang => self.validate_mojang(account).await,
            AccountKind::Microsoft {
                expires_at,
                microsoft,
            } => self.validate_microsoft(account, expires_at, microsoft).await,
        }
    }

    async fn validate_mojang(&mut self, mut account: Account) -> bool {
        let client_token = self.store.client_token().map(str::to_owned);
        let is_valid = match self
            .mojang
            .validate(&account.access_token, client_token.as_deref())
            .await
        {
            Ok(is_valid) => is_valid,
            Err(e) => {
                mojang_error("Error while validating selected profile", e);
                return false;
            }
        };
        if is_valid {
            info!("Account access token validated.");
            return true;
        }

        pt!("Access token is invalid, refreshing...");
        match self
            .mojang
            .refresh(&account.access_token, client_token.as_deref())
            .await
        {
            Ok(session) => {
                account.access_token = session.access_token;
                self.save_refreshed(account).await;
                info!("Account access token validated.");
                true
            }
            Err(e) => {
                mojang_error("Error while refreshing selected profile", e);
                info!("Account access token is invalid.");
                false
            }
        }
    }

    async fn validate_microsoft(
        &mut self,
        mut account: Account,
        expires_at: i64,
        microsoft: MicrosoftSession,
    ) -> bool {
        let now = self.clock.now_ms();
        if now < expires_at {
            return true;
        }

        if now >= microsoft.expires_at {
            pt!("Microsoft session expired, logging in again with refresh token");
            let auth = match microsoft_auth_flow(
                self.microsoft.as_ref(),
                AuthMode::MsRefresh(&microsoft.refresh_token),
            )
            .await
            {
                Ok(auth) => auth,
                Err(code) => {
                    err!("Could not refresh Microsoft account {}: {code}", account.uuid);
                    return false;
                }
            };
            let Some(ms_token) = auth.access_token else {
                err!("Microsoft refresh returned no Microsoft token");
                return false;
            };
            account.access_token = auth.game_token.access_token;
            account.kind = AccountKind::Microsoft {
                expires_at: expiry_date(now, auth.game_token.expires_in),
                microsoft: MicrosoftSession {
                    access_token: ms_token.access_token,
                    refresh_token: ms_token.refresh_token,
                    expires_at: expiry_date(now, ms_token.expires_in),
                },
            };
        } else {
            pt!("Game token expired, refreshing with current Microsoft session");
            let auth = match microsoft_auth_flow(
                self.microsoft.as_ref(),
                AuthMode::McRefresh(&microsoft.access_token),
            )
            .await
            {
                Ok(auth) => auth,
                Err(code) => {
                    err!("Could not refresh game token of {}: {code}", account.uuid);
                    return false;
                }
            };
            account.access_token = auth.game_token.access_token;
            account.kind = AccountKind::Microsoft {
                expires_at: expiry_date(now, auth.game_token.expires_in),
                microsoft,
            };
        }

        self.save_refreshed(account).await;
        info!("Account access token validated.");
        true
    }

    fn get_account(&self, uuid: &str) -> Result<Account> {
        self.store
            .get(uuid)
            .cloned()
            .ok_or_else(|| AccountError::AccountNotFound(uuid.to_owned()))
    }

    /// Stores refreshed tokens. The refresh itself succeeded, so a
    /// failed save is only logged: the tokens stay usable in memory.
    async fn save_refreshed(&mut self, account: Account) {
        self.store.upsert(account);
        if let Err(error) = self.store.persist().await {
            err!("Could not save refreshed account: {error}");
        }
    }
}

/// Logs a failed Mojang call and returns the error code to report.
fn mojang_error(context: &str, error: ProviderError<MojangErrorCode>) -> MojangErrorCode {
    match error {
        ProviderError::Reported(code) => {
            err!("{context}: {code}");
            code
        }
        ProviderError::Transport(error) => {
            err!("{context}, request failed: {error}");
            MojangErrorCode::Unknown
        }
    }
}
