//! Offline account example
//!
//! Creates a few offline accounts in a temporary `accounts.json`,
//! validates the selected one and removes it again.
//! Offline accounts never talk to a server, so both
//! authentication clients here refuse every request.

use async_trait::async_trait;
use std::sync::Arc;

use ql_accounts::{
    AccessToken, AccountManager, AccountStore, GameProfile, GameToken, JsonAccountStore,
    MicrosoftAuth, MicrosoftErrorCode, MicrosoftToken, MojangAuth, MojangErrorCode,
    MojangSession, ProviderError, ProviderResult, SecureString, XblToken, XstsToken,
    ACCOUNTS_FILE,
};

struct NoNetwork;

fn refuse<T, C>() -> ProviderResult<T, C> {
    Err(ProviderError::Transport("network disabled".into()))
}

#[async_trait]
impl MojangAuth for NoNetwork {
    async fn authenticate(
        &self,
        _: &str,
        _: &SecureString,
        _: Option<&str>,
    ) -> ProviderResult<MojangSession, MojangErrorCode> {
        refuse()
    }

    async fn validate(
        &self,
        _: &AccessToken,
        _: Option<&str>,
    ) -> ProviderResult<bool, MojangErrorCode> {
        refuse()
    }

    async fn invalidate(
        &self,
        _: &AccessToken,
        _: Option<&str>,
    ) -> ProviderResult<(), MojangErrorCode> {
        refuse()
    }

    async fn refresh(
        &self,
        _: &AccessToken,
        _: Option<&str>,
    ) -> ProviderResult<MojangSession, MojangErrorCode> {
        refuse()
    }
}

#[async_trait]
impl MicrosoftAuth for NoNetwork {
    async fn exchange_entry_code(
        &self,
        _: &str,
    ) -> ProviderResult<MicrosoftToken, MicrosoftErrorCode> {
        refuse()
    }

    async fn exchange_refresh_token(
        &self,
        _: &AccessToken,
    ) -> ProviderResult<MicrosoftToken, MicrosoftErrorCode> {
        refuse()
    }

    async fn get_xbl_token(&self, _: &AccessToken) -> ProviderResult<XblToken, MicrosoftErrorCode> {
        refuse()
    }

    async fn get_xsts_token(&self, _: &XblToken) -> ProviderResult<XstsToken, MicrosoftErrorCode> {
        refuse()
    }

    async fn get_game_token(&self, _: &XstsToken) -> ProviderResult<GameToken, MicrosoftErrorCode> {
        refuse()
    }

    async fn get_profile(&self, _: &AccessToken) -> ProviderResult<GameProfile, MicrosoftErrorCode> {
        refuse()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let store = JsonAccountStore::load(dir.path().join(ACCOUNTS_FILE))?;
    let client = Arc::new(NoNetwork);
    let mut manager = AccountManager::new(Box::new(store), client.clone(), client);

    for name in ["TestPlayer", "AnotherPlayer", "not valid!"] {
        match manager.add_offline_account(name).await {
            Ok(account) => println!("Added {} ({})", account.display_username(), account.uuid),
            Err(error) => println!("{}", error.displayable()),
        }
    }

    println!("Selected account is valid: {}", manager.validate_selected().await);

    if let Some(uuid) = manager.selected_account().map(|n| n.uuid.clone()) {
        manager.remove_account(&uuid).await?;
    }
    for account in manager.store().accounts() {
        println!("Remaining: {}", account.display_username());
    }

    println!(
        "\n{}",
        std::fs::read_to_string(dir.path().join(ACCOUNTS_FILE))?
    );
    Ok(())
}
