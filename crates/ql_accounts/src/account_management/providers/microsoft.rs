//! Microsoft account login chain.
//!
//! Microsoft token -> Xbox Live token -> XSTS token -> game token -> profile.
//! Every step is a remote call; the chain stops at the first step
//! that fails and reports that step's error.

use ql_core::{err, pt};

use crate::account_management::{
    errors::{MicrosoftErrorCode, ProviderError, ProviderResult},
    traits::MicrosoftAuth,
    types::{AccessToken, GameProfile, GameToken, MicrosoftToken, XblToken, XstsToken},
};

/// Game tokens are treated as expired this many seconds early.
pub const EXPIRY_MARGIN_SECS: i64 = 10;

/// Where the login chain starts.
#[derive(Debug, Clone, Copy)]
pub enum AuthMode<'a> {
    /// New account: exchange the authorization code from the browser.
    Full(&'a str),
    /// The Microsoft session expired: use the refresh token.
    MsRefresh(&'a AccessToken),
    /// Only the game token expired: reuse this Microsoft access token
    /// and skip the Microsoft token exchange.
    McRefresh(&'a AccessToken),
}

/// Everything obtained by a successful run of the chain.
#[derive(Debug, Clone)]
pub struct MicrosoftAuthResult {
    /// `None` in [`AuthMode::McRefresh`], where no new token was requested.
    pub access_token: Option<MicrosoftToken>,
    /// The Microsoft access token the rest of the chain used.
    pub access_token_raw: AccessToken,
    pub xbl: XblToken,
    pub xsts: XstsToken,
    pub game_token: GameToken,
    pub profile: GameProfile,
}

/// Unix milliseconds at which something valid for `expires_in_secs`
/// (starting at `now_ms`) should be considered expired.
///
/// `expires_in_secs` comes from the server, so the result saturates
/// instead of overflowing.
#[must_use]
pub fn expiry_date(now_ms: i64, expires_in_secs: i64) -> i64 {
    expires_in_secs
        .saturating_sub(EXPIRY_MARGIN_SECS)
        .saturating_mul(1000)
        .saturating_add(now_ms)
}

/// Runs the Microsoft login chain.
///
/// # Errors
/// The [`MicrosoftErrorCode`] of the first step that failed,
/// or [`MicrosoftErrorCode::Unknown`] if a request failed
/// without an answer from the server.
pub async fn microsoft_auth_flow(
    client: &dyn MicrosoftAuth,
    mode: AuthMode<'_>,
) -> Result<MicrosoftAuthResult, MicrosoftErrorCode> {
    let (access_token, access_token_raw) = match mode {
        AuthMode::Full(code) => {
            pt!("Exchanging Microsoft authorization code");
            let token = check("Microsoft token", client.exchange_entry_code(code).await)?;
            let raw = token.access_token.clone();
            (Some(token), raw)
        }
        AuthMode::MsRefresh(refresh_token) => {
            pt!("Refreshing Microsoft token");
            let token = check(
                "Microsoft token refresh",
                client.exchange_refresh_token(refresh_token).await,
            )?;
            let raw = token.access_token.clone();
            (Some(token), raw)
        }
        AuthMode::McRefresh(ms_access_token) => (None, ms_access_token.clone()),
    };

    pt!("Getting Xbox Live token");
    let xbl = check("Xbox Live", client.get_xbl_token(&access_token_raw).await)?;
    pt!("Getting XSTS token");
    let xsts = check("XSTS", client.get_xsts_token(&xbl).await)?;
    pt!("Getting game token");
    let game_token = check("game token", client.get_game_token(&xsts).await)?;
    pt!("Getting game profile");
    let profile = check(
        "game profile",
        client.get_profile(&game_token.access_token).await,
    )?;

    Ok(MicrosoftAuthResult {
        access_token,
        access_token_raw,
        xbl,
        xsts,
        game_token,
        profile,
    })
}

fn check<T>(
    step: &str,
    result: ProviderResult<T, MicrosoftErrorCode>,
) -> Result<T, MicrosoftErrorCode> {
    result.map_err(|error| match error {
        ProviderError::Reported(code) => {
            err!("Microsoft login failed at step ({step}): {code}");
            code
        }
        ProviderError::Transport(error) => {
            err!("Microsoft login failed at step ({step}), request error: {error}");
            MicrosoftErrorCode::Unknown
        }
    })
}
