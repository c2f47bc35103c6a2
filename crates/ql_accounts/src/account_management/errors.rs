//! Error types for account management, and the user-facing
//! messages each of them resolves to.

use serde::Serialize;
use std::fmt::Display;

use ql_core::JsonFileError;

use super::types::AccountProvider;

/// Boxed error from a provider's HTTP client or parser.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A failed call to an authentication server.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError<C> {
    /// The server answered with a known error.
    #[error("server reported {0}")]
    Reported(C),
    /// The request never produced an answer (network, parsing, ...).
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),
}

pub type ProviderResult<T, C> = std::result::Result<T, ProviderError<C>>;

/// A title and description ready to be shown in an error dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayableError {
    pub title: String,
    pub description: String,
}

impl DisplayableError {
    fn new(title: &str, description: &str) -> Self {
        Self {
            title: title.to_owned(),
            description: description.to_owned(),
        }
    }
}

impl Display for DisplayableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}

/// Errors reported by the Mojang (Yggdrasil) authentication server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MojangErrorCode {
    MethodNotAllowed,
    NotFound,
    UserMigrated,
    InvalidCredentials,
    RateLimit,
    InvalidToken,
    AccessTokenHasProfile,
    CredentialsMissing,
    InvalidSaltVersion,
    UnsupportedMediaType,
    Gone,
    Unreachable,
    /// The account doesn't own the game.
    NotPaid,
    Unknown,
}

impl MojangErrorCode {
    pub const ALL: &[Self] = &[
        Self::MethodNotAllowed,
        Self::NotFound,
        Self::UserMigrated,
        Self::InvalidCredentials,
        Self::RateLimit,
        Self::InvalidToken,
        Self::AccessTokenHasProfile,
        Self::CredentialsMissing,
        Self::InvalidSaltVersion,
        Self::UnsupportedMediaType,
        Self::Gone,
        Self::Unreachable,
        Self::NotPaid,
        Self::Unknown,
    ];

    #[must_use]
    pub fn displayable(self) -> DisplayableError {
        let (title, description) = match self {
            Self::MethodNotAllowed => (
                "Internal Error: Method Not Allowed",
                "Method not allowed. Please report this error.",
            ),
            Self::NotFound => (
                "Internal Error: Not Found",
                "The authentication endpoint was not found. Please report this issue.",
            ),
            Self::UserMigrated => (
                "Error During Login: Account Migrated",
                "You've attempted to login with a migrated account. Try again using the account email as the username.",
            ),
            Self::InvalidCredentials => (
                "Error During Login: Invalid Credentials",
                "The email or password you've entered is incorrect. Please try again.",
            ),
            Self::RateLimit => (
                "Error During Login: Too Many Attempts",
                "There have been too many login attempts with this account recently. Please try again later.",
            ),
            Self::InvalidToken => (
                "Error During Login: Invalid Token",
                "The access token is invalid.",
            ),
            Self::AccessTokenHasProfile => (
                "Error During Login: Token Has Profile",
                "Access token already has a profile assigned. Selecting profiles is not implemented yet.",
            ),
            Self::CredentialsMissing => (
                "Error During Login: Credentials Missing",
                "Username/password was not submitted or password is less than 3 characters.",
            ),
            Self::InvalidSaltVersion => (
                "Error During Login: Invalid Salt Version",
                "Invalid salt version.",
            ),
            Self::UnsupportedMediaType => (
                "Internal Error: Unsupported Media Type",
                "Unsupported media type. Please report this error.",
            ),
            Self::Gone => (
                "Error During Login: Account Gone",
                "Account has been migrated to a Microsoft account. Please log in with Microsoft.",
            ),
            Self::Unreachable => (
                "Error During Login: Unreachable",
                "Authentication servers are currently not reachable. Please try again later.",
            ),
            Self::NotPaid => (
                "Error During Login: Game Not Purchased",
                "The account you are trying to login with has not purchased a copy of Minecraft. You may purchase a copy on Minecraft.net",
            ),
            Self::Unknown => (
                "Error During Login: Unknown Error",
                "An unknown error has occurred. Please see the console for details.",
            ),
        };
        DisplayableError::new(title, description)
    }
}

impl Display for MojangErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// A raw error code with no entry in the Mojang error table.
///
/// Every code the server can send is listed in [`MojangErrorCode`],
/// so hitting this is a bug in the provider client, not a user error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unmapped Mojang error code: {0}")]
pub struct UnmappedErrorCode(pub u32);

impl TryFrom<u32> for MojangErrorCode {
    type Error = UnmappedErrorCode;

    fn try_from(code: u32) -> std::result::Result<Self, Self::Error> {
        Self::ALL
            .get(code as usize)
            .copied()
            .ok_or(UnmappedErrorCode(code))
    }
}

/// Errors reported during the Microsoft login flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MicrosoftErrorCode {
    Unknown,
    /// The account has no game profile set up yet.
    NoProfile,
    NoXboxAccount,
    /// Xbox Live is banned or unavailable in the account's country.
    XblBanned,
    /// The account is a child account outside a family group.
    Under18,
}

impl MicrosoftErrorCode {
    /// `XErr` values sent by the XSTS endpoint.
    const XERR_NO_XBOX_ACCOUNT: u64 = 2_148_916_233;
    const XERR_XBL_BANNED: u64 = 2_148_916_235;
    const XERR_UNDER_18: u64 = 2_148_916_238;

    #[must_use]
    pub fn displayable(self) -> DisplayableError {
        let (title, description) = match self {
            Self::NoProfile => (
                "Error During Login: Profile Not Set Up",
                "Your Microsoft account does not yet have a Minecraft profile set up. If you have recently purchased the game or redeemed it through Xbox Game Pass, you have to set up your profile on Minecraft.net. If you have not yet purchased the game, you can also do that on Minecraft.net.",
            ),
            Self::NoXboxAccount => (
                "Error During Login: No Xbox Account",
                "Your Microsoft account has no Xbox account associated with it.",
            ),
            Self::XblBanned => (
                "Error During Login: Xbox Live Unavailable",
                "Your Microsoft account is from a country where Xbox Live is not available or banned.",
            ),
            Self::Under18 => (
                "Error During Login: Parental Approval Required",
                "Accounts for users under the age of 18 must be added to a Family by an adult.",
            ),
            Self::Unknown => (
                "Unknown Error During Login",
                "An unknown error has occurred. Please see the console for details.",
            ),
        };
        DisplayableError::new(title, description)
    }
}

impl Display for MicrosoftErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl From<u64> for MicrosoftErrorCode {
    fn from(code: u64) -> Self {
        match code {
            1 => Self::NoProfile,
            Self::XERR_NO_XBOX_ACCOUNT => Self::NoXboxAccount,
            Self::XERR_XBL_BANNED => Self::XblBanned,
            Self::XERR_UNDER_18 => Self::Under18,
            _ => Self::Unknown,
        }
    }
}

/// Errors that can occur during account management
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("Invalid offline username: {0:?}")]
    InvalidUsername(String),

    #[error("Mojang authentication failed: {0}")]
    Mojang(MojangErrorCode),

    #[error("Microsoft authentication failed: {0}")]
    Microsoft(MicrosoftErrorCode),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Operation not supported for {0} accounts")]
    UnsupportedProvider(AccountProvider),

    #[error("Could not save accounts: {0}")]
    Store(#[from] JsonFileError),
}

impl AccountError {
    /// Resolves this error to the message shown to the user.
    #[must_use]
    pub fn displayable(&self) -> DisplayableError {
        match self {
            AccountError::InvalidUsername(_) => DisplayableError::new(
                "Error During Login: Invalid Username",
                "Offline usernames must be 1 to 16 characters long and may only contain letters, numbers and underscores.",
            ),
            AccountError::Mojang(code) => code.displayable(),
            AccountError::Microsoft(code) => code.displayable(),
            AccountError::AccountNotFound(_) => DisplayableError::new(
                "Account Not Found",
                "The selected account no longer exists. Please log in again.",
            ),
            AccountError::UnsupportedProvider(_) => DisplayableError::new(
                "Internal Error: Unsupported Operation",
                "This operation is not supported for this type of account. Please report this error.",
            ),
            AccountError::Store(_) => DisplayableError::new(
                "Error Saving Account",
                "Your accounts could not be saved to disk. Please see the console for details.",
            ),
        }
    }
}

impl From<AccountError> for DisplayableError {
    fn from(err: AccountError) -> Self {
        err.displayable()
    }
}

/// Convenient type alias for Results in account management
pub type Result<T> = std::result::Result<T, AccountError>;
