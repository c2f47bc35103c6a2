//! Account Management Module
//!
//! Adds, removes and validates Mojang, Microsoft and offline
//! accounts, and keeps the account store consistent while doing so.

mod errors;
mod login_form;
mod manager;
mod providers;
mod store;
mod traits;
mod types;

// Re-export main types and traits
pub use errors::{
    AccountError, BoxError, DisplayableError, MicrosoftErrorCode, MojangErrorCode, ProviderError,
    ProviderResult, Result, UnmappedErrorCode,
};
pub use login_form::{FieldError, LoginForm, LoginMode};
pub use manager::AccountManager;
pub use providers::*;
pub use store::{AccountDatabase, JsonAccountStore, MemoryAccountStore, ACCOUNTS_FILE};
pub use traits::{AccountStore, Clock, MicrosoftAuth, MojangAuth, SystemClock};
pub use types::*;
