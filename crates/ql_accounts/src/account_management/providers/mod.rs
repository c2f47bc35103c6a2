//! Authentication provider logic that lives on the launcher's side.

mod microsoft;
mod offline;

pub use microsoft::{
    expiry_date, microsoft_auth_flow, AuthMode, MicrosoftAuthResult, EXPIRY_MARGIN_SECS,
};
pub use offline::{is_valid_username, offline_uuid, OfflineUsername, CLIENT_TOKEN_SEED};
