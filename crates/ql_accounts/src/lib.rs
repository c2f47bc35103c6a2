//! # QL Accounts
//!
//! Account session management for Quantum Launcher:
//! - Mojang accounts (username + password)
//! - Microsoft accounts (browser login, Xbox Live token chain)
//! - Offline accounts (username only, no network)
//!
//! [`AccountManager`] drives the authentication servers (through the
//! [`MojangAuth`] and [`MicrosoftAuth`] traits) and keeps an
//! [`AccountStore`] with exactly zero or one selected account.
//! Before launching, [`AccountManager::validate_selected`] refreshes
//! whatever tokens have expired.

pub mod account_management;

pub use account_management::*;
