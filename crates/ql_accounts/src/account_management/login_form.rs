//! UI-independent state of the login form.
//!
//! The launcher's UI binds its text boxes to a [`LoginForm`],
//! shows the field errors it reports and enables the login
//! button only while [`LoginForm::can_submit`] holds.

use regex::Regex;
use std::sync::LazyLock;

use ql_core::err;

use super::{
    errors::DisplayableError,
    manager::AccountManager,
    providers::is_valid_username,
    types::{Account, SecureString},
};

static BASIC_EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("valid email regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginMode {
    /// Mojang login: username or email, plus password.
    #[default]
    Online,
    /// Offline login: in-game name only.
    Offline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    Required,
    Invalid,
}

impl FieldError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            FieldError::Required => "* Required",
            FieldError::Invalid => "* Invalid Value",
        }
    }
}

#[derive(Debug, Default)]
pub struct LoginForm {
    mode: LoginMode,
    username: String,
    password: SecureString,
}

impl LoginForm {
    #[must_use]
    pub fn new(mode: LoginMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn mode(&self) -> LoginMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: LoginMode) {
        self.mode = mode;
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = username.into();
    }

    pub fn set_password(&mut self, password: impl Into<SecureString>) {
        self.password = password.into();
    }

    #[must_use]
    pub fn username_error(&self) -> Option<FieldError> {
        if self.username.is_empty() {
            return Some(FieldError::Required);
        }
        let valid = match self.mode {
            LoginMode::Online => {
                BASIC_EMAIL.is_match(&self.username) || is_valid_username(&self.username)
            }
            LoginMode::Offline => is_valid_username(&self.username),
        };
        (!valid).then_some(FieldError::Invalid)
    }

    /// Offline logins have no password, so this is always `None` for them.
    #[must_use]
    pub fn password_error(&self) -> Option<FieldError> {
        match self.mode {
            LoginMode::Offline => None,
            LoginMode::Online => self.password.is_empty().then_some(FieldError::Invalid),
        }
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.username_error().is_none() && self.password_error().is_none()
    }

    /// Logs in with the current form contents.
    ///
    /// On success the form is cleared and the new account is selected.
    ///
    /// # Errors
    /// The message to show in the error dialog.
    pub async fn submit(
        &mut self,
        manager: &mut AccountManager,
    ) -> Result<Account, DisplayableError> {
        if let Some(error) = self.username_error().or(self.password_error()) {
            return Err(DisplayableError {
                title: "Error During Login: Invalid Details".to_owned(),
                description: format!("Please check the login form. {}", error.message()),
            });
        }

        let result = match self.mode {
            LoginMode::Online => {
                manager
                    .add_mojang_account(&self.username, &self.password)
                    .await
            }
            LoginMode::Offline => manager.add_offline_account(&self.username).await,
        };

        match result {
            Ok(account) => {
                self.reset();
                Ok(account)
            }
            Err(error) => {
                err!("Error while logging in: {error}");
                Err(error.displayable())
            }
        }
    }

    /// Clears the username and password, keeping the mode.
    pub fn reset(&mut self) {
        self.username.clear();
        self.password = SecureString::default();
    }
}
