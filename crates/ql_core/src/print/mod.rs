//! Logging backend for the [`info!`](crate::info), [`pt!`](crate::pt)
//! and [`err!`](crate::err) macros.
//!
//! Every message is kept in an in-memory buffer (readable through
//! [`get_logs`]) and, once [`set_log_file`] has been called, appended to
//! a log file. Credentials registered with [`register_secret`] are
//! replaced with `[REDACTED]` before a message goes anywhere.

use std::{
    collections::{HashSet, VecDeque},
    fmt::Display,
    fs::OpenOptions,
    io::Write,
    path::PathBuf,
    sync::{
        LazyLock, Mutex, RwLock,
        atomic::{AtomicBool, Ordering},
    },
};

mod macros;

const REDACTED: &str = "[REDACTED]";
/// Anything shorter is too likely to appear in ordinary text.
const MIN_SECRET_LEN: usize = 8;
/// Oldest secrets are forgotten past this many. Tokens are
/// replaced on every refresh, so old ones are no longer in use.
const MAX_SECRETS: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogType {
    Info,
    Error,
    Point,
}

impl Display for LogType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                LogType::Info => "[info]",
                LogType::Error => "[error]",
                LogType::Point => "-",
            }
        )
    }
}

#[derive(Default)]
pub struct Logger {
    entries: Vec<(String, LogType)>,
    file: Option<PathBuf>,
}

pub static LOGGER: LazyLock<Mutex<Logger>> = LazyLock::new(|| Mutex::new(Logger::default()));

/// Credentials to redact, oldest first.
#[derive(Default)]
struct SecretRegistry {
    order: VecDeque<String>,
    known: HashSet<String>,
}

impl SecretRegistry {
    fn register(&mut self, secret: &str) {
        if secret.len() < MIN_SECRET_LEN || self.known.contains(secret) {
            return;
        }
        if self.order.len() >= MAX_SECRETS {
            if let Some(oldest) = self.order.pop_front() {
                self.known.remove(&oldest);
            }
        }
        self.order.push_back(secret.to_owned());
        self.known.insert(secret.to_owned());
    }

    fn redact(&self, msg: &str) -> String {
        self.order
            .iter()
            .fold(msg.to_owned(), |msg, secret| msg.replace(secret, REDACTED))
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.order.len()
    }
}

static SECRETS: LazyLock<RwLock<SecretRegistry>> =
    LazyLock::new(|| RwLock::new(SecretRegistry::default()));

static IS_PRINT: AtomicBool = AtomicBool::new(true);

#[must_use]
pub fn is_print() -> bool {
    IS_PRINT.load(Ordering::Relaxed)
}

/// Enables or disables terminal output. Logs are still recorded.
pub fn set_print(print: bool) {
    IS_PRINT.store(print, Ordering::Relaxed);
}

/// Starts appending every logged message to `path`.
pub fn set_log_file(path: PathBuf) {
    if let Ok(mut logger) = LOGGER.lock() {
        logger.file = Some(path);
    }
}

/// Registers a credential that must never show up in logs.
pub fn register_secret(secret: &str) {
    if let Ok(mut secrets) = SECRETS.write() {
        secrets.register(secret);
    }
}

#[must_use]
pub fn auto_redact(msg: &str) -> String {
    let Ok(secrets) = SECRETS.read() else {
        return msg.to_owned();
    };
    secrets.redact(msg)
}

pub fn print_to_memory(msg: &str, t: LogType) {
    if let Ok(mut logger) = LOGGER.lock() {
        logger.entries.push((msg.to_owned(), t));
    }
}

pub fn print_to_file(msg: &str, t: LogType) {
    let Ok(mut logger) = LOGGER.lock() else {
        return;
    };
    logger.entries.push((msg.to_owned(), t));

    let Some(path) = &logger.file else {
        return;
    };
    // Logging failures are ignored.
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
        let time = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        _ = writeln!(file, "[{time}] {t} {msg}");
    }
}

/// Returns a copy of everything logged so far.
#[must_use]
pub fn get_logs() -> Vec<(String, LogType)> {
    LOGGER
        .lock()
        .map(|logger| logger.entries.clone())
        .unwrap_or_default()
}
