use std::path::PathBuf;

use crate::{IntoIoError, IoError};

pub const LAUNCHER_DIR_NAME: &str = "QuantumLauncher";

/// Returns the launcher directory, creating it if needed.
///
/// - Windows: `%APPDATA%/QuantumLauncher`
/// - macOS: `~/Library/Application Support/QuantumLauncher`
/// - Linux: `~/.local/share/QuantumLauncher`
///
/// # Errors
/// - if the platform has no data directory
/// - if the directory couldn't be created
pub fn get_launcher_dir() -> Result<PathBuf, IoError> {
    let Some(data_dir) = dirs::data_dir() else {
        return Err(IoError {
            error: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "could not find the user data directory",
            ),
            path: PathBuf::new(),
        });
    };
    let launcher_dir = data_dir.join(LAUNCHER_DIR_NAME);
    std::fs::create_dir_all(&launcher_dir).path(&launcher_dir)?;
    Ok(launcher_dir)
}
