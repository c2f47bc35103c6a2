//! Shared plumbing for the launcher crates: logging, the launcher
//! directory and file/JSON error handling.

mod error;
pub mod file_utils;
pub mod print;

pub use error::{IntoIoError, IntoJsonError, IoError, JsonError, JsonFileError};
pub use file_utils::LAUNCHER_DIR_NAME;

#[doc(hidden)]
pub use owo_colors;
