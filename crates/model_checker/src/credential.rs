//! Credential loading from the `.env.local` file next to the executable.
//!
//! The file is line-oriented `KEY=VALUE`. Only one key is recognized and
//! nothing else about the file is validated: lines that don't match are skipped.

use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::CheckError;
use crate::truncate_chars;

pub const ENV_FILE_NAME: &str = ".env.local";
pub const API_KEY_NAME: &str = "ANTHROPIC_API_KEY";

/// Number of characters shown by [`Credential::preview`].
pub const PREVIEW_CHARS: usize = 20;

/// An API key, read once at startup and never modified.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// First 20 characters followed by `...`, for sanity-checking which key was loaded.
    pub fn preview(&self) -> String {
        format!("{}...", truncate_chars(&self.0, PREVIEW_CHARS))
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential({})", self.preview())
    }
}

/// `.env.local` in the directory holding the running executable.
pub fn default_env_path() -> io::Result<PathBuf> {
    let exe = env::current_exe()?;
    let dir = exe.parent().unwrap_or_else(|| Path::new("."));
    Ok(dir.join(ENV_FILE_NAME))
}

/// Find the first `ANTHROPIC_API_KEY=` line and return everything after its first `=`.
///
/// Scanning stops at the first matching line even if its value is empty.
pub fn find_api_key(contents: &str) -> Option<&str> {
    let prefix = format!("{}=", API_KEY_NAME);
    contents
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with(&prefix))
        .and_then(|line| line.split_once('='))
        .map(|(_, value)| value)
}

pub fn load_credential(path: &Path) -> Result<Credential, CheckError> {
    if !path.exists() {
        return Err(CheckError::CredentialFileMissing(path.to_path_buf()));
    }

    let contents = fs::read_to_string(path)?;
    match find_api_key(&contents) {
        Some(value) if !value.is_empty() => {
            tracing::debug!(path = %path.display(), "loaded credential");
            Ok(Credential::new(value))
        }
        _ => Err(CheckError::CredentialKeyMissing {
            path: path.to_path_buf(),
        }),
    }
}
