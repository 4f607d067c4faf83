//! Startup errors for the checker.
//!
//! Per-probe failures never show up here: they are folded into a
//! [`ProbeOutcome`](crate::probe::ProbeOutcome) and reported inline.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckError {
    #[error(".env.local not found")]
    CredentialFileMissing(PathBuf),

    #[error("ANTHROPIC_API_KEY not found in .env.local")]
    CredentialKeyMissing { path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl CheckError {
    /// True for the two errors caused by a missing or incomplete credential file.
    pub fn is_credential_error(&self) -> bool {
        matches!(
            self,
            CheckError::CredentialFileMissing(_) | CheckError::CredentialKeyMissing { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_messages() {
        let missing = CheckError::CredentialFileMissing(PathBuf::from("/tmp/.env.local"));
        assert_eq!(missing.to_string(), ".env.local not found");
        assert!(missing.is_credential_error());

        let no_key = CheckError::CredentialKeyMissing {
            path: PathBuf::from("/tmp/.env.local"),
        };
        assert_eq!(
            no_key.to_string(),
            "ANTHROPIC_API_KEY not found in .env.local"
        );
        assert!(no_key.is_credential_error());
    }

    #[test]
    fn test_io_error_is_not_credential_error() {
        let err = CheckError::from(io::Error::other("disk on fire"));
        assert!(!err.is_credential_error());
        assert!(err.to_string().contains("disk on fire"));
    }
}
