//! model_checker - which Anthropic model ids does this API key reach?
//!
//! Reads `ANTHROPIC_API_KEY` from the `.env.local` next to the executable,
//! sends one tiny Messages API request per candidate model, and prints a
//! live progress stream followed by a summary:
//!
//! ```text
//! Credential Loader -> Probe Runner -> Reporter
//! ```
//!
//! Probes run one at a time. A failing model is reported and the run moves
//! on; only a missing credential stops the program.

pub mod credential;
pub mod error;
pub mod probe;
pub mod report;

use std::io::Write;
use std::path::Path;

pub use credential::{load_credential, Credential};
pub use error::CheckError;
pub use probe::{probe_all, ProbeClient, ProbeClientBuilder, ProbeOutcome, ProbeResults, ProbeStatus};
pub use report::Reporter;

/// Model ids to try, in display order.
pub const CANDIDATE_MODELS: [&str; 9] = [
    "claude-3-5-sonnet-20241022",
    "claude-3-5-sonnet",
    "claude-opus",
    "claude-3-5-haiku-20241022",
    "claude-3-5-haiku",
    "claude-3-opus-20240229",
    "claude-3-opus",
    "claude-3-sonnet-20240229",
    "claude-3-sonnet",
];

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "model_checker=warn";

/// Truncate to at most `max_chars` characters, never splitting a UTF-8 sequence.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((boundary, _)) => &s[..boundary],
        None => s,
    }
}

/// Load the credential, probe every model and print the report to `out`.
///
/// Credential errors are returned before any HTTP client exists, so a bad
/// `.env.local` never results in a request.
pub async fn run<W: Write>(
    env_path: &Path,
    client: ProbeClientBuilder,
    models: &[&str],
    out: W,
) -> Result<ProbeResults, CheckError> {
    let credential = load_credential(env_path)?;

    let mut reporter = Reporter::new(out);
    reporter.credential_found(&credential)?;

    let client = client.build(credential)?;
    reporter.banner()?;

    let results = probe_all(&client, models, &mut reporter).await?;
    reporter.summary(&results)?;

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_short_string() {
        assert_eq!(truncate_chars("Hello", 100), "Hello");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn test_truncate_chars_ascii() {
        assert_eq!(truncate_chars("Hello, World!", 5), "Hello");
    }

    #[test]
    fn test_truncate_chars_counts_chars_not_bytes() {
        // 4 chars, 12 bytes
        let s = "日本語だ";
        assert_eq!(truncate_chars(s, 2), "日本");
        assert_eq!(truncate_chars(s, 4), s);
    }

    #[test]
    fn test_candidate_models() {
        assert_eq!(CANDIDATE_MODELS.len(), 9);
        assert_eq!(CANDIDATE_MODELS[0], "claude-3-5-sonnet-20241022");
        assert_eq!(CANDIDATE_MODELS[8], "claude-3-sonnet");
    }
}
