//! One request per candidate model against the Messages API.
//!
//! Probes run strictly one after another. A probe never returns an error:
//! every way it can go wrong is folded into a [`ProbeOutcome`] so the
//! remaining models are still checked.

use std::error::Error as StdError;
use std::io::Write;
use std::time::{Duration, Instant};

use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::credential::Credential;
use crate::error::CheckError;
use crate::report::Reporter;
use crate::truncate_chars;

pub const API_URL: &str = "https://api.anthropic.com/v1/messages";
pub const API_VERSION: &str = "2023-06-01";
pub const MAX_TOKENS: u32 = 100;
pub const PROMPT: &str = "Say OK";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Raw error bodies that aren't JSON are cut to this many characters.
pub const ERROR_BODY_PREVIEW_CHARS: usize = 100;

// =============================================================================
// Request body
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct MessagesRequest<'a> {
    pub model: &'a str,
    pub max_tokens: u32,
    pub messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

impl<'a> MessagesRequest<'a> {
    pub fn new(model: &'a str) -> Self {
        Self {
            model,
            max_tokens: MAX_TOKENS,
            messages: [ChatMessage {
                role: "user",
                content: PROMPT,
            }],
        }
    }
}

// =============================================================================
// Outcomes
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    Success,
    Failure,
}

impl ProbeStatus {
    pub fn symbol(self) -> &'static str {
        match self {
            ProbeStatus::Success => "✅",
            ProbeStatus::Failure => "❌",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// HTTP 200 with a JSON body. `reply` is the first text block, if any.
    Success { reply: Option<String> },
    /// Any status other than 200.
    HttpError { status: u16, body: String },
    /// Connection, TLS, timeout or body-read failure.
    TransportError { message: String },
    /// HTTP 200 whose body could not be decoded.
    MalformedResponse { message: String },
}

impl ProbeOutcome {
    pub fn status(&self) -> ProbeStatus {
        match self {
            ProbeOutcome::Success { .. } => ProbeStatus::Success,
            _ => ProbeStatus::Failure,
        }
    }

    fn transport(err: &reqwest::Error, timeout: Duration) -> Self {
        let message = if err.is_timeout() {
            format!("request timed out after {:?}", timeout)
        } else {
            error_chain(err)
        };
        ProbeOutcome::TransportError { message }
    }
}

/// `err` followed by each of its sources, separated by `: `.
fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Pull a human-readable message out of an error response body.
///
/// JSON with an `error` object yields `error.message` (or the whole body when
/// `message` is absent) and JSON without `error` yields nothing. Anything
/// else, including an `error` that isn't an object, yields the first 100
/// characters of the body.
pub fn error_detail(body: &str) -> Option<String> {
    let raw = || Some(truncate_chars(body, ERROR_BODY_PREVIEW_CHARS).to_string());

    let json = match serde_json::from_str::<Value>(body) {
        Ok(json) => json,
        Err(_) => return raw(),
    };
    let error = match json.get("error") {
        Some(Value::Object(error)) => error,
        Some(_) => return raw(),
        None => return None,
    };
    match error.get("message") {
        Some(Value::String(message)) => Some(message.clone()),
        Some(other) => Some(other.to_string()),
        None => Some(body.to_string()),
    }
}

fn first_text_block(json: &Value) -> Option<String> {
    json.get("content")?
        .get(0)?
        .get("text")?
        .as_str()
        .map(str::to_string)
}

// =============================================================================
// Results
// =============================================================================

/// Status per model, in the order the models were probed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeResults {
    entries: Vec<(String, ProbeStatus)>,
}

impl ProbeResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a status for `model`. Returns false and keeps the first
    /// status if the model was already recorded.
    pub fn record(&mut self, model: &str, status: ProbeStatus) -> bool {
        if self.get(model).is_some() {
            return false;
        }
        self.entries.push((model.to_string(), status));
        true
    }

    pub fn get(&self, model: &str) -> Option<ProbeStatus> {
        self.entries
            .iter()
            .find(|(name, _)| name == model)
            .map(|(_, status)| *status)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ProbeStatus)> {
        self.entries
            .iter()
            .map(|(name, status)| (name.as_str(), *status))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when nothing succeeded, including when nothing was probed.
    pub fn all_failed(&self) -> bool {
        self.entries
            .iter()
            .all(|(_, status)| *status == ProbeStatus::Failure)
    }
}

// =============================================================================
// Client
// =============================================================================

pub struct ProbeClientBuilder {
    url: String,
    timeout: Duration,
}

impl Default for ProbeClientBuilder {
    fn default() -> Self {
        Self {
            url: API_URL.to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }
}

impl ProbeClientBuilder {
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self, credential: Credential) -> Result<ProbeClient, CheckError> {
        let http = reqwest::Client::builder().timeout(self.timeout).build()?;
        Ok(ProbeClient {
            http,
            url: self.url,
            timeout: self.timeout,
            credential,
        })
    }
}

pub struct ProbeClient {
    http: reqwest::Client,
    url: String,
    timeout: Duration,
    credential: Credential,
}

impl ProbeClient {
    /// Client for the production endpoint with the default 10 second timeout.
    pub fn new(credential: Credential) -> Result<Self, CheckError> {
        Self::builder().build(credential)
    }

    pub fn builder() -> ProbeClientBuilder {
        ProbeClientBuilder::default()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send one minimal chat request for `model` and classify what came back.
    pub async fn probe(&self, model: &str) -> ProbeOutcome {
        let started = Instant::now();

        let response = self
            .http
            .post(&self.url)
            .header("x-api-key", self.credential.expose())
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&MessagesRequest::new(model))
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) => return ProbeOutcome::transport(&e, self.timeout),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return ProbeOutcome::transport(&e, self.timeout),
        };

        debug!(
            model,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "probe response"
        );

        if status != StatusCode::OK {
            return ProbeOutcome::HttpError {
                status: status.as_u16(),
                body,
            };
        }

        match serde_json::from_str::<Value>(&body) {
            Ok(json) => ProbeOutcome::Success {
                reply: first_text_block(&json),
            },
            Err(e) => ProbeOutcome::MalformedResponse {
                message: e.to_string(),
            },
        }
    }
}

/// Probe every model in order, streaming progress to `reporter`.
pub async fn probe_all<W: Write>(
    client: &ProbeClient,
    models: &[&str],
    reporter: &mut Reporter<W>,
) -> std::io::Result<ProbeResults> {
    let mut results = ProbeResults::new();

    for model in models {
        reporter.probing(model)?;

        let outcome = client.probe(model).await;
        if outcome.status() == ProbeStatus::Failure {
            debug!(model, ?outcome, "probe failed");
        }
        reporter.outcome(&outcome)?;

        results.record(model, outcome.status());
    }

    Ok(results)
}
