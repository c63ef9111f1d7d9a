//! Drawing analysis dispatcher.
//!
//! On explicit request the current drawing is PNG-encoded and submitted with
//! a fixed instruction prompt to the external content-understanding service.
//! The dispatcher is a single-slot state machine: one request in flight at a
//! time, new requests rejected until the outcome is acknowledged. The HTTP
//! call runs on a worker thread so the per-frame loop never blocks; the
//! worker finishes or fails on its own even if the session goes away first.

use crate::config::AnalysisConfig;
use crate::constants::ANALYSIS_PROMPT;
use base64::Engine as _;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;
use thiserror::Error;

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Errors produced by drawing analysis
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// The API key environment variable is not set
    #[error("Missing API key: {var} not set")]
    MissingApiKey { var: String },

    /// A request is already in flight
    #[error("An analysis request is already in flight")]
    RequestInFlight,

    /// The HTTP request could not be sent or completed
    #[error("Request failed: {0}")]
    Transport(String),

    /// The service did not answer within the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// The service rejected the request due to rate limiting
    #[error("Rate limited by the analysis service")]
    RateLimited,

    /// The credential was rejected
    #[error("Authentication failed (status {status})")]
    Auth { status: u16 },

    /// The service rejected the request as malformed
    #[error("Service rejected the request: {0}")]
    InvalidRequest(String),

    /// Any other non-success service response
    #[error("Service error (status {status}): {body}")]
    Service { status: u16, body: String },

    /// The response body could not be interpreted
    #[error("Response parse failed: {0}")]
    Parse(String),

    /// The service answered without any text content
    #[error("Service returned an empty response")]
    EmptyResponse,
}

/// Dispatcher state. Holding the outcome inside the variant keeps the
/// one-request-at-a-time rule structural instead of convention-based.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AnalysisState {
    /// No request outstanding
    #[default]
    Idle,
    /// Waiting for the service to answer
    Requesting,
    /// The service answered with explanation text
    Succeeded(String),
    /// The request failed; the error says why
    Failed(AnalysisError),
}

/// Single-slot analysis dispatcher
pub struct AnalysisDispatcher {
    config: AnalysisConfig,
    state: AnalysisState,
    rx: Option<Receiver<Result<String, AnalysisError>>>,
}

impl AnalysisDispatcher {
    /// Create a dispatcher for the given service configuration
    #[must_use]
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config, state: AnalysisState::Idle, rx: None }
    }

    /// Current state; does not pick up finished work (see [`Self::poll`])
    #[must_use]
    pub fn state(&self) -> &AnalysisState {
        &self.state
    }

    /// True while a request is outstanding
    #[must_use]
    pub fn is_requesting(&self) -> bool {
        self.state == AnalysisState::Requesting
    }

    /// Submit the drawing (as an encoded PNG) for analysis.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::RequestInFlight`] while a prior request is
    /// outstanding, and [`AnalysisError::MissingApiKey`] before any network
    /// activity if the credential is absent.
    pub fn request(&mut self, png: Vec<u8>) -> Result<(), AnalysisError> {
        if self.is_requesting() {
            return Err(AnalysisError::RequestInFlight);
        }
        let api_key = std::env::var(&self.config.api_key_env)
            .map_err(|_| AnalysisError::MissingApiKey { var: self.config.api_key_env.clone() })?;
        let client = AnalysisClient::new(&self.config, api_key)?;
        info!("Submitting drawing for analysis ({} bytes)", png.len());
        self.request_with(move || client.analyze(&png))
    }

    /// Run an arbitrary analysis job on the worker slot.
    ///
    /// This is the seam the offline driver and tests use to exercise the
    /// state machine without a live service.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::RequestInFlight`] while a prior request is
    /// outstanding.
    pub fn request_with<F>(&mut self, job: F) -> Result<(), AnalysisError>
    where
        F: FnOnce() -> Result<String, AnalysisError> + Send + 'static,
    {
        if self.is_requesting() {
            return Err(AnalysisError::RequestInFlight);
        }
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            // The session may be gone by the time the job finishes; a closed
            // receiver just discards the result.
            let _ = tx.send(job());
        });
        self.rx = Some(rx);
        self.state = AnalysisState::Requesting;
        Ok(())
    }

    /// Pick up a finished request, if any, and return the current state.
    ///
    /// Called once per frame from the session loop; never blocks.
    pub fn poll(&mut self) -> &AnalysisState {
        if self.state == AnalysisState::Requesting {
            match self.rx.as_ref().map(Receiver::try_recv) {
                Some(Ok(Ok(text))) => {
                    info!("Analysis succeeded ({} chars)", text.len());
                    self.state = AnalysisState::Succeeded(text);
                    self.rx = None;
                }
                Some(Ok(Err(e))) => {
                    warn!("Analysis failed: {e}");
                    self.state = AnalysisState::Failed(e);
                    self.rx = None;
                }
                Some(Err(TryRecvError::Empty)) => {}
                Some(Err(TryRecvError::Disconnected)) => {
                    self.state = AnalysisState::Failed(AnalysisError::Transport(
                        "Analysis worker exited without a result".to_string(),
                    ));
                    self.rx = None;
                }
                None => {}
            }
        }
        &self.state
    }

    /// Consume a finished outcome and return to `Idle`.
    ///
    /// No-op while `Idle` or `Requesting`.
    pub fn acknowledge(&mut self) {
        if matches!(self.state, AnalysisState::Succeeded(_) | AnalysisState::Failed(_)) {
            self.state = AnalysisState::Idle;
        }
    }
}

/// Blocking HTTP client for the content-understanding service
pub struct AnalysisClient {
    http: reqwest::blocking::Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl AnalysisClient {
    /// Build a client with the configured timeouts
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Transport`] if the HTTP client cannot be
    /// constructed.
    pub fn new(config: &AnalysisConfig, api_key: String) -> Result<Self, AnalysisError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| AnalysisError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            api_key,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    /// Send the drawing and return the service's explanation text
    ///
    /// # Errors
    ///
    /// Returns the [`AnalysisError`] variant matching the failure: transport,
    /// timeout, rate limit, auth, malformed request, or an unusable response.
    pub fn analyze(&self, png: &[u8]) -> Result<String, AnalysisError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint, self.model, self.api_key
        );
        let body = GenerateRequest::for_drawing(png);
        debug!("POST {}/models/{}:generateContent", self.endpoint, self.model);

        let response = self.http.post(&url).json(&body).send().map_err(|e| {
            if e.is_timeout() {
                AnalysisError::Timeout
            } else {
                AnalysisError::Transport(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .map_err(|e| AnalysisError::Transport(e.to_string()))?;

        match status {
            200 => parse_response(&text),
            401 | 403 => Err(AnalysisError::Auth { status }),
            429 => Err(AnalysisError::RateLimited),
            400 => Err(AnalysisError::InvalidRequest(truncate_body(&text))),
            _ => Err(AnalysisError::Service { status, body: truncate_body(&text) }),
        }
    }
}

/// Keep error bodies short enough for a user-facing message
fn truncate_body(body: &str) -> String {
    const MAX: usize = 300;
    let trimmed = body.trim();
    if trimmed.len() <= MAX {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(MAX).collect();
        format!("{cut}...")
    }
}

// Wire types for the generateContent endpoint.

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
}

#[derive(Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum RequestPart {
    Text { text: String },
    Inline { inline_data: InlineData },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

impl GenerateRequest {
    fn for_drawing(png: &[u8]) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![
                    RequestPart::Text { text: ANALYSIS_PROMPT.to_string() },
                    RequestPart::Inline {
                        inline_data: InlineData {
                            mime_type: "image/png".to_string(),
                            data: base64::engine::general_purpose::STANDARD.encode(png),
                        },
                    },
                ],
            }],
        }
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Extract the explanation text from a success response body
fn parse_response(json: &str) -> Result<String, AnalysisError> {
    let response: GenerateResponse =
        serde_json::from_str(json).map_err(|e| AnalysisError::Parse(e.to_string()))?;
    let text: String = response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();
    if text.trim().is_empty() {
        Err(AnalysisError::EmptyResponse)
    } else {
        Ok(text)
    }
}
