//! `generateContent` HTTP client for the narrative summary backend.
//!
//! # Responsibility
//! - Issue exactly one bounded POST per prompt.
//! - Map transport, status, and payload problems into [`GenerationError`].
//!
//! # Invariants
//! - Connect/read/write are all bounded by `NarrativeConfig::timeout_ms`.
//! - The API key travels only in the request; it is never logged.

use crate::config::NarrativeConfig;
use crate::summary::narrative::{GenerationError, TextGenerator};
use log::debug;
use serde_json::{json, Value};
use std::error::Error;
use std::io;
use std::time::Duration;

const USER_AGENT: &str = concat!("recap/", env!("CARGO_PKG_VERSION"));
const MIN_TIMEOUT_MS: u64 = 100;

/// Blocking client for a Gemini-style `models/{model}:generateContent` endpoint.
pub struct GeminiGenerator {
    config: NarrativeConfig,
    agent: ureq::Agent,
}

impl GeminiGenerator {
    pub fn new(config: NarrativeConfig) -> Self {
        let timeout = Duration::from_millis(config.timeout_ms.max(MIN_TIMEOUT_MS));
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(timeout)
            .timeout_read(timeout)
            .timeout_write(timeout)
            .user_agent(USER_AGENT)
            .build();
        Self { config, agent }
    }

    pub fn config(&self) -> &NarrativeConfig {
        &self.config
    }

    fn endpoint_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }
}

impl TextGenerator for GeminiGenerator {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        debug!(
            "event=genai_request module=summary status=start model={} prompt_chars={}",
            self.config.model,
            prompt.chars().count()
        );
        let payload = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .agent
            .post(&self.endpoint_url())
            .query("key", &self.config.api_key)
            .set("Content-Type", "application/json")
            .set("Accept", "application/json")
            .send_json(payload)
            .map_err(generation_error_from_ureq)?;

        let body: Value = response
            .into_json()
            .map_err(|err| GenerationError::MalformedResponse(format!("invalid json: {err}")))?;
        parse_generate_response(&body)
    }
}

/// Extracts generated text from a `generateContent` response body.
///
/// Concatenates all text parts of the first candidate.
pub fn parse_generate_response(body: &Value) -> Result<String, GenerationError> {
    let parts = body
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|candidates| candidates.first())
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(Value::as_array)
        .ok_or_else(|| {
            GenerationError::MalformedResponse("missing candidates[0].content.parts".to_string())
        })?;

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();
    if text.trim().is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    Ok(text)
}

fn generation_error_from_ureq(err: ureq::Error) -> GenerationError {
    match err {
        ureq::Error::Status(status, _) => GenerationError::Status(status),
        ureq::Error::Transport(transport) => {
            let io_kind = transport
                .source()
                .and_then(|source| source.downcast_ref::<io::Error>())
                .map(io::Error::kind);
            classify_transport_error(transport.kind(), io_kind)
        }
    }
}

fn classify_transport_error(
    kind: ureq::ErrorKind,
    io_kind: Option<io::ErrorKind>,
) -> GenerationError {
    if matches!(io_kind, Some(io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)) {
        return GenerationError::Timeout;
    }
    match kind {
        ureq::ErrorKind::Dns => GenerationError::Transport("dns"),
        ureq::ErrorKind::ConnectionFailed
        | ureq::ErrorKind::ProxyConnect
        | ureq::ErrorKind::ProxyUnauthorized => GenerationError::Transport("connection"),
        ureq::ErrorKind::InvalidUrl
        | ureq::ErrorKind::UnknownScheme
        | ureq::ErrorKind::InvalidProxyUrl => GenerationError::Transport("invalid_endpoint"),
        ureq::ErrorKind::InsecureRequestHttpsOnly => GenerationError::Transport("tls"),
        ureq::ErrorKind::Io => match io_kind {
            Some(
                io::ErrorKind::ConnectionRefused
                | io::ErrorKind::ConnectionReset
                | io::ErrorKind::ConnectionAborted,
            ) => GenerationError::Transport("connection"),
            _ => GenerationError::Transport("io"),
        },
        _ => GenerationError::Transport("transport"),
    }
}
