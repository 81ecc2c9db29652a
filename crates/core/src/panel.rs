//! Editor panel message contract
//!
//! The editor panel and the `explainer panel` bridge exchange one JSON object
//! per line. Every object carries a `command` tag:
//!
//! - inbound: `{"command": "explain", "code": "...", "language": "..."}`
//! - outbound: `{"command": "explanation", "explanation": "..."}` or
//!   `{"command": "error", "error": "..."}`
//!
//! This module only parses and builds messages; the bridge owns the I/O.

use crate::explain::{ExplanationRequest, ExplanationResult, InvalidRequest};
use serde::{Deserialize, Serialize};

/// Reply sent back to the panel for every inbound line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum PanelReply {
    Explanation { explanation: String },
    Error { error: String },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PanelError {
    #[error("Malformed message: {0}")]
    Malformed(String),

    #[error("Message has no command")]
    MissingCommand,

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error(transparent)]
    Invalid(#[from] InvalidRequest),
}

#[derive(Debug, Deserialize)]
struct ExplainMessage {
    code: String,
    language: String,
}

/// Parse and validate one inbound panel line into an explanation request.
pub fn parse_request(line: &str) -> Result<ExplanationRequest, PanelError> {
    let value: serde_json::Value =
        serde_json::from_str(line).map_err(|e| PanelError::Malformed(e.to_string()))?;

    let command = value
        .get("command")
        .and_then(|c| c.as_str())
        .ok_or(PanelError::MissingCommand)?;

    match command {
        "explain" => {
            let message: ExplainMessage =
                serde_json::from_value(value).map_err(|e| PanelError::Malformed(e.to_string()))?;
            let request = ExplanationRequest::new(message.code, message.language);
            request.validate()?;
            Ok(request)
        }
        other => Err(PanelError::UnknownCommand(other.to_string())),
    }
}

/// Build the reply for a finished request. Failures are stringified as-is.
pub fn reply_for<E: std::fmt::Display>(outcome: Result<ExplanationResult, E>) -> PanelReply {
    match outcome {
        Ok(result) => PanelReply::Explanation {
            explanation: result.explanation_text,
        },
        Err(error) => PanelReply::Error {
            error: error.to_string(),
        },
    }
}

impl PanelReply {
    /// Text the panel shows for this reply.
    pub fn display_text(&self) -> String {
        match self {
            PanelReply::Explanation { explanation } => explanation.clone(),
            PanelReply::Error { error } => format!("Error: {error}"),
        }
    }
}
