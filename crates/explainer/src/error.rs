/// Failure of a single completion round trip.
///
/// Every variant is reported the same way: the caller gets no explanation and
/// the message is shown to the user unchanged.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    #[error("Failed to create Ollama client: {0}")]
    Client(String),

    #[error("Model request failed: {0}")]
    Request(String),

    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("Model did not respond within {0} seconds")]
    Timeout(u64),
}
