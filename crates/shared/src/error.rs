use serde::{Deserialize, Serialize};

/// Error body returned by the measurement server on rejected requests,
/// e.g. `{"error": "No selected file"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}

impl ApiErrorBody {
    /// Extracts the server message from a raw response body, if it has one.
    pub fn message_from_body(body: &[u8]) -> Option<String> {
        serde_json::from_slice::<ApiErrorBody>(body)
            .ok()
            .map(|body| body.error)
            .filter(|message| !message.trim().is_empty())
    }
}
