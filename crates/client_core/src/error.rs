//! Error taxonomy for one submission workflow.

use std::fmt;

use thiserror::Error;

use crate::image_store::ImageStoreError;

/// Which server endpoint a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Upload,
    Plot,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Upload => f.write_str("upload"),
            Endpoint::Plot => f.write_str("plot"),
        }
    }
}

fn server_message_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|message| format!(": {message}"))
        .unwrap_or_default()
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("no file selected")]
    NoFileSelected,
    #[error("{field} must be an integer line number, got {value:?}")]
    InvalidLineNumber { field: &'static str, value: String },
    #[error("{endpoint} request failed: {source}")]
    Network {
        endpoint: Endpoint,
        source: reqwest::Error,
    },
    #[error("{endpoint} request returned HTTP {status}{}", server_message_suffix(.message))]
    HttpStatus {
        endpoint: Endpoint,
        status: u16,
        message: Option<String>,
    },
    #[error("failed to decode {endpoint} response: {reason}")]
    Decode { endpoint: Endpoint, reason: String },
    #[error("failed to display plot: {0}")]
    ImageStore(#[from] ImageStoreError),
}

impl WorkflowError {
    pub fn endpoint(&self) -> Option<Endpoint> {
        match self {
            WorkflowError::NoFileSelected
            | WorkflowError::InvalidLineNumber { .. }
            | WorkflowError::ImageStore(_) => None,
            WorkflowError::Network { endpoint, .. }
            | WorkflowError::HttpStatus { endpoint, .. }
            | WorkflowError::Decode { endpoint, .. } => Some(*endpoint),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            WorkflowError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short text for the visible error panel.
    pub fn user_message(&self) -> String {
        match self {
            WorkflowError::NoFileSelected => "Select a file before submitting.".to_string(),
            WorkflowError::InvalidLineNumber { field, value } => {
                format!("The {field} field must be a whole number (got {value:?}).")
            }
            WorkflowError::Network { endpoint, source } if source.is_timeout() => {
                format!("The {endpoint} request timed out; try again.")
            }
            WorkflowError::Network { endpoint, .. } => {
                format!("Could not reach the server for the {endpoint} request; check the connection and try again.")
            }
            WorkflowError::HttpStatus {
                endpoint,
                status,
                message: Some(message),
            } => format!("The server rejected the {endpoint} request ({status}): {message}"),
            WorkflowError::HttpStatus {
                endpoint, status, ..
            } => format!("The server rejected the {endpoint} request ({status})."),
            WorkflowError::Decode { endpoint, .. } => {
                format!("The server sent an unreadable {endpoint} response.")
            }
            WorkflowError::ImageStore(_) => "The plot could not be displayed.".to_string(),
        }
    }
}
