//! Hyperdrive errors

use thiserror::Error;

/// Errors produced while turning a URI or transition into a `Representor`.
///
/// View models forward these unchanged, so the type is `Clone + PartialEq`
/// to let callers compare a failure against what the transport returned.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum HyperdriveError {
    /// The server answered with a non-2xx status
    #[error("API request failed: {status}")]
    Http { status: u16 },

    /// The request never produced a response
    #[error("Failed to send request: {0}")]
    Network(String),

    /// The URI (or the expanded transition URI) is not valid
    #[error("Invalid URI: {0}")]
    InvalidUri(String),

    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// No decoder for the response media type
    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    /// The body could not be decoded into a representor
    #[error("Failed to parse response: {0}")]
    Decode(String),

    /// A transition index outside the transition list
    #[error("No transition at index {0}")]
    NoSuchTransition(usize),
}

/// Format an error for display in the UI
pub fn format_error(error: &HyperdriveError) -> String {
    match error {
        HyperdriveError::Http { status: 401 } => {
            "Authentication failed. Configure an Authorization header.".to_string()
        }
        HyperdriveError::Http { status: 403 } => "Permission denied.".to_string(),
        HyperdriveError::Http { status: 404 } => "Resource not found.".to_string(),
        HyperdriveError::Http { status: 405 } => {
            "Method not allowed for this transition.".to_string()
        }
        HyperdriveError::Http { status: 409 } => {
            "Resource conflict. The resource may have changed.".to_string()
        }
        HyperdriveError::Http { status: 429 } => {
            "Rate limit exceeded. Please try again later.".to_string()
        }
        HyperdriveError::Http { status } if (400..500).contains(status) => {
            "Invalid request. Check the transition inputs.".to_string()
        }
        HyperdriveError::Http { status } if *status >= 500 => {
            "Service temporarily unavailable. Please try again.".to_string()
        }
        HyperdriveError::Network(_) => {
            "Request failed. Check your network connection and try again.".to_string()
        }
        other => {
            let message = other.to_string();
            let truncated: String = message.chars().take(80).collect();
            if truncated.len() < message.len() {
                format!("{}...", truncated)
            } else {
                truncated
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_known_statuses() {
        assert_eq!(
            format_error(&HyperdriveError::Http { status: 404 }),
            "Resource not found."
        );
        assert_eq!(
            format_error(&HyperdriveError::Http { status: 422 }),
            "Invalid request. Check the transition inputs."
        );
        assert_eq!(
            format_error(&HyperdriveError::Http { status: 503 }),
            "Service temporarily unavailable. Please try again."
        );
    }

    #[test]
    fn test_format_truncates_long_messages() {
        let err = HyperdriveError::Decode("x".repeat(200));
        let formatted = format_error(&err);
        assert!(formatted.ends_with("..."));
        assert_eq!(formatted.chars().count(), 83);
    }

    #[test]
    fn test_format_short_message_untouched() {
        let err = HyperdriveError::UnsupportedContentType("text/html".to_string());
        assert_eq!(format_error(&err), "Unsupported content type: text/html");
    }
}
