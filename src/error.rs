use crate::transport::TransportError;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "api_key", "choices[0].message.content")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected type, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "engine_builder", "response_parser")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for the engine.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Malformed response: {message}{}", format_context(.context))]
    MalformedResponse {
        message: String,
        context: ErrorContext,
    },

    #[error("Remote error: HTTP {status}: {message}")]
    Remote {
        status: u16,
        message: String,
        body: String,
    },

    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),

    /// Retries exhausted. `message` already carries status and body when known.
    #[error("Generation failed after {attempts} attempt(s): {message}")]
    Generation {
        message: String,
        attempts: u32,
        status: Option<u16>,
        body: Option<String>,
    },

    #[error("Cache store error: {0}")]
    Cache(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Create a new malformed-response error with structured context
    pub fn malformed_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::MalformedResponse {
            message: msg.into(),
            context,
        }
    }

    /// Transport failures and remote (non-2xx or provider error body) failures are
    /// worth another attempt; everything else is terminal.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::Remote { .. })
    }

    /// HTTP status attached to this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Remote { status, .. } => Some(*status),
            Error::Generation { status, .. } => *status,
            _ => None,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } | Error::MalformedResponse { context, .. } => {
                Some(context)
            }
            _ => None,
        }
    }

    /// Fold the last failed attempt into the terminal error surfaced to the caller.
    ///
    /// The message reads `OpenRouter API error: <cause>` followed by
    /// `| Status: <code> | Response: <body>` when an HTTP response was received.
    pub(crate) fn exhausted(last: Error, attempts: u32) -> Self {
        let (status, body, cause) = match &last {
            Error::Remote {
                status,
                message,
                body,
            } => (Some(*status), Some(body.clone()), message.clone()),
            other => (None, None, other.to_string()),
        };
        let mut message = format!("OpenRouter API error: {}", cause);
        if let (Some(status), Some(body)) = (status, body.as_ref()) {
            message.push_str(&format!(" | Status: {} | Response: {}", status, body));
        }
        Error::Generation {
            message,
            attempts,
            status,
            body,
        }
    }
}
