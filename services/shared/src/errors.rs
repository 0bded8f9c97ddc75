/// Shared error taxonomy for the greeter client
///
/// - Every library error maps to one `ErrorCategory`
/// - Categories decide the log level and whether retrying by hand can help
/// - `ServiceError` is the serializable report the binary prints in JSON mode
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    /// RPC or websocket endpoint unreachable
    Connection,

    /// Greeting account could not be created or is unusable
    Provisioning,

    /// Greet transaction rejected or not confirmed
    Submission,

    /// Account bytes do not match the greeting layout
    Decode,

    /// Greeting account does not exist
    NotFound,

    /// Operation invoked out of order (e.g. greet before provisioning)
    State,

    /// Caller stopped waiting
    Cancelled,

    /// Missing or invalid configuration, unreadable keypair
    Configuration,
}

impl ErrorCategory {
    /// Map error category to log level
    pub fn log_level(&self) -> &'static str {
        match self {
            ErrorCategory::Connection => "error",
            ErrorCategory::Provisioning => "error",
            ErrorCategory::Submission => "warn",
            ErrorCategory::Decode => "error",
            ErrorCategory::NotFound => "info",
            ErrorCategory::State => "warn",
            ErrorCategory::Cancelled => "info",
            ErrorCategory::Configuration => "error",
        }
    }

    /// Whether triggering the same action again can succeed without changing
    /// configuration. Nothing is retried automatically.
    pub fn is_user_recoverable(&self) -> bool {
        match self {
            ErrorCategory::Connection
            | ErrorCategory::Submission
            | ErrorCategory::NotFound
            | ErrorCategory::State
            | ErrorCategory::Cancelled => true,
            ErrorCategory::Provisioning
            | ErrorCategory::Decode
            | ErrorCategory::Configuration => false,
        }
    }
}

/// Standard error codes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorCode(pub &'static str);

impl ErrorCode {
    pub const CONNECTION_RPC_UNAVAILABLE: ErrorCode = ErrorCode("CONNECTION_RPC_UNAVAILABLE");
    pub const CONNECTION_WS_UNAVAILABLE: ErrorCode = ErrorCode("CONNECTION_WS_UNAVAILABLE");

    pub const PROVISIONING_REJECTED: ErrorCode = ErrorCode("PROVISIONING_REJECTED");
    pub const PROVISIONING_INCOMPATIBLE_ACCOUNT: ErrorCode =
        ErrorCode("PROVISIONING_INCOMPATIBLE_ACCOUNT");

    pub const SUBMISSION_REJECTED: ErrorCode = ErrorCode("SUBMISSION_REJECTED");

    pub const DECODE_GREETING_ACCOUNT: ErrorCode = ErrorCode("DECODE_GREETING_ACCOUNT");

    pub const NOT_FOUND_GREETING_ACCOUNT: ErrorCode = ErrorCode("NOT_FOUND_GREETING_ACCOUNT");

    pub const STATE_NOT_PROVISIONED: ErrorCode = ErrorCode("STATE_NOT_PROVISIONED");

    pub const CANCELLED: ErrorCode = ErrorCode("CANCELLED");

    pub const CONFIGURATION_INVALID: ErrorCode = ErrorCode("CONFIGURATION_INVALID");
    pub const CONFIGURATION_KEYPAIR: ErrorCode = ErrorCode("CONFIGURATION_KEYPAIR");

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Serializable error report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceError {
    pub category: ErrorCategory,

    pub code: String,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl ServiceError {
    pub fn new(category: ErrorCategory, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            category,
            code: code.as_str().to_string(),
            message: message.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(context) = &self.context {
            write!(f, "[{}] {}: {}", self.code, self.message, context)
        } else {
            write!(f, "[{}] {}", self.code, self.message)
        }
    }
}

impl std::error::Error for ServiceError {}
