use shared::errors::{ErrorCategory, ErrorCode, ServiceError};
use shared::types::LayoutError;
use solana_client::client_error::ClientError;
use solana_sdk::pubkey::{Pubkey, PubkeyError};

#[derive(Debug, thiserror::Error)]
pub enum GreeterError {
    #[error("RPC request failed: {0}")]
    Connection(#[source] Box<ClientError>),

    #[error("Websocket subscription failed: {0}")]
    Subscription(String),

    #[error("Failed to create greeting account {address}: {source}")]
    ProvisioningRejected {
        address: Pubkey,
        #[source]
        source: Box<ClientError>,
    },

    #[error("Account {address} cannot be used as a greeting account: {reason}")]
    IncompatibleAccount { address: Pubkey, reason: String },

    #[error("Greet transaction rejected: {0}")]
    Submission(#[source] Box<ClientError>),

    #[error("Greeting account {0} has not been provisioned in this session")]
    NotProvisioned(Pubkey),

    #[error("Greeting account {0} not found")]
    AccountNotFound(Pubkey),

    #[error("Failed to decode greeting account {address}: {source}")]
    Decode {
        address: Pubkey,
        #[source]
        source: LayoutError,
    },

    #[error("Cancelled while waiting for confirmation")]
    Cancelled,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to load keypair from {path}: {reason}")]
    Identity { path: String, reason: String },

    #[error("Failed to derive greeting account address: {0}")]
    Derivation(#[from] PubkeyError),
}

impl GreeterError {
    pub(crate) fn connection(error: ClientError) -> Self {
        GreeterError::Connection(Box::new(error))
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            GreeterError::Connection(_) | GreeterError::Subscription(_) => {
                ErrorCategory::Connection
            }
            GreeterError::ProvisioningRejected { .. } | GreeterError::IncompatibleAccount { .. } => {
                ErrorCategory::Provisioning
            }
            GreeterError::Submission(_) => ErrorCategory::Submission,
            GreeterError::NotProvisioned(_) => ErrorCategory::State,
            GreeterError::AccountNotFound(_) => ErrorCategory::NotFound,
            GreeterError::Decode { .. } => ErrorCategory::Decode,
            GreeterError::Cancelled => ErrorCategory::Cancelled,
            GreeterError::Config(_)
            | GreeterError::Identity { .. }
            | GreeterError::Derivation(_) => ErrorCategory::Configuration,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            GreeterError::Connection(_) => ErrorCode::CONNECTION_RPC_UNAVAILABLE,
            GreeterError::Subscription(_) => ErrorCode::CONNECTION_WS_UNAVAILABLE,
            GreeterError::ProvisioningRejected { .. } => ErrorCode::PROVISIONING_REJECTED,
            GreeterError::IncompatibleAccount { .. } => ErrorCode::PROVISIONING_INCOMPATIBLE_ACCOUNT,
            GreeterError::Submission(_) => ErrorCode::SUBMISSION_REJECTED,
            GreeterError::NotProvisioned(_) => ErrorCode::STATE_NOT_PROVISIONED,
            GreeterError::AccountNotFound(_) => ErrorCode::NOT_FOUND_GREETING_ACCOUNT,
            GreeterError::Decode { .. } => ErrorCode::DECODE_GREETING_ACCOUNT,
            GreeterError::Cancelled => ErrorCode::CANCELLED,
            GreeterError::Identity { .. } => ErrorCode::CONFIGURATION_KEYPAIR,
            GreeterError::Config(_) | GreeterError::Derivation(_) => {
                ErrorCode::CONFIGURATION_INVALID
            }
        }
    }

    /// Serializable report for the JSON output mode. The source is added
    /// as context only when the message does not already carry it.
    pub fn to_service_error(&self) -> ServiceError {
        let message = self.to_string();
        let context = std::error::Error::source(self)
            .map(|source| source.to_string())
            .filter(|reason| !message.contains(reason.as_str()));

        let error = ServiceError::new(self.category(), self.code(), message);
        match context {
            Some(reason) => error.with_context(reason),
            None => error,
        }
    }
}

pub type Result<T> = std::result::Result<T, GreeterError>;
