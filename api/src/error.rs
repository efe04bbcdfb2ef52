use thiserror::Error;

use crate::consts::USER_REJECTED_CODE;

/// Failure reported by a wallet provider or JSON-RPC endpoint.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("could not decode response: {0}")]
    Decode(String),

    #[error("wallet provider unavailable: {0}")]
    Unavailable(String),
}

impl ProviderError {
    /// The user dismissed the wallet prompt.
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, ProviderError::Rpc { code, .. } if *code == USER_REJECTED_CODE)
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Decode(err.to_string())
    }
}

/// Errors surfaced by the session client.
///
/// Everything except [`SessionError::Provider`] is an expected condition the
/// user can act on. `Provider` carries failures nobody anticipated (broken
/// transport, undecodable responses) and is logged at error level.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("wallet is not connected")]
    NotConnected,

    #[error("wrong network: expected chain {expected}, wallet is on chain {actual}")]
    NetworkMismatch { expected: u64, actual: u64 },

    #[error("request rejected in wallet: {0}")]
    WalletRejected(String),

    #[error("query `{query}` failed: {reason}")]
    QueryFailed { query: String, reason: String },

    #[error("transaction `{step}` failed: {reason}")]
    TransactionFailed { step: String, reason: String },

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl SessionError {
    pub fn is_expected(&self) -> bool {
        !matches!(self, SessionError::Provider(_))
    }

    pub(crate) fn query(query: impl Into<String>, err: ProviderError) -> Self {
        if err.is_user_rejection() {
            return SessionError::WalletRejected(err.to_string());
        }
        SessionError::QueryFailed {
            query: query.into(),
            reason: err.to_string(),
        }
    }

    pub(crate) fn transaction(step: impl Into<String>, err: ProviderError) -> Self {
        if err.is_user_rejection() {
            return SessionError::WalletRejected(err.to_string());
        }
        SessionError::TransactionFailed {
            step: step.into(),
            reason: err.to_string(),
        }
    }
}

pub type Result<T, E = SessionError> = std::result::Result<T, E>;
