use crate::consts::Deployment;
use crate::error::SessionError;
use crate::session::SessionState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Failure,
}

/// A message shown to the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Failure,
            message: message.into(),
        }
    }

    /// User-facing text for a failed user action.
    pub fn from_error(err: &SessionError, deployment: &Deployment) -> Self {
        let message = match err {
            SessionError::NetworkMismatch { .. } => {
                format!("Please switch to the {} network!", deployment.network_name)
            }
            SessionError::NotConnected => "Please connect your wallet first.".to_string(),
            SessionError::WalletRejected(_) => "The request was rejected in your wallet.".to_string(),
            SessionError::TransactionFailed { step, reason } => {
                format!("Transaction `{step}` failed: {reason}")
            }
            other => format!("Something went wrong: {other}"),
        };
        Notice::failure(message)
    }
}

/// Receives session state transitions and user notifications.
pub trait Notifier {
    fn state_changed(&self, _state: SessionState) {}

    fn notify(&self, notice: &Notice);
}

/// Writes notices to the log only.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn state_changed(&self, state: SessionState) {
        tracing::debug!(?state, "session state changed");
    }

    fn notify(&self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Failure => tracing::warn!("{}", notice.message),
            _ => tracing::info!("{}", notice.message),
        }
    }
}
