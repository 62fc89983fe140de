pub mod action;
pub mod api;
pub mod audio;
pub mod integration;
pub mod messages;
pub mod session;
pub mod speech;
pub mod ui;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum AssistantError {
    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timed out: {0}")]
    TimeoutError(String),

    #[error("Request rejected: {0}")]
    RequestError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Payment declined: {0}")]
    PaymentDeclined(String),

    #[error("Audio device error: {0}")]
    AudioDeviceError(String),

    #[error("IO error: {0}")]
    IOError(String),

    #[error("Channel error: {0}")]
    ChannelError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<std::io::Error> for AssistantError {
    fn from(e: std::io::Error) -> Self {
        AssistantError::IOError(e.to_string())
    }
}

impl AssistantError {
    /// Check if this error is recoverable by retrying the user action
    pub fn is_recoverable(&self) -> bool {
        match self {
            // User-correctable: re-enter credentials
            AssistantError::AuthError(_) => true,
            // Transient transport failures
            AssistantError::NetworkError(_) => true,
            AssistantError::TimeoutError(_) => true,
            AssistantError::RequestError(_) => true,
            // User-correctable input
            AssistantError::ValidationError(_) => true,
            // Requires explicit user re-initiation, never automatic retry
            AssistantError::PaymentDeclined(_) => true,
            // Hardware/device errors may require user intervention
            AssistantError::AudioDeviceError(_) => false,
            AssistantError::IOError(_) => false,
            AssistantError::ChannelError(_) => false,
            AssistantError::ConfigError(_) => false,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            AssistantError::AuthError(_) => {
                "Invalid username or password.".to_string()
            }
            AssistantError::NetworkError(_) => {
                "Could not reach the Absher backend. Please try again.".to_string()
            }
            AssistantError::TimeoutError(_) => {
                "The backend took too long to respond. Please try again.".to_string()
            }
            AssistantError::RequestError(detail) => {
                if detail.is_empty() {
                    "The backend rejected the request.".to_string()
                } else {
                    detail.clone()
                }
            }
            AssistantError::ValidationError(detail) => detail.clone(),
            AssistantError::PaymentDeclined(reason) => {
                if reason.is_empty() {
                    "Payment was declined.".to_string()
                } else {
                    format!("Payment was declined: {}", reason)
                }
            }
            AssistantError::AudioDeviceError(_) => {
                "Microphone access denied or unavailable. Please check your audio settings."
                    .to_string()
            }
            AssistantError::IOError(_) => "File system error occurred.".to_string(),
            AssistantError::ChannelError(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
            AssistantError::ConfigError(_) => {
                "Configuration error. Please check settings.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AssistantError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_decline_is_not_confused_with_transport() {
        let decline = AssistantError::PaymentDeclined("insufficient funds".into());
        let transport = AssistantError::NetworkError("connection refused".into());

        assert!(matches!(decline, AssistantError::PaymentDeclined(_)));
        assert!(!matches!(transport, AssistantError::PaymentDeclined(_)));
        assert!(decline.user_message().contains("insufficient funds"));
    }

    #[test]
    fn test_device_errors_are_not_recoverable() {
        assert!(!AssistantError::AudioDeviceError("no mic".into()).is_recoverable());
        assert!(AssistantError::TimeoutError("30s elapsed".into()).is_recoverable());
    }

    #[test]
    fn test_request_error_surfaces_server_detail() {
        let err = AssistantError::RequestError("unknown action id".into());
        assert_eq!(err.user_message(), "unknown action id");
    }
}
