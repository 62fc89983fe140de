//! Backend gateway pipeline
//!
//! Channel-based interface over `ApiClient`: the UI thread sends commands,
//! a worker thread owning a tokio runtime performs the HTTP round trips and
//! emits events back. Every command resolves to exactly one terminal event —
//! success or `ApiEvent::Error` — so every loading flag in the UI has a
//! guaranteed reset.

use crate::api::client::ApiClient;
use crate::api::types::*;
use crate::integration::config::AppConfig;
use crate::{AssistantError, Result};
use crossbeam_channel::{bounded, Receiver, Sender};
use tokio::runtime::Runtime;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Which backend operation an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiOp {
    Login,
    Chat,
    ConfirmAction,
    ChargePayment,
    Notifications,
    Proactive,
    Upload,
    Transcribe,
    Synthesize,
}

/// Commands that can be sent to the gateway pipeline
#[derive(Debug, Clone)]
pub enum ApiCommand {
    Login {
        username: String,
        password: String,
    },

    SendChat {
        user_id: String,
        message: String,
    },

    ConfirmAction(ConfirmActionRequest),

    /// Never re-issued automatically; a retry requires the user to submit
    /// the payment sheet again.
    ChargePayment(ChargeRequest),

    FetchNotifications {
        user_id: String,
    },

    RunProactive,

    UploadIdPhoto {
        user_id: String,
        file_name: String,
        mime_type: String,
        bytes: Vec<u8>,
    },

    Transcribe {
        wav_bytes: Vec<u8>,
    },

    Synthesize {
        message_id: Uuid,
        text: String,
    },

    Shutdown,
}

/// Events emitted by the gateway pipeline
#[derive(Debug, Clone)]
pub enum ApiEvent {
    LoggedIn(LoginResponse),

    ChatReply(ChatResponse),

    /// The backend acknowledged the user's decision on an action
    ActionResolved {
        accepted: bool,
        status: String,
        detail: String,
    },

    /// The charge settled successfully
    ChargeAccepted {
        action_id: String,
    },

    Notifications(Vec<Notification>),

    ProactiveFinished,

    PhotoUploaded(UploadMediaResponse),

    Transcription {
        text: String,
    },

    /// Synthesized speech for a specific transcript message
    SpeechReady {
        message_id: Uuid,
        audio: Vec<u8>,
    },

    Error {
        op: ApiOp,
        error: AssistantError,
    },

    Shutdown,
}

/// Gateway pipeline with channel-based communication
pub struct ApiPipeline {
    config: AppConfig,
    command_tx: Sender<ApiCommand>,
    command_rx: Receiver<ApiCommand>,
    event_tx: Sender<ApiEvent>,
    event_rx: Receiver<ApiEvent>,
}

impl ApiPipeline {
    pub fn new(config: AppConfig) -> Self {
        let (command_tx, command_rx) = bounded(100);
        let (event_tx, event_rx) = bounded(100);

        Self {
            config,
            command_tx,
            command_rx,
            event_tx,
            event_rx,
        }
    }

    pub fn command_sender(&self) -> Sender<ApiCommand> {
        self.command_tx.clone()
    }

    pub fn event_receiver(&self) -> Receiver<ApiEvent> {
        self.event_rx.clone()
    }

    /// Start the pipeline worker thread.
    pub fn start_worker(self) -> Result<std::thread::JoinHandle<()>> {
        let config = self.config.clone();
        let command_rx = self.command_rx.clone();
        let event_tx = self.event_tx.clone();

        let handle = std::thread::spawn(move || {
            info!("Gateway pipeline worker starting");

            let runtime = match Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    error!("Failed to create tokio runtime: {}", e);
                    let _ = event_tx.send(ApiEvent::Error {
                        op: ApiOp::Login,
                        error: AssistantError::ConfigError(format!(
                            "Runtime creation failed: {}",
                            e
                        )),
                    });
                    let _ = event_tx.send(ApiEvent::Shutdown);
                    return;
                }
            };

            let client = match ApiClient::new(config.base_url.clone(), config.request_timeout) {
                Ok(client) => client,
                Err(e) => {
                    error!("Failed to create API client: {}", e);
                    let _ = event_tx.send(ApiEvent::Error {
                        op: ApiOp::Login,
                        error: e,
                    });
                    let _ = event_tx.send(ApiEvent::Shutdown);
                    return;
                }
            };

            if !runtime.block_on(client.health()) {
                tracing::warn!("Backend at {} is not answering its health check", config.base_url);
            }

            info!("Gateway pipeline worker ready");

            loop {
                match command_rx.recv() {
                    Ok(ApiCommand::Login { username, password }) => {
                        debug!("Processing login for {}", username);
                        let result = runtime.block_on(client.login(&username, &password));
                        let _ = event_tx.send(match result {
                            Ok(session) => ApiEvent::LoggedIn(session),
                            Err(error) => ApiEvent::Error {
                                op: ApiOp::Login,
                                error,
                            },
                        });
                    }

                    Ok(ApiCommand::SendChat { user_id, message }) => {
                        let result = runtime.block_on(client.send_chat(&user_id, &message));
                        let _ = event_tx.send(match result {
                            Ok(reply) => ApiEvent::ChatReply(reply),
                            Err(error) => ApiEvent::Error {
                                op: ApiOp::Chat,
                                error,
                            },
                        });
                    }

                    Ok(ApiCommand::ConfirmAction(request)) => {
                        let accepted = request.accepted;
                        let result = runtime.block_on(client.confirm_action(&request));
                        let _ = event_tx.send(match result {
                            Ok(response) => ApiEvent::ActionResolved {
                                accepted,
                                status: response.status,
                                detail: response.detail,
                            },
                            Err(error) => ApiEvent::Error {
                                op: ApiOp::ConfirmAction,
                                error,
                            },
                        });
                    }

                    Ok(ApiCommand::ChargePayment(request)) => {
                        let action_id = request.action_id.clone();
                        let result = runtime.block_on(client.charge_payment(&request));
                        let _ = event_tx.send(match result {
                            Ok(_) => ApiEvent::ChargeAccepted { action_id },
                            Err(error) => ApiEvent::Error {
                                op: ApiOp::ChargePayment,
                                error,
                            },
                        });
                    }

                    Ok(ApiCommand::FetchNotifications { user_id }) => {
                        let result = runtime.block_on(client.fetch_notifications(&user_id));
                        let _ = event_tx.send(match result {
                            Ok(notifications) => ApiEvent::Notifications(notifications),
                            Err(error) => ApiEvent::Error {
                                op: ApiOp::Notifications,
                                error,
                            },
                        });
                    }

                    Ok(ApiCommand::RunProactive) => {
                        let result = runtime.block_on(client.run_proactive());
                        let _ = event_tx.send(match result {
                            Ok(()) => ApiEvent::ProactiveFinished,
                            Err(error) => ApiEvent::Error {
                                op: ApiOp::Proactive,
                                error,
                            },
                        });
                    }

                    Ok(ApiCommand::UploadIdPhoto {
                        user_id,
                        file_name,
                        mime_type,
                        bytes,
                    }) => {
                        let result = runtime.block_on(client.upload_id_photo(
                            &user_id, &file_name, &mime_type, bytes,
                        ));
                        let _ = event_tx.send(match result {
                            Ok(media) => ApiEvent::PhotoUploaded(media),
                            Err(error) => ApiEvent::Error {
                                op: ApiOp::Upload,
                                error,
                            },
                        });
                    }

                    Ok(ApiCommand::Transcribe { wav_bytes }) => {
                        debug!("Transcribing {} bytes of audio", wav_bytes.len());
                        let result = runtime.block_on(client.transcribe(wav_bytes));
                        let _ = event_tx.send(match result {
                            Ok(text) => ApiEvent::Transcription { text },
                            Err(error) => ApiEvent::Error {
                                op: ApiOp::Transcribe,
                                error,
                            },
                        });
                    }

                    Ok(ApiCommand::Synthesize { message_id, text }) => {
                        let result = runtime.block_on(client.synthesize(&text));
                        let _ = event_tx.send(match result {
                            Ok(audio) => ApiEvent::SpeechReady { message_id, audio },
                            Err(error) => ApiEvent::Error {
                                op: ApiOp::Synthesize,
                                error,
                            },
                        });
                    }

                    Ok(ApiCommand::Shutdown) => {
                        info!("Gateway pipeline worker shutting down");
                        let _ = event_tx.send(ApiEvent::Shutdown);
                        break;
                    }

                    Err(e) => {
                        error!("Command channel error: {}", e);
                        break;
                    }
                }
            }

            info!("Gateway pipeline worker stopped");
        });

        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_creation() {
        let pipeline = ApiPipeline::new(AppConfig::default());

        let _cmd_tx = pipeline.command_sender();
        let _event_rx = pipeline.event_receiver();
    }

    #[test]
    fn test_command_variants() {
        let cmd = ApiCommand::ConfirmAction(ConfirmActionRequest {
            user_id: "u1".into(),
            action_id: "act-1".into(),
            accepted: false,
            service_type: "national_id".into(),
        });

        match cmd {
            ApiCommand::ConfirmAction(request) => {
                assert!(!request.accepted);
                assert_eq!(request.service_type, "national_id");
            }
            _ => panic!("Wrong variant"),
        }
    }

    #[test]
    fn test_error_event_carries_operation() {
        let event = ApiEvent::Error {
            op: ApiOp::ChargePayment,
            error: AssistantError::PaymentDeclined("card expired".into()),
        };

        match event {
            ApiEvent::Error { op, error } => {
                assert_eq!(op, ApiOp::ChargePayment);
                assert!(matches!(error, AssistantError::PaymentDeclined(_)));
            }
            _ => panic!("Wrong variant"),
        }
    }
}
