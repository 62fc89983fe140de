//! Application state management
//!
//! Central state for the Absher assistant UI. All network work happens on
//! the gateway pipeline; the UI sends commands, polls events once per frame,
//! and keeps a busy flag per operation so no two chat sends, charge
//! attempts, or confirmations are ever in flight at once.

use crate::action::{AcceptOutcome, ActionFlow, ActionPhase, PaymentForm};
use crate::api::client::{mime_for_file, validate_id_photo};
use crate::api::pipeline::{ApiCommand, ApiEvent, ApiOp};
use crate::api::types::{ChargeRequest, ConfirmActionRequest, Notification, NotificationChannel};
use crate::integration::orchestrator::{OrchestratorCommand, OrchestratorEvent, OrchestratorHandle};
use crate::messages::{Message, MessageStorage};
use crate::session::{Session, SessionStore};
use crate::speech::SpeechPlayer;
use crate::AssistantError;
use crossbeam_channel::{Receiver, Sender};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[cfg(feature = "audio-io")]
use crate::audio::Microphone;

/// Greeting shown when a session opens
pub const WELCOME: &str = "مرحباً، أنا مساعد أبشر الذكي. كيف يمكنني خدمتك اليوم؟";
/// Substituted assistant turn when a chat round trip fails
pub const CHAT_FAILED: &str = "عذراً، حدث خطأ في الاتصال. يرجى المحاولة مرة أخرى.";
/// Client-side upload rejections
pub const UPLOAD_NOT_IMAGE: &str = "الرجاء اختيار ملف صورة صالح.";
pub const UPLOAD_TOO_LARGE: &str = "حجم الصورة كبير جداً. الرجاء اختيار صورة أصغر من 10 ميجابايت.";
pub const UPLOAD_SENT: &str = "تم رفع صورة للهوية الوطنية";
pub const UPLOAD_FAILED: &str = "حدث خطأ أثناء معالجة الصورة. يرجى المحاولة مرة أخرى.";
/// Voice capture produced nothing usable
pub const NOTHING_RECOGNIZED: &str = "لم يتم التعرف على أي كلام. حاول مرة أخرى.";
/// A proposed action whose service type cannot be resolved
pub const SERVICE_UNKNOWN: &str = "تعذر تحديد نوع الخدمة لهذا الإجراء.";

/// Quick-start services offered above an empty chat
pub const QUICK_ACTIONS: [&str; 5] = [
    "تجديد الهوية",
    "سداد المخالفات",
    "حجز موعد",
    "إصدار جواز سفر",
    "نقل ملكية مركبة",
];

/// Recording state for voice input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingState {
    /// Not recording
    Idle,
    /// Currently recording audio
    Recording,
    /// Clip sent for transcription, awaiting the text
    Processing,
}

/// Login form state
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub error: Option<String>,
    pub busy: bool,
}

/// Central application state
pub struct AppState {
    /// Persisted login identity
    session_store: SessionStore,
    pub session: Option<Session>,
    pub login: LoginForm,

    /// Conversation transcript (thread-safe)
    pub messages: MessageStorage,

    /// Current text input
    pub input_text: String,
    pub is_sending: bool,

    /// Active proposed-action workflow
    pub action_flow: ActionFlow,
    pub payment_form: PaymentForm,
    pub payment_error: Option<String>,
    pub confirm_busy: bool,

    /// Notification panels
    pub notifications: Vec<Notification>,
    pub notifications_busy: bool,
    pub proactive_busy: bool,

    /// ID-photo upload
    pub upload_path: String,
    pub show_upload: bool,
    pub is_uploading: bool,

    /// Voice capture
    pub audio_enabled: bool,
    pub recording_state: RecordingState,
    pub mic_error: Option<String>,
    #[cfg(feature = "audio-io")]
    microphone: Option<Microphone>,

    /// Speech playback
    pub player: SpeechPlayer,
    pending_synthesis: Option<Uuid>,

    /// Transient status banner
    pub toast: Option<String>,

    /// Gateway wiring
    api_tx: Option<Sender<ApiCommand>>,
    api_rx: Option<Receiver<ApiEvent>>,
    orchestrator: Option<OrchestratorHandle>,
}

impl AppState {
    /// Create the state, restoring any persisted session.
    pub fn new(session_store: SessionStore) -> Self {
        let session = session_store.load();
        let messages = MessageStorage::new();
        if let Some(session) = &session {
            info!("Restored session for {}", session.user_name);
            messages.add(Message::assistant(WELCOME));
        }

        Self {
            session_store,
            session,
            login: LoginForm::default(),
            messages,
            input_text: String::new(),
            is_sending: false,
            action_flow: ActionFlow::new(),
            payment_form: PaymentForm::default(),
            payment_error: None,
            confirm_busy: false,
            notifications: Vec::new(),
            notifications_busy: false,
            proactive_busy: false,
            upload_path: String::new(),
            show_upload: false,
            is_uploading: false,
            audio_enabled: true,
            recording_state: RecordingState::Idle,
            mic_error: None,
            #[cfg(feature = "audio-io")]
            microphone: None,
            player: SpeechPlayer::new(),
            pending_synthesis: None,
            toast: None,
            api_tx: None,
            api_rx: None,
            orchestrator: None,
        }
    }

    /// Wire the gateway channels.
    pub fn connect_api(&mut self, command_tx: Sender<ApiCommand>, event_rx: Receiver<ApiEvent>) {
        self.api_tx = Some(command_tx);
        self.api_rx = Some(event_rx);
        // A restored session can fetch its notifications right away
        if self.session.is_some() {
            self.fetch_notifications();
        }
    }

    pub fn connect_orchestrator(&mut self, handle: OrchestratorHandle) {
        self.orchestrator = Some(handle);
    }

    pub fn orchestrator(&self) -> Option<&OrchestratorHandle> {
        self.orchestrator.as_ref()
    }

    fn send_api(&self, command: ApiCommand) -> bool {
        match &self.api_tx {
            Some(tx) => tx.send(command).is_ok(),
            None => false,
        }
    }

    // ---------- login / logout ----------

    pub fn submit_login(&mut self) {
        if self.login.busy {
            return;
        }
        let username = self.login.username.trim().to_string();
        let password = self.login.password.clone();
        if username.is_empty() || password.is_empty() {
            self.login.error = Some("Please enter a username and password.".into());
            return;
        }

        self.login.error = None;
        if self.send_api(ApiCommand::Login { username, password }) {
            self.login.busy = true;
        }
    }

    pub fn logout(&mut self) {
        info!("Logging out");
        self.session_store.clear();
        self.session = None;
        self.messages.clear();
        self.notifications.clear();
        self.action_flow.finish();
        self.payment_form.reset();
        self.player.stop();
        self.pending_synthesis = None;
        self.stop_capture();
    }

    // ---------- chat ----------

    /// Send a text message to the assistant, as typed or as transcribed.
    pub fn send_text(&mut self, text: impl Into<String>) -> bool {
        let text = text.into().trim().to_string();
        if text.is_empty() || self.is_sending {
            return false;
        }
        let user_id = match &self.session {
            Some(session) => session.user_id.clone(),
            None => return false,
        };

        self.messages.add(Message::user(text.clone()));
        if self.send_api(ApiCommand::SendChat { user_id, message: text }) {
            self.is_sending = true;
        } else {
            self.messages.add(Message::assistant(CHAT_FAILED));
        }
        true
    }

    /// Send whatever is in the input field.
    pub fn send_message(&mut self) {
        let text = self.input_text.trim().to_string();
        if text.is_empty() {
            return;
        }
        if self.send_text(text) {
            self.input_text.clear();
        }
    }

    /// A quick-action tap sends its label as a chat message.
    pub fn send_quick_action(&mut self, label: &str) {
        self.send_text(label);
    }

    // ---------- proposed action workflow ----------

    pub fn accept_action(&mut self) {
        if self.confirm_busy {
            return;
        }
        match self.action_flow.accept() {
            Some(AcceptOutcome::CollectPayment) => {
                self.payment_form.reset();
                self.payment_error = None;
            }
            Some(AcceptOutcome::Confirm) => self.dispatch_confirm(true),
            None => {}
        }
    }

    pub fn reject_action(&mut self) {
        if self.confirm_busy {
            return;
        }
        if self.action_flow.reject() {
            self.dispatch_confirm(false);
        }
    }

    pub fn cancel_action(&mut self) {
        if self.confirm_busy {
            return;
        }
        if self.action_flow.cancel() {
            self.payment_form.reset();
            self.payment_error = None;
        }
    }

    /// Submit the payment sheet and start the charge.
    pub fn submit_payment(&mut self) {
        if self.action_flow.phase() != Some(ActionPhase::AwaitingPayment) {
            return;
        }
        if !self.payment_form.is_complete() {
            self.payment_error = Some("الرجاء تعبئة جميع حقول البطاقة.".into());
            return;
        }
        let (user_id, action_id, amount, currency) = match (&self.session, self.action_flow.action())
        {
            (Some(session), Some(action)) => match action.amount() {
                Some(amount) => (
                    session.user_id.clone(),
                    action.id.clone(),
                    amount,
                    action.currency().to_string(),
                ),
                None => return,
            },
            _ => return,
        };

        if !self.action_flow.begin_charge() {
            return;
        }
        self.payment_error = None;

        let request = ChargeRequest {
            user_id,
            action_id,
            amount,
            currency,
            card: self.payment_form.to_card(),
        };
        if !self.send_api(ApiCommand::ChargePayment(request)) {
            self.action_flow
                .charge_declined(AssistantError::ChannelError("gateway unavailable".into()).user_message());
        }
    }

    /// Issue the confirmation round trip for the active action.
    ///
    /// The service type must be resolvable from the action payload; without
    /// it the whole confirmation step is aborted client-side and no call is
    /// made.
    fn dispatch_confirm(&mut self, accepted: bool) {
        let (user_id, action) = match (&self.session, self.action_flow.action()) {
            (Some(session), Some(action)) => (session.user_id.clone(), action),
            _ => return,
        };

        let service_type = match action.service_type() {
            Some(service_type) => service_type.to_string(),
            None => {
                warn!("Proposed action {} has no resolvable service type", action.id);
                self.toast = Some(SERVICE_UNKNOWN.into());
                self.action_flow.finish();
                self.payment_form.reset();
                return;
            }
        };

        let request = ConfirmActionRequest {
            user_id,
            action_id: action.id.clone(),
            accepted,
            service_type,
        };
        if self.send_api(ApiCommand::ConfirmAction(request)) {
            self.confirm_busy = true;
        } else {
            self.toast = Some(AssistantError::ChannelError("gateway unavailable".into()).user_message());
            self.action_flow.finish();
        }
    }

    // ---------- notifications ----------

    pub fn fetch_notifications(&mut self) {
        let user_id = match &self.session {
            Some(session) => session.user_id.clone(),
            None => return,
        };
        if self.send_api(ApiCommand::FetchNotifications { user_id }) {
            self.notifications_busy = true;
        }
    }

    pub fn run_proactive(&mut self) {
        if self.proactive_busy || self.session.is_none() {
            return;
        }
        if self.send_api(ApiCommand::RunProactive) {
            self.proactive_busy = true;
        }
    }

    /// SMS notifications, newest first, for the phone mock.
    pub fn sms_notifications(&self) -> Vec<&Notification> {
        let mut sms: Vec<&Notification> = self
            .notifications
            .iter()
            .filter(|n| n.channel == NotificationChannel::Sms)
            .collect();
        sms.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        sms
    }

    pub fn in_app_notifications(&self) -> Vec<&Notification> {
        self.notifications
            .iter()
            .filter(|n| n.channel == NotificationChannel::InApp)
            .collect()
    }

    // ---------- ID photo upload ----------

    /// Upload the file named in the upload field.
    ///
    /// Non-image and oversized files are rejected here, before any network
    /// round trip, with the same transcript messages the portal shows.
    pub fn upload_photo(&mut self) {
        if self.is_uploading {
            return;
        }
        let user_id = match &self.session {
            Some(session) => session.user_id.clone(),
            None => return,
        };
        let path = self.upload_path.trim().to_string();
        if path.is_empty() {
            return;
        }

        let file_name = std::path::Path::new(&path)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.clone());
        let mime_type = mime_for_file(&file_name);

        let metadata = match std::fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) => {
                self.toast = Some(format!("Cannot read file: {}", e));
                return;
            }
        };

        if let Err(error) = validate_id_photo(mime_type, metadata.len()) {
            let text = if mime_type.starts_with("image/") {
                UPLOAD_TOO_LARGE
            } else {
                UPLOAD_NOT_IMAGE
            };
            debug!("Rejected upload client-side: {}", error);
            self.messages.add(Message::assistant(text));
            return;
        }

        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.toast = Some(format!("Cannot read file: {}", e));
                return;
            }
        };

        self.messages.add(Message::user(UPLOAD_SENT).with_image(path));
        if self.send_api(ApiCommand::UploadIdPhoto {
            user_id,
            file_name,
            mime_type: mime_type.to_string(),
            bytes,
        }) {
            self.is_uploading = true;
            self.show_upload = false;
            self.upload_path.clear();
        } else {
            self.messages.add(Message::assistant(UPLOAD_FAILED));
        }
    }

    // ---------- voice capture ----------

    #[cfg(feature = "audio-io")]
    pub fn toggle_recording(&mut self) {
        match self.recording_state {
            RecordingState::Idle => self.start_recording(),
            RecordingState::Recording => self.stop_recording(),
            RecordingState::Processing => {}
        }
    }

    #[cfg(feature = "audio-io")]
    fn start_recording(&mut self) {
        if self.session.is_none() {
            return;
        }
        if !self.audio_enabled {
            self.mic_error = Some("Audio capture is disabled.".into());
            return;
        }

        // Acquire the device on first use; it stays armed between takes
        if self.microphone.is_none() {
            match Microphone::open() {
                Ok(microphone) => self.microphone = Some(microphone),
                Err(e) => {
                    warn!("Microphone acquisition failed: {}", e);
                    self.mic_error = Some(e.user_message());
                    return;
                }
            }
        }

        let Some(handle) = &self.orchestrator else {
            return;
        };
        let audio_tx = handle.audio_sender();

        if let Some(microphone) = &mut self.microphone {
            if let Err(e) = microphone.start(audio_tx) {
                self.mic_error = Some(e.user_message());
                self.microphone = None;
                return;
            }
            let sample_rate = microphone.sample_rate();
            let _ = handle.send_command(OrchestratorCommand::StartRecording { sample_rate });
            self.recording_state = RecordingState::Recording;
            self.mic_error = None;
        }
    }

    #[cfg(feature = "audio-io")]
    fn stop_recording(&mut self) {
        if self.recording_state != RecordingState::Recording {
            return;
        }
        if let Some(handle) = &self.orchestrator {
            let _ = handle.send_command(OrchestratorCommand::StopRecording);
        }
        self.recording_state = RecordingState::Processing;
    }

    #[cfg(not(feature = "audio-io"))]
    pub fn toggle_recording(&mut self) {
        self.mic_error = Some("Audio capture is disabled in this build.".into());
    }

    /// Release the microphone and cancel any recording in progress.
    /// Safe from any state.
    pub fn stop_capture(&mut self) {
        if self.recording_state == RecordingState::Recording {
            if let Some(handle) = &self.orchestrator {
                let _ = handle.send_command(OrchestratorCommand::CancelRecording);
            }
        }
        self.recording_state = RecordingState::Idle;
        #[cfg(feature = "audio-io")]
        {
            if let Some(mut microphone) = self.microphone.take() {
                microphone.close();
            }
        }
    }

    // ---------- speech playback ----------

    /// Play (or stop) the spoken form of an assistant message.
    ///
    /// Synthesis happens at most once per message: the first play requests
    /// it from the backend and caches the audio on the message, replays hit
    /// the cache without another call.
    pub fn play_message(&mut self, id: Uuid) {
        if self.player.playing_message() == Some(id) {
            self.player.stop();
            return;
        }

        if let Some(audio) = self.messages.audio_for(id) {
            if let Err(e) = self.player.play(id, audio) {
                self.toast = Some(e.user_message());
            }
            return;
        }

        if self.pending_synthesis.is_some() {
            return;
        }
        let text = self
            .messages
            .get_all()
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.text.clone());
        if let Some(text) = text {
            if self.send_api(ApiCommand::Synthesize { message_id: id, text }) {
                self.pending_synthesis = Some(id);
            }
        }
    }

    // ---------- event pump ----------

    /// Process incoming events from the gateway and the orchestrator.
    /// Called once per frame.
    pub fn poll_events(&mut self) {
        let api_events: Vec<ApiEvent> = match &self.api_rx {
            Some(rx) => rx.try_iter().collect(),
            None => Vec::new(),
        };
        for event in api_events {
            self.handle_api_event(event);
        }

        let orchestrator_events: Vec<OrchestratorEvent> = match &self.orchestrator {
            Some(handle) => {
                let mut events = Vec::new();
                while let Some(event) = handle.try_recv_event() {
                    events.push(event);
                }
                events
            }
            None => Vec::new(),
        };
        for event in orchestrator_events {
            self.handle_orchestrator_event(event);
        }

        self.player.poll();
    }

    fn handle_api_event(&mut self, event: ApiEvent) {
        match event {
            ApiEvent::LoggedIn(response) => {
                self.login.busy = false;
                self.login.password.clear();
                let session = Session {
                    user_id: response.user_id,
                    user_name: response.name,
                };
                if let Err(e) = self.session_store.save(&session) {
                    warn!("Failed to persist session: {}", e);
                }
                self.toast = Some(format!("Welcome, {}!", session.user_name));
                self.messages.clear();
                self.messages.add(Message::assistant(WELCOME));
                self.notifications.clear();
                self.session = Some(session);
                self.fetch_notifications();
            }

            ApiEvent::ChatReply(reply) => {
                self.is_sending = false;
                let mut message = Message::assistant(reply.reply);
                if let Some(action) = reply.proposed_action {
                    message = message.with_action(action.clone());
                    if !self.action_flow.propose(action) {
                        debug!("Proposal dropped: another action is pending resolution");
                    }
                }
                self.messages.add(message);
            }

            ApiEvent::ActionResolved { accepted, status, detail } => {
                debug!("Action resolved: {} ({})", status, accepted);
                self.confirm_busy = false;
                self.messages.add(Message::assistant(detail));
                self.action_flow.finish();
                self.payment_form.reset();
                self.payment_error = None;
                self.toast = Some(if accepted {
                    "Action confirmed.".into()
                } else {
                    "Action rejected.".into()
                });
            }

            ApiEvent::ChargeAccepted { action_id } => {
                debug!("Charge accepted for action {}", action_id);
                if self.action_flow.charge_succeeded() {
                    self.dispatch_confirm(true);
                }
            }

            ApiEvent::Notifications(notifications) => {
                self.notifications_busy = false;
                self.notifications = notifications;
            }

            ApiEvent::ProactiveFinished => {
                self.proactive_busy = false;
                self.toast = Some("Proactive engine executed.".into());
                self.fetch_notifications();
            }

            ApiEvent::PhotoUploaded(media) => {
                self.is_uploading = false;
                self.messages.add(Message::assistant(format!(
                    "تم معالجة الصورة بنجاح! تم إزالة الخلفية وتجهيزها لصورة الهوية الوطنية.\n\nمعرف الصورة: {}",
                    media.media_id
                )));
            }

            ApiEvent::Transcription { text } => {
                self.recording_state = RecordingState::Idle;
                if text.trim().is_empty() {
                    self.toast = Some(NOTHING_RECOGNIZED.into());
                } else {
                    self.send_text(text);
                }
            }

            ApiEvent::SpeechReady { message_id, audio } => {
                self.pending_synthesis = None;
                let audio = Arc::new(audio);
                self.messages.attach_audio(message_id, audio.clone());
                if let Err(e) = self.player.play(message_id, audio) {
                    self.toast = Some(e.user_message());
                }
            }

            ApiEvent::Error { op, error } => self.handle_api_error(op, error),

            ApiEvent::Shutdown => {
                debug!("Gateway pipeline shut down");
            }
        }
    }

    fn handle_api_error(&mut self, op: ApiOp, error: AssistantError) {
        warn!("{:?} failed: {}", op, error);
        match op {
            ApiOp::Login => {
                self.login.busy = false;
                // Wrong credentials never clobber an existing session
                self.login.error = Some(error.user_message());
            }
            ApiOp::Chat => {
                self.is_sending = false;
                // The exchange stays on record: substitute an error turn
                self.messages.add(Message::assistant(CHAT_FAILED));
            }
            ApiOp::ConfirmAction => {
                self.confirm_busy = false;
                self.toast = Some(error.user_message());
                // Unconditional clear: the workflow never stays open
                self.action_flow.finish();
                self.payment_form.reset();
            }
            ApiOp::ChargePayment => {
                let reason = match &error {
                    AssistantError::PaymentDeclined(reason) => reason.clone(),
                    other => other.user_message(),
                };
                self.action_flow.charge_declined(reason);
            }
            ApiOp::Notifications => {
                self.notifications_busy = false;
                self.toast = Some(error.user_message());
            }
            ApiOp::Proactive => {
                self.proactive_busy = false;
                self.toast = Some("Proactive engine failed.".into());
            }
            ApiOp::Upload => {
                self.is_uploading = false;
                self.messages.add(Message::assistant(UPLOAD_FAILED));
            }
            ApiOp::Transcribe => {
                self.recording_state = RecordingState::Idle;
                self.toast = Some(error.user_message());
            }
            ApiOp::Synthesize => {
                self.pending_synthesis = None;
                self.toast = Some("Failed to play audio.".into());
            }
        }
    }

    fn handle_orchestrator_event(&mut self, event: OrchestratorEvent) {
        match event {
            OrchestratorEvent::RecordingStarted => {}
            OrchestratorEvent::RecordingStopped { duration_secs } => {
                debug!("Clip of {:.2}s sent for transcription", duration_secs);
                self.recording_state = RecordingState::Processing;
            }
            OrchestratorEvent::RecordingDiscarded => {
                self.recording_state = RecordingState::Idle;
                self.toast = Some(NOTHING_RECOGNIZED.into());
            }
            OrchestratorEvent::RecordingCancelled => {
                self.recording_state = RecordingState::Idle;
            }
            OrchestratorEvent::Shutdown => {
                debug!("Orchestrator shut down");
            }
        }
    }

    /// Tear everything down: workers, microphone, playback.
    pub fn shutdown(&mut self) {
        self.stop_capture();
        self.player.stop();
        if let Some(handle) = &self.orchestrator {
            let _ = handle.send_command(OrchestratorCommand::Shutdown);
        }
        if let Some(tx) = &self.api_tx {
            let _ = tx.send(ApiCommand::Shutdown);
        }
    }
}
