use crate::api::types::ProposedAction;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    User,
    Assistant,
}

/// One turn in the conversation transcript.
///
/// Messages are append-only: once added, sender/text/image never change.
/// The only late mutation is `audio` — the memoized synthesized speech,
/// attached after the first playback request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub image_path: Option<String>,
    pub proposed_action: Option<ProposedAction>,
    #[serde(skip)]
    pub audio: Option<Arc<Vec<u8>>>,
}

impl Message {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
            text: text.into(),
            timestamp: Utc::now(),
            image_path: None,
            proposed_action: None,
            audio: None,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Sender::Assistant, text)
    }

    pub fn with_action(mut self, action: ProposedAction) -> Self {
        self.proposed_action = Some(action);
        self
    }

    pub fn with_image(mut self, image_path: impl Into<String>) -> Self {
        self.image_path = Some(image_path.into());
        self
    }

    pub fn is_from_user(&self) -> bool {
        self.sender == Sender::User
    }
}
