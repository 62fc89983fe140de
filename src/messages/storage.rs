use super::types::Message;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Thread-safe, append-only conversation transcript.
///
/// Ordering is strictly insertion order and ids are never reused. Apart from
/// clearing on logout, the only mutation after insertion is attaching the
/// memoized synthesized audio to an existing message.
#[derive(Debug, Clone)]
pub struct MessageStorage {
    messages: Arc<RwLock<Vec<Message>>>,
}

impl MessageStorage {
    pub fn new() -> Self {
        Self {
            messages: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn add(&self, message: Message) {
        self.messages.write().push(message);
    }

    pub fn get_all(&self) -> Vec<Message> {
        self.messages.read().clone()
    }

    /// Memoize synthesized speech on an existing message.
    ///
    /// Returns false when the message does not exist or already has audio —
    /// synthesis happens at most once per message, replays hit the cache.
    pub fn attach_audio(&self, id: Uuid, audio: Arc<Vec<u8>>) -> bool {
        let mut messages = self.messages.write();
        match messages.iter_mut().find(|m| m.id == id) {
            Some(message) if message.audio.is_none() => {
                debug!("Caching {} bytes of speech on message {}", audio.len(), id);
                message.audio = Some(audio);
                true
            }
            _ => false,
        }
    }

    pub fn audio_for(&self, id: Uuid) -> Option<Arc<Vec<u8>>> {
        self.messages
            .read()
            .iter()
            .find(|m| m.id == id)
            .and_then(|m| m.audio.clone())
    }

    pub fn clear(&self) {
        self.messages.write().clear();
    }

    pub fn len(&self) -> usize {
        self.messages.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.read().is_empty()
    }
}

impl Default for MessageStorage {
    fn default() -> Self {
        Self::new()
    }
}
