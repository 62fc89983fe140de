//! Playback of synthesized speech
//!
//! At most one synthesized track plays at a time: starting a new playback
//! stops and releases the current one first. The decoded source is released
//! when playback finishes, errors, or the player is dropped, so a long chat
//! session never accumulates audio resources.

use crate::{AssistantError, Result};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::io::Cursor;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Shared audio bytes readable by the decoder without copying.
struct SharedAudio(Arc<Vec<u8>>);

impl AsRef<[u8]> for SharedAudio {
    fn as_ref(&self) -> &[u8] {
        self.0.as_slice()
    }
}

pub struct SpeechPlayer {
    output: Option<(OutputStream, OutputStreamHandle)>,
    sink: Option<Sink>,
    current: Option<Uuid>,
}

impl SpeechPlayer {
    pub fn new() -> Self {
        Self {
            output: None,
            sink: None,
            current: None,
        }
    }

    /// Play the synthesized speech for one transcript message.
    ///
    /// Any track already playing is stopped exactly once before the new one
    /// starts — no overlapping audio.
    pub fn play(&mut self, message_id: Uuid, audio: Arc<Vec<u8>>) -> Result<()> {
        self.stop();

        if self.output.is_none() {
            let (stream, handle) = OutputStream::try_default().map_err(|e| {
                AssistantError::AudioDeviceError(format!("No audio output available: {}", e))
            })?;
            self.output = Some((stream, handle));
        }

        let Some((_, handle)) = &self.output else {
            return Err(AssistantError::AudioDeviceError(
                "No audio output available".into(),
            ));
        };

        let sink = Sink::try_new(handle).map_err(|e| {
            AssistantError::AudioDeviceError(format!("Failed to open playback sink: {}", e))
        })?;

        let source = Decoder::new(Cursor::new(SharedAudio(audio))).map_err(|e| {
            AssistantError::AudioDeviceError(format!("Undecodable audio response: {}", e))
        })?;

        sink.append(source);
        sink.play();

        debug!("Playing speech for message {}", message_id);
        self.sink = Some(sink);
        self.current = Some(message_id);
        Ok(())
    }

    /// Stop and release the current track. Idempotent.
    pub fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
            info!("Stopped speech playback");
        }
        self.current = None;
    }

    pub fn is_playing(&self) -> bool {
        self.sink.as_ref().map(|s| !s.empty()).unwrap_or(false)
    }

    /// The message currently being spoken, if any.
    pub fn playing_message(&self) -> Option<Uuid> {
        if self.is_playing() {
            self.current
        } else {
            None
        }
    }

    /// Release the sink once the track has run out. Called every frame.
    pub fn poll(&mut self) {
        if self.sink.is_some() && !self.is_playing() {
            self.sink = None;
            self.current = None;
        }
    }
}

impl Default for SpeechPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SpeechPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}
