//! Recording orchestrator
//!
//! Owns the recording session on a worker thread: the UI starts and stops
//! recordings with commands, the microphone delivers captured frames over a
//! channel, and on stop the finalized clip is WAV-encoded and handed to the
//! gateway for transcription. The most recent capture window is mirrored
//! into a shared buffer for the waveform display.

use crate::api::pipeline::ApiCommand;
use crate::audio::buffer::WaveformBuffer;
use crate::audio::recorder::Recorder;
use crate::audio::wav::encode_clip;
use crate::integration::config::AppConfig;
use crate::Result;
use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

/// Samples kept for the waveform window (about two seconds at 16 kHz)
const WAVEFORM_WINDOW: usize = 16000 * 2;

/// Commands that can be sent to the orchestrator
#[derive(Debug, Clone)]
pub enum OrchestratorCommand {
    /// Begin accumulating captured audio at the given device rate
    StartRecording { sample_rate: u32 },

    /// Finalize the recording and hand it to transcription
    StopRecording,

    /// Throw the recording away without processing
    CancelRecording,

    /// Shut the worker down
    Shutdown,
}

/// Events emitted by the orchestrator
#[derive(Debug, Clone)]
pub enum OrchestratorEvent {
    RecordingStarted,

    /// A clip was finalized and sent for transcription
    RecordingStopped { duration_secs: f32 },

    /// Stop arrived but nothing was captured; no transcription attempted
    RecordingDiscarded,

    RecordingCancelled,

    Shutdown,
}

/// Handle for controlling the orchestrator from the UI
pub struct OrchestratorHandle {
    command_tx: Sender<OrchestratorCommand>,
    event_rx: Receiver<OrchestratorEvent>,
    audio_tx: Sender<Vec<f32>>,
    waveform: WaveformBuffer,
    is_recording: Arc<AtomicBool>,
    audio_level: Arc<Mutex<f32>>,
}

impl OrchestratorHandle {
    pub fn send_command(&self, cmd: OrchestratorCommand) -> Result<()> {
        self.command_tx.send(cmd).map_err(|e| {
            crate::AssistantError::ChannelError(format!("Failed to send command: {}", e))
        })
    }

    pub fn try_recv_event(&self) -> Option<OrchestratorEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Sender the microphone feeds captured frames into
    pub fn audio_sender(&self) -> Sender<Vec<f32>> {
        self.audio_tx.clone()
    }

    /// Shared window of recent samples for the waveform display
    pub fn waveform(&self) -> WaveformBuffer {
        self.waveform.clone()
    }

    pub fn is_recording(&self) -> bool {
        self.is_recording.load(Ordering::SeqCst)
    }

    /// Input level of the current recording, 0.0 to 1.0
    pub fn audio_level(&self) -> f32 {
        *self.audio_level.lock()
    }
}

/// Worker coordinating the recording session
pub struct Orchestrator {
    config: AppConfig,
    command_rx: Receiver<OrchestratorCommand>,
    event_tx: Sender<OrchestratorEvent>,
    api_tx: Sender<ApiCommand>,
    audio_rx: Receiver<Vec<f32>>,
    waveform: WaveformBuffer,
    is_recording: Arc<AtomicBool>,
    audio_level: Arc<Mutex<f32>>,
}

impl Orchestrator {
    /// Create an orchestrator wired to the gateway's command channel.
    pub fn new(
        config: AppConfig,
        api_tx: Sender<ApiCommand>,
    ) -> Result<(Self, OrchestratorHandle)> {
        let (command_tx, command_rx) = bounded(100);
        let (event_tx, event_rx) = bounded(100);
        let (audio_tx, audio_rx) = bounded(1000);

        let waveform = WaveformBuffer::new(WAVEFORM_WINDOW);
        let is_recording = Arc::new(AtomicBool::new(false));
        let audio_level = Arc::new(Mutex::new(0.0));

        let handle = OrchestratorHandle {
            command_tx,
            event_rx,
            audio_tx,
            waveform: waveform.clone(),
            is_recording: Arc::clone(&is_recording),
            audio_level: Arc::clone(&audio_level),
        };

        let orchestrator = Self {
            config,
            command_rx,
            event_tx,
            api_tx,
            audio_rx,
            waveform,
            is_recording,
            audio_level,
        };

        Ok((orchestrator, handle))
    }

    /// Start the worker thread. Consumes the orchestrator.
    pub fn start(self) -> JoinHandle<()> {
        let command_rx = self.command_rx;
        let event_tx = self.event_tx;
        let api_tx = self.api_tx;
        let audio_rx = self.audio_rx;
        let waveform = self.waveform;
        let is_recording = self.is_recording;
        let audio_level = self.audio_level;
        let default_rate = self.config.input_sample_rate;

        thread::spawn(move || {
            info!("Recording orchestrator started");

            let mut recorder = Recorder::new(default_rate);

            loop {
                match command_rx.try_recv() {
                    Ok(OrchestratorCommand::StartRecording { sample_rate }) => {
                        recorder.start(sample_rate);
                        waveform.clear();
                        is_recording.store(true, Ordering::SeqCst);
                        let _ = event_tx.send(OrchestratorEvent::RecordingStarted);
                        debug!("Recording started at {} Hz", sample_rate);
                    }

                    Ok(OrchestratorCommand::StopRecording) => {
                        is_recording.store(false, Ordering::SeqCst);
                        *audio_level.lock() = 0.0;

                        match recorder.stop() {
                            Some(clip) => {
                                let duration_secs = clip.duration_secs();
                                debug!("Recording stopped after {:.2}s", duration_secs);

                                match encode_clip(&clip) {
                                    Ok(wav_bytes) => {
                                        let _ = api_tx.send(ApiCommand::Transcribe { wav_bytes });
                                        let _ = event_tx.send(
                                            OrchestratorEvent::RecordingStopped { duration_secs },
                                        );
                                    }
                                    Err(e) => {
                                        warn!("Failed to encode recording: {}", e);
                                        let _ =
                                            event_tx.send(OrchestratorEvent::RecordingDiscarded);
                                    }
                                }
                            }
                            None => {
                                debug!("Recording stopped with nothing captured");
                                let _ = event_tx.send(OrchestratorEvent::RecordingDiscarded);
                            }
                        }
                    }

                    Ok(OrchestratorCommand::CancelRecording) => {
                        recorder.discard();
                        waveform.clear();
                        is_recording.store(false, Ordering::SeqCst);
                        *audio_level.lock() = 0.0;
                        let _ = event_tx.send(OrchestratorEvent::RecordingCancelled);
                        debug!("Recording cancelled");
                    }

                    Ok(OrchestratorCommand::Shutdown) => {
                        info!("Recording orchestrator shutting down");
                        let _ = event_tx.send(OrchestratorEvent::Shutdown);
                        break;
                    }

                    Err(TryRecvError::Empty) => {}
                    Err(TryRecvError::Disconnected) => {
                        warn!("Orchestrator command channel disconnected");
                        break;
                    }
                }

                // Drain captured frames; the recorder ignores them unless
                // a recording is active
                while let Ok(samples) = audio_rx.try_recv() {
                    if recorder.is_recording() {
                        recorder.push(&samples);
                        waveform.push(&samples);
                        *audio_level.lock() = recorder.level();
                    }
                }

                thread::sleep(std::time::Duration::from_millis(10));
            }

            info!("Recording orchestrator stopped");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orchestrator_creation() {
        let (api_tx, _api_rx) = bounded::<ApiCommand>(10);
        let result = Orchestrator::new(AppConfig::default().without_audio_input(), api_tx);
        assert!(result.is_ok());

        let (_, handle) = result.unwrap();
        assert!(!handle.is_recording());
        assert_eq!(handle.audio_level(), 0.0);
        let _ = handle.audio_sender();
    }
}
