//! Integration tests for the recording orchestrator
//!
//! These exercise the worker over its channels: captured samples go in
//! through the audio sender, commands drive the session, and the finalized
//! clip must come out as exactly one transcription request.

use absher_assistant::api::pipeline::ApiCommand;
use absher_assistant::integration::{
    AppConfig, Orchestrator, OrchestratorCommand, OrchestratorEvent,
};
use crossbeam_channel::bounded;
use std::time::Duration;

fn wait_for_event(
    handle: &absher_assistant::integration::OrchestratorHandle,
    matcher: impl Fn(&OrchestratorEvent) -> bool,
) -> bool {
    for _ in 0..50 {
        if let Some(event) = handle.try_recv_event() {
            if matcher(&event) {
                return true;
            }
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    false
}

#[test]
fn test_stop_with_audio_requests_transcription() {
    let (api_tx, api_rx) = bounded::<ApiCommand>(10);
    let (orchestrator, handle) =
        Orchestrator::new(AppConfig::default().without_audio_input(), api_tx).unwrap();
    let _worker = orchestrator.start();

    let audio_tx = handle.audio_sender();

    handle
        .send_command(OrchestratorCommand::StartRecording { sample_rate: 16000 })
        .unwrap();
    assert!(wait_for_event(&handle, |e| {
        matches!(e, OrchestratorEvent::RecordingStarted)
    }));
    assert!(handle.is_recording());

    let samples: Vec<f32> = (0..1600).map(|i| (i as f32 * 0.01).sin()).collect();
    audio_tx.send(samples).unwrap();
    std::thread::sleep(Duration::from_millis(50));

    handle.send_command(OrchestratorCommand::StopRecording).unwrap();
    assert!(wait_for_event(&handle, |e| {
        matches!(e, OrchestratorEvent::RecordingStopped { .. })
    }));
    assert!(!handle.is_recording());

    // Exactly one transcription request, carrying a non-trivial WAV
    match api_rx.recv_timeout(Duration::from_millis(500)) {
        Ok(ApiCommand::Transcribe { wav_bytes }) => {
            assert!(wav_bytes.len() > 44, "WAV should contain sample data");
        }
        other => panic!("Expected a transcription request, got {:?}", other),
    }
    assert!(api_rx.try_recv().is_err());

    handle.send_command(OrchestratorCommand::Shutdown).unwrap();
}

#[test]
fn test_stop_with_no_audio_is_discarded() {
    let (api_tx, api_rx) = bounded::<ApiCommand>(10);
    let (orchestrator, handle) =
        Orchestrator::new(AppConfig::default().without_audio_input(), api_tx).unwrap();
    let _worker = orchestrator.start();

    handle
        .send_command(OrchestratorCommand::StartRecording { sample_rate: 16000 })
        .unwrap();
    assert!(wait_for_event(&handle, |e| {
        matches!(e, OrchestratorEvent::RecordingStarted)
    }));

    // Stop immediately: zero captured samples
    handle.send_command(OrchestratorCommand::StopRecording).unwrap();
    assert!(wait_for_event(&handle, |e| {
        matches!(e, OrchestratorEvent::RecordingDiscarded)
    }));

    // Transcription is never attempted
    assert!(api_rx.recv_timeout(Duration::from_millis(100)).is_err());

    handle.send_command(OrchestratorCommand::Shutdown).unwrap();
}

#[test]
fn test_cancel_discards_captured_audio() {
    let (api_tx, api_rx) = bounded::<ApiCommand>(10);
    let (orchestrator, handle) =
        Orchestrator::new(AppConfig::default().without_audio_input(), api_tx).unwrap();
    let _worker = orchestrator.start();

    let audio_tx = handle.audio_sender();

    handle
        .send_command(OrchestratorCommand::StartRecording { sample_rate: 16000 })
        .unwrap();
    assert!(wait_for_event(&handle, |e| {
        matches!(e, OrchestratorEvent::RecordingStarted)
    }));

    audio_tx.send(vec![0.4f32; 800]).unwrap();
    std::thread::sleep(Duration::from_millis(50));

    handle.send_command(OrchestratorCommand::CancelRecording).unwrap();
    assert!(wait_for_event(&handle, |e| {
        matches!(e, OrchestratorEvent::RecordingCancelled)
    }));
    assert!(!handle.is_recording());

    assert!(api_rx.recv_timeout(Duration::from_millis(100)).is_err());

    handle.send_command(OrchestratorCommand::Shutdown).unwrap();
}

#[test]
fn test_each_stop_finalizes_only_its_own_take() {
    let (api_tx, api_rx) = bounded::<ApiCommand>(10);
    let (orchestrator, handle) =
        Orchestrator::new(AppConfig::default().without_audio_input(), api_tx).unwrap();
    let _worker = orchestrator.start();

    let audio_tx = handle.audio_sender();

    // First take: one second of audio
    handle
        .send_command(OrchestratorCommand::StartRecording { sample_rate: 16000 })
        .unwrap();
    assert!(wait_for_event(&handle, |e| {
        matches!(e, OrchestratorEvent::RecordingStarted)
    }));
    audio_tx.send(vec![0.3f32; 16000]).unwrap();
    std::thread::sleep(Duration::from_millis(50));
    handle.send_command(OrchestratorCommand::StopRecording).unwrap();
    assert!(wait_for_event(&handle, |e| {
        matches!(e, OrchestratorEvent::RecordingStopped { .. })
    }));
    let first = match api_rx.recv_timeout(Duration::from_millis(500)) {
        Ok(ApiCommand::Transcribe { wav_bytes }) => wav_bytes.len(),
        other => panic!("Expected a transcription request, got {:?}", other),
    };

    // Second take: a much shorter clip; the first take must not leak in
    handle
        .send_command(OrchestratorCommand::StartRecording { sample_rate: 16000 })
        .unwrap();
    assert!(wait_for_event(&handle, |e| {
        matches!(e, OrchestratorEvent::RecordingStarted)
    }));
    audio_tx.send(vec![0.3f32; 1600]).unwrap();
    std::thread::sleep(Duration::from_millis(50));
    handle.send_command(OrchestratorCommand::StopRecording).unwrap();
    assert!(wait_for_event(&handle, |e| {
        matches!(e, OrchestratorEvent::RecordingStopped { .. })
    }));
    let second = match api_rx.recv_timeout(Duration::from_millis(500)) {
        Ok(ApiCommand::Transcribe { wav_bytes }) => wav_bytes.len(),
        other => panic!("Expected a transcription request, got {:?}", other),
    };

    assert!(second < first, "Second clip should be shorter than the first");

    handle.send_command(OrchestratorCommand::Shutdown).unwrap();
    assert!(wait_for_event(&handle, |e| {
        matches!(e, OrchestratorEvent::Shutdown)
    }));
}
