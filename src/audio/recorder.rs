//! Recording session
//!
//! Accumulates captured samples between a start and a stop. Samples are only
//! kept while recording is active; stopping finalizes exactly the samples
//! captured since the last start into one clip. An empty recording yields no
//! clip at all, so nothing downstream (transcription, chat send) runs on
//! silence the device never delivered.

pub struct Recorder {
    recording: bool,
    samples: Vec<f32>,
    sample_rate: u32,
    level: f32,
}

/// One finalized recording, ready for WAV encoding.
#[derive(Debug, Clone)]
pub struct RecordedClip {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl RecordedClip {
    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

impl Recorder {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            recording: false,
            samples: Vec::new(),
            sample_rate,
            level: 0.0,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Begin a recording, discarding anything buffered from before.
    pub fn start(&mut self, sample_rate: u32) {
        self.samples.clear();
        self.sample_rate = sample_rate;
        self.level = 0.0;
        self.recording = true;
    }

    /// Accumulate a captured chunk. Ignored unless recording.
    pub fn push(&mut self, chunk: &[f32]) {
        if !self.recording || chunk.is_empty() {
            return;
        }
        self.samples.extend_from_slice(chunk);

        let rms = (chunk.iter().map(|s| s * s).sum::<f32>() / chunk.len() as f32).sqrt();
        self.level = (rms * 4.0).min(1.0);
    }

    /// Finalize the recording into a single clip.
    ///
    /// Returns `None` when nothing was captured since the last start.
    pub fn stop(&mut self) -> Option<RecordedClip> {
        self.recording = false;
        self.level = 0.0;

        if self.samples.is_empty() {
            return None;
        }

        Some(RecordedClip {
            samples: std::mem::take(&mut self.samples),
            sample_rate: self.sample_rate,
        })
    }

    /// Throw away the recording without producing a clip.
    pub fn discard(&mut self) {
        self.recording = false;
        self.samples.clear();
        self.level = 0.0;
    }

    /// Input level of the most recent chunk, 0.0 to 1.0, for visualization.
    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_accumulate_only_while_recording() {
        let mut recorder = Recorder::new(16000);

        recorder.push(&[0.5; 100]);
        assert_eq!(recorder.duration_secs(), 0.0);

        recorder.start(16000);
        recorder.push(&[0.5; 100]);
        recorder.push(&[0.2; 60]);

        let clip = recorder.stop().unwrap();
        assert_eq!(clip.samples.len(), 160);

        // Stopped: further chunks are ignored
        recorder.push(&[0.5; 100]);
        assert!(recorder.stop().is_none());
    }

    #[test]
    fn test_empty_recording_yields_no_clip() {
        let mut recorder = Recorder::new(16000);
        recorder.start(16000);
        assert!(recorder.stop().is_none());
        assert!(!recorder.is_recording());
    }

    #[test]
    fn test_start_clears_previous_buffer() {
        let mut recorder = Recorder::new(16000);

        recorder.start(16000);
        recorder.push(&[0.9; 500]);

        // A new start discards the old take; the clip holds exactly the
        // samples captured since
        recorder.start(48000);
        recorder.push(&[0.1; 10]);

        let clip = recorder.stop().unwrap();
        assert_eq!(clip.samples.len(), 10);
        assert_eq!(clip.sample_rate, 48000);
    }

    #[test]
    fn test_discard() {
        let mut recorder = Recorder::new(16000);
        recorder.start(16000);
        recorder.push(&[0.4; 200]);
        recorder.discard();

        assert!(!recorder.is_recording());
        assert!(recorder.stop().is_none());
    }

    #[test]
    fn test_level_stays_in_range() {
        let mut recorder = Recorder::new(16000);
        recorder.start(16000);

        recorder.push(&[0.0; 128]);
        assert_eq!(recorder.level(), 0.0);

        recorder.push(&[1.0; 128]);
        assert!(recorder.level() > 0.0);
        assert!(recorder.level() <= 1.0);

        recorder.stop();
        assert_eq!(recorder.level(), 0.0);
    }
}
