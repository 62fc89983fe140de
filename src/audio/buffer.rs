use parking_lot::Mutex;
use ringbuf::{traits::*, HeapRb};
use std::sync::Arc;

/// Thread-safe ring of the most recent capture samples, for the waveform
/// visualization. Writers drop the oldest samples once the window is full;
/// readers take a non-destructive snapshot each frame.
pub struct WaveformBuffer {
    buffer: Arc<Mutex<HeapRb<f32>>>,
}

impl WaveformBuffer {
    /// Create a buffer holding `capacity` samples (the visible window).
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: Arc::new(Mutex::new(HeapRb::new(capacity))),
        }
    }

    /// Append samples, discarding the oldest once full.
    pub fn push(&self, samples: &[f32]) {
        let mut buffer = self.buffer.lock();
        for &sample in samples {
            if buffer.try_push(sample).is_err() {
                let _ = buffer.try_pop();
                let _ = buffer.try_push(sample);
            }
        }
    }

    /// Copy out the current window without consuming it.
    pub fn snapshot(&self) -> Vec<f32> {
        self.buffer.lock().iter().copied().collect()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.buffer.lock().occupied_len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.buffer.lock().capacity().get()
    }
}

impl Clone for WaveformBuffer {
    fn clone(&self) -> Self {
        Self {
            buffer: Arc::clone(&self.buffer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_is_non_destructive() {
        let buffer = WaveformBuffer::new(1024);
        let data: Vec<f32> = (0..100).map(|i| i as f32).collect();
        buffer.push(&data);

        assert_eq!(buffer.snapshot(), data);
        assert_eq!(buffer.snapshot(), data);
        assert_eq!(buffer.len(), 100);
    }

    #[test]
    fn test_overflow_keeps_most_recent_window() {
        let buffer = WaveformBuffer::new(10);
        let data: Vec<f32> = (0..25).map(|i| i as f32).collect();
        buffer.push(&data);

        let window = buffer.snapshot();
        assert_eq!(window.len(), 10);
        assert_eq!(window, (15..25).map(|i| i as f32).collect::<Vec<_>>());
    }

    #[test]
    fn test_clear() {
        let buffer = WaveformBuffer::new(16);
        buffer.push(&[1.0; 8]);
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), 16);
    }

    #[test]
    fn test_shared_across_clones() {
        let buffer = WaveformBuffer::new(16);
        let writer = buffer.clone();
        writer.push(&[0.5; 4]);
        assert_eq!(buffer.len(), 4);
    }
}
