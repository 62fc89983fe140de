//! WAV encoding for recorded clips
//!
//! Captured f32 samples are encoded to 16-bit PCM WAV in memory before being
//! handed to the transcription endpoint.

use crate::audio::recorder::RecordedClip;
use crate::{AssistantError, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;
use tracing::debug;

/// Encode mono f32 samples (range -1.0 to 1.0) as a WAV byte buffer.
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut buffer = Vec::new();
    {
        let cursor = Cursor::new(&mut buffer);
        let mut writer = WavWriter::new(cursor, spec)
            .map_err(|e| AssistantError::IOError(format!("Failed to create WAV writer: {}", e)))?;

        for &sample in samples {
            let sample_i16 = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer
                .write_sample(sample_i16)
                .map_err(|e| AssistantError::IOError(format!("Failed to write sample: {}", e)))?;
        }

        writer
            .finalize()
            .map_err(|e| AssistantError::IOError(format!("Failed to finalize WAV: {}", e)))?;
    }

    debug!(
        "Encoded {} samples at {} Hz into {} WAV bytes",
        samples.len(),
        sample_rate,
        buffer.len()
    );

    Ok(buffer)
}

/// Encode a finalized recording.
pub fn encode_clip(clip: &RecordedClip) -> Result<Vec<u8>> {
    encode_wav(&clip.samples, clip.sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::WavReader;
    use std::f32::consts::PI;

    #[test]
    fn test_encode_round_trip() {
        let sample_rate = 16000;
        let samples: Vec<f32> = (0..sample_rate as usize)
            .map(|i| (2.0 * PI * 440.0 * i as f32 / sample_rate as f32).sin() * 0.5)
            .collect();

        let bytes = encode_wav(&samples, sample_rate).unwrap();

        let mut reader = WavReader::new(Cursor::new(bytes)).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.sample_rate, sample_rate);
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.bits_per_sample, 16);

        let decoded: Vec<f32> = reader
            .samples::<i16>()
            .map(|s| s.unwrap() as f32 / i16::MAX as f32)
            .collect();
        assert_eq!(decoded.len(), samples.len());

        // Some precision loss from the i16 conversion is expected
        for (original, decoded) in samples.iter().zip(decoded.iter()) {
            assert!((original - decoded).abs() < 0.001);
        }
    }

    #[test]
    fn test_encode_empty_clip_is_valid_wav() {
        let bytes = encode_wav(&[], 16000).unwrap();
        let reader = WavReader::new(Cursor::new(bytes)).unwrap();
        assert_eq!(reader.len(), 0);
    }

    #[test]
    fn test_out_of_range_samples_are_clamped() {
        let bytes = encode_wav(&[2.0, -2.0], 8000).unwrap();
        let mut reader = WavReader::new(Cursor::new(bytes)).unwrap();
        let decoded: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(decoded[0], i16::MAX);
        assert_eq!(decoded[1], -i16::MAX);
    }
}
