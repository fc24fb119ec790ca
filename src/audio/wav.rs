//! WAV encoding/decoding for utterances.
//!
//! Uploads may arrive at any rate and channel count; they are downmixed to
//! mono on read. Resampling is left to the consumer that cares about rate
//! (the Whisper adapter resamples to its 16kHz input).

use crate::error::{DubashError, Result};
use crate::pipeline::types::Utterance;
use std::io::Read;
use std::path::Path;

/// Read a WAV file into a mono utterance, keeping the source sample rate.
pub fn read_file(path: &Path) -> Result<Utterance> {
    let reader = hound::WavReader::open(path).map_err(|e| DubashError::AudioCapture {
        message: format!("Failed to open WAV file {}: {}", path.display(), e),
    })?;
    decode(reader)
}

/// Read WAV data from any reader (for testing/flexibility).
pub fn read(reader: impl Read) -> Result<Utterance> {
    let reader = hound::WavReader::new(reader).map_err(|e| DubashError::AudioCapture {
        message: format!("Failed to parse WAV data: {}", e),
    })?;
    decode(reader)
}

fn decode<R: Read>(mut reader: hound::WavReader<R>) -> Result<Utterance> {
    let spec = reader.spec();

    let raw_samples: Vec<i16> = reader
        .samples::<i16>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| DubashError::AudioCapture {
            message: format!("Failed to read WAV samples: {}", e),
        })?;

    let samples = downmix_to_mono(&raw_samples, spec.channels);
    Ok(Utterance::mono(samples, spec.sample_rate))
}

/// Serialize an utterance to a 16-bit PCM WAV file.
pub fn write_file(path: &Path, utterance: &Utterance) -> Result<()> {
    let spec = hound::WavSpec {
        channels: utterance.channels,
        sample_rate: utterance.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).map_err(|e| DubashError::Artifact {
        message: format!("Failed to create WAV file {}: {}", path.display(), e),
    })?;
    for &sample in &utterance.samples {
        writer.write_sample(sample).map_err(|e| DubashError::Artifact {
            message: format!("Failed to write WAV sample: {}", e),
        })?;
    }
    writer.finalize().map_err(|e| DubashError::Artifact {
        message: format!("Failed to finalize WAV file: {}", e),
    })?;
    Ok(())
}

/// Average interleaved channels down to mono.
pub fn downmix_to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
    if channels <= 1 {
        return samples.to_vec();
    }
    let channels = channels as usize;
    samples
        .chunks_exact(channels)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / channels as i32) as i16
        })
        .collect()
}

/// Simple linear interpolation resampling.
pub fn resample(samples: &[i16], from_rate: u32, to_rate: u32) -> Vec<i16> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = (samples.len() as f64 / ratio).ceil() as usize;

    (0..output_len)
        .map(|i| {
            let pos = i as f64 * ratio;
            let idx = pos as usize;
            let frac = pos - idx as f64;

            if idx + 1 < samples.len() {
                let a = samples[idx] as f64;
                let b = samples[idx + 1] as f64;
                (a + (b - a) * frac) as i16
            } else {
                samples[samples.len() - 1]
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn wav_bytes(samples: &[i16], channels: u16, sample_rate: u32) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for &s in samples {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_write_then_read_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("utterance.wav");
        let utterance = Utterance::mono(vec![100, -200, 300, -400], 48_000);

        write_file(&path, &utterance).unwrap();
        let back = read_file(&path).unwrap();

        assert_eq!(back.samples, utterance.samples);
        assert_eq!(back.sample_rate, 48_000);
        assert_eq!(back.channels, 1);
    }

    #[test]
    fn test_read_downmixes_stereo() {
        let bytes = wav_bytes(&[100, 200, -100, -200], 2, 44_100);

        let utterance = read(Cursor::new(bytes)).unwrap();

        assert_eq!(utterance.channels, 1);
        assert_eq!(utterance.sample_rate, 44_100);
        assert_eq!(utterance.samples, vec![150, -150]);
    }

    #[test]
    fn test_read_keeps_source_rate() {
        let bytes = wav_bytes(&[1, 2, 3], 1, 8_000);
        let utterance = read(Cursor::new(bytes)).unwrap();
        assert_eq!(utterance.sample_rate, 8_000);
    }

    #[test]
    fn test_read_rejects_garbage() {
        let result = read(Cursor::new(b"not a wav file".to_vec()));
        assert!(result.is_err());
    }

    #[test]
    fn test_read_file_missing_path() {
        let result = read_file(Path::new("/nonexistent/audio.wav"));
        assert!(matches!(result, Err(DubashError::AudioCapture { .. })));
    }

    #[test]
    fn test_downmix_mono_passthrough() {
        let samples = vec![1, 2, 3];
        assert_eq!(downmix_to_mono(&samples, 1), samples);
    }

    #[test]
    fn test_downmix_averages_pairs() {
        assert_eq!(downmix_to_mono(&[100, 200, 300, 500], 2), vec![150, 400]);
    }

    #[test]
    fn test_resample_identity() {
        let samples = vec![1, 2, 3, 4];
        assert_eq!(resample(&samples, 16_000, 16_000), samples);
    }

    #[test]
    fn test_resample_empty() {
        assert_eq!(resample(&[], 48_000, 16_000), Vec::<i16>::new());
    }

    #[test]
    fn test_resample_downsample_length() {
        let samples = vec![0i16; 48_000];
        let out = resample(&samples, 48_000, 16_000);
        assert_eq!(out.len(), 16_000);
    }

    #[test]
    fn test_resample_upsample_length() {
        let samples = vec![0i16; 8_000];
        let out = resample(&samples, 8_000, 16_000);
        assert_eq!(out.len(), 16_000);
    }

    #[test]
    fn test_resample_preserves_constant_signal() {
        let samples = vec![1000i16; 4_800];
        let out = resample(&samples, 48_000, 16_000);
        assert!(out.iter().all(|&s| (s - 1000).abs() <= 1));
    }

    #[test]
    fn test_resample_interpolates_between_samples() {
        // Doubling the rate of [0, 100] puts an interpolated value between them.
        let out = resample(&[0, 100], 1, 2);
        assert_eq!(out.len(), 4);
        assert_eq!(out[0], 0);
        assert_eq!(out[1], 50);
    }
}
