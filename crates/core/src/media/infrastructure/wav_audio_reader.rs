use std::path::Path;

use hound::{SampleFormat, WavReader};

use super::media_error::MediaError;
use crate::audio::domain::audio_buffer::AudioBuffer;
use crate::media::domain::audio_reader::AudioReader;

/// Decodes WAV files with hound and downmixes them to mono.
///
/// The file must already be at the requested sample rate.
pub struct WavAudioReader;

impl AudioReader for WavAudioReader {
    fn read_audio(
        &self,
        path: &Path,
        target_sample_rate: u32,
    ) -> Result<AudioBuffer, Box<dyn std::error::Error>> {
        let mut reader = WavReader::open(path).map_err(MediaError::from)?;
        let spec = reader.spec();
        if spec.sample_rate != target_sample_rate {
            return Err(MediaError::SampleRateMismatch {
                path: path.to_path_buf(),
                found: spec.sample_rate,
                expected: target_sample_rate,
            }
            .into());
        }

        let interleaved: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
            (SampleFormat::Float, 32) => reader
                .samples::<f32>()
                .collect::<Result<_, _>>()
                .map_err(MediaError::from)?,
            (SampleFormat::Int, bits @ 8..=32) => {
                let scale = 1.0 / (1_i64 << (bits - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 * scale))
                    .collect::<Result<_, _>>()
                    .map_err(MediaError::from)?
            }
            (format, bits) => {
                return Err(MediaError::UnsupportedFormat {
                    path: path.to_path_buf(),
                    bits,
                    format: match format {
                        SampleFormat::Float => "float",
                        SampleFormat::Int => "int",
                    },
                }
                .into())
            }
        };

        let samples = downmix(&interleaved, spec.channels as usize);
        log::debug!(
            "Decoded {} ({} Hz, {} channels, {} frames)",
            path.display(),
            spec.sample_rate,
            spec.channels,
            samples.len()
        );
        Ok(AudioBuffer::mono(samples, target_sample_rate))
    }

    fn audio_metadata(&self, path: &Path) -> Result<(u32, u16), Box<dyn std::error::Error>> {
        let reader = WavReader::open(path).map_err(MediaError::from)?;
        let spec = reader.spec();
        Ok((spec.sample_rate, spec.channels))
    }
}

/// Average each interleaved frame into one sample.
fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}
