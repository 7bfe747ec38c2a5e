use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};
use serde::{Deserialize, Serialize};

use super::media_error::MediaError;
use crate::audio::domain::audio_buffer::AudioBuffer;
use crate::media::domain::audio_writer::AudioWriter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WavBitDepth {
    #[default]
    Float32,
    Pcm16,
}

/// Encodes AudioBuffers as WAV with hound.
#[derive(Default)]
pub struct WavAudioWriter {
    bit_depth: WavBitDepth,
}

impl WavAudioWriter {
    pub fn new(bit_depth: WavBitDepth) -> Self {
        Self { bit_depth }
    }
}

impl AudioWriter for WavAudioWriter {
    fn write_audio(
        &self,
        path: &Path,
        audio: &AudioBuffer,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| MediaError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let (bits_per_sample, sample_format) = match self.bit_depth {
            WavBitDepth::Float32 => (32, SampleFormat::Float),
            WavBitDepth::Pcm16 => (16, SampleFormat::Int),
        };
        let spec = WavSpec {
            channels: audio.channels(),
            sample_rate: audio.sample_rate(),
            bits_per_sample,
            sample_format,
        };

        let mut writer = WavWriter::create(path, spec).map_err(MediaError::from)?;
        for &sample in audio.samples() {
            match self.bit_depth {
                WavBitDepth::Float32 => writer.write_sample(sample),
                WavBitDepth::Pcm16 => {
                    writer.write_sample((sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
                }
            }
            .map_err(MediaError::from)?;
        }
        writer.finalize().map_err(MediaError::from)?;

        log::debug!(
            "Wrote {} samples to {}",
            audio.len(),
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::domain::audio_reader::AudioReader;
    use crate::media::infrastructure::wav_audio_reader::WavAudioReader;
    use hound::WavReader;

    #[test]
    fn test_float_output_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");
        let audio = AudioBuffer::mono(vec![0.0, 0.5, -1.0, 1.0], 22050);

        WavAudioWriter::default().write_audio(&path, &audio).unwrap();
        let back = WavAudioReader.read_audio(&path, 22050).unwrap();
        assert_eq!(back, audio);
    }

    #[test]
    fn test_pcm16_output_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pcm.wav");
        let audio = AudioBuffer::mono(vec![1.0, -2.0, 0.0], 16000);

        WavAudioWriter::new(WavBitDepth::Pcm16)
            .write_audio(&path, &audio)
            .unwrap();

        let mut reader = WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().bits_per_sample, 16);
        let samples: Vec<i16> = reader.samples::<i16>().map(Result::unwrap).collect();
        assert_eq!(samples, vec![i16::MAX, -i16::MAX, 0]);
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("out.wav");
        let audio = AudioBuffer::mono(vec![0.1; 10], 8000);

        WavAudioWriter::default().write_audio(&path, &audio).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_empty_buffer_writes_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.wav");
        let audio = AudioBuffer::mono(Vec::new(), 22050);

        WavAudioWriter::default().write_audio(&path, &audio).unwrap();
        let reader = WavReader::open(&path).unwrap();
        assert_eq!(reader.len(), 0);
        assert_eq!(reader.spec().sample_rate, 22050);
    }

    #[test]
    fn test_stereo_layout_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        let audio = AudioBuffer::new(vec![0.1, 0.2, 0.3, 0.4], 8000, 2);

        WavAudioWriter::default().write_audio(&path, &audio).unwrap();
        let reader = WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().channels, 2);
        assert_eq!(reader.len(), 4);
    }
}
