use crate::audio::domain::audio_buffer::AudioBuffer;
use std::path::Path;

/// Domain interface for decoding an audio file.
pub trait AudioReader: Send {
    /// Decode the file to a mono PCM AudioBuffer at the given sample rate.
    fn read_audio(
        &self,
        path: &Path,
        target_sample_rate: u32,
    ) -> Result<AudioBuffer, Box<dyn std::error::Error>>;

    /// Return the file's own sample rate and channel count without decoding.
    fn audio_metadata(&self, path: &Path) -> Result<(u32, u16), Box<dyn std::error::Error>>;
}
