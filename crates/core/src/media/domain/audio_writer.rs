use crate::audio::domain::audio_buffer::AudioBuffer;
use std::path::Path;

/// Domain interface for encoding an AudioBuffer to a file.
pub trait AudioWriter: Send {
    /// Write `audio` to `path`, replacing any existing file.
    fn write_audio(&self, path: &Path, audio: &AudioBuffer)
        -> Result<(), Box<dyn std::error::Error>>;
}
