use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("{path} is sampled at {found} Hz but {expected} Hz was requested (resampling needs the ffmpeg feature)")]
    SampleRateMismatch {
        path: PathBuf,
        found: u32,
        expected: u32,
    },
    #[error("{path}: unsupported sample format ({bits}-bit {format})")]
    UnsupportedFormat {
        path: PathBuf,
        bits: u16,
        format: &'static str,
    },
    #[error("{path} has no audio stream")]
    NoAudioStream { path: PathBuf },
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
