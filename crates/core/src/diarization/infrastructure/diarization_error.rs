use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use crate::shared::time_range::TimeRangeError;

#[derive(Error, Debug)]
pub enum DiarizationError {
    #[error("failed to read segments from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("RTTM line {line}: {reason}")]
    Rttm { line: usize, reason: String },
    #[error("segment on line {line}: {source}")]
    Segment {
        line: usize,
        #[source]
        source: TimeRangeError,
    },
    #[error("invalid segments JSON: {0}")]
    Json(#[source] serde_json::Error),
    #[error("segment {index}: {source}")]
    JsonSegment {
        index: usize,
        #[source]
        source: TimeRangeError,
    },
    #[error("diarization command is empty")]
    EmptyCommand,
    #[error("failed to start diarization command '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("diarization command '{program}' exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
}
