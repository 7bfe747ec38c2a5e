use std::path::PathBuf;

use super::diarization_error::DiarizationError;
use super::rttm::parse_rttm;
use crate::diarization::domain::speaker_diarizer::{DiarizationRequest, SpeakerDiarizer};
use crate::diarization::domain::speech_segment::SpeechSegment;

/// Reads a precomputed RTTM file instead of running a model.
pub struct RttmDiarizer {
    path: PathBuf,
}

impl RttmDiarizer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SpeakerDiarizer for RttmDiarizer {
    fn diarize(
        &self,
        _request: &DiarizationRequest<'_>,
    ) -> Result<Vec<SpeechSegment>, Box<dyn std::error::Error>> {
        let text = std::fs::read_to_string(&self.path).map_err(|source| DiarizationError::Read {
            path: self.path.clone(),
            source,
        })?;
        let segments = parse_rttm(&text)?;
        log::debug!(
            "Loaded {} segments from {}",
            segments.len(),
            self.path.display()
        );
        Ok(segments)
    }
}
