use std::path::PathBuf;

use serde::Deserialize;

use super::diarization_error::DiarizationError;
use crate::diarization::domain::speaker_diarizer::{DiarizationRequest, SpeakerDiarizer};
use crate::diarization::domain::speech_segment::SpeechSegment;

#[derive(Deserialize)]
struct RawSegment {
    start: f64,
    end: f64,
    speaker: String,
}

/// Parse a JSON array of `{ "start", "end", "speaker" }` objects.
///
/// Segments are returned sorted by start time.
pub fn parse_segments_json(text: &str) -> Result<Vec<SpeechSegment>, DiarizationError> {
    let raw: Vec<RawSegment> = serde_json::from_str(text).map_err(DiarizationError::Json)?;
    let mut segments = raw
        .into_iter()
        .enumerate()
        .map(|(index, r)| {
            SpeechSegment::new(r.start, r.end, r.speaker)
                .map_err(|source| DiarizationError::JsonSegment { index, source })
        })
        .collect::<Result<Vec<_>, _>>()?;
    segments.sort_by(|a, b| a.start().total_cmp(&b.start()));
    Ok(segments)
}

/// Reads speaker segments exported as JSON by an external diarizer.
pub struct JsonSegmentsDiarizer {
    path: PathBuf,
}

impl JsonSegmentsDiarizer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SpeakerDiarizer for JsonSegmentsDiarizer {
    fn diarize(
        &self,
        _request: &DiarizationRequest<'_>,
    ) -> Result<Vec<SpeechSegment>, Box<dyn std::error::Error>> {
        let text = std::fs::read_to_string(&self.path).map_err(|source| DiarizationError::Read {
            path: self.path.clone(),
            source,
        })?;
        Ok(parse_segments_json(&text)?)
    }
}
