use std::path::Path;

use super::speech_segment::SpeechSegment;

/// What a diarizer needs to know about the recording it labels.
#[derive(Clone, Debug, PartialEq)]
pub struct DiarizationRequest<'a> {
    pub audio_path: &'a Path,
    /// Decoded duration in seconds, used for progress estimates.
    pub audio_duration: f64,
    pub num_speakers: usize,
}

/// Domain interface for speaker diarization.
///
/// Implementations return speech segments in chronological order, each
/// labeled with an opaque speaker identifier. Segments of different
/// speakers may overlap.
pub trait SpeakerDiarizer: Send {
    fn diarize(
        &self,
        request: &DiarizationRequest<'_>,
    ) -> Result<Vec<SpeechSegment>, Box<dyn std::error::Error>>;
}
