use super::diarization_error::DiarizationError;
use crate::diarization::domain::speech_segment::SpeechSegment;

const SPEAKER_RECORD: &str = "SPEAKER";
const MIN_FIELDS: usize = 8;

/// Parse RTTM text into chronologically sorted speech segments.
///
/// Only `SPEAKER` records are used:
/// `SPEAKER <file> <chan> <onset> <duration> <ortho> <stype> <name> ...`.
/// Blank lines, `#` comments and other record types are skipped.
pub fn parse_rttm(text: &str) -> Result<Vec<SpeechSegment>, DiarizationError> {
    let mut segments = Vec::new();

    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        if fields[0] != SPEAKER_RECORD {
            continue;
        }
        if fields.len() < MIN_FIELDS {
            return Err(DiarizationError::Rttm {
                line,
                reason: format!("expected {MIN_FIELDS} fields, found {}", fields.len()),
            });
        }

        let onset = parse_seconds(fields[3], "onset", line)?;
        let duration = parse_seconds(fields[4], "duration", line)?;
        let segment = SpeechSegment::new(onset, onset + duration, fields[7])
            .map_err(|source| DiarizationError::Segment { line, source })?;
        segments.push(segment);
    }

    segments.sort_by(|a, b| a.start().total_cmp(&b.start()));
    Ok(segments)
}

fn parse_seconds(field: &str, name: &str, line: usize) -> Result<f64, DiarizationError> {
    field.parse::<f64>().map_err(|_| DiarizationError::Rttm {
        line,
        reason: format!("{name} '{field}' is not a number"),
    })
}
