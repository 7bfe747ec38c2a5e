use crate::shared::time_range::{TimeRange, TimeRangeError};

/// A stretch of speech attributed to one speaker label.
#[derive(Clone, Debug, PartialEq)]
pub struct SpeechSegment {
    pub range: TimeRange,
    pub speaker: String,
}

impl SpeechSegment {
    pub fn new(start: f64, end: f64, speaker: impl Into<String>) -> Result<Self, TimeRangeError> {
        Ok(Self {
            range: TimeRange::new(start, end)?,
            speaker: speaker.into(),
        })
    }

    pub fn start(&self) -> f64 {
        self.range.start()
    }

    pub fn end(&self) -> f64 {
        self.range.end()
    }

    pub fn duration(&self) -> f64 {
        self.range.duration()
    }
}
