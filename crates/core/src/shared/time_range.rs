use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimeRangeError {
    #[error("invalid time range ({start}, {end}): start is after end")]
    Reversed { start: f64, end: f64 },
    #[error("invalid time range ({start}, {end}): bounds must be finite and non-negative")]
    OutOfDomain { start: f64, end: f64 },
}

/// A `[start, end)` interval in seconds from the start of a recording.
///
/// Always satisfies `0 <= start <= end`; construction rejects anything else.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeRange {
    start: f64,
    end: f64,
}

impl TimeRange {
    pub fn new(start: f64, end: f64) -> Result<Self, TimeRangeError> {
        if !start.is_finite() || !end.is_finite() || start < 0.0 || end < 0.0 {
            return Err(TimeRangeError::OutOfDomain { start, end });
        }
        if start > end {
            return Err(TimeRangeError::Reversed { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// True when `other` starts at or before this range's end.
    ///
    /// Only meaningful when `other.start >= self.start`, which is how the
    /// segment merger scans sorted input.
    pub fn reaches(&self, other: &TimeRange) -> bool {
        other.start <= self.end
    }

    /// Smallest range covering both `self` and `other`.
    pub fn span(&self, other: &TimeRange) -> TimeRange {
        TimeRange {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl TryFrom<(f64, f64)> for TimeRange {
    type Error = TimeRangeError;

    fn try_from((start, end): (f64, f64)) -> Result<Self, Self::Error> {
        TimeRange::new(start, end)
    }
}
