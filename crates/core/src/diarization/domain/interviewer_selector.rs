use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::speech_segment::SpeechSegment;
use crate::shared::time_range::TimeRange;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("unknown selection policy '{0}' (expected one of: duration, first, manual)")]
    UnknownPolicy(String),
    #[error("selection policy 'manual' requires a target speaker")]
    MissingTarget,
}

/// How the interviewer is picked out of a diarized timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionPolicy {
    /// The speaker with the least total speaking time.
    #[default]
    Duration,
    /// Whoever speaks first.
    First,
    /// An explicitly named speaker label.
    Manual,
}

impl SelectionPolicy {
    pub const ALL: &[SelectionPolicy] = &[
        SelectionPolicy::Duration,
        SelectionPolicy::First,
        SelectionPolicy::Manual,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SelectionPolicy::Duration => "duration",
            SelectionPolicy::First => "first",
            SelectionPolicy::Manual => "manual",
        }
    }
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectionPolicy {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| SelectionError::UnknownPolicy(s.to_string()))
    }
}

/// Conditions worth telling the caller about; none of them stop selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionWarning {
    /// Only one speaker was detected and it was selected, so the whole
    /// recording is about to be removed.
    SoleSpeaker { speaker: String },
    SpeakerCountMismatch { expected: usize, found: usize },
    /// The requested target never speaks in the timeline.
    TargetNotFound { speaker: String },
}

impl fmt::Display for SelectionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionWarning::SoleSpeaker { speaker } => write!(
                f,
                "only one speaker ({speaker}) was detected; removing it removes the whole recording"
            ),
            SelectionWarning::SpeakerCountMismatch { expected, found } => {
                write!(f, "expected {expected} speakers but found {found}")
            }
            SelectionWarning::TargetNotFound { speaker } => {
                write!(f, "target speaker {speaker} does not appear in the segments")
            }
        }
    }
}

/// Result of interviewer selection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Selection {
    /// `None` only when there were no segments at all.
    pub speaker: Option<String>,
    /// The selected speaker's segments, chronological and unmerged.
    pub ranges: Vec<TimeRange>,
    pub warnings: Vec<SelectionWarning>,
}

impl Selection {
    /// Nothing to remove.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn total_duration(&self) -> f64 {
        self.ranges.iter().map(TimeRange::duration).sum()
    }
}

/// Decides which speaker label is the interviewer and projects that
/// speaker's segments into deletion ranges.
#[derive(Debug, Clone)]
pub struct InterviewerSelector {
    policy: SelectionPolicy,
    target_speaker: Option<String>,
    expected_speakers: usize,
}

impl InterviewerSelector {
    /// Fails with [`SelectionError::MissingTarget`] for the manual policy
    /// without a target. A target given with any other policy takes
    /// precedence over that policy.
    pub fn new(
        policy: SelectionPolicy,
        target_speaker: Option<String>,
        expected_speakers: usize,
    ) -> Result<Self, SelectionError> {
        if policy == SelectionPolicy::Manual && target_speaker.is_none() {
            return Err(SelectionError::MissingTarget);
        }
        Ok(Self {
            policy,
            target_speaker,
            expected_speakers,
        })
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    pub fn target_speaker(&self) -> Option<&str> {
        self.target_speaker.as_deref()
    }

    pub fn expected_speakers(&self) -> usize {
        self.expected_speakers
    }

    pub fn select(&self, segments: &[SpeechSegment]) -> Selection {
        let Some(first) = segments.first() else {
            return Selection::default();
        };

        let speakers = distinct_speakers(segments);
        let mut warnings = Vec::new();
        if speakers.len() != self.expected_speakers {
            warnings.push(SelectionWarning::SpeakerCountMismatch {
                expected: self.expected_speakers,
                found: speakers.len(),
            });
        }

        let speaker = match (&self.target_speaker, self.policy) {
            (Some(target), _) => {
                if !speakers.contains(&target.as_str()) {
                    warnings.push(SelectionWarning::TargetNotFound {
                        speaker: target.clone(),
                    });
                }
                target.clone()
            }
            _ if speakers.len() == 1 => first.speaker.clone(),
            (None, SelectionPolicy::First) => first.speaker.clone(),
            (None, SelectionPolicy::Duration) => shortest_speaker(segments),
            // Rejected by `new`.
            (None, SelectionPolicy::Manual) => return Selection::default(),
        };

        if speakers.len() == 1 && speakers[0] == speaker {
            warnings.push(SelectionWarning::SoleSpeaker {
                speaker: speaker.clone(),
            });
        }

        Selection {
            ranges: Self::segments_for_speaker(segments, &speaker),
            speaker: Some(speaker),
            warnings,
        }
    }

    /// Total speaking time per label, in order of first appearance.
    pub fn speaker_durations(segments: &[SpeechSegment]) -> Vec<(String, f64)> {
        let mut totals: Vec<(String, f64)> = Vec::new();
        for segment in segments {
            match totals.iter_mut().find(|(label, _)| *label == segment.speaker) {
                Some((_, total)) => *total += segment.duration(),
                None => totals.push((segment.speaker.clone(), segment.duration())),
            }
        }
        totals
    }

    /// Ranges of every segment labeled `speaker`, in input order.
    pub fn segments_for_speaker(segments: &[SpeechSegment], speaker: &str) -> Vec<TimeRange> {
        segments
            .iter()
            .filter(|s| s.speaker == speaker)
            .map(|s| s.range)
            .collect()
    }
}

fn distinct_speakers(segments: &[SpeechSegment]) -> Vec<&str> {
    let mut speakers: Vec<&str> = Vec::new();
    for segment in segments {
        if !speakers.contains(&segment.speaker.as_str()) {
            speakers.push(&segment.speaker);
        }
    }
    speakers
}

/// Ties go to the label that appeared first.
fn shortest_speaker(segments: &[SpeechSegment]) -> String {
    let mut shortest: Option<(String, f64)> = None;
    for (label, total) in InterviewerSelector::speaker_durations(segments) {
        match &shortest {
            Some((_, best)) if total >= *best => {}
            _ => shortest = Some((label, total)),
        }
    }
    shortest.map(|(label, _)| label).unwrap_or_default()
}
