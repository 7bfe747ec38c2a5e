use super::audio_buffer::AudioBuffer;
use super::deletion_plan::DeletionPlan;
use super::fade_curve::{FadeCurve, FadeDirection};

pub const DEFAULT_FADE_DURATION: f64 = 0.1;

/// Output of [`ExcisionEngine::excise`].
#[derive(Clone, Debug, PartialEq)]
pub struct Excision {
    audio: AudioBuffer,
    removed_samples: usize,
}

impl Excision {
    pub fn audio(&self) -> &AudioBuffer {
        &self.audio
    }

    pub fn into_audio(self) -> AudioBuffer {
        self.audio
    }

    pub fn removed_samples(&self) -> usize {
        self.removed_samples
    }

    /// True when every sample of a non-empty input was cut.
    pub fn removed_everything(&self) -> bool {
        self.audio.is_empty() && self.removed_samples > 0
    }
}

/// Cuts a [`DeletionPlan`] out of a buffer and tapers the surviving edges.
///
/// Each range gets a fade-out on the audio just before it and a fade-in on
/// the audio just after it, both applied before any sample is removed.
/// Fade spans shrink silently when less audio is available.
pub struct ExcisionEngine {
    fade_duration: f64,
}

impl ExcisionEngine {
    /// `fade_duration` is in seconds; 0 disables fading. Negative or
    /// non-finite values are treated as 0.
    pub fn new(fade_duration: f64) -> Self {
        let fade_duration = if fade_duration.is_finite() {
            fade_duration.max(0.0)
        } else {
            0.0
        };
        Self { fade_duration }
    }

    pub fn fade_duration(&self) -> f64 {
        self.fade_duration
    }

    pub fn excise(&self, audio: AudioBuffer, plan: &DeletionPlan) -> Excision {
        if plan.is_empty() {
            return Excision {
                audio,
                removed_samples: 0,
            };
        }

        let channels = audio.channels() as usize;
        let frame_count = audio.frame_count();
        let fade_frames =
            ((self.fade_duration * audio.sample_rate() as f64) as usize).min(frame_count);

        let spans: Vec<(usize, usize)> = plan
            .iter()
            .map(|range| {
                (
                    audio.frame_index_at_time(range.start()),
                    audio.frame_index_at_time(range.end()),
                )
            })
            .collect();

        let original_len = audio.len();
        let template = audio.with_samples(Vec::new());
        let mut samples = audio.into_samples();

        if fade_frames > 0 {
            for &(start, end) in &spans {
                if start > 0 {
                    let fade_start = start.saturating_sub(fade_frames);
                    FadeCurve::apply(
                        &mut samples[fade_start * channels..start * channels],
                        channels,
                        FadeDirection::Out,
                    );
                }
                if end < frame_count {
                    let fade_end = end.saturating_add(fade_frames).min(frame_count);
                    FadeCurve::apply(
                        &mut samples[end * channels..fade_end * channels],
                        channels,
                        FadeDirection::In,
                    );
                }
            }
        }

        let mut keep = vec![true; frame_count];
        for &(start, end) in &spans {
            log::debug!("Cutting frames {start}..{end}");
            keep[start..end].fill(false);
        }

        let frames = samples.chunks_exact(channels);
        let trailing = frames.remainder();
        let mut retained: Vec<f32> = frames
            .zip(&keep)
            .filter(|(_, &kept)| kept)
            .flat_map(|(frame, _)| frame.iter().copied())
            .collect();
        retained.extend_from_slice(trailing);

        let removed_samples = original_len - retained.len();
        Excision {
            audio: template.with_samples(retained),
            removed_samples,
        }
    }
}

impl Default for ExcisionEngine {
    fn default() -> Self {
        Self::new(DEFAULT_FADE_DURATION)
    }
}
