use super::audio_buffer::AudioBuffer;

/// What [`PeakNormalizer::normalize`] did to a buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Normalization {
    /// Every sample was divided by the original peak; `gain` is `1 / peak`.
    Scaled { gain: f32 },
    /// Peak was zero (silence or empty buffer); the buffer passed through.
    Silent,
}

/// Simple peak normalization: rescale so the loudest sample hits 1.0.
pub struct PeakNormalizer;

impl PeakNormalizer {
    pub fn normalize(audio: AudioBuffer) -> (AudioBuffer, Normalization) {
        let peak = audio.peak();
        if peak <= 0.0 || !peak.is_finite() {
            return (audio, Normalization::Silent);
        }

        let scaled: Vec<f32> = audio.samples().iter().map(|s| s / peak).collect();
        (audio.with_samples(scaled), Normalization::Scaled { gain: 1.0 / peak })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_peak_becomes_one() {
        let input = AudioBuffer::mono(vec![0.1, -0.4, 0.25, 0.0], 10);
        let (out, outcome) = PeakNormalizer::normalize(input);
        assert_eq!(out.peak(), 1.0);
        assert_relative_eq!(out.samples()[0], 0.25);
        assert_eq!(out.samples()[1], -1.0);
        assert_relative_eq!(out.samples()[2], 0.625);
        match outcome {
            Normalization::Scaled { gain } => assert_relative_eq!(gain, 2.5),
            Normalization::Silent => panic!("expected a scaled buffer"),
        }
    }

    #[test]
    fn test_loud_buffer_is_attenuated() {
        let input = AudioBuffer::mono(vec![2.0, -1.0], 10);
        let (out, _) = PeakNormalizer::normalize(input);
        assert_eq!(out.samples(), &[1.0, -0.5]);
    }

    #[test]
    fn test_silent_buffer_unchanged() {
        let input = AudioBuffer::mono(vec![0.0; 64], 10);
        let (out, outcome) = PeakNormalizer::normalize(input.clone());
        assert_eq!(out, input);
        assert_eq!(outcome, Normalization::Silent);
    }

    #[test]
    fn test_empty_buffer_unchanged() {
        let input = AudioBuffer::mono(Vec::new(), 22050);
        let (out, outcome) = PeakNormalizer::normalize(input.clone());
        assert_eq!(out, input);
        assert_eq!(outcome, Normalization::Silent);
    }

    #[test]
    fn test_length_and_layout_preserved() {
        let input = AudioBuffer::new(vec![0.5, -0.25, 0.125, 0.0], 8000, 2);
        let (out, _) = PeakNormalizer::normalize(input);
        assert_eq!(out.len(), 4);
        assert_eq!(out.channels(), 2);
        assert_eq!(out.sample_rate(), 8000);
    }
}
