/// Which way a fade ramps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeDirection {
    /// 0.0 → 1.0, used just after a cut.
    In,
    /// 1.0 → 0.0, used just before a cut.
    Out,
}

impl FadeDirection {
    fn endpoints(self) -> (f64, f64) {
        match self {
            FadeDirection::In => (0.0, 1.0),
            FadeDirection::Out => (1.0, 0.0),
        }
    }
}

/// Linear gain ramp applied multiplicatively to a single track.
pub struct FadeCurve;

impl FadeCurve {
    /// `len` gains from the ramp's start value to its end value, both inclusive.
    ///
    /// A single-sample ramp holds only the start value.
    pub fn gains(len: usize, direction: FadeDirection) -> Vec<f32> {
        let (from, to) = direction.endpoints();
        match len {
            0 => Vec::new(),
            1 => vec![from as f32],
            _ => {
                let last = (len - 1) as f64;
                (0..len)
                    .map(|i| {
                        if i == len - 1 {
                            to as f32
                        } else {
                            (from + (to - from) * i as f64 / last) as f32
                        }
                    })
                    .collect()
            }
        }
    }

    /// Taper interleaved `samples` in place, one gain per frame.
    pub fn apply(samples: &mut [f32], channels: usize, direction: FadeDirection) {
        let channels = channels.max(1);
        let gains = Self::gains(samples.len() / channels, direction);
        for (frame, gain) in samples.chunks_exact_mut(channels).zip(gains) {
            for sample in frame {
                *sample *= gain;
            }
        }
    }
}
