use rodio::Source;
use std::f32::consts::PI;
use std::time::Duration;

/// Single decaying sine note. Two of these back to back make the phase
/// completion chime.
pub struct ChimeTone {
    freq: f32,
    sample_rate: u32,
    num_sample: usize,
    total_samples: usize,
}

impl ChimeTone {
    pub fn new(freq: f32, duration_secs: f32) -> Self {
        let sample_rate = 44100;
        Self {
            freq,
            sample_rate,
            num_sample: 0,
            total_samples: (sample_rate as f32 * duration_secs) as usize,
        }
    }
}

impl Iterator for ChimeTone {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.num_sample >= self.total_samples {
            return None;
        }

        let t = self.num_sample as f32 / self.sample_rate as f32;
        let progress = self.num_sample as f32 / self.total_samples as f32;
        // Quadratic decay envelope so the note rings out instead of clicking
        let envelope = (1.0 - progress) * (1.0 - progress);
        let sample = (2.0 * PI * self.freq * t).sin();

        self.num_sample += 1;
        Some(sample * envelope * 0.2) // Lower amplitude to prevent clipping
    }
}

impl Source for ChimeTone {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.total_samples.saturating_sub(self.num_sample))
    }

    fn channels(&self) -> u16 {
        1 // Mono
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f32(
            self.total_samples as f32 / self.sample_rate as f32,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_is_finite_and_bounded() {
        let samples: Vec<f32> = ChimeTone::new(880.0, 0.1).collect();
        assert_eq!(samples.len(), 4410);
        assert!(samples.iter().all(|s| s.abs() <= 0.2));
        // Envelope decays to silence.
        assert!(samples.last().unwrap().abs() < 1e-3);
    }
}
