//! Last-resort piano-like tone, synthesized directly from the scale degree.
//!
//! Four harmonic partials and a short noise burst go through a lowpass whose
//! cutoff sweeps down over the first 80 ms, shaped by a fast attack and an
//! exponential decay.

use std::f64::consts::TAU;

use solfa_types::music::degree_frequency;
use solfa_types::Waveform;

use crate::error::{checked_duration, PlaybackError, PlaybackResult};

pub const PARTIAL_AMPS: [f64; 4] = [1.0, 0.6, 0.28, 0.12];
/// Detune of each partial in cents.
pub const PARTIAL_DETUNE: [f64; 4] = [0.0, 0.2, -0.15, 0.3];

pub const ATTACK_SECS: f64 = 0.003;
pub const ENV_START: f64 = 0.0001;
pub const ENV_FLOOR: f64 = 0.0005;
pub const NOISE_SECS: f64 = 0.03;
pub const SWEEP_START_HZ: f64 = 4000.0;
pub const SWEEP_END_HZ: f64 = 1200.0;
pub const SWEEP_SECS: f64 = 0.08;
pub const FILTER_Q: f64 = 0.8;
/// Oscillators keep running this long past the requested duration.
pub const TAIL_SECS: f64 = 0.5;
const TONE_GAIN: f64 = 0.25;

pub fn decay_secs(duration: f64) -> f64 {
    (duration * 0.9).max(0.05)
}

/// Amplitude envelope at `t` seconds for a note of `duration` seconds.
pub fn envelope_at(t: f64, duration: f64) -> f64 {
    if t <= 0.0 {
        return ENV_START;
    }
    if t < ATTACK_SECS {
        return ENV_START + (1.0 - ENV_START) * t / ATTACK_SECS;
    }
    let decay = decay_secs(duration);
    if t < ATTACK_SECS + decay {
        let x = (t - ATTACK_SECS) / decay;
        return ENV_FLOOR.powf(x);
    }
    ENV_FLOOR
}

/// Lowpass cutoff at `t` seconds.
pub fn cutoff_at(t: f64) -> f64 {
    if t >= SWEEP_SECS {
        return SWEEP_END_HZ;
    }
    let x = t.max(0.0) / SWEEP_SECS;
    SWEEP_START_HZ * (SWEEP_END_HZ / SWEEP_START_HZ).powf(x)
}

/// RBJ biquad lowpass, direct form I.
#[derive(Default)]
struct Lowpass {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

impl Lowpass {
    fn set(&mut self, cutoff: f64, q: f64, sample_rate: f64) {
        let cutoff = cutoff.min(sample_rate * 0.45);
        let w0 = TAU * cutoff / sample_rate;
        let (sin, cos) = w0.sin_cos();
        let alpha = sin / (2.0 * q);
        let a0 = 1.0 + alpha;
        self.b0 = (1.0 - cos) / 2.0 / a0;
        self.b1 = (1.0 - cos) / a0;
        self.b2 = self.b0;
        self.a1 = -2.0 * cos / a0;
        self.a2 = (1.0 - alpha) / a0;
    }

    fn process(&mut self, x: f64) -> f64 {
        let y = self.b0 * x + self.b1 * self.x1 + self.b2 * self.x2 - self.a1 * self.y1 - self.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }
}

fn next_random(state: &mut u64) -> f64 {
    *state = state
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    ((*state >> 33) as f64) / ((u32::MAX >> 1) as f64)
}

/// Render scale degree `index` for `duration` seconds.
pub fn render_piano_tone(
    index: usize,
    duration: f32,
    sample_rate: u32,
    noise_state: &mut u64,
) -> PlaybackResult<Vec<f32>> {
    let freq = degree_frequency(index)
        .ok_or_else(|| PlaybackError(format!("no pitch for degree {}", index)))?;
    if sample_rate == 0 {
        return Err(PlaybackError::from("sample rate is zero"));
    }
    let sr = sample_rate as f64;
    let duration = checked_duration(duration)? as f64;
    let len = ((duration + TAIL_SECS) * sr).round() as usize;
    let noise_len = (NOISE_SECS * sr).floor().max(1.0) as usize;
    let sweep_len = (SWEEP_SECS * sr).ceil() as usize;

    let partial_freqs: Vec<f64> = PARTIAL_DETUNE
        .iter()
        .enumerate()
        .map(|(i, cents)| freq * (i + 1) as f64 * 2f64.powf(cents / 1200.0))
        .collect();

    let mut filter = Lowpass::default();
    filter.set(cutoff_at(0.0), FILTER_Q, sr);

    let mut out = Vec::with_capacity(len);
    for n in 0..len {
        let t = n as f64 / sr;
        if n > 0 && n <= sweep_len {
            filter.set(cutoff_at(t), FILTER_Q, sr);
        }

        let mut x = 0.0;
        for (i, (amp, f)) in PARTIAL_AMPS.iter().zip(&partial_freqs).enumerate() {
            let osc = if i == 0 {
                (TAU * f * t).sin()
            } else {
                Waveform::Triangle.sample(f * t)
            };
            x += amp * osc;
        }
        if n < noise_len {
            let noise = next_random(noise_state) * 2.0 - 1.0;
            x += noise * (1.0 - n as f64 / noise_len as f64);
        }

        let y = filter.process(x) * envelope_at(t, duration) * TONE_GAIN;
        out.push(y as f32);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: u32 = 16_000;

    fn peak(samples: &[f32]) -> f32 {
        samples.iter().fold(0.0_f32, |m, s| m.max(s.abs()))
    }

    #[test]
    fn envelope_shape() {
        let d = 0.6;
        assert_eq!(envelope_at(0.0, d), ENV_START);
        assert!((envelope_at(ATTACK_SECS / 2.0, d) - 0.50005).abs() < 1e-9);
        assert!((envelope_at(ATTACK_SECS, d) - 1.0).abs() < 1e-12);
        let end = ATTACK_SECS + decay_secs(d);
        assert!((envelope_at(end - 1e-9, d) - ENV_FLOOR).abs() < 1e-6);
        assert_eq!(envelope_at(end + 0.1, d), ENV_FLOOR);

        let mut prev = envelope_at(ATTACK_SECS, d);
        for i in 1..100 {
            let v = envelope_at(ATTACK_SECS + i as f64 * 0.006, d);
            assert!(v <= prev);
            prev = v;
        }
    }

    #[test]
    fn short_notes_keep_a_minimum_decay() {
        assert_eq!(decay_secs(0.01), 0.05);
        assert!((decay_secs(1.0) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn cutoff_sweeps_down() {
        assert_eq!(cutoff_at(0.0), SWEEP_START_HZ);
        assert!((cutoff_at(SWEEP_SECS / 2.0) - (4000.0_f64 * 1200.0).sqrt()).abs() < 1e-6);
        assert_eq!(cutoff_at(SWEEP_SECS), SWEEP_END_HZ);
        assert_eq!(cutoff_at(2.0), SWEEP_END_HZ);
    }

    #[test]
    fn tone_length_includes_tail() {
        let mut seed = 1;
        let tone = render_piano_tone(0, 0.6, SR, &mut seed).unwrap();
        assert_eq!(tone.len(), (1.1 * SR as f64).round() as usize);
    }

    #[test]
    fn tone_is_loud_early_and_quiet_late() {
        let mut seed = 7;
        let tone = render_piano_tone(5, 0.6, SR, &mut seed).unwrap();
        assert!(tone.iter().all(|s| s.is_finite() && s.abs() <= 1.0));
        let early = peak(&tone[..(0.05 * SR as f64) as usize]);
        let late = peak(&tone[tone.len() - (0.1 * SR as f64) as usize..]);
        assert!(early > 0.05, "early peak {}", early);
        assert!(late < early / 100.0, "early {} late {}", early, late);
    }

    #[test]
    fn out_of_range_degree_fails() {
        let mut seed = 0;
        assert!(render_piano_tone(7, 0.6, SR, &mut seed).is_err());
        assert!(render_piano_tone(0, 0.6, 0, &mut seed).is_err());
    }

    #[test]
    fn unbounded_duration_fails() {
        let mut seed = 0;
        assert!(render_piano_tone(0, f32::INFINITY, SR, &mut seed).is_err());
        assert!(render_piano_tone(0, f32::NAN, SR, &mut seed).is_err());
        assert!(render_piano_tone(0, 1e9, SR, &mut seed).is_err());
    }
}
