use serde::{Deserialize, Serialize};

/// Identifier of the timbre used for playback: the name of a sample set, which
/// also selects the matching synthesis recipe when samples are unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoiceId(String);

impl VoiceId {
    /// Voice selected when nothing else is configured. Synthesis falls back to
    /// the generic preset for it.
    pub const DEFAULT: &'static str = "bright_acoustic_piano-mp3";

    /// Voices offered by the front-end, in cycling order.
    pub const KNOWN: [&'static str; 6] = [
        VoiceId::DEFAULT,
        "acoustic_guitar_steel",
        "electric_piano_1",
        "violin",
        "trumpet",
        "flute",
    ];

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_generic(&self) -> bool {
        self.0 == Self::DEFAULT
    }

    /// Next entry of [`VoiceId::KNOWN`], wrapping; unknown voices restart the cycle.
    pub fn next_known(&self) -> VoiceId {
        let pos = Self::KNOWN.iter().position(|v| *v == self.0);
        let next = match pos {
            Some(i) => Self::KNOWN[(i + 1) % Self::KNOWN.len()],
            None => Self::KNOWN[0],
        };
        VoiceId::new(next)
    }
}

impl Default for VoiceId {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}

impl std::fmt::Display for VoiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Waveform {
    Sine,
    Triangle,
    Sawtooth,
}

impl Waveform {
    /// Sample the waveform at `phase` in cycles, output in [-1, 1].
    pub fn sample(&self, phase: f64) -> f64 {
        let p = phase.fract();
        match self {
            Waveform::Sine => (p * std::f64::consts::TAU).sin(),
            Waveform::Triangle => 1.0 - 4.0 * (p - 0.5).abs(),
            Waveform::Sawtooth => 2.0 * p - 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_voice_is_generic() {
        assert!(VoiceId::default().is_generic());
        assert!(!VoiceId::new("violin").is_generic());
    }

    #[test]
    fn next_known_wraps() {
        assert_eq!(VoiceId::default().next_known().as_str(), "acoustic_guitar_steel");
        assert_eq!(VoiceId::new("flute").next_known(), VoiceId::default());
        assert_eq!(VoiceId::new("kazoo").next_known(), VoiceId::default());
    }

    #[test]
    fn waveform_ranges() {
        for wf in [Waveform::Sine, Waveform::Triangle, Waveform::Sawtooth] {
            for i in 0..100 {
                let v = wf.sample(i as f64 / 100.0);
                assert!((-1.0..=1.0).contains(&v), "{:?} out of range: {}", wf, v);
            }
        }
        assert!((Waveform::Triangle.sample(0.5) - 1.0).abs() < 1e-12);
        assert!((Waveform::Triangle.sample(0.0) + 1.0).abs() < 1e-12);
    }
}
