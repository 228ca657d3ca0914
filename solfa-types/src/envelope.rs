use serde::{Deserialize, Serialize};

/// ADSR envelope, times in seconds, sustain as a level in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvConfig {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
}

impl EnvConfig {
    pub const fn new(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            attack,
            decay,
            sustain,
            release,
        }
    }

    /// Envelope level `t` seconds after note-on for a note held `hold` seconds.
    pub fn level_at(&self, t: f32, hold: f32) -> f32 {
        if t < 0.0 {
            return 0.0;
        }
        let held = |t: f32| -> f32 {
            if t < self.attack {
                if self.attack <= 0.0 {
                    1.0
                } else {
                    t / self.attack
                }
            } else if t < self.attack + self.decay {
                let x = (t - self.attack) / self.decay;
                1.0 + (self.sustain - 1.0) * x
            } else {
                self.sustain
            }
        };
        if t < hold {
            return held(t);
        }
        let start = held(hold);
        if self.release <= 0.0 {
            return 0.0;
        }
        let x = (t - hold) / self.release;
        if x >= 1.0 {
            0.0
        } else {
            start * (1.0 - x)
        }
    }

    /// Total audible length of a note held `hold` seconds.
    pub fn total_secs(&self, hold: f32) -> f32 {
        hold + self.release
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_follows_adsr_shape() {
        let env = EnvConfig::new(0.1, 0.2, 0.5, 0.4);
        assert_eq!(env.level_at(-1.0, 1.0), 0.0);
        assert!((env.level_at(0.05, 1.0) - 0.5).abs() < 1e-6);
        assert!((env.level_at(0.1, 1.0) - 1.0).abs() < 1e-6);
        assert!((env.level_at(0.2, 1.0) - 0.75).abs() < 1e-6);
        assert!((env.level_at(0.8, 1.0) - 0.5).abs() < 1e-6);
        // halfway through release
        assert!((env.level_at(1.2, 1.0) - 0.25).abs() < 1e-6);
        assert_eq!(env.level_at(1.5, 1.0), 0.0);
    }

    #[test]
    fn release_starts_from_current_level() {
        // released during the attack ramp
        let env = EnvConfig::new(1.0, 0.1, 0.5, 1.0);
        assert!((env.level_at(0.5, 0.5) - 0.5).abs() < 1e-6);
        assert!((env.level_at(1.0, 0.5) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn total_includes_release() {
        let env = EnvConfig::new(0.01, 0.3, 0.4, 0.6);
        assert!((env.total_secs(0.6) - 1.2).abs() < 1e-6);
    }
}
