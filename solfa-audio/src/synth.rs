//! Synthesized voices used when no sample set is available.
//!
//! Each named voice maps to a recipe: a synthesis technique, an oscillator
//! shape and an ADSR envelope. Notes are rendered whole into a buffer, so any
//! number can overlap in the output mixer.

use std::f64::consts::TAU;

use solfa_types::music::degree_frequency;
use solfa_types::{EnvConfig, VoiceId, Waveform};

use crate::error::{checked_duration, PlaybackError, PlaybackResult};

/// Output level of a single synthesized note.
pub const VOICE_GAIN: f32 = 0.3;

/// Ring-out after note-off for the plucked string.
pub const PLUCK_RELEASE_SECS: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Technique {
    /// Plain oscillator through the envelope.
    Oscillator,
    /// Phase modulation by a sine at `harmonicity` times the note.
    Fm { harmonicity: f32, modulation_index: f32 },
    /// Amplitude modulation by a sine at `harmonicity` times the note.
    Am { harmonicity: f32 },
    /// Karplus-Strong string; `feedback` is the loss per round trip.
    Pluck { feedback: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SynthPreset {
    pub name: &'static str,
    pub technique: Technique,
    pub waveform: Waveform,
    pub envelope: EnvConfig,
}

impl SynthPreset {
    /// Recipe used for the default voice and anything unrecognised.
    pub fn generic() -> Self {
        Self {
            name: "generic",
            technique: Technique::Oscillator,
            waveform: Waveform::Triangle,
            envelope: EnvConfig::new(0.002, 0.4, 0.2, 1.0),
        }
    }

    pub fn for_voice(voice: &VoiceId) -> Self {
        match voice.as_str() {
            "acoustic_guitar_steel" => Self {
                name: "plucked string",
                technique: Technique::Pluck { feedback: 0.996 },
                waveform: Waveform::Sine,
                envelope: EnvConfig::new(0.0, 0.0, 1.0, PLUCK_RELEASE_SECS),
            },
            "electric_piano_1" => Self {
                name: "electric keyboard",
                technique: Technique::Fm {
                    harmonicity: 3.0,
                    modulation_index: 10.0,
                },
                waveform: Waveform::Sine,
                envelope: EnvConfig::new(0.001, 0.5, 0.3, 1.0),
            },
            "violin" => Self {
                name: "bowed string",
                technique: Technique::Oscillator,
                waveform: Waveform::Sawtooth,
                envelope: EnvConfig::new(0.02, 0.6, 0.7, 1.2),
            },
            "trumpet" => Self {
                name: "brass",
                technique: Technique::Am { harmonicity: 3.0 },
                waveform: Waveform::Sawtooth,
                envelope: EnvConfig::new(0.01, 0.3, 0.4, 0.6),
            },
            "flute" => Self {
                name: "wind",
                technique: Technique::Oscillator,
                waveform: Waveform::Triangle,
                envelope: EnvConfig::new(0.01, 0.3, 0.3, 0.8),
            },
            _ => Self::generic(),
        }
    }
}

/// A polyphonic synthesizer configured with one recipe at a time.
#[derive(Debug, Clone)]
pub struct SynthVoice {
    preset: SynthPreset,
    sample_rate: u32,
    noise_state: u64,
}

impl SynthVoice {
    /// A basic synth using the generic recipe.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            preset: SynthPreset::generic(),
            sample_rate,
            noise_state: 0x9e37_79b9_7f4a_7c15,
        }
    }

    pub fn apply_preset(&mut self, preset: SynthPreset) {
        log::debug!(target: "audio::synth", "applied {} preset", preset.name);
        self.preset = preset;
    }

    pub fn preset(&self) -> &SynthPreset {
        &self.preset
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Render scale degree `index` held for `duration` seconds.
    pub fn trigger_attack_release(&mut self, index: usize, duration: f32) -> PlaybackResult<Vec<f32>> {
        let freq = degree_frequency(index)
            .ok_or_else(|| PlaybackError(format!("no pitch for degree {}", index)))?;
        self.render(freq, duration)
    }

    pub fn render(&mut self, freq: f64, duration: f32) -> PlaybackResult<Vec<f32>> {
        let duration = checked_duration(duration)?;
        Ok(match self.preset.technique {
            Technique::Pluck { feedback } => self.render_pluck(freq, duration, feedback),
            technique => self.render_enveloped(technique, freq, duration),
        })
    }

    fn render_enveloped(&self, technique: Technique, freq: f64, duration: f32) -> Vec<f32> {
        let sr = self.sample_rate as f64;
        let env = self.preset.envelope;
        let len = (env.total_secs(duration) as f64 * sr).ceil() as usize;
        let waveform = self.preset.waveform;

        (0..len)
            .map(|i| {
                let t = i as f64 / sr;
                let level = env.level_at(t as f32, duration);
                let v = match technique {
                    Technique::Fm {
                        harmonicity,
                        modulation_index,
                    } => {
                        // brightness follows the envelope
                        let depth = modulation_index as f64 * level as f64;
                        let modulator = (TAU * freq * harmonicity as f64 * t).sin();
                        waveform.sample(freq * t + depth * modulator / TAU)
                    }
                    Technique::Am { harmonicity } => {
                        let modulator = 0.5 + 0.5 * (TAU * freq * harmonicity as f64 * t).sin();
                        waveform.sample(freq * t) * modulator
                    }
                    _ => waveform.sample(freq * t),
                };
                v as f32 * level * VOICE_GAIN
            })
            .collect()
    }

    fn render_pluck(&mut self, freq: f64, duration: f32, feedback: f32) -> Vec<f32> {
        let sr = self.sample_rate as f64;
        let period = ((sr / freq).round() as usize).max(2);
        let mut delay: Vec<f32> = (0..period).map(|_| next_noise(&mut self.noise_state)).collect();

        let release = self.preset.envelope.release;
        let len = ((duration + release) as f64 * sr).ceil() as usize;
        let hold = (duration as f64 * sr) as usize;
        let release_len = (release as f64 * sr).max(1.0);

        let mut out = Vec::with_capacity(len);
        let mut pos = 0;
        for i in 0..len {
            let current = delay[pos];
            let next = delay[(pos + 1) % period];
            delay[pos] = feedback * 0.5 * (current + next);
            pos = (pos + 1) % period;

            let fade = if i < hold {
                1.0
            } else {
                (1.0 - (i - hold) as f64 / release_len).max(0.0) as f32
            };
            out.push(current * fade * VOICE_GAIN);
        }
        out
    }
}

fn next_noise(state: &mut u64) -> f32 {
    *state = state
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    ((*state >> 33) as f32) / (u32::MAX >> 1) as f32 * 2.0 - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: u32 = 8_000;

    fn rms(samples: &[f32]) -> f32 {
        (samples.iter().map(|s| s * s).sum::<f32>() / samples.len().max(1) as f32).sqrt()
    }

    #[test]
    fn named_voices_have_their_own_recipes() {
        let cases = [
            ("acoustic_guitar_steel", "plucked string"),
            ("electric_piano_1", "electric keyboard"),
            ("violin", "bowed string"),
            ("trumpet", "brass"),
            ("flute", "wind"),
            (VoiceId::DEFAULT, "generic"),
            ("harpsichord", "generic"),
        ];
        for (voice, expected) in cases {
            assert_eq!(SynthPreset::for_voice(&VoiceId::new(voice)).name, expected);
        }
    }

    #[test]
    fn recipes_match_voice_character() {
        let violin = SynthPreset::for_voice(&VoiceId::new("violin"));
        assert_eq!(violin.waveform, Waveform::Sawtooth);
        assert_eq!(violin.envelope, EnvConfig::new(0.02, 0.6, 0.7, 1.2));

        let epiano = SynthPreset::for_voice(&VoiceId::new("electric_piano_1"));
        assert_eq!(
            epiano.technique,
            Technique::Fm {
                harmonicity: 3.0,
                modulation_index: 10.0
            }
        );
    }

    #[test]
    fn new_synth_starts_generic() {
        let synth = SynthVoice::new(SR);
        assert_eq!(synth.preset(), &SynthPreset::generic());
    }

    #[test]
    fn rendered_length_includes_release() {
        let mut synth = SynthVoice::new(SR);
        let note = synth.trigger_attack_release(0, 0.5).unwrap();
        // 0.5 s held + 1.0 s release
        assert_eq!(note.len(), 12_000);

        synth.apply_preset(SynthPreset::for_voice(&VoiceId::new("trumpet")));
        let note = synth.trigger_attack_release(0, 0.5).unwrap();
        assert!((note.len() as i64 - 8_800).abs() <= 1, "len {}", note.len());
    }

    #[test]
    fn every_recipe_stays_in_range_and_is_audible() {
        for voice in VoiceId::KNOWN {
            let mut synth = SynthVoice::new(SR);
            synth.apply_preset(SynthPreset::for_voice(&VoiceId::new(voice)));
            let note = synth.trigger_attack_release(4, 0.3).unwrap();
            assert!(note.iter().all(|s| s.abs() <= 1.0), "{} clipped", voice);
            assert!(rms(&note) > 0.001, "{} is silent", voice);
        }
    }

    #[test]
    fn note_fades_out() {
        for voice in VoiceId::KNOWN {
            let mut synth = SynthVoice::new(SR);
            synth.apply_preset(SynthPreset::for_voice(&VoiceId::new(voice)));
            let note = synth.trigger_attack_release(2, 0.3).unwrap();
            let tail = &note[note.len() - 40..];
            assert!(tail.iter().all(|s| s.abs() < 0.02), "{} does not fade", voice);
        }
    }

    #[test]
    fn pluck_decays() {
        let mut synth = SynthVoice::new(SR);
        synth.apply_preset(SynthPreset::for_voice(&VoiceId::new("acoustic_guitar_steel")));
        let note = synth.trigger_attack_release(0, 1.0).unwrap();
        let early = rms(&note[..800]);
        let late = rms(&note[7_000..8_000]);
        assert!(late < early, "early {} late {}", early, late);
    }

    #[test]
    fn unknown_degree_is_an_error() {
        let mut synth = SynthVoice::new(SR);
        assert!(synth.trigger_attack_release(7, 0.5).is_err());
    }

    #[test]
    fn unbounded_duration_is_an_error() {
        let mut synth = SynthVoice::new(SR);
        assert!(synth.trigger_attack_release(0, f32::INFINITY).is_err());
        assert!(synth.trigger_attack_release(0, 1e9).is_err());
        synth.apply_preset(SynthPreset::for_voice(&VoiceId::new("acoustic_guitar_steel")));
        assert!(synth.trigger_attack_release(0, f32::INFINITY).is_err());
    }
}
