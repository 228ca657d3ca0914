//! Sample-based instruments: one recorded note per scale degree.
//!
//! A sample set lives in `<root>/<voice>/` as `C4.wav` through `B4.wav`.

use std::path::{Path, PathBuf};

use solfa_types::music::PITCH_NAMES;
use solfa_types::{VoiceId, DEGREE_COUNT};

use crate::error::{checked_duration, PlaybackError, PlaybackResult};

/// Fade applied after the requested duration so notes do not click off.
pub const SAMPLE_RELEASE_SECS: f32 = 0.1;

/// A loaded sample set, already converted to mono at the output rate.
#[derive(Debug, Clone)]
pub struct SampleInstrument {
    voice: VoiceId,
    sample_rate: u32,
    pitches: Vec<Vec<f32>>,
}

impl SampleInstrument {
    pub fn new(voice: VoiceId, sample_rate: u32, pitches: Vec<Vec<f32>>) -> PlaybackResult<Self> {
        if pitches.len() != DEGREE_COUNT {
            return Err(PlaybackError(format!(
                "sample set {} has {} pitches, expected {}",
                voice,
                pitches.len(),
                DEGREE_COUNT
            )));
        }
        Ok(Self {
            voice,
            sample_rate,
            pitches,
        })
    }

    pub fn voice(&self) -> &VoiceId {
        &self.voice
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Render scale degree `index` held for `duration` seconds.
    pub fn render(&self, index: usize, duration: f32, sample_rate: u32) -> PlaybackResult<Vec<f32>> {
        let duration = checked_duration(duration)?;
        if sample_rate != self.sample_rate {
            return Err(PlaybackError(format!(
                "sample set {} loaded at {} Hz, output runs at {} Hz",
                self.voice, self.sample_rate, sample_rate
            )));
        }
        let source = self
            .pitches
            .get(index)
            .ok_or_else(|| PlaybackError(format!("no sample for degree {}", index)))?;
        if source.is_empty() {
            return Err(PlaybackError(format!(
                "empty sample for {} in {}",
                PITCH_NAMES[index], self.voice
            )));
        }

        let sr = sample_rate as f32;
        let hold = (duration * sr) as usize;
        let release = (SAMPLE_RELEASE_SECS * sr).max(1.0) as usize;
        let len = source.len().min(hold + release);
        let mut out = source[..len].to_vec();
        for (i, s) in out.iter_mut().enumerate().skip(hold) {
            let x = (i - hold) as f32 / release as f32;
            *s *= (1.0 - x).max(0.0);
        }
        Ok(out)
    }
}

/// Source of sample sets for a voice.
pub trait InstrumentLoader {
    fn load(&mut self, voice: &VoiceId, sample_rate: u32) -> PlaybackResult<SampleInstrument>;
}

impl<F> InstrumentLoader for F
where
    F: FnMut(&VoiceId, u32) -> PlaybackResult<SampleInstrument>,
{
    fn load(&mut self, voice: &VoiceId, sample_rate: u32) -> PlaybackResult<SampleInstrument> {
        self(voice, sample_rate)
    }
}

/// Loads WAV sample sets from a directory tree.
#[derive(Debug, Clone, Default)]
pub struct WavDirLoader {
    root: Option<PathBuf>,
}

impl WavDirLoader {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    pub fn voice_dir(&self, voice: &VoiceId) -> Option<PathBuf> {
        self.root.as_ref().map(|r| r.join(voice.as_str()))
    }
}

impl InstrumentLoader for WavDirLoader {
    fn load(&mut self, voice: &VoiceId, sample_rate: u32) -> PlaybackResult<SampleInstrument> {
        let dir = self
            .voice_dir(voice)
            .ok_or("No sample library configured")?;
        if !dir.is_dir() {
            return Err(PlaybackError(format!("No samples for {} in {}", voice, dir.display())));
        }
        log::debug!(target: "audio::sampler", "loading {} from {}", voice, dir.display());

        let mut pitches = Vec::with_capacity(DEGREE_COUNT);
        for name in PITCH_NAMES {
            let path = dir.join(format!("{}.wav", name));
            let (samples, rate) = read_wav_mono(&path)
                .map_err(|e| PlaybackError(format!("{}: {}", path.display(), e)))?;
            pitches.push(resample_linear(&samples, rate, sample_rate));
        }
        SampleInstrument::new(voice.clone(), sample_rate, pitches)
    }
}

/// Read a WAV file as mono f32 in [-1, 1]; returns the samples and their rate.
pub fn read_wav_mono(path: &Path) -> PlaybackResult<(Vec<f32>, u32)> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let scale = (1_i64 << (spec.bits_per_sample.max(1) - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()?
        }
    };
    let channels = spec.channels.max(1) as usize;
    let mono = interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect();
    Ok((mono, spec.sample_rate))
}

/// Linear-interpolation resampler.
pub fn resample_linear(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() || from_rate == 0 {
        return samples.to_vec();
    }
    let ratio = from_rate as f64 / to_rate as f64;
    let out_len = ((samples.len() as f64) / ratio).floor().max(1.0) as usize;
    (0..out_len)
        .map(|i| {
            let pos = i as f64 * ratio;
            let idx = pos.floor() as usize;
            let frac = (pos - idx as f64) as f32;
            let a = samples[idx.min(samples.len() - 1)];
            let b = samples[(idx + 1).min(samples.len() - 1)];
            a + (b - a) * frac
        })
        .collect()
}
