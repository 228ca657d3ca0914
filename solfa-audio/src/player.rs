//! The playback fallback chain.
//!
//! `play_by_index` tries, in order: the sampled instrument for the current
//! voice, the synthesized voice, and finally the procedural piano tone. Any
//! stage that fails is logged and skipped; callers never see an error.

use std::path::PathBuf;

use solfa_types::music::{degree_of_label, PITCH_NAMES};
use solfa_types::{VoiceId, DEGREE_COUNT};

use crate::cpal_output::CpalSink;
use crate::error::{PlaybackError, PlaybackResult};
use crate::output::{AudioSink, SinkFactory};
use crate::sampler::{InstrumentLoader, SampleInstrument, WavDirLoader};
use crate::synth::{SynthPreset, SynthVoice};
use crate::tone::render_piano_tone;

/// Which stage of the chain produced the last note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStage {
    Sampled,
    Synthesized,
    Procedural,
}

pub struct AudioPlayer {
    muted: bool,
    graph: Option<Box<dyn AudioSink>>,
    sink_factory: SinkFactory,
    voice: VoiceId,
    loader: Box<dyn InstrumentLoader>,
    instrument: Option<SampleInstrument>,
    synth_enabled: bool,
    synth: Option<SynthVoice>,
    noise_state: u64,
    last_stage: Option<PlaybackStage>,
}

impl AudioPlayer {
    pub fn new(
        voice: VoiceId,
        loader: Box<dyn InstrumentLoader>,
        synth_enabled: bool,
        sink_factory: SinkFactory,
    ) -> Self {
        Self {
            muted: false,
            graph: None,
            sink_factory,
            voice,
            loader,
            instrument: None,
            synth_enabled,
            synth: None,
            noise_state: 0x2545_f491_4f6c_dd1d,
            last_stage: None,
        }
    }

    /// A player on the default output device, loading samples from `samples_dir`.
    pub fn with_default_output(voice: VoiceId, samples_dir: Option<PathBuf>, synth_enabled: bool) -> Self {
        Self::new(
            voice,
            Box::new(WavDirLoader::new(samples_dir)),
            synth_enabled,
            Box::new(|| CpalSink::open().map(|sink| Box::new(sink) as Box<dyn AudioSink>)),
        )
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn voice(&self) -> &VoiceId {
        &self.voice
    }

    pub fn has_output(&self) -> bool {
        self.graph.is_some()
    }

    pub fn last_stage(&self) -> Option<PlaybackStage> {
        self.last_stage
    }

    /// Flip the mute flag and return the new value.
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        if let Some(graph) = self.graph.as_ref() {
            graph.set_gain(if self.muted { 0.0 } else { 1.0 });
            if !self.muted && graph.is_suspended() {
                if let Err(e) = graph.resume() {
                    log::warn!(target: "audio::chain", "could not resume output: {}", e);
                }
            }
        }
        log::debug!(target: "audio::chain", "muted: {}", self.muted);
        self.muted
    }

    /// Select a new voice. Cached instruments for the old voice are dropped
    /// before the next note can use them.
    pub fn set_voice(&mut self, voice: VoiceId) {
        log::info!(target: "audio::chain", "voice: {}", voice);
        self.voice = voice;
        self.instrument = None;
        self.synth = None;
        // preload once the device is up; failures surface on the next note
        if let Some(rate) = self.graph.as_ref().map(|g| g.sample_rate()) {
            if let Err(e) = self.ensure_instrument(rate) {
                log::debug!(target: "audio::chain", "preload of {} failed: {}", self.voice, e);
            }
        }
    }

    /// Open the output, resume it and try to load the current voice.
    pub fn warm_up(&mut self) {
        let Some(rate) = self.ensure_graph() else {
            return;
        };
        if let Some(graph) = self.graph.as_ref() {
            if graph.is_suspended() {
                if let Err(e) = graph.resume() {
                    log::warn!(target: "audio::chain", "could not resume output: {}", e);
                }
            }
        }
        match self.ensure_instrument(rate) {
            Ok(_) => log::info!(target: "audio::chain", "{} ready", self.voice),
            Err(e) => log::info!(target: "audio::chain", "{} not available: {}", self.voice, e),
        }
    }

    /// Sound scale degree `index` for about `duration` seconds.
    pub fn play_by_index(&mut self, index: usize, duration: f32) {
        if self.muted {
            return;
        }
        if index >= DEGREE_COUNT {
            log::debug!(target: "audio::chain", "ignoring degree {}", index);
            return;
        }
        let Some(rate) = self.ensure_graph() else {
            return;
        };

        match self.play_sampled(index, duration, rate) {
            Ok(()) => {
                self.last_stage = Some(PlaybackStage::Sampled);
                log::debug!(target: "audio::chain", "played sample {} with {}", PITCH_NAMES[index], self.voice);
                return;
            }
            Err(e) => log::debug!(target: "audio::chain", "no sampled instrument ({}), using synth", e),
        }

        match self.play_synthesized(index, duration, rate) {
            Ok(()) => {
                self.last_stage = Some(PlaybackStage::Synthesized);
                log::debug!(target: "audio::chain", "played {} via synth", PITCH_NAMES[index]);
                return;
            }
            Err(e) => log::debug!(target: "audio::chain", "synth unavailable ({}), using tone", e),
        }

        match self.play_procedural(index, duration, rate) {
            Ok(()) => self.last_stage = Some(PlaybackStage::Procedural),
            Err(e) => log::warn!(target: "audio::chain", "could not play {}: {}", PITCH_NAMES[index], e),
        }
    }

    /// Sound the degree named `label` in either alphabet; unknown labels are ignored.
    pub fn play_by_name(&mut self, label: &str, duration: f32) {
        match degree_of_label(label) {
            Some(index) => self.play_by_index(index, duration),
            None => log::debug!(target: "audio::chain", "unknown note label {:?}", label),
        }
    }

    fn ensure_graph(&mut self) -> Option<u32> {
        if self.graph.is_none() {
            match (self.sink_factory)() {
                Ok(graph) => {
                    graph.set_gain(if self.muted { 0.0 } else { 1.0 });
                    self.graph = Some(graph);
                }
                Err(e) => {
                    log::warn!(target: "audio::chain", "audio output unavailable: {}", e);
                    return None;
                }
            }
        }
        self.graph.as_ref().map(|g| g.sample_rate())
    }

    fn ensure_instrument(&mut self, sample_rate: u32) -> PlaybackResult<&SampleInstrument> {
        let stale = self
            .instrument
            .as_ref()
            .is_some_and(|i| i.voice() != &self.voice || i.sample_rate() != sample_rate);
        if stale {
            self.instrument = None;
        }
        if self.instrument.is_none() {
            let inst = self.loader.load(&self.voice, sample_rate)?;
            log::info!(target: "audio::chain", "instrument loaded: {}", self.voice);
            self.instrument = Some(inst);
        }
        self.instrument
            .as_ref()
            .ok_or_else(|| PlaybackError::from("instrument missing after load"))
    }

    fn ensure_synth(&mut self, sample_rate: u32) -> PlaybackResult<&mut SynthVoice> {
        if !self.synth_enabled {
            return Err(PlaybackError::from("synthesis disabled"));
        }
        if self.synth.as_ref().is_some_and(|s| s.sample_rate() != sample_rate) {
            self.synth = None;
        }
        if self.synth.is_none() {
            let mut synth = SynthVoice::new(sample_rate);
            if !self.voice.is_generic() {
                synth.apply_preset(SynthPreset::for_voice(&self.voice));
            }
            self.synth = Some(synth);
        }
        self.synth
            .as_mut()
            .ok_or_else(|| PlaybackError::from("synth missing after build"))
    }

    fn schedule(&self, buffer: Vec<f32>) -> PlaybackResult {
        self.graph
            .as_ref()
            .ok_or_else(|| PlaybackError::from("no output"))?
            .schedule(buffer)
    }

    fn play_sampled(&mut self, index: usize, duration: f32, rate: u32) -> PlaybackResult {
        let buffer = self.ensure_instrument(rate)?.render(index, duration, rate)?;
        self.schedule(buffer)
    }

    fn play_synthesized(&mut self, index: usize, duration: f32, rate: u32) -> PlaybackResult {
        let buffer = self.ensure_synth(rate)?.trigger_attack_release(index, duration)?;
        self.schedule(buffer)
    }

    fn play_procedural(&mut self, index: usize, duration: f32, rate: u32) -> PlaybackResult {
        let buffer = render_piano_tone(index, duration, rate, &mut self.noise_state)?;
        self.schedule(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{shared_test_factory, TestOp, TestSink};
    use std::sync::{Arc, Mutex};

    const SR: u32 = 8_000;

    fn failing_loader() -> Box<dyn InstrumentLoader> {
        Box::new(|_: &VoiceId, _: u32| -> PlaybackResult<SampleInstrument> {
            Err(PlaybackError::from("no library"))
        })
    }

    fn player(synth: bool) -> (AudioPlayer, Arc<TestSink>, Arc<Mutex<u32>>) {
        let sink = Arc::new(TestSink::new(SR));
        let builds = Arc::new(Mutex::new(0));
        let player = AudioPlayer::new(
            VoiceId::default(),
            failing_loader(),
            synth,
            shared_test_factory(Arc::clone(&sink), Arc::clone(&builds)),
        );
        (player, sink, builds)
    }

    #[test]
    fn graph_is_built_lazily_once() {
        let (mut player, _sink, builds) = player(true);
        assert!(!player.has_output());
        assert_eq!(*builds.lock().unwrap(), 0);
        player.play_by_index(0, 0.2);
        player.play_by_index(1, 0.2);
        assert!(player.has_output());
        assert_eq!(*builds.lock().unwrap(), 1);
    }

    #[test]
    fn toggle_mute_before_graph_exists() {
        let (mut player, sink, builds) = player(true);
        assert!(player.toggle_mute());
        assert!(player.is_muted());
        player.play_by_index(3, 0.2);
        assert_eq!(*builds.lock().unwrap(), 0);
        assert_eq!(sink.scheduled_count(), 0);
        assert!(!player.toggle_mute());
    }

    #[test]
    fn mute_zeroes_gain_and_unmute_resumes() {
        let sink = Arc::new(TestSink::new(SR).suspended());
        let builds = Arc::new(Mutex::new(0));
        let mut player = AudioPlayer::new(
            VoiceId::default(),
            failing_loader(),
            true,
            shared_test_factory(Arc::clone(&sink), builds),
        );
        player.warm_up();
        assert!(!sink.is_suspended());

        sink.suspend().unwrap();
        player.toggle_mute();
        assert_eq!(sink.gain(), Some(0.0));
        player.toggle_mute();
        assert_eq!(sink.gain(), Some(1.0));
        assert!(!sink.is_suspended());
        assert_eq!(sink.operations().last(), Some(&TestOp::Resume));
    }

    #[test]
    fn stage_falls_through_to_synth_then_tone() {
        let (mut synth_player, synth_sink, _) = player(true);
        synth_player.play_by_index(2, 0.2);
        assert_eq!(synth_player.last_stage(), Some(PlaybackStage::Synthesized));
        assert_eq!(synth_sink.scheduled_count(), 1);

        let (mut tone_player, tone_sink, _) = player(false);
        tone_player.play_by_index(2, 0.2);
        assert_eq!(tone_player.last_stage(), Some(PlaybackStage::Procedural));
        assert_eq!(tone_sink.buffers()[0].len(), (0.7 * SR as f64).round() as usize);
    }

    #[test]
    fn unbounded_duration_is_a_silent_no_op() {
        let (mut player, sink, _) = player(true);
        player.play_by_index(0, f32::INFINITY);
        player.play_by_name("Sol", 1e9);
        assert_eq!(sink.scheduled_count(), 0);
        assert_eq!(player.last_stage(), None);
    }

    #[test]
    fn synth_uses_voice_recipe() {
        let (mut player, _sink, _) = player(true);
        player.play_by_index(0, 0.2);
        assert_eq!(player.synth.as_ref().unwrap().preset(), &SynthPreset::generic());

        player.set_voice(VoiceId::new("violin"));
        assert!(player.synth.is_none());
        player.play_by_index(0, 0.2);
        assert_eq!(player.synth.as_ref().unwrap().preset().name, "bowed string");
    }

    #[test]
    fn labels_from_either_alphabet() {
        let (mut player, sink, _) = player(true);
        player.play_by_name("Sol", 0.1);
        player.play_by_name("G", 0.1);
        player.play_by_name("H", 0.1);
        player.play_by_index(7, 0.1);
        assert_eq!(sink.scheduled_count(), 2);
        assert_eq!(sink.buffers()[0], sink.buffers()[1]);
    }

    #[test]
    fn no_output_is_silent() {
        let mut player = AudioPlayer::new(
            VoiceId::default(),
            failing_loader(),
            true,
            Box::new(|| Err(PlaybackError::from("no device"))),
        );
        player.play_by_index(0, 0.2);
        player.warm_up();
        assert!(!player.has_output());
        assert_eq!(player.last_stage(), None);
        assert!(player.toggle_mute());
    }
}
