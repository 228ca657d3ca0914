//! Note playback for the trainer.
//!
//! [`AudioPlayer`] owns a lazily opened output graph and plays scale degrees
//! through a chain of sources: a sampled instrument, a synthesized voice and
//! a procedural piano tone.

pub mod cpal_output;
pub mod error;
pub mod output;
pub mod paths;
pub mod player;
pub mod sampler;
pub mod synth;
pub mod tone;

pub use error::{PlaybackError, PlaybackResult};
pub use output::{AudioSink, SharedTestSink, SinkFactory, TestOp, TestSink};
pub use player::{AudioPlayer, PlaybackStage};
pub use sampler::{InstrumentLoader, SampleInstrument, WavDirLoader};
pub use synth::{SynthPreset, SynthVoice, Technique};
