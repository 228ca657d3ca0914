//! # solfa-types
//!
//! Shared type definitions for the solfa ear-training quiz.
//! This crate contains the value types used by solfa-core, solfa-audio and the
//! terminal front-end.

mod envelope;
mod game;
pub mod music;
mod voice;

pub use envelope::EnvConfig;
pub use game::{Difficulty, Direction};
pub use music::{Notation, DEGREE_COUNT, MAX_NOTE_SECS};
pub use voice::{VoiceId, Waveform};
