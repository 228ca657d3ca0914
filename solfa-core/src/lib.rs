pub mod config;
pub mod preferences;
pub mod quiz;
pub mod random;
pub mod sequence;

pub use config::{AudioSettings, Config};
pub use preferences::Preferences;
pub use quiz::{Feedback, FeedbackKind, QuizSession, Score};
pub use random::{Lcg, RandomSource};
pub use sequence::{random_index, resolve_correct_index, shuffle, NoteSequence};
