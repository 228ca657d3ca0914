use serde::{Deserialize, Serialize};

/// Number of scale degrees in the note cycle.
pub const DEGREE_COUNT: usize = 7;

pub const SOLFEGE_LABELS: [&str; DEGREE_COUNT] = ["Do", "Ré", "Mi", "Fa", "Sol", "La", "Si"];
pub const INTERNATIONAL_LABELS: [&str; DEGREE_COUNT] = ["C", "D", "E", "F", "G", "A", "B"];

/// Pitch names used to address sampled instruments, one per scale degree.
pub const PITCH_NAMES: [&str; DEGREE_COUNT] = ["C4", "D4", "E4", "F4", "G4", "A4", "B4"];

/// Semitone offset of each scale degree above middle C (major scale).
pub const SEMITONES: [i32; DEGREE_COUNT] = [0, 2, 4, 5, 7, 9, 11];

/// Equal-tempered middle C in Hz.
pub const MIDDLE_C_HZ: f64 = 261.625_565_300_598_6;

/// Longest note any playback stage will render, in seconds.
pub const MAX_NOTE_SECS: f32 = 10.0;

/// Label alphabet used to display scale degrees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Notation {
    #[default]
    Solfege,
    International,
}

impl Notation {
    /// `true` selects the international alphabet.
    pub fn from_alternate(use_alternate: bool) -> Self {
        if use_alternate {
            Notation::International
        } else {
            Notation::Solfege
        }
    }

    pub fn is_alternate(&self) -> bool {
        matches!(self, Notation::International)
    }

    pub fn toggled(&self) -> Self {
        Self::from_alternate(!self.is_alternate())
    }

    pub fn name(&self) -> &'static str {
        match self {
            Notation::Solfege => "Solfège",
            Notation::International => "International",
        }
    }

    pub fn labels(&self) -> &'static [&'static str; DEGREE_COUNT] {
        match self {
            Notation::Solfege => &SOLFEGE_LABELS,
            Notation::International => &INTERNATIONAL_LABELS,
        }
    }

    pub fn label(&self, index: usize) -> Option<&'static str> {
        self.labels().get(index).copied()
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels().iter().position(|l| *l == label)
    }
}

/// Resolve a label against both alphabets, solfège first.
pub fn degree_of_label(label: &str) -> Option<usize> {
    Notation::Solfege
        .index_of(label)
        .or_else(|| Notation::International.index_of(label))
}

/// Equal-tempered frequency of a scale degree in the middle-C octave.
pub fn degree_frequency(index: usize) -> Option<f64> {
    SEMITONES
        .get(index)
        .map(|s| MIDDLE_C_HZ * 2f64.powf(*s as f64 / 12.0))
}
