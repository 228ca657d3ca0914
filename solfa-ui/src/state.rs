//! Everything the panes render from.

use std::time::Instant;

use solfa_core::QuizSession;
use solfa_types::{Difficulty, Direction, Notation, VoiceId};

pub struct AppState {
    pub direction: Option<Direction>,
    pub difficulty: Option<Difficulty>,
    pub notation: Notation,
    /// `None` while on the setup screen.
    pub quiz: Option<QuizSession>,
    /// Answer buttons, in the order shown.
    pub choices: Vec<&'static str>,
    /// Slot the user picked for the current prompt.
    pub last_choice: Option<usize>,
    /// When the feedback pause ends and the next prompt appears.
    pub next_prompt_at: Option<Instant>,
    pub muted: bool,
    pub voice: VoiceId,
    pub status: Option<String>,
    pub now: Instant,
}

impl AppState {
    pub fn new(notation: Notation, voice: VoiceId) -> Self {
        Self {
            direction: None,
            difficulty: None,
            notation,
            quiz: None,
            choices: Vec::new(),
            last_choice: None,
            next_prompt_at: None,
            muted: false,
            voice,
            status: None,
            now: Instant::now(),
        }
    }

    /// Start is allowed only once both mode and difficulty are picked.
    pub fn can_start(&self) -> bool {
        self.direction.is_some() && self.difficulty.is_some()
    }

    /// Waiting for an answer (no feedback on screen).
    pub fn awaiting_answer(&self) -> bool {
        self.quiz.as_ref().is_some_and(|q| q.feedback().is_none())
    }

    /// Relabel the answer buttons in `notation`, keeping their order.
    pub fn relabel_choices(&mut self, from: Notation, to: Notation) {
        self.choices = self
            .choices
            .iter()
            .map(|label| from.index_of(label).and_then(|i| to.label(i)).unwrap_or(*label))
            .collect();
    }
}
