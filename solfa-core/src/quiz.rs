//! Quiz session: prompt selection, answer evaluation, score and countdown.

use std::fmt;
use std::time::{Duration, Instant};

use solfa_types::{Difficulty, Direction, Notation};

use crate::random::RandomSource;
use crate::sequence::{random_index, resolve_correct_index, NoteSequence};

/// Pause before the next prompt after an answer.
pub const ANSWER_PAUSE: Duration = Duration::from_millis(1500);
/// Pause before the next prompt after a timeout.
pub const TIMEOUT_PAUSE: Duration = Duration::from_millis(2000);

/// Answer counters for the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    pub correct: u32,
    pub total: u32,
}

impl Score {
    pub fn record(&mut self, correct: bool) {
        self.total += 1;
        if correct {
            self.correct += 1;
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.correct, self.total)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Correct,
    Incorrect,
    Timeout,
}

/// Outcome of one prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub correct_index: usize,
    pub correct_label: &'static str,
}

impl Feedback {
    pub fn is_correct(&self) -> bool {
        self.kind == FeedbackKind::Correct
    }

    pub fn message(&self) -> String {
        match self.kind {
            FeedbackKind::Correct => "Correct! 🎉".to_string(),
            FeedbackKind::Incorrect => format!("No, it was {} 😔", self.correct_label),
            FeedbackKind::Timeout => format!("⏱️ Time's up! It was {}", self.correct_label),
        }
    }

    pub fn next_prompt_delay(&self) -> Duration {
        match self.kind {
            FeedbackKind::Timeout => TIMEOUT_PAUSE,
            _ => ANSWER_PAUSE,
        }
    }
}

/// One play-through with a fixed direction and difficulty.
#[derive(Debug, Clone)]
pub struct QuizSession {
    direction: Direction,
    difficulty: Difficulty,
    sequence: NoteSequence,
    prompt_index: usize,
    score: Score,
    deadline: Option<Instant>,
    feedback: Option<Feedback>,
}

impl QuizSession {
    pub fn new(direction: Direction, difficulty: Difficulty, notation: Notation) -> Self {
        Self {
            direction,
            difficulty,
            sequence: NoteSequence::new(notation),
            prompt_index: 0,
            score: Score::default(),
            deadline: None,
            feedback: None,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn notation(&self) -> Notation {
        self.sequence.notation()
    }

    pub fn sequence(&self) -> &NoteSequence {
        &self.sequence
    }

    pub fn prompt_index(&self) -> usize {
        self.prompt_index
    }

    pub fn prompt_label(&self) -> &'static str {
        self.sequence.labels()[self.prompt_index]
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn countdown_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Pick a fresh random prompt and arm the countdown.
    pub fn next_prompt<R: RandomSource + ?Sized>(&mut self, source: &mut R) -> usize {
        self.next_prompt_at(source, Instant::now())
    }

    pub fn next_prompt_at<R: RandomSource + ?Sized>(&mut self, source: &mut R, now: Instant) -> usize {
        let index = random_index(self.sequence.len(), source);
        self.set_prompt_at(index, now);
        index
    }

    /// Show a specific prompt; indices past the cycle wrap around.
    pub fn set_prompt_at(&mut self, index: usize, now: Instant) {
        self.prompt_index = index % self.sequence.len();
        self.feedback = None;
        let secs = self.difficulty.countdown_secs();
        self.deadline = (secs > 0).then(|| now + Duration::from_secs(secs));
    }

    /// The active labels in random order, for the answer buttons.
    pub fn choices<R: RandomSource + ?Sized>(&self, source: &mut R) -> Vec<&'static str> {
        self.sequence.shuffled(source)
    }

    pub fn correct_index(&self) -> usize {
        resolve_correct_index(self.prompt_index, self.direction, self.sequence.len())
    }

    pub fn correct_label(&self) -> &'static str {
        self.sequence.labels()[self.correct_index()]
    }

    /// Evaluate a selected label against the active alphabet.
    pub fn answer(&mut self, label: &str) -> Feedback {
        // a countdown firing after this point would double count
        self.cancel_countdown();
        let correct_index = self.correct_index();
        let correct_label = self.correct_label();
        let is_correct = label == correct_label;
        self.score.record(is_correct);
        let feedback = Feedback {
            kind: if is_correct {
                FeedbackKind::Correct
            } else {
                FeedbackKind::Incorrect
            },
            correct_index,
            correct_label,
        };
        log::debug!(target: "quiz", "answer {:?} for prompt {} -> {:?}", label, self.prompt_index, feedback.kind);
        self.feedback = Some(feedback.clone());
        feedback
    }

    /// Fire the countdown if it has expired; counts a miss.
    pub fn tick(&mut self, now: Instant) -> Option<Feedback> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        self.deadline = None;
        self.score.record(false);
        let feedback = Feedback {
            kind: FeedbackKind::Timeout,
            correct_index: self.correct_index(),
            correct_label: self.correct_label(),
        };
        log::debug!(target: "quiz", "timeout on prompt {}", self.prompt_index);
        self.feedback = Some(feedback.clone());
        Some(feedback)
    }

    pub fn cancel_countdown(&mut self) {
        self.deadline = None;
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }

    /// Remaining share of the countdown in [0, 1], for the timer bar.
    pub fn remaining_fraction(&self, now: Instant) -> Option<f64> {
        let total = self.difficulty.countdown_secs() as f64;
        if total <= 0.0 {
            return None;
        }
        self.remaining(now)
            .map(|r| (r.as_secs_f64() / total).clamp(0.0, 1.0))
    }

    /// Switch alphabets; the prompt index stays put.
    pub fn set_notation(&mut self, use_alternate: bool) {
        self.sequence.set_notation(use_alternate);
    }

    pub fn restart(&mut self) {
        self.cancel_countdown();
        self.score = Score::default();
        self.feedback = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(direction: Direction, difficulty: Difficulty) -> QuizSession {
        QuizSession::new(direction, difficulty, Notation::Solfege)
    }

    #[test]
    fn score_display() {
        let mut score = Score::default();
        score.record(true);
        score.record(false);
        assert_eq!(score.to_string(), "1/2");
    }

    #[test]
    fn easy_has_no_countdown() {
        let mut quiz = session(Direction::Forward, Difficulty::Easy);
        let now = Instant::now();
        quiz.set_prompt_at(2, now);
        assert!(!quiz.countdown_armed());
        assert_eq!(quiz.remaining_fraction(now), None);
        assert_eq!(quiz.tick(now + Duration::from_secs(60)), None);
        assert_eq!(quiz.score(), Score::default());
    }

    #[test]
    fn countdown_fraction_shrinks() {
        let mut quiz = session(Direction::Forward, Difficulty::Medium);
        let now = Instant::now();
        quiz.set_prompt_at(0, now);
        assert_eq!(quiz.remaining_fraction(now), Some(1.0));
        let half = quiz.remaining_fraction(now + Duration::from_millis(1500)).unwrap();
        assert!((half - 0.5).abs() < 1e-9);
        assert_eq!(quiz.remaining_fraction(now + Duration::from_secs(10)), Some(0.0));
    }

    #[test]
    fn prompt_index_wraps() {
        let mut quiz = session(Direction::Forward, Difficulty::Easy);
        quiz.set_prompt_at(9, Instant::now());
        assert_eq!(quiz.prompt_index(), 2);
    }

    #[test]
    fn feedback_delays() {
        let mut quiz = session(Direction::Forward, Difficulty::Hard);
        let now = Instant::now();
        quiz.set_prompt_at(0, now);
        let timeout = quiz.tick(now + Duration::from_secs(1)).unwrap();
        assert_eq!(timeout.next_prompt_delay(), TIMEOUT_PAUSE);
        assert_eq!(timeout.message(), "⏱️ Time's up! It was Ré");
        let answered = quiz.answer("Ré");
        assert_eq!(answered.next_prompt_delay(), ANSWER_PAUSE);
    }

    #[test]
    fn restart_clears_score() {
        let mut quiz = session(Direction::Backward, Difficulty::Medium);
        quiz.set_prompt_at(0, Instant::now());
        quiz.answer("Si");
        quiz.restart();
        assert_eq!(quiz.score(), Score::default());
        assert!(quiz.feedback().is_none());
        assert!(!quiz.countdown_armed());
    }
}
