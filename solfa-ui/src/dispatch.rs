//! Applies actions to the app state and drives the audio player.

use std::path::PathBuf;
use std::time::Instant;

use solfa_audio::AudioPlayer;
use solfa_core::{Preferences, QuizSession, RandomSource};

use crate::action::{Action, DispatchResult, NavIntent};
use crate::state::AppState;

pub const SETUP_PANE: &str = "setup";
pub const QUIZ_PANE: &str = "quiz";

/// Owns the state, the player and the random source; panes only see `&AppState`.
pub struct LocalDispatcher {
    state: AppState,
    player: AudioPlayer,
    rng: Box<dyn RandomSource>,
    preferences_path: Option<PathBuf>,
    note_duration: f32,
}

impl LocalDispatcher {
    pub fn new(
        state: AppState,
        player: AudioPlayer,
        rng: Box<dyn RandomSource>,
        preferences_path: Option<PathBuf>,
        note_duration: f32,
    ) -> Self {
        let mut state = state;
        state.muted = player.is_muted();
        state.voice = player.voice().clone();
        Self {
            state,
            player,
            rng,
            preferences_path,
            note_duration,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn player(&self) -> &AudioPlayer {
        &self.player
    }

    pub fn dispatch(&mut self, action: &Action, now: Instant) -> DispatchResult {
        self.state.now = now;
        if *action != Action::None {
            self.state.status = None;
        }
        match *action {
            Action::None => DispatchResult::none(),
            Action::Quit => DispatchResult::with_quit(),
            Action::ChooseDirection(direction) => {
                if self.state.quiz.is_none() {
                    self.state.direction = Some(direction);
                }
                DispatchResult::none()
            }
            Action::ChooseDifficulty(difficulty) => {
                if self.state.quiz.is_none() {
                    self.state.difficulty = Some(difficulty);
                }
                DispatchResult::none()
            }
            Action::StartGame => self.start_game(now),
            Action::SelectChoice(slot) => {
                self.select_choice(slot, now);
                DispatchResult::none()
            }
            Action::ToggleMute => {
                self.state.muted = self.player.toggle_mute();
                self.state.status = Some(if self.state.muted { "Sound off" } else { "Sound on" }.to_string());
                DispatchResult::none()
            }
            Action::ToggleNotation => {
                self.toggle_notation();
                DispatchResult::none()
            }
            Action::CycleVoice => {
                let voice = self.state.voice.next_known();
                self.player.set_voice(voice.clone());
                self.state.status = Some(format!("Voice: {}", voice));
                self.state.voice = voice;
                DispatchResult::none()
            }
            Action::Restart => {
                log::info!(target: "quiz", "restart");
                self.state.quiz = None;
                self.state.direction = None;
                self.state.difficulty = None;
                self.state.choices.clear();
                self.state.last_choice = None;
                self.state.next_prompt_at = None;
                DispatchResult::with_nav(NavIntent::SwitchTo(SETUP_PANE))
            }
        }
    }

    /// Advance timers: fire an expired countdown and show the next prompt once
    /// the feedback pause is over.
    pub fn tick(&mut self, now: Instant) {
        self.state.now = now;
        let Some(quiz) = self.state.quiz.as_mut() else {
            return;
        };
        if let Some(feedback) = quiz.tick(now) {
            log::debug!(target: "quiz", "{}", feedback.message());
            self.state.next_prompt_at = Some(now + feedback.next_prompt_delay());
        }
        if self.state.next_prompt_at.is_some_and(|at| now >= at) {
            self.new_prompt(now);
        }
    }

    fn start_game(&mut self, now: Instant) -> DispatchResult {
        let (Some(direction), Some(difficulty)) = (self.state.direction, self.state.difficulty) else {
            return DispatchResult::none();
        };
        if self.state.quiz.is_some() {
            return DispatchResult::none();
        }
        log::info!(
            target: "quiz",
            "start: {} / {}",
            direction.name(),
            difficulty.name()
        );
        self.state.quiz = Some(QuizSession::new(direction, difficulty, self.state.notation));
        self.player.warm_up();
        self.new_prompt(now);
        DispatchResult::with_nav(NavIntent::SwitchTo(QUIZ_PANE))
    }

    fn new_prompt(&mut self, now: Instant) {
        let Some(quiz) = self.state.quiz.as_mut() else {
            return;
        };
        let index = quiz.next_prompt_at(&mut *self.rng, now);
        self.state.choices = quiz.choices(&mut *self.rng);
        self.state.last_choice = None;
        self.state.next_prompt_at = None;
        self.player.play_by_index(index, self.note_duration);
    }

    fn select_choice(&mut self, slot: usize, now: Instant) {
        if !self.state.awaiting_answer() {
            return;
        }
        let Some(label) = self.state.choices.get(slot).copied() else {
            return;
        };
        self.player.play_by_name(label, self.note_duration);
        if let Some(quiz) = self.state.quiz.as_mut() {
            let feedback = quiz.answer(label);
            self.state.last_choice = Some(slot);
            self.state.next_prompt_at = Some(now + feedback.next_prompt_delay());
        }
    }

    fn toggle_notation(&mut self) {
        let from = self.state.notation;
        let to = from.toggled();
        self.state.notation = to;
        if let Some(quiz) = self.state.quiz.as_mut() {
            quiz.set_notation(to.is_alternate());
        }
        self.state.relabel_choices(from, to);
        self.state.status = Some(format!("Notation: {}", to.name()));

        let prefs = Preferences {
            international: to.is_alternate(),
        };
        if let Some(path) = self.preferences_path.as_deref() {
            if let Err(e) = prefs.save_to(path) {
                log::warn!(target: "config", "could not save preferences: {}", e);
            }
        }
    }
}
