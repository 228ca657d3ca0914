use solfa_core::FeedbackKind;

use crate::action::Action;
use crate::dispatch::QUIZ_PANE;
use crate::state::AppState;
use crate::ui::layout_helpers::{center_rect, line_at};
use crate::ui::style::countdown_color;
use crate::ui::{Color, InputEvent, KeyCode, Pane, Rect, RenderBuf, Style};

/// Prompt, answer choices, countdown and score.
#[derive(Default)]
pub struct QuizPane;

impl QuizPane {
    pub fn new() -> Self {
        Self
    }
}

/// Style of the answer button in `slot`, after feedback if any.
fn choice_style(state: &AppState, slot: usize, label: &str) -> Style {
    let base = Style::new().fg(Color::WHITE).bg(Color::SELECTION_BG);
    let Some(feedback) = state.quiz.as_ref().and_then(|q| q.feedback()) else {
        return base;
    };
    if label == feedback.correct_label {
        Style::new().fg(Color::BLACK).bg(Color::CORRECT).bold()
    } else if state.last_choice == Some(slot) {
        Style::new().fg(Color::BLACK).bg(Color::INCORRECT).bold()
    } else {
        Style::new().fg(Color::DARK_GRAY)
    }
}

impl Pane for QuizPane {
    fn id(&self) -> &'static str {
        QUIZ_PANE
    }

    fn handle_input(&mut self, event: &InputEvent, _state: &AppState) -> Action {
        if event.key == KeyCode::Escape {
            return Action::Quit;
        }
        if let Some(slot) = event.digit_slot() {
            return Action::SelectChoice(slot);
        }
        if event.is_char('m') {
            Action::ToggleMute
        } else if event.is_char('n') {
            Action::ToggleNotation
        } else if event.is_char('v') {
            Action::CycleVoice
        } else if event.is_char('r') {
            Action::Restart
        } else if event.is_char('q') {
            Action::Quit
        } else {
            Action::None
        }
    }

    fn render(&mut self, area: Rect, buf: &mut RenderBuf, state: &AppState) {
        let Some(quiz) = state.quiz.as_ref() else {
            return;
        };
        let rect = center_rect(area, 60, 12);
        let dim = Style::new().fg(Color::DARK_GRAY);

        let score = format!("Score: {}", quiz.score());
        let voice = format!("Voice: {}", state.voice);
        if let Some(line) = line_at(rect, 0) {
            buf.draw_line(line, &[(&score, Style::new().fg(Color::GOLD)), ("   ", dim), (&voice, dim)]);
        }

        if let Some(line) = line_at(rect, 2) {
            buf.draw_line_centered(line, &[(quiz.prompt_label(), Style::new().fg(Color::WHITE).bold().underline())]);
        }
        if let Some(line) = line_at(rect, 3) {
            buf.draw_line_centered(line, &[(quiz.direction().instruction(), Style::new().fg(Color::SKY_BLUE))]);
        }

        // answer buttons: " 1 Do " " 2 Mi " ...
        let buttons: Vec<String> = state
            .choices
            .iter()
            .enumerate()
            .map(|(i, label)| format!(" {} {} ", i + 1, label))
            .collect();
        let total: u16 = buttons.iter().map(|b| b.chars().count() as u16 + 1).sum();
        let mut x = rect.x + rect.width.saturating_sub(total) / 2;
        if rect.height > 5 {
            for (slot, (text, label)) in buttons.iter().zip(&state.choices).enumerate() {
                buf.draw_str(x, rect.y + 5, text, choice_style(state, slot, label));
                x = x.saturating_add(text.chars().count() as u16 + 1);
            }
        }

        if let Some(fraction) = quiz.remaining_fraction(state.now) {
            if let Some(line) = line_at(rect, 7) {
                let secs = quiz
                    .remaining(state.now)
                    .map_or(0, |r| r.as_millis().div_ceil(1000));
                let text = format!(" ⏱ {}s", secs);
                let gauge_width = line.width.saturating_sub(text.chars().count() as u16 + 1);
                let gauge = Rect::new(line.x, line.y, gauge_width, 1);
                buf.draw_gauge(gauge, fraction, countdown_color(fraction), Color::DARK_GRAY);
                buf.draw_str(line.x + gauge_width, line.y, &text, Style::new().fg(Color::WHITE));
            }
        }

        if let Some(feedback) = quiz.feedback() {
            let color = match feedback.kind {
                FeedbackKind::Correct => Color::CORRECT,
                FeedbackKind::Incorrect | FeedbackKind::Timeout => Color::INCORRECT,
            };
            let message = feedback.message();
            if let Some(line) = line_at(rect, 9) {
                buf.draw_line_centered(line, &[(&message, Style::new().fg(color).bold())]);
            }
        }
    }

    fn key_hints(&self) -> &'static str {
        "[1-7] answer  [m] mute  [n] notation  [v] voice  [r] restart  [q] quit"
    }
}
