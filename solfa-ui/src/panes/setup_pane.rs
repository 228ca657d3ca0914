use solfa_types::{Difficulty, Direction};

use crate::action::Action;
use crate::dispatch::SETUP_PANE;
use crate::state::AppState;
use crate::ui::layout_helpers::{center_rect, line_at};
use crate::ui::style::selected_style;
use crate::ui::{Color, InputEvent, KeyCode, Pane, Rect, RenderBuf, Style};

/// Mode and difficulty selection before a game.
#[derive(Default)]
pub struct SetupPane;

impl SetupPane {
    pub fn new() -> Self {
        Self
    }
}

impl Pane for SetupPane {
    fn id(&self) -> &'static str {
        SETUP_PANE
    }

    fn handle_input(&mut self, event: &InputEvent, state: &AppState) -> Action {
        match event.key {
            KeyCode::Enter if state.can_start() => Action::StartGame,
            KeyCode::Escape => Action::Quit,
            KeyCode::Char(_) => {
                if event.is_char('f') {
                    Action::ChooseDirection(Direction::Forward)
                } else if event.is_char('b') {
                    Action::ChooseDirection(Direction::Backward)
                } else if event.is_char('m') {
                    Action::ToggleMute
                } else if event.is_char('n') {
                    Action::ToggleNotation
                } else if event.is_char('v') {
                    Action::CycleVoice
                } else if event.is_char('q') {
                    Action::Quit
                } else {
                    event
                        .digit_slot()
                        .and_then(|i| Difficulty::ALL.get(i).copied())
                        .map_or(Action::None, Action::ChooseDifficulty)
                }
            }
            _ => Action::None,
        }
    }

    fn render(&mut self, area: Rect, buf: &mut RenderBuf, state: &AppState) {
        let rect = center_rect(area, 44, 12);
        let heading = Style::new().fg(Color::SKY_BLUE).bold();
        let hint = Style::new().fg(Color::DARK_GRAY);

        if let Some(line) = line_at(rect, 0) {
            buf.draw_line(line, &[("Mode", heading)]);
        }
        for (i, (key, direction)) in [('f', Direction::Forward), ('b', Direction::Backward)]
            .into_iter()
            .enumerate()
        {
            let selected = state.direction == Some(direction);
            let text = format!(" [{}] {} ", key, direction.instruction());
            if let Some(line) = line_at(rect, 1 + i as u16) {
                buf.draw_line(line, &[(&text, selected_style(selected, Color::WHITE))]);
            }
        }

        if let Some(line) = line_at(rect, 4) {
            buf.draw_line(line, &[("Difficulty", heading)]);
        }
        let mut x = rect.x;
        for (i, difficulty) in Difficulty::ALL.into_iter().enumerate() {
            let selected = state.difficulty == Some(difficulty);
            let text = format!(" [{}] {} {} ", i + 1, difficulty.name(), difficulty.label());
            if rect.height > 5 {
                buf.draw_str(x, rect.y + 5, &text, selected_style(selected, Color::WHITE));
            }
            x = x.saturating_add(text.chars().count() as u16 + 1);
        }

        let voice = format!("Voice: {}", state.voice);
        if let Some(line) = line_at(rect, 7) {
            buf.draw_line(line, &[(&voice, hint)]);
        }

        let start_style = if state.can_start() {
            Style::new().fg(Color::GOLD).bold()
        } else {
            hint
        };
        if let Some(line) = line_at(rect, 9) {
            buf.draw_line_centered(line, &[("[Enter] Start", start_style)]);
        }
    }

    fn key_hints(&self) -> &'static str {
        "[f/b] mode  [1-3] difficulty  [m] mute  [n] notation  [v] voice  [q] quit"
    }
}
