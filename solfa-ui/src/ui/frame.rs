use super::{Color, Rect, RenderBuf, Style};
use crate::state::AppState;

/// Frame wrapping the active pane with border, header and footer
pub struct Frame;

impl Frame {
    pub const MIN_WIDTH: u16 = 56;
    pub const MIN_HEIGHT: u16 = 16;

    /// Returns true if the terminal area is large enough for normal rendering.
    pub fn is_size_ok(area: Rect) -> bool {
        area.width >= Self::MIN_WIDTH && area.height >= Self::MIN_HEIGHT
    }

    /// Draw the border, header and footer. Returns the area left for the pane,
    /// or `None` when the terminal is too small.
    pub fn render_buf(area: Rect, buf: &mut RenderBuf, state: &AppState, hints: &str) -> Option<Rect> {
        if !Self::is_size_ok(area) {
            let msg = format!(
                "{}x{} required, got {}x{}",
                Self::MIN_WIDTH, Self::MIN_HEIGHT, area.width, area.height
            );
            let x = area.x + area.width.saturating_sub(msg.len() as u16) / 2;
            let y = area.y + area.height / 2;
            buf.draw_str(x, y, &msg, Style::new().fg(Color::MUTE_COLOR));
            return None;
        }

        let border_style = Style::new().fg(Color::GRAY);
        let title_style = Style::new().fg(Color::GOLD).bold();
        let inner = buf.draw_block(area, " SOLFA ", border_style, title_style);

        // right side of the top border: sound and notation indicators
        let sound = if state.muted { " MUTE " } else { " ♪ ON " };
        let sound_style = if state.muted {
            Style::new().fg(Color::MUTE_COLOR).bold()
        } else {
            Style::new().fg(Color::CORRECT)
        };
        let notation = format!(" {} ", state.notation.name());
        let right = area.x + area.width.saturating_sub(2);
        let sound_x = right.saturating_sub(sound.chars().count() as u16);
        let notation_x = sound_x.saturating_sub(notation.chars().count() as u16 + 1);
        buf.draw_str(notation_x, area.y, &notation, Style::new().fg(Color::SKY_BLUE));
        buf.draw_str(sound_x, area.y, sound, sound_style);

        // footer: transient status or key hints
        let footer_y = area.y + area.height.saturating_sub(1);
        let footer = match &state.status {
            Some(status) => format!(" {} ", status),
            None => format!(" {} ", hints),
        };
        buf.draw_str(area.x + 2, footer_y, &footer, Style::new().fg(Color::DARK_GRAY));

        Some(inner)
    }
}
