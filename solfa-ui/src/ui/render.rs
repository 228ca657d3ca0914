use ratatui::buffer::Buffer;
use ratatui::layout::Alignment;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

pub use ratatui::layout::Rect;

use super::style::{Color, Style};

/// Rendering abstraction layer.
///
/// Wraps a ratatui `Buffer` and accepts our `Style`/`Color` types natively.
pub struct RenderBuf<'a> {
    buf: &'a mut Buffer,
}

impl<'a> RenderBuf<'a> {
    pub fn new(buf: &'a mut Buffer) -> Self {
        Self { buf }
    }

    /// Set a single character at (x, y) with the given style.
    pub fn set_cell(&mut self, x: u16, y: u16, ch: char, style: Style) {
        if let Some(cell) = self.buf.cell_mut((x, y)) {
            cell.set_char(ch)
                .set_style(ratatui::style::Style::from(style));
        }
    }

    /// Draw a string at (x, y) without wrapping. Characters beyond the buffer
    /// boundary are silently clipped.
    pub fn draw_str(&mut self, x: u16, y: u16, text: &str, style: Style) {
        let rat_style = ratatui::style::Style::from(style);
        for (i, ch) in text.chars().enumerate() {
            if let Some(cell) = self.buf.cell_mut((x.saturating_add(i as u16), y)) {
                cell.set_char(ch).set_style(rat_style);
            }
        }
    }

    /// Draw a bordered block with a title. Returns the inner `Rect`.
    pub fn draw_block(
        &mut self,
        area: Rect,
        title: &str,
        border_style: Style,
        title_style: Style,
    ) -> Rect {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(ratatui::style::Style::from(border_style))
            .title_style(ratatui::style::Style::from(title_style));
        let inner = block.inner(area);
        block.render(area, self.buf);
        inner
    }

    /// Draw styled spans on a single line within the given area.
    pub fn draw_line(&mut self, area: Rect, spans: &[(&str, Style)]) {
        Paragraph::new(to_line(spans)).render(area, self.buf);
    }

    /// Like `draw_line`, centered horizontally.
    pub fn draw_line_centered(&mut self, area: Rect, spans: &[(&str, Style)]) {
        Paragraph::new(to_line(spans))
            .alignment(Alignment::Center)
            .render(area, self.buf);
    }

    /// Horizontal bar filled to `fraction` of the area width.
    pub fn draw_gauge(&mut self, area: Rect, fraction: f64, fill: Color, empty: Color) {
        let filled = (area.width as f64 * fraction.clamp(0.0, 1.0)).round() as u16;
        for x in 0..area.width {
            let (ch, color) = if x < filled { ('█', fill) } else { ('░', empty) };
            self.set_cell(area.x + x, area.y, ch, Style::new().fg(color));
        }
    }

    /// Escape hatch: direct access to the underlying ratatui `Buffer`.
    #[allow(dead_code)]
    pub fn raw_buf(&mut self) -> &mut Buffer {
        self.buf
    }
}

fn to_line<'s>(spans: &[(&'s str, Style)]) -> Line<'s> {
    let rat_spans: Vec<Span<'s>> = spans
        .iter()
        .map(|(text, style)| Span::styled(*text, ratatui::style::Style::from(*style)))
        .collect();
    Line::from(rat_spans)
}
