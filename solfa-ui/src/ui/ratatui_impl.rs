use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode as CrosstermKeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect as RatatuiRect,
    widgets::Widget,
    Terminal,
};

use super::style::Color;
use super::{AppEvent, InputEvent, InputSource, KeyCode, Modifiers};

/// Ratatui-based terminal backend
pub struct RatatuiBackend {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl RatatuiBackend {
    /// Create a new ratatui backend (does not start terminal mode)
    pub fn new() -> io::Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }

    /// Enter raw mode and the alternate screen
    pub fn start(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        self.terminal.hide_cursor()?;
        self.terminal.clear()?;
        Ok(())
    }

    /// Leave raw mode and the alternate screen
    pub fn stop(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        execute!(io::stdout(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    /// Begin a new frame for drawing
    pub fn begin_frame(&self) -> io::Result<RatatuiFrame> {
        let size = self.terminal.size()?;
        let area = RatatuiRect::new(0, 0, size.width, size.height);
        let mut buffer = Buffer::empty(area);
        let bg_style = ratatui::style::Style::default().bg(Color::BACKGROUND.into());
        buffer.set_style(area, bg_style);
        Ok(RatatuiFrame { buffer })
    }

    /// End the current frame and render to screen
    pub fn end_frame(&mut self, frame: RatatuiFrame) -> io::Result<()> {
        self.terminal.draw(|f| {
            let area = f.area();
            f.render_widget(BufferWidget(frame.buffer), area);
        })?;
        Ok(())
    }
}

/// A frame for drawing operations
pub struct RatatuiFrame {
    buffer: Buffer,
}

impl RatatuiFrame {
    pub fn buffer_mut(&mut self) -> &mut Buffer {
        &mut self.buffer
    }

    pub fn area(&self) -> RatatuiRect {
        self.buffer.area
    }
}

impl InputSource for RatatuiBackend {
    fn poll_event(&mut self, timeout: Duration) -> Option<AppEvent> {
        let mut t = timeout;
        loop {
            if !event::poll(t).ok()? {
                return None;
            }
            match event::read().ok()? {
                Event::Key(key_event) => {
                    if key_event.kind == KeyEventKind::Release {
                        t = Duration::ZERO;
                        continue;
                    }
                    if let Some(ev) = convert_key_event(key_event) {
                        return Some(AppEvent::Key(ev));
                    }
                    t = Duration::ZERO;
                }
                Event::Resize(_, _) => {
                    return Some(AppEvent::Resize);
                }
                _ => {
                    // mouse, focus, paste: drain with zero timeout
                    t = Duration::ZERO;
                }
            }
        }
    }
}

fn convert_key_event(event: KeyEvent) -> Option<InputEvent> {
    let key = match event.code {
        CrosstermKeyCode::Char(c) => KeyCode::Char(c),
        CrosstermKeyCode::Enter => KeyCode::Enter,
        CrosstermKeyCode::Esc => KeyCode::Escape,
        _ => return None,
    };

    let modifiers = Modifiers {
        ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
        alt: event.modifiers.contains(KeyModifiers::ALT),
    };

    Some(InputEvent::new(key, modifiers))
}

/// Widget that renders a pre-built buffer
struct BufferWidget(Buffer);

impl Widget for BufferWidget {
    fn render(self, area: RatatuiRect, buf: &mut Buffer) {
        for y in area.y..area.y.saturating_add(area.height) {
            for x in area.x..area.x.saturating_add(area.width) {
                if let (Some(src), Some(dst)) = (self.0.cell((x, y)), buf.cell_mut((x, y))) {
                    *dst = src.clone();
                }
            }
        }
    }
}
