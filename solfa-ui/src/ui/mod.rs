pub mod frame;
pub mod input;
pub mod layout_helpers;
pub mod pane;
pub mod ratatui_impl;
pub mod render;
pub mod style;

pub use frame::Frame;
pub use input::{AppEvent, InputEvent, InputSource, KeyCode, Modifiers};
pub use pane::{Pane, PaneManager};
pub use ratatui_impl::RatatuiBackend;
pub use render::{Rect, RenderBuf};
pub use style::{Color, Style};
