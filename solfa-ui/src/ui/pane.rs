use super::{InputEvent, Rect, RenderBuf};
use crate::action::{Action, NavIntent};
use crate::state::AppState;

/// Trait for UI panes (screens).
pub trait Pane {
    /// Unique identifier for this pane
    fn id(&self) -> &'static str;

    /// Map a key press to an action
    fn handle_input(&mut self, event: &InputEvent, state: &AppState) -> Action;

    /// Render the pane to the buffer
    fn render(&mut self, area: Rect, buf: &mut RenderBuf, state: &AppState);

    /// One-line key reference for the footer
    fn key_hints(&self) -> &'static str {
        ""
    }
}

/// Holds every pane with one active
pub struct PaneManager {
    panes: Vec<Box<dyn Pane>>,
    active_index: usize,
}

impl PaneManager {
    /// Create a new pane manager with an initial pane
    pub fn new(initial_pane: Box<dyn Pane>) -> Self {
        Self {
            panes: vec![initial_pane],
            active_index: 0,
        }
    }

    /// Add a pane to the manager (does not make it active)
    pub fn add_pane(&mut self, pane: Box<dyn Pane>) {
        self.panes.push(pane);
    }

    pub fn active(&self) -> &dyn Pane {
        self.panes[self.active_index].as_ref()
    }

    pub fn active_mut(&mut self) -> &mut dyn Pane {
        self.panes[self.active_index].as_mut()
    }

    /// Switch to a pane by ID
    pub fn switch_to(&mut self, id: &str) -> bool {
        match self.panes.iter().position(|p| p.id() == id) {
            Some(index) => {
                self.active_index = index;
                true
            }
            None => {
                log::warn!("no pane named {}", id);
                false
            }
        }
    }

    /// Process navigation intents returned from dispatch
    pub fn process_nav_intents(&mut self, intents: &[NavIntent]) {
        for intent in intents {
            match intent {
                NavIntent::SwitchTo(id) => {
                    self.switch_to(id);
                }
            }
        }
    }

    /// Render the active pane to the buffer.
    pub fn render(&mut self, area: Rect, buf: &mut RenderBuf, state: &AppState) {
        self.panes[self.active_index].render(area, buf, state);
    }
}
