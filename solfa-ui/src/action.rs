use solfa_types::{Difficulty, Direction};

/// What a pane asks the dispatcher to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    ChooseDirection(Direction),
    ChooseDifficulty(Difficulty),
    StartGame,
    /// Answer with the n-th shuffled choice.
    SelectChoice(usize),
    ToggleMute,
    ToggleNotation,
    CycleVoice,
    Restart,
}

/// Pane navigation requested by a dispatched action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavIntent {
    SwitchTo(&'static str),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchResult {
    pub quit: bool,
    pub nav: Vec<NavIntent>,
}

impl DispatchResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_quit() -> Self {
        Self {
            quit: true,
            ..Self::default()
        }
    }

    pub fn with_nav(intent: NavIntent) -> Self {
        Self {
            quit: false,
            nav: vec![intent],
        }
    }
}
