mod quiz_pane;
mod setup_pane;

pub use quiz_pane::QuizPane;
pub use setup_pane::SetupPane;
