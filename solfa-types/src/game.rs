use serde::{Deserialize, Serialize};

/// Whether the expected answer is the next or the previous scale degree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn name(&self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Backward => "backward",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "forward" | "next" => Some(Direction::Forward),
            "backward" | "previous" | "prev" => Some(Direction::Backward),
            _ => None,
        }
    }

    pub fn instruction(&self) -> &'static str {
        match self {
            Direction::Forward => "What is the next note?",
            Direction::Backward => "What is the previous note?",
        }
    }
}

/// Countdown level for each prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Seconds allowed per prompt; 0 means no countdown.
    pub fn countdown_secs(&self) -> u64 {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 3,
            Difficulty::Hard => 1,
        }
    }

    pub fn has_countdown(&self) -> bool {
        self.countdown_secs() > 0
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "∞",
            Difficulty::Medium => "3s",
            Difficulty::Hard => "1s",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}
