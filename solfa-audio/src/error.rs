use std::fmt;

use solfa_types::MAX_NOTE_SECS;

/// Result type for playback stages.
pub type PlaybackResult<T = ()> = Result<T, PlaybackError>;

/// A playback stage could not produce sound. Never surfaced to the user; the
/// player logs it and moves on to the next stage.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackError(pub String);

impl fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for PlaybackError {}

/// Validate a requested note length. Negative lengths clamp to zero; anything
/// non-finite or longer than [`MAX_NOTE_SECS`] is refused.
pub fn checked_duration(duration: f32) -> PlaybackResult<f32> {
    if !duration.is_finite() || duration > MAX_NOTE_SECS {
        return Err(PlaybackError(format!("note duration {} out of range", duration)));
    }
    Ok(duration.max(0.0))
}

impl From<std::io::Error> for PlaybackError {
    fn from(e: std::io::Error) -> Self {
        PlaybackError(e.to_string())
    }
}

impl From<hound::Error> for PlaybackError {
    fn from(e: hound::Error) -> Self {
        PlaybackError(e.to_string())
    }
}

impl From<String> for PlaybackError {
    fn from(s: String) -> Self {
        PlaybackError(s)
    }
}

impl From<&str> for PlaybackError {
    fn from(s: &str) -> Self {
        PlaybackError(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_bounds() {
        assert_eq!(checked_duration(0.6), Ok(0.6));
        assert_eq!(checked_duration(-1.0), Ok(0.0));
        assert_eq!(checked_duration(MAX_NOTE_SECS), Ok(MAX_NOTE_SECS));
        assert!(checked_duration(MAX_NOTE_SECS + 0.1).is_err());
        assert!(checked_duration(f32::INFINITY).is_err());
        assert!(checked_duration(f32::NAN).is_err());
        assert!(checked_duration(1e9).is_err());
    }
}
