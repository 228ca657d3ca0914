//! The one persisted user preference: which note alphabet is active.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use solfa_types::Notation;

use crate::config::config_dir;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preferences {
    pub international: bool,
}

impl Preferences {
    pub fn notation(&self) -> Notation {
        Notation::from_alternate(self.international)
    }

    /// Load from the default location; `None` when nothing was saved or the
    /// file is unreadable.
    pub fn load() -> Option<Self> {
        Self::load_from(&default_path()?)
    }

    pub fn load_from(path: &Path) -> Option<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                log::warn!(target: "config", "could not read preferences {}: {}", path.display(), e);
                return None;
            }
        };
        match toml::from_str(&contents) {
            Ok(prefs) => Some(prefs),
            Err(e) => {
                log::warn!(target: "config", "ignoring malformed preferences {}: {}", path.display(), e);
                None
            }
        }
    }

    pub fn save(&self) -> io::Result<()> {
        let path = default_path()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no config directory"))?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, contents)?;
        log::debug!(target: "config", "saved preferences to {}", path.display());
        Ok(())
    }
}

fn default_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("preferences.toml"))
}
