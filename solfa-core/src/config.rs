use std::path::{Path, PathBuf};

use serde::Deserialize;

use solfa_types::{Difficulty, Direction, VoiceId, MAX_NOTE_SECS};

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    defaults: DefaultsConfig,
    #[serde(default)]
    audio: AudioConfig,
}

#[derive(Deserialize, Default)]
struct DefaultsConfig {
    international: Option<bool>,
    direction: Option<String>,
    difficulty: Option<String>,
}

#[derive(Deserialize, Default)]
struct AudioConfig {
    voice: Option<String>,
    samples_dir: Option<String>,
    synth_fallback: Option<bool>,
    note_duration: Option<f32>,
}

/// Playback settings handed to the audio player.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSettings {
    pub voice: VoiceId,
    pub samples_dir: Option<PathBuf>,
    pub synth_fallback: bool,
    pub note_duration: f32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            voice: VoiceId::default(),
            samples_dir: None,
            synth_fallback: true,
            note_duration: 0.6,
        }
    }
}

pub struct Config {
    defaults: DefaultsConfig,
    audio: AudioConfig,
}

impl Config {
    /// Embedded defaults merged with the user's config file, if any.
    pub fn load() -> Self {
        match user_config_path() {
            Some(path) => Self::load_with(&path),
            None => Self::embedded(),
        }
    }

    /// Embedded defaults merged with the file at `path`; a missing file is fine.
    pub fn load_with(path: &Path) -> Self {
        let mut config = Self::embedded();
        if !path.exists() {
            return config;
        }
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
                Ok(user) => {
                    merge_defaults(&mut config.defaults, user.defaults);
                    merge_audio(&mut config.audio, user.audio);
                }
                Err(e) => {
                    log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e)
                }
            },
            Err(e) => {
                log::warn!(target: "config", "could not read config {}: {}", path.display(), e)
            }
        }
        config
    }

    fn embedded() -> Self {
        let base: ConfigFile = match toml::from_str(DEFAULT_CONFIG) {
            Ok(base) => base,
            Err(e) => {
                log::error!(target: "config", "embedded config.toml is invalid: {}", e);
                ConfigFile::default()
            }
        };
        Config {
            defaults: base.defaults,
            audio: base.audio,
        }
    }

    /// Notation used when no preference has been saved yet.
    pub fn default_international(&self) -> bool {
        self.defaults.international.unwrap_or(false)
    }

    pub fn direction(&self) -> Option<Direction> {
        self.defaults.direction.as_deref().and_then(Direction::parse)
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.defaults.difficulty.as_deref().and_then(Difficulty::parse)
    }

    pub fn audio(&self) -> AudioSettings {
        let fallback = AudioSettings::default();
        AudioSettings {
            voice: self
                .audio
                .voice
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(VoiceId::new)
                .unwrap_or(fallback.voice),
            samples_dir: self
                .audio
                .samples_dir
                .as_deref()
                .filter(|d| !d.is_empty())
                .map(expand_home),
            synth_fallback: self.audio.synth_fallback.unwrap_or(fallback.synth_fallback),
            note_duration: self
                .audio
                .note_duration
                .filter(|d| d.is_finite() && *d > 0.0 && *d <= MAX_NOTE_SECS)
                .unwrap_or(fallback.note_duration),
        }
    }
}

/// `~/.config/solfa`, where the config, preferences and log live.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("solfa"))
}

fn user_config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

fn merge_defaults(base: &mut DefaultsConfig, user: DefaultsConfig) {
    if user.international.is_some() {
        base.international = user.international;
    }
    if user.direction.is_some() {
        base.direction = user.direction;
    }
    if user.difficulty.is_some() {
        base.difficulty = user.difficulty;
    }
}

fn merge_audio(base: &mut AudioConfig, user: AudioConfig) {
    if user.voice.is_some() {
        base.voice = user.voice;
    }
    if user.samples_dir.is_some() {
        base.samples_dir = user.samples_dir;
    }
    if user.synth_fallback.is_some() {
        base.synth_fallback = user.synth_fallback;
    }
    if user.note_duration.is_some() {
        base.note_duration = user.note_duration;
    }
}
