use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub telegram: TelegramConfig,
    #[serde(default = "default_notes_config")]
    pub notes: NotesConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    /// The only user whose messages are archived
    pub authorized_user_id: u64,
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotesConfig {
    #[serde(default = "default_notes_dir")]
    pub directory: PathBuf,
}

fn default_poll_timeout_secs() -> u32 {
    60
}

fn default_notes_dir() -> PathBuf {
    PathBuf::from("notes")
}

fn default_notes_config() -> NotesConfig {
    NotesConfig {
        directory: default_notes_dir(),
    }
}

impl Config {
    /// Load the configuration and make sure the notes directory exists.
    ///
    /// `.json` files are read in the legacy `{"token", "user_id"}` layout,
    /// anything else as TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = if path.extension().and_then(|e| e.to_str()) == Some("json") {
            Self::from_legacy_json(&content)?
        } else {
            Self::from_toml(&content)?
        };

        if !config.notes.directory.exists() {
            std::fs::create_dir_all(&config.notes.directory).with_context(|| {
                format!(
                    "Failed to create notes directory: {}",
                    config.notes.directory.display()
                )
            })?;
        }

        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    pub fn from_legacy_json(content: &str) -> Result<Self> {
        #[derive(Deserialize)]
        struct LegacyConfig {
            token: String,
            user_id: u64,
            #[serde(default)]
            notes_dir: Option<PathBuf>,
        }

        let legacy: LegacyConfig =
            serde_json::from_str(content).context("Failed to parse legacy JSON config")?;

        Ok(Config {
            telegram: TelegramConfig {
                bot_token: legacy.token,
                authorized_user_id: legacy.user_id,
                poll_timeout_secs: default_poll_timeout_secs(),
            },
            notes: NotesConfig {
                directory: legacy.notes_dir.unwrap_or_else(default_notes_dir),
            },
        })
    }
}
