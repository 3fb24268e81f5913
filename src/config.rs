use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::engine::timer::TimerSettings;
use crate::session::SessionSettings;

const MIN_TIMER_SECS: u32 = 5;
const MAX_TIMER_SECS: u32 = 300;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Question file to use instead of the bundled one.
    #[serde(default)]
    pub question_bank: Option<PathBuf>,
    #[serde(default = "default_timer_duration_secs")]
    pub timer_duration_secs: u32,
    #[serde(default = "default_warning_threshold_secs")]
    pub warning_threshold_secs: u32,
    #[serde(default = "default_critical_threshold_secs")]
    pub critical_threshold_secs: u32,
    #[serde(default = "default_spin_duration_ms")]
    pub spin_duration_ms: u64,
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    #[serde(default = "default_reveal_delay_ms")]
    pub reveal_delay_ms: u64,
    #[serde(default = "default_celebration_delay_ms")]
    pub celebration_delay_ms: u64,
    #[serde(default = "default_celebration_display_ms")]
    pub celebration_display_ms: u64,
    #[serde(default = "default_sound_enabled")]
    pub sound_enabled: bool,
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_password")]
    pub password: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_timer_duration_secs() -> u32 {
    30
}
fn default_warning_threshold_secs() -> u32 {
    10
}
fn default_critical_threshold_secs() -> u32 {
    5
}
fn default_spin_duration_ms() -> u64 {
    4000
}
fn default_settle_delay_ms() -> u64 {
    500
}
fn default_reveal_delay_ms() -> u64 {
    2000
}
fn default_celebration_delay_ms() -> u64 {
    1000
}
fn default_celebration_display_ms() -> u64 {
    2500
}
fn default_sound_enabled() -> bool {
    false
}
fn default_username() -> String {
    "admin".to_string()
}
fn default_password() -> String {
    "admin123".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            question_bank: None,
            timer_duration_secs: default_timer_duration_secs(),
            warning_threshold_secs: default_warning_threshold_secs(),
            critical_threshold_secs: default_critical_threshold_secs(),
            spin_duration_ms: default_spin_duration_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            reveal_delay_ms: default_reveal_delay_ms(),
            celebration_delay_ms: default_celebration_delay_ms(),
            celebration_display_ms: default_celebration_display_ms(),
            sound_enabled: default_sound_enabled(),
            username: default_username(),
            password: default_password(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.normalize();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quizwheel")
            .join("config.toml")
    }

    /// Clamp values a hand-edited file may have gotten wrong. Thresholds must
    /// sit below the duration and critical must not exceed warning.
    pub fn normalize(&mut self) {
        self.timer_duration_secs = self
            .timer_duration_secs
            .clamp(MIN_TIMER_SECS, MAX_TIMER_SECS);
        if self.warning_threshold_secs >= self.timer_duration_secs {
            self.warning_threshold_secs = self.timer_duration_secs - 1;
        }
        if self.critical_threshold_secs > self.warning_threshold_secs {
            self.critical_threshold_secs = self.warning_threshold_secs;
        }
        if self.log_level.parse::<log::LevelFilter>().is_err() {
            self.log_level = default_log_level();
        }
    }

    pub fn timer_settings(&self) -> TimerSettings {
        TimerSettings {
            duration_secs: self.timer_duration_secs,
            warning_secs: self.warning_threshold_secs,
            critical_secs: self.critical_threshold_secs,
        }
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            timer: self.timer_settings(),
            spin_duration: Duration::from_millis(self.spin_duration_ms),
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            reveal_delay: Duration::from_millis(self.reveal_delay_ms),
            celebration_delay: Duration::from_millis(self.celebration_delay_ms),
        }
    }

    pub fn celebration_display(&self) -> Duration {
        Duration::from_millis(self.celebration_display_ms)
    }

    pub fn log_level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.timer_duration_secs, 30);
        assert_eq!(config.warning_threshold_secs, 10);
        assert_eq!(config.critical_threshold_secs, 5);
        assert_eq!(config.spin_duration_ms, 4000);
        assert!(!config.sound_enabled);
        assert!(config.question_bank.is_none());
        assert_eq!(config.session_settings(), SessionSettings::default());
    }

    #[test]
    fn test_config_partial_file_keeps_other_defaults() {
        let toml_str = r#"
theme = "gruvbox-dark"
timer_duration_secs = 45
sound_enabled = true
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.theme, "gruvbox-dark");
        assert_eq!(config.timer_duration_secs, 45);
        assert!(config.sound_enabled);
        assert_eq!(config.reveal_delay_ms, 2000);
        assert_eq!(config.username, "admin");
    }

    #[test]
    fn test_normalize_clamps_duration_and_thresholds() {
        let mut config = Config {
            timer_duration_secs: 2,
            warning_threshold_secs: 10,
            critical_threshold_secs: 8,
            log_level: "chatty".to_string(),
            ..Config::default()
        };
        config.normalize();
        assert_eq!(config.timer_duration_secs, 5);
        assert_eq!(config.warning_threshold_secs, 4);
        assert_eq!(config.critical_threshold_secs, 4);
        assert_eq!(config.log_level, "info");

        config.timer_duration_secs = 10_000;
        config.normalize();
        assert_eq!(config.timer_duration_secs, 300);
    }

    #[test]
    fn test_save_and_load_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config {
            timer_duration_secs: 20,
            question_bank: Some(PathBuf::from("/tmp/questions.json")),
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.timer_duration_secs, 20);
        assert_eq!(
            loaded.question_bank.as_deref(),
            Some(Path::new("/tmp/questions.json"))
        );
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.timer_duration_secs, 30);
        assert_eq!(config.log_level_filter(), log::LevelFilter::Info);
    }
}
