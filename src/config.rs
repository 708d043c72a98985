//! On-disk configuration, loaded from the XDG config directory with
//! built-in defaults for anything left unset.
//!
//! Grounded in the same `serde` + `toml` pattern as other window manager
//! configs in the ecosystem: an optionally-present `Config` struct with
//! `Option` fields, defaulted after parsing rather than relying on serde's
//! `default` attribute everywhere, so a half-written config file is still
//! usable.
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_color() -> u32 {
    0x3b4252
}

fn default_border_width() -> i32 {
    2
}

fn default_name_limit() -> usize {
    20
}

fn default_term() -> String {
    "xterm".to_string()
}

fn default_launcher() -> String {
    "rofi -show run".to_string()
}

fn default_lock() -> String {
    "slock".to_string()
}

/// Crate-wide settings, deserialized from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Background and focused-border color, packed as `0xRRGGBB`.
    pub color: u32,
    pub padding_top: i32,
    pub padding_bottom: i32,
    pub border_width: i32,
    /// Rune cap on window names folded into `_NET_DESKTOP_NAMES`.
    pub name_limit: usize,
    /// Commands spawned once at startup.
    pub exec: Vec<String>,
    pub term: String,
    pub launcher: String,
    pub lock: String,
    /// Mirror debug output to stderr via `tracing-subscriber`.
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            color: default_color(),
            padding_top: 0,
            padding_bottom: 0,
            border_width: default_border_width(),
            name_limit: default_name_limit(),
            exec: Vec::new(),
            term: default_term(),
            launcher: default_launcher(),
            lock: default_lock(),
            debug: false,
        }
    }
}

impl Config {
    /// Load from `$XDG_CONFIG_HOME/tricol/config.toml` (falling back to
    /// `~/.config/tricol/config.toml`), returning built-in defaults if the
    /// file does not exist.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::from_path(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| Error::Config(e.to_string()))
    }

    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tricol").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable_without_a_file() {
        let cfg = Config::default();
        assert_eq!(cfg.term, "xterm");
        assert_eq!(cfg.name_limit, 20);
        assert!(!cfg.debug);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults_for_missing_keys() {
        let toml = r#"
            border-width = 4
            debug = true
        "#;
        let cfg: Config = toml::from_str(toml).unwrap();
        assert_eq!(cfg.border_width, 4);
        assert!(cfg.debug);
        assert_eq!(cfg.term, "xterm", "unset keys keep their default");
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let dir = std::env::temp_dir().join("tricol-config-test-invalid.toml");
        std::fs::write(&dir, "this is not valid toml = [").unwrap();
        let err = Config::from_path(&dir).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        let _ = std::fs::remove_file(&dir);
    }
}
