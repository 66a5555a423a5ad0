// src/config.rs

use crate::error::ConfigError;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

// --- Tolerances ---

/// Numeric thresholds used by the cell geometry code.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
  /// Rows at or below this fraction of the longest row's norm are degenerate
  pub min_length_ratio: f64,
  /// |sin γ| at or below this is treated as γ = 0° or 180°
  pub min_sin_gamma: f64,
  /// Radicands within ±slack of zero are rounding noise and clamp to zero
  pub radicand_slack: f64,
  /// Singular when |det| <= ratio · |a||b||c|
  pub singular_volume_ratio: f64,
}

impl Default for Tolerances {
  fn default() -> Self {
    Self {
      min_length_ratio: 1e-12,
      min_sin_gamma: 1e-10,
      radicand_slack: 1e-12,
      singular_volume_ratio: 1e-10,
    }
  }
}

// --- Main Config Struct ---

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
  #[serde(default)]
  pub tolerances: Tolerances,
}

impl Config {
  /// Loads config from standard OS location (e.g., ~/.config/crystal-cell/settings.json).
  /// Falls back to defaults if the file is missing or unreadable.
  pub fn load() -> Self {
    let path = Self::get_path();
    if !path.exists() {
      log::info!("No config found. Using defaults.");
      return Self::default();
    }
    match Self::load_from(&path) {
      Ok(cfg) => {
        log::info!("Config loaded from {:?}", path);
        cfg
      }
      Err(e) => {
        log::warn!("Error reading config {:?}: {}", path, e);
        Self::default()
      }
    }
  }

  pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
  }

  /// Saves config to standard OS location
  pub fn save(&self) -> Result<PathBuf, ConfigError> {
    let path = Self::get_path();
    self.save_to(&path)?;
    log::info!("Config saved to {:?}", path);
    Ok(path)
  }

  pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent)?;
    }
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, self)?;
    Ok(())
  }

  fn get_path() -> PathBuf {
    if let Some(proj) = ProjectDirs::from("org", "crystal-cell", "crystal-cell") {
      proj.config_dir().join("settings.json")
    } else {
      PathBuf::from("settings.json")
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  /// Temp directory removed on drop, so failed asserts don't leak it
  struct ScratchDir(PathBuf);

  impl ScratchDir {
    fn new(name: &str) -> Self {
      let dir = std::env::temp_dir().join(format!("{}-{}", name, std::process::id()));
      let _ = fs::remove_dir_all(&dir);
      Self(dir)
    }
  }

  impl Drop for ScratchDir {
    fn drop(&mut self) {
      let _ = fs::remove_dir_all(&self.0);
    }
  }

  #[test]
  fn test_missing_fields_use_defaults() {
    let cfg: Config = serde_json::from_str("{}").unwrap();
    assert_eq!(cfg, Config::default());

    let cfg: Config = serde_json::from_str(r#"{"tolerances": {"min_sin_gamma": 1e-6}}"#).unwrap();
    assert_eq!(cfg.tolerances.min_sin_gamma, 1e-6);
    assert_eq!(cfg.tolerances.min_length_ratio, Tolerances::default().min_length_ratio);
  }

  #[test]
  fn test_save_and_load_roundtrip() {
    let dir = ScratchDir::new("crystal-cell-cfg");
    let path = dir.0.join("settings.json");

    let mut cfg = Config::default();
    cfg.tolerances.singular_volume_ratio = 1e-8;
    cfg.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, cfg);
  }

  #[test]
  fn test_load_from_bad_json_is_parse_error() {
    let dir = ScratchDir::new("crystal-cell-bad");
    fs::create_dir_all(&dir.0).unwrap();
    let path = dir.0.join("settings.json");
    fs::write(&path, "not json").unwrap();

    assert!(matches!(Config::load_from(&path), Err(ConfigError::Parse(_))));
  }

  #[test]
  fn test_scratch_dir_removed_on_drop() {
    let path = {
      let dir = ScratchDir::new("crystal-cell-drop");
      fs::create_dir_all(&dir.0).unwrap();
      assert!(dir.0.exists());
      dir.0.clone()
    };
    assert!(!path.exists());
  }
}
