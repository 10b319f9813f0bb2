use directories::ProjectDirs;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::warn;

/// Preview CLI preferences, read from `prefs.toml` in the platform config dir.
#[derive(Deserialize, Default, Debug, PartialEq, Eq)]
pub struct Config {
  /// Default channel tab: `videos`, `streams`, `shorts` or `podcasts`.
  pub tab: Option<String>,
  /// Default number of titles to list.
  pub limit: Option<usize>,
}

impl Config {
  pub fn path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "yt-tab-filter").map(|dirs| dirs.config_dir().join("prefs.toml"))
  }

  pub fn load() -> Self {
    let Some(path) = Self::path() else {
      return Self::default();
    };
    match std::fs::read_to_string(&path) {
      Ok(content) => Self::parse(&content).unwrap_or_else(|e| {
        warn!(path = %path.display(), err = %e, "config: ignoring malformed prefs");
        Self::default()
      }),
      Err(_) => Self::default(),
    }
  }

  fn parse(content: &str) -> Result<Self, toml::de::Error> {
    toml::from_str(content)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_full_prefs() {
    let config = Config::parse("tab = \"streams\"\nlimit = 50\n").unwrap();
    assert_eq!(config, Config { tab: Some("streams".to_string()), limit: Some(50) });
  }

  #[test]
  fn missing_keys_default_to_none() {
    assert_eq!(Config::parse("").unwrap(), Config::default());
  }

  #[test]
  fn wrong_types_are_rejected() {
    assert!(Config::parse("limit = \"lots\"").is_err());
  }
}
