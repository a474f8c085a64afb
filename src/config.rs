//! Plugin configuration describing the manifest sections and asset filtering.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::manifest::ManifestSections;
use crate::selection::{AssetSelection, SelectionError};

/// Default manifest file name registered in the build output.
pub const DEFAULT_OUTPUT: &str = "manifest.appcache";

const CONFIG_CANDIDATES: [&str; 3] = [
  "appcache.config.json",
  "appcache.config.yaml",
  "appcache.config.yml",
];

/// Errors raised while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// Failed to read the configuration file from disk.
  #[error("failed to read {}: {source}", .path.display())]
  Io {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    #[source]
    source: std::io::Error,
  },
  /// Failed to parse a JSON configuration file.
  #[error("failed to parse {}: {source}", .path.display())]
  Json {
    /// Path that caused the error.
    path: PathBuf,
    /// Source parse error.
    #[source]
    source: serde_json::Error,
  },
  /// Failed to parse a YAML configuration file.
  #[error("failed to parse {}: {source}", .path.display())]
  Yaml {
    /// Path that caused the error.
    path: PathBuf,
    /// Source parse error.
    #[source]
    source: serde_yaml::Error,
  },
}

/// Options controlling what goes into the manifest and where it is registered.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PluginConfig {
  /// Entries for the `CACHE:` section.
  pub cache: Option<Vec<String>>,
  /// Entries for the `NETWORK:` section, `*` when unset.
  pub network: Option<Vec<String>>,
  /// Entries for the `FALLBACK:` section.
  pub fallback: Option<Vec<String>>,
  /// Entries for the `SETTINGS:` section.
  pub settings: Option<Vec<String>>,
  /// Asset rules that keep matching assets out of the manifest.
  pub exclude: Vec<String>,
  /// When set, only assets matching one of these rules are listed.
  pub include: Option<Vec<String>>,
  /// Output name of the manifest asset.
  pub output: String,
  /// Free-text comment written below the build hash.
  pub comment: Option<String>,
  /// Prefix prepended to every listed asset path.
  pub public_path: String,
}

impl Default for PluginConfig {
  fn default() -> Self {
    Self {
      cache: None,
      network: None,
      fallback: None,
      settings: None,
      exclude: Vec::new(),
      include: None,
      output: DEFAULT_OUTPUT.into(),
      comment: None,
      public_path: String::new(),
    }
  }
}

/// Values supplied on the command line that take precedence over the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
  /// Replaces [`PluginConfig::output`].
  pub output: Option<String>,
  /// Replaces [`PluginConfig::public_path`].
  pub public_path: Option<String>,
  /// Replaces [`PluginConfig::comment`].
  pub comment: Option<String>,
  /// Appended to [`PluginConfig::exclude`].
  pub exclude: Vec<String>,
}

impl PluginConfig {
  /// Attempt to load configuration from the provided directory.
  ///
  /// The first existing candidate file wins. When none exists we fall back to defaults; a file
  /// that exists but cannot be parsed is reported.
  pub fn discover(dir: &Path) -> Result<Self, ConfigError> {
    match CONFIG_CANDIDATES
      .iter()
      .map(|name| dir.join(name))
      .find(|candidate| candidate.is_file())
    {
      Some(path) => Self::from_path(&path),
      None => Ok(Self::default()),
    }
  }

  /// Read configuration from a specific JSON or YAML file, chosen by extension.
  pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
      path: path.to_path_buf(),
      source,
    })?;

    let is_yaml = path
      .extension()
      .and_then(|ext| ext.to_str())
      .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    if is_yaml {
      serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
        path: path.to_path_buf(),
        source,
      })
    } else {
      serde_json::from_str(&content).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
      })
    }
  }

  /// Apply command line overrides. Scalar values replace the file's; exclude rules are added
  /// to the configured ones.
  pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
    if let Some(output) = overrides.output {
      self.output = output;
    }
    if let Some(public_path) = overrides.public_path {
      self.public_path = public_path;
    }
    if let Some(comment) = overrides.comment {
      self.comment = Some(comment);
    }
    self.exclude.extend(overrides.exclude);
  }

  /// Static manifest sections with the network default applied.
  pub fn sections(&self) -> ManifestSections {
    ManifestSections::new(
      self.cache.clone(),
      self.network.clone(),
      self.fallback.clone(),
      self.settings.clone(),
    )
  }

  /// Compile the include and exclude rules.
  pub fn selection(&self) -> Result<AssetSelection, SelectionError> {
    AssetSelection::from_rules(self.include.as_deref(), &self.exclude)
  }

  /// Output name, falling back to [`DEFAULT_OUTPUT`] when configured blank.
  pub fn output_name(&self) -> &str {
    let trimmed = self.output.trim();
    if trimmed.is_empty() {
      DEFAULT_OUTPUT
    } else {
      trimmed
    }
  }
}
