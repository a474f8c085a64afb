//! In-memory manifest accumulated while a build emits its assets.

use std::fmt;

use crate::manifest::encoding::encode_uri;

/// First line of every application cache manifest.
pub const MANIFEST_HEADER: &str = "CACHE MANIFEST";

/// Network whitelist entry allowing every request through.
pub const NETWORK_WILDCARD: &str = "*";

/// Static section lists fixed for the lifetime of a [`ManifestDocument`].
///
/// `None` and an empty list both render as an absent section. The default value leaves every
/// section unset; [`ManifestSections::new`] applies the wildcard network default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestSections {
  /// Paths cached unconditionally (`CACHE:`).
  pub cache: Option<Vec<String>>,
  /// Patterns always fetched from the network (`NETWORK:`).
  pub network: Option<Vec<String>>,
  /// Pre-formatted `pattern fallback` pairs (`FALLBACK:`).
  pub fallback: Option<Vec<String>>,
  /// Directive flags such as `prefer-online` (`SETTINGS:`).
  pub settings: Option<Vec<String>>,
}

impl ManifestSections {
  /// Build sections from optional lists, defaulting the network whitelist to `*`.
  pub fn new(
    cache: Option<Vec<String>>,
    network: Option<Vec<String>>,
    fallback: Option<Vec<String>>,
    settings: Option<Vec<String>>,
  ) -> Self {
    Self {
      cache,
      network: Some(network.unwrap_or_else(|| vec![NETWORK_WILDCARD.to_string()])),
      fallback,
      settings,
    }
  }

  /// Replace the `CACHE:` list.
  pub fn with_cache<I, S>(mut self, items: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.cache = Some(collect(items));
    self
  }

  /// Replace the `NETWORK:` list.
  pub fn with_network<I, S>(mut self, items: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.network = Some(collect(items));
    self
  }

  /// Replace the `FALLBACK:` list.
  pub fn with_fallback<I, S>(mut self, items: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.fallback = Some(collect(items));
    self
  }

  /// Replace the `SETTINGS:` list.
  pub fn with_settings<I, S>(mut self, items: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.settings = Some(collect(items));
    self
  }
}

fn collect<I, S>(items: I) -> Vec<String>
where
  I: IntoIterator<Item = S>,
  S: Into<String>,
{
  items.into_iter().map(Into::into).collect()
}

/// A single build's manifest: static sections, build hash and the emitted asset entries.
///
/// Sections are normalised when the document is created so rendering never has to reason
/// about unset values. Entries are only ever appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestDocument {
  cache: Vec<String>,
  network: Vec<String>,
  fallback: Vec<String>,
  settings: Vec<String>,
  hash: String,
  comment: Option<String>,
  entries: Vec<String>,
}

impl ManifestDocument {
  /// Create an empty document for the build identified by `hash`.
  ///
  /// Blank comments are treated as absent.
  pub fn new(sections: ManifestSections, hash: impl Into<String>, comment: Option<String>) -> Self {
    Self {
      cache: sections.cache.unwrap_or_default(),
      network: sections.network.unwrap_or_default(),
      fallback: sections.fallback.unwrap_or_default(),
      settings: sections.settings.unwrap_or_default(),
      hash: hash.into(),
      comment: comment.filter(|value| !value.trim().is_empty()),
      entries: Vec::new(),
    }
  }

  /// Append an asset path, percent-encoding it first.
  ///
  /// The caller is expected to have applied any filtering and prefixing already; duplicates
  /// are kept.
  pub fn add_entry(&mut self, path: &str) {
    self.entries.push(encode_uri(path));
  }

  /// Encoded entries in insertion order.
  pub fn entries(&self) -> &[String] {
    &self.entries
  }

  /// Build hash embedded in the document.
  pub fn hash(&self) -> &str {
    &self.hash
  }

  /// Render the manifest body: entries, then the `CACHE`, `NETWORK`, `FALLBACK` and
  /// `SETTINGS` sections, separated by a blank line. Empty sections are skipped entirely.
  pub fn render_body(&self) -> String {
    let sections: [(Option<&str>, &[String]); 5] = [
      (None, &self.entries),
      (Some("CACHE:"), &self.cache),
      (Some("NETWORK:"), &self.network),
      (Some("FALLBACK:"), &self.fallback),
      (Some("SETTINGS:"), &self.settings),
    ];

    sections
      .iter()
      .filter(|(_, items)| !items.is_empty())
      .map(|(header, items)| render_section(*header, items))
      .collect::<Vec<_>>()
      .join("\n")
  }

  /// Render the complete manifest text.
  pub fn render_document(&self) -> String {
    let mut lines = vec![MANIFEST_HEADER.to_string(), format!("# {}", self.hash)];
    if let Some(comment) = &self.comment {
      lines.extend(comment.lines().map(|line| format!("# {line}")));
    }
    lines.push(String::new());
    lines.push(self.render_body());
    lines.join("\n")
  }

  /// UTF-8 byte length of [`ManifestDocument::render_document`].
  pub fn byte_size(&self) -> usize {
    self.render_document().len()
  }
}

fn render_section(header: Option<&str>, items: &[String]) -> String {
  match header {
    Some(header) => format!("{header}\n{}\n", items.join("\n")),
    None => format!("{}\n", items.join("\n")),
  }
}

impl fmt::Display for ManifestDocument {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.render_document())
  }
}
