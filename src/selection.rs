//! Helpers used to filter which emitted assets are listed in the manifest.

use regex::{Regex, RegexBuilder};
use thiserror::Error;

/// Trait describing selection filters for emitted build assets.
pub trait AssetInclusion {
  /// Returns `true` when the asset should be listed in the manifest.
  fn is_included(&self, asset_name: &str) -> bool;
}

/// Errors that can occur while compiling selection rules.
#[derive(Debug, Error)]
pub enum SelectionError {
  /// A rule was not a valid regular expression.
  #[error("invalid asset pattern `{pattern}`: {source}")]
  InvalidPattern {
    /// Rule as written in the configuration.
    pattern: String,
    /// Underlying regex compilation error.
    #[source]
    source: regex::Error,
  },
  /// A `/.../flags` rule carried a flag that has no meaning for asset matching.
  #[error("unsupported flag `{flag}` in asset pattern `{pattern}`")]
  UnsupportedFlag {
    /// Rule as written in the configuration.
    pattern: String,
    /// The offending flag.
    flag: char,
  },
}

/// A single include or exclude rule.
///
/// Rules written as `/body/flags` are regular expressions searched anywhere in the asset name.
/// Any other rule is a regular expression that must match the whole name.
#[derive(Debug, Clone)]
pub struct AssetPattern {
  regex: Regex,
}

impl AssetPattern {
  /// Compile a rule from its configuration form.
  pub fn parse(rule: &str) -> Result<Self, SelectionError> {
    let compiled = match split_regex_literal(rule) {
      Some((body, flags)) => {
        let mut builder = RegexBuilder::new(body);
        for flag in flags.chars() {
          match flag {
            'i' => builder.case_insensitive(true),
            'm' => builder.multi_line(true),
            's' => builder.dot_matches_new_line(true),
            // Unicode matching is always on.
            'u' => builder.unicode(true),
            flag => {
              return Err(SelectionError::UnsupportedFlag {
                pattern: rule.to_string(),
                flag,
              });
            }
          };
        }
        builder.build()
      }
      None => Regex::new(&format!("^(?:{rule})$")),
    };

    let regex = compiled.map_err(|source| SelectionError::InvalidPattern {
      pattern: rule.to_string(),
      source,
    })?;
    Ok(Self { regex })
  }

  /// Whether the rule matches the asset name.
  pub fn matches(&self, asset_name: &str) -> bool {
    self.regex.is_match(asset_name)
  }
}

/// Flag letters a JavaScript regular expression literal may carry.
const LITERAL_FLAGS: &str = "dgimsuvy";

/// Split `/body/flags` into its parts, returning `None` for plain rules.
///
/// Only a suffix made of regular expression flag letters counts as flags, so
/// `/static/app.js` and `/assets/app` stay plain rules.
fn split_regex_literal(rule: &str) -> Option<(&str, &str)> {
  let rest = rule.strip_prefix('/')?;
  let end = rest.rfind('/')?;
  let (body, flags) = (&rest[..end], &rest[end + 1..]);
  if body.is_empty() || !flags.chars().all(|flag| LITERAL_FLAGS.contains(flag)) {
    return None;
  }
  Some((body, flags))
}

/// Selection helper deciding which emitted assets end up in the manifest.
#[derive(Debug, Clone, Default)]
pub struct AssetSelection {
  include: Option<Vec<AssetPattern>>,
  exclude: Vec<AssetPattern>,
}

impl AssetSelection {
  /// Compile include and exclude rules.
  ///
  /// An empty include list is treated the same as no include list.
  pub fn from_rules<I, E>(include: Option<I>, exclude: E) -> Result<Self, SelectionError>
  where
    I: IntoIterator,
    I::Item: AsRef<str>,
    E: IntoIterator,
    E::Item: AsRef<str>,
  {
    let include = include
      .map(compile_rules)
      .transpose()?
      .filter(|rules| !rules.is_empty());
    let exclude = compile_rules(exclude)?;
    Ok(Self { include, exclude })
  }

  /// Determine whether an asset should be listed.
  pub fn is_included(&self, asset_name: &str) -> bool {
    if self.exclude.iter().any(|pattern| pattern.matches(asset_name)) {
      return false;
    }

    match &self.include {
      Some(include) => include.iter().any(|pattern| pattern.matches(asset_name)),
      None => true,
    }
  }

  #[cfg(test)]
  fn is_unfiltered(&self) -> bool {
    self.include.is_none() && self.exclude.is_empty()
  }
}

impl AssetInclusion for AssetSelection {
  fn is_included(&self, asset_name: &str) -> bool {
    AssetSelection::is_included(self, asset_name)
  }
}

fn compile_rules<I>(rules: I) -> Result<Vec<AssetPattern>, SelectionError>
where
  I: IntoIterator,
  I::Item: AsRef<str>,
{
  rules
    .into_iter()
    .map(|rule| rule.as_ref().trim().to_string())
    .filter(|rule| !rule.is_empty())
    .map(|rule| AssetPattern::parse(&rule))
    .collect()
}

/// Whether any segment of the path is a dotfile or dot-directory.
pub fn is_hidden_path(asset_name: &str) -> bool {
  asset_name
    .split(['/', '\\'])
    .any(|segment| segment.starts_with('.'))
}
