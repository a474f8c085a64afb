//! Emission adapter turning a finished build's asset list into a registered manifest.
//!
//! The adapter knows nothing about a concrete pipeline. A host implements [`BuildOutput`]
//! for whatever represents its emission phase and either calls [`ManifestEmitter::emit`]
//! directly or installs the callback returned by [`ManifestEmitter::hook`].

use std::fmt;

use tracing::{debug, info};

use crate::config::PluginConfig;
use crate::manifest::{ManifestDocument, ManifestSections};
use crate::selection::{AssetInclusion, SelectionError, is_hidden_path};

/// A renderable build output registered with the host pipeline.
pub trait EmittedAsset: fmt::Debug {
  /// Full text of the asset.
  fn source(&self) -> String;
  /// Size of [`EmittedAsset::source`] in bytes.
  fn size(&self) -> usize;
}

impl EmittedAsset for ManifestDocument {
  fn source(&self) -> String {
    self.render_document()
  }

  fn size(&self) -> usize {
    self.byte_size()
  }
}

/// The host pipeline's view of one build at its emission point.
pub trait BuildOutput {
  /// Identifier of the build, stable for an unchanged set of outputs.
  fn hash(&self) -> &str;
  /// Names of the finalised output assets, in the order they should be listed.
  fn asset_names(&self) -> Vec<String>;
  /// Register an additional named output.
  fn register_asset(&mut self, name: &str, asset: Box<dyn EmittedAsset>);
}

/// Callback installed at a pipeline's emission point.
pub type EmitHook = Box<dyn FnMut(&mut dyn BuildOutput) -> EmitSummary>;

/// What a single emission pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitSummary {
  /// Name the manifest was registered under.
  pub output: String,
  /// Number of assets listed in the manifest.
  pub listed: usize,
  /// Number of assets left out by the selection rules.
  pub skipped: usize,
  /// Size of the rendered manifest in bytes.
  pub size: usize,
}

/// Builds one [`ManifestDocument`] per build from a [`PluginConfig`].
pub struct ManifestEmitter {
  sections: ManifestSections,
  selection: Box<dyn AssetInclusion>,
  output: String,
  comment: Option<String>,
  public_path: String,
}

impl ManifestEmitter {
  /// Prepare an emitter, compiling the configured asset rules.
  pub fn new(config: &PluginConfig) -> Result<Self, SelectionError> {
    Ok(Self {
      sections: config.sections(),
      selection: Box::new(config.selection()?),
      output: config.output_name().to_string(),
      comment: config.comment.clone(),
      public_path: config.public_path.clone(),
    })
  }

  /// Replace the configured include/exclude rules with a custom filter.
  pub fn with_selection(mut self, selection: impl AssetInclusion + 'static) -> Self {
    self.selection = Box::new(selection);
    self
  }

  /// Name the manifest is registered under.
  pub fn output_name(&self) -> &str {
    &self.output
  }

  /// Build the manifest for the given build without registering it.
  pub fn build_document(&self, build: &dyn BuildOutput) -> (ManifestDocument, usize) {
    let mut document =
      ManifestDocument::new(self.sections.clone(), build.hash(), self.comment.clone());
    let mut skipped = 0;

    for name in build.asset_names() {
      if name == self.output || is_hidden_path(&name) || !self.selection.is_included(&name) {
        debug!(asset = %name, "skipping asset");
        skipped += 1;
        continue;
      }
      document.add_entry(&format!("{}{}", self.public_path, name));
    }

    (document, skipped)
  }

  /// Build the manifest and register it as a new output of the build.
  pub fn emit(&self, build: &mut dyn BuildOutput) -> EmitSummary {
    let (document, skipped) = self.build_document(build);
    let summary = EmitSummary {
      output: self.output.clone(),
      listed: document.entries().len(),
      skipped,
      size: document.byte_size(),
    };

    info!(
      output = %summary.output,
      hash = %document.hash(),
      listed = summary.listed,
      skipped = summary.skipped,
      bytes = summary.size,
      "registered cache manifest"
    );
    build.register_asset(&self.output, Box::new(document));
    summary
  }

  /// Turn the emitter into a callback for a pipeline's emission point.
  pub fn hook(self) -> EmitHook {
    Box::new(move |build: &mut dyn BuildOutput| self.emit(build))
  }
}

impl fmt::Debug for ManifestEmitter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ManifestEmitter")
      .field("sections", &self.sections)
      .field("output", &self.output)
      .field("comment", &self.comment)
      .field("public_path", &self.public_path)
      .finish_non_exhaustive()
  }
}
