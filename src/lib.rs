#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod config;
pub mod emitter;
pub mod manifest;
pub mod output;
pub mod selection;

pub use config::{ConfigOverrides, PluginConfig};
pub use emitter::{BuildOutput, EmitHook, EmitSummary, EmittedAsset, ManifestEmitter};
pub use manifest::{ManifestDocument, ManifestSections};
pub use output::OutputDirectory;
pub use selection::{AssetInclusion, AssetSelection};
