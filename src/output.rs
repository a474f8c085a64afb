//! A [`BuildOutput`] backed by an already written build directory.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::emitter::{BuildOutput, EmittedAsset};

/// Number of hex characters kept from the content digest.
pub const HASH_LENGTH: usize = 20;

/// A listed output file: its manifest name and where it lives on disk.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct OutputFile {
  name: String,
  path: PathBuf,
}

/// Build output directory scanned from disk.
#[derive(Debug)]
pub struct OutputDirectory {
  root: PathBuf,
  files: Vec<OutputFile>,
  hash: String,
  registered: BTreeMap<String, Box<dyn EmittedAsset>>,
}

impl OutputDirectory {
  /// Scan `root` for output files.
  ///
  /// A file already named `manifest_name` is a leftover from a previous run: it is neither
  /// listed nor hashed, so regenerating the manifest for unchanged outputs is stable.
  /// Symlinked files are followed. Names that are not valid UTF-8 cannot be written into the
  /// manifest and are skipped with a warning.
  pub fn scan(root: impl Into<PathBuf>, manifest_name: &str) -> Result<Self> {
    let root = root.into();
    let mut files = Vec::new();
    collect_files(&root, Path::new(""), &mut files)
      .with_context(|| format!("failed to scan {}", root.display()))?;
    files.retain(|file| file.name != manifest_name);
    files.sort();

    let hash = hash_files(&files)?;
    debug!(root = %root.display(), files = files.len(), %hash, "scanned build output");

    Ok(Self {
      root,
      files,
      hash,
      registered: BTreeMap::new(),
    })
  }

  /// Replace the content-derived build hash.
  pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
    self.hash = hash.into();
    self
  }

  /// Look up an asset registered during emission.
  pub fn registered(&self, name: &str) -> Option<&dyn EmittedAsset> {
    self.registered.get(name).map(|asset| asset.as_ref())
  }

  /// Write every registered asset below the output root.
  pub fn write(&self) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(self.registered.len());
    for (name, asset) in &self.registered {
      let target = self.root.join(name);
      if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
          .with_context(|| format!("failed to create {}", parent.display()))?;
      }
      fs::write(&target, asset.source())
        .with_context(|| format!("failed to write {}", target.display()))?;
      written.push(target);
    }
    Ok(written)
  }
}

impl BuildOutput for OutputDirectory {
  fn hash(&self) -> &str {
    &self.hash
  }

  fn asset_names(&self) -> Vec<String> {
    self.files.iter().map(|file| file.name.clone()).collect()
  }

  fn register_asset(&mut self, name: &str, asset: Box<dyn EmittedAsset>) {
    self.registered.insert(name.to_string(), asset);
  }
}

fn collect_files(root: &Path, relative: &Path, files: &mut Vec<OutputFile>) -> std::io::Result<()> {
  let current = root.join(relative);
  for entry in fs::read_dir(&current)? {
    let entry = entry?;
    let next_relative = if relative.as_os_str().is_empty() {
      PathBuf::from(entry.file_name())
    } else {
      relative.join(entry.file_name())
    };
    let path = entry.path();

    let mut file_type = entry.file_type()?;
    if file_type.is_symlink() {
      match fs::metadata(&path) {
        Ok(target) if target.is_file() => file_type = target.file_type(),
        Ok(_) => {
          debug!(path = %path.display(), "skipping symlink that does not point to a file");
          continue;
        }
        Err(err) => {
          debug!(path = %path.display(), error = %err, "skipping dangling symlink");
          continue;
        }
      }
    }

    if file_type.is_dir() {
      collect_files(root, &next_relative, files)?;
    } else if file_type.is_file() {
      match next_relative.to_str() {
        Some(name) => files.push(OutputFile {
          name: name.replace('\\', "/"),
          path,
        }),
        None => warn!(path = %path.display(), "skipping output with a non UTF-8 name"),
      }
    }
  }
  Ok(())
}

/// Digest every file name and its contents, in listing order.
fn hash_files(files: &[OutputFile]) -> Result<String> {
  let mut hasher = blake3::Hasher::new();
  for file in files {
    let contents =
      fs::read(&file.path).with_context(|| format!("failed to read {}", file.path.display()))?;
    hasher.update(file.name.as_bytes());
    hasher.update(&[0]);
    hasher.update(&(contents.len() as u64).to_le_bytes());
    hasher.update(&contents);
  }
  let digest = hasher.finalize().to_hex();
  Ok(digest.as_str()[..HASH_LENGTH].to_string())
}
