//! Command line entry point generating a cache manifest for a built output directory.

use std::path::PathBuf;

use anyhow::{Context, Result};
use appcache_manifest::{
  BuildOutput, ConfigOverrides, ManifestEmitter, OutputDirectory, PluginConfig,
};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Generate an offline application cache manifest for a build output directory.
#[derive(Debug, Parser)]
#[command(name = "appcache-manifest", version, about)]
struct Cli {
  /// Directory containing the emitted build assets.
  output_dir: PathBuf,

  /// Configuration file (JSON or YAML). Defaults to `appcache.config.*` in the current directory.
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Manifest file name, relative to the output directory.
  #[arg(short, long)]
  output: Option<String>,

  /// Prefix prepended to every listed asset path.
  #[arg(long)]
  public_path: Option<String>,

  /// Build hash to embed instead of the content digest.
  #[arg(long)]
  hash: Option<String>,

  /// Additional exclude rules (`/regex/flags`, or a pattern matching the whole name).
  #[arg(short, long = "exclude")]
  exclude: Vec<String>,

  /// Comment written below the build hash.
  #[arg(long)]
  comment: Option<String>,

  /// Print the manifest instead of writing it.
  #[arg(long)]
  dry_run: bool,

  /// Enable verbose logging.
  #[arg(short, long)]
  verbose: bool,
}

impl Cli {
  fn load_config(&self) -> Result<PluginConfig> {
    let mut config = match &self.config {
      Some(path) => PluginConfig::from_path(path)?,
      None => {
        let cwd = std::env::current_dir().context("failed to resolve current directory")?;
        PluginConfig::discover(&cwd)?
      }
    };
    config.apply_overrides(self.overrides());
    Ok(config)
  }

  fn overrides(&self) -> ConfigOverrides {
    ConfigOverrides {
      output: self.output.clone(),
      public_path: self.public_path.clone(),
      comment: self.comment.clone(),
      exclude: self.exclude.clone(),
    }
  }
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let log_level = if cli.verbose { "debug" } else { "info" };
  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| log_level.into()))
    .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
    .init();

  let config = cli.load_config()?;
  let emitter = ManifestEmitter::new(&config)?;

  let mut build = OutputDirectory::scan(&cli.output_dir, emitter.output_name())?;
  if let Some(hash) = &cli.hash {
    build = build.with_hash(hash.clone());
  }

  let summary = emitter.emit(&mut build);

  if cli.dry_run {
    let manifest = build
      .registered(&summary.output)
      .with_context(|| format!("manifest {} was not registered", summary.output))?;
    print!("{}", manifest.source());
    return Ok(());
  }

  for path in build.write()? {
    info!(path = %path.display(), hash = %build.hash(), "wrote manifest");
  }
  Ok(())
}
