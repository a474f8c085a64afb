use std::fs;
use std::path::Path;

use appcache_manifest::{BuildOutput, ManifestEmitter, OutputDirectory, PluginConfig};
use tempfile::tempdir;

fn write(root: &Path, name: &str, contents: &str) {
  let path = root.join(name);
  fs::create_dir_all(path.parent().unwrap()).unwrap();
  fs::write(path, contents).unwrap();
}

fn populate(root: &Path) {
  write(root, "index.html", "<!doctype html>");
  write(root, "assets/app.js", "console.log(1)");
  write(root, "assets/app.js.map", "{}");
  write(root, "img/hero image.png", "png");
  write(root, ".DS_Store", "");
}

fn config() -> PluginConfig {
  let config_dir = tempdir().unwrap();
  fs::write(
    config_dir.path().join("appcache.config.json"),
    r#"{
      "cache": ["https://cdn.example.com/font.woff2"],
      "fallback": ["/ /offline.html"],
      "settings": ["prefer-online"],
      "exclude": ["/\\.map$/"],
      "publicPath": "/static/",
      "comment": "nightly"
    }"#,
  )
  .unwrap();
  PluginConfig::discover(config_dir.path()).unwrap()
}

#[test]
fn writes_manifest_for_output_directory() {
  let dist = tempdir().unwrap();
  populate(dist.path());

  let emitter = ManifestEmitter::new(&config()).unwrap();
  let mut build = OutputDirectory::scan(dist.path(), emitter.output_name())
    .unwrap()
    .with_hash("0123456789abcdef0123");
  let summary = emitter.emit(&mut build);
  let written = build.write().unwrap();

  assert_eq!(summary.listed, 3);
  assert_eq!(summary.skipped, 2);
  assert_eq!(written, vec![dist.path().join("manifest.appcache")]);

  let manifest = fs::read_to_string(&written[0]).unwrap();
  assert_eq!(
    manifest,
    "CACHE MANIFEST\n\
     # 0123456789abcdef0123\n\
     # nightly\n\
     \n\
     /static/assets/app.js\n\
     /static/img/hero%20image.png\n\
     /static/index.html\n\
     \n\
     CACHE:\n\
     https://cdn.example.com/font.woff2\n\
     \n\
     NETWORK:\n\
     *\n\
     \n\
     FALLBACK:\n\
     / /offline.html\n\
     \n\
     SETTINGS:\n\
     prefer-online\n"
  );
  assert_eq!(summary.size, manifest.len());
}

#[test]
fn regenerating_unchanged_output_is_byte_identical() {
  let dist = tempdir().unwrap();
  populate(dist.path());
  let emitter = ManifestEmitter::new(&PluginConfig::default()).unwrap();

  let mut first = OutputDirectory::scan(dist.path(), emitter.output_name()).unwrap();
  emitter.emit(&mut first);
  let path = first.write().unwrap().remove(0);
  let first_text = fs::read_to_string(&path).unwrap();

  let mut second = OutputDirectory::scan(dist.path(), emitter.output_name()).unwrap();
  emitter.emit(&mut second);
  second.write().unwrap();
  assert_eq!(first.hash(), second.hash());
  assert_eq!(fs::read_to_string(&path).unwrap(), first_text);

  write(dist.path(), "assets/app.js", "console.log(2)");
  let mut third = OutputDirectory::scan(dist.path(), emitter.output_name()).unwrap();
  emitter.emit(&mut third);
  third.write().unwrap();
  assert_ne!(fs::read_to_string(&path).unwrap(), first_text);
}
