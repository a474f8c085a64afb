//! URI escaping applied to asset paths before they are listed in a manifest.

use std::borrow::Cow;
use std::str::Utf8Error;

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

/// Characters escaped by the browser `encodeURI` routine.
///
/// Reserved URI delimiters (`/`, `?`, `#`, `:` ...) are left untouched so that a full path,
/// query string included, keeps its meaning once listed. Non-ASCII bytes are always escaped.
const URI: &AsciiSet = &CONTROLS
  .add(b' ')
  .add(b'"')
  .add(b'%')
  .add(b'<')
  .add(b'>')
  .add(b'[')
  .add(b'\\')
  .add(b']')
  .add(b'^')
  .add(b'`')
  .add(b'{')
  .add(b'|')
  .add(b'}');

/// Percent-encode a path for inclusion in the manifest text.
pub fn encode_uri(path: &str) -> String {
  utf8_percent_encode(path, URI).to_string()
}

/// Reverse [`encode_uri`], recovering the original path.
pub fn decode_uri(encoded: &str) -> Result<Cow<'_, str>, Utf8Error> {
  percent_decode_str(encoded).decode_utf8()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn escapes_spaces() {
    assert_eq!(encode_uri("a b.png"), "a%20b.png");
  }

  #[test]
  fn keeps_reserved_delimiters() {
    let path = "/static/app.js?v=1&x=a+b#top;c,d:e@f$g";
    assert_eq!(encode_uri(path), path);
    assert_eq!(encode_uri("-_.!~*'()"), "-_.!~*'()");
  }

  #[test]
  fn escapes_unsafe_ascii() {
    assert_eq!(encode_uri("100%.css"), "100%25.css");
    assert_eq!(encode_uri("a<b>\"c\""), "a%3Cb%3E%22c%22");
    assert_eq!(encode_uri("[x]{y}|z^`\\"), "%5Bx%5D%7By%7D%7Cz%5E%60%5C");
    assert_eq!(encode_uri("tab\there"), "tab%09here");
  }

  #[test]
  fn escapes_multi_byte_characters_as_utf8() {
    assert_eq!(encode_uri("café.png"), "caf%C3%A9.png");
    assert_eq!(encode_uri("图.svg"), "%E5%9B%BE.svg");
  }

  #[test]
  fn decoding_recovers_original_path() {
    for path in ["a b.png", "images/100% done.jpg", "ünï côdé/{x}.js", "plain.txt"] {
      let encoded = encode_uri(path);
      assert_eq!(decode_uri(&encoded).unwrap(), path);
    }
  }
}
