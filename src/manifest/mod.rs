//! Cache manifest document and the URI escaping applied to its entries.

mod document;
mod encoding;

pub use document::{MANIFEST_HEADER, ManifestDocument, ManifestSections, NETWORK_WILDCARD};
pub use encoding::{decode_uri, encode_uri};
