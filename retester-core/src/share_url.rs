//! Canonical share-URL codec for a test case.
//!
//! A test case is shareable as `/{pattern}/{text}/{options}`, where pattern
//! and text are URL-safe base64 (no padding) over their UTF-8 bytes and
//! options is the decimal bitmask. Base64 keeps arbitrary Unicode text,
//! including `/`, safe inside a path segment. Decoding is tolerant: a
//! malformed segment reads as an empty string, a missing or non-numeric
//! mask as zero.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use retester_common::OptionCatalog;

use crate::ports::UrlParams;
use crate::test_case::TestCase;

/// Encode a test case into its canonical path.
pub fn to_url(case: &TestCase, catalog: &OptionCatalog) -> String {
    let pattern = URL_SAFE_NO_PAD.encode(case.pattern.as_bytes());
    let text = URL_SAFE_NO_PAD.encode(case.text.as_bytes());
    let options = catalog.encode(&case.options);
    format!("/{pattern}/{text}/{options}")
}

/// Decode location parameters into a test case. Never fails; the replace
/// template is not part of the URL and comes back `None`.
pub fn from_params(params: &UrlParams, catalog: &OptionCatalog) -> TestCase {
    let mask = params
        .options
        .as_deref()
        .and_then(|raw| raw.parse::<u32>().ok())
        .unwrap_or(0);

    TestCase {
        pattern: decode_segment(params.pattern.as_deref().unwrap_or("")),
        text: decode_segment(params.text.as_deref().unwrap_or("")),
        replace: None,
        options: catalog.decode(mask),
    }
}

fn decode_segment(encoded: &str) -> String {
    if encoded.is_empty() {
        return String::new();
    }

    let bytes = match URL_SAFE_NO_PAD.decode(encoded) {
        Ok(b) => b,
        Err(_) => return String::new(),
    };

    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(_) => String::new(),
    }
}
