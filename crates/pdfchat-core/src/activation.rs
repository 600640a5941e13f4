//! Activation links.
//!
//! Placeholders in the rendered PDF are link annotations pointing at
//! `pdfchat://edit?target=<percent-encoded literal>`. The front-end hands the
//! clicked URI back and [`target_from_link`] recovers the literal text.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

pub const EDIT_LINK_PREFIX: &str = "pdfchat://edit?";

const TARGET_PARAM: &str = "target";

/// Build the activation URI for a placeholder literal.
pub fn link_for(target: &str) -> String {
    format!("{EDIT_LINK_PREFIX}{TARGET_PARAM}={}", percent_encode(target))
}

/// Recover the placeholder literal from an activation URI.
///
/// Returns `None` for anything that is not an edit link or whose target is
/// not valid percent-encoded UTF-8.
pub fn target_from_link(uri: &str) -> Option<String> {
    let query = uri.strip_prefix(EDIT_LINK_PREFIX)?;
    let encoded = query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == TARGET_PARAM).then_some(value)
    })?;
    percent_decode(encoded)
}

/// Everything outside the RFC 3986 unreserved set.
const TARGET_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub fn percent_encode(text: &str) -> String {
    utf8_percent_encode(text, TARGET_ESCAPE).to_string()
}

/// Decode `%XX` escapes; `+` is read as a space, as browsers send it in
/// query strings. `None` if the decoded bytes are not UTF-8.
pub fn percent_decode(text: &str) -> Option<String> {
    let spaced = text.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .ok()
        .map(|decoded| decoded.into_owned())
}
