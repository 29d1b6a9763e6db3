//! Minimal HTML writer.
//!
//! Every piece of text and every attribute value goes through [`escape`];
//! markup is only ever produced by [`element`].

use std::fmt::Write as _;

/// Escape text for use in element content or a quoted attribute value.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Build `<tag attr="v" ...>inner</tag>`.
///
/// `inner` must already be markup produced by this module or escaped text.
/// Attributes with an empty name are skipped.
#[must_use]
pub fn element(tag: &str, attrs: &[(&str, &str)], inner: &str) -> String {
    let mut out = String::new();
    out.push('<');
    out.push_str(tag);
    for (name, value) in attrs.iter().filter(|(n, _)| !n.is_empty()) {
        let _ = write!(out, " {name}=\"{}\"", escape(value));
    }
    out.push('>');
    out.push_str(inner);
    let _ = write!(out, "</{tag}>");
    out
}

/// Build a void element such as `<input ...>`.
#[must_use]
pub fn void_element(tag: &str, attrs: &[(&str, &str)]) -> String {
    let mut out = String::new();
    out.push('<');
    out.push_str(tag);
    for (name, value) in attrs.iter().filter(|(n, _)| !n.is_empty()) {
        let _ = write!(out, " {name}=\"{}\"", escape(value));
    }
    out.push('>');
    out
}
