//! URL detection for chat message text.

use std::sync::LazyLock;

use regex::Regex;

use super::html;

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https?://[^\s<>"'()]+"#).expect("URL pattern is valid")
});

/// Characters that end a sentence rather than a URL.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?'];

/// A run of message text: plain or a detected link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Link(String),
}

/// Split `text` into plain runs and URLs.
///
/// Adjacent plain runs are merged, so a message without URLs is a single
/// [`Segment::Text`]. Empty input yields no segments.
#[must_use]
pub fn linkify(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut plain = String::new();
    let mut cursor = 0;

    for m in URL_PATTERN.find_iter(text) {
        let url = m.as_str().trim_end_matches(TRAILING_PUNCTUATION);
        // "http://." loses its only character to the trim.
        if url.ends_with("://") {
            continue;
        }
        plain.push_str(&text[cursor..m.start()]);
        if !plain.is_empty() {
            segments.push(Segment::Text(std::mem::take(&mut plain)));
        }
        segments.push(Segment::Link(url.to_string()));
        cursor = m.start() + url.len();
    }

    plain.push_str(&text[cursor..]);
    if !plain.is_empty() {
        segments.push(Segment::Text(plain));
    }
    segments
}

/// Render segments as markup: text escaped, links as new-tab anchors.
#[must_use]
pub fn render(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|segment| match segment {
            Segment::Text(text) => html::escape(text),
            Segment::Link(url) => html::element(
                "a",
                &[
                    ("href", url),
                    ("target", "_blank"),
                    ("rel", "noopener noreferrer"),
                ],
                &html::escape(url),
            ),
        })
        .collect()
}

/// Plain-text rendering; links are shown as the bare URL.
#[must_use]
pub fn plain_text(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| match s {
            Segment::Text(t) | Segment::Link(t) => t.as_str(),
        })
        .collect()
}
