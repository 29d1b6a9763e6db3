//! Error types for the widget.

use thiserror::Error;

use crate::i18n::LanguageCode;

/// A language asset could not be loaded.
///
/// Never shown to the user; the widget logs it and stays on the previous
/// language.
#[derive(Error, Debug)]
pub enum AssetError {
    /// Request failed before a response arrived.
    #[error("fetching {asset} for {lang} failed: {source}")]
    Fetch {
        asset: &'static str,
        lang: LanguageCode,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status.
    #[error("fetching {asset} for {lang} returned HTTP {status}")]
    Status {
        asset: &'static str,
        lang: LanguageCode,
        status: u16,
    },

    /// Body was not the expected JSON shape.
    #[error("decoding {asset} for {lang} failed: {message}")]
    Decode {
        asset: &'static str,
        lang: LanguageCode,
        message: String,
    },
}

/// An `/ask` round trip failed.
///
/// All variants collapse to the same localized apology in the transcript.
#[derive(Error, Debug)]
pub enum ConversationError {
    /// Connection or transport failure.
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx response, regardless of body.
    #[error("server error: HTTP {0}")]
    Status(u16),

    /// Response body was not `{answer, follow_up_questions}`.
    #[error("malformed response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ConversationError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}
