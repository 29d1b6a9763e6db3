//! Wire types of the `/ask` endpoint.

use serde::{Deserialize, Serialize};

/// `POST /ask` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskRequest {
    /// The user's question. Missing is treated like empty by the server.
    #[serde(default)]
    pub message: String,
}

/// `POST /ask` response body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskResponse {
    /// Answer text, possibly containing bare URLs.
    pub answer: String,
    /// Suggested next questions; may be empty.
    #[serde(default)]
    pub follow_up_questions: Vec<String>,
}

impl AskResponse {
    /// An answer without follow-ups.
    #[must_use]
    pub fn plain(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            follow_up_questions: Vec::new(),
        }
    }
}
