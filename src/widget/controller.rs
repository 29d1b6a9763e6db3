//! Conversation flow: user message → placeholder → `/ask` → answer.

use url::Url;

use crate::error::ConversationError;
use crate::i18n::LanguageCode;
use crate::protocol::{AskRequest, AskResponse};

use super::document::Page;
use super::transcript::Sender;

/// Text of the loading placeholder.
pub const LOADING_TEXT: &str = "...";

const NETWORK_ERROR_JA: &str =
    "申し訳ありませんが、ネットワーク接続に問題が発生しました。しばらくしてから再度お試しください。";
const NETWORK_ERROR_EN: &str =
    "Sorry, a network connection issue occurred. Please try again later.";

/// Apology shown when an `/ask` round trip fails.
///
/// Japanese for `ja`, English for every other language.
#[must_use]
pub fn network_error_message(lang: &LanguageCode) -> &'static str {
    if *lang == LanguageCode::ja() {
        NETWORK_ERROR_JA
    } else {
        NETWORK_ERROR_EN
    }
}

/// Backend that answers questions.
#[async_trait::async_trait]
pub trait AskClient: Send + Sync {
    async fn ask(&self, message: &str) -> Result<AskResponse, ConversationError>;
}

/// `POST {base}/ask` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpAskClient {
    endpoint: Url,
    http: reqwest::Client,
}

impl HttpAskClient {
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, url::ParseError> {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(
        base_url: impl AsRef<str>,
        http: reqwest::Client,
    ) -> Result<Self, url::ParseError> {
        let endpoint = Url::parse(base_url.as_ref())?.join("/ask")?;
        Ok(Self { endpoint, http })
    }
}

#[async_trait::async_trait]
impl AskClient for HttpAskClient {
    async fn ask(&self, message: &str) -> Result<AskResponse, ConversationError> {
        let body = AskRequest {
            message: message.to_string(),
        };
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConversationError::Status(status.as_u16()));
        }

        response
            .json::<AskResponse>()
            .await
            .map_err(|e| ConversationError::Decode(e.to_string()))
    }
}

/// Where the conversation stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversationState {
    #[default]
    Idle,
    Sending,
    AwaitingResponse,
    Success,
    Failure,
}

/// A request between [`Conversation::begin_send`] and
/// [`Conversation::finish_send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAsk {
    pub message: String,
    pub placeholder_id: String,
}

/// Drives the transcript through one question/answer turn at a time.
///
/// Turns may overlap; each owns its placeholder, and the state reflects the
/// most recent transition.
#[derive(Debug, Default)]
pub struct Conversation {
    state: ConversationState,
    in_flight: usize,
    last_placeholder_millis: i64,
}

impl Conversation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> ConversationState {
        self.state
    }

    /// Requests awaiting a response.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    fn transition(&mut self, next: ConversationState) {
        tracing::debug!(from = ?self.state, to = ?next, "Conversation state change");
        self.state = next;
    }

    /// `loading-{millis}`, strictly increasing even within one millisecond.
    fn next_placeholder_id(&mut self) -> String {
        let now = chrono::Utc::now().timestamp_millis();
        let millis = now.max(self.last_placeholder_millis + 1);
        self.last_placeholder_millis = millis;
        format!("loading-{millis}")
    }

    /// Start a turn.
    ///
    /// Uses `message`, or the input field when `None`. Returns `None` without
    /// touching the page when the text is empty after trimming.
    pub fn begin_send(&mut self, page: &mut Page, message: Option<&str>) -> Option<PendingAsk> {
        let text = match message {
            Some(m) => m.trim().to_string(),
            None => page.input_value().trim().to_string(),
        };
        if text.is_empty() {
            return None;
        }

        self.transition(ConversationState::Sending);
        page.transcript.add_message(Sender::User, &text, false, None);
        page.set_input_value("");
        page.initial_examples.visible = false;
        page.transcript.show_follow_ups(&mut page.handlers, &[]);

        let placeholder_id = self.next_placeholder_id();
        page.transcript
            .add_message(Sender::Bot, LOADING_TEXT, true, Some(&placeholder_id));

        self.in_flight += 1;
        self.transition(ConversationState::AwaitingResponse);
        Some(PendingAsk {
            message: text,
            placeholder_id,
        })
    }

    /// Complete a turn with the backend's result.
    ///
    /// `lang` picks the apology text on failure.
    pub fn finish_send(
        &mut self,
        page: &mut Page,
        pending: PendingAsk,
        lang: &LanguageCode,
        result: Result<AskResponse, ConversationError>,
    ) {
        self.in_flight = self.in_flight.saturating_sub(1);
        page.transcript.remove_loading_message(&pending.placeholder_id);

        match result {
            Ok(response) => {
                self.transition(ConversationState::Success);
                page.transcript
                    .add_message(Sender::Bot, &response.answer, false, None);
                page.transcript
                    .show_follow_ups(&mut page.handlers, &response.follow_up_questions);
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    placeholder = %pending.placeholder_id,
                    "Ask request failed"
                );
                self.transition(ConversationState::Failure);
                page.transcript
                    .add_message(Sender::Bot, network_error_message(lang), false, None);
            }
        }

        self.transition(ConversationState::Idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::transcript::Entry;

    #[test]
    fn test_empty_input_is_ignored() {
        let mut page = Page::new(LanguageCode::ja());
        let mut conversation = Conversation::new();
        page.set_input_value("   \t ");

        assert!(conversation.begin_send(&mut page, None).is_none());
        assert!(conversation.begin_send(&mut page, Some("  ")).is_none());
        assert!(page.transcript().entries().is_empty());
        assert_eq!(conversation.state(), ConversationState::Idle);
        assert!(page.initial_examples().visible);
    }

    #[test]
    fn test_begin_send_prepares_page() {
        let mut page = Page::new(LanguageCode::ja());
        let mut conversation = Conversation::new();
        page.set_input_value("  料金は？ ");

        let pending = conversation.begin_send(&mut page, None).unwrap();
        assert_eq!(pending.message, "料金は？");
        assert!(pending.placeholder_id.starts_with("loading-"));
        assert_eq!(page.input_value(), "");
        assert!(!page.initial_examples().visible);
        assert_eq!(conversation.state(), ConversationState::AwaitingResponse);

        let messages: Vec<_> = page.transcript().messages().collect();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].sender, Sender::User);
        assert!(messages[1].is_placeholder);
        assert_eq!(messages[1].id.as_deref(), Some(pending.placeholder_id.as_str()));
    }

    #[test]
    fn test_success_renders_answer_and_follow_ups() {
        let mut page = Page::new(LanguageCode::en());
        let mut conversation = Conversation::new();
        let pending = conversation.begin_send(&mut page, Some("Hours?")).unwrap();

        conversation.finish_send(
            &mut page,
            pending,
            &LanguageCode::en(),
            Ok(AskResponse {
                answer: "9 to 5".into(),
                follow_up_questions: vec!["Weekends?".into()],
            }),
        );

        let messages: Vec<_> = page.transcript().messages().collect();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].text, "9 to 5");
        assert_eq!(page.transcript().follow_ups()[0].label, "Weekends?");
        assert_eq!(conversation.state(), ConversationState::Idle);
        assert_eq!(conversation.in_flight(), 0);
    }

    #[test]
    fn test_failure_shows_localized_apology() {
        let mut page = Page::new(LanguageCode::en());
        let mut conversation = Conversation::new();
        let pending = conversation.begin_send(&mut page, Some("Hours?")).unwrap();

        conversation.finish_send(
            &mut page,
            pending,
            &LanguageCode::en(),
            Err(ConversationError::Status(500)),
        );

        let last = page.transcript().messages().last().unwrap();
        assert_eq!(last.sender, Sender::Bot);
        assert_eq!(last.text, NETWORK_ERROR_EN);
        assert!(page.transcript().follow_ups().is_empty());
    }

    #[test]
    fn test_interleaved_turns_remove_own_placeholders() {
        let mut page = Page::new(LanguageCode::ja());
        let mut conversation = Conversation::new();
        let first = conversation.begin_send(&mut page, Some("one")).unwrap();
        let second = conversation.begin_send(&mut page, Some("two")).unwrap();
        assert_ne!(first.placeholder_id, second.placeholder_id);
        assert_eq!(conversation.in_flight(), 2);

        conversation.finish_send(
            &mut page,
            second,
            &LanguageCode::ja(),
            Ok(AskResponse::plain("answer two")),
        );
        let placeholders = page
            .transcript()
            .messages()
            .filter(|m| m.is_placeholder)
            .count();
        assert_eq!(placeholders, 1);

        conversation.finish_send(
            &mut page,
            first,
            &LanguageCode::ja(),
            Ok(AskResponse::plain("answer one")),
        );
        assert!(page.transcript().messages().all(|m| !m.is_placeholder));
        assert!(matches!(
            page.transcript().entries().last(),
            Some(Entry::Message(m)) if m.text == "answer one"
        ));
    }

    #[test]
    fn test_error_message_languages() {
        assert_eq!(network_error_message(&LanguageCode::ja()), NETWORK_ERROR_JA);
        assert_eq!(network_error_message(&LanguageCode::en()), NETWORK_ERROR_EN);
        assert_eq!(
            network_error_message(&"fr".parse().unwrap()),
            NETWORK_ERROR_EN
        );
    }
}
