//! The scrollable message log.

use super::events::{ElementId, Handlers, UiAction};
use super::html;
use super::linkify::{self, Segment};

/// Container id of the follow-up suggestions; each turn replaces it.
pub const FOLLOW_UPS_ID: &str = "dynamic-example-questions";

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
        }
    }
}

/// One transcript message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    pub is_placeholder: bool,
    pub id: Option<String>,
    segments: Vec<Segment>,
}

impl ChatMessage {
    fn new(sender: Sender, text: &str, is_placeholder: bool, id: Option<String>) -> Self {
        Self {
            sender,
            text: text.to_string(),
            is_placeholder,
            // Only placeholders carry an id.
            id: id.filter(|_| is_placeholder),
            segments: linkify::linkify(text),
        }
    }

    /// Text split into plain runs and links.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[must_use]
    pub fn render_html(&self) -> String {
        let class = if self.is_placeholder {
            format!("message {}-message loading-message", self.sender.as_str())
        } else {
            format!("message {}-message", self.sender.as_str())
        };
        let id = self.id.as_deref().unwrap_or_default();
        let id_attr = if id.is_empty() { "" } else { "id" };
        html::element(
            "div",
            &[("class", &class), (id_attr, id)],
            &linkify::render(&self.segments),
        )
    }
}

/// A button that sends its label as a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionButton {
    pub element: ElementId,
    pub label: String,
}

impl SuggestionButton {
    /// Create the button and bind its click handler.
    pub fn create(handlers: &mut Handlers, label: &str) -> Self {
        let element = handlers.register(UiAction::SendMessage(Some(label.to_string())));
        Self {
            element,
            label: label.to_string(),
        }
    }

    #[must_use]
    pub fn render_html(&self) -> String {
        html::element(
            "button",
            &[
                ("type", "button"),
                ("class", "example-btn"),
                ("data-element", &self.element.to_string()),
            ],
            &html::escape(&self.label),
        )
    }
}

/// A transcript row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Message(ChatMessage),
    FollowUps(Vec<SuggestionButton>),
}

/// Ordered message log with a scroll position.
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<Entry>,
    scroll_top: usize,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Messages in order, skipping follow-up rows.
    pub fn messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.entries.iter().filter_map(|e| match e {
            Entry::Message(m) => Some(m),
            Entry::FollowUps(_) => None,
        })
    }

    /// Buttons of the current follow-up container, if any.
    #[must_use]
    pub fn follow_ups(&self) -> &[SuggestionButton] {
        self.entries
            .iter()
            .find_map(|e| match e {
                Entry::FollowUps(buttons) => Some(buttons.as_slice()),
                Entry::Message(_) => None,
            })
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_scrolled_to_end(&self) -> bool {
        self.scroll_top >= self.entries.len()
    }

    /// Append a message and scroll to it.
    ///
    /// `id` is kept only for loading placeholders.
    pub fn add_message(&mut self, sender: Sender, text: &str, is_loading: bool, id: Option<&str>) {
        let message = ChatMessage::new(sender, text, is_loading, id.map(ToOwned::to_owned));
        self.entries.push(Entry::Message(message));
        self.scroll_to_end();
    }

    /// Remove the loading placeholder with `id`. No-op when absent.
    pub fn remove_loading_message(&mut self, id: &str) {
        if let Some(pos) = self.entries.iter().position(|e| {
            matches!(e, Entry::Message(m) if m.is_placeholder && m.id.as_deref() == Some(id))
        }) {
            self.entries.remove(pos);
        }
    }

    /// Replace the follow-up container with buttons for `questions`.
    ///
    /// The previous container and its handlers are always removed; an empty
    /// list leaves no container behind.
    pub fn show_follow_ups(&mut self, handlers: &mut Handlers, questions: &[String]) {
        if let Some(pos) = self
            .entries
            .iter()
            .position(|e| matches!(e, Entry::FollowUps(_)))
            && let Entry::FollowUps(old) = self.entries.remove(pos)
        {
            for button in old {
                handlers.unregister(button.element);
            }
        }

        if questions.is_empty() {
            return;
        }

        let buttons = questions
            .iter()
            .map(|q| SuggestionButton::create(handlers, q))
            .collect();
        self.entries.push(Entry::FollowUps(buttons));
        self.scroll_to_end();
    }

    fn scroll_to_end(&mut self) {
        self.scroll_top = self.entries.len();
    }

    #[must_use]
    pub fn render_html(&self) -> String {
        self.entries
            .iter()
            .map(|entry| match entry {
                Entry::Message(m) => m.render_html(),
                Entry::FollowUps(buttons) => html::element(
                    "div",
                    &[
                        ("id", FOLLOW_UPS_ID),
                        ("class", "example-questions-container"),
                    ],
                    &buttons
                        .iter()
                        .map(SuggestionButton::render_html)
                        .collect::<String>(),
                ),
            })
            .collect()
    }
}
