//! The widget's document model.
//!
//! [`Page`] plays the role of the DOM: translated labels, the language
//! switcher, the starter questions, the transcript and the input field.
//! It can be rendered to HTML for the server-side initial page.

use crate::i18n::LanguageCode;

use super::events::{ElementId, Handlers, UiAction};
use super::html;
use super::transcript::{SuggestionButton, Transcript};

/// Where a translated string is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum I18nTarget {
    /// Element text (`data-i18n-key`).
    Text,
    /// Input placeholder (`data-i18n-key-placeholder`).
    Placeholder,
}

/// Fixed positions for translated labels in the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Title,
    Subtitle,
    ExamplesHeading,
    InputPlaceholder,
    SendButton,
}

/// An element whose content comes from the translation table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct I18nElement {
    pub slot: Slot,
    pub key: String,
    pub target: I18nTarget,
    pub text: String,
}

impl I18nElement {
    fn new(slot: Slot, key: &str, target: I18nTarget, text: &str) -> Self {
        Self {
            slot,
            key: key.to_string(),
            target,
            text: text.to_string(),
        }
    }
}

/// A language switcher button (`data-lang`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageButton {
    pub element: ElementId,
    pub lang: LanguageCode,
    pub label: String,
}

/// The starter question list shown before the first message.
#[derive(Debug, Default)]
pub struct InitialExamples {
    pub visible: bool,
    pub buttons: Vec<SuggestionButton>,
}

/// The whole widget document.
#[derive(Debug)]
pub struct Page {
    lang: LanguageCode,
    labels: Vec<I18nElement>,
    languages: Vec<LanguageButton>,
    send_button: ElementId,
    input: String,
    pub(crate) initial_examples: InitialExamples,
    pub(crate) transcript: Transcript,
    pub(crate) handlers: Handlers,
}

impl Page {
    /// Build the page with built-in Japanese labels and a ja/en switcher.
    #[must_use]
    pub fn new(lang: LanguageCode) -> Self {
        let mut handlers = Handlers::new();

        let languages = [(LanguageCode::ja(), "日本語"), (LanguageCode::en(), "English")]
            .into_iter()
            .map(|(lang, label)| LanguageButton {
                element: handlers.register(UiAction::SwitchLanguage(lang.clone())),
                lang,
                label: label.to_string(),
            })
            .collect();
        let send_button = handlers.register(UiAction::SendMessage(None));

        let labels = vec![
            I18nElement::new(Slot::Title, "chatbot_title", I18nTarget::Text, "LARUbot サポート"),
            I18nElement::new(
                Slot::Subtitle,
                "chatbot_subtitle",
                I18nTarget::Text,
                "ご質問をどうぞ",
            ),
            I18nElement::new(
                Slot::ExamplesHeading,
                "example_questions_title",
                I18nTarget::Text,
                "よくある質問",
            ),
            I18nElement::new(
                Slot::InputPlaceholder,
                "input_placeholder",
                I18nTarget::Placeholder,
                "メッセージを入力...",
            ),
            I18nElement::new(Slot::SendButton, "send_button", I18nTarget::Text, "送信"),
        ];

        Self {
            lang,
            labels,
            languages,
            send_button,
            input: String::new(),
            initial_examples: InitialExamples {
                visible: true,
                buttons: Vec::new(),
            },
            transcript: Transcript::new(),
            handlers,
        }
    }

    /// Document language attribute.
    #[must_use]
    pub fn lang(&self) -> &LanguageCode {
        &self.lang
    }

    pub(crate) fn set_lang(&mut self, lang: LanguageCode) {
        self.lang = lang;
    }

    #[must_use]
    pub fn labels(&self) -> &[I18nElement] {
        &self.labels
    }

    pub(crate) fn labels_mut(&mut self) -> &mut [I18nElement] {
        &mut self.labels
    }

    /// Current text of the label in `slot`.
    #[must_use]
    pub fn label(&self, slot: Slot) -> &str {
        self.labels
            .iter()
            .find(|l| l.slot == slot)
            .map(|l| l.text.as_str())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn language_buttons(&self) -> &[LanguageButton] {
        &self.languages
    }

    /// Switcher button for `lang`, if the page offers it.
    #[must_use]
    pub fn language_button(&self, lang: &LanguageCode) -> Option<ElementId> {
        self.languages
            .iter()
            .find(|b| &b.lang == lang)
            .map(|b| b.element)
    }

    #[must_use]
    pub fn send_button(&self) -> ElementId {
        self.send_button
    }

    #[must_use]
    pub fn input_value(&self) -> &str {
        &self.input
    }

    pub fn set_input_value(&mut self, value: impl Into<String>) {
        self.input = value.into();
    }

    #[must_use]
    pub fn initial_examples(&self) -> &InitialExamples {
        &self.initial_examples
    }

    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[must_use]
    pub fn handlers(&self) -> &Handlers {
        &self.handlers
    }

    /// Suggestions the user can currently click: this turn's follow-ups, or
    /// the starter list while it is still shown.
    #[must_use]
    pub fn visible_suggestions(&self) -> &[SuggestionButton] {
        let follow_ups = self.transcript.follow_ups();
        if !follow_ups.is_empty() {
            follow_ups
        } else if self.initial_examples.visible {
            &self.initial_examples.buttons
        } else {
            &[]
        }
    }

    /// Render the widget body.
    #[must_use]
    pub fn render_html(&self) -> String {
        let label = |slot: Slot| -> (String, String) {
            self.labels
                .iter()
                .find(|l| l.slot == slot)
                .map(|l| (l.key.clone(), l.text.clone()))
                .unwrap_or_default()
        };

        let (title_key, title) = label(Slot::Title);
        let (subtitle_key, subtitle) = label(Slot::Subtitle);
        let (heading_key, heading) = label(Slot::ExamplesHeading);
        let (placeholder_key, placeholder) = label(Slot::InputPlaceholder);
        let (send_key, send) = label(Slot::SendButton);

        let switcher: String = self
            .languages
            .iter()
            .map(|b| {
                html::element(
                    "button",
                    &[
                        ("type", "button"),
                        ("data-lang", b.lang.as_str()),
                        ("data-element", &b.element.to_string()),
                    ],
                    &html::escape(&b.label),
                )
            })
            .collect();

        let header = html::element(
            "div",
            &[("class", "chatbot-header")],
            &[
                html::element("h1", &[("data-i18n-key", &title_key)], &html::escape(&title)),
                html::element(
                    "p",
                    &[("data-i18n-key", &subtitle_key)],
                    &html::escape(&subtitle),
                ),
                html::element("div", &[("class", "language-switcher")], &switcher),
            ]
            .concat(),
        );

        let examples_style = if self.initial_examples.visible {
            ""
        } else {
            "display: none"
        };
        let example_buttons: String = self
            .initial_examples
            .buttons
            .iter()
            .map(SuggestionButton::render_html)
            .collect();
        let examples = html::element(
            "div",
            &[
                ("class", "initial-examples"),
                (if examples_style.is_empty() { "" } else { "style" }, examples_style),
            ],
            &[
                html::element(
                    "p",
                    &[("data-i18n-key", &heading_key)],
                    &html::escape(&heading),
                ),
                html::element(
                    "div",
                    &[
                        ("id", "initial-example-questions"),
                        ("class", "example-questions-container"),
                    ],
                    &example_buttons,
                ),
            ]
            .concat(),
        );

        let messages = html::element(
            "div",
            &[("id", "chatbot-messages")],
            &self.transcript.render_html(),
        );

        let input_area = html::element(
            "div",
            &[("class", "chatbot-input")],
            &[
                html::void_element(
                    "input",
                    &[
                        ("type", "text"),
                        ("id", "user-input"),
                        ("data-i18n-key-placeholder", &placeholder_key),
                        ("placeholder", &placeholder),
                        ("value", &self.input),
                    ],
                ),
                html::element(
                    "button",
                    &[
                        ("type", "button"),
                        ("id", "send-button"),
                        ("data-i18n-key", &send_key),
                        ("data-element", &self.send_button.to_string()),
                    ],
                    &html::escape(&send),
                ),
            ]
            .concat(),
        );

        html::element(
            "div",
            &[("class", "chatbot-container"), ("lang", self.lang.as_str())],
            &[header, examples, messages, input_area].concat(),
        )
    }
}
