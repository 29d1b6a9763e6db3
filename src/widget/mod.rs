//! Headless chat widget.
//!
//! The widget owns a [`Page`] (its document), an [`AssetLoader`] (active
//! language and per-language caches) and a [`Conversation`] (the
//! send/answer flow). Front-ends feed it [`UiEvent`]s and read the page back.
//!
//! # Structure
//!
//! - [`assets`]: language asset sources and the cache
//! - [`renderer`]: applies translations and starter questions to the page
//! - [`transcript`]: message log, placeholders and follow-up buttons
//! - [`controller`]: `/ask` round trips
//! - [`events`]: typed events and per-element handlers
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use laru_chat::i18n::LanguageCode;
//! use laru_chat::widget::{HttpAskClient, HttpAssetSource, UiEvent, Widget};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let base = "http://127.0.0.1:5003";
//! let mut widget = Widget::new(
//!     Arc::new(HttpAssetSource::new(base)?),
//!     Arc::new(HttpAskClient::new(base)?),
//!     LanguageCode::ja(),
//! );
//! widget.dispatch(UiEvent::Loaded).await;
//! widget.send_message(Some("営業時間は？")).await;
//! # Ok(())
//! # }
//! ```

pub mod assets;
pub mod controller;
pub mod document;
pub mod events;
pub mod html;
pub mod linkify;
pub mod renderer;
pub mod transcript;

use std::sync::Arc;

pub use assets::{AssetLoader, AssetSource, HttpAssetSource};
pub use controller::{AskClient, Conversation, ConversationState, HttpAskClient};
pub use document::Page;
pub use events::{ElementId, Key, UiAction, UiEvent};
pub use transcript::{ChatMessage, Entry, Sender};

use crate::error::AssetError;
use crate::i18n::LanguageCode;

/// The chat widget.
pub struct Widget {
    page: Page,
    assets: AssetLoader,
    conversation: Conversation,
    client: Arc<dyn AskClient>,
    default_language: LanguageCode,
}

impl std::fmt::Debug for Widget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Widget")
            .field("assets", &self.assets)
            .field("conversation", &self.conversation)
            .field("default_language", &self.default_language)
            .finish()
    }
}

impl Widget {
    #[must_use]
    pub fn new(
        source: Arc<dyn AssetSource>,
        client: Arc<dyn AskClient>,
        default_language: LanguageCode,
    ) -> Self {
        Self {
            page: Page::new(default_language.clone()),
            assets: AssetLoader::new(source, default_language.clone()),
            conversation: Conversation::new(),
            client,
            default_language,
        }
    }

    #[must_use]
    pub fn page(&self) -> &Page {
        &self.page
    }

    #[must_use]
    pub fn current_language(&self) -> &LanguageCode {
        self.assets.current()
    }

    #[must_use]
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Switch to `lang`, fetching its assets on first use.
    ///
    /// On failure the error is logged and returned; the page stays on the
    /// previous language.
    pub async fn set_language(&mut self, lang: &LanguageCode) -> Result<(), AssetError> {
        if self.assets.current() == lang && self.assets.is_cached(lang) {
            return Ok(());
        }

        if let Err(e) = self.assets.ensure_loaded(lang).await {
            tracing::error!(lang = %lang, error = %e, "Failed to load language files");
            return Err(e);
        }

        if let Some((translations, knowledge)) = self.assets.get(lang) {
            renderer::update_ui(&mut self.page, lang, translations, knowledge);
        }
        self.assets.activate(lang.clone());
        Ok(())
    }

    /// Run one question/answer turn. See [`Conversation::begin_send`].
    pub async fn send_message(&mut self, message: Option<&str>) {
        let Some(pending) = self.conversation.begin_send(&mut self.page, message) else {
            return;
        };

        let result = self.client.ask(&pending.message).await;
        let lang = self.assets.current().clone();
        self.conversation
            .finish_send(&mut self.page, pending, &lang, result);
    }

    /// Route a UI event to its handler.
    pub async fn dispatch(&mut self, event: UiEvent) {
        match event {
            UiEvent::Loaded => {
                let lang = self.default_language.clone();
                // Failure is already logged; the built-in labels stay.
                let _ = self.set_language(&lang).await;
            }
            UiEvent::Click(element) => {
                let Some(action) = self.page.handlers().action(element).cloned() else {
                    tracing::debug!(element = %element, "Click on element without handler");
                    return;
                };
                match action {
                    UiAction::SwitchLanguage(lang) => {
                        let _ = self.set_language(&lang).await;
                    }
                    UiAction::SendMessage(text) => self.send_message(text.as_deref()).await,
                }
            }
            UiEvent::KeyDown(Key::Enter) => self.send_message(None).await,
            UiEvent::KeyDown(_) => {}
            UiEvent::Input(text) => self.page.set_input_value(text),
        }
    }
}
