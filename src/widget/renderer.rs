//! Applies a language's assets to the page.

use crate::i18n::{KnowledgeBase, LanguageCode, TranslationMap};

use super::document::Page;
use super::transcript::SuggestionButton;

/// Switch the page to `lang`.
///
/// Sets the document language, rewrites every translated label whose key is
/// present in `translations` (others keep their text), and rebuilds the
/// starter question buttons from `knowledge` in source order.
pub fn update_ui(
    page: &mut Page,
    lang: &LanguageCode,
    translations: &TranslationMap,
    knowledge: &KnowledgeBase,
) {
    page.set_lang(lang.clone());

    let mut applied = 0usize;
    for label in page.labels_mut() {
        // The target only decides where the text is rendered.
        if let Some(text) = translations.get(&label.key) {
            label.text = text.to_string();
            applied += 1;
        }
    }

    let old = std::mem::take(&mut page.initial_examples.buttons);
    for button in old {
        page.handlers.unregister(button.element);
    }
    page.initial_examples.buttons = knowledge
        .example_questions
        .iter()
        .map(|q| SuggestionButton::create(&mut page.handlers, q))
        .collect();

    tracing::debug!(
        lang = %lang,
        labels_applied = applied,
        examples = page.initial_examples.buttons.len(),
        "UI updated"
    );
}
