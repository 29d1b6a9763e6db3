//! UI events and per-element click handlers.
//!
//! Every clickable element gets an [`ElementId`] and a [`UiAction`] at the
//! moment it is created. Dispatch looks the action up by id; nothing is
//! inferred from classes or markup at click time.

use std::collections::HashMap;
use std::fmt;

use crate::i18n::LanguageCode;

/// Identity of a rendered clickable element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "el-{}", self.0)
    }
}

/// Keys the input field reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Char(char),
}

/// Something the user (or the page lifecycle) did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Initial page load.
    Loaded,
    /// Click on a rendered element.
    Click(ElementId),
    /// Key pressed while the input field has focus.
    KeyDown(Key),
    /// Input field content replaced.
    Input(String),
}

/// What a click does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    /// Language switcher button.
    SwitchLanguage(LanguageCode),
    /// Send a message: the given text (suggestion buttons) or the input
    /// field content (`None`, send button).
    SendMessage(Option<String>),
}

/// Registry of click handlers for live elements.
#[derive(Debug, Default)]
pub struct Handlers {
    next: u64,
    actions: HashMap<ElementId, UiAction>,
}

impl Handlers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an id for a new element and bind its action.
    pub fn register(&mut self, action: UiAction) -> ElementId {
        self.next += 1;
        let id = ElementId(self.next);
        self.actions.insert(id, action);
        id
    }

    /// Drop the handler of a removed element. Unknown ids are ignored.
    pub fn unregister(&mut self, id: ElementId) {
        self.actions.remove(&id);
    }

    #[must_use]
    pub fn action(&self, id: ElementId) -> Option<&UiAction> {
        self.actions.get(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_unregister() {
        let mut handlers = Handlers::new();
        let a = handlers.register(UiAction::SendMessage(None));
        let b = handlers.register(UiAction::SwitchLanguage(LanguageCode::en()));
        assert_ne!(a, b);
        assert_eq!(handlers.len(), 2);
        assert_eq!(handlers.action(a), Some(&UiAction::SendMessage(None)));

        handlers.unregister(a);
        handlers.unregister(a);
        assert!(handlers.action(a).is_none());
        assert_eq!(handlers.len(), 1);
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut handlers = Handlers::new();
        let a = handlers.register(UiAction::SendMessage(None));
        handlers.unregister(a);
        let b = handlers.register(UiAction::SendMessage(None));
        assert_ne!(a, b);
        assert_eq!(b.to_string(), "el-2");
    }
}
