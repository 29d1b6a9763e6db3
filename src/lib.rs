//! LARUbot support chat
//!
//! A customer-support chat widget and the small backend that feeds it:
//! localized UI strings and a knowledge base per language, and an `/ask`
//! endpoint answering from that knowledge base with follow-up suggestions.
//!
//! # Architecture
//!
//! - **Widget**: headless document model driven by typed UI events
//! - **Server**: Axum serving the pre-rendered page, static assets and `/ask`
//! - **Answers**: two-step LLM prompting grounded in the knowledge base
//!
//! # Modules
//!
//! - [`widget`]: asset cache, renderer, transcript, conversation controller
//! - [`answer`]: language detection, prompts and the answer service
//! - [`llm`]: OpenAI-compatible completion client
//! - [`i18n`]: language codes and asset payloads
//! - [`protocol`]: `/ask` wire types

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::implicit_hasher)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod answer;
pub mod config;
pub mod error;
pub mod i18n;
pub mod llm;
pub mod protocol;
pub mod server;
pub mod ui;
pub mod widget;

use std::sync::Arc;

use answer::AnswerService;
use i18n::{AssetCatalog, LanguageCode};

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Answers `/ask` questions.
    pub answers: Arc<AnswerService>,
    /// Assets loaded at startup, for the pre-rendered page.
    pub catalog: Arc<AssetCatalog>,
    /// Language of the pre-rendered page.
    pub default_language: LanguageCode,
}
