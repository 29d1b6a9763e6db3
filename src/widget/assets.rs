//! Per-language asset fetching and caching.

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use url::Url;

use crate::error::AssetError;
use crate::i18n::{KnowledgeBase, LanguageCode, TranslationMap};

const TRANSLATIONS: &str = "translations";
const KNOWLEDGE: &str = "knowledge";

/// Where language assets come from.
#[async_trait::async_trait]
pub trait AssetSource: Send + Sync {
    async fn translations(&self, lang: &LanguageCode) -> Result<TranslationMap, AssetError>;
    async fn knowledge(&self, lang: &LanguageCode) -> Result<KnowledgeBase, AssetError>;
}

/// Fetches `/static/{translations,knowledge}/{lang}.json` from a server.
#[derive(Debug, Clone)]
pub struct HttpAssetSource {
    base_url: Url,
    http: reqwest::Client,
}

impl HttpAssetSource {
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, url::ParseError> {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(
        base_url: impl AsRef<str>,
        http: reqwest::Client,
    ) -> Result<Self, url::ParseError> {
        Ok(Self {
            base_url: Url::parse(base_url.as_ref())?,
            http,
        })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        asset: &'static str,
        lang: &LanguageCode,
    ) -> Result<T, AssetError> {
        let url = self
            .base_url
            .join(&format!("/static/{asset}/{lang}.json"))
            .map_err(|e| AssetError::Decode {
                asset,
                lang: lang.clone(),
                message: e.to_string(),
            })?;

        tracing::debug!(url = %url, "Fetching language asset");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| AssetError::Fetch {
                asset,
                lang: lang.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AssetError::Status {
                asset,
                lang: lang.clone(),
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(|e| AssetError::Decode {
            asset,
            lang: lang.clone(),
            message: e.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl AssetSource for HttpAssetSource {
    async fn translations(&self, lang: &LanguageCode) -> Result<TranslationMap, AssetError> {
        self.fetch(TRANSLATIONS, lang).await
    }

    async fn knowledge(&self, lang: &LanguageCode) -> Result<KnowledgeBase, AssetError> {
        self.fetch(KNOWLEDGE, lang).await
    }
}

/// Language-keyed cache over an [`AssetSource`], plus the active language.
///
/// A language is fetched at most once; entries are never evicted.
pub struct AssetLoader {
    source: Arc<dyn AssetSource>,
    current: LanguageCode,
    translations: HashMap<LanguageCode, TranslationMap>,
    knowledge: HashMap<LanguageCode, KnowledgeBase>,
}

impl std::fmt::Debug for AssetLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetLoader")
            .field("current", &self.current)
            .field("cached", &self.translations.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl AssetLoader {
    #[must_use]
    pub fn new(source: Arc<dyn AssetSource>, initial: LanguageCode) -> Self {
        Self {
            source,
            current: initial,
            translations: HashMap::new(),
            knowledge: HashMap::new(),
        }
    }

    /// The active language.
    #[must_use]
    pub fn current(&self) -> &LanguageCode {
        &self.current
    }

    pub(crate) fn activate(&mut self, lang: LanguageCode) {
        self.current = lang;
    }

    #[must_use]
    pub fn is_cached(&self, lang: &LanguageCode) -> bool {
        self.translations.contains_key(lang) && self.knowledge.contains_key(lang)
    }

    /// Cached assets for `lang`.
    #[must_use]
    pub fn get(&self, lang: &LanguageCode) -> Option<(&TranslationMap, &KnowledgeBase)> {
        Some((self.translations.get(lang)?, self.knowledge.get(lang)?))
    }

    /// Make sure both assets for `lang` are cached.
    ///
    /// Fetches both concurrently when missing. Nothing is stored unless both
    /// succeed.
    pub async fn ensure_loaded(&mut self, lang: &LanguageCode) -> Result<(), AssetError> {
        if self.is_cached(lang) {
            tracing::debug!(lang = %lang, "Language assets served from cache");
            return Ok(());
        }

        let (translations, knowledge) = futures::try_join!(
            self.source.translations(lang),
            self.source.knowledge(lang)
        )?;

        tracing::info!(
            name: "assets.loaded",
            lang = %lang,
            translations = translations.len(),
            examples = knowledge.example_questions.len(),
            "Language assets loaded"
        );
        self.translations.insert(lang.clone(), translations);
        self.knowledge.insert(lang.clone(), knowledge);
        Ok(())
    }
}
