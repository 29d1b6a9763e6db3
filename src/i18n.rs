//! Language codes and the per-language asset payloads.
//!
//! Both the widget and the `/ask` backend work with the same two assets per
//! language: a [`TranslationMap`] of UI strings and a [`KnowledgeBase`] of
//! example questions plus the Q&A material used for prompting.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected language tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid language code: {0:?}")]
pub struct LanguageCodeError(pub String);

/// A validated language tag such as `ja`, `en` or `pt-br`.
///
/// Only lowercase ASCII letters and a single optional `-` region separator
/// are accepted, so a code can be spliced into an asset path as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Japanese, the default language.
    #[must_use]
    pub fn ja() -> Self {
        Self("ja".to_string())
    }

    /// English.
    #[must_use]
    pub fn en() -> Self {
        Self("en".to_string())
    }

    /// The tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LanguageCode {
    fn default() -> Self {
        Self::ja()
    }
}

impl FromStr for LanguageCode {
    type Err = LanguageCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let valid_len = (2..=8).contains(&s.len());
        let mut parts = s.split('-');
        let primary_ok = parts
            .next()
            .is_some_and(|p| p.len() >= 2 && p.bytes().all(|b| b.is_ascii_lowercase()));
        let region_ok = match parts.next() {
            None => true,
            Some(r) => !r.is_empty() && r.bytes().all(|b| b.is_ascii_lowercase()),
        };
        if valid_len && primary_ok && region_ok && parts.next().is_none() {
            Ok(Self(s.to_string()))
        } else {
            Err(LanguageCodeError(s.to_string()))
        }
    }
}

impl<'de> Deserialize<'de> for LanguageCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Localized UI strings keyed by translation key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslationMap(HashMap<String, String>);

impl TranslationMap {
    /// Look up a key. Empty strings count as missing.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TranslationMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Per-language knowledge base.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    /// Suggested starter questions, in display order.
    #[serde(default)]
    pub example_questions: Vec<String>,
    /// Q&A material (section title → body) used to ground answers.
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

impl KnowledgeBase {
    /// Knowledge base with only example questions.
    #[must_use]
    pub fn with_examples<I, S>(questions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            example_questions: questions.into_iter().map(Into::into).collect(),
            data: BTreeMap::new(),
        }
    }

    /// Render the Q&A material as `### title\nbody` sections separated by
    /// blank lines.
    #[must_use]
    pub fn rules_text(&self) -> String {
        self.data
            .iter()
            .map(|(title, body)| format!("### {title}\n{body}"))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Every language asset found under a static directory, keyed by language.
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    pub translations: HashMap<LanguageCode, TranslationMap>,
    pub knowledge: HashMap<LanguageCode, KnowledgeBase>,
}

impl AssetCatalog {
    /// Load `{dir}/translations/*.json` and `{dir}/knowledge/*.json`.
    ///
    /// Files whose stem is not a valid language code, or whose content does
    /// not parse, are logged and skipped. A missing subdirectory yields an
    /// empty map.
    pub fn load_dir(dir: &Path) -> std::io::Result<Self> {
        Ok(Self {
            translations: load_json_files(&dir.join("translations"))?,
            knowledge: load_json_files(&dir.join("knowledge"))?,
        })
    }

    /// Knowledge base for `lang`, falling back to Japanese.
    #[must_use]
    pub fn knowledge_or_default(&self, lang: &LanguageCode) -> Option<&KnowledgeBase> {
        self.knowledge
            .get(lang)
            .or_else(|| self.knowledge.get(&LanguageCode::ja()))
    }
}

fn load_json_files<T>(dir: &Path) -> std::io::Result<HashMap<LanguageCode, T>>
where
    T: serde::de::DeserializeOwned,
{
    let mut out = HashMap::new();
    if !dir.is_dir() {
        tracing::warn!(dir = %dir.display(), "Asset directory missing");
        return Ok(out);
    }

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let Some(lang) = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.parse::<LanguageCode>().ok())
        else {
            tracing::warn!(path = %path.display(), "Skipping asset with invalid language name");
            continue;
        };

        let raw = std::fs::read_to_string(&path)?;
        match serde_json::from_str::<T>(&raw) {
            Ok(value) => {
                tracing::debug!(path = %path.display(), lang = %lang, "Loaded asset");
                out.insert(lang, value);
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Failed to parse asset");
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_code_validation() {
        assert_eq!("ja".parse::<LanguageCode>().unwrap(), LanguageCode::ja());
        assert_eq!(" en ".parse::<LanguageCode>().unwrap(), LanguageCode::en());
        assert!("pt-br".parse::<LanguageCode>().is_ok());

        assert!("".parse::<LanguageCode>().is_err());
        assert!("j".parse::<LanguageCode>().is_err());
        assert!("EN".parse::<LanguageCode>().is_err());
        assert!("../etc".parse::<LanguageCode>().is_err());
        assert!("en-".parse::<LanguageCode>().is_err());
        assert!("en-us-x".parse::<LanguageCode>().is_err());
    }

    #[test]
    fn test_translation_map_skips_empty_values() {
        let map: TranslationMap = [("title", "Hello"), ("blank", "")].into_iter().collect();
        assert_eq!(map.get("title"), Some("Hello"));
        assert_eq!(map.get("blank"), None);
        assert_eq!(map.get("missing"), None);
    }

    #[test]
    fn test_knowledge_base_parses_without_data() {
        let kb: KnowledgeBase =
            serde_json::from_str(r#"{"example_questions": ["a", "b"]}"#).unwrap();
        assert_eq!(kb.example_questions, vec!["a", "b"]);
        assert!(kb.data.is_empty());
    }

    #[test]
    fn test_rules_text_format() {
        let mut kb = KnowledgeBase::default();
        kb.data.insert("Hours".into(), "9-5".into());
        kb.data.insert("Price".into(), "Free".into());
        assert_eq!(kb.rules_text(), "### Hours\n9-5\n\n### Price\nFree");
    }

    #[test]
    fn test_catalog_load_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("translations")).unwrap();
        std::fs::create_dir_all(dir.path().join("knowledge")).unwrap();
        std::fs::write(
            dir.path().join("translations/en.json"),
            r#"{"title": "Support"}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("translations/bad.json"), "{not json").unwrap();
        std::fs::write(
            dir.path().join("knowledge/ja.json"),
            r#"{"example_questions": ["料金は？"]}"#,
        )
        .unwrap();

        let catalog = AssetCatalog::load_dir(dir.path()).unwrap();
        assert_eq!(catalog.translations.len(), 1);
        assert_eq!(
            catalog.translations[&LanguageCode::en()].get("title"),
            Some("Support")
        );
        let kb = catalog.knowledge_or_default(&LanguageCode::en()).unwrap();
        assert_eq!(kb.example_questions, vec!["料金は？"]);
    }
}
