//! The `/ask` backend: grounded answers plus follow-up suggestions.
//!
//! A question is answered in two model calls. The first answers it from the
//! knowledge base of the detected language; the second proposes follow-up
//! questions from the exchange. The first call failing yields a canned
//! apology; the second failing only drops the suggestions.

mod detect;
mod prompts;

pub use detect::detect_language;
pub use prompts::{EMPTY_QUESTION, PromptSet};

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use regex::Regex;

use crate::i18n::AssetCatalog;
use crate::llm::CompletionClient;
use crate::protocol::AskResponse;

static JSON_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[.*\]").expect("list pattern is valid"));

/// Model call deadlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerTimeouts {
    pub answer: Duration,
    pub follow_up: Duration,
}

impl Default for AnswerTimeouts {
    fn default() -> Self {
        Self {
            answer: Duration::from_secs(30),
            follow_up: Duration::from_secs(20),
        }
    }
}

/// Answers questions against the knowledge bases in an [`AssetCatalog`].
#[derive(Clone)]
pub struct AnswerService {
    llm: Arc<dyn CompletionClient>,
    catalog: Arc<AssetCatalog>,
    timeouts: AnswerTimeouts,
}

impl std::fmt::Debug for AnswerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnswerService")
            .field("languages", &self.catalog.knowledge.keys().collect::<Vec<_>>())
            .field("timeouts", &self.timeouts)
            .finish()
    }
}

impl AnswerService {
    #[must_use]
    pub fn new(
        llm: Arc<dyn CompletionClient>,
        catalog: Arc<AssetCatalog>,
        timeouts: AnswerTimeouts,
    ) -> Self {
        Self {
            llm,
            catalog,
            timeouts,
        }
    }

    /// Answer `question`. Never fails; errors become canned replies.
    pub async fn answer(&self, question: &str) -> AskResponse {
        let lang = detect_language(question);
        let prompts = PromptSet::for_language(&lang);
        let rules = self
            .catalog
            .knowledge_or_default(&lang)
            .map(crate::i18n::KnowledgeBase::rules_text)
            .unwrap_or_default();

        tracing::info!(
            name: "ask.received",
            lang = %lang,
            question_length = question.chars().count(),
            "Answering question"
        );

        let prompt = prompts.answer_prompt(&rules, question);
        let answer = match self.llm.complete(&prompt, self.timeouts.answer).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => prompts.not_found.to_string(),
            Err(e) => {
                tracing::error!(error = %e, lang = %lang, "Answer generation failed");
                return AskResponse::plain(prompts.error);
            }
        };

        let follow_up_questions = self.follow_ups(prompts, question, &answer).await;
        AskResponse {
            answer,
            follow_up_questions,
        }
    }

    async fn follow_ups(&self, prompts: &PromptSet, question: &str, answer: &str) -> Vec<String> {
        let request = prompts.follow_up_request(question, answer);
        match self.llm.complete(&request, self.timeouts.follow_up).await {
            Ok(text) => parse_question_list(&text),
            Err(e) => {
                tracing::warn!(error = %e, "Follow-up generation failed");
                Vec::new()
            }
        }
    }
}

/// Pull the first `[...]` span out of model output and parse it as a list
/// of strings. Anything unparseable yields an empty list.
#[must_use]
pub fn parse_question_list(text: &str) -> Vec<String> {
    let Some(m) = JSON_LIST.find(text) else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<String>>(m.as_str()) {
        Ok(list) => list
            .into_iter()
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .collect(),
        Err(e) => {
            tracing::warn!(error = %e, "Follow-up list did not parse");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{KnowledgeBase, LanguageCode};
    use std::sync::Mutex;

    /// Replays canned completions and records prompts.
    struct ScriptedLlm {
        replies: Mutex<Vec<anyhow::Result<String>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedLlm {
        fn new(replies: Vec<anyhow::Result<String>>) -> Self {
            Self {
                replies: Mutex::new(replies),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl CompletionClient for ScriptedLlm {
        async fn complete(&self, prompt: &str, _timeout: Duration) -> anyhow::Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.replies.lock().unwrap().remove(0)
        }
    }

    fn catalog() -> Arc<AssetCatalog> {
        let mut catalog = AssetCatalog::default();
        let mut en = KnowledgeBase::default();
        en.data.insert("Hours".into(), "Open 9-17".into());
        catalog.knowledge.insert(LanguageCode::en(), en);
        let mut ja = KnowledgeBase::default();
        ja.data.insert("営業時間".into(), "9時から17時".into());
        catalog.knowledge.insert(LanguageCode::ja(), ja);
        Arc::new(catalog)
    }

    fn service(llm: Arc<ScriptedLlm>) -> AnswerService {
        AnswerService::new(llm, catalog(), AnswerTimeouts::default())
    }

    #[tokio::test]
    async fn test_answer_with_follow_ups() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            Ok("  We open at 9.  ".into()),
            Ok("Sure:\n[\"Weekends?\", \" \", \"Holidays?\"]\nThanks".into()),
        ]));
        let response = service(Arc::clone(&llm)).answer("When do you open?").await;

        assert_eq!(response.answer, "We open at 9.");
        assert_eq!(response.follow_up_questions, vec!["Weekends?", "Holidays?"]);

        let prompts = llm.prompts.lock().unwrap();
        assert!(prompts[0].contains("### Hours\nOpen 9-17"));
        assert!(prompts[0].starts_with("You are a customer support AI"));
        assert!(prompts[1].contains("AIの回答: We open at 9."));
    }

    #[tokio::test]
    async fn test_japanese_question_uses_japanese_material() {
        let llm = Arc::new(ScriptedLlm::new(vec![Ok("9時です".into()), Ok("[]".into())]));
        let response = service(Arc::clone(&llm)).answer("営業時間は？").await;

        assert_eq!(response.answer, "9時です");
        assert!(response.follow_up_questions.is_empty());
        assert!(llm.prompts.lock().unwrap()[0].contains("### 営業時間"));
    }

    #[tokio::test]
    async fn test_empty_completion_is_not_found() {
        let llm = Arc::new(ScriptedLlm::new(vec![Ok("   ".into()), Ok("[]".into())]));
        let response = service(llm).answer("Anything about parking?").await;
        assert_eq!(
            response.answer,
            PromptSet::for_language(&LanguageCode::en()).not_found
        );
    }

    #[tokio::test]
    async fn test_answer_failure_returns_error_text() {
        let llm = Arc::new(ScriptedLlm::new(vec![Err(anyhow::anyhow!("timeout"))]));
        let response = service(Arc::clone(&llm)).answer("Hello").await;

        assert_eq!(
            response,
            AskResponse::plain(PromptSet::for_language(&LanguageCode::en()).error)
        );
        assert_eq!(llm.prompts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_follow_up_failure_keeps_answer() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            Ok("Answer".into()),
            Err(anyhow::anyhow!("boom")),
        ]));
        let response = service(llm).answer("Hello").await;
        assert_eq!(response, AskResponse::plain("Answer"));
    }

    #[test]
    fn test_parse_question_list() {
        assert_eq!(parse_question_list(r#"["a","b"]"#), vec!["a", "b"]);
        assert_eq!(parse_question_list("no list here"), Vec::<String>::new());
        assert_eq!(parse_question_list("[1, 2]"), Vec::<String>::new());
        assert_eq!(parse_question_list("```json\n[\"x\"]\n```"), vec!["x"]);
    }
}
