//! Per-language prompt text and canned replies.

use crate::i18n::LanguageCode;

/// Prompt material for one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptSet {
    pub system_role: &'static str,
    pub follow_up_prompt: &'static str,
    /// Reply when the model returns nothing.
    pub not_found: &'static str,
    /// Reply when the model cannot be reached.
    pub error: &'static str,
}

/// Reply to an empty question.
pub const EMPTY_QUESTION: &str = "質問が空です。";

const JA: PromptSet = PromptSet {
    system_role: "あなたはLARUbotのカスタマーサポートAIです。以下の「ルール・規則」セクションに記載されている情報のみに基づいて、お客様からの質問に絵文字を使わずに丁寧に回答してください。**記載されていない質問には「申し訳ありませんが、その情報はこのQ&Aには含まれていません。」と答えてください。**お客様がスムーズに手続きを進められるよう、元気で丁寧な言葉遣いで案内してください。",
    follow_up_prompt: "上記のユーザーからの質問とAIの回答に基づき、ユーザーが次に関心を持ちそうな関連性の高い質問を3つ提案してください。簡潔で分かりやすい質問にしてください。回答は必ずJSON形式の文字列リスト（例: [\"質問1\", \"質問2\", \"質問3\"]）で、リスト以外の文字列は一切含めずに返してください。適切な質問がなければ空のリスト `[]` を返してください。",
    not_found: "申し訳ありませんが、その情報はこのQ&Aには含まれていません。",
    error: "申し訳ありませんが、現在AIが応答できません。しばらくしてから再度お試しください。",
};

const EN: PromptSet = PromptSet {
    system_role: "You are a customer support AI for LARUbot. Based only on the information provided in the 'Rules & Regulations' section below, please answer customer questions politely and without using emojis. **If a question is not covered, reply with 'I'm sorry, but that information is not included in this Q&A.'** Please use a cheerful and polite tone to guide customers smoothly.",
    follow_up_prompt: "Based on the user's question and the AI's answer above, suggest three relevant follow-up questions the user might be interested in next. Keep the questions concise and clear. Your response must be only a JSON formatted list of strings (e.g., [\"Question 1\", \"Question 2\", \"Question 3\"]) with no other text. If no suitable questions can be generated, return an empty list `[]`.",
    not_found: "I'm sorry, but that information is not included in this Q&A.",
    error: "Sorry, the AI is currently unable to respond. Please try again later.",
};

impl PromptSet {
    /// Prompts for `lang`; Japanese for anything but English.
    #[must_use]
    pub fn for_language(lang: &LanguageCode) -> &'static PromptSet {
        if *lang == LanguageCode::en() { &EN } else { &JA }
    }

    /// Full answer prompt: role, the rules section, then the question.
    #[must_use]
    pub fn answer_prompt(&self, rules: &str, question: &str) -> String {
        format!(
            "{role}\n\n---\n## ルール・規則 (Rules & Regulations)\n{rules}\n---\n\nお客様の質問 (Customer's Question): {question}\n",
            role = self.system_role,
        )
    }

    /// Prompt asking for follow-up questions to a finished exchange.
    #[must_use]
    pub fn follow_up_request(&self, question: &str, answer: &str) -> String {
        format!(
            "ユーザーの質問: {question}\nAIの回答: {answer}\n\n{}",
            self.follow_up_prompt
        )
    }
}
