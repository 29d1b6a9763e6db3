//! Question language detection.

use crate::i18n::LanguageCode;

fn is_japanese(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{309F}'   // Hiragana
        | '\u{30A0}'..='\u{30FF}' // Katakana
        | '\u{31F0}'..='\u{31FF}' // Katakana phonetic extensions
        | '\u{FF66}'..='\u{FF9F}' // Half-width katakana
        | '\u{4E00}'..='\u{9FFF}' // CJK unified ideographs
        | '\u{3400}'..='\u{4DBF}' // CJK extension A
    )
}

/// Pick the answer language for a question.
///
/// Any kana or kanji means Japanese; otherwise Latin letters mean English.
/// Text with neither falls back to Japanese.
#[must_use]
pub fn detect_language(text: &str) -> LanguageCode {
    if text.chars().any(is_japanese) {
        LanguageCode::ja()
    } else if text.chars().any(|c| c.is_ascii_alphabetic()) {
        LanguageCode::en()
    } else {
        LanguageCode::ja()
    }
}
