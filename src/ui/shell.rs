//! HTML document shell around the widget.

use crate::i18n::LanguageCode;
use crate::widget::html;

/// Wrap rendered widget markup in a full HTML document.
#[must_use]
pub fn html_shell(lang: &LanguageCode, title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="LARUbot customer support chat">
    <title>{title}</title>
    <link rel="stylesheet" href="/static/style.css">
</head>
<body>
    <main id="app">
        {content}
    </main>
</body>
</html>"#,
        lang = html::escape(lang.as_str()),
        title = html::escape(title),
    )
}
