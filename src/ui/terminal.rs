//! Line-oriented terminal front-end for the widget.
//!
//! Input lines map to UI events:
//!
//! - plain text: typed into the input field, then Enter
//! - `/lang xx`: click the language switcher button for `xx`
//! - `/N`: click the N-th visible suggestion (1-based)
//! - `/quit`: leave
//!
//! After each event only what changed on the page is printed.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::i18n::LanguageCode;
use crate::widget::document::Slot;
use crate::widget::linkify;
use crate::widget::{ElementId, Key, Page, Sender, UiEvent, Widget};

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalCommand {
    Say(String),
    Lang(String),
    Pick(usize),
    Quit,
    Help,
}

/// Parse one input line. Blank lines yield `None`.
#[must_use]
pub fn parse_line(line: &str) -> Option<TerminalCommand> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Some(TerminalCommand::Say(line.to_string()));
    };

    let mut parts = rest.split_whitespace();
    let command = match parts.next() {
        Some("quit" | "exit") => TerminalCommand::Quit,
        Some("lang") => TerminalCommand::Lang(parts.next().unwrap_or_default().to_string()),
        Some(other) => other
            .parse()
            .map_or(TerminalCommand::Help, TerminalCommand::Pick),
        None => TerminalCommand::Help,
    };
    Some(command)
}

/// Events a command stands for on the current page.
#[must_use]
pub fn events_for(command: &TerminalCommand, page: &Page) -> Vec<UiEvent> {
    match command {
        TerminalCommand::Say(text) => vec![
            UiEvent::Input(text.clone()),
            UiEvent::KeyDown(Key::Enter),
        ],
        TerminalCommand::Lang(code) => code
            .parse::<LanguageCode>()
            .ok()
            .and_then(|lang| page.language_button(&lang))
            .map(UiEvent::Click)
            .into_iter()
            .collect(),
        TerminalCommand::Pick(n) => n
            .checked_sub(1)
            .and_then(|i| page.visible_suggestions().get(i))
            .map(|b| UiEvent::Click(b.element))
            .into_iter()
            .collect(),
        TerminalCommand::Quit | TerminalCommand::Help => Vec::new(),
    }
}

/// Tracks what has already been shown so only changes are printed.
#[derive(Debug, Default)]
pub struct TerminalPrinter {
    printed_messages: usize,
    shown_lang: Option<LanguageCode>,
    shown_suggestions: Vec<ElementId>,
}

impl TerminalPrinter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines describing what changed since the last call.
    pub fn updates(&mut self, page: &Page) -> Vec<String> {
        let mut lines = Vec::new();

        if self.shown_lang.as_ref() != Some(page.lang()) {
            lines.push(format!("== {} ==", page.label(Slot::Title)));
            lines.push(page.label(Slot::Subtitle).to_string());
            self.shown_lang = Some(page.lang().clone());
            self.shown_suggestions.clear();
        }

        // Finished messages are append-only; placeholders are skipped.
        let finished: Vec<_> = page
            .transcript()
            .messages()
            .filter(|m| !m.is_placeholder)
            .collect();
        for message in finished.iter().skip(self.printed_messages) {
            let who = match message.sender {
                Sender::User => "you",
                Sender::Bot => "bot",
            };
            lines.push(format!("{who}> {}", linkify::plain_text(message.segments())));
        }
        self.printed_messages = finished.len();

        let suggestions = page.visible_suggestions();
        let ids: Vec<_> = suggestions.iter().map(|b| b.element).collect();
        if ids != self.shown_suggestions {
            for (i, button) in suggestions.iter().enumerate() {
                lines.push(format!("  [/{}] {}", i + 1, button.label));
            }
            self.shown_suggestions = ids;
        }

        lines
    }
}

const HELP: &str = "Type a question, /N to pick a suggestion, /lang ja|en to switch, /quit to leave.";

/// Drive `widget` from `input` until EOF or `/quit`, writing to `output`.
pub async fn run<R, W>(widget: &mut Widget, input: R, mut output: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut printer = TerminalPrinter::new();
    widget.dispatch(UiEvent::Loaded).await;
    write_lines(&mut output, &printer.updates(widget.page())).await?;
    write_lines(&mut output, &[HELP.to_string()]).await?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let Some(command) = parse_line(&line) else {
            continue;
        };
        match command {
            TerminalCommand::Quit => break,
            TerminalCommand::Help => write_lines(&mut output, &[HELP.to_string()]).await?,
            other => {
                let events = events_for(&other, widget.page());
                if events.is_empty() {
                    write_lines(&mut output, &[HELP.to_string()]).await?;
                }
                for event in events {
                    widget.dispatch(event).await;
                }
            }
        }
        write_lines(&mut output, &printer.updates(widget.page())).await?;
    }
    output.flush().await
}

async fn write_lines<W: AsyncWrite + Unpin>(output: &mut W, lines: &[String]) -> std::io::Result<()> {
    for line in lines {
        output.write_all(line.as_bytes()).await?;
        output.write_all(b"\n").await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("   "), None);
        assert_eq!(parse_line(" hello "), Some(TerminalCommand::Say("hello".into())));
        assert_eq!(parse_line("/quit"), Some(TerminalCommand::Quit));
        assert_eq!(parse_line("/lang en"), Some(TerminalCommand::Lang("en".into())));
        assert_eq!(parse_line("/2"), Some(TerminalCommand::Pick(2)));
        assert_eq!(parse_line("/what"), Some(TerminalCommand::Help));
    }

    #[test]
    fn test_events_for_language_and_pick() {
        let page = Page::new(LanguageCode::ja());
        let en = page.language_button(&LanguageCode::en()).unwrap();
        assert_eq!(
            events_for(&TerminalCommand::Lang("en".into()), &page),
            vec![UiEvent::Click(en)]
        );
        assert!(events_for(&TerminalCommand::Lang("xx".into()), &page).is_empty());
        assert!(events_for(&TerminalCommand::Pick(0), &page).is_empty());
        assert!(events_for(&TerminalCommand::Pick(1), &page).is_empty());
    }

    #[test]
    fn test_printer_reports_only_changes() {
        let page = Page::new(LanguageCode::ja());
        let mut printer = TerminalPrinter::new();
        let first = printer.updates(&page);
        assert_eq!(first[0], "== LARUbot サポート ==");
        assert!(printer.updates(&page).is_empty());
    }
}
