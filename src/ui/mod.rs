//! Presentation around the widget core.
//!
//! - [`shell`]: the HTML document served at `/`
//! - [`terminal`]: a line-oriented front-end driving the widget from stdin

pub mod shell;
pub mod terminal;

pub use shell::html_shell;
