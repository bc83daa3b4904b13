//! Terminal panel content
//!
//! The same content comes in two forms: plain text, revealed one char at a
//! time, and HTML with live links, swapped in once the reveal finishes.

use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Prompt prefix for entry lines
pub const PROMPT: &str = "> ";
/// Width of the horizontal rule in chars
pub const RULE_WIDTH: usize = 17;

/// One line of the terminal panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Line {
    Blank,
    /// Horizontal rule
    Rule,
    /// Prompted plain entry
    Prompt { text: String },
    /// Prompted link
    Link { label: String, href: String },
    /// Unprompted text (hints)
    Text { text: String },
}

impl Line {
    pub fn prompt(text: &str) -> Self {
        Line::Prompt {
            text: text.to_string(),
        }
    }

    pub fn link(label: &str, href: &str) -> Self {
        Line::Link {
            label: label.to_string(),
            href: href.to_string(),
        }
    }

    pub fn text(text: &str) -> Self {
        Line::Text {
            text: text.to_string(),
        }
    }
}

/// Contact card shown in terminal mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalContent {
    pub lines: Vec<Line>,
}

impl Default for TerminalContent {
    fn default() -> Self {
        Self {
            lines: vec![
                Line::Blank,
                Line::prompt("daniel jeranko"),
                Line::link("jerankda@pm.me", "mailto:jerankda@pm.me"),
                Line::link("github", "https://github.com/jerankda"),
                Line::Blank,
                Line::Rule,
                Line::Blank,
                Line::link("habits.", "https://habits.jerankda.dev"),
                Line::link("festify.", "https://festify.jerankda.dev"),
                Line::Blank,
                Line::text("[ space to return ]"),
            ],
        }
    }
}

impl TerminalContent {
    /// Text revealed during the typing effect
    pub fn plain_text(&self) -> String {
        self.render(|out, line| match line {
            Line::Blank => {}
            Line::Rule => out.push_str(&rule()),
            Line::Prompt { text } | Line::Link { label: text, .. } => {
                out.push_str(PROMPT);
                out.push_str(text);
            }
            Line::Text { text } => out.push_str(text),
        })
    }

    /// Same text with links, for the finished panel
    pub fn to_html(&self) -> String {
        self.render(|out, line| match line {
            Line::Blank => {}
            Line::Rule => out.push_str(&rule()),
            Line::Prompt { text } => {
                out.push_str(&escape_html(PROMPT));
                out.push_str(&escape_html(text));
            }
            Line::Link { label, href } => {
                out.push_str(&escape_html(PROMPT));
                let _ = write!(out, "<a href=\"{}\"", escape_html(href));
                if !href.starts_with("mailto:") {
                    out.push_str(" target=\"_blank\" rel=\"noopener noreferrer\"");
                }
                let _ = write!(out, ">{}</a>", escape_html(label));
            }
            Line::Text { text } => out.push_str(&escape_html(text)),
        })
    }

    fn render<F>(&self, mut write_line: F) -> String
    where
        F: FnMut(&mut String, &Line),
    {
        let mut out = String::new();
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            write_line(&mut out, line);
        }
        out
    }
}

fn rule() -> String {
    "─".repeat(RULE_WIDTH)
}

/// Escape text for HTML element content and quoted attributes
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
