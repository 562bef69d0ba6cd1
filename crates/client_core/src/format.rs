//! Answer formatting.
//!
//! The backend's language model emits a small markdown subset. Literal text is
//! escaped first, so the only tags in a [`SafeMarkup`] are the ones emitted
//! here: `<h2>`, `<strong>`, `<p>` and `<br/>`.

use std::{borrow::Cow, fmt, sync::LazyLock};

use regex::Regex;

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^## (.+)$").expect("heading pattern"));

static BOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold pattern"));

/// HTML produced by [`format_answer`]. Only this module can build one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeMarkup(String);

impl SafeMarkup {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SafeMarkup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn format_answer(answer: &str) -> SafeMarkup {
    let escaped = escape_html(&normalize_newlines(answer));
    let with_headings = HEADING_RE.replace_all(&escaped, "<h2>$1</h2>");
    let with_bold = BOLD_RE.replace_all(&with_headings, "<strong>$1</strong>");
    let body = with_bold.replace("\n\n", "</p><p>").replace('\n', "<br/>");
    SafeMarkup(format!("<p>{body}</p>"))
}

/// Terminal rendition of the same constructs: headings are underlined and
/// bold markers dropped. Text is left unescaped.
pub fn plain_text(answer: &str) -> String {
    let answer = normalize_newlines(answer);
    let with_headings = HEADING_RE.replace_all(&answer, |caps: &regex::Captures<'_>| {
        let title = &caps[1];
        format!("{title}\n{}", "-".repeat(title.chars().count()))
    });
    BOLD_RE.replace_all(&with_headings, "$1").into_owned()
}

fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if text.contains("\r\n") {
        Cow::Owned(text.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
#[path = "tests/format_tests.rs"]
mod tests;
