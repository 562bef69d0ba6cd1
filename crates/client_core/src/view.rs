//! Display projections of session state for whatever binding layer renders it.

use shared::domain::{QueryResult, SourceCitation};

use crate::{
    format::{format_answer, SafeMarkup},
    session::SessionState,
};

pub const ANSWER_HEADING: &str = "Legal Analysis & Opinion";
pub const SOURCES_HEADING: &str = "Source Documents";
pub const SUBMITTING_LABEL: &str = "Analyzing...";
pub const DISCLAIMER: &str = "This is AI-generated legal information for reference only. \
It does not constitute legal advice. Consult a qualified lawyer admitted to the Bar Council \
of Pakistan for professional guidance.";

/// Compact tag, e.g. `XVII of 2001 § 15 • 2001`.
pub fn citation_tag(source: &SourceCitation) -> String {
    format!("{} § {} • {}", source.law_number, source.section, source.year)
}

pub fn citation_detail(source: &SourceCitation) -> String {
    format!(
        "{} | Section {} | {}",
        source.law_number, source.section, source.year
    )
}

/// Counts what was actually received; a disagreeing server total is shown
/// alongside rather than trusted.
pub fn sources_summary(result: &QueryResult) -> String {
    let count = result.source_count();
    let plural = if count == 1 { "" } else { "s" };
    let mut summary = format!("{count} relevant law{plural} retrieved");
    if result.total_sources_mismatch() {
        summary.push_str(&format!(" (server reported {})", result.total_sources));
    }
    summary
}

/// Shortens an excerpt to at most `max_chars` characters, marking the cut.
pub fn excerpt_preview(excerpt: &str, max_chars: usize) -> String {
    let excerpt = excerpt.trim();
    if excerpt.chars().count() <= max_chars {
        return excerpt.to_string();
    }
    let cut: String = excerpt.chars().take(max_chars).collect();
    format!("{}…", cut.trim_end())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationView {
    pub law_name: String,
    pub detail: String,
    pub excerpt: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub answer: SafeMarkup,
    /// `None` when no sources came back; the sources sections are then omitted.
    pub sources_summary: Option<String>,
    pub citation_tags: Vec<String>,
    pub citations: Vec<CitationView>,
}

impl ResultView {
    pub fn from_result(result: &QueryResult) -> Self {
        let summary = (!result.sources.is_empty()).then(|| sources_summary(result));
        Self {
            answer: format_answer(&result.answer),
            sources_summary: summary,
            citation_tags: result.sources.iter().map(citation_tag).collect(),
            citations: result
                .sources
                .iter()
                .map(|source| CitationView {
                    law_name: source.law_name.clone(),
                    detail: citation_detail(source),
                    excerpt: source.excerpt.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLine {
    Submitting,
    Error(String),
}

impl StatusLine {
    pub fn from_state(state: &SessionState) -> Option<Self> {
        match state {
            SessionState::Submitting { .. } => Some(Self::Submitting),
            SessionState::Failed { message, .. } => Some(Self::Error(message.clone())),
            SessionState::Idle { .. } | SessionState::Succeeded { .. } => None,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Submitting => SUBMITTING_LABEL,
            Self::Error(message) => message,
        }
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
