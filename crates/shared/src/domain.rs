use serde::{Deserialize, Serialize};

/// Body of `POST /api/query`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub question: String,
}

impl QueryRequest {
    /// Builds a request from raw draft text, returning `None` when nothing
    /// but whitespace was typed.
    pub fn from_draft(draft: &str) -> Option<Self> {
        let question = draft.trim();
        if question.is_empty() {
            return None;
        }
        Some(Self {
            question: question.to_string(),
        })
    }
}

/// One statute/section the backend judged relevant to the question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCitation {
    pub law_name: String,
    pub law_number: String,
    pub section: String,
    pub year: String,
    pub excerpt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    pub answer: String,
    pub sources: Vec<SourceCitation>,
    /// Count as reported by the server. Not guaranteed to match `sources`.
    pub total_sources: u64,
}

impl QueryResult {
    /// Number of citations actually received.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn total_sources_mismatch(&self) -> bool {
        self.total_sources != self.sources.len() as u64
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
