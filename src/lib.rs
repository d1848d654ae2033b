//! Rule-based skill extraction.
//!
//! A skill catalog is compiled once into token patterns; each input text is
//! then tokenized, matched, resolved into non-overlapping spans and grouped
//! per skill.
//!
//! ```text
//! SkillCatalog ─▶ compile_patterns ─▶ CompiledPatterns   (once)
//! text ─▶ Tokenizer ─▶ matcher ─▶ resolver ─▶ aggregator ─▶ SkillResults   (per text)
//! ```

use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[macro_use]
mod macros;
mod api;
mod batch;
mod catalog;
mod engine;
mod error;
mod stopwords;
mod tokenizer;

#[cfg(test)]
mod tests;

pub use api::{
    ExtractDetails, ExtractResultVerbose, MatchRecord, Options, SkillExtractor, SkillProperty, SkillResult,
    SkillResults, SourceRef, SpanSummary, compile_patterns, compile_patterns_with, extract_skills,
    extract_skills_verbose, extract_skills_with,
};
pub use batch::{
    RecordDataRequest, RecordDataResponse, RecordRequest, RecordResponse, RecordsRequest, RecordsResponse,
    ResponseMessage, extract_from_record, extract_from_records,
};
pub use catalog::{SkillCatalog, SkillEntry, Source};
pub use engine::{
    CompileOptions, CompiledPatterns, Extractor, RejectedCandidate, RunMetrics, RunResult, SplitDelimiters,
};
pub use error::{CatalogError, ExtractError};
pub use stopwords::is_stopword;
pub use tokenizer::{Tokenizer, WordTokenizer};

/// Label attached to every match record.
pub const SKILL_LABEL: &str = "SKILL";

// --- Shared types -----------------------------------------------------------

/// Half-open `[start, end)` interval. Depending on context this is a byte,
/// char or token range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Range {
    /// Start index (inclusive).
    pub start: usize,
    /// End index (exclusive).
    pub end: usize,
}

impl Range {
    pub fn new(start: usize, end: usize) -> Self {
        Range { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Half-open interval intersection.
    pub fn overlaps(&self, other: &Range) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A token produced by a [`Tokenizer`].
///
/// `range` is a byte range into the tokenized text (for slicing), `chars` the
/// same span counted in Unicode scalar values (what match records report).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'t> {
    pub text: &'t str,
    pub lower: String,
    pub range: Range,
    pub chars: Range,
}

/// A single positional constraint of a [`Pattern`].
///
/// Serialized as `{"TEXT": "AI"}` / `{"LOWER": "python"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Constraint {
    /// Token text must equal the value exactly (acronyms).
    #[serde(rename = "TEXT")]
    Text(String),
    /// Lowercased token text must equal the value.
    #[serde(rename = "LOWER")]
    Lower(String),
}

impl Constraint {
    pub fn matches(&self, token: &Token<'_>) -> bool {
        match self {
            Constraint::Text(text) => token.text == text,
            Constraint::Lower(lower) => token.lower == *lower,
        }
    }
}

/// An ordered token-sequence pattern owned by exactly one skill.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pattern {
    #[serde(rename = "skillId")]
    pub skill_id: String,
    #[serde(rename = "pattern")]
    pub constraints: Vec<Constraint>,
}

impl Pattern {
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Returns true when every constraint accepts the token at the same
    /// position of `window`. The window must be exactly as long as the pattern.
    pub fn matches_window(&self, window: &[Token<'_>]) -> bool {
        window.len() == self.constraints.len() && self.constraints.iter().zip(window).all(|(c, t)| c.matches(t))
    }
}

/// A possibly-overlapping match proposed by the matcher.
///
/// Field order matters: the derived `Ord` sorts by position first, which is
/// what the matcher's candidate set relies on for deterministic iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct CandidateMatch<'p> {
    pub start: usize,
    pub end: usize,
    pub skill_id: &'p str,
}

impl CandidateMatch<'_> {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn tokens(&self) -> Range {
        Range { start: self.start, end: self.end }
    }
}

/// Display fields of a skill, taken from its main source plus the projected
/// list of all sources.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SkillDisplay {
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub sources: Vec<SourceRef>,
}

/// A candidate accepted into the final non-overlapping annotation set.
///
/// Display fields are copied from the catalog when the span is resolved, so a
/// span is self-contained and can be moved across threads freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSpan {
    pub skill_id: String,
    /// Token range (exclusive end).
    pub tokens: Range,
    /// Char range in the input text.
    pub chars: Range,
    /// Matched substring.
    pub text: String,
    pub display: Arc<SkillDisplay>,
}
