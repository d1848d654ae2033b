//! Extraction run metrics.
//!
//! `Extractor::run_with_metrics` times each pipeline stage and counts what it
//! produced. The plain `run` path discards these; the verbose API and the CLI
//! report surface them.

use crate::ResolvedSpan;
use crate::api::SkillResults;
use std::time::Duration;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunMetrics {
    /// Total elapsed time for [`Extractor::run_with_metrics`](super::Extractor::run_with_metrics).
    pub total: Duration,
    pub tokenize: Duration,
    pub matching: Duration,
    /// Time spent resolving overlaps and annotating spans.
    pub resolve: Duration,
    pub aggregate: Duration,
    pub tokens: usize,
    pub candidates: usize,
    pub accepted: usize,
}

/// A candidate dropped during resolution, kept for debugging output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedCandidate {
    pub skill_id: String,
    pub start: usize,
    pub end: usize,
}

/// Extractor output bundled with timing information.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub skills: SkillResults,
    /// Accepted spans, ordered by start.
    pub spans: Vec<ResolvedSpan>,
    pub rejected: Vec<RejectedCandidate>,
    pub metrics: RunMetrics,
}
