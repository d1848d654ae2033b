//! Candidate matching.
//!
//! Scans a token sequence against the compiled patterns and reports every
//! window that satisfies a pattern, overlapping windows included:
//!
//! ```text
//! tokens:   [Machine] [Learning] [and] [AI]
//! patterns: ml = [LOWER machine][LOWER learning]
//!           learning = [LOWER learning]
//!           ai = [TEXT AI]
//!
//! candidates: (0..2 ml) (1..2 learning) (3..4 ai)
//! ```
//!
//! Candidates are collected into a `BTreeSet`, so identical
//! `(start, end, skill)` triples coming from duplicate patterns collapse and
//! iteration order does not depend on pattern order.

use super::compiled_patterns::CompiledPatterns;
use crate::{CandidateMatch, Token};
use std::collections::BTreeSet;

/// Find all candidate matches of `patterns` in `tokens`.
///
/// Only patterns whose first constraint accepts the token at a position are
/// tried there; the remaining constraints are checked against the window.
pub(crate) fn find_candidates<'p>(tokens: &[Token<'_>], patterns: &'p CompiledPatterns) -> BTreeSet<CandidateMatch<'p>> {
    let mut candidates = BTreeSet::new();

    for (start, token) in tokens.iter().enumerate() {
        for pattern in patterns.starting_with(token) {
            let end = start + pattern.len();
            if end > tokens.len() || !pattern.matches_window(&tokens[start..end]) {
                continue;
            }
            candidates.insert(CandidateMatch { start, end, skill_id: pattern.skill_id.as_str() });
        }
    }

    // Zero-width matches cannot come from non-empty patterns, but the
    // resolver relies on `start < end`.
    candidates.retain(|c| c.start < c.end);

    tracing::trace!(tokens = tokens.len(), candidates = candidates.len(), "matched patterns");
    candidates
}

#[cfg(test)]
pub(crate) fn find_candidates_exhaustive<'p>(
    tokens: &[Token<'_>],
    patterns: &'p CompiledPatterns,
) -> BTreeSet<CandidateMatch<'p>> {
    let mut candidates = BTreeSet::new();
    for pattern in patterns.patterns() {
        if pattern.is_empty() || pattern.len() > tokens.len() {
            continue;
        }
        for (start, window) in tokens.windows(pattern.len()).enumerate() {
            if pattern.matches_window(window) {
                candidates.insert(CandidateMatch { start, end: start + pattern.len(), skill_id: pattern.skill_id.as_str() });
            }
        }
    }
    candidates
}
