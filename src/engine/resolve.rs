//! Span resolution.
//!
//! The matcher proposes overlapping candidates; resolution keeps a maximal
//! non-overlapping subset using a greedy longest-match-first policy:
//!
//! ```text
//! candidates sorted by (len desc, start asc, skill asc)
//!   │
//!   ├─ start or end-1 already claimed? ──▶ rejected
//!   └─ otherwise accept, claim [start, end-1]
//! ```
//!
//! Because longer candidates are visited first, a later candidate can only
//! overlap an accepted one by touching one of its own endpoints, so checking
//! the two endpoints is enough to keep accepted spans disjoint.
//!
//! Accepted candidates are then annotated: each one is looked up in the
//! catalog and its display fields are copied onto the resulting
//! `ResolvedSpan`.

use super::aggregate::skill_display;
use crate::catalog::SkillCatalog;
use crate::error::ExtractError;
use crate::{CandidateMatch, Range, ResolvedSpan, SkillDisplay, Token};
use std::collections::HashMap;
use std::sync::Arc;

/// Output of [`resolve`].
#[derive(Debug, Clone, Default)]
pub(crate) struct Resolution<'p> {
    /// Accepted candidates, ordered by start.
    pub accepted: Vec<CandidateMatch<'p>>,
    /// Candidates dropped because they overlap an accepted one, in visit order.
    pub rejected: Vec<CandidateMatch<'p>>,
}

/// Reduce `candidates` to a non-overlapping set.
pub(crate) fn resolve<'p>(candidates: impl IntoIterator<Item = CandidateMatch<'p>>) -> Resolution<'p> {
    let mut sorted: Vec<CandidateMatch<'p>> = candidates.into_iter().filter(|c| c.start < c.end).collect();
    sorted.sort_by(|a, b| {
        b.len().cmp(&a.len()).then(a.start.cmp(&b.start)).then(a.skill_id.cmp(b.skill_id)).then(a.end.cmp(&b.end))
    });

    let width = sorted.iter().map(|c| c.end).max().unwrap_or(0);
    let mut claimed = vec![false; width];
    let mut resolution = Resolution::default();

    for candidate in sorted {
        if claimed[candidate.start] || claimed[candidate.end - 1] {
            tracing::trace!(skill = candidate.skill_id, start = candidate.start, end = candidate.end, "rejected");
            resolution.rejected.push(candidate);
            continue;
        }
        claimed[candidate.start..candidate.end].iter_mut().for_each(|slot| *slot = true);
        tracing::trace!(skill = candidate.skill_id, start = candidate.start, end = candidate.end, "accepted");
        resolution.accepted.push(candidate);
    }

    resolution.accepted.sort_by_key(|c| (c.start, c.end));
    resolution
}

/// Turn accepted candidates into `ResolvedSpan`s carrying their display
/// fields.
///
/// Display fields are computed once per skill and shared between that
/// skill's spans. A candidate whose skill is missing from `catalog` aborts
/// the whole document with [`ExtractError::CatalogInconsistency`].
pub(crate) fn annotate(
    accepted: &[CandidateMatch<'_>],
    tokens: &[Token<'_>],
    text: &str,
    catalog: &SkillCatalog,
) -> Result<Vec<ResolvedSpan>, ExtractError> {
    let mut displays: HashMap<&str, Arc<SkillDisplay>> = HashMap::new();
    let mut spans = Vec::with_capacity(accepted.len());

    for candidate in accepted {
        let display = match displays.get(candidate.skill_id) {
            Some(display) => Arc::clone(display),
            None => {
                let entry = catalog
                    .get(candidate.skill_id)
                    .ok_or_else(|| ExtractError::CatalogInconsistency { skill_id: candidate.skill_id.to_string() })?;
                let display = Arc::new(skill_display(entry));
                displays.insert(candidate.skill_id, Arc::clone(&display));
                display
            }
        };

        let first = &tokens[candidate.start];
        let last = &tokens[candidate.end - 1];
        spans.push(ResolvedSpan {
            skill_id: candidate.skill_id.to_string(),
            tokens: candidate.tokens(),
            chars: Range { start: first.chars.start, end: last.chars.end },
            text: text[first.range.start..last.range.end].to_string(),
            display,
        });
    }

    Ok(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cand(skill_id: &'static str, start: usize, end: usize) -> CandidateMatch<'static> {
        CandidateMatch { start, end, skill_id }
    }

    fn accepted_ids<'a>(resolution: &'a Resolution<'a>) -> Vec<(&'a str, usize, usize)> {
        resolution.accepted.iter().map(|c| (c.skill_id, c.start, c.end)).collect()
    }

    #[test]
    fn longest_candidate_wins_at_same_start() {
        let res = resolve([cand("learning", 1, 2), cand("ml", 0, 2), cand("machine", 0, 1)]);
        assert_eq!(accepted_ids(&res), vec![("ml", 0, 2)]);
        assert_eq!(res.rejected.len(), 2);
    }

    #[test]
    fn earliest_start_wins_among_equal_lengths() {
        // "big data science": (big data) and (data science) both cover "data".
        let res = resolve([cand("ds", 1, 3), cand("bd", 0, 2)]);
        assert_eq!(accepted_ids(&res), vec![("bd", 0, 2)]);
        assert_eq!(res.rejected, vec![cand("ds", 1, 3)]);
    }

    #[test]
    fn disjoint_candidates_are_all_kept_in_text_order() {
        let res = resolve([cand("c", 5, 6), cand("a", 0, 1), cand("b", 2, 4)]);
        assert_eq!(accepted_ids(&res), vec![("a", 0, 1), ("b", 2, 4), ("c", 5, 6)]);
        assert!(res.rejected.is_empty());
    }

    #[test]
    fn same_span_different_skills_keeps_lowest_id() {
        let res = resolve([cand("zeta", 0, 1), cand("alpha", 0, 1)]);
        assert_eq!(accepted_ids(&res), vec![("alpha", 0, 1)]);
    }

    #[test]
    fn zero_width_candidates_are_ignored() {
        let res = resolve([cand("x", 3, 3), cand("y", 0, 1)]);
        assert_eq!(accepted_ids(&res), vec![("y", 0, 1)]);
        assert!(res.rejected.is_empty());
    }

    #[test]
    fn empty_input_resolves_to_nothing() {
        let res = resolve(Vec::new());
        assert!(res.accepted.is_empty() && res.rejected.is_empty());
    }

    #[test]
    fn annotate_reports_unknown_skill() {
        let tokens = crate::tokenizer::Tokenizer::tokenize(&crate::WordTokenizer, "Rust");
        let err = annotate(&[cand("rust", 0, 1)], &tokens, "Rust", &SkillCatalog::default()).unwrap_err();
        assert_eq!(err, ExtractError::CatalogInconsistency { skill_id: "rust".to_string() });
    }

    const IDS: [&str; 3] = ["a", "b", "c"];

    fn arb_candidate() -> impl Strategy<Value = CandidateMatch<'static>> {
        (0usize..20, 1usize..5, 0usize..3).prop_map(|(start, len, skill)| cand(IDS[skill], start, start + len))
    }

    proptest! {
        #[test]
        fn accepted_spans_never_overlap(cands in prop::collection::vec(arb_candidate(), 0..30)) {
            let res = resolve(cands.clone());
            for (i, a) in res.accepted.iter().enumerate() {
                for b in &res.accepted[i + 1..] {
                    prop_assert!(!a.tokens().overlaps(&b.tokens()), "{:?} overlaps {:?}", a, b);
                }
            }
            prop_assert_eq!(res.accepted.len() + res.rejected.len(), cands.len());
        }

        #[test]
        fn every_rejected_candidate_overlaps_an_accepted_one(cands in prop::collection::vec(arb_candidate(), 0..30)) {
            let res = resolve(cands);
            for r in &res.rejected {
                prop_assert!(res.accepted.iter().any(|a| a.tokens().overlaps(&r.tokens())));
            }
        }

        #[test]
        fn resolution_ignores_input_order(mut cands in prop::collection::vec(arb_candidate(), 0..30)) {
            let forward = resolve(cands.clone()).accepted;
            cands.reverse();
            prop_assert_eq!(forward, resolve(cands).accepted);
        }
    }
}
