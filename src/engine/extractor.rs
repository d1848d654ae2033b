//! Pipeline orchestration.
//!
//! `Extractor` wires the stages together as plain sequential calls:
//!
//! ```text
//! text ─▶ Tokenizer::tokenize ─▶ find_candidates ─▶ resolve ─▶ annotate ─▶ aggregate
//!          (tokenizer.rs)         (matcher.rs)      (resolve.rs)            (aggregate.rs)
//! ```
//!
//! An extractor only borrows the catalog, patterns and tokenizer; all
//! per-document state lives on the stack of a single `run`, so one set of
//! compiled patterns can serve any number of threads at once.

use super::aggregate::aggregate;
use super::compiled_patterns::CompiledPatterns;
use super::matcher::find_candidates;
use super::metrics::{RejectedCandidate, RunMetrics, RunResult};
use super::resolve::{annotate, resolve};
use crate::api::SkillResults;
use crate::catalog::SkillCatalog;
use crate::error::ExtractError;
use crate::tokenizer::Tokenizer;
use std::time::Instant;

/// Runs the extraction pipeline over single texts.
///
/// Usage: create with `Extractor::new(&patterns, &catalog, &tokenizer)` then
/// call `run(text)` once per document.
#[derive(Clone, Copy)]
pub struct Extractor<'a> {
    patterns: &'a CompiledPatterns,
    catalog: &'a SkillCatalog,
    tokenizer: &'a dyn Tokenizer,
}

impl std::fmt::Debug for Extractor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extractor")
            .field("patterns", &self.patterns.len())
            .field("catalog", &self.catalog.len())
            .field("tokenizer", &"<tokenizer>")
            .finish()
    }
}

impl<'a> Extractor<'a> {
    pub fn new(patterns: &'a CompiledPatterns, catalog: &'a SkillCatalog, tokenizer: &'a dyn Tokenizer) -> Self {
        Extractor { patterns, catalog, tokenizer }
    }

    /// Run every stage on `text` and return timing details.
    ///
    /// Either the whole pipeline succeeds or the document fails with
    /// [`ExtractError::CatalogInconsistency`]; nothing is partially applied.
    pub fn run_with_metrics(&self, text: &str) -> Result<RunResult, ExtractError> {
        let total_start = Instant::now();
        let mut metrics = RunMetrics::default();

        let stage = Instant::now();
        let tokens = self.tokenizer.tokenize(text);
        metrics.tokenize = stage.elapsed();
        metrics.tokens = tokens.len();

        let stage = Instant::now();
        let candidates = find_candidates(&tokens, self.patterns);
        metrics.matching = stage.elapsed();
        metrics.candidates = candidates.len();

        let stage = Instant::now();
        let resolution = resolve(candidates);
        let spans = annotate(&resolution.accepted, &tokens, text, self.catalog)?;
        metrics.resolve = stage.elapsed();
        metrics.accepted = spans.len();

        let stage = Instant::now();
        let skills = aggregate(&spans);
        metrics.aggregate = stage.elapsed();
        metrics.total = total_start.elapsed();

        tracing::debug!(
            tokens = metrics.tokens,
            candidates = metrics.candidates,
            accepted = metrics.accepted,
            skills = skills.len(),
            "extracted skills"
        );

        let rejected = resolution
            .rejected
            .iter()
            .map(|c| RejectedCandidate { skill_id: c.skill_id.to_string(), start: c.start, end: c.end })
            .collect();

        Ok(RunResult { skills, spans, rejected, metrics })
    }

    /// Run the pipeline and keep only the per-skill results.
    pub fn run(&self, text: &str) -> Result<SkillResults, ExtractError> {
        self.run_with_metrics(text).map(|r| r.skills)
    }
}
