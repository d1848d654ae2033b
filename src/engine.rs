//! Matching and resolution engine.
//!
//! ## How the parts work together
//!
//! Extraction is split into a one-off compile phase and a per-document run:
//!
//! ```text
//! catalog ──┐
//!           │  CompiledPatterns::new          (compiled_patterns.rs)
//!           └───────────────┬───────────────
//!                           │  (built once, shared read-only)
//! text ── Tokenizer ────────┼─ find_candidates (matcher.rs)
//!                           │    - first-constraint index lookup
//!                           │    - window check, BTreeSet dedup
//!                           v
//!                    resolve (resolve.rs)
//!                      - longest first, earliest start
//!                      - endpoint claims, no overlaps
//!                    annotate (resolve.rs)
//!                      - catalog lookup, main source display fields
//!                           │
//!                           v
//!                    aggregate (aggregate.rs)
//!                      - group by skill id
//!                           │
//!                           v
//!                     SkillResults
//! ```
//!
//! ## Responsibilities by module
//!
//! - `compiled_patterns.rs`: turns skill names into token patterns and
//!   indexes them by first constraint.
//! - `matcher.rs`: finds every (possibly overlapping) pattern match.
//! - `resolve.rs`: reduces candidates to a non-overlapping set and attaches
//!   display fields.
//! - `aggregate.rs`: main-source selection and per-skill grouping.
//! - `extractor.rs`: runs the stages in order for one text.
//! - `metrics.rs`: optional timing/debug data for a run.
//!
//! ## Debugging
//!
//! Stage summaries are logged with `tracing` at `debug`, per-candidate
//! decisions at `trace` (the CLI reads its filter from `SKILLEX_LOG`).

#[path = "engine/aggregate.rs"]
mod aggregate;
#[path = "engine/compiled_patterns.rs"]
mod compiled_patterns;
#[path = "engine/extractor.rs"]
mod extractor;
#[path = "engine/matcher.rs"]
mod matcher;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/resolve.rs"]
mod resolve;

pub use compiled_patterns::{CompileOptions, CompiledPatterns, SplitDelimiters};
pub use extractor::Extractor;
pub use metrics::{RejectedCandidate, RunMetrics, RunResult};

