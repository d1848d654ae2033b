use crate::batch::{RecordsRequest, RecordsResponse, extract_from_records};
use crate::catalog::{SkillCatalog, SkillEntry};
use crate::engine::{CompileOptions, CompiledPatterns, Extractor, RejectedCandidate};
use crate::error::ExtractError;
use crate::tokenizer::{Tokenizer, WordTokenizer};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;
use std::time::Duration;

/// One occurrence of a skill in the input.
///
/// `start`/`end` are char offsets into the original text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub start: usize,
    pub end: usize,
    /// Always [`SKILL_LABEL`](crate::SKILL_LABEL).
    pub label: String,
    /// Slice of the original input that matched.
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    pub name: String,
    pub url: String,
}

/// Everything found for one skill in one text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillResult {
    /// Matches in text order.
    pub matches: Vec<MatchRecord>,
    pub display_name: Option<String>,
    /// Main source `shortDescription`.
    pub description: Option<String>,
    /// Main source `longDescription`.
    pub long_description: Option<String>,
    /// All sources of the skill, in catalog order.
    pub sources: Vec<SourceRef>,
}

/// Per-skill results keyed by skill id.
pub type SkillResults = BTreeMap<String, SkillResult>;

/// Which property of a found skill callers want back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SkillProperty {
    #[default]
    Id,
    /// The display name; skills without one fall back to their id.
    Name,
}

impl SkillProperty {
    pub fn project(self, skill_id: &str, result: &SkillResult) -> String {
        match self {
            SkillProperty::Id => skill_id.to_string(),
            SkillProperty::Name => result.display_name.clone().unwrap_or_else(|| skill_id.to_string()),
        }
    }

    /// Sorted, de-duplicated projection of `results`.
    pub fn project_all(self, results: &SkillResults) -> Vec<String> {
        results.iter().map(|(id, r)| self.project(id, r)).collect::<BTreeSet<_>>().into_iter().collect()
    }
}

impl FromStr for SkillProperty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(SkillProperty::Id),
            "name" | "standardizedName" => Ok(SkillProperty::Name),
            other => Err(format!("unknown skill property '{other}' (expected 'id' or 'name')")),
        }
    }
}

/// Options that affect how results are projected.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub skill_property: SkillProperty,
}

/// Compile `catalog` with default options (all split delimiters).
pub fn compile_patterns(catalog: &SkillCatalog) -> CompiledPatterns {
    compile_patterns_with(catalog, &CompileOptions::default())
}

pub fn compile_patterns_with(catalog: &SkillCatalog, options: &CompileOptions) -> CompiledPatterns {
    CompiledPatterns::new(catalog, options)
}

/// Extract skills from `text` using the default [`WordTokenizer`].
///
/// # Example
/// ```
/// use skillex::{SkillCatalog, compile_patterns, extract_skills};
///
/// let catalog = SkillCatalog::from_json_str(
///     r#"{"rust": {"aliases": ["Rust"], "sources": [{"sourceName": "Github Topics", "displayName": "Rust", "url": ""}]}}"#,
/// )
/// .unwrap();
/// let patterns = compile_patterns(&catalog);
/// let found = extract_skills("We write Rust.", &patterns, &catalog).unwrap();
/// assert_eq!(found["rust"].matches[0].text, "Rust");
/// ```
pub fn extract_skills(
    text: &str,
    patterns: &CompiledPatterns,
    catalog: &SkillCatalog,
) -> Result<SkillResults, ExtractError> {
    extract_skills_with(text, &WordTokenizer, patterns, catalog)
}

/// Extract skills from `text` with a caller-supplied tokenizer.
pub fn extract_skills_with(
    text: &str,
    tokenizer: &dyn Tokenizer,
    patterns: &CompiledPatterns,
    catalog: &SkillCatalog,
) -> Result<SkillResults, ExtractError> {
    Extractor::new(patterns, catalog, tokenizer).run(text)
}

/// A compact summary of an accepted span, used in verbose output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanSummary {
    pub skill_id: String,
    pub tokens: (usize, usize),
    pub chars: (usize, usize),
    pub text: String,
}

/// Additional details returned by [`extract_skills_verbose`].
#[derive(Debug, Clone)]
pub struct ExtractDetails {
    pub total: Duration,
    pub tokenize: Duration,
    pub matching: Duration,
    pub resolve: Duration,
    pub aggregate: Duration,
    pub tokens: usize,
    pub candidates: usize,
    pub spans: Vec<SpanSummary>,
    /// Candidates dropped because they overlapped a preferred span.
    pub rejected: Vec<RejectedCandidate>,
}

#[derive(Debug, Clone)]
pub struct ExtractResultVerbose {
    pub text: String,
    pub skills: SkillResults,
    pub elapsed: Duration,
    pub details: ExtractDetails,
}

/// Extract skills and return stage timings plus accepted/rejected spans.
pub fn extract_skills_verbose(
    text: &str,
    tokenizer: &dyn Tokenizer,
    patterns: &CompiledPatterns,
    catalog: &SkillCatalog,
) -> Result<ExtractResultVerbose, ExtractError> {
    let run = Extractor::new(patterns, catalog, tokenizer).run_with_metrics(text)?;
    let m = run.metrics;

    let spans = run
        .spans
        .iter()
        .map(|s| SpanSummary {
            skill_id: s.skill_id.clone(),
            tokens: (s.tokens.start, s.tokens.end),
            chars: (s.chars.start, s.chars.end),
            text: s.text.clone(),
        })
        .collect();

    let details = ExtractDetails {
        total: m.total,
        tokenize: m.tokenize,
        matching: m.matching,
        resolve: m.resolve,
        aggregate: m.aggregate,
        tokens: m.tokens,
        candidates: m.candidates,
        spans,
        rejected: run.rejected,
    };

    Ok(ExtractResultVerbose { text: text.to_string(), skills: run.skills, elapsed: m.total, details })
}

/// Catalog, compiled patterns and tokenizer bundled for repeated use.
///
/// Build once at start-up; afterwards it is only read, so a shared reference
/// can be used from many threads.
pub struct SkillExtractor {
    catalog: SkillCatalog,
    patterns: CompiledPatterns,
    tokenizer: Box<dyn Tokenizer>,
}

impl std::fmt::Debug for SkillExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkillExtractor")
            .field("skills", &self.catalog.len())
            .field("patterns", &self.patterns.len())
            .field("tokenizer", &"<tokenizer>")
            .finish()
    }
}

impl SkillExtractor {
    pub fn new(catalog: SkillCatalog) -> Self {
        Self::with_options(catalog, &CompileOptions::default())
    }

    pub fn with_options(catalog: SkillCatalog, options: &CompileOptions) -> Self {
        let patterns = compile_patterns_with(&catalog, options);
        Self::from_parts(catalog, patterns)
    }

    /// Use patterns compiled elsewhere (for example read back with
    /// [`CompiledPatterns::read_jsonl`]).
    pub fn from_parts(catalog: SkillCatalog, patterns: CompiledPatterns) -> Self {
        SkillExtractor { catalog, patterns, tokenizer: Box::new(WordTokenizer) }
    }

    pub fn with_tokenizer(mut self, tokenizer: impl Tokenizer + 'static) -> Self {
        self.tokenizer = Box::new(tokenizer);
        self
    }

    pub fn catalog(&self) -> &SkillCatalog {
        &self.catalog
    }

    pub fn patterns(&self) -> &CompiledPatterns {
        &self.patterns
    }

    /// Look up a catalog entry by id.
    pub fn skill(&self, skill_id: &str) -> Option<&SkillEntry> {
        self.catalog.get(skill_id)
    }

    pub fn extractor(&self) -> Extractor<'_> {
        Extractor::new(&self.patterns, &self.catalog, self.tokenizer.as_ref())
    }

    pub fn extract(&self, text: &str) -> Result<SkillResults, ExtractError> {
        self.extractor().run(text)
    }

    pub fn extract_verbose(&self, text: &str) -> Result<ExtractResultVerbose, ExtractError> {
        extract_skills_verbose(text, self.tokenizer.as_ref(), &self.patterns, &self.catalog)
    }

    /// Process a batch of records in parallel.
    pub fn extract_records(&self, request: &RecordsRequest, options: &Options) -> RecordsResponse {
        extract_from_records(&self.extractor(), &request.values, options.skill_property)
    }
}
