//! Pattern compilation and indexing.
//!
//! This module holds the *static* side of the engine: the token patterns
//! derived from the skill catalog, built once at start-up and shared
//! read-only by every extraction run.
//!
//! ## Compilation rules
//!
//! For each skill, the candidate names are its aliases followed by every
//! source `displayName` (first occurrence wins on duplicates). Each name is
//! turned into patterns as follows:
//!
//! ```text
//! "AI"               (acronym)  -> [TEXT "AI"]
//! "Machine Learning"            -> [LOWER "machine"] [LOWER "learning"]
//! "Node.js"                     -> [LOWER "node.js"]
//!                      split "." -> [LOWER "node"] [LOWER "js"]
//! "CI/CD"            (acronym)  -> [TEXT "CI"] [TEXT "/"] [TEXT "CD"]
//!                      split "/" -> [TEXT "CI"] [TEXT "CD"]
//! "the"              (stopword) -> (nothing)
//! ```
//!
//! Names are cut into words with [`WordTokenizer`], so a pattern lines up with
//! the tokens the default tokenizer produces for the same text. A name is an
//! acronym when its uppercase form equals itself; acronyms keep their case,
//! match exactly, and are never stopword-filtered.
//!
//! ## Invariants
//!
//! - Every stored pattern has at least one constraint.
//! - `PatternId` is an index into `CompiledPatterns::patterns`; `by_skill` and
//!   the first-constraint index only hold ids, so they stay aligned.
//! - The first-constraint index only prunes the search: a pattern is listed
//!   under exactly the key its first constraint requires, so every window the
//!   full scan would accept is still visited.

use crate::catalog::{SkillCatalog, SkillEntry};
use crate::error::CatalogError;
use crate::stopwords::is_stopword;
use crate::tokenizer::{Tokenizer, WordTokenizer};
use crate::{Constraint, Pattern, Token};
use std::collections::{BTreeMap, HashMap};
use std::io::{BufRead, Write};

/// Pattern identifier (index into the patterns vector).
pub(crate) type PatternId = usize;

bitflags::bitflags! {
    /// Delimiters that produce an extra split variant of a name.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SplitDelimiters: u8 {
        const DOT    = 1 << 0;
        const SLASH  = 1 << 1;
        const HYPHEN = 1 << 2;
    }
}

impl SplitDelimiters {
    fn chars(self) -> impl Iterator<Item = char> {
        [(SplitDelimiters::DOT, '.'), (SplitDelimiters::SLASH, '/'), (SplitDelimiters::HYPHEN, '-')]
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, c)| c)
    }
}

impl Default for SplitDelimiters {
    fn default() -> Self {
        SplitDelimiters::all()
    }
}

/// Options for [`CompiledPatterns::new`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CompileOptions {
    pub delimiters: SplitDelimiters,
}

/// Patterns indexed by their first constraint.
#[derive(Debug, Clone, Default)]
struct PatternIndex {
    by_text: HashMap<String, Vec<PatternId>>,
    by_lower: HashMap<String, Vec<PatternId>>,
}

/// Compiled pattern set, grouped by skill id.
#[derive(Debug, Clone, Default)]
pub struct CompiledPatterns {
    patterns: Vec<Pattern>,
    by_skill: BTreeMap<String, Vec<PatternId>>,
    index: PatternIndex,
}

impl CompiledPatterns {
    /// Compile every skill of `catalog`.
    pub fn new(catalog: &SkillCatalog, options: &CompileOptions) -> Self {
        let mut patterns = Vec::new();
        for entry in catalog.iter() {
            let before = patterns.len();
            for name in skill_names(entry) {
                patterns.extend(compile_name(&entry.id, name, options.delimiters));
            }
            if patterns.len() == before {
                tracing::debug!(skill = %entry.id, "skill produced no patterns");
            }
        }

        let compiled = Self::from_patterns(patterns);
        tracing::info!(skills = catalog.len(), patterns = compiled.len(), "compiled skill patterns");
        compiled
    }

    /// Build the indexes over an existing pattern list. Empty patterns are
    /// dropped since they can never produce a non-empty match.
    pub fn from_patterns(patterns: impl IntoIterator<Item = Pattern>) -> Self {
        let patterns: Vec<Pattern> = patterns.into_iter().filter(|p| !p.is_empty()).collect();

        let mut by_skill: BTreeMap<String, Vec<PatternId>> = BTreeMap::new();
        let mut index = PatternIndex::default();

        for (id, pattern) in patterns.iter().enumerate() {
            by_skill.entry(pattern.skill_id.clone()).or_default().push(id);
            match &pattern.constraints[0] {
                Constraint::Text(text) => index.by_text.entry(text.clone()).or_default().push(id),
                Constraint::Lower(lower) => index.by_lower.entry(lower.clone()).or_default().push(id),
            }
        }

        CompiledPatterns { patterns, by_skill, index }
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Patterns owned by `skill_id`, in compilation order.
    pub fn patterns_for(&self, skill_id: &str) -> Vec<&Pattern> {
        self.by_skill.get(skill_id).map(|ids| ids.iter().map(|&id| &self.patterns[id]).collect()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Patterns whose first constraint accepts `token`, in id order.
    pub(crate) fn starting_with<'s>(&'s self, token: &Token<'_>) -> impl Iterator<Item = &'s Pattern> + 's {
        let exact = self.index.by_text.get(token.text).map(Vec::as_slice).unwrap_or(&[]);
        let lower = self.index.by_lower.get(token.lower.as_str()).map(Vec::as_slice).unwrap_or(&[]);
        exact.iter().chain(lower).map(move |&id| &self.patterns[id])
    }

    /// Write one JSON object per line (`{"skillId": .., "pattern": [..]}`).
    pub fn write_jsonl<W: Write>(&self, mut writer: W) -> Result<(), CatalogError> {
        for pattern in &self.patterns {
            serde_json::to_writer(&mut writer, pattern)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Read patterns previously written by [`write_jsonl`](Self::write_jsonl).
    /// Blank lines are ignored.
    pub fn read_jsonl<R: BufRead>(reader: R) -> Result<Self, CatalogError> {
        let mut patterns = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            patterns.push(serde_json::from_str::<Pattern>(&line)?);
        }
        Ok(Self::from_patterns(patterns))
    }
}

/// Candidate names of a skill: aliases, then source display names, without
/// repeats.
fn skill_names(entry: &SkillEntry) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    let display_names = entry.sources.iter().filter_map(|s| s.display_name.as_deref());
    for name in entry.aliases.iter().map(String::as_str).chain(display_names) {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

fn is_acronym(name: &str) -> bool {
    name.to_uppercase() == name
}

fn constraints<'a>(pieces: impl Iterator<Item = &'a str>, acronym: bool) -> Vec<Constraint> {
    pieces
        .flat_map(|piece| WordTokenizer.tokenize(piece))
        .map(|t| if acronym { Constraint::Text(t.text.to_string()) } else { Constraint::Lower(t.text.to_string()) })
        .collect()
}

/// Compile a single name into its base pattern plus one split variant per
/// delimiter it contains. The split variant drops the delimiter token.
pub(crate) fn compile_name(skill_id: &str, name: &str, delimiters: SplitDelimiters) -> Vec<Pattern> {
    let acronym = is_acronym(name);
    let normalized = if acronym { name.trim().to_string() } else { name.trim().to_lowercase() };

    if normalized.is_empty() {
        return Vec::new();
    }
    if !acronym && is_stopword(&normalized) {
        tracing::debug!(skill = %skill_id, name = %name, "skipping stopword name");
        return Vec::new();
    }

    let mut out = Vec::new();
    let base = constraints(std::iter::once(normalized.as_str()), acronym);
    if base.is_empty() {
        return out;
    }
    out.push(Pattern { skill_id: skill_id.to_string(), constraints: base });

    for delimiter in delimiters.chars() {
        if !normalized.contains(delimiter) {
            continue;
        }
        let split = constraints(normalized.split(delimiter), acronym);
        if !split.is_empty() {
            out.push(Pattern { skill_id: skill_id.to_string(), constraints: split });
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Source;

    fn lower(words: &[&str]) -> Vec<Constraint> {
        words.iter().map(|w| Constraint::Lower(w.to_string())).collect()
    }

    fn text(words: &[&str]) -> Vec<Constraint> {
        words.iter().map(|w| Constraint::Text(w.to_string())).collect()
    }

    fn shapes(patterns: &[Pattern]) -> Vec<Vec<Constraint>> {
        patterns.iter().map(|p| p.constraints.clone()).collect()
    }

    #[test]
    fn multi_word_name_becomes_lowercase_constraints() {
        let out = compile_name("ml", "  Machine Learning ", SplitDelimiters::all());
        assert_eq!(shapes(&out), vec![lower(&["machine", "learning"])]);
        assert_eq!(out[0].skill_id, "ml");
    }

    #[test]
    fn acronym_keeps_case_and_matches_exactly() {
        let out = compile_name("ai", "AI", SplitDelimiters::all());
        assert_eq!(shapes(&out), vec![text(&["AI"])]);
    }

    #[test]
    fn stopwords_are_dropped_unless_acronym() {
        assert!(compile_name("x", "the", SplitDelimiters::all()).is_empty());
        assert!(compile_name("x", "The", SplitDelimiters::all()).is_empty());
        assert_eq!(shapes(&compile_name("it", "IT", SplitDelimiters::all())), vec![text(&["IT"])]);
    }

    #[test]
    fn blank_names_produce_nothing() {
        assert!(compile_name("x", "", SplitDelimiters::all()).is_empty());
        assert!(compile_name("x", "   ", SplitDelimiters::all()).is_empty());
    }

    #[test]
    fn delimiters_add_split_variants() {
        let out = compile_name("node", "Node.js", SplitDelimiters::all());
        assert_eq!(shapes(&out), vec![lower(&["node.js"]), lower(&["node", "js"])]);

        let out = compile_name("cicd", "CI/CD", SplitDelimiters::all());
        assert_eq!(shapes(&out), vec![text(&["CI", "/", "CD"]), text(&["CI", "CD"])]);

        let out = compile_name("x", "a.b/c-d", SplitDelimiters::all());
        assert_eq!(
            shapes(&out),
            vec![
                lower(&["a.b", "/", "c", "-", "d"]),
                lower(&["a", "b", "/", "c", "-", "d"]),
                lower(&["a.b", "c", "-", "d"]),
                lower(&["a.b", "/", "c", "d"]),
            ]
        );
    }

    #[test]
    fn names_split_like_the_default_tokenizer() {
        let out = compile_name("cpp", "C++", SplitDelimiters::all());
        assert_eq!(shapes(&out), vec![text(&["C++"])]);
        let out = compile_name("x", "Kubernetes Operators", SplitDelimiters::all());
        assert_eq!(shapes(&out), vec![lower(&["kubernetes", "operators"])]);
    }

    #[test]
    fn disabled_delimiters_are_not_split() {
        let out = compile_name("x", "real-time", SplitDelimiters::DOT | SplitDelimiters::SLASH);
        assert_eq!(shapes(&out), vec![lower(&["real", "-", "time"])]);
    }

    #[test]
    fn split_pieces_are_trimmed_and_empty_pieces_dropped() {
        let out = compile_name("x", "ci / cd", SplitDelimiters::SLASH);
        assert_eq!(shapes(&out), vec![lower(&["ci", "/", "cd"]), lower(&["ci", "cd"])]);
        let out = compile_name("x", "net.", SplitDelimiters::DOT);
        assert_eq!(shapes(&out), vec![lower(&["net", "."]), lower(&["net"])]);
    }

    #[test]
    fn compiles_aliases_and_display_names_once_each() {
        let entry = SkillEntry::new(
            "ml",
            vec!["Machine Learning".to_string(), "ML".to_string()],
            vec![
                Source { source_name: "a".into(), display_name: Some("Machine Learning".into()), ..Default::default() },
                Source { source_name: "b".into(), display_name: None, ..Default::default() },
                Source { source_name: "c".into(), display_name: Some("machine-learning".into()), ..Default::default() },
            ],
        );
        let compiled = CompiledPatterns::new(&SkillCatalog::from_entries([entry]), &CompileOptions::default());
        let got: Vec<Vec<Constraint>> = compiled.patterns_for("ml").into_iter().map(|p| p.constraints.clone()).collect();
        assert_eq!(
            got,
            vec![
                lower(&["machine", "learning"]),
                text(&["ML"]),
                lower(&["machine", "-", "learning"]),
                lower(&["machine", "learning"]),
            ]
        );
    }

    #[test]
    fn skill_without_names_compiles_to_nothing() {
        let entry = SkillEntry::new("ghost", Vec::new(), vec![Source { source_name: "x".into(), ..Default::default() }]);
        let compiled = CompiledPatterns::new(&SkillCatalog::from_entries([entry]), &CompileOptions::default());
        assert!(compiled.is_empty());
        assert!(compiled.patterns_for("ghost").is_empty());
    }

    #[test]
    fn jsonl_round_trip_preserves_patterns() {
        let patterns = compile_name("ai", "AI", SplitDelimiters::all())
            .into_iter()
            .chain(compile_name("ml", "Machine Learning", SplitDelimiters::all()));
        let compiled = CompiledPatterns::from_patterns(patterns);

        let mut buf = Vec::new();
        compiled.write_jsonl(&mut buf).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert_eq!(text.lines().next(), Some(r#"{"skillId":"ai","pattern":[{"TEXT":"AI"}]}"#));

        let back = CompiledPatterns::read_jsonl(buf.as_slice()).unwrap();
        assert_eq!(back.patterns(), compiled.patterns());
    }
}
