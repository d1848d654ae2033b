//! Per-skill aggregation.
//!
//! Groups resolved spans by skill id into `SkillResult`s. Some sources
//! describe skills better than others, so display fields come from a
//! *main source* picked by a fixed priority:
//!
//! ```text
//! first "Github Topics"
//!   else first "Microsoft Academic Topics"
//!   else first "Stackshare Skills"
//!   else sources[0]
//! ```
//!
//! `description` is the main source's `shortDescription`; its
//! `longDescription` is reported separately as `long_description`.

use crate::api::{MatchRecord, SkillResult, SkillResults, SourceRef};
use crate::catalog::{SkillEntry, Source};
use crate::{ResolvedSpan, SKILL_LABEL, SkillDisplay};

/// Source names in descending preference.
pub(crate) const SOURCE_PRIORITY: [&str; 3] = ["Github Topics", "Microsoft Academic Topics", "Stackshare Skills"];

/// Pick the main source of a skill. `None` only when `sources` is empty.
pub(crate) fn main_source(sources: &[Source]) -> Option<&Source> {
    SOURCE_PRIORITY
        .iter()
        .find_map(|name| sources.iter().find(|s| s.source_name == *name))
        .or_else(|| sources.first())
}

/// Display fields for `entry`: main-source fields plus every source as
/// `{name, url}`.
pub(crate) fn skill_display(entry: &SkillEntry) -> SkillDisplay {
    let main = main_source(&entry.sources);
    SkillDisplay {
        display_name: main.and_then(|s| s.display_name.clone()),
        description: main.and_then(|s| s.short_description.clone()),
        long_description: main.and_then(|s| s.long_description.clone()),
        sources: entry.sources.iter().map(|s| SourceRef { name: s.source_name.clone(), url: s.url.clone() }).collect(),
    }
}

/// Group `spans` by skill. Matches accumulate in span order; display fields
/// are taken from the first span of each skill.
pub(crate) fn aggregate(spans: &[ResolvedSpan]) -> SkillResults {
    let mut results = SkillResults::new();

    for span in spans {
        let result = results.entry(span.skill_id.clone()).or_insert_with(|| SkillResult {
            matches: Vec::new(),
            display_name: span.display.display_name.clone(),
            description: span.display.description.clone(),
            long_description: span.display.long_description.clone(),
            sources: span.display.sources.clone(),
        });
        result.matches.push(MatchRecord {
            start: span.chars.start,
            end: span.chars.end,
            label: SKILL_LABEL.to_string(),
            text: span.text.clone(),
        });
    }

    results
}
