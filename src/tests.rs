use crate::{
    CompiledPatterns, MatchRecord, SkillCatalog, SkillEntry, SkillResults, Source, compile_patterns, extract_skills,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn entry(id: &str, aliases: &[&str]) -> SkillEntry {
    SkillEntry::new(id, aliases.iter().map(|a| a.to_string()).collect(), Vec::new())
}

fn catalog() -> SkillCatalog {
    SkillCatalog::from_entries([
        entry("ml", &["Machine Learning"]),
        entry("learning", &["Learning"]),
        entry("da", &["Data Analysis"]),
        entry("ai", &["AI"]),
        entry("ml-abbr", &["ML"]),
        entry("python", &["python"]),
        entry("the", &["the"]),
        entry("bd", &["big data"]),
        entry("ds", &["data science"]),
        entry("node", &["Node.js"]),
        entry("cicd", &["CI/CD"]),
    ])
}

fn run(text: &str) -> SkillResults {
    let catalog = catalog();
    let patterns = compile_patterns(&catalog);
    extract_skills(text, &patterns, &catalog).unwrap()
}

fn found(text: &str) -> Vec<String> {
    run(text).into_keys().collect()
}

#[test]
fn skill_examples_matching() {
    // (input, expected skill ids)
    let cases: Vec<(&str, Vec<&str>)> = vec![
        ("", vec![]),
        ("nothing to see here", vec![]),
        ("Machine Learning", vec!["ml"]),
        ("machine learning and learning", vec!["learning", "ml"]),
        ("Learning", vec!["learning"]),
        ("AI", vec!["ai"]),
        ("ai", vec![]),
        ("Ai", vec![]),
        ("python", vec!["python"]),
        ("Python", vec!["python"]),
        ("PYTHON", vec!["python"]),
        ("the", vec![]),
        ("The end", vec![]),
        ("big data science", vec!["bd"]),
        ("data science, big data", vec!["bd", "ds"]),
        ("Built with Node.js.", vec!["node"]),
        ("node js", vec!["node"]),
        ("CI/CD pipelines", vec!["cicd"]),
        ("CI CD", vec!["cicd"]),
        ("ci/cd", vec![]),
        ("Python's ecosystem", vec!["python"]),
        ("AI-driven products", vec!["ai"]),
        ("ML/AI roles", vec!["ai", "ml-abbr"]),
        ("Machine Learning-based tools", vec!["ml"]),
    ];

    for (input, expected) in cases {
        let expected: Vec<String> = expected.into_iter().map(String::from).collect();
        assert_eq!(found(input), expected, "input: {input:?}");
    }
}

#[test]
fn job_posting_end_to_end() {
    let catalog = SkillCatalog::from_entries([entry("ml", &["Machine Learning"]), entry("da", &["Data Analysis"])]);
    let patterns = compile_patterns(&catalog);
    let text = "This job requires Machine Learning and Data Analysis";
    let res = extract_skills(text, &patterns, &catalog).unwrap();

    assert_eq!(res.len(), 2);
    assert_eq!(
        res["ml"].matches,
        vec![MatchRecord { start: 18, end: 34, label: "SKILL".into(), text: "Machine Learning".into() }]
    );
    assert_eq!(
        res["da"].matches,
        vec![MatchRecord { start: 39, end: 52, label: "SKILL".into(), text: "Data Analysis".into() }]
    );
    for result in res.values() {
        let m = &result.matches[0];
        assert_eq!(text.chars().skip(m.start).take(m.end - m.start).collect::<String>(), m.text);
    }
}

#[test]
fn longest_match_suppresses_contained_skill() {
    let res = run("Machine Learning");
    assert_eq!(res.len(), 1);
    assert_eq!(res["ml"].matches.len(), 1);
}

#[test]
fn repeated_skill_accumulates_matches_in_text_order() {
    let res = run("AI first, then AI again");
    let starts: Vec<usize> = res["ai"].matches.iter().map(|m| m.start).collect();
    assert_eq!(starts, vec![0, 15]);
}

#[test]
fn char_offsets_count_unicode_scalars() {
    let res = run("Café → Machine Learning");
    assert_eq!(res["ml"].matches[0].start, 7);
    assert_eq!(res["ml"].matches[0].end, 23);
}

#[test]
fn display_fields_follow_main_source() {
    let catalog = SkillCatalog::from_entries([SkillEntry::new(
        "foo",
        vec!["foo".into()],
        vec![
            Source { source_name: "X".into(), display_name: Some("x".into()), url: "u1".into(), ..Default::default() },
            Source {
                source_name: "Github Topics".into(),
                display_name: Some("Foo".into()),
                short_description: Some("short".into()),
                long_description: Some("long".into()),
                url: "u2".into(),
            },
        ],
    )]);
    let patterns = compile_patterns(&catalog);
    let res = extract_skills("foo and x", &patterns, &catalog).unwrap();

    // "x" is a display name of the same skill, so both are matches of "foo".
    let foo = &res["foo"];
    assert_eq!(foo.matches.len(), 2);
    assert_eq!(foo.display_name.as_deref(), Some("Foo"));
    assert_eq!(foo.description.as_deref(), Some("short"));
    assert_eq!(foo.long_description.as_deref(), Some("long"));
    assert_eq!(foo.sources.iter().map(|s| s.url.as_str()).collect::<Vec<_>>(), vec!["u1", "u2"]);
}

#[test]
fn attached_suffixes_stay_out_of_the_match() {
    let results = run("Python's and AI-driven");
    assert_eq!(
        results["python"].matches,
        vec![MatchRecord { start: 0, end: 6, label: "SKILL".into(), text: "Python".into() }]
    );
    assert_eq!(
        results["ai"].matches,
        vec![MatchRecord { start: 13, end: 15, label: "SKILL".into(), text: "AI".into() }]
    );
}

#[test]
fn stopword_alias_compiles_to_no_patterns() {
    let patterns: CompiledPatterns = compile_patterns(&catalog());
    assert!(patterns.patterns_for("the").is_empty());
    assert!(!patterns.patterns_for("ai").is_empty());
}

#[test]
fn results_serialize_deterministically() {
    let a = serde_json::to_string(&run("Python, AI and big data science")).unwrap();
    let b = serde_json::to_string(&run("Python, AI and big data science")).unwrap();
    assert_eq!(a, b);
    assert!(a.starts_with(r#"{"ai":{"matches":[{"start":8,"end":10,"label":"SKILL","text":"AI"}]"#));
}

fn vocabulary() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "Machine", "machine", "Learning", "learning", "AI", "ai", "big", "data", "science", "Data", "Analysis", "python",
        "the", "and", "Node.js", "CI/CD", ",", ".",
    ])
}

proptest! {
    #[test]
    fn extraction_is_idempotent(words in prop::collection::vec(vocabulary(), 0..20)) {
        let text = words.join(" ");
        let catalog = catalog();
        let patterns = compile_patterns(&catalog);
        let first = extract_skills(&text, &patterns, &catalog).unwrap();
        let second = extract_skills(&text, &patterns, &catalog).unwrap();
        prop_assert_eq!(serde_json::to_string(&first).unwrap(), serde_json::to_string(&second).unwrap());
    }

    #[test]
    fn matches_never_overlap(words in prop::collection::vec(vocabulary(), 0..20)) {
        let text = words.join(" ");
        let mut spans: Vec<(usize, usize)> =
            run(&text).values().flat_map(|r| r.matches.iter().map(|m| (m.start, m.end))).collect();
        spans.sort();
        for pair in spans.windows(2) {
            prop_assert!(pair[0].1 <= pair[1].0, "{:?}", pair);
        }
    }

    #[test]
    fn text_without_aliases_yields_nothing(text in "[0-9 ,;:!?#$%]{0,40}") {
        prop_assert!(run(&text).is_empty());
    }
}
