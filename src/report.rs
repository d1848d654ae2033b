use skillex::{ExtractResultVerbose, SkillProperty};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_run(input: &str, res: &ExtractResultVerbose, property: SkillProperty, color: bool) {
    let palette = ansi::Palette::new(color);
    let preview: String = input.chars().take(80).collect();
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Extracting: \"{}\"", preview.trim()), ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Spans ━━━", ansi::GRAY));
    print_spans(res, &palette);

    println!("\n{}", palette.paint("━━━ Skills ━━━", ansi::GRAY));
    if res.skills.is_empty() {
        println!("{}", palette.dim("  No skills found"));
        println!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
        println!("  • No alias of any catalog skill occurs in the text");
        println!("  • The alias is a stopword, or an acronym written in a different case");
        println!("\n{}", palette.dim("  Tip: run with --dump-patterns to inspect compiled patterns"));
    } else {
        print_skills(res, &palette);
        let projected = property.project_all(&res.skills);
        println!("\n  {} {}", palette.dim("projection:"), palette.paint(projected.join(", "), ansi::GREEN));
    }

    let d = &res.details;
    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!(
        "  Total: {}  │  Tokenize: {}  │  Match: {}  │  Resolve: {}  │  Aggregate: {}",
        palette.paint(format!("{:?}", d.total), ansi::GREEN),
        palette.dim(format!("{:?}", d.tokenize)),
        palette.paint(format!("{:?}", d.matching), ansi::CYAN),
        palette.dim(format!("{:?}", d.resolve)),
        palette.dim(format!("{:?}", d.aggregate)),
    );
    println!();
}

fn print_spans(res: &ExtractResultVerbose, palette: &ansi::Palette) {
    let d = &res.details;
    println!(
        "  {} tokens  │  {} candidates  │  {}  │  {}",
        palette.paint(d.tokens.to_string(), ansi::BLUE),
        palette.paint(d.candidates.to_string(), ansi::BLUE),
        palette.paint(format!("✓ {} accepted", d.spans.len()), ansi::GREEN),
        palette.dim(format!("✗ {} rejected", d.rejected.len())),
    );

    for span in &d.spans {
        println!(
            "    {} {} {}",
            palette.paint(format!("{}..{}", span.tokens.0, span.tokens.1), ansi::YELLOW),
            palette.paint(&span.skill_id, ansi::BLUE),
            palette.dim(format!("\"{}\"", span.text))
        );
    }
    for rejected in d.rejected.iter().take(5) {
        println!(
            "    {} {}",
            palette.dim(format!("{}..{}", rejected.start, rejected.end)),
            palette.dim(format!("{} (overlaps a longer span)", rejected.skill_id))
        );
    }
    if d.rejected.len() > 5 {
        println!("    {}", palette.dim(format!("... +{} more", d.rejected.len() - 5)));
    }
}

fn print_skills(res: &ExtractResultVerbose, palette: &ansi::Palette) {
    for (idx, (id, skill)) in res.skills.iter().enumerate() {
        let name = skill.display_name.as_deref().unwrap_or(id);
        println!(
            "  {} {} {} {}",
            palette.paint(format!("[{}]", idx), ansi::GRAY),
            palette.bold(palette.paint(name, ansi::GREEN)),
            palette.dim("│"),
            palette.paint(id, ansi::CYAN),
        );
        for m in &skill.matches {
            println!(
                "      {} {}  {} {}",
                palette.dim("match:"),
                palette.paint(format!("\"{}\"", m.text), ansi::BLUE),
                palette.dim("│ chars:"),
                palette.paint(format!("{}..{}", m.start, m.end), ansi::YELLOW)
            );
        }
        if let Some(description) = &skill.description {
            let short: String = description.chars().take(100).collect();
            println!("      {} {}", palette.dim("about:"), short);
        }
        let sources: Vec<&str> = skill.sources.iter().map(|s| s.name.as_str()).collect();
        if !sources.is_empty() {
            println!("      {} {}", palette.dim("sources:"), sources.join(", "));
        }
    }
}
