mod report;

use skillex::{CompileOptions, Options, RecordsRequest, SkillCatalog, SkillExtractor, SkillProperty, SplitDelimiters};
use std::io::{self, IsTerminal, Read, Write};
use tracing_subscriber::EnvFilter;

const CATALOG_ENV: &str = "SKILLEX_CATALOG";
const LOG_ENV: &str = "SKILLEX_LOG";

fn main() {
    init_tracing();

    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    if let Err(err) = run(config) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

#[derive(Debug, PartialEq)]
enum Mode {
    Extract,
    Batch,
    Skill(String),
    DumpPatterns,
}

#[derive(Debug)]
struct CliConfig {
    catalog: String,
    mode: Mode,
    input: Option<String>,
    property: SkillProperty,
    delimiters: SplitDelimiters,
    json: bool,
    color: bool,
}

fn run(config: CliConfig) -> Result<(), String> {
    let catalog = SkillCatalog::load(&config.catalog)
        .map_err(|err| format!("error: failed to load catalog '{}': {err}", config.catalog))?;
    let compile = CompileOptions { delimiters: config.delimiters };

    match config.mode {
        Mode::Skill(id) => {
            let entry = catalog.get(&id).ok_or_else(|| format!("Not Found: Skill with id {id} does not exist"))?;
            let json = serde_json::to_string_pretty(&entry.to_catalog_json()).map_err(|err| format!("error: {err}"))?;
            println!("{json}");
            Ok(())
        }
        Mode::DumpPatterns => {
            let extractor = SkillExtractor::with_options(catalog, &compile);
            extractor.patterns().write_jsonl(io::stdout().lock()).map_err(|err| format!("error: {err}"))
        }
        Mode::Batch => {
            let body = match config.input {
                Some(input) => input,
                None => read_stdin_input()?,
            };
            let request: RecordsRequest =
                serde_json::from_str(&body).map_err(|_| "error: please pass a valid request body".to_string())?;

            let extractor = SkillExtractor::with_options(catalog, &compile);
            let options = Options { skill_property: config.property };
            let response = extractor.extract_records(&request, &options);
            let json = serde_json::to_string(&response).map_err(|err| format!("error: {err}"))?;
            println!("{json}");
            Ok(())
        }
        Mode::Extract => {
            let input = match config.input {
                Some(input) => input,
                None => read_stdin_input()?,
            };
            if input.trim().is_empty() {
                eprintln!("error: no input provided\n\n{}", help_text());
                std::process::exit(2);
            }

            let extractor = SkillExtractor::with_options(catalog, &compile);
            let res = extractor.extract_verbose(&input).map_err(|err| format!("error: {err}"))?;
            if config.json {
                let json = serde_json::to_string_pretty(&res.skills).map_err(|err| format!("error: {err}"))?;
                writeln!(io::stdout().lock(), "{json}").map_err(|err| format!("error: {err}"))?;
            } else {
                report::print_run(&input, &res, config.property, config.color);
            }
            Ok(())
        }
    }
}

fn set_input(value: String, input: &mut Option<String>) -> Result<(), String> {
    if input.is_some() {
        return Err("error: input provided multiple times".to_string());
    }
    *input = Some(value);
    Ok(())
}

fn parse_args() -> Result<CliConfig, String> {
    let mut catalog: Option<String> = std::env::var(CATALOG_ENV).ok();
    let mut mode = Mode::Extract;
    let mut input: Option<String> = None;
    let mut property = SkillProperty::Id;
    let mut delimiters = SplitDelimiters::all();
    let mut json = false;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1).peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("skillex {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--json" => json = true,
            "--batch" => mode = Mode::Batch,
            "--dump-patterns" => mode = Mode::DumpPatterns,
            "--no-hyphen-split" => delimiters.remove(SplitDelimiters::HYPHEN),
            "--skill" => {
                let value = args.next().ok_or_else(|| "error: --skill expects a value".to_string())?;
                mode = Mode::Skill(value);
            }
            "--catalog" | "-c" => {
                catalog = Some(args.next().ok_or_else(|| "error: --catalog expects a value".to_string())?);
            }
            "--property" => {
                let value = args.next().ok_or_else(|| "error: --property expects a value".to_string())?;
                property = value.parse().map_err(|err| format!("error: {err}"))?;
            }
            "--input" | "-i" => {
                let value = args.next().ok_or_else(|| "error: --input expects a value".to_string())?;
                set_input(value, &mut input)?;
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    set_input(rest, &mut input)?;
                }
                break;
            }
            _ if arg.starts_with("--catalog=") => {
                catalog = Some(arg.trim_start_matches("--catalog=").to_string());
            }
            _ if arg.starts_with("--property=") => {
                property = arg.trim_start_matches("--property=").parse().map_err(|err| format!("error: {err}"))?;
            }
            _ if arg.starts_with("--input=") => {
                set_input(arg.trim_start_matches("--input=").to_string(), &mut input)?;
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                let rest = std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" ");
                set_input(rest, &mut input)?;
                break;
            }
        }
    }

    let catalog = catalog
        .ok_or_else(|| format!("error: no catalog given (use --catalog or {CATALOG_ENV})\n\n{}", help_text()))?;

    Ok(CliConfig { catalog, mode, input, property, delimiters, json, color })
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "skillex {version}

Rule-based skill extraction CLI.

Usage:
  skillex --catalog <skills.json> [OPTIONS] [--] <input...>
  skillex --catalog <skills.json> --batch < records.json
  skillex --catalog <skills.json> --skill <id>

Options:
  -c, --catalog <path>       Skill catalog JSON. Default: ${catalog_env}.
  -i, --input <text>         Input text. If omitted, reads remaining args
                             or stdin when no args are provided.
  --property <id|name>       Project results to skill ids or display names.
  --json                     Print per-skill results as JSON.
  --batch                    Read a records request from stdin (or --input)
                             and print a records response.
  --skill <id>               Print the skills.json entry for <id>.
  --dump-patterns            Print compiled patterns as JSON lines.
  --no-hyphen-split          Do not add '-' split variants of names.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Environment:
  {log_env}                 Log filter (tracing env-filter syntax). Default: warn

Exit codes:
  0  Success.
  1  Runtime error (catalog, unknown skill, extraction failure).
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION"),
        catalog_env = CATALOG_ENV,
        log_env = LOG_ENV,
    )
}
