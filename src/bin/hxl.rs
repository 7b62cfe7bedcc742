use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use hxl_lang::{parser, semantic, tokenizer, ErrorCode};

#[derive(Parser)]
#[command(name = "hxl", version, about = "Inspect and validate HXL source files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the token stream for a source file.
    Tokenize { input: PathBuf },
    /// Parse a source file and print the resulting syntax tree.
    Parse { input: PathBuf },
    /// Tokenize, parse and run semantic checks, reporting every problem found.
    Check { input: PathBuf },
}

/// Delimiters and punctuators a typo is commonly mistaken for; used only to
/// propose a CLI suggestion, never to change a diagnostic's message text.
const KNOWN_SYMBOLS: &[&str] = &["<", ">", "<=", ":", "&", "[]", "{", "}", ","];

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Tokenize { input } => run_tokenize(&input),
        Command::Parse { input } => run_parse(&input),
        Command::Check { input } => run_check(&input),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}

fn read_source(input: &PathBuf) -> Result<String, String> {
    fs::read_to_string(input).map_err(|e| format!("could not read {}: {}", input.display(), e))
}

fn run_tokenize(input: &PathBuf) -> Result<(), String> {
    let source = read_source(input)?;
    match tokenizer::tokenize(&source) {
        Ok(tokens) => {
            for token in &tokens {
                println!(
                    "{:?}\t{:?}\t[Line {}, Col {}]",
                    token.kind, token.value, token.position.line, token.position.col
                );
            }
            Ok(())
        }
        Err(err) => Err(render_error(&err.message, &err.code)),
    }
}

fn run_parse(input: &PathBuf) -> Result<(), String> {
    let source = read_source(input)?;
    let tokens = tokenizer::tokenize(&source).map_err(|err| render_error(&err.message, &err.code))?;
    let document = parser::parse(&tokens).map_err(|err| render_error(&err.message, &err.code))?;
    println!("{:#?}", document);
    Ok(())
}

fn run_check(input: &PathBuf) -> Result<(), String> {
    let source = read_source(input)?;
    let tokens = tokenizer::tokenize(&source).map_err(|err| render_error(&err.message, &err.code))?;
    let document = parser::parse(&tokens).map_err(|err| render_error(&err.message, &err.code))?;
    let errors = semantic::analyze(&document);

    if errors.is_empty() {
        println!("OK: {} node(s), no problems found.", document.nodes.len());
        return Ok(());
    }

    for error in &errors {
        eprintln!("{}", render_error(&error.message, &error.code));
    }
    Err(format!("{} problem(s) found", errors.len()))
}

/// Render a diagnostic for the terminal, appending a fuzzy-match
/// suggestion for `UNEXPECTED_TOKEN`/`SYNTAX_ERROR` messages. The
/// suggestion is cosmetic CLI output only — it is never folded back into
/// `Error::message`, which stays exactly as `spec.md` §6 defines it.
fn render_error(message: &str, code: &ErrorCode) -> String {
    if !matches!(code, ErrorCode::UnexpectedToken | ErrorCode::SyntaxError) {
        return format!("[{:?}] {}", code, message);
    }

    let Some(offending) = message.rsplit(": ").next() else {
        return format!("[{:?}] {}", code, message);
    };

    match closest_symbol(offending) {
        Some(suggestion) => format!("[{:?}] {} (did you mean `{}`?)", code, message, suggestion),
        None => format!("[{:?}] {}", code, message),
    }
}

fn closest_symbol(offending: &str) -> Option<&'static str> {
    KNOWN_SYMBOLS
        .iter()
        .map(|symbol| (*symbol, edit_distance::edit_distance(offending, symbol)))
        .filter(|(_, distance)| *distance <= 2 && *distance > 0)
        .min_by_key(|(_, distance)| *distance)
        .map(|(symbol, _)| symbol)
}
