//! modmatch CLI - match OCR lines from stdin against a vocabulary file
//!
//! Usage: `modmatch [--explain] <vocabulary-file> [settings.json]`
//!
//! The vocabulary file holds one modifier per line; blank lines are
//! skipped. Each stdin line produces one output line, empty when nothing
//! matched.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use modmatch::matcher::resolve_placeholders;
use modmatch::{ModMatcher, Settings};

fn main() -> ExitCode {
    let mut explain = false;
    let mut paths = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--explain" => explain = true,
            "-h" | "--help" => {
                print_usage();
                return ExitCode::SUCCESS;
            }
            _ => paths.push(arg),
        }
    }

    let Some(vocabulary_path) = paths.first() else {
        print_usage();
        return ExitCode::FAILURE;
    };

    let settings = match paths.get(1) {
        Some(path) => match std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|json| Settings::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Failed to load settings from {path}: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => Settings::default(),
    };

    let vocabulary = match std::fs::read_to_string(vocabulary_path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Failed to read vocabulary {vocabulary_path}: {e}");
            return ExitCode::FAILURE;
        }
    };
    let entries = vocabulary.lines().map(str::trim).filter(|line| !line.is_empty());

    let mut matcher = ModMatcher::new(settings);
    match matcher.build(entries) {
        Ok(stats) => eprintln!(
            "Loaded {} modifiers ({} distinct, tree depth {})",
            stats.entries, stats.nodes, stats.depth
        ),
        Err(e) => {
            eprintln!("Failed to build index: {e}");
            return ExitCode::FAILURE;
        }
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("Failed to read input: {e}");
                return ExitCode::FAILURE;
            }
        };

        let output = if explain {
            explain_line(&matcher, &line)
        } else {
            matcher.match_line(&line)
        };
        if writeln!(stdout, "{output}").is_err() {
            break;
        }
    }

    ExitCode::SUCCESS
}

fn explain_line(matcher: &ModMatcher, line: &str) -> String {
    match matcher.explain(line) {
        Ok(Some(candidate)) => format!(
            "{}\t{} {} d={} conf={:.3} {:?}",
            resolve_placeholders(&candidate.matched, line),
            candidate.stage,
            candidate.tier,
            candidate.distance,
            candidate.confidence,
            candidate.corruption
        ),
        Ok(None) => String::new(),
        Err(e) => format!("error: {e}"),
    }
}

fn print_usage() {
    println!("modmatch - OCR-tolerant modifier matching");
    println!();
    println!("Usage: modmatch [--explain] <vocabulary-file> [settings.json]");
    println!();
    println!("Reads OCR lines from stdin and prints the matched modifier for each,");
    println!("or an empty line when nothing matched confidently.");
}
