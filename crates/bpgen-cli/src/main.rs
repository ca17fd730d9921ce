use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use bpgen_core::validator::Severity;
use bpgen_core::Language;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::debug;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// bpgen — problem boilerplate generator
///
/// Generate typed starter code (C++, JavaScript, Rust) from a problem's
/// Structure.md and validate problem folders before submission.
#[derive(Parser)]
#[command(name = "bpgen", version, about, long_about = None)]
struct Cli {
    /// Only print errors
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write boilerplate/ and boilerplate-full/ for a problem folder
    Generate {
        /// Problem folder containing Structure.md
        dir: PathBuf,
        /// Output the generation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check a problem folder (files, Structure.md, tests, Problem.md)
    Validate {
        /// Problem folder
        dir: PathBuf,
        /// Output diagnostics as JSON
        #[arg(long)]
        json: bool,
        /// Also parse Structure.md and emit every language, writing nothing
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the parsed definition of a structure document as JSON
    Parse {
        /// Path to a Structure.md file
        file: PathBuf,
        /// Parse for full generation (includes I/O layouts)
        #[arg(long)]
        full: bool,
    },

    /// Print the generated source for one language
    Emit {
        /// Path to a Structure.md file
        file: PathBuf,
        /// Target language: cpp, js or rust
        #[arg(long)]
        lang: Language,
        /// Emit a complete program with stdin/stdout handling
        #[arg(long)]
        full: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let exit_code = match cli.command {
        Commands::Generate { dir, json } => cmd_generate(&dir, json, cli.quiet),
        Commands::Validate { dir, json, dry_run } => cmd_validate(&dir, json, dry_run, cli.quiet),
        Commands::Parse { file, full } => cmd_parse(&file, full),
        Commands::Emit { file, lang, full } => cmd_emit(&file, lang, full),
        Commands::Version => {
            println!(
                "bpgen {} (bpgen-core {})",
                env!("CARGO_PKG_VERSION"),
                bpgen_core::VERSION
            );
            0
        }
    };

    process::exit(exit_code);
}

// ── Logging ───────────────────────────────────────────────

/// BPGEN_LOG takes a plain level ("debug") or a full filter spec
/// ("bpgen_core=trace"); logs go to stderr, default `warn`.
fn init_tracing() {
    let filter = match std::env::var("BPGEN_LOG") {
        Ok(level) if is_plain_level(&level) => format!("bpgen={level},bpgen_core={level}"),
        Ok(spec) => spec,
        Err(_) => "bpgen=warn,bpgen_core=warn".to_string(),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry().with(fmt_layer).try_init().is_err() {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}

// ── Commands ──────────────────────────────────────────────

fn cmd_generate(dir: &Path, json: bool, quiet: bool) -> i32 {
    match bpgen_core::generate(dir) {
        Ok(report) => {
            if json {
                return print_json(serde_json::to_string_pretty(&report));
            }
            if !quiet {
                println!(
                    "{} boilerplate for \"{}\" ({})",
                    "generated".green().bold(),
                    report.problem_name,
                    report.function_name
                );
                for file in &report.files {
                    println!("  {}  {}", &file.sha256[..12], file.path.display());
                }
            }
            0
        }
        Err(err) => {
            if json {
                print_json(serde_json::to_string_pretty(
                    &serde_json::json!({ "error": err.to_string() }),
                ));
            }
            print_error(&err.to_string());
            1
        }
    }
}

fn cmd_validate(dir: &Path, json: bool, dry_run: bool, quiet: bool) -> i32 {
    let report = bpgen_core::validate_problem(dir);
    let generation_errors = if dry_run {
        dry_run_generation(dir)
    } else {
        Vec::new()
    };
    let valid = report.is_valid() && generation_errors.is_empty();
    let error_count = report.errors().len() + generation_errors.len();
    let exit_code = if valid { 0 } else { 1 };

    if json {
        let mut value = serde_json::json!({
            "problem": report.problem,
            "valid": valid,
            "checks_passed": report.checks_passed(),
            "errors": error_count,
            "warnings": report.warnings().len(),
            "diagnostics": report.diagnostics,
        });
        if dry_run {
            value["generation_errors"] = serde_json::json!(generation_errors);
        }
        print_json(serde_json::to_string_pretty(&value));
        return exit_code;
    }

    for diagnostic in &report.diagnostics {
        match diagnostic.severity {
            Severity::Error => eprintln!("  {} {}", "✗".red(), diagnostic),
            Severity::Warning if !quiet => eprintln!("  {} {}", "!".yellow(), diagnostic),
            Severity::Warning => {}
        }
    }
    for message in &generation_errors {
        eprintln!("  {} error [generation] in Structure.md: {}", "✗".red(), message);
    }

    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string());

    if valid {
        if !quiet {
            println!(
                "{} {} ({} checks passed, {} warnings)",
                "valid".green().bold(),
                name,
                report.checks_passed(),
                report.warnings().len()
            );
        }
    } else {
        eprintln!(
            "{} {} ({} errors, {} warnings)",
            "invalid".red().bold(),
            name,
            error_count,
            report.warnings().len()
        );
    }
    exit_code
}

/// Run `parse_full` and every `emit_full` on the folder's Structure.md.
/// A missing or unreadable file is left to the validator's own report.
fn dry_run_generation(dir: &Path) -> Vec<String> {
    let path = dir.join("Structure.md");
    let Ok(text) = fs::read_to_string(&path) else {
        return Vec::new();
    };
    debug!(path = %path.display(), "dry-running generation");

    match bpgen_core::parse_full(&text) {
        Ok(full) => Language::ALL
            .iter()
            .filter_map(|&language| bpgen_core::emit_full(language, &full).err())
            .map(|e| bpgen_core::Error::from(e).to_string())
            .collect(),
        Err(e) => vec![bpgen_core::Error::from(e).to_string()],
    }
}

fn cmd_parse(file: &Path, full: bool) -> i32 {
    let Some(text) = read_document(file) else {
        return 1;
    };

    let rendered = if full {
        bpgen_core::parse_full(&text).map(|def| serde_json::to_string_pretty(&def))
    } else {
        bpgen_core::parse(&text).map(|def| serde_json::to_string_pretty(&def))
    };

    match rendered {
        Ok(json) => print_json(json),
        Err(err) => {
            print_error(&bpgen_core::Error::from(err).to_string());
            1
        }
    }
}

fn cmd_emit(file: &Path, language: Language, full: bool) -> i32 {
    let Some(text) = read_document(file) else {
        return 1;
    };

    let source = if full {
        bpgen_core::parse_full(&text)
            .map_err(bpgen_core::Error::from)
            .and_then(|def| bpgen_core::emit_full(language, &def).map_err(Into::into))
    } else {
        bpgen_core::parse(&text)
            .map_err(bpgen_core::Error::from)
            .and_then(|def| bpgen_core::emit(language, &def).map_err(Into::into))
    };

    match source {
        Ok(source) => {
            print!("{}", source);
            0
        }
        Err(err) => {
            print_error(&err.to_string());
            1
        }
    }
}

// ── Helpers ───────────────────────────────────────────────

fn read_document(file: &Path) -> Option<String> {
    debug!(path = %file.display(), "reading structure document");
    match fs::read_to_string(file) {
        Ok(text) => Some(text),
        Err(e) => {
            print_error(&format!("cannot read {}: {}", file.display(), e));
            None
        }
    }
}

fn print_json(rendered: serde_json::Result<String>) -> i32 {
    match rendered {
        Ok(text) => {
            println!("{}", text);
            0
        }
        Err(e) => {
            print_error(&format!("cannot serialize output: {}", e));
            1
        }
    }
}

fn print_error(message: &str) {
    eprintln!("{} {}", "error:".red().bold(), message);
}
