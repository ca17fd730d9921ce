//! Problem folder validator
//!
//! Checks that a problem submission has everything the generator and the
//! test harness expect. The checks are textual: the validator never runs the
//! parser or the emitters, and like the generator it never modifies the
//! folder. All diagnostics are accumulated, so one run reports every problem.
//!
//! # Checks
//!
//! 1. **Layout**: `Problem.md`, `Structure.md` and `tests/` exist
//! 2. **Structure**: required labels present, problem name quoted, function
//!    name a valid identifier
//! 3. **Tests**: `inputN.txt` / `outputN.txt` come in pairs and are not empty
//! 4. **Description**: `Problem.md` is long enough and mentions the usual
//!    sections

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info};

/// Number of top-level checks; `checks_passed` counts down from it
pub const TOTAL_CHECKS: usize = 6;

/// Problem.md shorter than this (trimmed) draws a warning
pub const MIN_DESCRIPTION_CHARS: usize = 100;

const REQUIRED_FILES: [&str; 2] = ["Problem.md", "Structure.md"];
const REQUIRED_DIRS: [&str; 1] = ["tests"];
const REQUIRED_LABELS: [&str; 4] = [
    "Problem Name:",
    "Function Name:",
    "Input Structure:",
    "Output Structure:",
];

static PROBLEM_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"Problem Name:(?:\*\*)?\s*"([^"]+)""#).expect("valid regex"));
static FUNCTION_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Function Name:(?:\*\*)?\s*(\w+)").expect("valid regex"));
static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9_]*$").expect("valid regex"));

// ── Report Types ──────────────────────────────────────────

/// Result of validating one problem folder
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub problem: PathBuf,
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    fn new(problem: &Path) -> Self {
        Self {
            problem: problem.to_path_buf(),
            diagnostics: Vec::new(),
        }
    }

    /// True when there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        !self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn errors(&self) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .collect()
    }

    pub fn warnings(&self) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .collect()
    }

    pub fn checks_passed(&self) -> usize {
        TOTAL_CHECKS.saturating_sub(self.errors().len())
    }

    fn add_error(&mut self, kind: DiagnosticKind, file: Option<&str>, message: String) {
        debug!(%kind, %message, "validation error");
        self.diagnostics.push(Diagnostic {
            severity: Severity::Error,
            kind,
            file: file.map(str::to_string),
            message,
        });
    }

    fn add_warning(&mut self, kind: DiagnosticKind, file: Option<&str>, message: String) {
        debug!(%kind, %message, "validation warning");
        self.diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            kind,
            file: file.map(str::to_string),
            message,
        });
    }
}

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    /// File inside the problem folder the finding is about
    pub file: Option<String>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        match &self.file {
            Some(file) => write!(f, "{} [{}] in {}: {}", prefix, self.kind, file, self.message),
            None => write!(f, "{} [{}]: {}", prefix, self.kind, self.message),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Which check produced a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    Layout,
    Structure,
    Tests,
    Description,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DiagnosticKind::Layout => write!(f, "layout"),
            DiagnosticKind::Structure => write!(f, "structure"),
            DiagnosticKind::Tests => write!(f, "tests"),
            DiagnosticKind::Description => write!(f, "description"),
        }
    }
}

// ── Public API ────────────────────────────────────────────

/// Validate a problem folder.
///
/// Unreadable files are reported as errors of the check that needed them.
pub fn validate_problem(problem_dir: impl AsRef<Path>) -> ValidationReport {
    let dir = problem_dir.as_ref();
    let mut report = ValidationReport::new(dir);
    info!(problem = %dir.display(), "validating problem");

    if !dir.is_dir() {
        report.add_error(
            DiagnosticKind::Layout,
            None,
            format!("problem directory does not exist: {}", dir.display()),
        );
        return report;
    }

    validate_layout(dir, &mut report);

    let structure = dir.join("Structure.md");
    if structure.is_file() {
        match fs::read_to_string(&structure) {
            Ok(text) => validate_structure(&text, &mut report),
            Err(e) => report.add_error(
                DiagnosticKind::Structure,
                Some("Structure.md"),
                format!("cannot read: {}", e),
            ),
        }
    }

    let tests = dir.join("tests");
    if tests.is_dir() {
        validate_tests(&tests, &mut report);
    }

    let problem = dir.join("Problem.md");
    if problem.is_file() {
        match fs::read_to_string(&problem) {
            Ok(text) => validate_description(&text, &mut report),
            Err(e) => report.add_error(
                DiagnosticKind::Description,
                Some("Problem.md"),
                format!("cannot read: {}", e),
            ),
        }
    }

    info!(
        problem = %dir.display(),
        errors = report.errors().len(),
        warnings = report.warnings().len(),
        "validation finished"
    );
    report
}

// ── Layout ────────────────────────────────────────────────

fn validate_layout(dir: &Path, report: &mut ValidationReport) {
    for file in REQUIRED_FILES {
        if dir.join(file).is_file() {
            debug!(file, "found required file");
        } else {
            report.add_error(
                DiagnosticKind::Layout,
                None,
                format!("missing required file: {}", file),
            );
        }
    }
    for sub in REQUIRED_DIRS {
        if dir.join(sub).is_dir() {
            debug!(dir = sub, "found required directory");
        } else {
            report.add_error(
                DiagnosticKind::Layout,
                None,
                format!("missing required directory: {}", sub),
            );
        }
    }
}

// ── Structure ─────────────────────────────────────────────

fn validate_structure(text: &str, report: &mut ValidationReport) {
    let file = Some("Structure.md");

    for label in REQUIRED_LABELS {
        if !text.contains(label) {
            report.add_error(
                DiagnosticKind::Structure,
                file,
                format!("missing required field: {}", label),
            );
        }
    }
    if !text.contains("Input Field:") {
        report.add_error(
            DiagnosticKind::Structure,
            file,
            "missing Input Field definitions".to_string(),
        );
    }
    if !text.contains("Output Field:") {
        report.add_error(
            DiagnosticKind::Structure,
            file,
            "missing Output Field definitions".to_string(),
        );
    }

    if !PROBLEM_NAME.is_match(text) {
        report.add_error(
            DiagnosticKind::Structure,
            file,
            "Problem Name must be in double quotes".to_string(),
        );
    }

    match FUNCTION_NAME.captures(text).and_then(|c| c.get(1)) {
        None => report.add_error(
            DiagnosticKind::Structure,
            file,
            "Function Name must be a valid identifier".to_string(),
        ),
        Some(name) if !IDENTIFIER.is_match(name.as_str()) => report.add_error(
            DiagnosticKind::Structure,
            file,
            format!(
                "Function Name '{}' must be a valid identifier (letters, digits, underscore; must start with a letter)",
                name.as_str()
            ),
        ),
        Some(_) => {}
    }
}

// ── Tests ─────────────────────────────────────────────────

fn validate_tests(tests: &Path, report: &mut ValidationReport) {
    let mut names: Vec<String> = match fs::read_dir(tests) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect(),
        Err(e) => {
            report.add_error(
                DiagnosticKind::Tests,
                Some("tests"),
                format!("cannot list directory: {}", e),
            );
            return;
        }
    };
    names.sort();

    let is_case = |name: &str, prefix: &str| name.starts_with(prefix) && name.ends_with(".txt");
    let inputs: Vec<&String> = names.iter().filter(|n| is_case(n, "input")).collect();
    let outputs: Vec<&String> = names.iter().filter(|n| is_case(n, "output")).collect();
    debug!(inputs = inputs.len(), outputs = outputs.len(), "found test files");

    if inputs.is_empty() {
        report.add_error(
            DiagnosticKind::Tests,
            None,
            "no input test files found (expected input1.txt, input2.txt, ...)".to_string(),
        );
    }
    if outputs.is_empty() {
        report.add_error(
            DiagnosticKind::Tests,
            None,
            "no output test files found (expected output1.txt, output2.txt, ...)".to_string(),
        );
    }
    if inputs.len() != outputs.len() {
        report.add_warning(
            DiagnosticKind::Tests,
            None,
            format!(
                "mismatch between input files ({}) and output files ({})",
                inputs.len(),
                outputs.len()
            ),
        );
    }

    let has = |list: &[&String], name: &str| list.iter().any(|n| n.as_str() == name);
    for i in 1..=inputs.len().max(outputs.len()) {
        let input = format!("input{}.txt", i);
        let output = format!("output{}.txt", i);
        if has(&inputs, &input) && !has(&outputs, &output) {
            report.add_error(
                DiagnosticKind::Tests,
                None,
                format!("missing output file: {} (corresponding to {})", output, input),
            );
        }
        if has(&outputs, &output) && !has(&inputs, &input) {
            report.add_error(
                DiagnosticKind::Tests,
                None,
                format!("missing input file: {} (corresponding to {})", input, output),
            );
        }
    }

    for name in inputs.iter().chain(outputs.iter()) {
        let path = tests.join(name.as_str());
        match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => report.add_warning(
                DiagnosticKind::Tests,
                Some(name.as_str()),
                "test file is empty".to_string(),
            ),
            Ok(_) => {}
            Err(e) => report.add_error(
                DiagnosticKind::Tests,
                Some(name.as_str()),
                format!("cannot read: {}", e),
            ),
        }
    }
}

// ── Description ───────────────────────────────────────────

fn validate_description(text: &str, report: &mut ValidationReport) {
    let file = Some("Problem.md");
    if text.trim().chars().count() < MIN_DESCRIPTION_CHARS {
        report.add_warning(
            DiagnosticKind::Description,
            file,
            "seems very short; consider a more detailed explanation".to_string(),
        );
    }

    let lower = text.to_lowercase();
    if !lower.contains("description") && !lower.contains("problem") {
        report.add_warning(
            DiagnosticKind::Description,
            file,
            "should include a problem description section".to_string(),
        );
    }
    if !lower.contains("example") {
        report.add_warning(
            DiagnosticKind::Description,
            file,
            "should include example inputs and outputs".to_string(),
        );
    }
    if !lower.contains("constraint") {
        report.add_warning(
            DiagnosticKind::Description,
            file,
            "should include a constraints section".to_string(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const STRUCTURE: &str = r#"Problem Name: "Two Sum"
Function Name: twoSum
Input Structure:
Input Field: nums array of integer
Input Field: target integer
Output Structure:
Output Field: array of integer
"#;

    const PROBLEM: &str = "# Two Sum\n\n## Description\n\nGiven an array of integers and a target, \
return the indices of the two numbers that add up to the target.\n\n## Example\n\n\
Input: 4 2 7 11 15 / 9\nOutput: 0 1\n\n## Constraints\n\n2 <= nums.length <= 10^4\n";

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn valid_problem() -> TempDir {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "Problem.md", PROBLEM);
        write(dir.path(), "Structure.md", STRUCTURE);
        write(dir.path(), "tests/input1.txt", "4\n2 7 11 15\n9\n");
        write(dir.path(), "tests/output1.txt", "0 1\n");
        write(dir.path(), "tests/input2.txt", "2\n3 3\n6\n");
        write(dir.path(), "tests/output2.txt", "0 1\n");
        dir
    }

    fn messages(report: &ValidationReport, severity: Severity) -> Vec<String> {
        report
            .diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .map(|d| d.message.clone())
            .collect()
    }

    // ── Valid folders ──────────────────────────────────

    #[test]
    fn test_valid_problem() {
        let dir = valid_problem();
        let report = validate_problem(dir.path());
        assert!(report.is_valid(), "unexpected: {:?}", report.diagnostics);
        assert!(report.warnings().is_empty(), "unexpected: {:?}", report.warnings());
        assert_eq!(report.checks_passed(), TOTAL_CHECKS);
    }

    // ── Layout ─────────────────────────────────────────

    #[test]
    fn test_missing_directory_stops_early() {
        let dir = TempDir::new().unwrap();
        let report = validate_problem(dir.path().join("absent"));
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].kind, DiagnosticKind::Layout);
        assert!(!report.is_valid());
    }

    #[test]
    fn test_empty_directory() {
        let dir = TempDir::new().unwrap();
        let report = validate_problem(dir.path());
        let errors = messages(&report, Severity::Error);
        assert_eq!(
            errors,
            vec![
                "missing required file: Problem.md",
                "missing required file: Structure.md",
                "missing required directory: tests",
            ]
        );
        assert_eq!(report.checks_passed(), 3);
    }

    // ── Structure ──────────────────────────────────────

    #[test]
    fn test_unquoted_problem_name() {
        let dir = valid_problem();
        write(dir.path(), "Structure.md", &STRUCTURE.replace("\"Two Sum\"", "Two Sum"));
        let report = validate_problem(dir.path());
        assert_eq!(messages(&report, Severity::Error), vec!["Problem Name must be in double quotes"]);
    }

    #[test]
    fn test_invalid_function_name() {
        let dir = valid_problem();
        write(dir.path(), "Structure.md", &STRUCTURE.replace("twoSum", "123abc"));
        let report = validate_problem(dir.path());
        let errors = messages(&report, Severity::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("'123abc'"));
    }

    #[test]
    fn test_missing_labels() {
        let dir = valid_problem();
        let structure = STRUCTURE
            .replace("Input Structure:\n", "")
            .replace("Output Field: array of integer\n", "");
        write(dir.path(), "Structure.md", &structure);
        let errors = messages(&validate_problem(dir.path()), Severity::Error);
        assert_eq!(
            errors,
            vec![
                "missing required field: Input Structure:",
                "missing Output Field definitions",
            ]
        );
    }

    #[test]
    fn test_type_expressions_are_not_checked() {
        let dir = valid_problem();
        write(dir.path(), "Structure.md", &STRUCTURE.replace("target integer", "root TreeNode"));
        let report = validate_problem(dir.path());
        assert!(report.is_valid(), "unexpected: {:?}", report.diagnostics);
        assert_eq!(report.checks_passed(), TOTAL_CHECKS);

        write(dir.path(), "Structure.md", &STRUCTURE.replace("array of integer\nInput", "array of\nInput"));
        assert!(validate_problem(dir.path()).is_valid());
    }

    #[test]
    fn test_bold_labels_accepted() {
        let dir = valid_problem();
        let structure = STRUCTURE
            .replace("Problem Name:", "- **Problem Name:**")
            .replace("Function Name:", "- **Function Name:**");
        write(dir.path(), "Structure.md", &structure);
        let report = validate_problem(dir.path());
        assert!(report.is_valid(), "unexpected: {:?}", report.diagnostics);
    }

    // ── Tests ──────────────────────────────────────────

    #[test]
    fn test_no_test_files() {
        let dir = valid_problem();
        for name in ["input1.txt", "input2.txt", "output1.txt", "output2.txt"] {
            fs::remove_file(dir.path().join("tests").join(name)).unwrap();
        }
        let errors = messages(&validate_problem(dir.path()), Severity::Error);
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("no input test files"));
        assert!(errors[1].starts_with("no output test files"));
    }

    #[test]
    fn test_unpaired_test_file() {
        let dir = valid_problem();
        write(dir.path(), "tests/input3.txt", "1\n5\n5\n");
        let report = validate_problem(dir.path());
        assert_eq!(
            messages(&report, Severity::Error),
            vec!["missing output file: output3.txt (corresponding to input3.txt)"]
        );
        assert_eq!(
            messages(&report, Severity::Warning),
            vec!["mismatch between input files (3) and output files (2)"]
        );
    }

    #[test]
    fn test_empty_test_file_is_warning() {
        let dir = valid_problem();
        write(dir.path(), "tests/output2.txt", "  \n");
        let report = validate_problem(dir.path());
        assert!(report.is_valid());
        let warnings = report.warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].file.as_deref(), Some("output2.txt"));
    }

    // ── Description ────────────────────────────────────

    #[test]
    fn test_short_description_warnings() {
        let dir = valid_problem();
        write(dir.path(), "Problem.md", "Add two numbers.");
        let report = validate_problem(dir.path());
        assert!(report.is_valid());
        assert_eq!(
            messages(&report, Severity::Warning),
            vec![
                "seems very short; consider a more detailed explanation",
                "should include a problem description section",
                "should include example inputs and outputs",
                "should include a constraints section",
            ]
        );
    }

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic {
            severity: Severity::Warning,
            kind: DiagnosticKind::Tests,
            file: Some("input1.txt".into()),
            message: "test file is empty".into(),
        };
        assert_eq!(d.to_string(), "warning [tests] in input1.txt: test file is empty");
    }

    #[test]
    fn test_validation_determinism_100_iterations() {
        let dir = valid_problem();
        write(dir.path(), "tests/input3.txt", "");
        let first = validate_problem(dir.path()).diagnostics;
        for i in 0..100 {
            assert_eq!(
                first,
                validate_problem(dir.path()).diagnostics,
                "Determinism failure at iteration {}",
                i
            );
        }
    }
}
