//! Integration tests for the bpgen CLI
//!
//! These tests invoke the actual bpgen binary and verify:
//! - Exit codes (0 = success, 1 = failure)
//! - stdout/stderr output
//! - JSON output format
//! - Files written by `generate`

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

// ── Helpers ───────────────────────────────────────────────

fn bpgen_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_bpgen"))
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../tests/fixtures/problems")
        .join(name)
}

fn structure(name: &str) -> String {
    fixture(name).join("Structure.md").to_str().unwrap().to_string()
}

fn run_bpgen(args: &[&str]) -> std::process::Output {
    Command::new(bpgen_bin())
        .args(args)
        .env_remove("BPGEN_LOG")
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .output()
        .expect("failed to execute bpgen")
}

fn copy_dir(from: &Path, to: &Path) {
    fs::create_dir_all(to).unwrap();
    for entry in fs::read_dir(from).unwrap() {
        let entry = entry.unwrap();
        let target = to.join(entry.file_name());
        if entry.file_type().unwrap().is_dir() {
            copy_dir(&entry.path(), &target);
        } else {
            fs::copy(entry.path(), target).unwrap();
        }
    }
}

/// Copy a fixture problem into a scratch directory so `generate` can write
fn scratch_problem(name: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join(name);
    copy_dir(&fixture(name), &dir);
    (tmp, dir)
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ── Version ───────────────────────────────────────────────

#[test]
fn test_version_command() {
    let output = run_bpgen(&["version"]);
    assert!(output.status.success(), "version should exit 0");
    let out = stdout(&output);
    assert!(out.contains("bpgen"), "should contain 'bpgen'");
    assert!(out.contains(env!("CARGO_PKG_VERSION")), "should contain version");
}

#[test]
fn test_version_flag() {
    let output = run_bpgen(&["--version"]);
    assert!(output.status.success(), "--version should exit 0");
    assert!(stdout(&output).contains(env!("CARGO_PKG_VERSION")));
}

// ── Generate ──────────────────────────────────────────────

#[test]
fn test_generate_two_sum() {
    let (_tmp, dir) = scratch_problem("two-sum");
    let output = run_bpgen(&["generate", dir.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("generated"));

    for sub in ["boilerplate", "boilerplate-full"] {
        for file in ["function.cpp", "function.js", "function.rs"] {
            assert!(dir.join(sub).join(file).is_file(), "{}/{} missing", sub, file);
        }
    }

    let rust = fs::read_to_string(dir.join("boilerplate/function.rs")).unwrap();
    assert!(rust.contains("pub fn two_sum(nums: Vec<i32>, target: i32) -> Vec<i32>"));
    let cpp = fs::read_to_string(dir.join("boilerplate-full/function.cpp")).unwrap();
    assert!(cpp.contains("int main()"));
}

#[test]
fn test_generate_json_report() {
    let (_tmp, dir) = scratch_problem("two-sum");
    let output = run_bpgen(&["generate", "--json", dir.to_str().unwrap()]);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("should be valid JSON");
    assert_eq!(json["problem_name"], "Two Sum");
    assert_eq!(json["function_name"], "twoSum");
    let files = json["files"].as_array().unwrap();
    assert_eq!(files.len(), 6);
    assert_eq!(files[0]["language"], "cpp");
    assert_eq!(files[0]["mode"], "partial");
    assert_eq!(files[5]["language"], "rust");
    assert_eq!(files[5]["mode"], "full");
    assert_eq!(files[0]["sha256"].as_str().unwrap().len(), 64);
}

#[test]
fn test_generate_idempotent() {
    let (_tmp, dir) = scratch_problem("two-sum");
    let first = run_bpgen(&["generate", "--json", dir.to_str().unwrap()]);
    let snapshot = fs::read(dir.join("boilerplate-full/function.js")).unwrap();
    let second = run_bpgen(&["generate", "--json", dir.to_str().unwrap()]);

    assert_eq!(stdout(&first), stdout(&second), "reports should be identical");
    assert_eq!(snapshot, fs::read(dir.join("boilerplate-full/function.js")).unwrap());
}

#[test]
fn test_generate_with_layout_hints() {
    let (_tmp, dir) = scratch_problem("merge-intervals");
    let output = run_bpgen(&["generate", dir.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let rust = fs::read_to_string(dir.join("boilerplate-full/function.rs")).unwrap();
    assert!(rust.contains("pub fn merge_intervals(intervals: Vec<(i32, i32)>) -> Vec<(i32, i32)>"));
    assert!(rust.contains("for item in &merged {"));
    let js = fs::read_to_string(dir.join("boilerplate-full/function.js")).unwrap();
    assert!(js.contains("const intervals = readArray(readTuple(readInteger, readInteger))(reader);"));
}

#[test]
fn test_generate_missing_structure() {
    let tmp = TempDir::new().unwrap();
    let output = run_bpgen(&["generate", tmp.path().to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1), "missing Structure.md should exit 1");
    assert!(stderr(&output).contains("Structural error"));
}

#[test]
fn test_generate_unmappable_type() {
    let (_tmp, dir) = scratch_problem("unmappable-type");
    let output = run_bpgen(&["generate", dir.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("cannot emit type 'quaternion'"));
    assert!(!dir.join("boilerplate").exists(), "nothing should be written");
}

#[test]
fn test_generate_json_error() {
    let (_tmp, dir) = scratch_problem("bad-function-name");
    let output = run_bpgen(&["generate", "--json", dir.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("should be valid JSON");
    assert!(json["error"].as_str().unwrap().contains("Function Name"));
}

// ── Validate ──────────────────────────────────────────────

#[test]
fn test_validate_valid_problem() {
    let output = run_bpgen(&["validate", fixture("two-sum").to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("valid"));
}

#[test]
fn test_validate_missing_tests_directory() {
    let output = run_bpgen(&["validate", fixture("missing-tests").to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1), "invalid problem should exit 1");
    let err = stderr(&output);
    assert!(err.contains("missing required directory: tests"));
    assert!(err.contains("invalid"));
}

#[test]
fn test_validate_json_output() {
    let output = run_bpgen(&["validate", "--json", fixture("two-sum").to_str().unwrap()]);
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("should be valid JSON");
    assert_eq!(json["valid"], true);
    assert_eq!(json["errors"], 0);
    assert_eq!(json["checks_passed"], 6);
}

#[test]
fn test_validate_json_invalid() {
    let output = run_bpgen(&["validate", "--json", fixture("bad-function-name").to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("should be valid JSON");
    assert_eq!(json["valid"], false);
    assert_eq!(json["errors"], 1);
    assert_eq!(json["diagnostics"][0]["kind"], "structure");
    assert_eq!(json["diagnostics"][0]["severity"], "error");
}

#[test]
fn test_validate_quiet_valid() {
    let output = run_bpgen(&["validate", "--quiet", fixture("two-sum").to_str().unwrap()]);
    assert!(output.status.success());
    assert!(stdout(&output).is_empty(), "--quiet should print nothing on success");
}

#[test]
fn test_validate_does_not_check_type_expressions() {
    let output = run_bpgen(&["validate", fixture("unmappable-type").to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
}

#[test]
fn test_validate_dry_run_reports_generation_errors() {
    let output = run_bpgen(&["validate", "--dry-run", fixture("unmappable-type").to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("error [generation] in Structure.md"));
    assert!(err.contains("cpp: cannot emit type 'quaternion'"));
    assert!(err.contains("rust: cannot emit type 'quaternion'"));
    assert!(err.contains("(3 errors,"));
}

#[test]
fn test_validate_dry_run_valid_problem() {
    let output = run_bpgen(&["validate", "--dry-run", "--json", fixture("two-sum").to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("should be valid JSON");
    assert_eq!(json["valid"], true);
    assert_eq!(json["generation_errors"], serde_json::json!([]));
}

#[test]
fn test_validate_nonexistent_directory() {
    let output = run_bpgen(&["validate", "no-such-problem"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("does not exist"));
}

// ── Parse ─────────────────────────────────────────────────

#[test]
fn test_parse_outputs_definition() {
    let output = run_bpgen(&["parse", &structure("two-sum")]);
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("should be valid JSON");
    assert_eq!(json["function_name"], "twoSum");
    assert_eq!(json["parameters"][0]["name"], "nums");
    assert_eq!(json["parameters"][0]["ty"]["kind"], "array");
    assert_eq!(json["parameters"][0]["ty"]["of"]["kind"], "integer");
    assert_eq!(json["parameters"][1]["order"], 1);
    assert_eq!(json["output_name"], "result");
}

#[test]
fn test_parse_full_outputs_layouts() {
    let output = run_bpgen(&["parse", "--full", &structure("merge-intervals")]);
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("should be valid JSON");
    assert_eq!(json["inputs"][0]["layout"], "counted");
    assert_eq!(json["output_layout"], "lines");
    assert_eq!(json["definition"]["output_name"], "merged");
}

#[test]
fn test_parse_invalid_function_name() {
    let output = run_bpgen(&["parse", &structure("bad-function-name")]);
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("Parse error"));
    assert!(err.contains("line 2 (Function Name)"));
}

#[test]
fn test_parse_nonexistent_file() {
    let output = run_bpgen(&["parse", "nonexistent.md"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("cannot read"));
}

// ── Emit ──────────────────────────────────────────────────

#[test]
fn test_emit_each_language() {
    let expectations = [
        ("cpp", "std::vector<int> twoSum(std::vector<int>& nums, int target)"),
        ("js", "function twoSum(nums, target)"),
        ("rust", "pub fn two_sum(nums: Vec<i32>, target: i32) -> Vec<i32>"),
    ];
    for (lang, signature) in expectations {
        let output = run_bpgen(&["emit", &structure("two-sum"), "--lang", lang]);
        assert!(output.status.success(), "{} failed: {}", lang, stderr(&output));
        let out = stdout(&output);
        assert!(out.contains(signature), "{} output:\n{}", lang, out);
        assert!(!out.contains("TokenReader"), "{} partial should have no I/O", lang);
    }
}

#[test]
fn test_emit_full_program() {
    let output = run_bpgen(&["emit", &structure("two-sum"), "--lang", "cpp", "--full"]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("class TokenReader"));
    assert!(out.contains("int main()"));
}

#[test]
fn test_emit_unknown_language() {
    let output = run_bpgen(&["emit", &structure("two-sum"), "--lang", "cobol"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("unknown language 'cobol'"));
}

#[test]
fn test_emit_unmappable_type() {
    let output = run_bpgen(&["emit", &structure("unmappable-type"), "--lang", "js"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("javascript: cannot emit type 'quaternion' for parameter 'x'"));
    assert!(stdout(&output).is_empty());
}

// ── Determinism: CLI output ───────────────────────────────

#[test]
fn test_cli_emit_determinism_100_iterations() {
    let file = structure("merge-intervals");
    let args = ["emit", file.as_str(), "--lang", "rust", "--full"];
    let first = run_bpgen(&args);
    assert!(first.status.success());

    for i in 0..100 {
        let output = run_bpgen(&args);
        assert_eq!(
            first.stdout, output.stdout,
            "Determinism failure at iteration {}",
            i
        );
    }
}
