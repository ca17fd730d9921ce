//! Generation orchestrator — problem folder to boilerplate directories
//!
//! Reads the structure document once, then runs two independent passes:
//!
//! 1. **Partial**: `parse` → `emit` for every language → `boilerplate/`
//! 2. **Full**: `parse_full` → `emit_full` for every language → `boilerplate-full/`
//!
//! Within a pass all three sources are emitted before anything is written,
//! so an unmappable type never leaves a half-written directory. Across passes
//! there is no rollback: when the full pass fails, the partial output already
//! on disk stays there.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, error, info};

use crate::emitter::{self, Emitter, Language};
use crate::error::{EmissionError, Error, Result};
use crate::parser::{self, ParseMode};

/// File and directory names inside a problem folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub structure_file: String,
    pub partial_dir: String,
    pub full_dir: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            structure_file: "Structure.md".to_string(),
            partial_dir: "boilerplate".to_string(),
            full_dir: "boilerplate-full".to_string(),
        }
    }
}

/// One written source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedFile {
    pub language: Language,
    pub mode: ParseMode,
    pub path: PathBuf,
    /// Lowercase hex SHA-256 of the file contents
    pub sha256: String,
    pub bytes: usize,
}

/// Everything a successful `generate` wrote
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub problem_name: String,
    pub function_name: String,
    /// Partial files first, then full; languages in `Language::ALL` order
    pub files: Vec<GeneratedFile>,
}

impl GenerationReport {
    pub fn files_for(&self, mode: ParseMode) -> impl Iterator<Item = &GeneratedFile> {
        self.files.iter().filter(move |f| f.mode == mode)
    }
}

// ── Public API ─────────────────────────────────────────────

/// Generate both boilerplate directories with the default layout
pub fn generate(problem_dir: impl AsRef<Path>) -> Result<GenerationReport> {
    generate_with(problem_dir, &GeneratorOptions::default())
}

/// Generate both boilerplate directories with a custom layout
pub fn generate_with(
    problem_dir: impl AsRef<Path>,
    options: &GeneratorOptions,
) -> Result<GenerationReport> {
    let dir = problem_dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::Structural {
            what: "problem directory".to_string(),
            path: dir.to_path_buf(),
        });
    }

    let structure_path = dir.join(&options.structure_file);
    if !structure_path.is_file() {
        return Err(Error::Structural {
            what: options.structure_file.clone(),
            path: structure_path,
        });
    }
    let text = fs::read_to_string(&structure_path).map_err(|e| Error::io(&structure_path, e))?;

    info!(problem = %dir.display(), "generating partial boilerplate");
    let definition = parser::parse(&text)?;
    let sources = emit_all(|emitter| emitter.emit(&definition))?;
    let mut files = write_all(&dir.join(&options.partial_dir), ParseMode::Partial, sources)?;

    info!(problem = %dir.display(), "generating full boilerplate");
    let full = parser::parse_full(&text)?;
    let sources = emit_all(|emitter| emitter.emit_full(&full))?;
    files.extend(write_all(&dir.join(&options.full_dir), ParseMode::Full, sources)?);

    Ok(GenerationReport {
        problem_name: definition.problem_name,
        function_name: definition.function_name,
        files,
    })
}

/// `generate` for script callers: logs the failure and reports success
pub fn generate_boilerplate(problem_dir: impl AsRef<Path>) -> bool {
    let dir = problem_dir.as_ref();
    match generate(dir) {
        Ok(report) => {
            info!(
                problem = %report.problem_name,
                files = report.files.len(),
                "boilerplate generated"
            );
            true
        }
        Err(err) => {
            error!(problem = %dir.display(), "{}", err);
            false
        }
    }
}

// ── Internals ──────────────────────────────────────────────

fn emit_all<F>(mut emit_one: F) -> Result<Vec<(Language, String)>>
where
    F: FnMut(&dyn Emitter) -> std::result::Result<String, EmissionError>,
{
    Language::ALL
        .iter()
        .map(|&language| emitter::emitter_for(language))
        .map(|emitter| -> Result<(Language, String)> {
            let language = emitter.language();
            let source = emit_one(emitter)?;
            debug!(%language, bytes = source.len(), "emitted source");
            Ok((language, source))
        })
        .collect()
}

fn write_all(
    out_dir: &Path,
    mode: ParseMode,
    sources: Vec<(Language, String)>,
) -> Result<Vec<GeneratedFile>> {
    fs::create_dir_all(out_dir).map_err(|e| Error::io(out_dir, e))?;

    let mut files = Vec::with_capacity(sources.len());
    for (language, source) in sources {
        let path = out_dir.join(language.file_name());
        fs::write(&path, &source).map_err(|e| Error::io(&path, e))?;
        info!(path = %path.display(), %language, ?mode, "wrote boilerplate");

        files.push(GeneratedFile {
            language,
            mode,
            sha256: sha256_hex(source.as_bytes()),
            bytes: source.len(),
            path,
        });
    }
    Ok(files)
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
