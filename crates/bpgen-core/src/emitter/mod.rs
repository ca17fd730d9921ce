//! Per-language emitters — `ProblemDefinition` to source text
//!
//! Each target language implements `Emitter` with its own `TypeSyntax` table
//! and naming rules. Partial emission produces a function stub; full emission
//! wraps the same stub in a program that reads the parameters from stdin,
//! calls the function and writes the result to stdout.
//!
//! # Guarantees
//! - Parameter order in every signature equals declaration order
//! - Emission is pure string generation; nothing touches the filesystem
//! - A type or name the language cannot express is an `EmissionError`,
//!   never a guessed stub

pub mod cpp;
pub mod javascript;
pub mod rust;
pub mod syntax;

use std::collections::HashSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EmissionError;
use crate::{FullProblemDefinition, ProblemDefinition};
use syntax::{check_identifier, TypeSyntax};

/// Comment placed where the solver writes their code
pub const IMPLEMENTATION_PLACEHOLDER: &str = "Implementation goes here";

/// Supported target languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Cpp,
    JavaScript,
    Rust,
}

impl Language {
    /// Emission order used by the generator
    pub const ALL: [Language; 3] = [Language::Cpp, Language::JavaScript, Language::Rust];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Cpp => "cpp",
            Language::JavaScript => "javascript",
            Language::Rust => "rust",
        }
    }

    /// File extension of generated sources
    pub fn extension(&self) -> &'static str {
        match self {
            Language::Cpp => "cpp",
            Language::JavaScript => "js",
            Language::Rust => "rs",
        }
    }

    /// `function.<ext>`
    pub fn file_name(&self) -> String {
        format!("function.{}", self.extension())
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cpp" | "c++" | "cxx" => Ok(Language::Cpp),
            "js" | "javascript" | "node" => Ok(Language::JavaScript),
            "rust" | "rs" => Ok(Language::Rust),
            other => Err(format!(
                "unknown language '{}' (expected cpp, js or rust)",
                other
            )),
        }
    }
}

/// Source generator for one target language
pub trait Emitter {
    fn language(&self) -> Language;

    /// Function stub only
    fn emit(&self, definition: &ProblemDefinition) -> Result<String, EmissionError>;

    /// Stub plus stdin parsing and stdout serialization
    fn emit_full(&self, full: &FullProblemDefinition) -> Result<String, EmissionError>;
}

/// The emitter registered for `language`
pub fn emitter_for(language: Language) -> &'static dyn Emitter {
    match language {
        Language::Cpp => &cpp::CppEmitter,
        Language::JavaScript => &javascript::JavaScriptEmitter,
        Language::Rust => &rust::RustEmitter,
    }
}

/// Emit a signature-only stub for `language`
pub fn emit(language: Language, definition: &ProblemDefinition) -> Result<String, EmissionError> {
    emitter_for(language).emit(definition)
}

/// Emit a stub with I/O scaffolding for `language`
pub fn emit_full(
    language: Language,
    full: &FullProblemDefinition,
) -> Result<String, EmissionError> {
    emitter_for(language).emit_full(full)
}

// ── Shared signature resolution ───────────────────────────

/// One parameter spelled for a target language
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SignatureParam {
    pub name: String,
    pub ty: String,
}

/// A definition's names and types spelled for a target language
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Signature {
    pub function_name: String,
    pub params: Vec<SignatureParam>,
    pub return_type: String,
    pub output_name: String,
}

/// Naming and reserved words of one target language
pub(crate) struct Conventions {
    pub syntax: TypeSyntax,
    /// Language keywords plus names used by the generated harness
    pub reserved: &'static [&'static str],
    pub rename: fn(&str) -> String,
}

impl Conventions {
    /// Spell every name and type of `definition`, in parameter order
    pub fn resolve(&self, definition: &ProblemDefinition) -> Result<Signature, EmissionError> {
        let language = self.syntax.language;
        let function_name = (self.rename)(&definition.function_name);
        check_identifier(language, self.reserved, &function_name, "function name")?;

        let mut seen = HashSet::new();
        let mut params = Vec::with_capacity(definition.parameters.len());
        for parameter in &definition.parameters {
            let context = format!("parameter '{}'", parameter.name);
            let name = (self.rename)(&parameter.name);
            check_identifier(language, self.reserved, &name, &context)?;
            if name == function_name {
                return Err(EmissionError {
                    language,
                    item: format!("parameter name '{}'", name),
                    context: format!("{} (same as the function name)", context),
                });
            }
            if !seen.insert(name.clone()) {
                return Err(EmissionError {
                    language,
                    item: format!("parameter name '{}'", name),
                    context: format!("{} (clashes after renaming)", context),
                });
            }
            params.push(SignatureParam {
                ty: self.syntax.render_for(&parameter.ty, &context)?,
                name,
            });
        }

        let output_name = (self.rename)(&definition.output_name);
        check_identifier(language, self.reserved, &output_name, "return value")?;
        if seen.contains(&output_name) || output_name == function_name {
            return Err(EmissionError {
                language,
                item: format!("output name '{}'", output_name),
                context: "return value (clashes after renaming)".to_string(),
            });
        }

        Ok(Signature {
            function_name,
            params,
            return_type: self.syntax.render_for(&definition.return_type, "return value")?,
            output_name,
        })
    }
}

/// Names unchanged
pub(crate) fn keep_name(name: &str) -> String {
    name.to_string()
}

/// Make a problem name safe inside a line or block comment
pub(crate) fn comment_text(text: &str) -> String {
    text.replace("*/", "* /").replace(['\n', '\r'], " ")
}
