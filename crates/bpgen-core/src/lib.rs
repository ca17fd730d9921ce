//! bpgen core - problem definition parser and boilerplate generator
//!
//! Reads the `Structure.md` document of a coding problem and emits typed
//! starter code for C++, JavaScript and Rust.
//!
//! # Architecture
//!
//! ```text
//! Structure.md → Parser (partial | full) → ProblemDefinition
//!                                              ↓
//!                      Emitter (cpp | js | rust) → source string
//!                                              ↓
//!                       Generator → boilerplate/ + boilerplate-full/
//! ```
//!
//! The validator is a sibling of this pipeline: it checks a problem folder's
//! layout, documents and test files as text and never calls the parser or
//! the emitters. Callers that want both run them side by side (see
//! `bpgen validate --dry-run`).
//!
//! # Guarantees
//!
//! - **Deterministic**: same document always produces identical sources
//! - **Order preserving**: parameters keep declaration order in every language
//! - **Loud**: malformed documents and unmappable types are errors, never guesses

pub mod emitter;
pub mod error;
pub mod generator;
pub mod parser;
pub mod types;
pub mod validator;

pub use emitter::{emit, emit_full, Language};
pub use error::{EmissionError, Error, ParseError, Result};
pub use generator::{generate, generate_boilerplate, GenerationReport, GeneratorOptions};
pub use parser::{parse, parse_full};
pub use types::TypeSpec;
pub use validator::{validate_problem, ValidationReport};

use serde::{Deserialize, Serialize};

/// Version of the core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// One declared function parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    pub ty: TypeSpec,
    /// Zero-based declaration position
    pub order: usize,
}

/// Signature-level description of a problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemDefinition {
    pub problem_name: String,
    pub function_name: String,
    /// Sorted by `order`
    pub parameters: Vec<ParameterSpec>,
    pub return_type: TypeSpec,
    /// Name given on the `Output Field:` line, `result` when omitted
    pub output_name: String,
}

impl ProblemDefinition {
    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

/// How a parameter is read from a test input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputLayout {
    /// Scalars are one token, arrays carry a leading length token
    #[default]
    Counted,
    /// An array of scalars spanning exactly one input line
    Line,
}

/// How the return value is written to a test output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputLayout {
    /// The whole value on one line, space separated
    #[default]
    Line,
    /// One top-level array element per line
    Lines,
}

impl std::fmt::Display for InputLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            InputLayout::Counted => write!(f, "counted"),
            InputLayout::Line => write!(f, "line"),
        }
    }
}

impl std::fmt::Display for OutputLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            OutputLayout::Line => write!(f, "line"),
            OutputLayout::Lines => write!(f, "lines"),
        }
    }
}

/// Parameter plus the layout used to read it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputField {
    pub parameter: ParameterSpec,
    pub layout: InputLayout,
}

/// A problem definition with the I/O metadata needed by full generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullProblemDefinition {
    pub definition: ProblemDefinition,
    /// One entry per parameter, in parameter order
    pub inputs: Vec<InputField>,
    pub output_layout: OutputLayout,
}
