//! Definition parser — structure document to `ProblemDefinition`
//!
//! Parsing is line oriented: `lines::classify` picks out labeled lines,
//! `type_expr` resolves type expressions, and this module assembles and
//! checks the result. Prose between labeled lines is ignored, so authors can
//! annotate their `Structure.md` freely.
//!
//! Two configurations read the same document:
//!
//! - **Partial** (`parse`): signature only. Zero input fields are allowed
//!   (a function without parameters); format hints are treated as prose.
//! - **Full** (`parse_full`): signature plus I/O layouts. At least one input
//!   field is required and `Input Format:` / `Output Format:` hints are read
//!   and checked against the declared types.
//!
//! # Errors
//! Returns `ParseError` with the line and field label for every failure.
//! Nothing is auto-corrected.

pub mod lines;
pub mod type_expr;

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::error::ParseError;
use crate::{
    FullProblemDefinition, InputField, InputLayout, OutputLayout, ParameterSpec,
    ProblemDefinition, TypeSpec,
};
use lines::{Label, LabeledField};
use type_expr::{is_identifier, is_type_keyword, parse_field_type, parse_type_expr};

/// Name used for the return value when the `Output Field:` line has none
pub const DEFAULT_OUTPUT_NAME: &str = "result";

/// Which generation mode the document is parsed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseMode {
    Partial,
    Full,
}

impl ParseMode {
    fn min_inputs(&self) -> usize {
        match self {
            ParseMode::Partial => 0,
            ParseMode::Full => 1,
        }
    }
}

// ── Public API ─────────────────────────────────────────────

/// Parse a structure document for signature-only generation
///
/// # Example
/// ```
/// let def = bpgen_core::parse(r#"Problem Name: "Two Sum"
/// Function Name: twoSum
/// Input Field: nums array of integer
/// Input Field: target integer
/// Output Field: array of integer"#).unwrap();
/// assert_eq!(def.parameters.len(), 2);
/// ```
pub fn parse(text: &str) -> Result<ProblemDefinition, ParseError> {
    let fields = lines::classify(text);
    parse_definition(&fields, ParseMode::Partial)
}

/// Parse a structure document for full generation (signature + I/O layouts)
pub fn parse_full(text: &str) -> Result<FullProblemDefinition, ParseError> {
    let fields = lines::classify(text);
    let definition = parse_definition(&fields, ParseMode::Full)?;
    let inputs = parse_input_layouts(&fields, &definition)?;
    let output_layout = parse_output_layout(&fields, &definition)?;

    Ok(FullProblemDefinition {
        definition,
        inputs,
        output_layout,
    })
}

// ── Definition ─────────────────────────────────────────────

fn parse_definition(
    fields: &[LabeledField],
    mode: ParseMode,
) -> Result<ProblemDefinition, ParseError> {
    debug!(fields = fields.len(), ?mode, "parsing structure document");

    let problem_name = parse_problem_name(require_single(fields, Label::ProblemName)?)?;
    let function_name = parse_function_name(require_single(fields, Label::FunctionName)?)?;

    let mut parameters: Vec<ParameterSpec> = Vec::new();
    let mut seen = HashSet::new();
    for field in fields.iter().filter(|f| f.label == Label::InputField) {
        let parameter = parse_input_field(field, parameters.len())?;
        if !seen.insert(parameter.name.clone()) {
            return Err(ParseError::at(
                field.line,
                Label::InputField.as_str(),
                format!("duplicate parameter name '{}'", parameter.name),
            ));
        }
        parameters.push(parameter);
    }

    if parameters.len() < mode.min_inputs() {
        return Err(ParseError::new(
            Label::InputField.as_str(),
            format!(
                "at least {} `Input Field:` line is required for full generation",
                mode.min_inputs()
            ),
        ));
    }

    let output = require_single(fields, Label::OutputField)?;
    let (output_name, return_type) = parse_output_field(output)?;
    let output_name = match output_name {
        Some(name) if seen.contains(&name) => {
            return Err(ParseError::at(
                output.line,
                Label::OutputField.as_str(),
                format!("output name '{}' is already a parameter name", name),
            ));
        }
        Some(name) => name,
        None => {
            let mut name = DEFAULT_OUTPUT_NAME.to_string();
            while seen.contains(&name) {
                name.push('_');
            }
            name
        }
    };

    Ok(ProblemDefinition {
        problem_name,
        function_name,
        parameters,
        return_type,
        output_name,
    })
}

/// The one field with `label`; absent or repeated labels are errors
fn require_single(fields: &[LabeledField], label: Label) -> Result<&LabeledField, ParseError> {
    let mut matching = fields.iter().filter(|f| f.label == label);
    let first = matching.next().ok_or_else(|| {
        ParseError::new(label.as_str(), format!("missing `{}:` line", label))
    })?;
    if let Some(second) = matching.next() {
        return Err(ParseError::at(
            second.line,
            label.as_str(),
            format!("`{}:` already given on line {}", label, first.line),
        ));
    }
    Ok(first)
}

fn parse_problem_name(field: &LabeledField) -> Result<String, ParseError> {
    let value = field.value.as_str();
    let inner = value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or_else(|| {
            ParseError::at(
                field.line,
                Label::ProblemName.as_str(),
                format!("problem name must be in double quotes, found '{}'", value),
            )
        })?;

    if inner.trim().is_empty() {
        return Err(ParseError::at(
            field.line,
            Label::ProblemName.as_str(),
            "problem name is empty",
        ));
    }
    Ok(inner.to_string())
}

fn parse_function_name(field: &LabeledField) -> Result<String, ParseError> {
    if field.value.is_empty() {
        return Err(ParseError::at(
            field.line,
            Label::FunctionName.as_str(),
            "missing function name",
        ));
    }
    if !is_identifier(&field.value) {
        return Err(ParseError::at(
            field.line,
            Label::FunctionName.as_str(),
            format!(
                "'{}' is not a valid identifier (letters, digits, underscore; must start with a letter)",
                field.value
            ),
        ));
    }
    Ok(field.value.clone())
}

/// `<name> <type-expression>`
fn parse_input_field(field: &LabeledField, order: usize) -> Result<ParameterSpec, ParseError> {
    let line = field.line;
    let label = Label::InputField.as_str();

    let (name, type_text) = split_first_word(&field.value);
    if name.is_empty() {
        return Err(ParseError::at(line, label, "missing parameter name and type"));
    }
    if !is_identifier(name) {
        return Err(ParseError::at(
            line,
            label,
            format!("'{}' is not a valid parameter name", name),
        ));
    }
    if type_text.is_empty() {
        return Err(ParseError::at(
            line,
            label,
            format!("missing type expression for '{}'", name),
        ));
    }

    Ok(ParameterSpec {
        name: name.to_string(),
        ty: parse_field_type(type_text, line, label)?,
        order,
    })
}

/// `<type-expression>` or `<name> <type-expression>`
fn parse_output_field(field: &LabeledField) -> Result<(Option<String>, TypeSpec), ParseError> {
    let line = field.line;
    let label = Label::OutputField.as_str();
    let value = field.value.as_str();

    let whole_error = match parse_type_expr(value) {
        Ok(ty) => return Ok((None, ty)),
        Err(message) => message,
    };

    let (name, type_text) = split_first_word(value);
    if type_text.is_empty() || is_type_keyword(name) || !is_identifier(name) {
        return Err(ParseError::at(line, label, whole_error));
    }

    let ty = parse_field_type(type_text, line, label)?;
    Ok((Some(name.to_string()), ty))
}

fn split_first_word(text: &str) -> (&str, &str) {
    let text = text.trim();
    match text.split_once(char::is_whitespace) {
        Some((first, rest)) => (first, rest.trim()),
        None => (text, ""),
    }
}

// ── Layouts (full mode) ────────────────────────────────────

fn parse_input_layouts(
    fields: &[LabeledField],
    definition: &ProblemDefinition,
) -> Result<Vec<InputField>, ParseError> {
    let label = Label::InputFormat.as_str();
    let mut layouts: Vec<Option<InputLayout>> = vec![None; definition.parameters.len()];

    for field in fields.iter().filter(|f| f.label == Label::InputFormat) {
        let line = field.line;
        let words: Vec<&str> = field.value.split_whitespace().collect();
        let [name, layout_text] = words.as_slice() else {
            return Err(ParseError::at(
                line,
                label,
                format!("expected `<field> <layout>`, found '{}'", field.value),
            ));
        };

        let parameter = definition.parameter(name).ok_or_else(|| {
            ParseError::at(line, label, format!("'{}' is not an input field", name))
        })?;

        let layout = match *layout_text {
            "counted" => InputLayout::Counted,
            "line" => InputLayout::Line,
            other => {
                return Err(ParseError::at(
                    line,
                    label,
                    format!("unknown input layout '{}' (expected counted or line)", other),
                ))
            }
        };

        if layout == InputLayout::Line && !parameter.ty.element().is_some_and(TypeSpec::is_scalar) {
            return Err(ParseError::at(
                line,
                label,
                format!(
                    "layout 'line' needs an array of scalars, but '{}' is {}",
                    name, parameter.ty
                ),
            ));
        }

        let slot = &mut layouts[parameter.order];
        if slot.is_some() {
            return Err(ParseError::at(
                line,
                label,
                format!("layout for '{}' already given", name),
            ));
        }
        *slot = Some(layout);
    }

    Ok(definition
        .parameters
        .iter()
        .zip(layouts)
        .map(|(parameter, layout)| InputField {
            parameter: parameter.clone(),
            layout: layout.unwrap_or_default(),
        })
        .collect())
}

fn parse_output_layout(
    fields: &[LabeledField],
    definition: &ProblemDefinition,
) -> Result<OutputLayout, ParseError> {
    let label = Label::OutputFormat.as_str();
    let mut hints = fields.iter().filter(|f| f.label == Label::OutputFormat);

    let Some(field) = hints.next() else {
        return Ok(OutputLayout::default());
    };
    if let Some(second) = hints.next() {
        return Err(ParseError::at(
            second.line,
            label,
            format!("`{}:` already given on line {}", label, field.line),
        ));
    }

    let layout = match field.value.as_str() {
        "line" => OutputLayout::Line,
        "lines" => OutputLayout::Lines,
        other => {
            return Err(ParseError::at(
                field.line,
                label,
                format!("unknown output layout '{}' (expected line or lines)", other),
            ))
        }
    };

    if layout == OutputLayout::Lines && !definition.return_type.is_array() {
        return Err(ParseError::at(
            field.line,
            label,
            format!(
                "layout 'lines' needs an array return type, found {}",
                definition.return_type
            ),
        ));
    }
    Ok(layout)
}
