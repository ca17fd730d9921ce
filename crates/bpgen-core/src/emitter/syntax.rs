//! Type syntax tables
//!
//! Every target language spells `TypeSpec` kinds through one `TypeSyntax`
//! value: scalar names plus templates for composites, where `{}` marks the
//! element (arrays) or the separator-joined components (pairs, tuples).
//! Rendering is the same walk for every language; only the table differs.

use crate::emitter::Language;
use crate::error::EmissionError;
use crate::types::TypeSpec;

/// Spelling of each `TypeSpec` kind in one language
#[derive(Debug, Clone, Copy)]
pub struct TypeSyntax {
    pub language: Language,
    pub integer: &'static str,
    pub float: &'static str,
    pub boolean: &'static str,
    pub string: &'static str,
    pub array: &'static str,
    pub pair: &'static str,
    pub tuple: &'static str,
    pub separator: &'static str,
    /// Custom type names this language knows how to spell
    pub custom: &'static [(&'static str, &'static str)],
}

impl TypeSyntax {
    /// Spell `ty`, or `None` when some part of it has no mapping
    pub fn render(&self, ty: &TypeSpec) -> Option<String> {
        match ty {
            TypeSpec::Integer => Some(self.integer.to_string()),
            TypeSpec::Float => Some(self.float.to_string()),
            TypeSpec::Boolean => Some(self.boolean.to_string()),
            TypeSpec::String => Some(self.string.to_string()),
            TypeSpec::Array(inner) => Some(fill(self.array, &self.render(inner)?)),
            TypeSpec::Tuple(items) => {
                let parts = items
                    .iter()
                    .map(|item| self.render(item))
                    .collect::<Option<Vec<_>>>()?;
                let template = if items.len() == 2 { self.pair } else { self.tuple };
                Some(fill(template, &parts.join(self.separator)))
            }
            TypeSpec::Custom(name) => self
                .custom
                .iter()
                .find(|(custom, _)| *custom == name.as_str())
                .map(|(_, spelled)| spelled.to_string()),
        }
    }

    /// Spell `ty` for use in `context`, failing with the unmapped part
    pub fn render_for(&self, ty: &TypeSpec, context: &str) -> Result<String, EmissionError> {
        self.render(ty).ok_or_else(|| EmissionError {
            language: self.language,
            item: match ty.find_custom() {
                Some(name) => format!("type '{}'", name),
                None => format!("type '{}'", ty),
            },
            context: context.to_string(),
        })
    }
}

fn fill(template: &str, inner: &str) -> String {
    template.replacen("{}", inner, 1)
}

/// Reject identifiers the target language (or its generated harness) reserves
pub fn check_identifier(
    language: Language,
    reserved: &[&str],
    name: &str,
    context: &str,
) -> Result<(), EmissionError> {
    if reserved.contains(&name) {
        return Err(EmissionError {
            language,
            item: format!("reserved word '{}'", name),
            context: context.to_string(),
        });
    }
    Ok(())
}
