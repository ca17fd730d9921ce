//! Rust emitter
//!
//! Function and parameter names are converted to snake_case (`twoSum`
//! becomes `two_sum`). Parameters are taken by value. Full programs read
//! through a `ReadValue` trait; tuple impls are generated only for the
//! arities the definition uses, so the program compiles without warnings
//! about unused generic helpers.

use std::collections::BTreeSet;

use super::syntax::TypeSyntax;
use super::{comment_text, Conventions, Emitter, Language, Signature, IMPLEMENTATION_PLACEHOLDER};
use crate::error::EmissionError;
use crate::{FullProblemDefinition, InputLayout, OutputLayout, ProblemDefinition, TypeSpec};

pub struct RustEmitter;

const SYNTAX: TypeSyntax = TypeSyntax {
    language: Language::Rust,
    integer: "i32",
    float: "f64",
    boolean: "bool",
    string: "String",
    array: "Vec<{}>",
    pair: "({})",
    tuple: "({})",
    separator: ", ",
    custom: &[],
};

const RESERVED: &[&str] = &[
    // strict and reserved keywords
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "static", "struct", "super", "trait", "true", "try", "type", "typeof",
    "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
    // harness
    "main", "std", "io", "input", "reader", "read_line",
];

const CONVENTIONS: Conventions = Conventions {
    syntax: SYNTAX,
    reserved: RESERVED,
    rename: to_snake_case,
};

const TOKEN_READER: &str = r#"struct TokenReader {
    lines: Vec<Vec<String>>,
    line: usize,
    col: usize,
}

impl TokenReader {
    fn new(text: &str) -> Self {
        let lines = text
            .lines()
            .map(|line| line.split_whitespace().map(String::from).collect())
            .collect();
        TokenReader { lines, line: 0, col: 0 }
    }

    fn token(&mut self) -> String {
        while self.line < self.lines.len() && self.col >= self.lines[self.line].len() {
            self.line += 1;
            self.col = 0;
        }
        let token = self
            .lines
            .get(self.line)
            .and_then(|line| line.get(self.col))
            .cloned()
            .expect("unexpected end of input");
        self.col += 1;
        token
    }
}
"#;

const READ_HELPERS: &str = r#"trait ParseToken: Sized {
    fn parse_token(token: &str) -> Self;
}

impl ParseToken for i32 {
    fn parse_token(token: &str) -> Self {
        token.parse().expect("malformed integer")
    }
}

impl ParseToken for f64 {
    fn parse_token(token: &str) -> Self {
        token.parse().expect("malformed float")
    }
}

impl ParseToken for bool {
    fn parse_token(token: &str) -> Self {
        token == "true" || token == "1"
    }
}

impl ParseToken for String {
    fn parse_token(token: &str) -> Self {
        token.to_string()
    }
}

trait ReadValue: Sized {
    fn read_value(reader: &mut TokenReader) -> Self;
}

macro_rules! read_scalar {
    ($($ty:ty),*) => {$(
        impl ReadValue for $ty {
            fn read_value(reader: &mut TokenReader) -> Self {
                <$ty as ParseToken>::parse_token(&reader.token())
            }
        }
    )*};
}

read_scalar!(i32, f64, bool, String);

impl<T: ReadValue> ReadValue for Vec<T> {
    fn read_value(reader: &mut TokenReader) -> Self {
        let length: usize = reader.token().parse().expect("malformed length");
        (0..length).map(|_| T::read_value(reader)).collect()
    }
}
"#;

const READ_LINE: &str = r#"
impl TokenReader {
    fn line_tokens(&mut self) -> Vec<String> {
        if self.col > 0 && self.line < self.lines.len() && self.col >= self.lines[self.line].len() {
            self.line += 1;
            self.col = 0;
        }
        let rest = self
            .lines
            .get(self.line)
            .map(|line| line[self.col..].to_vec())
            .expect("unexpected end of input");
        self.line += 1;
        self.col = 0;
        rest
    }
}

fn read_line<T: ParseToken>(reader: &mut TokenReader) -> Vec<T> {
    reader.line_tokens().iter().map(|token| T::parse_token(token)).collect()
}
"#;

const WRITE_HELPERS: &str = r#"trait WriteValue {
    fn write_value(&self) -> String;
}

macro_rules! write_scalar {
    ($($ty:ty),*) => {$(
        impl WriteValue for $ty {
            fn write_value(&self) -> String {
                self.to_string()
            }
        }
    )*};
}

write_scalar!(i32, f64, bool, String);

impl<T: WriteValue> WriteValue for Vec<T> {
    fn write_value(&self) -> String {
        self.iter().map(|item| item.write_value()).collect::<Vec<_>>().join(" ")
    }
}
"#;

impl Emitter for RustEmitter {
    fn language(&self) -> Language {
        Language::Rust
    }

    fn emit(&self, definition: &ProblemDefinition) -> Result<String, EmissionError> {
        let signature = CONVENTIONS.resolve(definition)?;
        Ok(function_stub(definition, &signature))
    }

    fn emit_full(&self, full: &FullProblemDefinition) -> Result<String, EmissionError> {
        let definition = &full.definition;
        let signature = CONVENTIONS.resolve(definition)?;

        let mut src = String::from("use std::io::{self, Read};\n\n");
        src.push_str(&function_stub(definition, &signature));
        src.push('\n');
        src.push_str(TOKEN_READER);
        src.push('\n');
        src.push_str(READ_HELPERS);
        if full.inputs.iter().any(|i| i.layout == InputLayout::Line) {
            src.push_str(READ_LINE);
        }
        src.push('\n');
        src.push_str(WRITE_HELPERS);
        for arity in tuple_arities(definition) {
            src.push('\n');
            src.push_str(&tuple_impls(arity));
        }
        src.push('\n');

        src.push_str("fn main() {\n");
        src.push_str("    let mut input = String::new();\n");
        src.push_str("    io::stdin().read_to_string(&mut input).expect(\"failed to read stdin\");\n");
        src.push_str("    let mut reader = TokenReader::new(&input);\n\n");
        for (input, param) in full.inputs.iter().zip(&signature.params) {
            let read = match input.layout {
                InputLayout::Counted => "ReadValue::read_value(&mut reader)",
                InputLayout::Line => "read_line(&mut reader)",
            };
            src.push_str(&format!("    let {}: {} = {};\n", param.name, param.ty, read));
        }

        let args: Vec<&str> = signature.params.iter().map(|p| p.name.as_str()).collect();
        src.push_str(&format!(
            "\n    let {}: {} = {}({});\n",
            signature.output_name,
            signature.return_type,
            signature.function_name,
            args.join(", ")
        ));
        match full.output_layout {
            OutputLayout::Line => {
                src.push_str(&format!(
                    "    println!(\"{{}}\", {}.write_value());\n",
                    signature.output_name
                ));
            }
            OutputLayout::Lines => {
                src.push_str(&format!(
                    "    for item in &{} {{\n        println!(\"{{}}\", item.write_value());\n    }}\n",
                    signature.output_name
                ));
            }
        }
        src.push_str("}\n");
        Ok(src)
    }
}

fn function_stub(definition: &ProblemDefinition, signature: &Signature) -> String {
    let params: Vec<String> = signature
        .params
        .iter()
        .map(|p| format!("{}: {}", p.name, p.ty))
        .collect();

    format!(
        "/// {}\npub fn {}({}) -> {} {{\n    // {}\n    todo!()\n}}\n",
        comment_text(&definition.problem_name),
        signature.function_name,
        params.join(", "),
        signature.return_type,
        IMPLEMENTATION_PLACEHOLDER
    )
}

fn tuple_arities(definition: &ProblemDefinition) -> BTreeSet<usize> {
    let mut arities = BTreeSet::new();
    let types = definition
        .parameters
        .iter()
        .map(|p| &p.ty)
        .chain(std::iter::once(&definition.return_type));
    for ty in types {
        ty.walk(&mut |t: &TypeSpec| {
            if let TypeSpec::Tuple(items) = t {
                arities.insert(items.len());
            }
        });
    }
    arities
}

/// `ReadValue` and `WriteValue` for one tuple arity
fn tuple_impls(arity: usize) -> String {
    let generics: Vec<String> = (0..arity).map(|i| format!("T{}", i)).collect();
    let tuple = generics.join(", ");
    let bounds = |trait_name: &str| {
        generics
            .iter()
            .map(|g| format!("{}: {}", g, trait_name))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let reads = generics
        .iter()
        .map(|g| format!("{}::read_value(reader)", g))
        .collect::<Vec<_>>()
        .join(", ");
    let writes = (0..arity)
        .map(|i| format!("self.{}.write_value()", i))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "impl<{read_bounds}> ReadValue for ({tuple}) {{\n    fn read_value(reader: &mut TokenReader) -> Self {{\n        ({reads})\n    }}\n}}\n\n\
         impl<{write_bounds}> WriteValue for ({tuple}) {{\n    fn write_value(&self) -> String {{\n        [{writes}].join(\" \")\n    }}\n}}\n",
        read_bounds = bounds("ReadValue"),
        write_bounds = bounds("WriteValue"),
        tuple = tuple,
        reads = reads,
        writes = writes,
    )
}

/// `twoSum` → `two_sum`, `parseURL` → `parse_url`
pub(crate) fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_uppercase() {
            out.push(c);
            continue;
        }
        let prev = if i > 0 { Some(chars[i - 1]) } else { None };
        let next = chars.get(i + 1).copied();
        let boundary = match prev {
            Some(p) if p.is_ascii_lowercase() || p.is_ascii_digit() => true,
            Some(p) if p.is_ascii_uppercase() => next.is_some_and(|n| n.is_ascii_lowercase()),
            _ => false,
        };
        if boundary && !out.ends_with('_') {
            out.push('_');
        }
        out.push(c.to_ascii_lowercase());
    }
    out
}
