//! JavaScript emitter
//!
//! Types only exist in the JSDoc block. Full programs build a reader
//! combinator per parameter from a second `TypeSyntax` table, so
//! `array of pair of int and string` reads with
//! `readArray(readTuple(readInteger, readString))`.

use super::syntax::TypeSyntax;
use super::{
    comment_text, keep_name, Conventions, Emitter, Language, Signature,
    IMPLEMENTATION_PLACEHOLDER,
};
use crate::error::EmissionError;
use crate::{FullProblemDefinition, InputLayout, OutputLayout, ProblemDefinition, TypeSpec};

pub struct JavaScriptEmitter;

const SYNTAX: TypeSyntax = TypeSyntax {
    language: Language::JavaScript,
    integer: "number",
    float: "number",
    boolean: "boolean",
    string: "string",
    array: "{}[]",
    pair: "[{}]",
    tuple: "[{}]",
    separator: ", ",
    custom: &[],
};

const READERS: TypeSyntax = TypeSyntax {
    language: Language::JavaScript,
    integer: "readInteger",
    float: "readFloat",
    boolean: "readBoolean",
    string: "readString",
    array: "readArray({})",
    pair: "readTuple({})",
    tuple: "readTuple({})",
    separator: ", ",
    custom: &[],
};

const RESERVED: &[&str] = &[
    // keywords and restricted globals
    "arguments", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "eval", "export", "extends", "false", "finally",
    "for", "function", "if", "implements", "import", "in", "instanceof", "interface", "let",
    "new", "null", "package", "private", "protected", "public", "return", "static", "super",
    "switch", "this", "throw", "true", "try", "typeof", "undefined", "var", "void", "while",
    "with", "yield", "NaN", "Infinity",
    // harness
    "fs", "require", "module", "console", "main", "reader", "TokenReader", "readInteger",
    "readFloat", "readBoolean", "readString", "readArray", "readTuple", "readLine",
    "parseIntegerToken", "parseFloatToken", "parseBooleanToken", "parseStringToken",
    "formatValue",
    // globals the harness calls
    "parseInt", "parseFloat", "String", "Array", "Error", "Number", "Boolean",
];

const CONVENTIONS: Conventions = Conventions {
    syntax: SYNTAX,
    reserved: RESERVED,
    rename: keep_name,
};

const TOKEN_READER: &str = r#"class TokenReader {
    constructor(text) {
        this.lines = text
            .split(/\r?\n/)
            .map((line) => line.split(/\s+/).filter((token) => token.length > 0));
        this.line = 0;
        this.col = 0;
    }

    token() {
        while (this.line < this.lines.length && this.col >= this.lines[this.line].length) {
            this.line += 1;
            this.col = 0;
        }
        if (this.line >= this.lines.length) {
            throw new Error('unexpected end of input');
        }
        const token = this.lines[this.line][this.col];
        this.col += 1;
        return token;
    }

    lineTokens() {
        if (this.col > 0 && this.line < this.lines.length && this.col >= this.lines[this.line].length) {
            this.line += 1;
            this.col = 0;
        }
        if (this.line >= this.lines.length) {
            throw new Error('unexpected end of input');
        }
        const rest = this.lines[this.line].slice(this.col);
        this.line += 1;
        this.col = 0;
        return rest;
    }
}
"#;

const READ_HELPERS: &str = r#"const parseIntegerToken = (token) => parseInt(token, 10);
const parseFloatToken = (token) => parseFloat(token);
const parseBooleanToken = (token) => token === 'true' || token === '1';
const parseStringToken = (token) => token;

const readInteger = (reader) => parseIntegerToken(reader.token());
const readFloat = (reader) => parseFloatToken(reader.token());
const readBoolean = (reader) => parseBooleanToken(reader.token());
const readString = (reader) => parseStringToken(reader.token());

const readArray = (readElement) => (reader) => {
    const length = parseIntegerToken(reader.token());
    const items = [];
    for (let i = 0; i < length; i += 1) {
        items.push(readElement(reader));
    }
    return items;
};

const readTuple = (...readers) => (reader) => readers.map((read) => read(reader));
"#;

const READ_LINE: &str = r#"
const readLine = (parseToken) => (reader) => reader.lineTokens().map(parseToken);
"#;

const FORMAT_VALUE: &str = r#"function formatValue(value) {
    if (Array.isArray(value)) {
        return value.map(formatValue).join(' ');
    }
    return String(value);
}
"#;

impl Emitter for JavaScriptEmitter {
    fn language(&self) -> Language {
        Language::JavaScript
    }

    fn emit(&self, definition: &ProblemDefinition) -> Result<String, EmissionError> {
        let signature = CONVENTIONS.resolve(definition)?;
        Ok(function_stub(definition, &signature))
    }

    fn emit_full(&self, full: &FullProblemDefinition) -> Result<String, EmissionError> {
        let definition = &full.definition;
        let signature = CONVENTIONS.resolve(definition)?;

        let mut src = String::from("const fs = require('fs');\n\n");
        src.push_str(&function_stub(definition, &signature));
        src.push('\n');
        src.push_str(TOKEN_READER);
        src.push('\n');
        src.push_str(READ_HELPERS);
        if full.inputs.iter().any(|i| i.layout == InputLayout::Line) {
            src.push_str(READ_LINE);
        }
        src.push('\n');
        src.push_str(FORMAT_VALUE);
        src.push('\n');

        src.push_str("function main() {\n");
        src.push_str("    const reader = new TokenReader(fs.readFileSync(0, 'utf-8'));\n");
        for (input, param) in full.inputs.iter().zip(&signature.params) {
            let context = format!("parameter '{}'", input.parameter.name);
            let read = match input.layout {
                InputLayout::Counted => {
                    format!("{}(reader)", READERS.render_for(&input.parameter.ty, &context)?)
                }
                InputLayout::Line => format!(
                    "readLine({})(reader)",
                    token_parser(&input.parameter.ty, &context)?
                ),
            };
            src.push_str(&format!("    const {} = {};\n", param.name, read));
        }

        let args: Vec<&str> = signature.params.iter().map(|p| p.name.as_str()).collect();
        src.push_str(&format!(
            "    const {} = {}({});\n",
            signature.output_name,
            signature.function_name,
            args.join(", ")
        ));
        match full.output_layout {
            OutputLayout::Line => {
                src.push_str(&format!("    console.log(formatValue({}));\n", signature.output_name));
            }
            OutputLayout::Lines => {
                src.push_str(&format!(
                    "    for (const item of {}) {{\n        console.log(formatValue(item));\n    }}\n",
                    signature.output_name
                ));
            }
        }
        src.push_str("}\n\nmain();\n");
        Ok(src)
    }
}

fn function_stub(definition: &ProblemDefinition, signature: &Signature) -> String {
    let mut src = format!("/**\n * {}\n *\n", comment_text(&definition.problem_name));
    for param in &signature.params {
        src.push_str(&format!(" * @param {{{}}} {}\n", param.ty, param.name));
    }
    src.push_str(&format!(" * @returns {{{}}}\n */\n", signature.return_type));

    let args: Vec<&str> = signature.params.iter().map(|p| p.name.as_str()).collect();
    src.push_str(&format!(
        "function {}({}) {{\n    // {}\n}}\n",
        signature.function_name,
        args.join(", "),
        IMPLEMENTATION_PLACEHOLDER
    ));
    src
}

/// Token parser for the elements of a `line` layout array
fn token_parser(ty: &TypeSpec, context: &str) -> Result<&'static str, EmissionError> {
    match ty.element() {
        Some(TypeSpec::Integer) => Ok("parseIntegerToken"),
        Some(TypeSpec::Float) => Ok("parseFloatToken"),
        Some(TypeSpec::Boolean) => Ok("parseBooleanToken"),
        Some(TypeSpec::String) => Ok("parseStringToken"),
        _ => Err(EmissionError {
            language: Language::JavaScript,
            item: format!("line layout of {}", ty),
            context: context.to_string(),
        }),
    }
}
