//! C++ emitter
//!
//! Stubs use standard-library types only. Containers are taken by reference,
//! scalars by value. Full programs need C++17 (`std::apply`, and
//! `std::to_chars` for doubles, which GCC ships from version 11) and read
//! parameters through overloaded `readValue` templates, so the per-field
//! code only declares a variable of the signature type.

use std::collections::BTreeSet;

use super::syntax::TypeSyntax;
use super::{
    comment_text, keep_name, Conventions, Emitter, Language, Signature,
    IMPLEMENTATION_PLACEHOLDER,
};
use crate::error::EmissionError;
use crate::{FullProblemDefinition, InputLayout, OutputLayout, ProblemDefinition, TypeSpec};

pub struct CppEmitter;

const SYNTAX: TypeSyntax = TypeSyntax {
    language: Language::Cpp,
    integer: "int",
    float: "double",
    boolean: "bool",
    string: "std::string",
    array: "std::vector<{}>",
    pair: "std::pair<{}>",
    tuple: "std::tuple<{}>",
    separator: ", ",
    custom: &[],
};

const RESERVED: &[&str] = &[
    // keywords
    "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor", "bool", "break",
    "case", "catch", "char", "char16_t", "char32_t", "class", "compl", "const", "const_cast",
    "constexpr", "continue", "decltype", "default", "delete", "do", "double", "dynamic_cast",
    "else", "enum", "explicit", "export", "extern", "false", "float", "for", "friend", "goto",
    "if", "inline", "int", "long", "mutable", "namespace", "new", "noexcept", "not", "not_eq",
    "nullptr", "operator", "or", "or_eq", "private", "protected", "public", "register",
    "reinterpret_cast", "return", "short", "signed", "sizeof", "static", "static_assert",
    "static_cast", "struct", "switch", "template", "this", "thread_local", "throw", "true",
    "try", "typedef", "typeid", "typename", "union", "unsigned", "using", "virtual", "void",
    "volatile", "wchar_t", "while", "xor", "xor_eq",
    // harness
    "main", "std", "reader", "TokenReader", "parseToken", "readValue", "readLine",
    "writeValue", "writeLines",
];

const CONVENTIONS: Conventions = Conventions {
    syntax: SYNTAX,
    reserved: RESERVED,
    rename: keep_name,
};

const FULL_INCLUDES: &[&str] = &[
    "charconv",
    "cstddef",
    "iostream",
    "sstream",
    "stdexcept",
    "string",
    "tuple",
    "utility",
    "vector",
];

const TOKEN_READER: &str = r#"class TokenReader {
public:
    explicit TokenReader(std::istream& in) {
        std::string line;
        while (std::getline(in, line)) {
            std::istringstream words(line);
            std::vector<std::string> tokens;
            std::string token;
            while (words >> token) {
                tokens.push_back(token);
            }
            lines_.push_back(tokens);
        }
    }

    std::string token() {
        while (line_ < lines_.size() && col_ >= lines_[line_].size()) {
            ++line_;
            col_ = 0;
        }
        if (line_ >= lines_.size()) {
            throw std::runtime_error("unexpected end of input");
        }
        return lines_[line_][col_++];
    }

    std::vector<std::string> lineTokens() {
        if (col_ > 0 && line_ < lines_.size() && col_ >= lines_[line_].size()) {
            ++line_;
            col_ = 0;
        }
        if (line_ >= lines_.size()) {
            throw std::runtime_error("unexpected end of input");
        }
        const std::vector<std::string>& current = lines_[line_];
        std::vector<std::string> rest(current.begin() + static_cast<std::ptrdiff_t>(col_), current.end());
        ++line_;
        col_ = 0;
        return rest;
    }

private:
    std::vector<std::vector<std::string>> lines_;
    std::size_t line_ = 0;
    std::size_t col_ = 0;
};
"#;

const READ_HELPERS: &str = r#"void parseToken(const std::string& token, int& out) { out = std::stoi(token); }
void parseToken(const std::string& token, double& out) { out = std::stod(token); }
void parseToken(const std::string& token, bool& out) { out = token == "true" || token == "1"; }
void parseToken(const std::string& token, std::string& out) { out = token; }

template <typename T>
void readValue(TokenReader& reader, T& out);
template <typename T>
void readValue(TokenReader& reader, std::vector<T>& out);
template <typename A, typename B>
void readValue(TokenReader& reader, std::pair<A, B>& out);
template <typename... Ts>
void readValue(TokenReader& reader, std::tuple<Ts...>& out);

template <typename T>
void readValue(TokenReader& reader, T& out) {
    parseToken(reader.token(), out);
}

template <typename T>
void readValue(TokenReader& reader, std::vector<T>& out) {
    std::size_t length = std::stoul(reader.token());
    out.clear();
    for (std::size_t i = 0; i < length; ++i) {
        T item{};
        readValue(reader, item);
        out.push_back(item);
    }
}

template <typename A, typename B>
void readValue(TokenReader& reader, std::pair<A, B>& out) {
    readValue(reader, out.first);
    readValue(reader, out.second);
}

template <typename... Ts>
void readValue(TokenReader& reader, std::tuple<Ts...>& out) {
    std::apply([&reader](auto&... items) { (readValue(reader, items), ...); }, out);
}
"#;

const READ_LINE: &str = r#"
template <typename T>
void readLine(TokenReader& reader, std::vector<T>& out) {
    out.clear();
    for (const std::string& token : reader.lineTokens()) {
        T item{};
        parseToken(token, item);
        out.push_back(item);
    }
}
"#;

const WRITE_HELPERS: &str = r#"template <typename T>
void writeValue(std::ostream& out, const T& value);
void writeValue(std::ostream& out, bool value);
void writeValue(std::ostream& out, double value);
template <typename T>
void writeValue(std::ostream& out, const std::vector<T>& value);
template <typename A, typename B>
void writeValue(std::ostream& out, const std::pair<A, B>& value);
template <typename... Ts>
void writeValue(std::ostream& out, const std::tuple<Ts...>& value);

template <typename T>
void writeValue(std::ostream& out, const T& value) {
    out << value;
}

void writeValue(std::ostream& out, bool value) {
    out << (value ? "true" : "false");
}

// Shortest text that reads back as the same double
void writeValue(std::ostream& out, double value) {
    char buffer[32];
    std::to_chars_result written = std::to_chars(buffer, buffer + sizeof(buffer), value);
    out.write(buffer, written.ptr - buffer);
}

template <typename T>
void writeValue(std::ostream& out, const std::vector<T>& value) {
    for (std::size_t i = 0; i < value.size(); ++i) {
        if (i > 0) {
            out << ' ';
        }
        writeValue(out, value[i]);
    }
}

template <typename A, typename B>
void writeValue(std::ostream& out, const std::pair<A, B>& value) {
    writeValue(out, value.first);
    out << ' ';
    writeValue(out, value.second);
}

template <typename... Ts>
void writeValue(std::ostream& out, const std::tuple<Ts...>& value) {
    bool first = true;
    std::apply(
        [&out, &first](const auto&... items) {
            ((out << (first ? "" : " "), writeValue(out, items), first = false), ...);
        },
        value);
}
"#;

const WRITE_LINES: &str = r#"
template <typename T>
void writeLines(std::ostream& out, const std::vector<T>& value) {
    for (std::size_t i = 0; i < value.size(); ++i) {
        writeValue(out, value[i]);
        out << '\n';
    }
}
"#;

impl Emitter for CppEmitter {
    fn language(&self) -> Language {
        Language::Cpp
    }

    fn emit(&self, definition: &ProblemDefinition) -> Result<String, EmissionError> {
        let signature = CONVENTIONS.resolve(definition)?;

        let mut src = format!("// {}\n", comment_text(&definition.problem_name));
        let includes = stub_includes(definition);
        for header in &includes {
            src.push_str(&format!("#include <{}>\n", header));
        }
        if !includes.is_empty() {
            src.push('\n');
        }
        src.push_str(&function_stub(definition, &signature));
        Ok(src)
    }

    fn emit_full(&self, full: &FullProblemDefinition) -> Result<String, EmissionError> {
        let definition = &full.definition;
        let signature = CONVENTIONS.resolve(definition)?;

        let mut src = format!("// {}\n", comment_text(&definition.problem_name));
        src.push_str("// Build with: g++ -std=c++17 function.cpp\n");
        for header in FULL_INCLUDES {
            src.push_str(&format!("#include <{}>\n", header));
        }
        src.push('\n');
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
        if full.output_layout == OutputLayout::Lines {
            src.push_str(WRITE_LINES);
        }
        src.push('\n');

        src.push_str("int main() {\n");
        src.push_str("    TokenReader reader(std::cin);\n\n");
        for (input, param) in full.inputs.iter().zip(&signature.params) {
            src.push_str(&format!("    {} {}{{}};\n", param.ty, param.name));
            let reader_fn = match input.layout {
                InputLayout::Counted => "readValue",
                InputLayout::Line => "readLine",
            };
            src.push_str(&format!("    {}(reader, {});\n", reader_fn, param.name));
        }

        let args: Vec<&str> = signature.params.iter().map(|p| p.name.as_str()).collect();
        src.push_str(&format!(
            "\n    {} {} = {}({});\n",
            signature.return_type,
            signature.output_name,
            signature.function_name,
            args.join(", ")
        ));
        match full.output_layout {
            OutputLayout::Line => {
                src.push_str(&format!("    writeValue(std::cout, {});\n", signature.output_name));
                src.push_str("    std::cout << '\\n';\n");
            }
            OutputLayout::Lines => {
                src.push_str(&format!("    writeLines(std::cout, {});\n", signature.output_name));
            }
        }
        src.push_str("    return 0;\n}\n");
        Ok(src)
    }
}

fn function_stub(definition: &ProblemDefinition, signature: &Signature) -> String {
    let params: Vec<String> = definition
        .parameters
        .iter()
        .zip(&signature.params)
        .map(|(parameter, param)| {
            if parameter.ty.is_scalar() {
                format!("{} {}", param.ty, param.name)
            } else {
                format!("{}& {}", param.ty, param.name)
            }
        })
        .collect();

    format!(
        "{} {}({}) {{\n    // {}\n    return {{}};\n}}\n",
        signature.return_type,
        signature.function_name,
        params.join(", "),
        IMPLEMENTATION_PLACEHOLDER
    )
}

/// Standard headers the stub's types need, sorted
fn stub_includes(definition: &ProblemDefinition) -> BTreeSet<&'static str> {
    let mut headers = BTreeSet::new();
    let types = definition
        .parameters
        .iter()
        .map(|p| &p.ty)
        .chain(std::iter::once(&definition.return_type));
    for ty in types {
        ty.walk(&mut |t: &TypeSpec| match t {
            TypeSpec::String => {
                headers.insert("string");
            }
            TypeSpec::Array(_) => {
                headers.insert("vector");
            }
            TypeSpec::Tuple(items) if items.len() == 2 => {
                headers.insert("utility");
            }
            TypeSpec::Tuple(_) => {
                headers.insert("tuple");
            }
            _ => {}
        });
    }
    headers
}
