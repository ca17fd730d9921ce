//! Type expressions — `array of integer`, `list<pair of int and string>`, ...
//!
//! A small tokenizer splits the expression into words and symbols, then a
//! recursive descent parser resolves it against the keyword table below.
//!
//! Grammar:
//!
//! ```text
//! type    := primary ("[" "]")*
//! primary := SCALAR
//!          | SEQUENCE ("of" type | "<" type ">")
//!          | PAIR ("of" type "and" type | "<" type "," type ">")
//!          | TUPLE ("of" type ("," type)* ["and" type] | "<" type ("," type)+ ">")
//!          | IDENTIFIER                       -- Custom
//! ```

use crate::error::ParseError;
use crate::types::TypeSpec;

/// Keyword categories understood by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    Integer,
    Float,
    Boolean,
    String,
    Sequence,
    Pair,
    Tuple,
}

/// Surface words and what they mean. Lookups are case-insensitive.
const KEYWORDS: &[(&str, Keyword)] = &[
    ("integer", Keyword::Integer),
    ("integers", Keyword::Integer),
    ("int", Keyword::Integer),
    ("ints", Keyword::Integer),
    ("long", Keyword::Integer),
    ("float", Keyword::Float),
    ("floats", Keyword::Float),
    ("double", Keyword::Float),
    ("doubles", Keyword::Float),
    ("number", Keyword::Float),
    ("numbers", Keyword::Float),
    ("decimal", Keyword::Float),
    ("boolean", Keyword::Boolean),
    ("booleans", Keyword::Boolean),
    ("bool", Keyword::Boolean),
    ("bools", Keyword::Boolean),
    ("string", Keyword::String),
    ("strings", Keyword::String),
    ("str", Keyword::String),
    ("text", Keyword::String),
    ("char", Keyword::String),
    ("array", Keyword::Sequence),
    ("arrays", Keyword::Sequence),
    ("list", Keyword::Sequence),
    ("lists", Keyword::Sequence),
    ("vector", Keyword::Sequence),
    ("vectors", Keyword::Sequence),
    ("pair", Keyword::Pair),
    ("pairs", Keyword::Pair),
    ("tuple", Keyword::Tuple),
    ("tuples", Keyword::Tuple),
];

fn lookup_keyword(word: &str) -> Option<Keyword> {
    KEYWORDS
        .iter()
        .find(|(surface, _)| surface.eq_ignore_ascii_case(word))
        .map(|(_, keyword)| *keyword)
}

/// True when `word` has a meaning in the keyword table
pub(crate) fn is_type_keyword(word: &str) -> bool {
    lookup_keyword(word).is_some()
}

/// Check `^[a-zA-Z][a-zA-Z0-9_]*$`
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

// ── Tokenizer ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    Comma,
    LAngle,
    RAngle,
    Brackets,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Token::Word(w) => write!(f, "'{}'", w),
            Token::Comma => write!(f, "','"),
            Token::LAngle => write!(f, "'<'"),
            Token::RAngle => write!(f, "'>'"),
            Token::Brackets => write!(f, "'[]'"),
        }
    }
}

fn tokenize(text: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(&ch) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            '<' => {
                chars.next();
                tokens.push(Token::LAngle);
            }
            '>' => {
                chars.next();
                tokens.push(Token::RAngle);
            }
            '[' => {
                chars.next();
                if chars.next() != Some(']') {
                    return Err("'[' must be followed by ']'".to_string());
                }
                tokens.push(Token::Brackets);
            }
            c if c.is_ascii_alphanumeric() || c == '_' => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        word.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Word(word));
            }
            other => return Err(format!("unexpected character '{}'", other)),
        }
    }

    Ok(tokens)
}

// ── Recursive descent ──────────────────────────────────────

/// Deepest type nesting accepted, counting `[]` suffixes
pub const MAX_NESTING: usize = 64;

struct TypeParser<'a> {
    tokens: Vec<Token>,
    position: usize,
    depth: usize,
    source: &'a str,
}

impl<'a> TypeParser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn peek_word(&self, expected: &str) -> bool {
        matches!(self.peek(), Some(Token::Word(w)) if w.eq_ignore_ascii_case(expected))
    }

    fn expect_word(&mut self, expected: &str) -> Result<(), String> {
        if self.peek_word(expected) {
            self.position += 1;
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{}'", expected)))
        }
    }

    fn expect(&mut self, expected: Token) -> Result<(), String> {
        if self.peek() == Some(&expected) {
            self.position += 1;
            Ok(())
        } else {
            Err(self.unexpected(&expected.to_string()))
        }
    }

    fn unexpected(&self, expected: &str) -> String {
        match self.peek() {
            Some(token) => format!("expected {} but found {} in '{}'", expected, token, self.source),
            None => format!("expected {} at end of '{}'", expected, self.source),
        }
    }

    fn parse_type(&mut self) -> Result<TypeSpec, String> {
        self.depth += 1;
        let result = self.parse_nested_type();
        self.depth -= 1;
        result
    }

    fn parse_nested_type(&mut self) -> Result<TypeSpec, String> {
        if self.depth > MAX_NESTING {
            return Err(too_deep());
        }
        let mut ty = self.parse_primary()?;
        let mut suffixes = 0;
        while self.peek() == Some(&Token::Brackets) {
            self.position += 1;
            suffixes += 1;
            if self.depth + suffixes > MAX_NESTING {
                return Err(too_deep());
            }
            ty = TypeSpec::array(ty);
        }
        Ok(ty)
    }

    fn parse_primary(&mut self) -> Result<TypeSpec, String> {
        let word = match self.advance() {
            Some(Token::Word(word)) => word,
            Some(other) => {
                return Err(format!(
                    "expected a type but found {} in '{}'",
                    other, self.source
                ))
            }
            None => return Err(format!("expected a type at end of '{}'", self.source)),
        };

        match lookup_keyword(&word) {
            Some(Keyword::Integer) => Ok(TypeSpec::Integer),
            Some(Keyword::Float) => Ok(TypeSpec::Float),
            Some(Keyword::Boolean) => Ok(TypeSpec::Boolean),
            Some(Keyword::String) => Ok(TypeSpec::String),
            Some(Keyword::Sequence) => self.parse_sequence(),
            Some(Keyword::Pair) => self.parse_pair(),
            Some(Keyword::Tuple) => self.parse_tuple(),
            None if word.eq_ignore_ascii_case("of") || word.eq_ignore_ascii_case("and") => Err(
                format!("expected a type but found '{}' in '{}'", word, self.source),
            ),
            None if is_identifier(&word) => Ok(TypeSpec::Custom(word)),
            None => Err(format!(
                "'{}' is not a type name in '{}'",
                word, self.source
            )),
        }
    }

    fn parse_sequence(&mut self) -> Result<TypeSpec, String> {
        if self.peek() == Some(&Token::LAngle) {
            self.position += 1;
            let element = self.parse_type()?;
            self.expect(Token::RAngle)?;
            return Ok(TypeSpec::array(element));
        }
        self.expect_word("of")?;
        Ok(TypeSpec::array(self.parse_type()?))
    }

    fn parse_pair(&mut self) -> Result<TypeSpec, String> {
        if self.peek() == Some(&Token::LAngle) {
            self.position += 1;
            let first = self.parse_type()?;
            self.expect(Token::Comma)?;
            let second = self.parse_type()?;
            self.expect(Token::RAngle)?;
            return Ok(TypeSpec::pair(first, second));
        }
        self.expect_word("of")?;
        let first = self.parse_type()?;
        self.expect_word("and")?;
        let second = self.parse_type()?;
        Ok(TypeSpec::pair(first, second))
    }

    fn parse_tuple(&mut self) -> Result<TypeSpec, String> {
        let mut items = Vec::new();

        if self.peek() == Some(&Token::LAngle) {
            self.position += 1;
            items.push(self.parse_type()?);
            while self.peek() == Some(&Token::Comma) {
                self.position += 1;
                items.push(self.parse_type()?);
            }
            self.expect(Token::RAngle)?;
        } else {
            self.expect_word("of")?;
            items.push(self.parse_type()?);
            while self.peek() == Some(&Token::Comma) {
                self.position += 1;
                // Oxford comma: "a, b, and c"
                if self.peek_word("and") {
                    break;
                }
                items.push(self.parse_type()?);
            }
            if self.peek_word("and") {
                self.position += 1;
                items.push(self.parse_type()?);
            }
        }

        if items.len() < 2 {
            return Err(format!(
                "a tuple needs at least two components in '{}'",
                self.source
            ));
        }
        Ok(TypeSpec::Tuple(items))
    }
}

fn too_deep() -> String {
    format!("type is nested more than {} levels deep", MAX_NESTING)
}

/// Parse a complete type expression; trailing tokens are an error
pub fn parse_type_expr(text: &str) -> Result<TypeSpec, String> {
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err("missing type expression".to_string());
    }

    let mut parser = TypeParser {
        tokens,
        position: 0,
        depth: 0,
        source: text,
    };
    let ty = parser.parse_type()?;

    if let Some(extra) = parser.peek() {
        return Err(format!(
            "unexpected {} after '{}' in '{}'",
            extra, ty, text
        ));
    }
    Ok(ty)
}

/// Parse a type expression for a labeled document field
pub fn parse_field_type(text: &str, line: usize, field: &str) -> Result<TypeSpec, ParseError> {
    parse_type_expr(text).map_err(|message| ParseError::at(line, field, message))
}
