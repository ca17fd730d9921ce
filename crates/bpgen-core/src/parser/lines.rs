//! Line classifier — turns a structure document into labeled fields
//!
//! Each line is matched against a fixed label table (`Problem Name:`,
//! `Input Field:`, ...). Matching lines become `LabeledField`s carrying the
//! text after the label and its line number; every other line is prose and
//! is dropped.
//!
//! Leading markdown decoration is tolerated: indentation, heading markers
//! (`##`), list bullets (`-`, `*`, `+`) and bold markers (`**`).
//!
//! Guarantees:
//! - Deterministic: same input always produces the same field stream
//! - Line numbers are 1-based

/// Labels recognized at the start of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    ProblemName,
    FunctionName,
    InputStructure,
    OutputStructure,
    InputField,
    OutputField,
    InputFormat,
    OutputFormat,
}

impl Label {
    /// Label text as written in documents, without the colon
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::ProblemName => "Problem Name",
            Label::FunctionName => "Function Name",
            Label::InputStructure => "Input Structure",
            Label::OutputStructure => "Output Structure",
            Label::InputField => "Input Field",
            Label::OutputField => "Output Field",
            Label::InputFormat => "Input Format",
            Label::OutputFormat => "Output Format",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const LABELS: [Label; 8] = [
    Label::ProblemName,
    Label::FunctionName,
    Label::InputStructure,
    Label::OutputStructure,
    Label::InputField,
    Label::OutputField,
    Label::InputFormat,
    Label::OutputFormat,
];

/// A labeled line with its value text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledField {
    pub label: Label,
    /// Text after the colon, trimmed
    pub value: String,
    /// 1-based source line
    pub line: usize,
}

/// Classify every line of `text`, keeping only labeled ones
pub fn classify(text: &str) -> Vec<LabeledField> {
    text.lines()
        .enumerate()
        .filter_map(|(index, line)| classify_line(index + 1, line))
        .collect()
}

fn classify_line(line_number: usize, line: &str) -> Option<LabeledField> {
    let body = strip_decoration(line);

    for label in LABELS {
        let Some(rest) = body.strip_prefix(label.as_str()) else {
            continue;
        };
        let rest = rest.strip_prefix("**").unwrap_or(rest);
        let Some(rest) = rest.strip_prefix(':') else {
            continue;
        };
        // `**Function Name:** twoSum` closes the bold after the colon
        let rest = rest.strip_prefix("**").unwrap_or(rest);

        return Some(LabeledField {
            label,
            value: rest.trim().to_string(),
            line: line_number,
        });
    }

    None
}

/// Strip indentation, heading markers, one list bullet and bold markers
fn strip_decoration(line: &str) -> &str {
    let mut body = line.trim_start();
    body = body.trim_start_matches('#').trim_start();
    for bullet in ["- ", "* ", "+ "] {
        if let Some(rest) = body.strip_prefix(bullet) {
            body = rest.trim_start();
            break;
        }
    }
    body.strip_prefix("**").unwrap_or(body)
}
