//! Classification-only lexer for editor front-ends: splits source text
//! into [`SourceToken`]s without building any kind of parse tree.

/// Fundamental token classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseType {
    EndOfFile,
    NewLine,
    Keyword,
    VariableName,
    Identifier,
    NumberLiteral,
    StringLiteral,
    Comment,
    Preprocessor,
    MetricPrefix,
    StandardUnit,
    Other,
}

/// Narrower classification layered on top of [`BaseType::VariableName`]
/// and [`BaseType::Identifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtType {
    None,
    IntegerVariable,
    RealVariable,
    StringVariable,
    IntegerArrayVariable,
    RealArrayVariable,
    EventHandlerName,
}

impl ExtType {
    /// The [`BaseType`] an extended type implies, mirroring
    /// `SourceToken`'s extended-type constructor.
    fn implied_base_type(self) -> BaseType {
        match self {
            ExtType::None => BaseType::Other,
            ExtType::IntegerVariable
            | ExtType::RealVariable
            | ExtType::StringVariable
            | ExtType::IntegerArrayVariable
            | ExtType::RealArrayVariable => BaseType::VariableName,
            ExtType::EventHandlerName => BaseType::Identifier,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceToken {
    pub base_type: BaseType,
    pub ext_type: ExtType,
    pub text: String,
    pub line: u32,
    pub column: u32,
    pub offset: u32,
    pub length: u32,
}

impl SourceToken {
    pub fn new(base_type: BaseType, text: impl Into<String>) -> Self {
        Self { base_type, ext_type: ExtType::None, text: text.into(), line: 0, column: 0, offset: 0, length: 0 }
    }

    pub fn with_ext_type(ext_type: ExtType, text: impl Into<String>) -> Self {
        Self {
            base_type: ext_type.implied_base_type(),
            ext_type,
            text: text.into(),
            line: 0,
            column: 0,
            offset: 0,
            length: 0,
        }
    }

    pub fn is_eof(&self) -> bool {
        self.base_type == BaseType::EndOfFile
    }
}

const KEYWORDS: &[&str] = &[
    "on", "end", "declare", "const", "polyphonic", "while", "if", "else", "select", "case", "to",
    "downto", "for", "each", "synchronized", "function", "call", "note", "event", "init", "controller",
    "rpn", "nrpn", "and", "or", "not", "break", "continue",
];

const STD_UNITS: &[&str] = &["s", "Hz", "B"];
const METRIC_PREFIXES: &[&str] = &["n", "u", "m", "c", "d", "da", "h", "k", "M", "G"];

/// Classifies `source` into a flat token stream. No parsing, no error
/// recovery beyond "anything unrecognized is `Other`" — editors combine
/// this with their own grammar knowledge for colourization.
pub fn tokenize(source: &str) -> Vec<SourceToken> {
    let mut tokens = Vec::new();
    let mut line: u32 = 1;
    let mut column: u32 = 1;
    let mut offset: u32 = 0;

    let bytes = source.as_bytes();
    let mut i = 0usize;

    while i < bytes.len() {
        let start_offset = offset;
        let start_line = line;
        let start_column = column;
        let c = bytes[i] as char;

        if c == '\n' {
            tokens.push(finish(SourceToken::new(BaseType::NewLine, "\n"), start_line, start_column, start_offset, 1));
            i += 1;
            offset += 1;
            line += 1;
            column = 1;
            continue;
        }

        if c.is_whitespace() {
            i += 1;
            offset += 1;
            column += 1;
            continue;
        }

        if c == '#' {
            let (text, consumed) = take_while(&source[i..], |ch| ch != '\n');
            push_sized(&mut tokens, BaseType::Preprocessor, ExtType::None, text, start_line, start_column, start_offset, consumed as u32);
            i += consumed;
            offset += consumed as u32;
            column += consumed as u32;
            continue;
        }

        if c == '/' && bytes.get(i + 1) == Some(&b'/') {
            let (text, consumed) = take_while(&source[i..], |ch| ch != '\n');
            push_sized(&mut tokens, BaseType::Comment, ExtType::None, text, start_line, start_column, start_offset, consumed as u32);
            i += consumed;
            offset += consumed as u32;
            column += consumed as u32;
            continue;
        }

        if c == '"' {
            let (text, consumed) = take_string_literal(&source[i..]);
            push_sized(&mut tokens, BaseType::StringLiteral, ExtType::None, text, start_line, start_column, start_offset, consumed as u32);
            i += consumed;
            offset += consumed as u32;
            column += consumed as u32;
            continue;
        }

        if c == '$' || c == '%' || c == '~' || c == '?' {
            let (text, consumed) = take_while(&source[i..], |ch| ch.is_alphanumeric() || ch == '_' || ch == '$' || ch == '%' || ch == '~' || ch == '?');
            let ext = match c {
                '$' => ExtType::IntegerVariable,
                '~' => ExtType::RealVariable,
                '?' => ExtType::StringVariable,
                '%' => ExtType::IntegerArrayVariable,
                _ => ExtType::None,
            };
            push_sized(&mut tokens, ext.implied_base_type(), ext, text, start_line, start_column, start_offset, consumed as u32);
            i += consumed;
            offset += consumed as u32;
            column += consumed as u32;
            continue;
        }

        if c.is_ascii_digit() {
            let (text, consumed) = take_while(&source[i..], |ch| ch.is_ascii_digit() || ch == '.');
            i += consumed;
            offset += consumed as u32;
            column += consumed as u32;

            // A trailing unit or metric-prefix letter run attaches as its
            // own token, e.g. `13ms` -> NUMBER_LITERAL("13") + METRIC_PREFIX("m") + STANDARD_UNIT("s").
            push_sized(&mut tokens, BaseType::NumberLiteral, ExtType::None, text, start_line, start_column, start_offset, consumed as u32);

            if i < bytes.len() && (bytes[i] as char).is_alphabetic() {
                let unit_start_offset = offset;
                let unit_start_column = column;
                let (suffix, suffix_len) = take_while(&source[i..], |ch| ch.is_alphabetic());
                classify_unit_suffix(&mut tokens, &suffix, start_line, unit_start_column, unit_start_offset);
                i += suffix_len;
                offset += suffix_len as u32;
                column += suffix_len as u32;
            }
            continue;
        }

        if c.is_alphabetic() || c == '_' {
            let (text, consumed) = take_while(&source[i..], |ch| ch.is_alphanumeric() || ch == '_');
            let base = if KEYWORDS.contains(&text.as_str()) { BaseType::Keyword } else { BaseType::Identifier };
            push_sized(&mut tokens, base, ExtType::None, text, start_line, start_column, start_offset, consumed as u32);
            i += consumed;
            offset += consumed as u32;
            column += consumed as u32;
            continue;
        }

        // Anything else (operators, punctuation) is a single-byte Other token.
        push_sized(&mut tokens, BaseType::Other, ExtType::None, c.to_string(), start_line, start_column, start_offset, 1);
        i += 1;
        offset += 1;
        column += 1;
    }

    tokens.push(SourceToken::new(BaseType::EndOfFile, ""));
    tokens
}

fn classify_unit_suffix(tokens: &mut Vec<SourceToken>, suffix: &str, line: u32, column: u32, offset: u32) {
    if STD_UNITS.contains(&suffix) {
        push_sized(tokens, BaseType::StandardUnit, ExtType::None, suffix, line, column, offset, suffix.len() as u32);
        return;
    }
    // Longest metric-prefix match first ("da" before "d").
    let mut sorted = METRIC_PREFIXES.to_vec();
    sorted.sort_by_key(|p| std::cmp::Reverse(p.len()));
    for prefix in sorted {
        if let Some(rest) = suffix.strip_prefix(prefix) {
            push_sized(tokens, BaseType::MetricPrefix, ExtType::None, prefix, line, column, offset, prefix.len() as u32);
            if !rest.is_empty() && STD_UNITS.contains(&rest) {
                push_sized(
                    tokens,
                    BaseType::StandardUnit,
                    ExtType::None,
                    rest,
                    line,
                    column + prefix.len() as u32,
                    offset + prefix.len() as u32,
                    rest.len() as u32,
                );
            } else if !rest.is_empty() {
                push_sized(
                    tokens,
                    BaseType::Other,
                    ExtType::None,
                    rest,
                    line,
                    column + prefix.len() as u32,
                    offset + prefix.len() as u32,
                    rest.len() as u32,
                );
            }
            return;
        }
    }
    push_sized(tokens, BaseType::Other, ExtType::None, suffix, line, column, offset, suffix.len() as u32);
}

fn take_while(s: &str, pred: impl Fn(char) -> bool) -> (String, usize) {
    let mut len = 0;
    let mut out = String::new();
    for ch in s.chars() {
        if pred(ch) {
            out.push(ch);
            len += ch.len_utf8();
        } else {
            break;
        }
    }
    (out, len)
}

fn take_string_literal(s: &str) -> (String, usize) {
    let mut chars = s.char_indices();
    chars.next(); // opening quote
    let mut len = 1;
    let mut out = String::from("\"");
    for (_, ch) in chars {
        out.push(ch);
        len += ch.len_utf8();
        if ch == '"' {
            break;
        }
    }
    (out, len)
}

fn finish(mut token: SourceToken, line: u32, column: u32, offset: u32, length: u32) -> SourceToken {
    token.line = line;
    token.column = column;
    token.offset = offset;
    token.length = length;
    token
}

fn push_sized(
    tokens: &mut Vec<SourceToken>,
    base_type: BaseType,
    ext_type: ExtType,
    text: impl Into<String>,
    line: u32,
    column: u32,
    offset: u32,
    length: u32,
) {
    let mut token = SourceToken::new(base_type, text);
    token.ext_type = ext_type;
    tokens.push(finish(token, line, column, offset, length));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tokens: &[SourceToken]) -> Vec<BaseType> {
        tokens.iter().map(|t| t.base_type).collect()
    }

    #[test]
    fn classifies_keyword_and_identifier() {
        let tokens = tokenize("on note\n  my_handler()\nend on");
        assert_eq!(tokens[0].base_type, BaseType::Keyword);
        assert_eq!(tokens[0].text, "on");
        assert!(tokens.iter().any(|t| t.base_type == BaseType::Keyword && t.text == "note"));
        assert!(tokens.iter().any(|t| t.base_type == BaseType::Identifier && t.text == "my_handler"));
        assert!(tokens.last().unwrap().is_eof());
    }

    #[test]
    fn classifies_integer_variable_sigil() {
        let tokens = tokenize("$foo := 1");
        assert_eq!(tokens[0].ext_type, ExtType::IntegerVariable);
        assert_eq!(tokens[0].base_type, BaseType::VariableName);
    }

    #[test]
    fn splits_number_metric_prefix_and_unit() {
        let tokens = tokenize("13ms");
        let k = kinds(&tokens);
        assert_eq!(&k[..3], &[BaseType::NumberLiteral, BaseType::MetricPrefix, BaseType::StandardUnit]);
        assert_eq!(tokens[0].text, "13");
        assert_eq!(tokens[1].text, "m");
        assert_eq!(tokens[2].text, "s");
    }

    #[test]
    fn tracks_line_and_column_across_newlines() {
        let tokens = tokenize("a\nb");
        let b_token = tokens.iter().find(|t| t.text == "b").unwrap();
        assert_eq!(b_token.line, 2);
        assert_eq!(b_token.column, 1);
    }

    #[test]
    fn comment_and_preprocessor_run_to_end_of_line() {
        let tokens = tokenize("// hi\n#pragma save_key(42)\n");
        assert_eq!(tokens[0].base_type, BaseType::Comment);
        assert!(tokens.iter().any(|t| t.base_type == BaseType::Preprocessor));
    }
}
