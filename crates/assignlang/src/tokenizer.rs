//! An eager tokenizer for assignment-language source text.
//!
//! The whole input is consumed before anything is handed to the parser. Each line is
//! cut into fragments (maximal runs of word characters, or a single non-word character),
//! and every fragment is classified against a fixed, ordered table of whole-fragment
//! patterns. The patterns are mutually exclusive, so the order of the table never changes
//! the result, but it is still walked front to back and the first full match wins.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Maximal runs of `[A-Za-z0-9_]`, or any single other character.
static FRAGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9_]+|[^A-Za-z0-9_]").expect("fragment pattern compiles"));

/// Classification table, walked in order.
static TOKEN_PATTERNS: Lazy<Vec<(TokenKind, Regex)>> = Lazy::new(|| {
    [
        (TokenKind::Variable, r"^[A-Za-z_][A-Za-z0-9_]*$"),
        (TokenKind::Integer, r"^[0-9]+$"),
        (TokenKind::Operator, r"^[-+*/]$"),
        (TokenKind::Assign, r"^=$"),
        (TokenKind::Semicolon, r"^;$"),
        (TokenKind::ParenOpen, r"^\($"),
        (TokenKind::ParenClose, r"^\)$"),
    ]
    .into_iter()
    .map(|(kind, pattern)| (kind, Regex::new(pattern).expect("token pattern compiles")))
    .collect()
});

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Variable,
    Integer,
    Operator,
    Assign,
    Semicolon,
    ParenOpen,
    ParenClose,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Variable => "VARIABLE",
            TokenKind::Integer => "INTEGER",
            TokenKind::Operator => "OPERATOR",
            TokenKind::Assign => "ASSIGN",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::ParenOpen => "PARENTHESIS_OPEN",
            TokenKind::ParenClose => "PARENTHESIS_CLOSE",
        };
        f.write_str(name)
    }
}

/// Integer tokens carry the parsed number; everything else keeps the matched text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenValue {
    Integer(i64),
    Text(String),
}

/// A classified fragment. Fields are private so that an `Integer` kind always carries an
/// `Integer` value and every other kind carries text; deserialization goes through the
/// same check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawToken")]
pub struct Token {
    kind: TokenKind,
    value: TokenValue,
}

#[derive(Deserialize)]
struct RawToken {
    kind: TokenKind,
    value: TokenValue,
}

impl TryFrom<RawToken> for Token {
    type Error = InvalidToken;

    fn try_from(raw: RawToken) -> Result<Self, Self::Error> {
        Token::new(raw.kind, raw.value)
    }
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
#[error("{kind} token cannot carry value {value:?}")]
pub struct InvalidToken {
    pub kind: TokenKind,
    pub value: TokenValue,
}

impl Token {
    pub fn new(kind: TokenKind, value: TokenValue) -> Result<Self, InvalidToken> {
        let consistent = match (kind, &value) {
            (TokenKind::Integer, TokenValue::Integer(_)) => true,
            (TokenKind::Integer, TokenValue::Text(_)) | (_, TokenValue::Integer(_)) => false,
            (_, TokenValue::Text(_)) => true,
        };
        if !consistent {
            return Err(InvalidToken { kind, value });
        }
        Ok(Self { kind, value })
    }

    /// Only called with non-integer kinds.
    fn with_text(kind: TokenKind, text: impl Into<String>) -> Self {
        debug_assert!(kind != TokenKind::Integer);
        Self {
            kind,
            value: TokenValue::Text(text.into()),
        }
    }

    pub fn integer(value: i64) -> Self {
        Self {
            kind: TokenKind::Integer,
            value: TokenValue::Integer(value),
        }
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::with_text(TokenKind::Variable, name)
    }

    pub fn operator(symbol: impl Into<String>) -> Self {
        Self::with_text(TokenKind::Operator, symbol)
    }

    pub fn assign() -> Self {
        Self::with_text(TokenKind::Assign, "=")
    }

    pub fn semicolon() -> Self {
        Self::with_text(TokenKind::Semicolon, ";")
    }

    pub fn paren_open() -> Self {
        Self::with_text(TokenKind::ParenOpen, "(")
    }

    pub fn paren_close() -> Self {
        Self::with_text(TokenKind::ParenClose, ")")
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn value(&self) -> &TokenValue {
        &self.value
    }

    /// The source text this token was built from.
    pub fn source_text(&self) -> String {
        match &self.value {
            TokenValue::Integer(value) => value.to_string(),
            TokenValue::Text(text) => text.clone(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.source_text())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenList {
    pub tokens: Vec<Token>,
}

impl TokenList {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Number of tokens equal (same kind and value) to `needle`.
    pub fn count(&self, needle: &Token) -> usize {
        self.tokens.iter().filter(|token| *token == needle).count()
    }
}

impl From<Vec<Token>> for TokenList {
    fn from(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum LexicalError {
    #[error("invalid character: {fragment}")]
    InvalidCharacter { fragment: String, line: u32 },
    #[error("integer literal out of range: {fragment}")]
    IntegerOutOfRange { fragment: String, line: u32 },
}

impl LexicalError {
    pub fn fragment(&self) -> &str {
        match self {
            LexicalError::InvalidCharacter { fragment, .. }
            | LexicalError::IntegerOutOfRange { fragment, .. } => fragment,
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            LexicalError::InvalidCharacter { line, .. }
            | LexicalError::IntegerOutOfRange { line, .. } => *line,
        }
    }
}

/// Cuts one line into non-blank fragments, in source order.
pub fn fragments(line: &str) -> impl Iterator<Item = &str> {
    FRAGMENT
        .find_iter(line)
        .map(|m| m.as_str())
        .filter(|fragment| !fragment.trim().is_empty())
}

fn classify(fragment: &str, line: u32) -> Result<Token, LexicalError> {
    let kind = TOKEN_PATTERNS
        .iter()
        .find(|(_, pattern)| pattern.is_match(fragment))
        .map(|(kind, _)| *kind)
        .ok_or_else(|| LexicalError::InvalidCharacter {
            fragment: fragment.to_string(),
            line,
        })?;

    if kind == TokenKind::Integer {
        let value = fragment
            .parse::<i64>()
            .map_err(|_| LexicalError::IntegerOutOfRange {
                fragment: fragment.to_string(),
                line,
            })?;
        return Ok(Token::integer(value));
    }

    Ok(Token::with_text(kind, fragment))
}

#[tracing::instrument(level = "trace", skip_all)]
pub fn tokenize(source: &str) -> Result<TokenList, LexicalError> {
    let mut tokens = TokenList::default();
    for (index, line) in source.split('\n').enumerate() {
        let line_number = index as u32 + 1;
        for fragment in fragments(line) {
            tokens.tokens.push(classify(fragment, line_number)?);
        }
        trace!(line = line_number, total = tokens.len(), "Tokenized line");
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_simple_assignment() {
        let tokens = tokenize("x = 1 + 2 ;").unwrap();
        assert_eq!(
            tokens.tokens,
            vec![
                Token::variable("x"),
                Token::assign(),
                Token::integer(1),
                Token::operator("+"),
                Token::integer(2),
                Token::semicolon(),
            ]
        );
    }

    #[test]
    fn whitespace_is_not_required_between_fragments() {
        let spaced = tokenize("total_2 = (a*40)/b;").unwrap();
        let kinds: Vec<TokenKind> = spaced.iter().map(Token::kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Variable,
                TokenKind::Assign,
                TokenKind::ParenOpen,
                TokenKind::Variable,
                TokenKind::Operator,
                TokenKind::Integer,
                TokenKind::ParenClose,
                TokenKind::Operator,
                TokenKind::Variable,
                TokenKind::Semicolon,
            ]
        );
        assert_eq!(spaced.tokens[0], Token::variable("total_2"));
        assert_eq!(spaced.tokens[5], Token::integer(40));
    }

    #[test]
    fn lines_are_concatenated_without_newline_tokens() {
        let tokens = tokenize("a = 1;\r\n\n  b = a;\n").unwrap();
        assert_eq!(tokens.len(), 8);
        assert_eq!(tokens.count(&Token::semicolon()), 2);
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize(" \t\n\n").unwrap().is_empty());
    }

    #[test]
    fn unknown_character_is_a_lexical_error() {
        let err = tokenize("x = 1 @ 2;").unwrap_err();
        assert_eq!(
            err,
            LexicalError::InvalidCharacter {
                fragment: "@".to_string(),
                line: 1,
            }
        );
        assert_eq!(err.to_string(), "invalid character: @");
    }

    #[test]
    fn lexical_error_reports_line_number() {
        let err = tokenize("x = 1;\ny = 2 % 3;").unwrap_err();
        assert_eq!(err.fragment(), "%");
        assert_eq!(err.line(), 2);
    }

    #[test]
    fn digits_followed_by_letters_form_one_invalid_fragment() {
        let err = tokenize("x = 12ab;").unwrap_err();
        assert_eq!(err.fragment(), "12ab");
    }

    #[test]
    fn non_ascii_letters_are_rejected() {
        let err = tokenize("é = 1;").unwrap_err();
        assert_eq!(err.fragment(), "é");
    }

    #[test]
    fn oversized_integer_is_rejected() {
        let err = tokenize("x = 99999999999999999999;").unwrap_err();
        assert!(matches!(err, LexicalError::IntegerOutOfRange { .. }));
    }

    #[test]
    fn leading_zeros_parse_to_the_same_number() {
        let tokens = tokenize("007").unwrap();
        assert_eq!(tokens.tokens, vec![Token::integer(7)]);
    }

    #[test]
    fn token_text_reconstructs_non_whitespace_content() {
        let line = "  result = ( alpha - 3 ) * beta_2 / 4 ;";
        let tokens = tokenize(line).unwrap();
        let rebuilt: String = tokens.iter().map(Token::source_text).collect();
        let expected: String = line.chars().filter(|c| !c.is_whitespace()).collect();
        assert_eq!(rebuilt, expected);
    }

    #[test]
    fn tokenizing_is_deterministic() {
        let source = "a = (1 + b) * 3;\nc = a / 2;";
        assert_eq!(tokenize(source).unwrap(), tokenize(source).unwrap());
    }

    #[test]
    fn tokens_compare_by_kind_and_value() {
        assert_eq!(
            Token::semicolon(),
            Token::new(TokenKind::Semicolon, TokenValue::Text(";".to_string())).unwrap()
        );
        assert_ne!(Token::variable("x"), Token::variable("y"));
        assert_ne!(Token::integer(1), Token::variable("1"));
    }

    #[test]
    fn integer_kind_requires_a_numeric_value() {
        let err = Token::new(TokenKind::Integer, TokenValue::Text("5".to_string())).unwrap_err();
        assert_eq!(err.kind, TokenKind::Integer);
        assert!(Token::new(TokenKind::Variable, TokenValue::Integer(5)).is_err());
        assert_eq!(
            Token::new(TokenKind::Integer, TokenValue::Integer(5)).unwrap(),
            Token::integer(5)
        );
    }

    #[test]
    fn deserializing_a_mismatched_token_fails() {
        let mismatched = r#"{"kind": "Integer", "value": {"Text": "5"}}"#;
        assert!(serde_json::from_str::<Token>(mismatched).is_err());

        let tokens = tokenize("x = 5;").unwrap();
        let json = serde_json::to_string(&tokens).unwrap();
        assert_eq!(serde_json::from_str::<TokenList>(&json).unwrap(), tokens);
    }

    #[test]
    fn token_list_serializes_to_json() {
        let tokens = tokenize("x = (2);").unwrap();
        insta::assert_json_snapshot!(tokens, @r###"
        {
          "tokens": [
            {
              "kind": "Variable",
              "value": {
                "Text": "x"
              }
            },
            {
              "kind": "Assign",
              "value": {
                "Text": "="
              }
            },
            {
              "kind": "ParenOpen",
              "value": {
                "Text": "("
              }
            },
            {
              "kind": "Integer",
              "value": {
                "Integer": 2
              }
            },
            {
              "kind": "ParenClose",
              "value": {
                "Text": ")"
              }
            },
            {
              "kind": "Semicolon",
              "value": {
                "Text": ";"
              }
            }
          ]
        }
        "###);
    }
}
