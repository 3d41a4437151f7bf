//! SQL Lexer - Tokenizes SQL input text into a stream of located tokens
//!
//! At every position the sub-lexers are tried in a fixed order (keyword, symbol,
//! string, numeric, identifier) and the first one that matches wins. A sub-lexer that
//! matches only whitespace advances the cursor without producing a token.

use std::fmt::Display;

use crate::error::{Error, Result};

/// 0-based position of a character in the source text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub col: usize,
}

impl Location {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Lexical class of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Keyword,
    Symbol,
    Identifier,
    String,
    Numeric,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TokenKind::Keyword => "keyword",
            TokenKind::Symbol => "symbol",
            TokenKind::Identifier => "identifier",
            TokenKind::String => "string",
            TokenKind::Numeric => "numeric",
        })
    }
}

/// Represents a single lexical token in the SQL input
///
/// Keywords and unquoted identifiers are lower-cased; quoted identifiers and strings
/// keep their text as written, with escapes resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub value: String,
    pub kind: TokenKind,
    pub loc: Location,
}

impl Token {
    pub fn new(value: impl Into<String>, kind: TokenKind, loc: Location) -> Self {
        Self {
            value: value.into(),
            kind,
            loc,
        }
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword && self.value == keyword.to_str()
    }

    pub fn is_symbol(&self, symbol: Symbol) -> bool {
        self.kind == TokenKind::Symbol && self.value == symbol.to_str()
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

/// SQL reserved keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Select,
    From,
    Where,
    As,
    Table,
    Create,
    Insert,
    Into,
    Values,
    Int,
    Text,
}

impl Keyword {
    pub const ALL: [Keyword; 11] = [
        Keyword::Select,
        Keyword::From,
        Keyword::Where,
        Keyword::As,
        Keyword::Table,
        Keyword::Create,
        Keyword::Insert,
        Keyword::Into,
        Keyword::Values,
        Keyword::Int,
        Keyword::Text,
    ];

    /// Returns the normalized (lowercase) spelling of the keyword
    pub fn to_str(self) -> &'static str {
        match self {
            Keyword::Select => "select",
            Keyword::From => "from",
            Keyword::Where => "where",
            Keyword::As => "as",
            Keyword::Table => "table",
            Keyword::Create => "create",
            Keyword::Insert => "insert",
            Keyword::Into => "into",
            Keyword::Values => "values",
            Keyword::Int => "int",
            Keyword::Text => "text",
        }
    }
}

impl Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_str())
    }
}

/// Operators and punctuation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Semicolon,
    Asterisk,
    Comma,
    OpenParen,
    CloseParen,
    Concat,
    Equal,
}

impl Symbol {
    pub const ALL: [Symbol; 7] = [
        Symbol::Semicolon,
        Symbol::Asterisk,
        Symbol::Comma,
        Symbol::OpenParen,
        Symbol::CloseParen,
        Symbol::Concat,
        Symbol::Equal,
    ];

    pub fn to_str(self) -> &'static str {
        match self {
            Symbol::Semicolon => ";",
            Symbol::Asterisk => "*",
            Symbol::Comma => ",",
            Symbol::OpenParen => "(",
            Symbol::CloseParen => ")",
            Symbol::Concat => "||",
            Symbol::Equal => "=",
        }
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_str())
    }
}

/// Lexing position: byte offset into the source plus its line/column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub pointer: usize,
    pub loc: Location,
}

impl Cursor {
    /// Consumes one character that is `width` bytes long
    fn advance(&mut self, width: usize) {
        self.pointer += width;
        self.loc.col += 1;
    }
}

/// A sub-lexer either matches at the cursor, returning the position after the match and
/// an optional token, or returns `None` so the next sub-lexer can be tried.
type SubLexer = fn(&str, Cursor) -> Option<(Option<Token>, Cursor)>;

const SUB_LEXERS: [SubLexer; 5] = [
    lex_keyword,
    lex_symbol,
    lex_string,
    lex_numeric,
    lex_identifier,
];

/// Tokenizes the whole source text
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    Lexer::new(source).collect()
}

/// SQL lexical analyzer (lexer/tokenizer)
pub struct Lexer<'a> {
    source: &'a str,
    cursor: Cursor,
    /// Value of the last emitted token, reported as a hint on failure
    last: Option<String>,
    failed: bool,
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        while self.cursor.pointer < self.source.len() {
            match self.try_sub_lexers() {
                Some((token, cursor)) => {
                    self.cursor = cursor;
                    if let Some(token) = token {
                        self.last = Some(token.value.clone());
                        return Some(Ok(token));
                    }
                }
                None => {
                    self.failed = true;
                    return Some(Err(Error::Lex {
                        loc: self.cursor.loc,
                        hint: self.last.clone(),
                    }));
                }
            }
        }
        None
    }
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given SQL text
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            cursor: Cursor::default(),
            last: None,
            failed: false,
        }
    }

    /// Runs the sub-lexers in priority order at the current cursor
    fn try_sub_lexers(&self) -> Option<(Option<Token>, Cursor)> {
        SUB_LEXERS
            .iter()
            .find_map(|lex| lex(self.source, self.cursor))
    }
}

/// Finds the longest option that the source spells (case-insensitively) at the cursor.
///
/// Options are dropped as soon as the text read so far stops being a prefix of them.
/// An option that is matched exactly is remembered and reading continues, so `into`
/// still wins over `int` when the input allows it.
fn longest_match(source: &str, ic: Cursor, options: &[&'static str]) -> Option<&'static str> {
    let mut value = Vec::new();
    let mut skipped = vec![false; options.len()];
    let mut matched: Option<&'static str> = None;

    for &byte in source.as_bytes().get(ic.pointer..)? {
        value.push(byte.to_ascii_lowercase());

        for (i, option) in options.iter().enumerate() {
            if skipped[i] {
                continue;
            }
            if option.as_bytes() == value.as_slice() {
                skipped[i] = true;
                if matched.is_none_or(|m| option.len() > m.len()) {
                    matched = Some(*option);
                }
                continue;
            }
            if value.len() > option.len() || !option.as_bytes().starts_with(&value) {
                skipped[i] = true;
            }
        }

        if skipped.iter().all(|s| *s) {
            break;
        }
    }
    matched
}

fn lex_keyword(source: &str, ic: Cursor) -> Option<(Option<Token>, Cursor)> {
    let keyword = longest_match(source, ic, &Keyword::ALL.map(Keyword::to_str))?;
    let mut cur = ic;
    cur.pointer += keyword.len();
    cur.loc.col += keyword.len();
    Some((Some(Token::new(keyword, TokenKind::Keyword, ic.loc)), cur))
}

fn lex_symbol(source: &str, ic: Cursor) -> Option<(Option<Token>, Cursor)> {
    let c = *source.as_bytes().get(ic.pointer)?;
    let mut cur = ic;

    // Whitespace is consumed one character at a time and produces no token
    match c {
        b'\n' => {
            cur.pointer += 1;
            cur.loc.line += 1;
            cur.loc.col = 0;
            return Some((None, cur));
        }
        b' ' | b'\t' => {
            cur.advance(1);
            return Some((None, cur));
        }
        _ => {}
    }

    let symbol = longest_match(source, ic, &Symbol::ALL.map(Symbol::to_str))?;
    cur.pointer += symbol.len();
    cur.loc.col += symbol.len();
    Some((Some(Token::new(symbol, TokenKind::Symbol, ic.loc)), cur))
}

fn lex_numeric(source: &str, ic: Cursor) -> Option<(Option<Token>, Cursor)> {
    let bytes = source.as_bytes();
    let mut cur = ic;
    let mut period_found = false;
    let mut exp_marker_found = false;

    while let Some(&c) = bytes.get(cur.pointer) {
        let is_digit = c.is_ascii_digit();
        let is_period = c == b'.';
        let is_exp_marker = c == b'e';

        if cur.pointer == ic.pointer {
            // Number must start with a digit or a period
            if !is_digit && !is_period {
                return None;
            }
            period_found = is_period;
        } else if is_period {
            if period_found {
                return None;
            }
            period_found = true;
        } else if is_exp_marker {
            if exp_marker_found {
                return None;
            }
            // No periods are allowed after the exponent marker
            period_found = true;
            exp_marker_found = true;

            if cur.pointer + 1 == bytes.len() {
                return None;
            }
            if matches!(bytes[cur.pointer + 1], b'+' | b'-') {
                cur.advance(1);
            }
        } else if !is_digit {
            break;
        }
        cur.advance(1);
    }

    if cur.pointer == ic.pointer {
        return None;
    }
    let value = &source[ic.pointer..cur.pointer];
    Some((Some(Token::new(value, TokenKind::Numeric, ic.loc)), cur))
}

/// Reads text enclosed in `delimiter`; a doubled delimiter stands for one literal
/// delimiter. Unterminated input is no match.
fn lex_character_delimited(
    source: &str,
    ic: Cursor,
    delimiter: char,
    kind: TokenKind,
) -> Option<(Option<Token>, Cursor)> {
    let mut chars = source.get(ic.pointer..)?.chars().peekable();
    if chars.next()? != delimiter {
        return None;
    }

    let mut cur = ic;
    cur.advance(delimiter.len_utf8());
    let mut value = String::new();

    while let Some(c) = chars.next() {
        cur.advance(c.len_utf8());
        if c == delimiter {
            if chars.next_if_eq(&delimiter).is_none() {
                return Some((Some(Token::new(value, kind, ic.loc)), cur));
            }
            cur.advance(delimiter.len_utf8());
        }
        value.push(c);
    }
    None
}

fn lex_string(source: &str, ic: Cursor) -> Option<(Option<Token>, Cursor)> {
    lex_character_delimited(source, ic, '\'', TokenKind::String)
}

fn lex_identifier(source: &str, ic: Cursor) -> Option<(Option<Token>, Cursor)> {
    if let Some(quoted) = lex_character_delimited(source, ic, '"', TokenKind::Identifier) {
        return Some(quoted);
    }

    let bytes = source.as_bytes();
    if !bytes.get(ic.pointer)?.is_ascii_alphabetic() {
        return None;
    }

    let mut cur = ic;
    cur.advance(1);
    while let Some(&c) = bytes.get(cur.pointer) {
        if !(c.is_ascii_alphanumeric() || c == b'$' || c == b'_') {
            break;
        }
        cur.advance(1);
    }

    // Unquoted identifiers are case-insensitive
    let value = source[ic.pointer..cur.pointer].to_ascii_lowercase();
    Some((Some(Token::new(value, TokenKind::Identifier, ic.loc)), cur))
}

#[cfg(test)]
mod tests {
    use super::{
        Cursor, Keyword, Lexer, Location, Symbol, Token, TokenKind, lex_identifier,
        lex_keyword, lex_numeric, lex_string, lex_symbol, tokenize,
    };
    use crate::error::{Error, Result};

    fn token(value: &str, kind: TokenKind, col: usize) -> Token {
        Token::new(value, kind, Location::new(0, col))
    }

    #[test]
    fn test_lex_numeric() {
        let cases = [
            (true, "105"),
            (true, "123."),
            (true, "123.145"),
            (true, "1e5"),
            (true, "1.e21"),
            (true, "1.1e2"),
            (true, "1.1e-2"),
            (true, "1.1e+2"),
            (true, "1e-1"),
            (true, ".1"),
            (true, "0.105"),
            (true, "1.105"),
            (false, "e4"),
            (false, "1.."),
            (false, "1ee4"),
            (false, "1e4.5"),
            (false, "1e"),
            (false, " 1"),
        ];
        for (valid, input) in cases {
            let result = lex_numeric(input, Cursor::default());
            assert_eq!(result.is_some(), valid, "{}", input);
            if let Some((Some(tok), cur)) = result {
                assert_eq!(tok.value, input.trim(), "{}", input);
                assert_eq!(tok.kind, TokenKind::Numeric);
                assert_eq!(cur.loc.col, input.len());
            }
        }
    }

    #[test]
    fn test_lex_numeric_stops_at_non_digit() {
        let (tok, cur) = lex_numeric("105, 233", Cursor::default()).unwrap();
        assert_eq!(tok.unwrap().value, "105");
        assert_eq!(cur.pointer, 3);
        assert_eq!(cur.loc.col, 3);
    }

    #[test]
    fn test_lex_identifier() {
        let cases = [
            (true, "a", "a"),
            (true, "abc", "abc"),
            (true, "abc ", "abc"),
            (true, "\" abc \"", " abc "),
            (true, "a9$", "a9$"),
            (true, "userName", "username"),
            (true, "\"userName\"", "userName"),
            (true, "\"say \"\"hi\"\"\"", "say \"hi\""),
            (false, "\"", ""),
            (false, "_sadsfa", ""),
            (false, "9sadsfa", ""),
            (false, " abc", ""),
        ];
        for (valid, input, value) in cases {
            let result = lex_identifier(input, Cursor::default());
            assert_eq!(result.is_some(), valid, "{}", input);
            if let Some((Some(tok), _)) = result {
                assert_eq!(tok.value, value, "{}", input);
                assert_eq!(tok.kind, TokenKind::Identifier);
            }
        }
    }

    #[test]
    fn test_lex_keyword() {
        let cases = [
            (true, "select "),
            (true, "from"),
            (true, "as"),
            (true, "SELECT"),
            (true, "into"),
            (false, " into"),
            (false, "flubbrety"),
        ];
        for (valid, input) in cases {
            let result = lex_keyword(input, Cursor::default());
            assert_eq!(result.is_some(), valid, "{}", input);
            if let Some((Some(tok), _)) = result {
                assert_eq!(tok.value, input.trim().to_lowercase(), "{}", input);
            }
        }
    }

    #[test]
    fn test_lex_keyword_longest_match() {
        let (tok, cur) = lex_keyword("into", Cursor::default()).unwrap();
        assert_eq!(tok.unwrap().value, "into");
        assert_eq!(cur.pointer, 4);

        // `int` is kept once `into` can no longer match
        let (tok, cur) = lex_keyword("inta", Cursor::default()).unwrap();
        assert_eq!(tok.unwrap().value, "int");
        assert_eq!(cur.pointer, 3);

        let (tok, _) = lex_keyword("INT,", Cursor::default()).unwrap();
        assert!(tok.unwrap().is_keyword(Keyword::Int));
    }

    #[test]
    fn test_lex_string() {
        let cases = [
            (true, "'abc'", "abc"),
            (true, "'ab c'", "ab c"),
            (true, "'a b'", "a b"),
            (true, "'b'", "b"),
            (true, "'a '' b'", "a ' b"),
            (true, "''", ""),
            (true, "'héllo'", "héllo"),
            (false, "a", ""),
            (false, "'", ""),
            (false, "", ""),
            (false, " 'foo'", ""),
            (false, "'unterminated", ""),
        ];
        for (valid, input, value) in cases {
            let result = lex_string(input, Cursor::default());
            assert_eq!(result.is_some(), valid, "{}", input);
            if let Some((Some(tok), _)) = result {
                assert_eq!(tok.value, value, "{}", input);
                assert_eq!(tok.kind, TokenKind::String);
            }
        }
    }

    #[test]
    fn test_lex_symbol() {
        let (tok, _) = lex_symbol("= ", Cursor::default()).unwrap();
        assert!(tok.unwrap().is_symbol(Symbol::Equal));

        let (tok, cur) = lex_symbol("||", Cursor::default()).unwrap();
        assert!(tok.unwrap().is_symbol(Symbol::Concat));
        assert_eq!(cur.loc.col, 2);

        assert!(lex_symbol("|", Cursor::default()).is_none());
        assert!(lex_symbol("a", Cursor::default()).is_none());

        let (tok, cur) = lex_symbol("\nx", Cursor::default()).unwrap();
        assert!(tok.is_none());
        assert_eq!(cur.loc, Location::new(1, 0));
        assert_eq!(cur.pointer, 1);

        let (tok, cur) = lex_symbol("\tx", Cursor::default()).unwrap();
        assert!(tok.is_none());
        assert_eq!(cur.loc, Location::new(0, 1));
    }

    #[test]
    fn test_tokenize_positions() -> Result<()> {
        let tokens = tokenize("select id from users;")?;
        let cols = tokens.iter().map(|t| t.loc.col).collect::<Vec<_>>();
        assert_eq!(cols, vec![0, 7, 10, 15, 20]);

        assert_eq!(
            tokenize("select 'foo' || 'bar';")?,
            vec![
                token("select", TokenKind::Keyword, 0),
                token("foo", TokenKind::String, 7),
                token("||", TokenKind::Symbol, 13),
                token("bar", TokenKind::String, 16),
                token(";", TokenKind::Symbol, 21),
            ]
        );

        assert_eq!(
            tokenize("insert into users values (105, 233)")?,
            vec![
                token("insert", TokenKind::Keyword, 0),
                token("into", TokenKind::Keyword, 7),
                token("users", TokenKind::Identifier, 12),
                token("values", TokenKind::Keyword, 18),
                token("(", TokenKind::Symbol, 25),
                token("105", TokenKind::Numeric, 26),
                token(",", TokenKind::Symbol, 29),
                token("233", TokenKind::Numeric, 31),
                token(")", TokenKind::Symbol, 34),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_tokenize_create_table() -> Result<()> {
        assert_eq!(
            tokenize("CREATE TABLE u (id INT, name TEXT)")?,
            vec![
                token("create", TokenKind::Keyword, 0),
                token("table", TokenKind::Keyword, 7),
                token("u", TokenKind::Identifier, 13),
                token("(", TokenKind::Symbol, 15),
                token("id", TokenKind::Identifier, 16),
                token("int", TokenKind::Keyword, 19),
                token(",", TokenKind::Symbol, 22),
                token("name", TokenKind::Identifier, 24),
                token("text", TokenKind::Keyword, 29),
                token(")", TokenKind::Symbol, 33),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_tokenize_into_is_one_keyword() -> Result<()> {
        assert_eq!(tokenize("into")?, vec![token("into", TokenKind::Keyword, 0)]);
        Ok(())
    }

    #[test]
    fn test_tokenize_multiline() -> Result<()> {
        let tokens = tokenize("select a,\n  \"B\"\nfrom t;")?;
        let located = tokens
            .iter()
            .map(|t| (t.value.as_str(), t.loc.line, t.loc.col))
            .collect::<Vec<_>>();
        assert_eq!(
            located,
            vec![
                ("select", 0, 0),
                ("a", 0, 7),
                (",", 0, 8),
                ("B", 1, 2),
                ("from", 2, 0),
                ("t", 2, 5),
                (";", 2, 6),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_tokenize_error() {
        assert_eq!(
            tokenize("select a # b"),
            Err(Error::Lex {
                loc: Location::new(0, 9),
                hint: Some("a".to_string()),
            })
        );
        assert_eq!(
            tokenize("'dangling"),
            Err(Error::Lex {
                loc: Location::new(0, 0),
                hint: None,
            })
        );
    }

    #[test]
    fn test_lexer_stops_after_error() {
        let mut lexer = Lexer::new("a # b");
        assert_eq!(lexer.next(), Some(Ok(token("a", TokenKind::Identifier, 0))));
        assert_eq!(
            lexer.next(),
            Some(Err(Error::Lex {
                loc: Location::new(0, 2),
                hint: Some("a".to_string()),
            }))
        );
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn test_tokenize_empty() -> Result<()> {
        assert!(tokenize("")?.is_empty());
        assert!(tokenize(" \t\n ")?.is_empty());
        Ok(())
    }
}
