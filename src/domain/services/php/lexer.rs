//! Lossless PHP tokenizer
//!
//! Concatenating the text of every token reproduces the input exactly. The
//! lexer only distinguishes what the rewrites need: it knows where strings,
//! comments and tags begin and end, and leaves everything else as identifiers
//! and punctuation.

use super::ParseError;

/// Kind of a lexical token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Text outside `<?php ... ?>`
    InlineHtml,
    /// `<?php`
    OpenTag,
    /// `<?=`
    OpenTagWithEcho,
    /// `?>`
    CloseTag,
    Whitespace,
    /// `//`, `#` or `/* */` comment
    Comment,
    /// `/** */` comment
    DocComment,
    /// Single, double or backtick quoted string
    String,
    /// Heredoc or nowdoc, including the closing identifier
    Heredoc,
    /// `$name`
    Variable,
    /// Keyword, name or (possibly qualified) identifier
    Ident,
    Number,
    /// Operator or delimiter, `#[` included
    Punct,
}

/// A token and the line it starts on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
        }
    }

    /// Whitespace and comments
    pub fn is_trivia(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Whitespace | TokenKind::Comment | TokenKind::DocComment
        )
    }

    pub fn is_punct(&self, text: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == text
    }

    /// Identifier comparison is case-insensitive, as PHP keywords and
    /// function names are
    pub fn is_ident(&self, text: &str) -> bool {
        self.kind == TokenKind::Ident && self.text.eq_ignore_ascii_case(text)
    }

    /// Value of a plain quoted string literal, without escapes or interpolation
    pub fn string_literal(&self) -> Option<&str> {
        if self.kind != TokenKind::String || self.text.len() < 2 {
            return None;
        }
        let quote = self.text.as_bytes()[0];
        let inner = &self.text[1..self.text.len() - 1];
        match quote {
            b'\'' if !inner.contains('\\') => Some(inner),
            b'"' if !inner.contains(|c: char| c == '\\' || c == '$') => Some(inner),
            _ => None,
        }
    }
}

/// Multi-character operators, longest first within each length
const OPERATORS: &[&str] = &[
    "<=>", "**=", "...", "<<=", ">>=", "===", "!==", "??=", "?->", "::", "->", "=>", "==", "!=",
    "<>", "<=", ">=", "&&", "||", "??", "++", "--", "+=", "-=", "*=", "/=", ".=", "%=", "&=", "|=",
    "^=", "<<", ">>", "**",
];

/// Split PHP source into tokens
pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    Lexer::new(source).run()
}

struct Lexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            line: 1,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>, ParseError> {
        let mut in_php = false;
        while self.pos < self.bytes.len() {
            if in_php {
                in_php = self.php_token()?;
            } else {
                self.inline_html();
                in_php = true;
            }
        }
        Ok(self.tokens)
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn starts_with(&self, text: &str) -> bool {
        self.bytes[self.pos..].starts_with(text.as_bytes())
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        let text = &self.src[start..self.pos];
        let line = self.line;
        self.line += text.bytes().filter(|b| *b == b'\n').count();
        self.tokens.push(Token::new(kind, text, line));
    }

    fn error(&self, line: usize, message: impl Into<String>) -> ParseError {
        ParseError {
            line,
            message: message.into(),
        }
    }

    /// Consume inline HTML up to and including the next open tag
    fn inline_html(&mut self) {
        let start = self.pos;
        while self.pos < self.bytes.len() {
            if self.bytes[self.pos] == b'<' && self.peek(1) == Some(b'?') {
                if let Some(tag) = self.open_tag_len() {
                    if self.pos > start {
                        self.push(TokenKind::InlineHtml, start);
                    }
                    let tag_start = self.pos;
                    let kind = if tag == 3 {
                        TokenKind::OpenTagWithEcho
                    } else {
                        TokenKind::OpenTag
                    };
                    self.pos += tag;
                    self.push(kind, tag_start);
                    return;
                }
            }
            self.pos += 1;
        }
        if self.pos > start {
            self.push(TokenKind::InlineHtml, start);
        }
    }

    fn open_tag_len(&self) -> Option<usize> {
        if self.peek(2) == Some(b'=') {
            return Some(3);
        }
        let tail = self.bytes.get(self.pos + 2..self.pos + 5)?;
        if !tail.eq_ignore_ascii_case(b"php") {
            return None;
        }
        match self.peek(5) {
            None => Some(5),
            Some(b) if b.is_ascii_whitespace() => Some(5),
            _ => None,
        }
    }

    /// Lex one token in PHP mode; returns whether still in PHP mode
    fn php_token(&mut self) -> Result<bool, ParseError> {
        let start = self.pos;
        let b = self.bytes[self.pos];

        if b.is_ascii_whitespace() {
            while self.peek(0).is_some_and(|b| b.is_ascii_whitespace()) {
                self.pos += 1;
            }
            self.push(TokenKind::Whitespace, start);
            return Ok(true);
        }

        if self.starts_with("?>") {
            self.pos += 2;
            self.push(TokenKind::CloseTag, start);
            return Ok(false);
        }

        if self.starts_with("#[") {
            self.pos += 2;
            self.push(TokenKind::Punct, start);
            return Ok(true);
        }

        if b == b'#' || self.starts_with("//") {
            self.line_comment();
            self.push(TokenKind::Comment, start);
            return Ok(true);
        }

        if self.starts_with("/*") {
            let doc = self.starts_with("/**") && self.peek(3).is_some_and(|b| b.is_ascii_whitespace());
            match find(self.bytes, self.pos + 2, b"*/") {
                Some(end) => self.pos = end + 2,
                None => return Err(self.error(self.line, "unterminated comment")),
            }
            let kind = if doc {
                TokenKind::DocComment
            } else {
                TokenKind::Comment
            };
            self.push(kind, start);
            return Ok(true);
        }

        match b {
            b'\'' => {
                self.pos = self.single_quoted(self.pos)?;
                self.push(TokenKind::String, start);
            }
            b'"' | b'`' => {
                self.pos = self.interpolated(self.pos, b)?;
                self.push(TokenKind::String, start);
            }
            b'<' if self.starts_with("<<<") && self.heredoc_label().is_some() => {
                self.heredoc()?;
                self.push(TokenKind::Heredoc, start);
            }
            b'$' if self.peek(1).is_some_and(is_ident_start) => {
                self.pos += 1;
                self.skip_ident();
                self.push(TokenKind::Variable, start);
            }
            b'0'..=b'9' => {
                while self
                    .peek(0)
                    .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'.')
                {
                    self.pos += 1;
                }
                self.push(TokenKind::Number, start);
            }
            b'\\' if self.peek(1).is_some_and(is_ident_start) => {
                self.skip_ident();
                self.push(TokenKind::Ident, start);
            }
            _ if is_ident_start(b) => {
                self.skip_ident();
                self.push(TokenKind::Ident, start);
            }
            _ => {
                let len = OPERATORS
                    .iter()
                    .find(|op| self.starts_with(op))
                    .map(|op| op.len())
                    .unwrap_or(1);
                self.pos += len;
                self.push(TokenKind::Punct, start);
            }
        }
        Ok(true)
    }

    /// Identifier, possibly namespace-qualified (`\Foo\Bar`)
    fn skip_ident(&mut self) {
        while let Some(b) = self.peek(0) {
            let qualified = b == b'\\' && self.peek(1).is_some_and(is_ident_start);
            if is_ident_char(b) || qualified {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    /// Line comments stop before a newline or a close tag
    fn line_comment(&mut self) {
        while let Some(b) = self.peek(0) {
            if b == b'\n' || self.starts_with("?>") {
                break;
            }
            self.pos += 1;
        }
    }

    /// End offset (exclusive) of a single-quoted string starting at `at`
    fn single_quoted(&self, at: usize) -> Result<usize, ParseError> {
        let mut i = at + 1;
        while let Some(&b) = self.bytes.get(i) {
            match b {
                b'\\' => i += 2,
                b'\'' => return Ok(i + 1),
                _ => i += 1,
            }
        }
        Err(self.error(self.line, "unterminated string"))
    }

    /// End offset of a double-quoted or backtick string, skipping `{$ ... }`
    fn interpolated(&self, at: usize, quote: u8) -> Result<usize, ParseError> {
        let mut i = at + 1;
        while let Some(&b) = self.bytes.get(i) {
            if b == b'\\' {
                i += 2;
            } else if b == quote {
                return Ok(i + 1);
            } else if b == b'{' && self.bytes.get(i + 1) == Some(&b'$') {
                i = self.interpolation(i)?;
            } else {
                i += 1;
            }
        }
        Err(self.error(self.line, "unterminated string"))
    }

    /// End offset of a `{$ ... }` block
    fn interpolation(&self, at: usize) -> Result<usize, ParseError> {
        let mut depth = 0usize;
        let mut i = at;
        while let Some(&b) = self.bytes.get(i) {
            match b {
                b'{' => {
                    depth += 1;
                    i += 1;
                }
                b'}' => {
                    depth -= 1;
                    i += 1;
                    if depth == 0 {
                        return Ok(i);
                    }
                }
                b'\'' => i = self.single_quoted(i)?,
                b'"' => i = self.interpolated(i, b'"')?,
                _ => i += 1,
            }
        }
        Err(self.error(self.line, "unterminated string interpolation"))
    }

    /// Label of a heredoc starting at the current `<<<`, and whether it is a nowdoc
    fn heredoc_label(&self) -> Option<(String, usize)> {
        let mut i = self.pos + 3;
        while matches!(self.bytes.get(i), Some(b' ' | b'\t')) {
            i += 1;
        }
        let quote = match self.bytes.get(i) {
            Some(&q @ (b'\'' | b'"')) => {
                i += 1;
                Some(q)
            }
            _ => None,
        };
        let label_start = i;
        if !self.bytes.get(i).copied().is_some_and(is_ident_start) {
            return None;
        }
        while self.bytes.get(i).copied().is_some_and(is_ident_char) {
            i += 1;
        }
        let label = self.src[label_start..i].to_string();
        if let Some(q) = quote {
            if self.bytes.get(i) != Some(&q) {
                return None;
            }
            i += 1;
        }
        match self.bytes.get(i) {
            Some(b'\n') => Some((label, i + 1)),
            Some(b'\r') if self.bytes.get(i + 1) == Some(&b'\n') => Some((label, i + 2)),
            _ => None,
        }
    }

    /// Consume a heredoc or nowdoc through its closing label
    fn heredoc(&mut self) -> Result<(), ParseError> {
        let Some((label, body)) = self.heredoc_label() else {
            return Err(self.error(self.line, "malformed heredoc"));
        };
        let mut line_start = body;
        while line_start <= self.bytes.len() {
            let mut i = line_start;
            while matches!(self.bytes.get(i), Some(b' ' | b'\t')) {
                i += 1;
            }
            let end = i + label.len();
            if self.bytes.get(i..end) == Some(label.as_bytes())
                && !self.bytes.get(end).copied().is_some_and(is_ident_char)
            {
                self.pos = end;
                return Ok(());
            }
            match find(self.bytes, line_start, b"\n") {
                Some(newline) => line_start = newline + 1,
                None => break,
            }
        }
        Err(self.error(self.line, format!("unterminated heredoc {}", label)))
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

fn is_ident_char(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}

fn find(haystack: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    haystack
        .get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}
