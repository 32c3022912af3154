//! Token tree: tokens grouped by their delimiters
//!
//! Groups nest `()`, `[]`, `{}` and `#[ ]`. Rendering walks the tree and
//! concatenates token text, so an unmodified tree renders to its input.

use super::lexer::{tokenize, Token, TokenKind};
use super::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Paren,
    Bracket,
    Brace,
    /// `#[ ... ]`
    Attribute,
}

impl Delimiter {
    fn from_open(token: &Token) -> Option<Self> {
        if token.kind != TokenKind::Punct {
            return None;
        }
        match token.text.as_str() {
            "(" => Some(Self::Paren),
            "[" => Some(Self::Bracket),
            "{" => Some(Self::Brace),
            "#[" => Some(Self::Attribute),
            _ => None,
        }
    }

    fn close(self) -> &'static str {
        match self {
            Self::Paren => ")",
            Self::Bracket | Self::Attribute => "]",
            Self::Brace => "}",
        }
    }
}

/// A delimited group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub delimiter: Delimiter,
    pub open: Token,
    pub children: Vec<Node>,
    pub close: Token,
}

impl Group {
    /// Whether the group holds nothing but whitespace and comments
    pub fn is_blank(&self) -> bool {
        self.children
            .iter()
            .all(|n| n.as_token().is_some_and(Token::is_trivia))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Token(Token),
    Group(Group),
}

impl Node {
    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Self::Token(token) => Some(token),
            Self::Group(_) => None,
        }
    }

    pub fn as_token_mut(&mut self) -> Option<&mut Token> {
        match self {
            Self::Token(token) => Some(token),
            Self::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Self::Group(group) => Some(group),
            Self::Token(_) => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut Group> {
        match self {
            Self::Group(group) => Some(group),
            Self::Token(_) => None,
        }
    }

    pub fn is_trivia(&self) -> bool {
        self.as_token().is_some_and(Token::is_trivia)
    }

    pub fn is_punct(&self, text: &str) -> bool {
        self.as_token().is_some_and(|t| t.is_punct(text))
    }

    pub fn is_ident(&self, text: &str) -> bool {
        self.as_token().is_some_and(|t| t.is_ident(text))
    }

    pub fn is_group(&self, delimiter: Delimiter) -> bool {
        self.as_group().is_some_and(|g| g.delimiter == delimiter)
    }

    fn render_into(&self, out: &mut String) {
        match self {
            Self::Token(token) => out.push_str(&token.text),
            Self::Group(group) => {
                out.push_str(&group.open.text);
                for child in &group.children {
                    child.render_into(out);
                }
                out.push_str(&group.close.text);
            }
        }
    }
}

/// A parsed PHP file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub nodes: Vec<Node>,
}

impl SourceFile {
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        let mut stack: Vec<(Delimiter, Token, Vec<Node>)> = Vec::new();
        let mut nodes = Vec::new();

        for token in tokenize(source)? {
            if let Some(delimiter) = Delimiter::from_open(&token) {
                stack.push((delimiter, token, std::mem::take(&mut nodes)));
                continue;
            }

            let closes = token.kind == TokenKind::Punct && matches!(token.text.as_str(), ")" | "]" | "}");
            if !closes {
                nodes.push(Node::Token(token));
                continue;
            }

            let Some((delimiter, open, parent)) = stack.pop() else {
                return Err(ParseError {
                    line: token.line,
                    message: format!("unexpected '{}'", token.text),
                });
            };
            if delimiter.close() != token.text {
                return Err(ParseError {
                    line: token.line,
                    message: format!(
                        "expected '{}' to close '{}' from line {}, found '{}'",
                        delimiter.close(),
                        open.text,
                        open.line,
                        token.text
                    ),
                });
            }
            let children = std::mem::replace(&mut nodes, parent);
            nodes.push(Node::Group(Group {
                delimiter,
                open,
                children,
                close: token,
            }));
        }

        if let Some((_, open, _)) = stack.pop() {
            return Err(ParseError {
                line: open.line,
                message: format!("unclosed '{}'", open.text),
            });
        }

        Ok(Self { nodes })
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            node.render_into(&mut out);
        }
        out
    }
}

/// Index of the next non-trivia node at or after `from`
pub fn next_significant(nodes: &[Node], from: usize) -> Option<usize> {
    (from..nodes.len()).find(|&i| !nodes[i].is_trivia())
}
