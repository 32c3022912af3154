//! Source rewrites applied to known files while they are archived
//!
//! Each rewrite is a structural mutation of a parsed [`SourceFile`]; text
//! that only looks like the target (inside strings, comments or other
//! methods) is left alone.

use std::ops::Range;

use super::php::{next_significant, Delimiter, Group, Node, ParseError, SourceFile, Token, TokenKind};

/// Config key forced to `true` in `config/config.php`
pub const SCAN_CACHEABLE_KEY: &str = "scan_cacheable";

/// A single structural mutation of a PHP file
pub trait SourceRewrite {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Mutate the tree; returns whether anything changed
    fn apply(&self, file: &mut SourceFile) -> bool;
}

/// Rewritten source and whether it differs from the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOutcome {
    pub source: String,
    pub changed: bool,
}

/// Parse `source`, apply `rewrite` and render the result
pub fn rewrite_source(source: &str, rewrite: &dyn SourceRewrite) -> Result<RewriteOutcome, ParseError> {
    let mut file = SourceFile::parse(source)?;
    let changed = rewrite.apply(&mut file);
    Ok(RewriteOutcome {
        source: file.render(),
        changed,
    })
}

/// Forces `'scan_cacheable' => ...` in the returned config array to `true`.
///
/// Only top-level entries of the first top-level `return [...]` (or
/// `return array(...)`) are considered. A missing key is not inserted.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnableScanCacheable;

impl SourceRewrite for EnableScanCacheable {
    fn name(&self) -> &'static str {
        "enable-scan-cacheable"
    }

    fn apply(&self, file: &mut SourceFile) -> bool {
        match returned_array(&mut file.nodes) {
            Some(items) => force_true(items, SCAN_CACHEABLE_KEY),
            None => false,
        }
    }
}

fn returned_array(nodes: &mut [Node]) -> Option<&mut Vec<Node>> {
    let ret = nodes.iter().position(|n| n.is_ident("return"))?;
    let first = next_significant(nodes, ret + 1)?;
    let index = if nodes[first].is_group(Delimiter::Bracket) {
        first
    } else if nodes[first].is_ident("array") {
        let paren = next_significant(nodes, first + 1)?;
        if !nodes[paren].is_group(Delimiter::Paren) {
            return None;
        }
        paren
    } else {
        return None;
    };
    nodes[index].as_group_mut().map(|g| &mut g.children)
}

fn force_true(items: &mut Vec<Node>, key: &str) -> bool {
    let mut values = Vec::new();
    let mut item_start = 0;
    for i in 0..=items.len() {
        if i < items.len() && !items[i].is_punct(",") {
            continue;
        }
        if let Some(value) = keyed_value(&items[item_start..i], key) {
            values.push((item_start + value.start)..(item_start + value.end));
        }
        item_start = i + 1;
    }

    let mut changed = false;
    for value in values.into_iter().rev() {
        if value.len() == 1 && items[value.start].is_ident("true") {
            continue;
        }
        let line = node_line(&items[value.start]);
        items.splice(value, [Node::Token(Token::new(TokenKind::Ident, "true", line))]);
        changed = true;
    }
    changed
}

/// Range of the value nodes of `key => value` within one array item
fn keyed_value(item: &[Node], key: &str) -> Option<Range<usize>> {
    let arrow = item.iter().position(|n| n.is_punct("=>"))?;
    let mut key_nodes = item[..arrow].iter().filter(|n| !n.is_trivia());
    let key_token = key_nodes.next()?.as_token()?;
    if key_nodes.next().is_some() || key_token.string_literal() != Some(key) {
        return None;
    }
    let start = next_significant(item, arrow + 1)?;
    let end = item.iter().rposition(|n| !n.is_trivia())? + 1;
    Some(start..end)
}

fn node_line(node: &Node) -> usize {
    match node {
        Node::Token(token) => token.line,
        Node::Group(group) => group.open.line,
    }
}

/// Makes `ConfigFactory::readPaths()` load config files by pathname.
///
/// Inside the `readPaths` method body, `$file->getRealPath()` becomes
/// `$file->getPathname()`. Real paths do not resolve for files inside a phar.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigFactoryPathname;

impl ConfigFactoryPathname {
    pub const METHOD: &'static str = "readPaths";
    const FROM: &'static str = "getRealPath";
    const TO: &'static str = "getPathname";
}

impl SourceRewrite for ConfigFactoryPathname {
    fn name(&self) -> &'static str {
        "config-factory-pathname"
    }

    fn apply(&self, file: &mut SourceFile) -> bool {
        let Some(path) = find_function_body(&file.nodes, Self::METHOD) else {
            return false;
        };
        match group_at_mut(&mut file.nodes, &path) {
            Some(body) => rename_method_calls(&mut body.children, Self::FROM, Self::TO),
            None => false,
        }
    }
}

/// Index path to the body group of the first function named `name`
fn find_function_body(nodes: &[Node], name: &str) -> Option<Vec<usize>> {
    for (i, node) in nodes.iter().enumerate() {
        if node.is_ident("function") {
            if let Some(body) = function_body_at(nodes, i, name) {
                return Some(vec![body]);
            }
        }
        if let Some(group) = node.as_group() {
            if let Some(mut path) = find_function_body(&group.children, name) {
                path.insert(0, i);
                return Some(path);
            }
        }
    }
    None
}

fn function_body_at(nodes: &[Node], function: usize, name: &str) -> Option<usize> {
    let mut name_at = next_significant(nodes, function + 1)?;
    if nodes[name_at].is_punct("&") {
        name_at = next_significant(nodes, name_at + 1)?;
    }
    if !nodes[name_at].is_ident(name) {
        return None;
    }
    let params = next_significant(nodes, name_at + 1)?;
    if !nodes[params].is_group(Delimiter::Paren) {
        return None;
    }
    // Abstract and interface methods end in `;` without a body.
    (params + 1..nodes.len())
        .take_while(|&i| !nodes[i].is_punct(";"))
        .find(|&i| nodes[i].is_group(Delimiter::Brace))
}

fn group_at_mut<'a>(nodes: &'a mut [Node], path: &[usize]) -> Option<&'a mut Group> {
    let (first, rest) = path.split_first()?;
    let group = nodes.get_mut(*first)?.as_group_mut()?;
    if rest.is_empty() {
        Some(group)
    } else {
        group_at_mut(&mut group.children, rest)
    }
}

/// Rename `$var->from()` to `$var->to()` at any depth below `nodes`
fn rename_method_calls(nodes: &mut [Node], from: &str, to: &str) -> bool {
    let mut targets = Vec::new();
    for i in 0..nodes.len() {
        if nodes[i].as_token().map(|t| t.kind) != Some(TokenKind::Variable) {
            continue;
        }
        let Some(arrow) = next_significant(nodes, i + 1) else {
            continue;
        };
        if !(nodes[arrow].is_punct("->") || nodes[arrow].is_punct("?->")) {
            continue;
        }
        let Some(method) = next_significant(nodes, arrow + 1) else {
            continue;
        };
        if !nodes[method].is_ident(from) {
            continue;
        }
        let Some(args) = next_significant(nodes, method + 1) else {
            continue;
        };
        if nodes[args]
            .as_group()
            .is_some_and(|g| g.delimiter == Delimiter::Paren && g.is_blank())
        {
            targets.push(method);
        }
    }

    let mut changed = !targets.is_empty();
    for i in targets {
        if let Some(token) = nodes[i].as_token_mut() {
            token.text = to.to_string();
        }
    }
    for node in nodes.iter_mut() {
        if let Some(group) = node.as_group_mut() {
            changed |= rename_method_calls(&mut group.children, from, to);
        }
    }
    changed
}
