//! Bootstrap preamble for the archived entry point
//!
//! At startup the preamble creates each mount link beside the running
//! archive (when missing) and mounts it into the archive's virtual
//! filesystem, so those paths stay writable.

use crate::domain::value_objects::MountLink;

use super::php::{tokenize, ParseError, Token, TokenKind};

/// PHP code that mounts `links`; inserted right after the entry point's open tag
pub fn render_preamble(links: &[MountLink]) -> String {
    let literals = links
        .iter()
        .map(|link| php_single_quoted(link.as_str()))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"(static function (array $links): void {{
    $base = dirname(\Phar::running(false));
    foreach ($links as $link) {{
        $file = $base . '/' . $link;
        if (! file_exists($file)) {{
            if (rtrim($link, '/') !== $link) {{
                @mkdir($file, 0777, true);
            }} else {{
                file_exists(dirname($file)) || @mkdir(dirname($file), 0777, true);
                file_put_contents($file, '');
            }}
        }}
        \Phar::mount($link, $file);
    }}
}})([{}]);
"#,
        literals
    )
}

/// PHP single-quoted string literal for `value`
pub fn php_single_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        if c == '\'' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
    out
}

/// Insert the preamble into an entry-point script.
///
/// The preamble goes after the first `<?php` tag, past any leading
/// `declare(...);` statements and a non-braced `namespace ...;`, which PHP
/// requires to come first. Files using braced `namespace App { }` blocks get
/// the preamble in a global `namespace { }` block of its own. A shebang line
/// in front of the tag is dropped; the archive stub carries its own.
pub fn wrap_entry_point(source: &str, links: &[MountLink]) -> Result<String, ParseError> {
    let tokens = tokenize(source)?;
    let Some(open) = tokens.iter().position(|t| t.kind == TokenKind::OpenTag) else {
        return Err(ParseError {
            line: 1,
            message: "no <?php open tag found".to_string(),
        });
    };

    let (insert_after, braced) = insertion_point(&tokens, open);

    let mut out = String::with_capacity(source.len() + 1024);
    for (i, token) in tokens.iter().enumerate() {
        if i == 0 && token.kind == TokenKind::InlineHtml && token.text.starts_with("#!") {
            if let Some((_, rest)) = token.text.split_once('\n') {
                out.push_str(rest);
            }
        } else {
            out.push_str(&token.text);
        }
        if i == insert_after {
            out.push('\n');
            if braced {
                // Braced namespaces allow no code outside a block; use the global one.
                out.push_str("namespace {\n");
                out.push_str(&render_preamble(links));
                out.push_str("}\n");
            } else {
                out.push_str(&render_preamble(links));
            }
        }
    }
    Ok(out)
}

/// Index of the token the preamble follows, and whether the file uses
/// braced `namespace { }` blocks
fn insertion_point(tokens: &[Token], open: usize) -> (usize, bool) {
    let mut after = open;
    let mut i = open + 1;

    loop {
        let Some(next) = significant(tokens, i) else {
            return (after, false);
        };
        if tokens[next].is_ident("declare") {
            match statement_end(tokens, next) {
                Some(end) if tokens[end].is_punct(";") => {
                    after = end;
                    i = end + 1;
                }
                _ => return (after, false),
            }
        } else if tokens[next].is_ident("namespace") {
            return match statement_end(tokens, next) {
                Some(end) if tokens[end].is_punct(";") => (end, false),
                Some(_) => (after, true),
                None => (after, false),
            };
        } else {
            return (after, false);
        }
    }
}

fn significant(tokens: &[Token], from: usize) -> Option<usize> {
    (from..tokens.len()).find(|&i| !tokens[i].is_trivia())
}

/// First `;` or `{` at parenthesis depth zero after `from`
fn statement_end(tokens: &[Token], from: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(from + 1) {
        if token.is_punct("(") {
            depth += 1;
        } else if token.is_punct(")") {
            depth = depth.checked_sub(1)?;
        } else if depth == 0 && (token.is_punct(";") || token.is_punct("{")) {
            return Some(i);
        }
    }
    None
}
