//! Startup stub written at the front of every archive

use crate::domain::services::php_single_quoted;

/// Marker PHP stops parsing at; archive data follows it
pub const HALT_COMPILER: &str = "__HALT_COMPILER();";

/// Exact bytes that terminate a stub on disk
pub const STUB_TERMINATOR: &str = "__HALT_COMPILER(); ?>\r\n";

const INCLUDE_PREFIX: &str = "include 'phar://' . __FILE__ . '/";

/// Stub that runs `entry_point` from inside the archive
///
/// The archive is executable directly through the interpreter directive. When
/// the phar extension is unavailable the stub exits with a message instead of
/// dumping the archive bytes.
pub fn default_stub(entry_point: &str) -> String {
    // Reuse the literal escaping but splice the entry into the path string.
    let quoted = php_single_quoted(entry_point.trim_start_matches('/'));
    let escaped = &quoted[1..quoted.len() - 1];

    format!(
        r#"#!/usr/bin/env php
<?php
if (in_array('phar', stream_get_wrappers(), true) && class_exists('Phar', false)) {{
    Phar::interceptFileFuncs();
    set_include_path('phar://' . __FILE__ . PATH_SEPARATOR . get_include_path());
    {prefix}{escaped}';
    return;
}}
fwrite(STDERR, "The phar extension is required to run this archive.\n");
exit(1);
{halt} ?>
"#,
        prefix = INCLUDE_PREFIX,
        escaped = escaped,
        halt = HALT_COMPILER,
    )
}

/// Normalize a stub so it ends with exactly [`STUB_TERMINATOR`]
pub fn terminate_stub(stub: &str) -> String {
    match stub.rfind(HALT_COMPILER) {
        Some(at) => format!("{}{}", &stub[..at], STUB_TERMINATOR),
        None => {
            let mut out = stub.trim_end().to_string();
            out.push('\n');
            out.push_str(STUB_TERMINATOR);
            out
        }
    }
}

/// Entry point included by a stub produced by [`default_stub`]
pub fn stub_entry_point(stub: &str) -> Option<String> {
    let start = stub.find(INCLUDE_PREFIX)? + INCLUDE_PREFIX.len();
    let mut entry = String::new();
    let mut chars = stub[start..].chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next()? {
                e @ ('\'' | '\\') => entry.push(e),
                other => {
                    entry.push('\\');
                    entry.push(other);
                }
            },
            '\'' => return Some(entry),
            _ => entry.push(c),
        }
    }
    None
}
