//! Domain Services
//!
//! Stateless logic over source text:
//! - `php` - Lossless tokenizer and delimiter tree
//! - `rewrite` - Structural rewrites of known files
//! - `bootstrap` - Mount preamble for the entry point

pub mod bootstrap;
pub mod php;
pub mod rewrite;

pub use bootstrap::{php_single_quoted, render_preamble, wrap_entry_point};
pub use rewrite::{
    rewrite_source, ConfigFactoryPathname, EnableScanCacheable, RewriteOutcome, SourceRewrite,
    SCAN_CACHEABLE_KEY,
};
