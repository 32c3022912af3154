//! PHP Phar archive format
//!
//! - `writer` - `StagedContainer` implementation and its factory
//! - `reader` - Decoding and verification of built archives
//! - `stub` - Default startup stub

mod reader;
mod stub;
mod writer;

pub use reader::{PharArchive, PharEntry, PharReader};
pub use stub::{default_stub, stub_entry_point, terminate_stub, STUB_TERMINATOR};
pub use writer::{PharFactory, PharWriter, API_VERSION, ENTRY_FLAGS, FLAG_SIGNED, MAGIC};
