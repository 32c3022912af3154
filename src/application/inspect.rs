//! Inspect Use Case
//!
//! Reads a published archive back, verifies it and summarizes its contents.

use std::path::{Path, PathBuf};

use crate::domain::value_objects::SignatureAlgorithm;
use crate::error::PharpackResult;
use crate::infrastructure::phar::PharReader;

/// One archived file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectEntry {
    pub name: String,
    pub size: usize,
    pub crc32: u32,
}

/// Summary of a verified archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectResult {
    pub archive: PathBuf,
    pub size: u64,
    pub signature: SignatureAlgorithm,
    /// Entry point the default stub includes, if the stub is one
    pub entry_point: Option<String>,
    pub entries: Vec<InspectEntry>,
}

impl InspectResult {
    /// Sum of all entry sizes
    pub fn content_size(&self) -> usize {
        self.entries.iter().map(|e| e.size).sum()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct InspectUseCase;

impl InspectUseCase {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(&self, archive: &Path) -> PharpackResult<InspectResult> {
        let size = std::fs::metadata(archive)?.len();
        let phar = PharReader::open(archive)?;

        Ok(InspectResult {
            archive: archive.to_path_buf(),
            size,
            signature: phar.signature,
            entry_point: phar.stub_entry_point(),
            entries: phar
                .entries
                .iter()
                .map(|e| InspectEntry {
                    name: e.name.clone(),
                    size: e.size(),
                    crc32: e.crc32,
                })
                .collect(),
        })
    }
}
