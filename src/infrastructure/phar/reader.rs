//! Phar archive reader
//!
//! Reads back archives produced by [`PharWriter`](super::PharWriter): stub,
//! manifest and entry contents, with the trailing signature and every entry
//! checksum verified. Compressed entries are not supported.

use std::fs;
use std::path::Path;

use super::stub::{stub_entry_point, HALT_COMPILER};
use super::writer::{Signer, MAGIC};
use crate::domain::value_objects::SignatureAlgorithm;
use crate::error::{PharpackError, PharpackResult};

/// Entry compression flags (zlib, bzip2)
const COMPRESSION_MASK: u32 = 0x0000_3000;

/// One file stored in an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PharEntry {
    pub name: String,
    pub mtime: u32,
    pub crc32: u32,
    pub flags: u32,
    pub contents: Vec<u8>,
}

impl PharEntry {
    pub fn size(&self) -> usize {
        self.contents.len()
    }
}

/// A decoded archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PharArchive {
    pub stub: String,
    pub api_version: [u8; 2],
    pub signature: SignatureAlgorithm,
    pub entries: Vec<PharEntry>,
}

impl PharArchive {
    pub fn entry(&self, name: &str) -> Option<&PharEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// Entry point the stub includes, when it is a default stub
    pub fn stub_entry_point(&self) -> Option<String> {
        stub_entry_point(&self.stub)
    }
}

pub struct PharReader;

impl PharReader {
    /// Read and verify the archive at `path`
    pub fn open(path: &Path) -> PharpackResult<PharArchive> {
        let bytes = fs::read(path)?;
        Self::parse(&bytes).map_err(|message| PharpackError::CorruptArchive {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Decode an archive held in memory
    pub fn parse(bytes: &[u8]) -> Result<PharArchive, String> {
        if bytes.len() < 8 || &bytes[bytes.len() - 4..] != MAGIC {
            return Err("missing GBMB signature magic".to_string());
        }
        let flag_at = bytes.len() - 8;
        let flag = read_u32(bytes, flag_at)?;
        let signature = SignatureAlgorithm::from_flag(flag)
            .ok_or_else(|| format!("unsupported signature flag {:#x}", flag))?;
        let signed_end = flag_at
            .checked_sub(signature.digest_len())
            .ok_or("archive too short for its signature")?;

        let mut signer = Signer::new(signature);
        signer.update(&bytes[..signed_end]);
        if signer.finalize() != bytes[signed_end..flag_at] {
            return Err("signature mismatch".to_string());
        }

        let signed = &bytes[..signed_end];
        let manifest_at = stub_len(signed)?;
        let stub = String::from_utf8_lossy(&signed[..manifest_at]).into_owned();

        let mut cursor = Cursor::new(signed, manifest_at);
        let manifest_len = cursor.u32()? as usize;
        let manifest_end = cursor
            .pos
            .checked_add(manifest_len)
            .filter(|end| *end <= signed.len())
            .ok_or("manifest length exceeds archive")?;

        let count = cursor.u32()?;
        let api = cursor.take(2)?;
        let api_version = [api[0], api[1]];
        let _global_flags = cursor.u32()?;
        let alias_len = cursor.u32()? as usize;
        cursor.take(alias_len)?;
        let meta_len = cursor.u32()? as usize;
        cursor.take(meta_len)?;

        let mut headers = Vec::new();
        for _ in 0..count {
            let name_len = cursor.u32()? as usize;
            let name = String::from_utf8(cursor.take(name_len)?.to_vec())
                .map_err(|_| "entry name is not UTF-8".to_string())?;
            let size = cursor.u32()?;
            let mtime = cursor.u32()?;
            let stored = cursor.u32()?;
            let crc32 = cursor.u32()?;
            let flags = cursor.u32()?;
            let meta_len = cursor.u32()? as usize;
            cursor.take(meta_len)?;

            if flags & COMPRESSION_MASK != 0 || stored != size {
                return Err(format!("entry {} is compressed", name));
            }
            headers.push((name, size, mtime, crc32, flags));
        }
        if cursor.pos != manifest_end {
            return Err("manifest length does not match its entries".to_string());
        }

        let mut entries = Vec::with_capacity(headers.len());
        for (name, size, mtime, crc32, flags) in headers {
            let contents = cursor.take(size as usize)?.to_vec();
            if crc32fast::hash(&contents) != crc32 {
                return Err(format!("checksum mismatch for entry {}", name));
            }
            entries.push(PharEntry {
                name,
                mtime,
                crc32,
                flags,
                contents,
            });
        }
        if cursor.pos != signed.len() {
            return Err("trailing data after entry contents".to_string());
        }

        Ok(PharArchive {
            stub,
            api_version,
            signature,
            entries,
        })
    }
}

/// Length of the stub including `__HALT_COMPILER(); ?>` and its line break
fn stub_len(bytes: &[u8]) -> Result<usize, String> {
    let halt = find(bytes, HALT_COMPILER.as_bytes()).ok_or("missing __HALT_COMPILER() marker")?;
    let mut at = halt + HALT_COMPILER.len();
    while bytes.get(at) == Some(&b' ') {
        at += 1;
    }
    if bytes.get(at..at + 2) == Some(b"?>") {
        at += 2;
        if bytes.get(at..at + 2) == Some(b"\r\n") {
            at += 2;
        } else if bytes.get(at) == Some(&b'\n') {
            at += 1;
        }
    }
    Ok(at)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn read_u32(bytes: &[u8], at: usize) -> Result<u32, String> {
    bytes
        .get(at..at + 4)
        .and_then(|b| b.try_into().ok())
        .map(u32::from_le_bytes)
        .ok_or_else(|| "unexpected end of archive".to_string())
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8], pos: usize) -> Self {
        Self { bytes, pos }
    }

    fn u32(&mut self) -> Result<u32, String> {
        let value = read_u32(self.bytes, self.pos)?;
        self.pos += 4;
        Ok(value)
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], String> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or("unexpected end of archive")?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }
}
