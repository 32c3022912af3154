//! Phar archive writer
//!
//! Implements the `StagedContainer` port. Entries are recorded by reference
//! until `commit`, which streams stub, manifest, contents and signature into
//! the staging file in one pass.
//!
//! Layout written (all integers little-endian `u32`):
//!
//! ```text
//! stub ... __HALT_COMPILER(); ?>\r\n
//! manifest length | entry count | api (2 bytes) | global flags
//! alias length (0) | metadata length (0)
//! per entry: name length | name | size | mtime | stored size | crc32 | flags | metadata length (0)
//! contents of every entry, in manifest order
//! digest | signature flag | "GBMB"
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256, Sha512};

use super::stub::{default_stub, terminate_stub};
use crate::domain::ports::{ContainerFactory, StagedContainer};
use crate::domain::value_objects::SignatureAlgorithm;
use crate::error::{PharpackError, PharpackResult};

/// Manifest API version 1.1.1
pub const API_VERSION: [u8; 2] = [0x11, 0x10];
/// Global flag: the archive carries a signature
pub const FLAG_SIGNED: u32 = 0x0001_0000;
/// Per-entry flags: permission bits only, no compression
pub const ENTRY_FLAGS: u32 = 0o644;
/// Trailing magic after the signature
pub const MAGIC: &[u8; 4] = b"GBMB";

#[derive(Debug, Clone)]
enum EntrySource {
    Disk(PathBuf),
    Memory(Vec<u8>),
}

#[derive(Debug, Clone)]
struct StagedEntry {
    name: String,
    source: EntrySource,
}

/// Buffered Phar writer over a staging file
pub struct PharWriter {
    file: File,
    signature: SignatureAlgorithm,
    stub: Option<String>,
    entries: Vec<StagedEntry>,
    index: HashMap<String, usize>,
    mtime: u32,
}

impl PharWriter {
    pub fn new(file: File, signature: SignatureAlgorithm) -> Self {
        let mtime = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs().min(u64::from(u32::MAX)) as u32)
            .unwrap_or(0);

        Self {
            file,
            signature,
            stub: None,
            entries: Vec::new(),
            index: HashMap::new(),
            mtime,
        }
    }

    /// Modification time recorded for every entry
    pub fn with_mtime(mut self, mtime: u32) -> Self {
        self.mtime = mtime;
        self
    }

    fn stage(&mut self, local: &str, source: EntrySource) {
        let name = local.trim_start_matches('/').to_string();
        match self.index.get(&name) {
            Some(&at) => self.entries[at].source = source,
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push(StagedEntry { name, source });
            }
        }
    }
}

impl StagedContainer for PharWriter {
    fn add_file(&mut self, local: &str, source: &Path) -> PharpackResult<()> {
        if !source.is_file() {
            return Err(PharpackError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} is not a file", source.display()),
            )));
        }
        self.stage(local, EntrySource::Disk(source.to_path_buf()));
        Ok(())
    }

    fn add_from_string(&mut self, local: &str, contents: Vec<u8>) -> PharpackResult<()> {
        self.stage(local, EntrySource::Memory(contents));
        Ok(())
    }

    fn set_stub(&mut self, stub: String) {
        self.stub = Some(stub);
    }

    fn default_stub(&self, entry_point: &str) -> String {
        default_stub(entry_point)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn commit(self) -> PharpackResult<u64> {
        let Self {
            file,
            signature,
            stub,
            entries,
            mtime,
            ..
        } = self;

        // First pass: sizes and checksums, streamed so large files are never held.
        let mut records = Vec::with_capacity(entries.len());
        for entry in &entries {
            let (size, crc) = match &entry.source {
                EntrySource::Memory(bytes) => (bytes.len() as u64, crc32fast::hash(bytes)),
                EntrySource::Disk(path) => checksum_file(path)?,
            };
            let size = u32::try_from(size).map_err(|_| {
                PharpackError::invalid_input(entry_path(entry), "file exceeds the 4 GiB phar entry limit")
            })?;
            records.push((size, crc));
        }

        let stub = terminate_stub(stub.as_deref().unwrap_or("<?php"));
        let manifest = encode_manifest(&entries, &records, mtime)?;

        let mut out = SigningWriter::new(BufWriter::new(file), signature);
        out.write_all(stub.as_bytes())?;
        out.write_all(&manifest)?;

        for (entry, (size, _)) in entries.iter().zip(&records) {
            match &entry.source {
                EntrySource::Memory(bytes) => out.write_all(bytes)?,
                EntrySource::Disk(path) => {
                    let expected = u64::from(*size);
                    let source = File::open(path)?;
                    let copied = io::copy(&mut source.take(expected + 1), &mut out)?;
                    if copied != expected {
                        return Err(PharpackError::Io(io::Error::new(
                            io::ErrorKind::InvalidData,
                            format!("{} changed while it was being archived", path.display()),
                        )));
                    }
                }
            }
        }

        let (mut inner, digest, written) = out.finish();
        inner.write_all(&digest)?;
        inner.write_all(&signature.flag().to_le_bytes())?;
        inner.write_all(MAGIC)?;
        let file = inner.into_inner().map_err(|e| PharpackError::Io(e.into_error()))?;
        file.sync_all()?;

        Ok(written + digest.len() as u64 + 8)
    }
}

fn entry_path(entry: &StagedEntry) -> PathBuf {
    match &entry.source {
        EntrySource::Disk(path) => path.clone(),
        EntrySource::Memory(_) => PathBuf::from(&entry.name),
    }
}

fn checksum_file(path: &Path) -> PharpackResult<(u64, u32)> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = crc32fast::Hasher::new();
    let mut buf = [0u8; 64 * 1024];
    let mut size = 0u64;
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        size += n as u64;
    }
    Ok((size, hasher.finalize()))
}

fn encode_manifest(entries: &[StagedEntry], records: &[(u32, u32)], mtime: u32) -> PharpackResult<Vec<u8>> {
    let mut body = Vec::new();
    push_u32(&mut body, entries.len() as u32);
    body.extend_from_slice(&API_VERSION);
    push_u32(&mut body, FLAG_SIGNED);
    push_u32(&mut body, 0); // alias
    push_u32(&mut body, 0); // metadata

    for (entry, (size, crc)) in entries.iter().zip(records) {
        push_u32(&mut body, entry.name.len() as u32);
        body.extend_from_slice(entry.name.as_bytes());
        push_u32(&mut body, *size);
        push_u32(&mut body, mtime);
        push_u32(&mut body, *size);
        push_u32(&mut body, *crc);
        push_u32(&mut body, ENTRY_FLAGS);
        push_u32(&mut body, 0);
    }

    let len = u32::try_from(body.len())
        .map_err(|_| PharpackError::invalid_input("manifest", "too many entries for a phar manifest"))?;
    let mut manifest = Vec::with_capacity(body.len() + 4);
    push_u32(&mut manifest, len);
    manifest.extend_from_slice(&body);
    Ok(manifest)
}

fn push_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

/// Incremental digest for the supported signature algorithms
pub(crate) enum Signer {
    Sha256(Sha256),
    Sha512(Sha512),
}

impl Signer {
    pub(crate) fn new(algorithm: SignatureAlgorithm) -> Self {
        match algorithm {
            SignatureAlgorithm::Sha256 => Self::Sha256(Sha256::new()),
            SignatureAlgorithm::Sha512 => Self::Sha512(Sha512::new()),
        }
    }

    pub(crate) fn update(&mut self, bytes: &[u8]) {
        match self {
            Self::Sha256(h) => h.update(bytes),
            Self::Sha512(h) => h.update(bytes),
        }
    }

    pub(crate) fn finalize(self) -> Vec<u8> {
        match self {
            Self::Sha256(h) => h.finalize().to_vec(),
            Self::Sha512(h) => h.finalize().to_vec(),
        }
    }
}

/// Writer that feeds everything it writes into the archive signature
struct SigningWriter<W> {
    inner: W,
    signer: Signer,
    written: u64,
}

impl<W: Write> SigningWriter<W> {
    fn new(inner: W, algorithm: SignatureAlgorithm) -> Self {
        Self {
            inner,
            signer: Signer::new(algorithm),
            written: 0,
        }
    }

    fn finish(self) -> (W, Vec<u8>, u64) {
        (self.inner, self.signer.finalize(), self.written)
    }
}

impl<W: Write> Write for SigningWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.signer.update(&buf[..n]);
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Opens [`PharWriter`]s with the configured signature
#[derive(Debug, Clone, Copy, Default)]
pub struct PharFactory {
    signature: SignatureAlgorithm,
    readonly: bool,
}

impl PharFactory {
    pub fn new(signature: SignatureAlgorithm, readonly: bool) -> Self {
        Self { signature, readonly }
    }
}

impl ContainerFactory for PharFactory {
    type Container = PharWriter;

    fn is_writable(&self) -> bool {
        !self.readonly
    }

    fn open(&self, staging: File) -> PharWriter {
        PharWriter::new(staging, self.signature)
    }
}
