//! Signature Algorithm Value Object
//!
//! Selects the digest appended to the end of a Phar archive.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Digest used to sign a Phar archive
///
/// Only the SHA-2 family is supported; PHP verifies the signature on every
/// open, so the flag written to disk must match the digest length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SignatureAlgorithm {
    #[default]
    Sha256,
    Sha512,
}

impl SignatureAlgorithm {
    /// Flag stored before the `GBMB` magic
    pub fn flag(self) -> u32 {
        match self {
            Self::Sha256 => 0x0003,
            Self::Sha512 => 0x0004,
        }
    }

    /// Length of the raw digest in bytes
    pub fn digest_len(self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha512 => 64,
        }
    }

    /// Look up an algorithm by its on-disk flag
    pub fn from_flag(flag: u32) -> Option<Self> {
        match flag {
            0x0003 => Some(Self::Sha256),
            0x0004 => Some(Self::Sha512),
            _ => None,
        }
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha256 => write!(f, "sha256"),
            Self::Sha512 => write!(f, "sha512"),
        }
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(Self::Sha256),
            "sha512" | "sha-512" => Ok(Self::Sha512),
            other => Err(format!(
                "unsupported signature algorithm '{}' (expected sha256 or sha512)",
                other
            )),
        }
    }
}
