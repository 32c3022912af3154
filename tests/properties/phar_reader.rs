//! Property tests for archive decoding.

use std::fs::File;

use proptest::prelude::*;
use sha2::{Digest, Sha256};

use pharpack::domain::ports::StagedContainer;
use pharpack::{PharReader, SignatureAlgorithm};
use pharpack::infrastructure::phar::PharWriter;

fn entry_name() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z]{1,6}(/[a-z]{1,6}){0,2}\\.php").unwrap()
}

fn write_archive(entries: &[(String, Vec<u8>)]) -> Vec<u8> {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("prop.phar");
    let mut writer = PharWriter::new(File::create(&target).unwrap(), SignatureAlgorithm::Sha256)
        .with_mtime(1_700_000_000);
    for (name, contents) in entries {
        writer.add_from_string(name, contents.clone()).unwrap();
    }
    writer.set_stub(writer.default_stub("index.php"));
    writer.commit().unwrap();
    std::fs::read(&target).unwrap()
}

/// Wrap `body` in a valid SHA-256 trailer so decoding gets past the signature
fn signed(body: &[u8]) -> Vec<u8> {
    let mut bytes = body.to_vec();
    bytes.extend_from_slice(&Sha256::digest(body));
    bytes.extend_from_slice(&SignatureAlgorithm::Sha256.flag().to_le_bytes());
    bytes.extend_from_slice(b"GBMB");
    bytes
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Arbitrary bytes never panic the reader.
    #[test]
    fn property_reader_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
        let _ = PharReader::parse(&bytes);
    }

    /// PROPERTY: Correctly signed garbage is rejected without panicking.
    #[test]
    fn property_signed_garbage_never_panics(
        head in proptest::collection::vec(any::<u8>(), 0..64),
        tail in proptest::collection::vec(any::<u8>(), 0..256),
    ) {
        let mut body = head;
        body.extend_from_slice(b"__HALT_COMPILER(); ?>\r\n");
        body.extend_from_slice(&tail);
        let _ = PharReader::parse(&signed(&body));
    }

    /// PROPERTY: Written archives decode to the staged entries.
    #[test]
    fn property_written_archives_decode(
        entries in proptest::collection::btree_map(
            entry_name(),
            proptest::collection::vec(any::<u8>(), 0..128),
            0..6,
        ),
    ) {
        let entries: Vec<(String, Vec<u8>)> = entries.into_iter().collect();
        let archive = PharReader::parse(&write_archive(&entries)).unwrap();

        prop_assert_eq!(archive.entries.len(), entries.len());
        for ((name, contents), entry) in entries.iter().zip(&archive.entries) {
            prop_assert_eq!(&entry.name, name);
            prop_assert_eq!(&entry.contents, contents);
            prop_assert_eq!(entry.mtime, 1_700_000_000);
        }
    }

    /// PROPERTY: Any single corrupted byte is detected.
    #[test]
    fn property_corruption_is_detected(
        contents in proptest::collection::vec(any::<u8>(), 1..64),
        position in any::<prop::sample::Index>(),
        flip in 1u8..=255,
    ) {
        let mut bytes = write_archive(&[("index.php".to_string(), contents)]);
        let at = position.index(bytes.len());
        bytes[at] ^= flip;
        prop_assert!(PharReader::parse(&bytes).is_err());
    }

    /// PROPERTY: Any truncation is detected.
    #[test]
    fn property_truncation_is_detected(
        contents in proptest::collection::vec(any::<u8>(), 0..64),
        position in any::<prop::sample::Index>(),
    ) {
        let bytes = write_archive(&[("index.php".to_string(), contents)]);
        let len = position.index(bytes.len());
        prop_assert!(PharReader::parse(&bytes[..len]).is_err());
    }
}
