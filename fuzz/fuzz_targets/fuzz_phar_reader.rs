#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Decoding untrusted archives should never panic
    let _ = pharpack::PharReader::parse(data);
});
