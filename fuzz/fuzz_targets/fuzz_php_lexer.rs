#![no_main]

use libfuzzer_sys::fuzz_target;
use pharpack::domain::services::php::{tokenize, SourceFile};
use pharpack::domain::services::{rewrite_source, ConfigFactoryPathname, EnableScanCacheable};

fuzz_target!(|data: &[u8]| {
    if let Ok(source) = std::str::from_utf8(data) {
        // Tokens must reproduce the input exactly
        if let Ok(tokens) = tokenize(source) {
            let rendered: String = tokens.iter().map(|t| t.text.as_str()).collect();
            assert_eq!(rendered, source);
        }
        if let Ok(file) = SourceFile::parse(source) {
            assert_eq!(file.render(), source);
        }
        let _ = rewrite_source(source, &EnableScanCacheable);
        let _ = rewrite_source(source, &ConfigFactoryPathname);
    }
});
