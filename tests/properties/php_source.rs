//! Property tests for the PHP tokenizer and delimiter tree.

use proptest::prelude::*;

use pharpack::domain::services::php::{tokenize, SourceFile};

fn php_fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("<?php ".to_string()),
        Just("?>".to_string()),
        Just("'str'".to_string()),
        Just("\"a{$b['c']}\"".to_string()),
        Just("// line\n".to_string()),
        Just("/* block */".to_string()),
        Just("<<<EOT\nbody\nEOT;\n".to_string()),
        Just("$x->getRealPath()".to_string()),
        Just("[".to_string()),
        Just("]".to_string()),
        Just("(".to_string()),
        Just(")".to_string()),
        Just("{".to_string()),
        Just("}".to_string()),
        Just("=>".to_string()),
        Just(",".to_string()),
        proptest::string::string_regex("[A-Za-z0-9_ \n\t;$\\\\é]{0,12}").unwrap(),
    ]
}

fn php_source() -> impl Strategy<Value = String> {
    proptest::collection::vec(php_fragment(), 0..=24).prop_map(|parts| parts.concat())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: The tokenizer never panics, and its tokens reproduce the input.
    #[test]
    fn property_tokens_reproduce_source(source in php_source()) {
        if let Ok(tokens) = tokenize(&source) {
            let rendered: String = tokens.iter().map(|t| t.text.as_str()).collect();
            prop_assert_eq!(rendered, source);
        }
    }

    /// PROPERTY: Arbitrary text never panics the tokenizer.
    #[test]
    fn property_tokenizer_never_panics(source in any::<String>()) {
        let _ = tokenize(&source);
        let _ = tokenize(&format!("<?php {}", source));
    }

    /// PROPERTY: A parsed file renders back to its exact source.
    #[test]
    fn property_parse_render_round_trip(source in php_source()) {
        if let Ok(file) = SourceFile::parse(&source) {
            prop_assert_eq!(file.render(), source);
        }
    }
}
