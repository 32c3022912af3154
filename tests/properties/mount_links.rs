//! Property tests for mount link validation.

use proptest::prelude::*;

use pharpack::domain::services::{php_single_quoted, render_preamble};
use pharpack::MountLink;

fn segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9_.-]{1,10}")
        .unwrap()
        .prop_filter("not a parent reference", |s| s != "..")
}

fn relative_link() -> impl Strategy<Value = String> {
    (proptest::collection::vec(segment(), 1..=4), any::<bool>()).prop_map(|(segments, dir)| {
        let mut link = segments.join("/");
        if dir {
            link.push('/');
        }
        link
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Relative paths are accepted verbatim.
    #[test]
    fn property_relative_links_are_accepted(link in relative_link()) {
        let mount = MountLink::new(link.clone()).unwrap();
        prop_assert_eq!(mount.as_str(), link.as_str());
        prop_assert_eq!(mount.is_dir(), link.ends_with('/'));
    }

    /// PROPERTY: Links escaping the archive directory are rejected.
    #[test]
    fn property_escaping_links_are_rejected(
        before in proptest::collection::vec(segment(), 0..=2),
        after in proptest::collection::vec(segment(), 0..=2),
        absolute in any::<bool>(),
    ) {
        let mut parts = before;
        let link = if absolute {
            format!("/{}", parts.join("/"))
        } else {
            parts.push("..".to_string());
            parts.extend(after);
            parts.join("/")
        };
        prop_assert!(MountLink::new(link).is_err());
    }

    /// PROPERTY: The preamble quotes every configured link.
    #[test]
    fn property_preamble_lists_every_link(links in proptest::collection::vec(relative_link(), 1..=4)) {
        let links: Vec<MountLink> = links.into_iter().map(|l| MountLink::new(l).unwrap()).collect();
        let preamble = render_preamble(&links);
        for link in &links {
            let quoted = php_single_quoted(link.as_str());
            prop_assert!(preamble.contains(&quoted));
        }
    }
}
