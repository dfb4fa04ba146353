//! Property-based tests for download naming and archive detection.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::archive::{file_name_from_url, sanitize_file_name, ArchiveKind};
    use proptest::prelude::*;

    proptest! {
        /// Property: sanitize_file_name never produces filesystem-unsafe characters
        #[test]
        fn sanitize_never_produces_unsafe_chars(input in ".*") {
            let result = sanitize_file_name(&input);
            let unsafe_chars = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];
            for ch in unsafe_chars {
                prop_assert!(
                    !result.contains(ch),
                    "sanitize_file_name produced unsafe character '{}' from input '{}'",
                    ch,
                    input
                );
            }
        }

        /// Property: sanitize_file_name preserves character count
        #[test]
        fn sanitize_preserves_char_count(input in ".*") {
            let result = sanitize_file_name(&input);
            prop_assert_eq!(result.chars().count(), input.chars().count());
        }

        /// Property: query strings and fragments never reach the file name
        #[test]
        fn file_name_ignores_query_and_fragment(
            stem in "[A-Za-z0-9_-]{1,16}",
            query in "[a-z]{1,8}=[a-z0-9]{0,8}",
            fragment in "[a-z]{0,8}",
        ) {
            let url = format!("https://example.com/fonts/{}.zip?{}#{}", stem, query, fragment);
            let name = file_name_from_url(&url).unwrap();
            prop_assert_eq!(name, format!("{}.zip", stem));
        }

        /// Property: derived file names are a single path component
        #[test]
        fn file_name_is_single_component(segments in prop::collection::vec("[A-Za-z0-9._%-]{1,12}", 1..5)) {
            let url = format!("https://example.com/{}", segments.join("/"));
            if let Ok(name) = file_name_from_url(&url) {
                prop_assert!(!name.contains('/'));
                prop_assert!(name != "." && name != "..");
            }
        }

        /// Property: every recognized kind is detected from its canonical extension
        #[test]
        fn detect_accepts_canonical_extensions(stem in "[A-Za-z0-9_-]{1,16}", index in 0usize..6) {
            let kind = ArchiveKind::ALL[index];
            let name = format!("{}.{}", stem, kind.extension());
            prop_assert_eq!(ArchiveKind::detect(&name), Some(kind));
        }

        /// Property: font binaries are never mistaken for archives
        #[test]
        fn detect_rejects_font_files(stem in "[A-Za-z0-9_-]{1,16}", ext in "(otf|ttf|woff|woff2)") {
            let name = format!("{}.{}", stem, ext);
            prop_assert_eq!(ArchiveKind::detect(&name), None);
        }
    }
}
