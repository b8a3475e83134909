use oxide_dialect::shorten_identifier;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn short_identifiers_are_unchanged(name in "[a-zA-Z_][a-zA-Z0-9_]{0,29}") {
        prop_assert_eq!(shorten_identifier(&name, 30), name.as_str());
    }

    #[test]
    fn long_identifiers_fit_and_are_stable(
        name in "[a-zA-Z_][a-zA-Z0-9_ ]{30,120}",
        max_len in 2usize..64,
    ) {
        let first = shorten_identifier(&name, max_len);
        let second = shorten_identifier(&name, max_len);
        prop_assert!(first.chars().count() <= max_len);
        prop_assert_eq!(&first, &second);
        if name.chars().count() > max_len {
            prop_assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
        }
    }
}
