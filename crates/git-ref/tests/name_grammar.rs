//! Property tests for the reference name grammar.

use git_ref::{RefName, RefNameFlags};
use proptest::prelude::*;

fn component() -> impl Strategy<Value = String> {
    "[a-z0-9][a-z0-9_-]{0,8}"
}

fn full_name() -> impl Strategy<Value = String> {
    prop::collection::vec(component(), 1..4).prop_map(|parts| format!("refs/{}", parts.join("/")))
}

proptest! {
    #[test]
    fn generated_names_are_valid(name in full_name()) {
        let parsed = RefName::new(name.as_str()).unwrap();
        prop_assert_eq!(parsed.as_str(), name.as_str());
        prop_assert!(RefName::is_valid(&name));
    }

    #[test]
    fn normalize_collapses_then_is_idempotent(name in full_name(), extra in 1usize..4) {
        let doubled = name.replace('/', &"/".repeat(extra + 1));
        let once = RefName::normalize(&doubled, RefNameFlags::empty()).unwrap();
        prop_assert_eq!(once.as_str(), name.as_str());
        let twice = RefName::normalize(once.as_str(), RefNameFlags::empty()).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn forbidden_characters_are_rejected(
        name in full_name(),
        bad in prop::sample::select(vec![' ', '~', '^', ':', '?', '*', '[', '\\', '\x7f']),
    ) {
        let poisoned = format!("{name}{bad}x");
        prop_assert!(RefName::new(poisoned.as_str()).is_err());
    }

    #[test]
    fn dot_rules(name in full_name()) {
        let double_dot = format!("{name}..x");
        let lock = format!("{name}.lock");
        let hidden = format!("{name}/.hidden");
        prop_assert!(!RefName::is_valid(&double_dot));
        prop_assert!(!RefName::is_valid(&lock));
        prop_assert!(!RefName::is_valid(&hidden));
    }
}
