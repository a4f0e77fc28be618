use cfgbind_key::{
    AccessType, ConfigKey, ConfigKeyParts, IndexAccessEvent, IndexAccessScanner, TypeRef,
};
use proptest::prelude::*;

fn indexed_key(name: &str) -> ConfigKey {
    ConfigKey::builder(name)
        .declared_type(TypeRef::parse("java.util.List<java.lang.String>").unwrap())
        .build()
}

fn map_key(name: &str) -> ConfigKey {
    ConfigKey::builder(name)
        .declared_type(TypeRef::parse("java.util.Map<java.lang.String,java.lang.Integer>").unwrap())
        .build()
}

#[test]
fn test_scenario_list_key() {
    let key = indexed_key("app.servers");
    assert_eq!(key.access_type(), AccessType::Indexed);

    let parts = ConfigKeyParts::split(&key, "app.servers[2]", false).unwrap();
    assert_eq!(parts.key_index(), Some("2"));

    let events: Vec<_> = IndexAccessScanner::new("app.servers[", &key).events().collect();
    assert!(events.contains(&IndexAccessEvent::MissingClosingBracket(11)));
}

#[test]
fn test_map_key_case_sensitive_split() {
    let key = map_key("app.labels");
    let parts = ConfigKeyParts::split(&key, "app.labels.env", true).unwrap();
    assert_eq!(parts.key_index(), Some("env"));
    assert!(ConfigKeyParts::split(&key, "app.LABELS.env", true).is_none());
    assert!(ConfigKeyParts::split(&key, "app.LABELS.env", false).is_some());
}

proptest! {
    #[test]
    fn prop_indexed_split_round_trips(
        name in "[a-z][a-z0-9]{0,8}(\\.[a-z][a-z0-9-]{0,8}){0,3}",
        index in "[^\\[\\]]{1,12}",
    ) {
        let key = indexed_key(&name);
        let raw = format!("{name}[{index}]");
        let parts = ConfigKeyParts::split(&key, &raw, true).unwrap();
        prop_assert_eq!(parts.config_key_portion(), name.as_str());
        prop_assert_eq!(parts.key_index(), Some(index.as_str()));
    }

    #[test]
    fn prop_map_split_round_trips(
        name in "[a-z][a-z0-9]{0,8}(\\.[a-z][a-z0-9-]{0,8}){0,3}",
        sub in "[a-z0-9_-]{1,8}(\\.[a-z0-9_-]{1,8}){0,2}",
    ) {
        let key = map_key(&name);
        let raw = format!("{name}.{sub}");
        let parts = ConfigKeyParts::split(&key, &raw, true).unwrap();
        prop_assert_eq!(parts.key_index(), Some(sub.as_str()));
    }

    #[test]
    fn prop_scanner_is_restartable(text in "[a-z.\\[\\]0-9]{0,32}") {
        let key = indexed_key("a");
        let scanner = IndexAccessScanner::new(&text, &key);
        let first: Vec<_> = scanner.events().collect();
        let second: Vec<_> = scanner.events().collect();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_scanner_reports_every_bracket_until_unclosed(text in "[a-z\\[\\]0-9]{0,32}") {
        let key = indexed_key("a");
        let events: Vec<_> = IndexAccessScanner::new(&text, &key).events().collect();
        let brackets = events
            .iter()
            .filter(|e| matches!(e, IndexAccessEvent::Bracket(_)))
            .count();
        let unclosed = events
            .iter()
            .any(|e| matches!(e, IndexAccessEvent::MissingClosingBracket(_)));
        prop_assert!(brackets <= text.matches('[').count());
        if !unclosed {
            let groups = events
                .iter()
                .filter(|e| matches!(e, IndexAccessEvent::IndexValue(_) | IndexAccessEvent::MissingIndexValue(_)))
                .count();
            prop_assert_eq!(brackets, groups);
        }
    }
}
