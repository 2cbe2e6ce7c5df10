//! Property-based tests for the INI reader and writer.
//!
//! Generated documents must survive `write` followed by `parse` unchanged,
//! and merging must behave like key-wise replacement.

use matomo_config::{ConfigDocument, Entry, Value, merge, parse, write};
use proptest::prelude::*;

// =============================================================================
// STRATEGIES
// =============================================================================

/// Section and key names.
fn name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z_][a-zA-Z0-9_.\\-]{0,15}").expect("valid regex")
}

/// Keys, optionally with a `[subkey]` suffix as in `currencies[BTC]`.
fn key_strategy() -> impl Strategy<Value = String> {
    (name_strategy(), prop::option::of(name_strategy())).prop_map(|(name, subkey)| match subkey {
        Some(subkey) => format!("{name}[{subkey}]"),
        None => name,
    })
}

/// Free text without line breaks or double quotes. Covers values that only
/// survive when quoted: leading digits, padding, `;`, `'` at the edges.
fn text_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::string::string_regex("[a-zA-Z0-9 ;.,:_=/\\\\'\\[\\]-]{0,30}").expect("valid regex"),
        Just(String::new()),
        Just("true".to_string()),
        Just("0".to_string()),
        Just("007".to_string()),
        Just("1.5e3".to_string()),
        Just("PDO\\MYSQL".to_string()),
        Just(" padded ".to_string()),
    ]
}

fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        (-1.0e9f64..1.0e9).prop_map(Value::Float),
        text_strategy().prop_map(Value::Str),
    ]
}

fn entry_strategy() -> impl Strategy<Value = Entry> {
    prop_oneof![
        3 => value_strategy().prop_map(Entry::Scalar),
        1 => prop::collection::vec(value_strategy(), 1..5).prop_map(Entry::List),
    ]
}

fn document_strategy() -> impl Strategy<Value = ConfigDocument> {
    prop::collection::vec(
        (name_strategy(), prop::collection::vec((key_strategy(), entry_strategy()), 0..6)),
        0..5,
    )
    .prop_map(|sections| {
        let mut doc = ConfigDocument::new();
        for (name, entries) in sections {
            let section = doc.section_or_insert(&name);
            for (key, entry) in entries {
                section.insert(key, entry);
            }
        }
        doc
    })
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// parse(write(doc)) == doc
    #[test]
    fn document_roundtrip(doc in document_strategy()) {
        let text = write(&doc).expect("generated documents are representable");
        let parsed = parse(&text).expect("written text should parse");
        prop_assert_eq!(&doc, &parsed, "Roundtrip failed for:\n{}", text);
    }

    /// Writing is deterministic once a document has been through the parser.
    #[test]
    fn write_is_stable(doc in document_strategy()) {
        let first = write(&doc).unwrap();
        let second = write(&parse(&first).unwrap()).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Every overlay entry wins; every base-only entry is kept.
    #[test]
    fn merge_prefers_overlay(base in document_strategy(), overlay in document_strategy()) {
        let merged = merge(&base, &overlay);

        for (name, section) in overlay.sections() {
            for (key, entry) in section.iter() {
                prop_assert_eq!(merged.get(name, key), Some(entry));
            }
        }
        for (name, section) in base.sections() {
            for (key, entry) in section.iter() {
                if overlay.get(name, key).is_none() {
                    prop_assert_eq!(merged.get(name, key), Some(entry));
                }
            }
        }
    }

    /// The parser rejects or accepts, but never panics.
    #[test]
    fn parse_never_panics(text in "[\\[\\]a-z0-9 =;'\"\n]{0,200}") {
        let _ = parse(&text);
    }
}
