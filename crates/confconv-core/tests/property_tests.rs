//! Property tests for filtering, naming and value preservation.

use confconv_core::{derive_target_name, is_eligible, NamingMode, Transcoder, YamlToJson};
use proptest::prelude::*;
use serde_json::{Map, Value};
use std::path::Path;

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        (-1000i32..1000).prop_map(|q| Value::from(f64::from(q) + 0.25)),
        "[a-z][a-z _]{0,12}".prop_map(Value::String),
        "[0-9]{1,4}".prop_map(Value::String),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_scalar().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            proptest::collection::btree_map("[a-z][a-z0-9_]{0,8}", inner, 0..6)
                .prop_map(|map| Value::Object(map.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

proptest! {
    #[test]
    fn prop_transcode_preserves_value_tree(value in arb_value()) {
        let yaml = serde_yaml::to_string(&value).unwrap();

        let json = YamlToJson
            .transcode(Path::new("generated.yaml"), yaml.as_bytes())
            .unwrap();
        let parsed: Value = serde_json::from_slice(&json).unwrap();

        prop_assert_eq!(parsed, value);
    }

    #[test]
    fn prop_output_is_two_space_indented(value in arb_value()) {
        let yaml = serde_yaml::to_string(&value).unwrap();

        let json = YamlToJson
            .transcode(Path::new("generated.yaml"), yaml.as_bytes())
            .unwrap();
        let text = String::from_utf8(json).unwrap();

        for line in text.lines() {
            let indent = line.len() - line.trim_start_matches(' ').len();
            prop_assert_eq!(indent % 2, 0);
        }
        prop_assert!(!text.ends_with('\n'));
    }

    #[test]
    fn prop_eligibility(
        stem in "[a-z.]{0,10}",
        ext in prop_oneof![Just("yaml"), Just("yml"), Just("json"), Just("txt"), Just("")],
        hidden in any::<bool>(),
        is_dir in any::<bool>(),
    ) {
        let name = format!("{}{}.{}", if hidden { "." } else { "" }, stem, ext);

        let expected = !is_dir
            && !name.starts_with('.')
            && (name.ends_with(".yaml") || name.ends_with(".yml"));

        prop_assert_eq!(is_eligible(&name, is_dir, &YamlToJson), expected);
    }

    #[test]
    fn prop_literal_naming_replaces_every_token(
        stem in "[a-z.-]{0,12}",
        long in any::<bool>(),
    ) {
        let name = format!("{}.{}", stem, if long { "yaml" } else { "yml" });

        let target = derive_target_name(&name, &["yaml", "yml"], "json", NamingMode::Literal);

        prop_assert!(!target.contains("yaml"));
        prop_assert!(!target.contains("yml"));
        prop_assert!(target.ends_with(".json"));
        prop_assert_eq!(target, name.replace("yml", "json").replace("yaml", "json"));
    }

    #[test]
    fn prop_suffix_naming_keeps_stem(
        stem in "[a-z.-]{1,12}",
        long in any::<bool>(),
    ) {
        let name = format!("{}.{}", stem, if long { "yaml" } else { "yml" });

        let target = derive_target_name(&name, &["yaml", "yml"], "json", NamingMode::Suffix);

        prop_assert_eq!(target, format!("{stem}.json"));
    }
}
