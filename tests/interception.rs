//! Global interception mutates process-wide state, so it is exercised in its
//! own test binary and in a single test function to keep the steps ordered.

use json_replacer::{Options, UniqueSet, Value, create_replacer, handler, is_intercepting, stringify};

fn parse(text: &str) -> serde_json::Value {
    serde_json::from_str(text).unwrap()
}

#[test]
fn global_interception_lifecycle() {
    let my_set = || UniqueSet::new().add("a").add("b").add("c");

    // Interception off: the default entry point keeps its native behavior.
    create_replacer(&Options::default().intercept_global_serializer(false));
    assert!(!is_intercepting());
    let native = stringify(Value::object([("fld", my_set())]), None, None).unwrap();
    assert_eq!(parse(&native)["fld"], serde_json::json!({}));

    // Interception on with a key-based custom handler and no built-ins.
    let ta_da = handler! {
        name: "ta_da",
        test: |key, _value| key == "we_found_love_in_a_hopeless_place",
        transform: |_key, _value| Ok("ta da!".into()),
    };
    create_replacer(
        &Options::default().with_handler(ta_da).use_built_in_handlers(false).intercept_global_serializer(true),
    );
    assert!(is_intercepting());

    let value = Value::object([("we_found_love_in_a_hopeless_place", UniqueSet::new().add(10).add(20).add(30))]);
    let json = stringify(value.clone(), None, None).unwrap();
    assert_eq!(parse(&json)["we_found_love_in_a_hopeless_place"], serde_json::json!("ta da!"));

    // An explicit callback still takes precedence over the installed one.
    let explicit = stringify(value, Some(&|_key: &str, value: Value| Ok(value)), None).unwrap();
    assert_eq!(parse(&explicit)["we_found_love_in_a_hopeless_place"], serde_json::json!({}));

    // Last writer wins.
    create_replacer(&Options::default().intercept_global_serializer(true));
    let json = stringify(Value::object([("fld", my_set())]), None, None).unwrap();
    assert_eq!(parse(&json)["fld"], serde_json::json!(["a", "b", "c"]));
}
