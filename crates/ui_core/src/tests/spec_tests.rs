use serde_json::json;
use shared::error::ConfigError;

use super::*;
use crate::action::Action;

#[test]
fn unknown_key_is_a_fatal_configuration_error() {
    let err = from_value(json!({ "type": "box", "bogus": 1 })).unwrap_err();
    match err {
        ConfigError::Invalid { detail } => assert!(detail.contains("unknown field")),
        other => panic!("expected Invalid, got {other:?}"),
    }
}

#[test]
fn wrong_value_kind_is_rejected_not_coerced() {
    let err = from_value(json!({ "type": "label", "text": 42 })).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { .. }));

    let err = from_value(json!({ "type": "slider", "min": "zero" })).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { .. }));
}

#[test]
fn missing_type_is_reported_as_such() {
    let err = from_value(json!({ "text": "hello" })).unwrap_err();
    assert!(matches!(err, ConfigError::MissingKind));
}

#[test]
fn unknown_widget_kind_is_reported_with_its_name() {
    let err = from_value(json!({ "type": "blob" })).unwrap_err();
    match err {
        ConfigError::UnknownKind { kind } => assert_eq!(kind, "blob"),
        other => panic!("expected UnknownKind, got {other:?}"),
    }
}

#[test]
fn non_object_specs_are_rejected() {
    assert!(matches!(
        from_value(json!([1, 2, 3])),
        Err(ConfigError::Invalid { .. })
    ));
    assert!(matches!(
        from_value(json!("label")),
        Err(ConfigError::Invalid { .. })
    ));
}

#[test]
fn unknown_key_deep_in_the_tree_is_still_fatal() {
    let err = from_value(json!({
        "type": "box",
        "children": [
            { "type": "label", "text": "ok" },
            { "type": "button", "clicked": "typo" },
        ],
    }))
    .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { .. }));
}

#[test]
fn actions_deserialize_from_strings_only() {
    let spec = from_value(json!({ "type": "button", "on_click": "notify-send {}" })).unwrap();
    let WidgetSpec::Button(button) = spec else {
        panic!("expected button");
    };
    assert!(matches!(button.on_click, Action::Template(ref t) if t == "notify-send {}"));

    let spec = from_value(json!({ "type": "button" })).unwrap();
    let WidgetSpec::Button(button) = spec else {
        panic!("expected button");
    };
    assert!(button.on_click.is_none());

    let spec = from_value(json!({ "type": "button", "on_click": "" })).unwrap();
    let WidgetSpec::Button(button) = spec else {
        panic!("expected button");
    };
    assert!(button.on_click.is_none());
}

#[test]
fn kind_specific_defaults_apply() {
    let WidgetSpec::Slider(slider) = from_value(json!({ "type": "slider" })).unwrap() else {
        panic!("expected slider");
    };
    assert_eq!(slider.min, 0.0);
    assert_eq!(slider.max, 1.0);
    assert!(slider.on_change.is_none());

    let WidgetSpec::Overlay(overlay) = from_value(json!({ "type": "overlay" })).unwrap() else {
        panic!("expected overlay");
    };
    assert!(overlay.passthrough);

    let WidgetSpec::Revealer(revealer) = from_value(json!({ "type": "revealer" })).unwrap()
    else {
        panic!("expected revealer");
    };
    assert_eq!(revealer.transition_duration_ms, 250);

    let WidgetSpec::Entry(entry) = from_value(json!({ "type": "entry" })).unwrap() else {
        panic!("expected entry");
    };
    assert!(entry.visibility);
}

#[test]
fn nested_trees_parse_in_declaration_order() {
    let spec = from_value(json!({
        "type": "box",
        "orientation": "v",
        "children": [
            { "type": "label", "text": "first" },
            { "type": "stack", "items": [
                { "name": "a", "child": { "type": "label", "text": "A" } },
                { "name": "b", "child": { "type": "icon", "icon": "network-wireless" } },
            ]},
        ],
    }))
    .unwrap();

    let WidgetSpec::Box(parent) = spec else {
        panic!("expected box");
    };
    assert_eq!(parent.children.len(), 2);
    let WidgetSpec::Stack(stack) = &parent.children[1] else {
        panic!("expected stack");
    };
    assert_eq!(stack.items[0].name, "a");
    assert_eq!(stack.items[1].name, "b");
}
