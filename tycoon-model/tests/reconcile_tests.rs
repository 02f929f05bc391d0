use pretty_assertions::assert_eq;
use serde_json::json;
use tycoon_model::reconcile;

#[test]
fn fills_missing_keys_from_template() {
    let stored = json!({"a": 1});
    let template = json!({"a": 0, "b": 2});
    assert_eq!(reconcile(&stored, &template), json!({"a": 1, "b": 2}));
}

#[test]
fn never_overwrites_existing_keys() {
    let stored = json!({"a": "kept", "b": null});
    let template = json!({"a": "fresh", "b": 5});
    assert_eq!(reconcile(&stored, &template), json!({"a": "kept", "b": null}));
}

#[test]
fn keeps_keys_outside_template() {
    let stored = json!({"legacy": true});
    let template = json!({"level": 1});
    assert_eq!(
        reconcile(&stored, &template),
        json!({"legacy": true, "level": 1})
    );
}

#[test]
fn nested_objects_are_not_merged() {
    let stored = json!({"upgrades": {"speed": 2}});
    let template = json!({"upgrades": {"speed": 0, "size": 0}});
    assert_eq!(
        reconcile(&stored, &template),
        json!({"upgrades": {"speed": 2}})
    );
}

#[test]
fn non_object_stored_value_takes_template() {
    let template = json!({"gold": 0});
    assert_eq!(reconcile(&json!(42), &template), template);
    assert_eq!(reconcile(&json!(null), &template), template);
}

#[test]
fn empty_template_returns_stored() {
    let stored = json!({"gold": 9});
    assert_eq!(reconcile(&stored, &json!({})), stored);
}
