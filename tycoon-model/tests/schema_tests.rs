use tycoon_model::{DataGuard, FieldType, ItemSchema, SchemaError, SchemaField};
use serde::Deserialize;
use serde_json::json;

fn dropper_schema() -> ItemSchema {
    ItemSchema::new(vec![
        SchemaField::integer("/level"),
        SchemaField::number("/rate"),
        SchemaField::enumeration("/ore", vec!["iron".into(), "gold".into()]),
        SchemaField::text("/label").optional(),
    ])
}

// ── SchemaField constructors ─────────────────────────────────────

#[test]
fn fields_are_required_by_default() {
    let f = SchemaField::text("/name");
    assert_eq!(f.field_path, "/name");
    assert_eq!(f.field_type, FieldType::Text);
    assert!(f.required);
}

#[test]
fn optional_clears_required() {
    assert!(!SchemaField::bool("/open").optional().required);
}

#[test]
fn enumeration_keeps_options() {
    let f = SchemaField::enumeration("/ore", vec!["iron".into()]);
    assert_eq!(f.field_type, FieldType::Enum);
    assert_eq!(f.enum_options, Some(vec!["iron".to_string()]));
}

// ── ItemSchema::validate ─────────────────────────────────────────

#[test]
fn valid_data_passes() {
    let data = json!({"level": 2, "rate": 1.5, "ore": "gold"});
    assert!(dropper_schema().validate(&data).is_ok());
}

#[test]
fn non_object_is_rejected() {
    assert_eq!(
        dropper_schema().validate(&json!([1, 2])),
        Err(SchemaError::NotAnObject)
    );
}

#[test]
fn missing_required_field_is_reported() {
    let data = json!({"rate": 1.5, "ore": "gold"});
    assert_eq!(
        dropper_schema().validate(&data),
        Err(SchemaError::MissingField("/level".into()))
    );
}

#[test]
fn wrong_type_is_reported() {
    let data = json!({"level": 2.5, "rate": 1.5, "ore": "gold"});
    assert_eq!(
        dropper_schema().validate(&data),
        Err(SchemaError::WrongType {
            path: "/level".into(),
            expected: FieldType::Integer,
        })
    );
}

#[test]
fn optional_field_checked_when_present() {
    let data = json!({"level": 2, "rate": 1, "ore": "iron", "label": 7});
    assert!(matches!(
        dropper_schema().validate(&data),
        Err(SchemaError::WrongType { .. })
    ));
}

#[test]
fn enum_value_outside_options_is_rejected() {
    let data = json!({"level": 2, "rate": 1, "ore": "copper"});
    assert_eq!(
        dropper_schema().validate(&data),
        Err(SchemaError::NotInEnum {
            path: "/ore".into(),
            value: "copper".into(),
        })
    );
}

#[test]
fn nested_pointer_paths_are_followed() {
    let schema = ItemSchema::default().field(SchemaField::integer("/upgrades/level"));
    assert!(schema.validate(&json!({"upgrades": {"level": 3}})).is_ok());
    assert!(schema.validate(&json!({"upgrades": {}})).is_err());
}

#[test]
fn schema_deserializes_from_json() {
    let json = r#"{
        "fields": [
            {"field_path": "/cash", "field_type": "integer"},
            {"field_path": "/owner_note", "field_type": "text", "required": false}
        ]
    }"#;
    let schema: ItemSchema = serde_json::from_str(json).unwrap();
    assert_eq!(schema.fields.len(), 2);
    assert!(schema.fields[0].required);
    assert!(!schema.fields[1].required);
    assert_eq!(schema.fields[0].field_type, FieldType::Integer);
}

// ── DataGuard ────────────────────────────────────────────────────

#[test]
fn any_object_guard() {
    let guard = DataGuard::AnyObject;
    assert!(guard.accepts(&json!({})));
    assert!(!guard.accepts(&json!(null)));
}

#[test]
fn schema_guard_delegates() {
    let guard = DataGuard::schema(dropper_schema());
    assert!(!guard.accepts(&json!({})));
}

#[derive(Deserialize)]
#[allow(dead_code)]
struct ChestData {
    gold: u32,
}

#[test]
fn typed_guard_uses_serde() {
    let guard = DataGuard::typed::<ChestData>();
    assert!(guard.accepts(&json!({"gold": 3})));
    assert!(matches!(
        guard.check(&json!({"gold": "lots"})),
        Err(SchemaError::Rejected(_))
    ));
}

#[test]
fn custom_guard_message_is_kept() {
    let guard = DataGuard::custom(|v| {
        if v.get("ok").is_some() {
            Ok(())
        } else {
            Err("needs ok".into())
        }
    });
    assert_eq!(
        guard.check(&json!({})),
        Err(SchemaError::Rejected("needs ok".into()))
    );
}

#[test]
fn debug_hides_closure() {
    let guard = DataGuard::custom(|_| Ok(()));
    assert_eq!(format!("{guard:?}"), "Custom(..)");
}
