use serde_json::Value;

/// Repairs `stored` data against a freshly generated `template`.
///
/// Only top-level keys missing from `stored` are filled in from `template`.
/// Keys already present keep their stored value, and keys the template does
/// not know about are kept as well. A stored value that is not an object
/// carries nothing worth keeping and is replaced by the template.
pub fn reconcile(stored: &Value, template: &Value) -> Value {
    let (Some(stored_map), Some(template_map)) = (stored.as_object(), template.as_object()) else {
        return match stored {
            Value::Object(_) => stored.clone(),
            _ => template.clone(),
        };
    };

    let mut merged = stored_map.clone();
    for (key, value) in template_map {
        if !merged.contains_key(key) {
            merged.insert(key.clone(), value.clone());
        }
    }
    Value::Object(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_against_scalar_template_is_kept() {
        assert_eq!(reconcile(&json!({"a": 1}), &json!(3)), json!({"a": 1}));
    }

    #[test]
    fn scalar_against_scalar_template_takes_template() {
        assert_eq!(reconcile(&json!("junk"), &json!(3)), json!(3));
    }
}
