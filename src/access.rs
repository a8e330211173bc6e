//! Optional-chaining lookups over arbitrarily-shaped JSON.
//!
//! Both source formats are loosely structured: fields move between
//! provenance keys, heights arrive as numbers or numeric strings, and
//! whole subtrees may be absent. Every accessor here treats absence as a
//! normal, silent outcome and never panics.

use serde_json::Value;

/// Returns the value at a `.`-separated key path, or `None` if any
/// segment is missing. Numeric segments index into arrays, so
/// `get(doc, "leads.0.locations")` works. JSON `null` counts as absent.
pub fn get<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

/// Returns the value under the first present key (or key path) from an
/// ordered candidate list. Used for the survey format, which spreads one
/// logical value across differently-named provenance keys (user-asserted
/// first, then imported, then computed). When the winning value is itself
/// an object, descends into its first entry; survey attributes often wrap
/// the real value one level down, keyed by an opaque edit id.
pub fn first_of<'a>(root: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    for key in keys {
        if let Some(found) = get(root, key) {
            if let Value::Object(map) = found {
                if let Some((_, inner)) = map.iter().next() {
                    if !inner.is_null() {
                        return Some(inner);
                    }
                }
                continue;
            }
            return Some(found);
        }
    }
    None
}

/// String at `path`, if present and actually a string.
pub fn get_str<'a>(root: &'a Value, path: &str) -> Option<&'a str> {
    get(root, path).and_then(Value::as_str)
}

/// Number at `path`, coercing numeric strings. Survey heights in
/// particular arrive both ways.
pub fn get_f64(root: &Value, path: &str) -> Option<f64> {
    get(root, path).and_then(as_f64)
}

pub fn get_array<'a>(root: &'a Value, path: &str) -> Option<&'a Vec<Value>> {
    get(root, path).and_then(Value::as_array)
}

pub fn get_object<'a>(root: &'a Value, path: &str) -> Option<&'a serde_json::Map<String, Value>> {
    get(root, path).and_then(Value::as_object)
}

/// Numeric view of a value, coercing numeric strings.
pub fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Display form of a scalar value: strings as-is, numbers and booleans
/// rendered. Objects and arrays have no single display form.
pub fn as_display_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_traverses_objects_and_arrays() {
        let doc = json!({"leads": [{"locations": [{"label": "1-PL100"}]}]});
        assert_eq!(
            get_str(&doc, "leads.0.locations.0.label"),
            Some("1-PL100")
        );
    }

    #[test]
    fn get_absence_is_silent() {
        let doc = json!({"a": {"b": 1}});
        assert!(get(&doc, "a.c").is_none());
        assert!(get(&doc, "a.b.c").is_none());
        assert!(get(&doc, "a.0").is_none());
        assert!(get(&json!(null), "a").is_none());
    }

    #[test]
    fn get_treats_null_as_absent() {
        let doc = json!({"a": null});
        assert!(get(&doc, "a").is_none());
    }

    #[test]
    fn first_of_respects_precedence() {
        let attr = json!({"-Imported": "PL2", "assessment": "PL1"});
        let v = first_of(&attr, &["assessment", "-Imported"]).unwrap();
        assert_eq!(v.as_str(), Some("PL1"));
    }

    #[test]
    fn first_of_descends_into_opaque_edit_keys() {
        let attr = json!({"multi_added": {"-OabcEditId": "CPS ENERGY"}});
        let v = first_of(&attr, &["multi_added", "button_added"]).unwrap();
        assert_eq!(v.as_str(), Some("CPS ENERGY"));
    }

    #[test]
    fn f64_coerces_numeric_strings() {
        let doc = json!({"h": "34.5", "n": 2, "x": "abc"});
        assert_eq!(get_f64(&doc, "h"), Some(34.5));
        assert_eq!(get_f64(&doc, "n"), Some(2.0));
        assert_eq!(get_f64(&doc, "x"), None);
    }
}
