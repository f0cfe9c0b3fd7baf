//! Dot-notation access into JSON documents, e.g. `publishConfig.access`.
//!
//! Numeric segments index into arrays, so `files.0` is the first entry of
//! a `files` array.
use log::*;
use serde_json::Value;

fn child<'a>(value: &'a Value, prop: &str) -> Option<&'a Value> {
    match value {
        Value::Array(items) => prop.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => value.get(prop),
    }
}

fn child_mut<'a>(value: &'a mut Value, prop: &str) -> Option<&'a mut Value> {
    match value {
        Value::Array(items) => prop
            .parse::<usize>()
            .ok()
            .and_then(move |i| items.get_mut(i)),
        _ => value.get_mut(prop),
    }
}

/// Find a descendant of `object` by dot-notation `path`. The path does not
/// include `object` itself; an empty path returns `object`.
pub fn get_complex_object_value<'a>(
    object: &'a Value,
    path: &str,
) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(object);
    }

    path.split('.').try_fold(object, child)
}

/// Remove the property at dot-notation `path` when every parent along the
/// way exists. Returns whether something was removed.
pub fn delete_complex_object_prop(
    object: &mut Value,
    path: &str,
    source_name: Option<&str>,
) -> bool {
    if path.is_empty() {
        return false;
    }

    let (parents, last) = match path.rsplit_once('.') {
        Some((parents, last)) => (Some(parents), last),
        None => (None, path),
    };

    let mut parent = Some(object);
    if let Some(parents) = parents {
        for prop in parents.split('.') {
            parent = parent.and_then(|p| child_mut(p, prop));
        }
    }

    let removed = match parent {
        Some(Value::Object(map)) => map.remove(last).is_some(),
        _ => false,
    };

    if removed {
        debug!(
            "Removed \"{path}\" field from {}.",
            source_name.unwrap_or("n/a")
        );
    }

    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manifest() -> Value {
        json!({
            "name": "pkg-a",
            "publishConfig": { "access": "public", "registry": null },
            "files": ["dist", { "glob": "lib/**" }],
        })
    }

    #[test]
    fn gets_nested_values() {
        let doc = manifest();

        assert_eq!(
            get_complex_object_value(&doc, "publishConfig.access"),
            Some(&json!("public"))
        );
        assert_eq!(
            get_complex_object_value(&doc, "files.1.glob"),
            Some(&json!("lib/**"))
        );
        assert_eq!(
            get_complex_object_value(&doc, "publishConfig.registry"),
            Some(&Value::Null)
        );
        assert_eq!(get_complex_object_value(&doc, ""), Some(&doc));
    }

    #[test]
    fn missing_paths_return_none() {
        let doc = manifest();

        assert!(get_complex_object_value(&doc, "publishConfig.tag").is_none());
        assert!(get_complex_object_value(&doc, "name.first").is_none());
        assert!(get_complex_object_value(&doc, "files.9").is_none());
    }

    #[test]
    fn deletes_nested_property() {
        let mut doc = manifest();

        assert!(delete_complex_object_prop(
            &mut doc,
            "publishConfig.access",
            Some("package.json")
        ));
        assert_eq!(doc["publishConfig"], json!({ "registry": null }));
    }

    #[test]
    fn deletes_top_level_property() {
        let mut doc = manifest();

        assert!(delete_complex_object_prop(&mut doc, "name", None));
        assert!(doc.get("name").is_none());
    }

    #[test]
    fn deleting_missing_property_is_a_no_op() {
        let mut doc = manifest();
        let before = doc.clone();

        assert!(!delete_complex_object_prop(&mut doc, "scripts.build", None));
        assert!(!delete_complex_object_prop(&mut doc, "publishConfig.tag", None));
        assert!(!delete_complex_object_prop(&mut doc, "", None));
        assert_eq!(doc, before);
    }
}
