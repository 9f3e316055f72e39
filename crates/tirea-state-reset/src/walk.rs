//! Reading and replacing subtrees of a snapshot by address.
//!
//! All writers are pure: they take the input snapshot by reference and
//! return a new one. `serde_json::Value` does not share structure, so the
//! input is cloned once and the copy edited in place; untouched branches of
//! the result compare equal to the input.

use crate::Address;
use serde_json::{Map, Value};

/// Read the subtree at `address`.
///
/// Returns `None` when any key along the way is missing or an intermediate
/// value is not an object: that subtree has not been initialized yet.
pub fn read_at<'a>(snapshot: &'a Value, address: &Address) -> Option<&'a Value> {
    let mut current = snapshot;
    for key in address {
        current = current.as_object()?.get(key)?;
    }
    Some(current)
}

/// Return a snapshot where the subtree at `address` is `value`.
///
/// An empty address replaces the whole tree.
pub fn write_at(snapshot: &Value, address: &Address, value: Value) -> Value {
    let mut result = snapshot.clone();
    write_in_place(&mut result, address, value);
    result
}

/// Return a snapshot with the last key of `address` deleted from its parent.
///
/// An empty address yields the empty tree; a missing intermediate is a no-op.
pub fn remove_at(snapshot: &Value, address: &Address) -> Value {
    let mut result = snapshot.clone();
    remove_in_place(&mut result, address);
    result
}

/// In-place form of [`write_at`], creating intermediate objects as needed.
pub(crate) fn write_in_place(doc: &mut Value, address: &Address, value: Value) {
    set_at_keys(doc, address.keys(), value);
}

/// In-place form of [`remove_at`].
pub(crate) fn remove_in_place(doc: &mut Value, address: &Address) {
    match address.keys() {
        [] => *doc = Value::Object(Map::new()),
        [parents @ .., last] => {
            if let Some(Value::Object(obj)) = get_at_keys_mut(doc, parents) {
                obj.remove(last);
            }
        }
    }
}

fn set_at_keys(current: &mut Value, keys: &[String], value: Value) {
    match keys {
        [] => *current = value,
        [key, rest @ ..] => {
            if !current.is_object() {
                *current = Value::Object(Map::new());
            }
            if let Value::Object(obj) = current {
                if rest.is_empty() {
                    obj.insert(key.clone(), value);
                } else {
                    let entry = obj.entry(key.clone()).or_insert(Value::Null);
                    set_at_keys(entry, rest, value);
                }
            }
        }
    }
}

fn get_at_keys_mut<'a>(current: &'a mut Value, keys: &[String]) -> Option<&'a mut Value> {
    match keys {
        [] => Some(current),
        [key, rest @ ..] => {
            let child = current.as_object_mut()?.get_mut(key)?;
            get_at_keys_mut(child, rest)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address;
    use serde_json::json;

    #[test]
    fn test_read_at() {
        let doc = json!({"app": {"todos": {"list": [1]}}});
        assert_eq!(
            read_at(&doc, &address!("app", "todos")),
            Some(&json!({"list": [1]}))
        );
        assert_eq!(read_at(&doc, &address!()), Some(&doc));
    }

    #[test]
    fn test_read_at_missing_intermediate_is_absent() {
        let doc = json!({"app": {"session": null}});
        assert_eq!(read_at(&doc, &address!("app", "prefs", "darkmode")), None);
        assert_eq!(read_at(&doc, &address!("app", "session", "lastseen")), None);
        assert_eq!(read_at(&doc, &address!("app", "session")), Some(&json!(null)));
    }

    #[test]
    fn test_write_at_preserves_siblings() {
        let doc = json!({"app": {"status": "ONLINE", "todos": {"list": [1]}, "prefs": {"a": 1}}});
        let out = write_at(&doc, &address!("app", "todos"), json!({"list": []}));
        assert_eq!(
            out,
            json!({"app": {"status": "ONLINE", "todos": {"list": []}, "prefs": {"a": 1}}})
        );
        // Input untouched
        assert_eq!(doc["app"]["todos"]["list"], json!([1]));
    }

    #[test]
    fn test_write_at_creates_intermediates() {
        let out = write_at(&json!({}), &address!("a", "b", "c"), json!(1));
        assert_eq!(out, json!({"a": {"b": {"c": 1}}}));
    }

    #[test]
    fn test_write_at_replaces_non_object_intermediate() {
        let doc = json!({"app": {"session": null}});
        let out = write_at(&doc, &address!("app", "session", "lastseen"), json!(7));
        assert_eq!(out, json!({"app": {"session": {"lastseen": 7}}}));
    }

    #[test]
    fn test_write_at_root_replaces_tree() {
        let out = write_at(&json!({"x": 1}), &address!(), json!({"y": 2}));
        assert_eq!(out, json!({"y": 2}));
    }

    #[test]
    fn test_remove_at() {
        let doc = json!({"app": {"todos": {}, "session": {}}});
        assert_eq!(
            remove_at(&doc, &address!("app", "session")),
            json!({"app": {"todos": {}}})
        );
        assert_eq!(remove_at(&doc, &address!("nope", "x")), doc);
        assert_eq!(remove_at(&doc, &address!()), json!({}));
    }
}
