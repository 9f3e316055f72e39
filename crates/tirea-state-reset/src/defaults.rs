//! Default resolution: composing a node's "factory settings".
//!
//! A node's full default is its declared default with every child's full
//! default inserted under the child's name. Nodes without a declared default
//! compose as `{}`. This depends only on the registry, never on a snapshot.

use crate::error::UnknownNode;
use crate::{NodeId, Registry};
use serde_json::{Map, Value};

/// Compute the full default for `id` and all of its descendants.
///
/// # Examples
///
/// ```
/// use tirea_state_reset::{default_of, NodeDecl, Registry};
/// use serde_json::json;
///
/// let todos = NodeDecl::new("todos").default_value(json!({"list": []}));
/// let app = NodeDecl::new("app")
///     .default_value(json!({"status": "ONLINE"}))
///     .child(todos.id());
/// let app_id = app.id();
/// let registry = Registry::register([app, todos]).unwrap();
///
/// assert_eq!(
///     default_of(&registry, app_id).unwrap(),
///     json!({"status": "ONLINE", "todos": {"list": []}})
/// );
/// ```
pub fn default_of(registry: &Registry, id: NodeId) -> Result<Value, UnknownNode> {
    let decl = registry.lookup(id)?;
    let mut value = decl
        .declared_default()
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()));

    if decl.children().is_empty() {
        return Ok(value);
    }

    // The registry guarantees defaults of nodes with children are objects.
    if let Value::Object(obj) = &mut value {
        for child in decl.children() {
            let child_decl = registry.lookup(*child)?;
            obj.insert(child_decl.name().to_string(), default_of(registry, *child)?);
        }
    }
    Ok(value)
}

/// Compute the default of the whole snapshot: every top-level node's full
/// default under its name.
pub fn default_tree(registry: &Registry) -> Value {
    let mut root = Map::new();
    for id in registry.top_level() {
        if let (Ok(decl), Ok(value)) = (registry.lookup(*id), default_of(registry, *id)) {
            root.insert(decl.name().to_string(), value);
        }
    }
    Value::Object(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodeDecl;
    use serde_json::json;

    #[test]
    fn test_leaf_default_is_literal() {
        let leaf = NodeDecl::new("prefs").default_value(json!({"darkmode": false}));
        let id = leaf.id();
        let registry = Registry::register([leaf]).unwrap();
        assert_eq!(default_of(&registry, id).unwrap(), json!({"darkmode": false}));
    }

    #[test]
    fn test_missing_default_is_empty_object() {
        let session = NodeDecl::new("session");
        let id = session.id();
        let registry = Registry::register([session]).unwrap();
        assert_eq!(default_of(&registry, id).unwrap(), json!({}));
    }

    #[test]
    fn test_child_default_overrides_placeholder_key() {
        let child = NodeDecl::new("child").default_value(json!({"x": 1}));
        let parent = NodeDecl::new("parent")
            .default_value(json!({"child": null, "own": true}))
            .child(child.id());
        let id = parent.id();
        let registry = Registry::register([parent, child]).unwrap();
        assert_eq!(
            default_of(&registry, id).unwrap(),
            json!({"own": true, "child": {"x": 1}})
        );
    }

    #[test]
    fn test_nested_composition() {
        let c = NodeDecl::new("c").default_value(json!(3));
        let b = NodeDecl::new("b").child(c.id());
        let a = NodeDecl::new("a").child(b.id());
        let other = NodeDecl::new("other").default_value(json!("x"));
        let registry = Registry::register([a, b, c, other]).unwrap();
        assert_eq!(
            default_tree(&registry),
            json!({"a": {"b": {"c": 3}}, "other": "x"})
        );
    }

    #[test]
    fn test_unknown_node() {
        let registry = Registry::register([NodeDecl::new("a")]).unwrap();
        let stray = NodeId::next();
        assert_eq!(default_of(&registry, stray), Err(UnknownNode(stray)));
    }
}
