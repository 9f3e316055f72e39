//! State node identifiers and declarations.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque handle to one declared state node.
///
/// Handles are allocated from a process-wide counter, so equality is
/// identity: two declarations that happen to share a name still get
/// distinct handles. A handle serializes as its raw number, which lets a
/// dispatch layer carry requests as JSON.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    /// Allocate a fresh, never-before-seen handle.
    pub fn next() -> Self {
        NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Rebuild a handle from its raw number.
    ///
    /// The handle is only meaningful if a registry knows it; otherwise it is
    /// rejected as an invalid target.
    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        NodeId(raw)
    }

    /// The raw number behind this handle.
    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Declaration of a state node: name, default value and ordered children.
///
/// ```
/// use tirea_state_reset::NodeDecl;
/// use serde_json::json;
///
/// let todos = NodeDecl::new("todos").default_value(json!({"list": []}));
/// let app = NodeDecl::new("app")
///     .default_value(json!({"status": "ONLINE"}))
///     .child(todos.id());
///
/// assert_eq!(app.children(), &[todos.id()]);
/// ```
#[derive(Clone, Debug)]
pub struct NodeDecl {
    id: NodeId,
    name: String,
    default: Option<Value>,
    children: Vec<NodeId>,
}

impl NodeDecl {
    /// Declare a node with a fresh identifier and no default.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(NodeId::next(), name)
    }

    /// Declare a node under an identifier allocated elsewhere.
    pub fn with_id(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            default: None,
            children: Vec::new(),
        }
    }

    /// Set the declared default.
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Append a child (builder pattern).
    pub fn child(mut self, id: NodeId) -> Self {
        self.children.push(id);
        self
    }

    /// Append several children in order.
    pub fn children_from(mut self, ids: impl IntoIterator<Item = NodeId>) -> Self {
        self.children.extend(ids);
        self
    }

    /// The node's handle.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Key under which the node lives in its parent's object.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared default, if any. Undeclared defaults compose as `{}`.
    pub fn declared_default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Declared children, in declaration order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ids_are_identity_not_name() {
        let a = NodeDecl::new("session");
        let b = NodeDecl::new("session");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_node_id_serializes_as_number() {
        let id = NodeId::from_raw(42);
        assert_eq!(serde_json::to_value(id).unwrap(), json!(42));
        assert_eq!(id.to_string(), "node#42");
    }

    #[test]
    fn test_decl_builder() {
        let child = NodeId::next();
        let decl = NodeDecl::new("app")
            .default_value(json!({"status": "ONLINE"}))
            .child(child);
        assert_eq!(decl.name(), "app");
        assert_eq!(decl.declared_default(), Some(&json!({"status": "ONLINE"})));
        assert_eq!(decl.children(), &[child]);
    }
}
