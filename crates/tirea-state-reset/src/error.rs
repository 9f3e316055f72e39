//! Error types for registry construction and mutation requests.

use crate::{NodeId, OpKind};
use std::fmt;
use thiserror::Error;

/// Result type alias for registry construction.
pub type ConfigResult<T> = Result<T, ConfigurationError>;

/// Errors raised while building a [`Registry`](crate::Registry).
///
/// These are programmer errors in the declared hierarchy and are fatal to
/// startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The same identifier was registered twice.
    #[error("node {id} ({name}) is registered more than once")]
    DuplicateNode {
        /// The duplicated identifier.
        id: NodeId,
        /// Name of the second declaration.
        name: String,
    },

    /// A declared child identifier was never registered.
    #[error("node '{parent}' declares child {child} which was never registered")]
    UnknownChild {
        /// Name of the declaring parent.
        parent: String,
        /// The missing child identifier.
        child: NodeId,
    },

    /// A child is listed by more than one parent, or twice by the same one.
    #[error("node '{child}' is declared as a child more than once")]
    SharedChild {
        /// Name of the shared child.
        child: String,
    },

    /// The declared child links form a cycle.
    #[error("declaration cycle detected involving node '{name}'")]
    Cycle {
        /// Name of a node on the cycle.
        name: String,
    },

    /// Two siblings share a name, so their addresses would collide.
    #[error("duplicate node name '{name}' under {parent}")]
    DuplicateName {
        /// The colliding name.
        name: String,
        /// Name of the shared parent, or `$` for top-level nodes.
        parent: String,
    },

    /// A node with children declares a default that is not an object.
    #[error("node '{name}' has children but its default is {found}, not an object")]
    NonObjectDefault {
        /// Name of the node.
        name: String,
        /// JSON type of the declared default.
        found: &'static str,
    },

    /// A node was declared with an empty name.
    #[error("node {id} has an empty name")]
    EmptyName {
        /// Identifier of the unnamed node.
        id: NodeId,
    },
}

/// A lookup for an identifier that is not in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown node {0}")]
pub struct UnknownNode(pub NodeId);

/// A mutation request named one or more unregistered targets.
///
/// Produced by the engine's validation gate. The gateway absorbs it into
/// the warning channel; callers never see it as a failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: invalid target(s) {}; request ignored", TargetList(.targets))]
pub struct InvalidTarget {
    /// The operation whose request was rejected.
    pub kind: OpKind,
    /// Every offending target, in request order.
    pub targets: Vec<NodeId>,
}

struct TargetList<'a>(&'a [NodeId]);

impl fmt::Display for TargetList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{id} (not a registered state node)")?;
        }
        Ok(())
    }
}

/// Get the type name of a JSON value.
#[inline]
pub fn value_type_name(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
