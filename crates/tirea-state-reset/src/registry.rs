//! The node registry and address resolution.
//!
//! A [`Registry`] is built once from the declared hierarchy and is immutable
//! afterwards. It is shared read-only (usually behind an `Arc`) by every
//! mutation request.

use crate::error::{value_type_name, ConfigResult, ConfigurationError, UnknownNode};
use crate::{Address, NodeDecl, NodeId};
use std::collections::{HashMap, HashSet};

/// Collects node declarations and validates them into a [`Registry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    nodes: Vec<NodeDecl>,
}

impl RegistryBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declaration (builder pattern).
    pub fn with_node(mut self, decl: NodeDecl) -> Self {
        self.nodes.push(decl);
        self
    }

    /// Validate the declarations and freeze them into a registry.
    pub fn build(self) -> ConfigResult<Registry> {
        let mut index = HashMap::with_capacity(self.nodes.len());
        for (pos, decl) in self.nodes.iter().enumerate() {
            if decl.name().is_empty() {
                return Err(ConfigurationError::EmptyName { id: decl.id() });
            }
            if index.insert(decl.id(), pos).is_some() {
                return Err(ConfigurationError::DuplicateNode {
                    id: decl.id(),
                    name: decl.name().to_string(),
                });
            }
        }

        let mut parents = HashMap::new();
        for decl in &self.nodes {
            if !decl.children().is_empty() {
                if let Some(default) = decl.declared_default() {
                    if !default.is_object() {
                        return Err(ConfigurationError::NonObjectDefault {
                            name: decl.name().to_string(),
                            found: value_type_name(default),
                        });
                    }
                }
            }

            let mut names = HashSet::new();
            for child in decl.children() {
                let child_pos = *index.get(child).ok_or_else(|| {
                    ConfigurationError::UnknownChild {
                        parent: decl.name().to_string(),
                        child: *child,
                    }
                })?;
                let child_name = self.nodes[child_pos].name();
                if parents.insert(*child, decl.id()).is_some() {
                    return Err(ConfigurationError::SharedChild {
                        child: child_name.to_string(),
                    });
                }
                if !names.insert(child_name) {
                    return Err(ConfigurationError::DuplicateName {
                        name: child_name.to_string(),
                        parent: decl.name().to_string(),
                    });
                }
            }
        }

        let top_level: Vec<NodeId> = self
            .nodes
            .iter()
            .map(NodeDecl::id)
            .filter(|id| !parents.contains_key(id))
            .collect();

        let mut top_names = HashSet::new();
        for id in &top_level {
            let name = self.nodes[index[id]].name();
            if !top_names.insert(name) {
                return Err(ConfigurationError::DuplicateName {
                    name: name.to_string(),
                    parent: "$".to_string(),
                });
            }
        }

        // Every node has at most one parent, so anything not reachable from
        // a top-level node sits on a cycle of parent links.
        let mut reached = HashSet::with_capacity(self.nodes.len());
        let mut stack = top_level.clone();
        while let Some(id) = stack.pop() {
            if reached.insert(id) {
                stack.extend(self.nodes[index[&id]].children().iter().copied());
            }
        }
        if let Some(decl) = self.nodes.iter().find(|d| !reached.contains(&d.id())) {
            return Err(ConfigurationError::Cycle {
                name: decl.name().to_string(),
            });
        }

        tracing::debug!(
            nodes = self.nodes.len(),
            top_level = top_level.len(),
            "state registry built"
        );

        Ok(Registry {
            nodes: self.nodes,
            index,
            parents,
            top_level,
        })
    }
}

/// Immutable identifier → declaration map with parent/child links.
#[derive(Debug)]
pub struct Registry {
    /// Declarations in registration order.
    nodes: Vec<NodeDecl>,
    index: HashMap<NodeId, usize>,
    parents: HashMap<NodeId, NodeId>,
    /// Nodes directly under the implicit "all state" root.
    top_level: Vec<NodeId>,
}

impl Registry {
    /// Build a registry from a set of declarations in one call.
    pub fn register(decls: impl IntoIterator<Item = NodeDecl>) -> ConfigResult<Self> {
        decls
            .into_iter()
            .fold(RegistryBuilder::new(), RegistryBuilder::with_node)
            .build()
    }

    /// Look up a declaration.
    pub fn lookup(&self, id: NodeId) -> Result<&NodeDecl, UnknownNode> {
        self.index
            .get(&id)
            .map(|&pos| &self.nodes[pos])
            .ok_or(UnknownNode(id))
    }

    /// Whether `id` may be used as a mutation target.
    #[inline]
    pub fn is_valid_target(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// The declared parent, or `None` for top-level (and unknown) nodes.
    #[inline]
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.parents.get(&id).copied()
    }

    /// Nodes directly under the snapshot root, in registration order.
    #[inline]
    pub fn top_level(&self) -> &[NodeId] {
        &self.top_level
    }

    /// All declarations in registration order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeDecl> {
        self.nodes.iter()
    }

    /// Number of declared nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no node was declared.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Resolve the root-to-node address of `id` by walking parent links.
    ///
    /// The address length equals the node's depth below the root.
    pub fn address_of(&self, id: NodeId) -> Result<Address, UnknownNode> {
        let mut keys = vec![self.lookup(id)?.name().to_string()];
        let mut current = id;
        while let Some(parent) = self.parent_of(current) {
            keys.push(self.lookup(parent)?.name().to_string());
            current = parent;
        }
        keys.reverse();
        Ok(Address::from_keys(keys))
    }

    /// All declared descendants of `id` in pre-order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Result<Vec<NodeId>, UnknownNode> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.lookup(id)?.children().iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.lookup(next)?.children().iter().rev().copied());
        }
        Ok(out)
    }
}
