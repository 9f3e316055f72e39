//! The mutation engine: Clear, Reset, ResetAll and Overwrite.
//!
//! Every operation is a pure function `snapshot -> snapshot`. Before any
//! address is resolved the whole request goes through a validation gate: if
//! a single target is not a registered node, nothing is applied and the
//! request comes back as [`InvalidTarget`].
//!
//! ```text
//! Clear(keep..)        {} + current value of each kept node
//! Reset(t..)           current, with default_of(t) at each address
//! ResetAll(except..)   default tree, with current value of each exempt node
//! Overwrite((t, v)..)  current, with v at each address
//! ```

use crate::error::{InvalidTarget, UnknownNode};
use crate::walk::{read_at, remove_in_place, write_in_place};
use crate::{default_of, default_tree, Address, NodeId, OpKind, Registry, ResetOp};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Apply a request against the declared defaults (pure function).
///
/// # Examples
///
/// ```
/// use tirea_state_reset::{apply_reset, NodeDecl, Registry, ResetOp};
/// use serde_json::json;
///
/// let todos = NodeDecl::new("todos").default_value(json!({"list": []}));
/// let todos_id = todos.id();
/// let registry = Registry::register([todos]).unwrap();
///
/// let state = json!({"todos": {"list": ["milk"]}});
/// let next = apply_reset(&registry, &state, &ResetOp::reset([todos_id])).unwrap();
///
/// assert_eq!(next, json!({"todos": {"list": []}}));
/// assert_eq!(state["todos"]["list"][0], "milk"); // input unchanged
/// ```
pub fn apply_reset(
    registry: &Registry,
    snapshot: &Value,
    op: &ResetOp,
) -> Result<Value, InvalidTarget> {
    ResetEngine::new(registry).apply(snapshot, op)
}

/// Engine bound to a registry and, optionally, a boot-time baseline.
#[derive(Clone, Copy, Debug)]
pub struct ResetEngine<'a> {
    registry: &'a Registry,
    baseline: Option<&'a Value>,
}

impl<'a> ResetEngine<'a> {
    /// Engine that restores declared defaults.
    pub fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            baseline: None,
        }
    }

    /// Restore from `baseline` instead of declared defaults.
    ///
    /// Nodes the baseline does not contain still fall back to their
    /// declared default.
    pub fn with_baseline(mut self, baseline: &'a Value) -> Self {
        self.baseline = Some(baseline);
        self
    }

    /// Run the validation gate for a whole request.
    pub fn validate(&self, op: &ResetOp) -> Result<(), InvalidTarget> {
        self.check(op.kind(), op.targets().iter().copied())
    }

    /// Apply any request.
    pub fn apply(&self, snapshot: &Value, op: &ResetOp) -> Result<Value, InvalidTarget> {
        match op {
            ResetOp::Clear { keep } => self.clear(snapshot, keep),
            ResetOp::Reset { targets } => self.reset(snapshot, targets),
            ResetOp::ResetAll { except } => self.reset_all(snapshot, except),
            ResetOp::Overwrite { pairs } => self.overwrite(snapshot, pairs),
        }
    }

    /// Keep only the current values of `keep`, assembled into a fresh tree.
    pub fn clear(&self, snapshot: &Value, keep: &[NodeId]) -> Result<Value, InvalidTarget> {
        self.check(OpKind::Clear, keep.iter().copied())?;

        let addresses = keep
            .iter()
            .map(|id| self.resolve(OpKind::Clear, *id))
            .collect::<Result<Vec<_>, _>>()?;

        let mut result = Value::Object(Map::new());
        for address in outermost(addresses) {
            if let Some(current) = read_at(snapshot, &address) {
                write_in_place(&mut result, &address, current.clone());
            }
        }
        Ok(result)
    }

    /// Put each target back to its defaults, leaving everything else as is.
    pub fn reset(&self, snapshot: &Value, targets: &[NodeId]) -> Result<Value, InvalidTarget> {
        self.check(OpKind::Reset, targets.iter().copied())?;

        let mut result = snapshot.clone();
        for id in targets {
            let address = self.resolve(OpKind::Reset, *id)?;
            let value = self.factory_value(OpKind::Reset, *id, &address)?;
            write_in_place(&mut result, &address, value);
        }
        Ok(result)
    }

    /// Put the whole tree back to defaults, except `except` and everything
    /// declared below them, which keep their current values.
    pub fn reset_all(&self, snapshot: &Value, except: &[NodeId]) -> Result<Value, InvalidTarget> {
        let exempt = self.exemption_set(except)?;

        let addresses = exempt
            .into_iter()
            .map(|id| self.resolve(OpKind::ResetAll, id))
            .collect::<Result<Vec<_>, _>>()?;

        let mut result = self.factory_tree();
        for address in outermost(addresses) {
            match read_at(snapshot, &address) {
                Some(current) => write_in_place(&mut result, &address, current.clone()),
                None => remove_in_place(&mut result, &address),
            }
        }
        Ok(result)
    }

    /// Write each caller-supplied value verbatim at its node's address.
    pub fn overwrite(
        &self,
        snapshot: &Value,
        pairs: &[(NodeId, Value)],
    ) -> Result<Value, InvalidTarget> {
        self.check(OpKind::Overwrite, pairs.iter().map(|(id, _)| *id))?;

        let mut result = snapshot.clone();
        for (id, value) in pairs {
            let address = self.resolve(OpKind::Overwrite, *id)?;
            write_in_place(&mut result, &address, value.clone());
        }
        Ok(result)
    }

    /// The exempt nodes for a ResetAll: `except` plus all their declared
    /// descendants, deduplicated, in registration order.
    pub fn exemption_set(&self, except: &[NodeId]) -> Result<Vec<NodeId>, InvalidTarget> {
        self.check(OpKind::ResetAll, except.iter().copied())?;

        let mut exempt = HashSet::new();
        for id in except {
            exempt.insert(*id);
            let descendants = self
                .registry
                .descendants(*id)
                .map_err(|e| rejected(OpKind::ResetAll, e))?;
            exempt.extend(descendants);
        }

        Ok(self
            .registry
            .nodes()
            .map(|decl| decl.id())
            .filter(|id| exempt.contains(id))
            .collect())
    }

    fn check(
        &self,
        kind: OpKind,
        targets: impl IntoIterator<Item = NodeId>,
    ) -> Result<(), InvalidTarget> {
        let invalid: Vec<NodeId> = targets
            .into_iter()
            .filter(|id| !self.registry.is_valid_target(*id))
            .collect();
        if invalid.is_empty() {
            Ok(())
        } else {
            Err(InvalidTarget {
                kind,
                targets: invalid,
            })
        }
    }

    fn resolve(&self, kind: OpKind, id: NodeId) -> Result<Address, InvalidTarget> {
        self.registry
            .address_of(id)
            .map_err(|e| rejected(kind, e))
    }

    fn factory_value(
        &self,
        kind: OpKind,
        id: NodeId,
        address: &Address,
    ) -> Result<Value, InvalidTarget> {
        if let Some(value) = self.baseline.and_then(|b| read_at(b, address)) {
            return Ok(value.clone());
        }
        default_of(self.registry, id).map_err(|e| rejected(kind, e))
    }

    /// Declared default tree with each top-level node's baseline value laid
    /// over it, so nodes the baseline lacks keep their declared default.
    fn factory_tree(&self) -> Value {
        let mut tree = default_tree(self.registry);
        let Some(baseline) = self.baseline else {
            return tree;
        };
        for id in self.registry.top_level() {
            let Ok(decl) = self.registry.lookup(*id) else {
                continue;
            };
            if let (Some(value), Some(map)) = (baseline.get(decl.name()), tree.as_object_mut()) {
                map.insert(decl.name().to_string(), value.clone());
            }
        }
        tree
    }
}

/// Drop addresses nested under another one in the list; copying the
/// enclosing subtree already carries them.
fn outermost(addresses: Vec<Address>) -> Vec<Address> {
    addresses
        .iter()
        .filter(|a| {
            !addresses
                .iter()
                .any(|b| b.len() < a.len() && b.is_prefix_of(a))
        })
        .cloned()
        .collect()
}

fn rejected(kind: OpKind, UnknownNode(id): UnknownNode) -> InvalidTarget {
    InvalidTarget {
        kind,
        targets: vec![id],
    }
}
