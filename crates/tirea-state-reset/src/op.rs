//! Mutation requests understood by the reset engine.

use crate::NodeId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The four bulk operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    /// Keep only the listed nodes.
    Clear,
    /// Restore the listed nodes.
    Reset,
    /// Restore everything but the listed nodes.
    ResetAll,
    /// Write caller-supplied values.
    Overwrite,
}

impl OpKind {
    /// Name used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            OpKind::Clear => "StateClear",
            OpKind::Reset => "StateReset",
            OpKind::ResetAll => "StateResetAll",
            OpKind::Overwrite => "StateOverwrite",
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single bulk mutation request.
///
/// Targets are applied in the order given; when two targets share or nest
/// addresses, the later write wins.
///
/// ```
/// use tirea_state_reset::{NodeId, ResetOp};
/// use serde_json::json;
///
/// let todos = NodeId::next();
/// let op = ResetOp::overwrite([(todos, json!({"list": []}))]);
/// assert_eq!(op.targets(), vec![todos]);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ResetOp {
    /// Keep only the listed nodes' current values; drop everything else.
    ///
    /// With no targets the result is the empty tree.
    Clear {
        #[serde(default)]
        keep: Vec<NodeId>,
    },

    /// Restore the listed nodes to their defaults.
    ///
    /// An empty list is a no-op.
    Reset {
        #[serde(default)]
        targets: Vec<NodeId>,
    },

    /// Restore the whole tree to defaults except the listed nodes and
    /// their descendants.
    ResetAll {
        #[serde(default)]
        except: Vec<NodeId>,
    },

    /// Replace the listed nodes with caller-supplied values.
    Overwrite {
        #[serde(default)]
        pairs: Vec<(NodeId, Value)>,
    },
}

impl ResetOp {
    /// Build a Clear request keeping `keep`.
    pub fn clear(keep: impl IntoIterator<Item = NodeId>) -> Self {
        ResetOp::Clear {
            keep: keep.into_iter().collect(),
        }
    }

    /// Build a Reset request.
    pub fn reset(targets: impl IntoIterator<Item = NodeId>) -> Self {
        ResetOp::Reset {
            targets: targets.into_iter().collect(),
        }
    }

    /// Build a ResetAll request exempting `except`.
    pub fn reset_all(except: impl IntoIterator<Item = NodeId>) -> Self {
        ResetOp::ResetAll {
            except: except.into_iter().collect(),
        }
    }

    /// Build an Overwrite request from `(target, value)` pairs.
    pub fn overwrite(pairs: impl IntoIterator<Item = (NodeId, Value)>) -> Self {
        ResetOp::Overwrite {
            pairs: pairs.into_iter().collect(),
        }
    }

    /// Which of the four operations this is.
    pub fn kind(&self) -> OpKind {
        match self {
            ResetOp::Clear { .. } => OpKind::Clear,
            ResetOp::Reset { .. } => OpKind::Reset,
            ResetOp::ResetAll { .. } => OpKind::ResetAll,
            ResetOp::Overwrite { .. } => OpKind::Overwrite,
        }
    }

    /// Every node identifier referenced by this request, in order.
    pub fn targets(&self) -> Vec<NodeId> {
        match self {
            ResetOp::Clear { keep: ids }
            | ResetOp::Reset { targets: ids }
            | ResetOp::ResetAll { except: ids } => ids.clone(),
            ResetOp::Overwrite { pairs } => pairs.iter().map(|(id, _)| *id).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_names() {
        assert_eq!(ResetOp::clear([]).kind().to_string(), "StateClear");
        assert_eq!(ResetOp::reset([]).kind().to_string(), "StateReset");
        assert_eq!(ResetOp::reset_all([]).kind().to_string(), "StateResetAll");
        assert_eq!(ResetOp::overwrite([]).kind().to_string(), "StateOverwrite");
    }

    #[test]
    fn test_op_serde() {
        let op = ResetOp::overwrite([(NodeId::from_raw(3), json!(null))]);
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json, json!({"op": "overwrite", "pairs": [[3, null]]}));

        let parsed: ResetOp = serde_json::from_value(json!({"op": "reset_all"})).unwrap();
        assert_eq!(parsed, ResetOp::reset_all([]));
    }

    #[test]
    fn test_targets_preserve_order_and_duplicates() {
        let a = NodeId::from_raw(1);
        let b = NodeId::from_raw(2);
        assert_eq!(ResetOp::reset([b, a, b]).targets(), vec![b, a, b]);
    }
}
