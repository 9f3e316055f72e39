//! Bulk structural mutations for hierarchical JSON state.
//!
//! `tirea-state-reset` manages a state tree made of named, nestable state
//! nodes. Each node declares a default and may have child nodes; the shape of
//! the snapshot mirrors the declared hierarchy. The crate clears, resets and
//! overwrites parts of that tree without callers having to walk it.
//!
//! # Core Concepts
//!
//! - **Registry**: immutable map of [`NodeDecl`]s built once at startup
//! - **Address**: root-to-node key sequence resolved from parent links
//! - **ResetEngine**: pure `snapshot -> snapshot` implementation of the four
//!   operations, guarded by an all-or-nothing target validation
//! - **ResetGateway**: the live store; serializes requests, commits results,
//!   warns on rejected requests and keeps the boot baseline
//!
//! # Operations
//!
//! | Request                 | Result                                              |
//! |-------------------------|-----------------------------------------------------|
//! | `Clear()`               | empty tree                                          |
//! | `Clear(a, b)`           | only the current values of `a` and `b`              |
//! | `Reset(a)`              | `a` back to its default, siblings untouched         |
//! | `ResetAll(a)`           | everything back to defaults except `a` (and below)  |
//! | `Overwrite((a, v))`     | `v` written verbatim at `a`                         |
//!
//! # Quick Start
//!
//! ```
//! use tirea_state_reset::{apply_reset, NodeDecl, Registry, ResetOp};
//! use serde_json::json;
//!
//! let prefs = NodeDecl::new("preferences").default_value(json!({"darkmode": false}));
//! let todos = NodeDecl::new("todos").default_value(json!({"list": []}));
//! let app = NodeDecl::new("app")
//!     .default_value(json!({"status": "ONLINE"}))
//!     .child(prefs.id())
//!     .child(todos.id());
//! let (prefs_id, todos_id) = (prefs.id(), todos.id());
//! let registry = Registry::register([app, prefs, todos]).unwrap();
//!
//! let state = json!({"app": {
//!     "status": "ONLINE",
//!     "preferences": {"darkmode": true},
//!     "todos": {"list": ["milk"]}
//! }});
//!
//! let kept = apply_reset(&registry, &state, &ResetOp::clear([prefs_id])).unwrap();
//! assert_eq!(kept, json!({"app": {"preferences": {"darkmode": true}}}));
//!
//! let fresh = apply_reset(&registry, &state, &ResetOp::reset_all([todos_id])).unwrap();
//! assert_eq!(fresh["app"]["preferences"]["darkmode"], false);
//! assert_eq!(fresh["app"]["todos"]["list"][0], "milk");
//! ```

mod address;
mod config;
mod defaults;
mod engine;
mod error;
mod gateway;
mod node;
mod op;
mod registry;
mod walk;

pub use address::Address;
pub use config::{ResetConfig, ResetSource};
pub use defaults::{default_of, default_tree};
pub use engine::{apply_reset, ResetEngine};
pub use error::{value_type_name, ConfigResult, ConfigurationError, InvalidTarget, UnknownNode};
pub use gateway::{CommitHook, DispatchOutcome, ResetGateway, WarnSink};
pub use node::{NodeDecl, NodeId};
pub use op::{OpKind, ResetOp};
pub use registry::{Registry, RegistryBuilder};
pub use walk::{read_at, remove_at, write_at};

// Re-export serde_json::Value for convenience
pub use serde_json::Value;
