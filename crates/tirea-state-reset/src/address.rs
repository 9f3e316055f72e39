//! Addresses locating a node's subtree inside a state snapshot.
//!
//! An address is the ordered sequence of node names from the snapshot root
//! down to a node. Unlike a general JSON path it only ever contains object
//! keys: state nodes are always nested inside their parent's object.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Root-to-node key sequence.
///
/// # Examples
///
/// ```
/// use tirea_state_reset::Address;
///
/// let mut addr = Address::root();
/// addr.push("app");
/// addr.push("preferences");
/// assert_eq!(addr.len(), 2);
/// assert_eq!(addr.to_string(), "$.app.preferences");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(Vec<String>);

impl Address {
    /// Create the empty address (the whole snapshot).
    #[inline]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Create an address from a vector of keys.
    #[inline]
    pub fn from_keys(keys: Vec<String>) -> Self {
        Self(keys)
    }

    /// Push a key onto the address (mutating).
    #[inline]
    pub fn push(&mut self, k: impl Into<String>) {
        self.0.push(k.into());
    }

    /// Get the keys of this address.
    #[inline]
    pub fn keys(&self) -> &[String] {
        &self.0
    }

    /// Number of keys; equals the node's depth in the registry tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if this address is the root (whole snapshot).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check if this address is a prefix of another.
    ///
    /// An address is a prefix of itself.
    ///
    /// ```
    /// use tirea_state_reset::address;
    ///
    /// let parent = address!("app");
    /// let child = address!("app", "todos");
    ///
    /// assert!(parent.is_prefix_of(&child));
    /// assert!(!child.is_prefix_of(&parent));
    /// ```
    #[inline]
    pub fn is_prefix_of(&self, other: &Address) -> bool {
        other.0.starts_with(&self.0)
    }

    /// Check whether two addresses locate overlapping subtrees.
    #[inline]
    pub fn overlaps(&self, other: &Address) -> bool {
        self.is_prefix_of(other) || other.is_prefix_of(self)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for key in &self.0 {
            write!(f, ".{}", key)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Address {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Construct an [`Address`] from a list of keys.
///
/// ```
/// use tirea_state_reset::address;
///
/// let a = address!("app", "session");
/// assert_eq!(a.len(), 2);
/// assert!(address!().is_empty());
/// ```
#[macro_export]
macro_rules! address {
    () => {
        $crate::Address::root()
    };
    ($($key:expr),+ $(,)?) => {{
        let mut a = $crate::Address::root();
        $(
            a.push($key);
        )+
        a
    }};
}
