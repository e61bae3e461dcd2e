//! An ordered map backed by an unbalanced binary search tree.
//!
//! [`TreeMap`] keeps one value per key, ordered by the key's [`Ord`]
//! implementation, and answers nearest-key queries in addition to exact
//! lookups:
//!
//! - [`min_key`](TreeMap::min_key) / [`max_key`](TreeMap::max_key) - the smallest and largest key
//! - [`floor_key`](TreeMap::floor_key) - the greatest key less than or equal to a probe
//! - [`ceil_key`](TreeMap::ceil_key) - the least key greater than or equal to a probe
//! - [`contains_value`](TreeMap::contains_value) - a full scan for a value
//!
//! # Example
//!
//! ```
//! use bst_map::{TreeMap, TreeMapError};
//!
//! let mut ports = TreeMap::new();
//! ports.insert(22, "ssh")?;
//! ports.insert(80, "http")?;
//! ports.insert(443, "https")?;
//!
//! assert_eq!(ports.get(&80), Ok(&"http"));
//! assert_eq!(ports.floor_key(&100), Ok(&80));
//! assert_eq!(ports.ceil_key(&100), Ok(&443));
//!
//! // Keys are never silently overwritten.
//! assert_eq!(ports.insert(80, "www"), Err(TreeMapError::DuplicateKey));
//! # Ok::<(), TreeMapError>(())
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Fallible API** - Every precondition violation is reported as a [`TreeMapError`]
//! - **Arena storage** - Nodes live in one contiguous arena and refer to their children by index
//!
//! # Implementation
//!
//! The tree is not rebalanced. Lookups, insertions and removals take time
//! proportional to the depth of the tree: O(log n) on average for keys
//! inserted in random order, and O(n) when keys arrive already sorted. Every
//! walk is iterative, so a degenerate tree costs time but never stack.

#![no_std]
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod raw;

pub mod tree_map;

pub use error::TreeMapError;
pub use tree_map::TreeMap;
