use thiserror::Error;

/// Reasons a [`TreeMap`](crate::TreeMap) operation can be rejected.
///
/// A failed operation never changes the map.
///
/// # Examples
///
/// ```
/// use bst_map::{TreeMap, TreeMapError};
///
/// let mut map = TreeMap::new();
/// map.insert(1, "a").unwrap();
///
/// assert_eq!(map.insert(1, "b"), Err(TreeMapError::DuplicateKey));
/// assert_eq!(map.get(&2), Err(TreeMapError::KeyNotFound));
/// assert_eq!(map.floor_key(&0), Err(TreeMapError::InvalidKey));
///
/// map.clear();
/// assert_eq!(map.min_key(), Err(TreeMapError::EmptyMap));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Error)]
pub enum TreeMapError {
    /// The map holds no entries, so it has no minimum, maximum, floor or ceiling.
    #[error("map is empty")]
    EmptyMap,
    /// No entry with the requested key exists.
    #[error("key not found")]
    KeyNotFound,
    /// An entry with the key already exists; insertion never overwrites.
    #[error("key already exists")]
    DuplicateKey,
    /// The key lies outside the map's key range, so no floor or ceiling exists.
    #[error("key is outside the range of keys in the map")]
    InvalidKey,
}
