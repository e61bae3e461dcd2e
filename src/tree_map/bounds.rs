use core::borrow::Borrow;

use super::TreeMap;
use crate::TreeMapError;
use crate::raw::Side;

impl<K, V> TreeMap<K, V> {
    /// Returns the smallest key in the map.
    ///
    /// # Errors
    ///
    /// Returns [`TreeMapError::EmptyMap`] if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_map::{TreeMap, TreeMapError};
    ///
    /// let mut map = TreeMap::new();
    /// assert_eq!(map.min_key(), Err(TreeMapError::EmptyMap));
    /// map.insert(2, "b").unwrap();
    /// map.insert(1, "a").unwrap();
    /// assert_eq!(map.min_key(), Ok(&1));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(depth)
    pub fn min_key(&self) -> Result<&K, TreeMapError> {
        self.raw.extreme_key(Side::Left).ok_or(TreeMapError::EmptyMap)
    }

    /// Returns the largest key in the map.
    ///
    /// # Errors
    ///
    /// Returns [`TreeMapError::EmptyMap`] if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_map::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// map.insert(1, "a").unwrap();
    /// map.insert(2, "b").unwrap();
    /// assert_eq!(map.max_key(), Ok(&2));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(depth)
    pub fn max_key(&self) -> Result<&K, TreeMapError> {
        self.raw.extreme_key(Side::Right).ok_or(TreeMapError::EmptyMap)
    }
}

impl<K: Ord, V> TreeMap<K, V> {
    /// Returns the greatest key in the map that is less than or equal to `key`.
    ///
    /// # Errors
    ///
    /// - [`TreeMapError::EmptyMap`] if the map is empty.
    /// - [`TreeMapError::InvalidKey`] if `key` is less than every key in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_map::{TreeMap, TreeMapError};
    ///
    /// let mut map = TreeMap::new();
    /// for key in [5, 3, 8, 1, 4] {
    ///     map.insert(key, ()).unwrap();
    /// }
    /// assert_eq!(map.floor_key(&6), Ok(&5));
    /// assert_eq!(map.floor_key(&4), Ok(&4));
    /// assert_eq!(map.floor_key(&0), Err(TreeMapError::InvalidKey));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(depth)
    pub fn floor_key<Q>(&self, key: &Q) -> Result<&K, TreeMapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.floor_key(key)
    }

    /// Returns the least key in the map that is greater than or equal to `key`.
    ///
    /// # Errors
    ///
    /// - [`TreeMapError::EmptyMap`] if the map is empty.
    /// - [`TreeMapError::InvalidKey`] if `key` is greater than every key in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_map::{TreeMap, TreeMapError};
    ///
    /// let mut map = TreeMap::new();
    /// for key in [5, 3, 8, 1, 4] {
    ///     map.insert(key, ()).unwrap();
    /// }
    /// assert_eq!(map.ceil_key(&6), Ok(&8));
    /// assert_eq!(map.ceil_key(&3), Ok(&3));
    /// assert_eq!(map.ceil_key(&9), Err(TreeMapError::InvalidKey));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(depth)
    pub fn ceil_key<Q>(&self, key: &Q) -> Result<&K, TreeMapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.ceil_key(key)
    }
}
