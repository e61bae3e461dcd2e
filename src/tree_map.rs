use core::borrow::Borrow;
use core::fmt;
use core::ops::Index;

use crate::TreeMapError;
use crate::raw::RawTreeMap;

mod bounds;
mod capacity;

/// An ordered map based on an unbalanced [binary search tree].
///
/// Given a key type with a [total order], the map stores its entries in key
/// order. Keys must implement [`Ord`] such that two keys can always be compared
/// to determine their [`Ordering`](core::cmp::Ordering).
///
/// Unlike the standard library maps, `TreeMap` never overwrites an entry:
/// [`insert`](TreeMap::insert) on a present key fails with
/// [`TreeMapError::DuplicateKey`], and lookups of absent keys report
/// [`TreeMapError::KeyNotFound`] instead of returning `None`. A failed
/// operation leaves the map unchanged.
///
/// The tree is never rebalanced, so the cost of keyed operations depends on
/// insertion order: O(log n) on average for randomly ordered keys, O(n) in the
/// worst case (for example when keys are inserted in sorted order).
///
/// It is a logic error for a key to be modified in such a way that the key's
/// ordering relative to any other key, as determined by the [`Ord`] trait,
/// changes while it is in the map. The behavior resulting from such a logic
/// error is not specified, but will be encapsulated to the `TreeMap` that
/// observed it and not result in undefined behavior.
///
/// `TreeMap` has no internal synchronization. Share it between threads behind
/// a lock if more than one thread needs it.
///
/// [binary search tree]: https://en.wikipedia.org/wiki/Binary_search_tree
/// [total order]: https://en.wikipedia.org/wiki/Total_order
///
/// # Examples
///
/// ```
/// use bst_map::{TreeMap, TreeMapError};
///
/// let mut stock = TreeMap::new();
/// stock.insert("apples", 3)?;
/// stock.insert("pears", 0)?;
/// stock.insert("plums", 12)?;
///
/// // Look up a single entry.
/// assert_eq!(stock.get("plums"), Ok(&12));
/// assert_eq!(stock.get("kiwis"), Err(TreeMapError::KeyNotFound));
///
/// // Update in place.
/// *stock.get_mut("pears")? += 5;
/// assert_eq!(stock["pears"], 5);
///
/// // Nearest keys.
/// assert_eq!(stock.floor_key("oranges"), Ok(&"apples"));
/// assert_eq!(stock.ceil_key("oranges"), Ok(&"pears"));
///
/// assert_eq!(stock.remove("apples"), Ok(3));
/// assert_eq!(stock.len(), 2);
/// # Ok::<(), TreeMapError>(())
/// ```
pub struct TreeMap<K, V> {
    raw: RawTreeMap<K, V>,
}

impl<K, V> TreeMap<K, V> {
    /// Makes a new, empty `TreeMap`.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_map::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// map.insert(1, "a").unwrap();
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        TreeMap { raw: RawTreeMap::new() }
    }

    /// Returns the number of entries in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_map::TreeMap;
    ///
    /// let mut a = TreeMap::new();
    /// assert_eq!(a.len(), 0);
    /// a.insert(1, "a").unwrap();
    /// assert_eq!(a.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_map::TreeMap;
    ///
    /// let mut a = TreeMap::new();
    /// assert!(a.is_empty());
    /// a.insert(1, "a").unwrap();
    /// assert!(!a.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Clears the map, removing all entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_map::TreeMap;
    ///
    /// let mut a = TreeMap::new();
    /// a.insert(1, "a").unwrap();
    /// a.clear();
    /// assert!(a.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns `true` if any entry of the map holds `value`.
    ///
    /// Values are not ordered, so every entry may have to be visited.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_map::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// map.insert(1, "a").unwrap();
    /// assert!(map.contains_value(&"a"));
    /// assert!(!map.contains_value(&"b"));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    #[must_use]
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.raw.contains_value(value)
    }
}

impl<K: Ord, V> TreeMap<K, V> {
    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the ordering
    /// on the borrowed form *must* match the ordering on the key type.
    ///
    /// # Errors
    ///
    /// Returns [`TreeMapError::KeyNotFound`] if the map is empty or holds no
    /// entry for `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_map::{TreeMap, TreeMapError};
    ///
    /// let mut map = TreeMap::new();
    /// map.insert(1, "a").unwrap();
    /// assert_eq!(map.get(&1), Ok(&"a"));
    /// assert_eq!(map.get(&2), Err(TreeMapError::KeyNotFound));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(depth): O(log n) on average, O(n) worst case.
    pub fn get<Q>(&self, key: &Q) -> Result<&V, TreeMapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get(key).ok_or(TreeMapError::KeyNotFound)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Errors
    ///
    /// Returns [`TreeMapError::KeyNotFound`] if the map holds no entry for `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_map::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// map.insert(1, "a").unwrap();
    /// if let Ok(x) = map.get_mut(&1) {
    ///     *x = "b";
    /// }
    /// assert_eq!(map[&1], "b");
    /// ```
    ///
    /// # Complexity
    ///
    /// O(depth)
    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<&mut V, TreeMapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get_mut(key).ok_or(TreeMapError::KeyNotFound)
    }

    /// Returns `true` if the map contains an entry for the specified key.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_map::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// map.insert(1, "a").unwrap();
    /// assert!(map.contains_key(&1));
    /// assert!(!map.contains_key(&2));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(depth)
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.contains_key(key)
    }

    /// Inserts a new key-value pair into the map.
    ///
    /// # Errors
    ///
    /// Returns [`TreeMapError::DuplicateKey`] if the map already holds an entry
    /// for `key`. The existing entry is kept, and `key` and `value` are dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_map::{TreeMap, TreeMapError};
    ///
    /// let mut map = TreeMap::new();
    /// assert_eq!(map.insert(37, "a"), Ok(()));
    /// assert_eq!(map.insert(37, "b"), Err(TreeMapError::DuplicateKey));
    /// assert_eq!(map[&37], "a");
    /// ```
    ///
    /// # Complexity
    ///
    /// O(depth)
    pub fn insert(&mut self, key: K, value: V) -> Result<(), TreeMapError> {
        self.raw.insert(key, value)
    }

    /// Removes a key from the map, returning its value.
    ///
    /// # Errors
    ///
    /// Returns [`TreeMapError::KeyNotFound`] if the map holds no entry for `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_map::{TreeMap, TreeMapError};
    ///
    /// let mut map = TreeMap::new();
    /// map.insert(1, "a").unwrap();
    /// assert_eq!(map.remove(&1), Ok("a"));
    /// assert_eq!(map.remove(&1), Err(TreeMapError::KeyNotFound));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(depth)
    pub fn remove<Q>(&mut self, key: &Q) -> Result<V, TreeMapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes a key from the map, returning the stored key and value.
    ///
    /// # Errors
    ///
    /// Returns [`TreeMapError::KeyNotFound`] if the map holds no entry for `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_map::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// map.insert(1, "a").unwrap();
    /// assert_eq!(map.remove_entry(&1), Ok((1, "a")));
    /// assert!(map.remove_entry(&1).is_err());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(depth)
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Result<(K, V), TreeMapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove_entry(key)
    }
}

impl<K: Clone, V: Clone> Clone for TreeMap<K, V> {
    fn clone(&self) -> Self {
        TreeMap { raw: self.raw.clone() }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for TreeMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.raw.in_order()).finish()
    }
}

impl<K, V> Default for TreeMap<K, V> {
    /// Creates an empty `TreeMap`.
    fn default() -> TreeMap<K, V> {
        TreeMap::new()
    }
}

impl<K, Q, V> Index<&Q> for TreeMap<K, V>
where
    K: Borrow<Q> + Ord,
    Q: ?Sized + Ord,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the `TreeMap`.
    fn index(&self, key: &Q) -> &V {
        self.raw.get(key).expect("key not found")
    }
}
