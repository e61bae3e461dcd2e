use core::borrow::Borrow;
use core::cmp::Ordering;
use core::iter::FusedIterator;
use core::mem;

use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Node, Side};
use crate::TreeMapError;

/// Stack used by the depth-first walks. Trees deeper than the inline size spill to the heap.
type Stack = SmallVec<[Handle; 32]>;

/// A place that can hold a node handle: the root pointer or a child field.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Slot {
    Root,
    Child(Handle, Side),
}

/// The unbalanced binary search tree backing `TreeMap`.
#[derive(Clone)]
pub(crate) struct RawTreeMap<K, V> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<K, V>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// Number of nodes reachable from `root`.
    len: usize,
}

impl<K, V> RawTreeMap<K, V> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
        }
    }

    /// Creates a new tree with room for `capacity` nodes.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
            len: 0,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Drops every node.
    pub(crate) fn clear(&mut self) {
        tracing::trace!(len = self.len, "clearing tree");
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    fn slot(&self, slot: Slot) -> Option<Handle> {
        match slot {
            Slot::Root => self.root,
            Slot::Child(parent, side) => self.nodes.get(parent).child(side),
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Option<Handle> {
        match slot {
            Slot::Root => &mut self.root,
            Slot::Child(parent, side) => self.nodes.get_mut(parent).child_mut(side),
        }
    }

    /// Follows `side` links from the node in `slot` until the last node on that spine.
    /// Returns that node and the slot holding it.
    fn extreme_from(&self, mut slot: Slot, side: Side) -> Option<(Slot, Handle)> {
        let mut current = self.slot(slot)?;
        while let Some(next) = self.nodes.get(current).child(side) {
            slot = Slot::Child(current, side);
            current = next;
        }
        Some((slot, current))
    }

    /// Smallest (`Side::Left`) or largest (`Side::Right`) key in the tree.
    pub(crate) fn extreme_key(&self, side: Side) -> Option<&K> {
        let (_, handle) = self.extreme_from(Slot::Root, side)?;
        Some(&self.nodes.get(handle).key)
    }

    /// Detaches the node in `slot` from the tree, splicing its only child into
    /// the slot, and releases its arena slot.
    fn excise(&mut self, slot: Slot, handle: Handle) -> Node<K, V> {
        let mut node = self.nodes.take(handle);
        *self.slot_mut(slot) = node.take_only_child();
        node
    }

    /// Preorder search for a node holding `value`.
    pub(crate) fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        let mut stack: Stack = self.root.into_iter().collect();
        while let Some(handle) = stack.pop() {
            let node = self.nodes.get(handle);
            if node.value == *value {
                return true;
            }
            // Right first so the left subtree is visited first.
            stack.extend(node.right);
            stack.extend(node.left);
        }
        false
    }

    /// Entries in ascending key order.
    pub(crate) fn in_order(&self) -> InOrder<'_, K, V> {
        let mut iter = InOrder {
            nodes: &self.nodes,
            stack: Stack::new(),
            remaining: self.len,
        };
        iter.push_left_spine(self.root);
        iter
    }
}

impl<K: Ord, V> RawTreeMap<K, V> {
    /// Walks down from the root and returns the slot that holds `key`, or the
    /// empty slot where it would be inserted, together with its depth.
    fn find_slot<Q>(&self, key: &Q) -> (Slot, usize)
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut slot = Slot::Root;
        let mut depth = 0;
        while let Some(handle) = self.slot(slot) {
            let side = match key.cmp(self.nodes.get(handle).key.borrow()) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => break,
            };
            slot = Slot::Child(handle, side);
            depth += 1;
        }
        (slot, depth)
    }

    fn search<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            current = match key.cmp(node.key.borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(handle),
            };
        }
        None
    }

    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.search(key)?;
        Some(&self.nodes.get(handle).value)
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.search(key)?;
        Some(&mut self.nodes.get_mut(handle).value)
    }

    pub(crate) fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.search(key).is_some()
    }

    /// Adds a new leaf for `key`. Existing entries are never replaced.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Result<(), TreeMapError> {
        let (slot, depth) = self.find_slot(&key);
        if self.slot(slot).is_some() {
            return Err(TreeMapError::DuplicateKey);
        }

        let handle = self.nodes.alloc(Node::new(key, value));
        *self.slot_mut(slot) = Some(handle);
        self.len += 1;
        debug_assert_eq!(self.nodes.len(), self.len);
        tracing::trace!(depth, len = self.len, "inserted entry");
        Ok(())
    }

    /// Removes the entry for `key` and returns it.
    ///
    /// A node with two children takes over the entry of its in-order successor,
    /// and the successor's own node is cut out of the right subtree, so exactly
    /// one node leaves the tree either way.
    pub(crate) fn remove_entry<Q>(&mut self, key: &Q) -> Result<(K, V), TreeMapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let (slot, _) = self.find_slot(key);
        let handle = self.slot(slot).ok_or(TreeMapError::KeyNotFound)?;

        let successor = if self.nodes.get(handle).has_both_children() {
            self.extreme_from(Slot::Child(handle, Side::Right), Side::Left)
        } else {
            None
        };

        let two_children = successor.is_some();
        let entry = match successor {
            Some((successor_slot, successor)) => {
                let mut donor = self.excise(successor_slot, successor);
                let node = self.nodes.get_mut(handle);
                mem::swap(&mut node.key, &mut donor.key);
                mem::swap(&mut node.value, &mut donor.value);
                (donor.key, donor.value)
            }
            None => {
                let node = self.excise(slot, handle);
                (node.key, node.value)
            }
        };

        self.len -= 1;
        debug_assert_eq!(self.nodes.len(), self.len);
        tracing::trace!(two_children, len = self.len, "removed entry");
        Ok(entry)
    }

    /// Greatest key less than or equal to `key`.
    pub(crate) fn floor_key<Q>(&self, key: &Q) -> Result<&K, TreeMapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let min = self.extreme_key(Side::Left).ok_or(TreeMapError::EmptyMap)?;
        match key.cmp(min.borrow()) {
            Ordering::Less => return Err(TreeMapError::InvalidKey),
            Ordering::Equal => return Ok(min),
            Ordering::Greater => {}
        }

        let mut candidate = min;
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            current = match key.cmp(node.key.borrow()) {
                Ordering::Equal => return Ok(&node.key),
                Ordering::Less => node.left,
                Ordering::Greater => {
                    candidate = &node.key;
                    node.right
                }
            };
        }
        Ok(candidate)
    }

    /// Least key greater than or equal to `key`.
    pub(crate) fn ceil_key<Q>(&self, key: &Q) -> Result<&K, TreeMapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let max = self.extreme_key(Side::Right).ok_or(TreeMapError::EmptyMap)?;
        match key.cmp(max.borrow()) {
            Ordering::Greater => return Err(TreeMapError::InvalidKey),
            Ordering::Equal => return Ok(max),
            Ordering::Less => {}
        }

        let mut candidate = max;
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            current = match key.cmp(node.key.borrow()) {
                Ordering::Equal => return Ok(&node.key),
                Ordering::Greater => node.right,
                Ordering::Less => {
                    candidate = &node.key;
                    node.left
                }
            };
        }
        Ok(candidate)
    }
}

/// In-order walk over a tree's entries.
pub(crate) struct InOrder<'a, K, V> {
    nodes: &'a Arena<Node<K, V>>,
    stack: Stack,
    remaining: usize,
}

impl<K, V> InOrder<'_, K, V> {
    fn push_left_spine(&mut self, mut current: Option<Handle>) {
        while let Some(handle) = current {
            self.stack.push(handle);
            current = self.nodes.get(handle).left;
        }
    }
}

impl<'a, K, V> Iterator for InOrder<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.stack.pop()?;
        let node: &'a Node<K, V> = self.nodes.get(handle);
        self.push_left_spine(node.right);
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for InOrder<'_, K, V> {}

impl<K, V> FusedIterator for InOrder<'_, K, V> {}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::manual_assert, clippy::uninlined_format_args)]
mod tests {
    use super::*;
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec::Vec;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    impl<K: Ord + core::fmt::Debug, V> RawTreeMap<K, V> {
        /// Panics with a descriptive message if the tree is corrupt.
        pub(crate) fn validate_invariants(&self) {
            let mut errors: Vec<String> = Vec::new();

            // Search order: the in-order walk must be strictly increasing.
            let keys: Vec<&K> = self.in_order().map(|(k, _)| k).collect();
            for pair in keys.windows(2) {
                if pair[0] >= pair[1] {
                    errors.push(alloc::format!("keys out of order: {:?} before {:?}", pair[0], pair[1]));
                }
            }

            // Every live arena slot is reachable exactly once, and nothing else is.
            let mut reachable: Vec<usize> = Vec::new();
            let mut stack: Vec<Handle> = self.root.into_iter().collect();
            while let Some(handle) = stack.pop() {
                reachable.push(handle.to_index());
                let node = self.nodes.get(handle);
                stack.extend(node.left);
                stack.extend(node.right);
            }
            let mut sorted = reachable.clone();
            sorted.sort_unstable();
            sorted.dedup();
            if sorted.len() != reachable.len() {
                errors.push(String::from("a node is reachable more than once"));
            }
            let live: Vec<usize> = self.nodes.live_handles().map(Handle::to_index).collect();
            if sorted != live {
                errors.push(alloc::format!("reachable nodes {:?} differ from live slots {:?}", sorted, live));
            }

            if self.len != reachable.len() {
                errors.push(alloc::format!("len mismatch: self.len={}, reachable={}", self.len, reachable.len()));
            }
            if keys.len() != self.len {
                errors.push(alloc::format!("in-order walk yielded {} keys, len is {}", keys.len(), self.len));
            }
            if self.root.is_none() != (self.len == 0) {
                errors.push(alloc::format!("root presence disagrees with len {}", self.len));
            }

            assert!(errors.is_empty(), "Tree invariant violations:\n{}", errors.join("\n"));
        }

        fn keys(&self) -> Vec<&K> {
            self.in_order().map(|(k, _)| k).collect()
        }

        fn depth(&self) -> usize {
            let mut deepest = 0;
            let mut stack: Vec<(Handle, usize)> = self.root.into_iter().map(|h| (h, 1)).collect();
            while let Some((handle, depth)) = stack.pop() {
                deepest = deepest.max(depth);
                let node = self.nodes.get(handle);
                stack.extend(node.left.map(|h| (h, depth + 1)));
                stack.extend(node.right.map(|h| (h, depth + 1)));
            }
            deepest
        }
    }

    fn tree_from(keys: &[i32]) -> RawTreeMap<i32, i32> {
        let mut tree = RawTreeMap::new();
        for &key in keys {
            tree.insert(key, key * 10).expect("keys are unique");
        }
        tree.validate_invariants();
        tree
    }

    #[test]
    fn empty_tree() {
        let tree: RawTreeMap<i32, i32> = RawTreeMap::new();
        tree.validate_invariants();

        assert!(tree.is_empty());
        assert_eq!(tree.extreme_key(Side::Left), None);
        assert_eq!(tree.extreme_key(Side::Right), None);
        assert_eq!(tree.floor_key(&0), Err(TreeMapError::EmptyMap));
        assert_eq!(tree.ceil_key(&0), Err(TreeMapError::EmptyMap));
        assert!(!tree.contains_value(&0));
        assert_eq!(tree.in_order().len(), 0);
    }

    #[test]
    fn duplicate_insert_leaves_tree_untouched() {
        let mut tree = tree_from(&[5, 3, 8]);
        assert_eq!(tree.insert(3, 999), Err(TreeMapError::DuplicateKey));
        tree.validate_invariants();
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.get(&3), Some(&30));
    }

    #[test]
    fn remove_leaf() {
        let mut tree = tree_from(&[5, 3, 8]);
        assert_eq!(tree.remove_entry(&3), Ok((3, 30)));
        tree.validate_invariants();
        assert_eq!(tree.keys(), [&5, &8]);
    }

    #[test]
    fn remove_node_with_one_child() {
        let mut tree = tree_from(&[5, 3, 1]);
        assert_eq!(tree.remove_entry(&3), Ok((3, 30)));
        tree.validate_invariants();
        assert_eq!(tree.keys(), [&1, &5]);
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn remove_two_children_successor_is_right_child() {
        // 8 has no left child, so it is 5's successor and sits directly in 5's right slot.
        let mut tree = tree_from(&[5, 3, 8, 1, 4]);
        assert_eq!(tree.remove_entry(&5), Ok((5, 50)));
        tree.validate_invariants();

        assert_eq!(tree.len(), 4);
        assert!(!tree.contains_key(&5));
        assert_eq!(tree.get(&8), Some(&80));
        assert_eq!(tree.keys(), [&1, &3, &4, &8]);
    }

    #[test]
    fn remove_two_children_deep_successor_with_right_child() {
        // Successor of 10 is 12, which has a right child 13 that must be spliced up.
        let mut tree = tree_from(&[10, 5, 20, 15, 25, 12, 13]);
        assert_eq!(tree.remove_entry(&10), Ok((10, 100)));
        tree.validate_invariants();

        assert_eq!(tree.keys(), [&5, &12, &13, &15, &20, &25]);
        assert_eq!(tree.get(&12), Some(&120));
        assert_eq!(tree.get(&13), Some(&130));
    }

    #[test]
    fn removing_middle_keys_drains_tree() {
        let mut tree = tree_from(&[50, 30, 70, 20, 40, 60, 80, 35, 45, 65]);
        loop {
            let Some(key) = tree.keys().get(tree.len() / 2).map(|key| **key) else {
                break;
            };
            tree.remove_entry(&key).expect("key is present");
            tree.validate_invariants();
        }
        assert!(tree.is_empty());
        assert_eq!(tree.nodes.len(), 0);
    }

    #[test]
    fn remove_absent_key() {
        let mut tree = tree_from(&[2, 1, 3]);
        assert_eq!(tree.remove_entry(&4), Err(TreeMapError::KeyNotFound));
        tree.validate_invariants();
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn floor_and_ceil_on_example() {
        let tree = tree_from(&[5, 3, 8, 1, 4]);
        assert_eq!(tree.floor_key(&6), Ok(&5));
        assert_eq!(tree.ceil_key(&6), Ok(&8));
        assert_eq!(tree.floor_key(&2), Ok(&1));
        assert_eq!(tree.ceil_key(&2), Ok(&3));
        assert_eq!(tree.floor_key(&100), Ok(&8));
        assert_eq!(tree.ceil_key(&-100), Ok(&1));
        assert_eq!(tree.floor_key(&0), Err(TreeMapError::InvalidKey));
        assert_eq!(tree.ceil_key(&9), Err(TreeMapError::InvalidKey));
    }

    #[test]
    fn floor_candidate_primed_when_descent_only_goes_left() {
        // Descending chain 40 > 30 > 20 > 10; floor(15) goes left three times
        // before the only right move at 10.
        let tree = tree_from(&[40, 30, 20, 10]);
        assert_eq!(tree.floor_key(&15), Ok(&10));
        assert_eq!(tree.ceil_key(&15), Ok(&20));
        assert_eq!(tree.ceil_key(&35), Ok(&40));
    }

    #[test]
    fn ceil_candidate_primed_when_descent_only_goes_right() {
        let tree = tree_from(&[10, 20, 30, 40]);
        assert_eq!(tree.ceil_key(&35), Ok(&40));
        assert_eq!(tree.floor_key(&35), Ok(&30));
        assert_eq!(tree.floor_key(&15), Ok(&10));
    }

    #[test]
    fn contains_value_scans_whole_tree() {
        let tree = tree_from(&[5, 3, 8, 1, 4]);
        for key in [5, 3, 8, 1, 4] {
            assert!(tree.contains_value(&(key * 10)));
        }
        assert!(!tree.contains_value(&7));
    }

    #[test]
    fn degenerate_tree_does_not_recurse() {
        let keys: Vec<i32> = (0..10_000).collect();
        let mut tree = tree_from(&keys);
        assert_eq!(tree.depth(), 10_000);
        assert_eq!(tree.floor_key(&9_999), Ok(&9_999));
        assert_eq!(tree.ceil_key(&-1), Ok(&0));
        assert!(tree.contains_value(&99_990));

        for key in (0..10_000).rev() {
            tree.remove_entry(&key).expect("key is present");
        }
        tree.validate_invariants();
        assert!(tree.is_empty());
    }

    #[test]
    fn get_mut_updates_value() {
        let mut tree = tree_from(&[2, 1, 3]);
        *tree.get_mut(&1).expect("key is present") = -1;
        assert_eq!(tree.get(&1), Some(&-1));
        assert_eq!(tree.get_mut(&9), None);
    }

    #[test]
    fn clear_releases_every_node() {
        let mut tree = tree_from(&[2, 1, 3]);
        tree.clear();
        tree.validate_invariants();
        assert_eq!(tree.nodes.len(), 0);
        tree.insert(7, 70).expect("tree is empty");
        tree.validate_invariants();
    }

    #[test]
    fn clone_is_independent() {
        let mut tree = tree_from(&[2, 1, 3]);
        let copy = tree.clone();
        tree.remove_entry(&2).expect("key is present");
        copy.validate_invariants();
        assert_eq!(copy.keys(), [&1, &2, &3]);
        assert_eq!(tree.keys(), [&1, &3]);
    }

    #[derive(Clone, Debug)]
    enum Op {
        Insert(i32),
        Remove(i32),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (0i32..500).prop_map(Op::Insert),
            2 => (0i32..500).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn invariants_hold_after_every_operation(ops in prop::collection::vec(op_strategy(), 0..400)) {
            let mut tree: RawTreeMap<i32, i32> = RawTreeMap::new();
            let mut model: BTreeMap<i32, i32> = BTreeMap::new();

            for op in ops {
                match op {
                    Op::Insert(key) => {
                        let expected = if model.contains_key(&key) {
                            Err(TreeMapError::DuplicateKey)
                        } else {
                            model.insert(key, key * 2);
                            Ok(())
                        };
                        prop_assert_eq!(tree.insert(key, key * 2), expected);
                    }
                    Op::Remove(key) => {
                        let expected = model.remove_entry(&key).ok_or(TreeMapError::KeyNotFound);
                        prop_assert_eq!(tree.remove_entry(&key), expected);
                    }
                }
                tree.validate_invariants();
                prop_assert_eq!(tree.len(), model.len());
            }

            let entries: Vec<(&i32, &i32)> = tree.in_order().collect();
            let expected: Vec<(&i32, &i32)> = model.iter().collect();
            prop_assert_eq!(entries, expected);
        }

        #[test]
        fn floor_and_ceil_match_model(
            keys in prop::collection::btree_set(-1000i32..1000, 1..200),
            probes in prop::collection::vec(-1100i32..1100, 1..50),
        ) {
            let mut tree: RawTreeMap<i32, ()> = RawTreeMap::new();
            for &key in &keys {
                tree.insert(key, ()).expect("keys are unique");
            }

            for probe in probes {
                let floor = keys.range(..=probe).next_back().ok_or(TreeMapError::InvalidKey);
                let ceil = keys.range(probe..).next().ok_or(TreeMapError::InvalidKey);
                prop_assert_eq!(tree.floor_key(&probe), floor);
                prop_assert_eq!(tree.ceil_key(&probe), ceil);
            }
        }
    }
}
