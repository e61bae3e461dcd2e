use super::handle::Handle;

/// A single entry of the search tree.
///
/// Children are referenced by handle. Each handle is held by exactly one slot
/// (the root or a parent's `left`/`right`), so the arena always describes a
/// strict tree.
#[derive(Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
}

/// Which child slot of a node to follow.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl<K, V> Node<K, V> {
    /// Creates a leaf holding `key` and `value`.
    pub(crate) const fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) const fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) const fn child_mut(&mut self, side: Side) -> &mut Option<Handle> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub(crate) const fn has_both_children(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }

    /// Detaches and returns the only child, if any.
    ///
    /// Must not be called on a node with two children.
    pub(crate) fn take_only_child(&mut self) -> Option<Handle> {
        debug_assert!(!self.has_both_children(), "`Node::take_only_child()` - node has two children!");
        self.left.take().or_else(|| self.right.take())
    }
}
