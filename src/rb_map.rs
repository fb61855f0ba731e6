//! An ordered map implemented as a red-black tree over slab-allocated nodes.

use std::fmt::{Debug, Formatter};
use std::iter::FusedIterator;
use tracing::trace;

use crate::arena::{next_owner_id, Arena, Key};
use crate::compare::{Compare, Natural};
use crate::error::{Error, Result};

const LEFT: usize = 0;
const RIGHT: usize = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Color {
    Red,
    Black,
}

#[derive(Clone)]
struct Node<K, V> {
    key: K,
    val: V,
    color: Color,
    parent: Option<Key>,
    kids: [Option<Key>; 2],
}

type Nodes<K, V> = Arena<Node<K, V>>;

// The extreme node of the subtree at `k` in direction `dir`.
fn edge<K, V>(nodes: &Nodes<K, V>, mut k: Key, dir: usize) -> Key {
    while let Some(kid) = nodes[k].kids[dir] {
        k = kid;
    }
    k
}

// In-order neighbor of `k`: the successor for RIGHT, the predecessor for LEFT.
fn step<K, V>(nodes: &Nodes<K, V>, k: Key, dir: usize) -> Option<Key> {
    if let Some(kid) = nodes[k].kids[dir] {
        return Some(edge(nodes, kid, dir ^ 1));
    }

    let mut this = k;
    let mut up = nodes[k].parent;
    while let Some(p) = up {
        if nodes[p].kids[dir] != Some(this) {
            return Some(p);
        }
        this = p;
        up = nodes[p].parent;
    }
    None
}

/// A place in an [`RbMap`]: an entry, or the one-past-the-end slot.
///
/// A position names one entry for as long as that entry stays in the map;
/// rebalancing never moves an entry to another node.  Once the entry is
/// erased, or the map is cleared, the map answers
/// [`Error::InvalidIterator`] for the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    owner: u64,
    node: Option<Key>,
}

/// A map sorted by key under the comparator `C`.
///
/// Keys are unique: two keys `a` and `b` are the same key when neither
/// `cmp.less(a, b)` nor `cmp.less(b, a)`.  Lookups, insertion and removal
/// take `O(log n)` time.
///
/// Besides the usual iterator API the map hands out [`Position`]s, which
/// can be stepped forwards and backwards with [`next`](#method.next) and
/// [`prev`](#method.prev) and stay attached to their entry while other
/// entries come and go.
///
/// # Examples
/// ```
/// use cursor_collections::RbMap;
///
/// let mut m = RbMap::new();
/// assert!(m.insert(3, "c").1);
/// assert!(m.insert(1, "a").1);
/// assert!(!m.insert(3, "x").1);
///
/// assert_eq!(m.at(&3), Ok(&"c"));
/// assert_eq!(m.keys().copied().collect::<Vec<_>>(), [1, 3]);
/// ```
pub struct RbMap<K, V, C = Natural> {
    nodes: Nodes<K, V>,
    root: Option<Key>,
    // leftmost node, kept for begin()
    head: Option<Key>,
    cmp: C,
    owner: u64,
}

impl<K: Ord, V> RbMap<K, V> {
    /// Creates an empty map ordered by `K`'s [`Ord`] implementation.
    ///
    /// # Examples
    /// ```
    /// use cursor_collections::RbMap;
    /// let m: RbMap<usize, usize> = RbMap::new();
    /// assert!(m.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }
}

impl<K, V, C: Compare<K>> RbMap<K, V, C> {
    /// Creates an empty map ordered by `cmp`.
    ///
    /// # Examples
    /// ```
    /// use cursor_collections::{RbMap, Reversed};
    ///
    /// let m: RbMap<_, _, _> = {
    ///     let mut m = RbMap::with_comparator(Reversed);
    ///     m.insert(1, ());
    ///     m.insert(2, ());
    ///     m
    /// };
    /// assert_eq!(m.keys().copied().collect::<Vec<_>>(), [2, 1]);
    /// ```
    pub fn with_comparator(cmp: C) -> Self {
        RbMap {
            nodes: Arena::new(),
            root: None,
            head: None,
            cmp,
            owner: next_owner_id(),
        }
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Drops every entry.  All outstanding positions become invalid.
    pub fn clear(&mut self) {
        trace!(len = self.len(), "clearing rb map");
        self.nodes.clear();
        self.root = None;
        self.head = None;
    }

    fn pos(&self, node: Option<Key>) -> Position {
        Position {
            owner: self.owner,
            node,
        }
    }

    fn color(&self, n: Option<Key>) -> Color {
        n.map_or(Color::Black, |k| self.nodes[k].color)
    }

    fn set_color(&mut self, k: Key, color: Color) {
        self.nodes[k].color = color;
    }

    // Which side of its parent `k` hangs on.  `k` must have a parent.
    fn side(&self, k: Key) -> usize {
        match self.nodes[k].parent {
            Some(p) if self.nodes[p].kids[LEFT] == Some(k) => LEFT,
            Some(_) => RIGHT,
            None => panic!("root has no side"),
        }
    }

    // Puts `new` where `old` hangs from its parent (or at the root).
    fn replace_child(&mut self, old: Key, new: Option<Key>) {
        let parent = self.nodes[old].parent;
        match parent {
            None => self.root = new,
            Some(p) => {
                let side = self.side(old);
                self.nodes[p].kids[side] = new;
            }
        }
        if let Some(n) = new {
            self.nodes[n].parent = parent;
        }
    }

    // Rotates `x` down towards `dir`, raising its child on the other side.
    //
    //    x(a, y(b, c))   =>   y(x(a, b), c)      (dir == LEFT)
    fn rotate(&mut self, x: Key, dir: usize) {
        let Some(y) = self.nodes[x].kids[dir ^ 1] else {
            panic!("rotation needs a child to raise");
        };

        let inner = self.nodes[y].kids[dir];
        self.nodes[x].kids[dir ^ 1] = inner;
        if let Some(b) = inner {
            self.nodes[b].parent = Some(x);
        }

        self.replace_child(x, Some(y));
        self.nodes[y].kids[dir] = Some(x);
        self.nodes[x].parent = Some(y);

        // The raised node takes over the color of the spot it now occupies.
        // Both rebalancing passes rely on this recolor.
        let x_color = self.nodes[x].color;
        self.nodes[x].color = self.nodes[y].color;
        self.nodes[y].color = x_color;
    }

    fn find_node(&self, key: &K) -> Option<Key> {
        let mut curr = self.root;
        while let Some(c) = curr {
            let n = &self.nodes[c];
            if self.cmp.less(key, &n.key) {
                curr = n.kids[LEFT];
            } else if self.cmp.less(&n.key, key) {
                curr = n.kids[RIGHT];
            } else {
                return Some(c);
            }
        }
        None
    }

    fn refresh_head(&mut self) {
        self.head = self.root.map(|r| edge(&self.nodes, r, LEFT));
    }

    fn insert_node(&mut self, key: K, val: V) -> (Key, bool) {
        let mut parent = None;
        let mut side = LEFT;
        let mut curr = self.root;
        while let Some(c) = curr {
            let n = &self.nodes[c];
            if self.cmp.less(&key, &n.key) {
                side = LEFT;
            } else if self.cmp.less(&n.key, &key) {
                side = RIGHT;
            } else {
                return (c, false);
            }
            parent = Some(c);
            curr = n.kids[side];
        }

        let color = match parent {
            None => Color::Black,
            Some(_) => Color::Red,
        };
        let k = self.nodes.insert(Node {
            key,
            val,
            color,
            parent,
            kids: [None, None],
        });
        match parent {
            None => self.root = Some(k),
            Some(p) => self.nodes[p].kids[side] = Some(k),
        }

        self.insert_fixup(k);
        self.refresh_head();
        (k, true)
    }

    fn insert_fixup(&mut self, mut x: Key) {
        while let Some(p) = self.nodes[x].parent {
            if self.nodes[p].color == Color::Black {
                break;
            }
            let Some(g) = self.nodes[p].parent else {
                break;
            };

            let p_side = self.side(p);
            let uncle = self.nodes[g].kids[p_side ^ 1];
            if let (Some(u), Color::Red) = (uncle, self.color(uncle)) {
                self.set_color(p, Color::Black);
                self.set_color(u, Color::Black);
                self.set_color(g, Color::Red);
                x = g;
                continue;
            }

            // An inner grandchild is first rotated into the outer spot.
            if self.nodes[p].kids[p_side ^ 1] == Some(x) {
                self.rotate(p, p_side);
            }
            self.rotate(g, p_side ^ 1);
            break;
        }

        if let Some(r) = self.root {
            self.set_color(r, Color::Black);
        }
    }

    // Exchanges the tree positions (links and colors) of `x` and its in-order
    // predecessor `y`, leaving both entries in their own nodes.
    fn swap_with_pred(&mut self, x: Key, y: Key) {
        let [xl, xr] = self.nodes[x].kids;
        let y_parent = self.nodes[y].parent;
        let [yl, yr] = self.nodes[y].kids;

        self.replace_child(x, Some(y));
        if xl == Some(y) {
            self.nodes[y].kids = [Some(x), xr];
            self.nodes[x].parent = Some(y);
        } else {
            self.nodes[y].kids = [xl, xr];
            if let Some(l) = xl {
                self.nodes[l].parent = Some(y);
            }
            // a predecessor below the left child is always a right child
            let Some(yp) = y_parent else {
                panic!("predecessor detached from tree");
            };
            self.nodes[yp].kids[RIGHT] = Some(x);
            self.nodes[x].parent = Some(yp);
        }
        if let Some(r) = xr {
            self.nodes[r].parent = Some(y);
        }

        self.nodes[x].kids = [yl, yr];
        for kid in [yl, yr].into_iter().flatten() {
            self.nodes[kid].parent = Some(x);
        }

        let x_color = self.nodes[x].color;
        self.nodes[x].color = self.nodes[y].color;
        self.nodes[y].color = x_color;
    }

    fn erase_node(&mut self, z: Key) -> (K, V) {
        if let [Some(l), Some(_)] = self.nodes[z].kids {
            let pred = edge(&self.nodes, l, RIGHT);
            self.swap_with_pred(z, pred);
        }

        let [l, r] = self.nodes[z].kids;
        match l.or(r) {
            Some(kid) => {
                if self.nodes[z].color == Color::Black {
                    self.set_color(kid, Color::Black);
                }
                self.replace_child(z, Some(kid));
            }
            None => {
                if self.nodes[z].color == Color::Black {
                    self.erase_fixup(z);
                }
                self.replace_child(z, None);
            }
        }

        let node = match self.nodes.remove(z) {
            Some(node) => node,
            None => panic!("erased node {:?} missing", z),
        };
        self.refresh_head();
        (node.key, node.val)
    }

    // Restores equal black heights before the black leaf `x` is unlinked.
    // `x` stands for one black too many on its side of the tree.
    fn erase_fixup(&mut self, mut x: Key) {
        while let Some(p) = self.nodes[x].parent {
            let side = self.side(x);
            let mut sib = self.nodes[p].kids[side ^ 1];
            if self.color(sib) == Color::Red {
                self.rotate(p, side);
                sib = self.nodes[p].kids[side ^ 1];
            }

            let Some(s) = sib else {
                self.set_color(p, Color::Black);
                return;
            };

            let far = self.nodes[s].kids[side ^ 1];
            let near = self.nodes[s].kids[side];
            if let (Some(f), Color::Red) = (far, self.color(far)) {
                self.set_color(f, Color::Black);
                self.rotate(p, side);
                return;
            }
            if let (Some(n), Color::Red) = (near, self.color(near)) {
                self.set_color(n, Color::Black);
                self.rotate(s, side ^ 1);
                self.rotate(p, side);
                return;
            }

            self.set_color(s, Color::Red);
            if self.nodes[p].color == Color::Red {
                self.set_color(p, Color::Black);
                return;
            }
            x = p;
        }
    }

    /// Inserts `key` with `val` unless an equivalent key is present.
    ///
    /// Returns the position of the entry holding `key` and whether an
    /// insertion happened.  An existing entry is left untouched.
    ///
    /// # Examples
    /// ```
    /// use cursor_collections::RbMap;
    ///
    /// let mut m = RbMap::new();
    /// let (p, fresh) = m.insert("k", 1);
    /// assert!(fresh);
    /// let (q, fresh) = m.insert("k", 2);
    /// assert!(!fresh);
    /// assert_eq!(p, q);
    /// assert_eq!(m.entry_at(q), Ok((&"k", &1)));
    /// ```
    pub fn insert(&mut self, key: K, val: V) -> (Position, bool) {
        let (k, inserted) = self.insert_node(key, val);
        (self.pos(Some(k)), inserted)
    }

    /// Returns the value for `key`, or `IndexOutOfBound` if it is absent.
    pub fn at(&self, key: &K) -> Result<&V> {
        self.get(key).ok_or(Error::IndexOutOfBound)
    }

    /// Mutable version of [`at`](#method.at).  Never inserts.
    pub fn at_mut(&mut self, key: &K) -> Result<&mut V> {
        self.get_mut(key).ok_or(Error::IndexOutOfBound)
    }

    /// Returns the value for `key`, if present.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.find_node(key).map(|k| &self.nodes[k].val)
    }

    /// Returns a mutable reference to the value for `key`, if present.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let k = self.find_node(key)?;
        Some(&mut self.nodes[k].val)
    }

    /// Returns the value for `key`, first inserting `V::default()` if the key
    /// is absent.
    ///
    /// # Examples
    /// ```
    /// use cursor_collections::RbMap;
    ///
    /// let mut counts = RbMap::new();
    /// for w in ["a", "b", "a"] {
    ///     *counts.get_or_default(w) += 1;
    /// }
    /// assert_eq!(counts.at(&"a"), Ok(&2));
    /// assert_eq!(counts.at(&"b"), Ok(&1));
    /// ```
    pub fn get_or_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        let k = match self.find_node(&key) {
            Some(k) => k,
            None => self.insert_node(key, V::default()).0,
        };
        &mut self.nodes[k].val
    }

    /// Returns the position of `key`, or `end()` if it is absent.
    pub fn find(&self, key: &K) -> Position {
        self.pos(self.find_node(key))
    }

    /// Returns 1 if `key` is present and 0 otherwise.
    pub fn count(&self, key: &K) -> usize {
        self.find_node(key).is_some() as usize
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &K) -> bool {
        self.find_node(key).is_some()
    }

    /// Removes `key` and returns its value, if it was present.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let k = self.find_node(key)?;
        Some(self.erase_node(k).1)
    }

    fn live_node(&self, pos: Position) -> Result<Key> {
        match pos.node {
            Some(k) if pos.owner == self.owner && self.nodes.contains(k) => Ok(k),
            _ => Err(Error::InvalidIterator),
        }
    }

    /// Removes the entry at `pos` and returns it.
    ///
    /// Fails with `InvalidIterator` for `end()`, for positions of entries
    /// that are gone, and for positions from another map.  Positions of all
    /// other entries remain valid.
    ///
    /// # Examples
    /// ```
    /// use cursor_collections::{Error, RbMap};
    ///
    /// let mut m: RbMap<_, _> = (0..4).map(|i| (i, i * 10)).collect();
    /// let p = m.find(&2);
    /// assert_eq!(m.erase(p), Ok((2, 20)));
    /// assert_eq!(m.erase(p), Err(Error::InvalidIterator));
    /// assert_eq!(m.erase(m.end()), Err(Error::InvalidIterator));
    /// assert_eq!(m.len(), 3);
    /// ```
    pub fn erase(&mut self, pos: Position) -> Result<(K, V)> {
        let k = self.live_node(pos)?;
        Ok(self.erase_node(k))
    }

    /// Position of the smallest entry, or `end()` if the map is empty.
    pub fn begin(&self) -> Position {
        self.pos(self.head)
    }

    /// The one-past-the-end position.
    pub fn end(&self) -> Position {
        self.pos(None)
    }

    /// Returns the position after `pos`.  Fails for `end()`.
    pub fn next(&self, pos: Position) -> Result<Position> {
        let k = self.live_node(pos)?;
        Ok(self.pos(step(&self.nodes, k, RIGHT)))
    }

    /// Returns the position before `pos`.  Fails for `begin()`, which
    /// includes `end()` of an empty map.
    pub fn prev(&self, pos: Position) -> Result<Position> {
        if pos.owner != self.owner || pos.node == self.head {
            return Err(Error::InvalidIterator);
        }
        let prev = match pos.node {
            None => self.root.map(|r| edge(&self.nodes, r, RIGHT)),
            Some(_) => step(&self.nodes, self.live_node(pos)?, LEFT),
        };
        match prev {
            Some(k) => Ok(self.pos(Some(k))),
            None => Err(Error::InvalidIterator),
        }
    }

    /// Returns the entry at `pos`.
    pub fn entry_at(&self, pos: Position) -> Result<(&K, &V)> {
        let n = &self.nodes[self.live_node(pos)?];
        Ok((&n.key, &n.val))
    }

    /// Returns the value at `pos` for modification.
    pub fn value_at_mut(&mut self, pos: Position) -> Result<&mut V> {
        let k = self.live_node(pos)?;
        Ok(&mut self.nodes[k].val)
    }

    /// Returns the entry with the smallest key.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.head.map(|k| {
            let n = &self.nodes[k];
            (&n.key, &n.val)
        })
    }

    /// Returns the entry with the largest key.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.root.map(|r| {
            let n = &self.nodes[edge(&self.nodes, r, RIGHT)];
            (&n.key, &n.val)
        })
    }

    /// Iterates the entries in key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            nodes: &self.nodes,
            front: self.head,
            back: self.root.map(|r| edge(&self.nodes, r, RIGHT)),
            len: self.len(),
        }
    }

    /// Iterates the entries in key order with mutable values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let order = self.in_order();
        IterMut {
            nodes: self.nodes.get_many_mut(&order).into_iter(),
        }
    }

    /// Iterates the keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }

    /// Iterates the values in key order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }

    /// Iterates the values in key order, mutably.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.iter_mut().map(|(_, v)| v)
    }

    fn in_order(&self) -> Vec<Key> {
        let mut order = Vec::with_capacity(self.len());
        let mut curr = self.head;
        while let Some(k) = curr {
            order.push(k);
            curr = step(&self.nodes, k, RIGHT);
        }
        order
    }

    // Checks links, ordering and the red-black rules; returns the black
    // height of the tree.
    #[cfg(test)]
    fn chk(&self) -> usize {
        assert_eq!(self.color(self.root), Color::Black);
        if let Some(r) = self.root {
            assert_eq!(self.nodes[r].parent, None);
        }
        assert_eq!(self.head, self.root.map(|r| edge(&self.nodes, r, LEFT)));

        let (cnt, bh) = self.chk_node(self.root);
        assert_eq!(cnt, self.len());

        let order = self.in_order();
        assert_eq!(order.len(), self.len());
        for w in order.windows(2) {
            assert!(self.cmp.less(&self.nodes[w[0]].key, &self.nodes[w[1]].key));
        }
        bh
    }

    #[cfg(test)]
    fn chk_node(&self, n: Option<Key>) -> (usize, usize) {
        let Some(k) = n else {
            return (0, 1);
        };
        let node = &self.nodes[k];
        for kid in node.kids.into_iter().flatten() {
            assert_eq!(self.nodes[kid].parent, Some(k), "broken parent link");
            if node.color == Color::Red {
                assert_eq!(self.nodes[kid].color, Color::Black, "red node with red child");
            }
        }

        let (lf_cnt, lf_bh) = self.chk_node(node.kids[LEFT]);
        let (rt_cnt, rt_bh) = self.chk_node(node.kids[RIGHT]);
        assert_eq!(lf_bh, rt_bh, "unequal black heights");
        let own = (node.color == Color::Black) as usize;
        (lf_cnt + rt_cnt + 1, lf_bh + own)
    }
}

impl<K, V, C: Compare<K> + Default> Default for RbMap<K, V, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<K: Clone, V: Clone, C: Clone> Clone for RbMap<K, V, C> {
    fn clone(&self) -> Self {
        RbMap {
            nodes: self.nodes.clone(),
            root: self.root,
            head: self.head,
            cmp: self.cmp.clone(),
            owner: next_owner_id(),
        }
    }
}

impl<K: Debug, V: Debug, C: Compare<K>> Debug for RbMap<K, V, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C> PartialEq for RbMap<K, V, C>
where
    K: PartialEq,
    V: PartialEq,
    C: Compare<K>,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, C: Compare<K>> Eq for RbMap<K, V, C> {}

impl<K, V, C: Compare<K>> std::ops::Index<&K> for RbMap<K, V, C> {
    type Output = V;

    fn index(&self, key: &K) -> &V {
        match self.get(key) {
            Some(v) => v,
            None => panic!("key not found in RbMap of length {}", self.len()),
        }
    }
}

/// Entries whose key is already present are skipped; the first value wins.
impl<K, V, C: Compare<K>> Extend<(K, V)> for RbMap<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, C: Compare<K> + Default> FromIterator<(K, V)> for RbMap<K, V, C> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut m = Self::default();
        m.extend(iter);
        m
    }
}

/// Borrowing iterator returned by [`RbMap::iter`].
pub struct Iter<'a, K, V> {
    nodes: &'a Nodes<K, V>,
    front: Option<Key>,
    back: Option<Key>,
    len: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let nodes = self.nodes;
        let k = self.front?;
        self.len -= 1;
        self.front = step(nodes, k, RIGHT);
        let n = &nodes[k];
        Some((&n.key, &n.val))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let nodes = self.nodes;
        let k = self.back?;
        self.len -= 1;
        self.back = step(nodes, k, LEFT);
        let n = &nodes[k];
        Some((&n.key, &n.val))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

impl<'a, K, V> FusedIterator for Iter<'a, K, V> {}

/// Mutable iterator returned by [`RbMap::iter_mut`].
pub struct IterMut<'a, K, V> {
    nodes: std::vec::IntoIter<&'a mut Node<K, V>>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.nodes.next().map(|n| (&n.key, &mut n.val))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.nodes.size_hint()
    }
}

impl<'a, K, V> ExactSizeIterator for IterMut<'a, K, V> {}

impl<'a, K, V> FusedIterator for IterMut<'a, K, V> {}

/// Owning iterator returned by [`RbMap::into_iter`].
pub struct IntoIter<K, V> {
    nodes: Nodes<K, V>,
    order: std::vec::IntoIter<Key>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let k = self.order.next()?;
        self.nodes.remove(k).map(|n| (n.key, n.val))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K, V, C: Compare<K>> IntoIterator for RbMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        let order = self.in_order().into_iter();
        IntoIter {
            nodes: self.nodes,
            order,
        }
    }
}

impl<'a, K, V, C: Compare<K>> IntoIterator for &'a RbMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, C: Compare<K>> IntoIterator for &'a mut RbMap<K, V, C> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

#[cfg(test)]
mod test {
    extern crate quickcheck;
    use super::*;
    use quickcheck::quickcheck;
    use std::collections::BTreeMap as StdMap;

    // xorshift; enough to scramble insertion orders deterministically
    fn shuffle<T>(v: &mut [T], mut seed: u64) {
        for i in (1..v.len()).rev() {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            v.swap(i, (seed % (i as u64 + 1)) as usize);
        }
    }

    fn bal_test(vs: Vec<(u8, u32)>) {
        let mut m = RbMap::new();
        for &(k, v) in vs.iter() {
            m.insert(k, v);
            m.chk();
        }
    }

    fn rm_test(vs: Vec<(i8, u32)>) {
        let mut m = RbMap::new();
        let mut std_map = StdMap::new();

        for &(k, v) in vs.iter() {
            match k {
                1..=i8::MAX => {
                    let k = k % 32;
                    let fresh = !std_map.contains_key(&k);
                    if fresh {
                        std_map.insert(k, v);
                    }
                    assert_eq!(m.insert(k, v).1, fresh);
                }

                0 | i8::MIN => (),

                _ => {
                    let k = -k % 32;
                    assert_eq!(m.remove(&k), std_map.remove(&k));
                }
            }

            assert!(m.iter().eq(std_map.iter()));
            m.chk();
        }
    }

    // systematically try erasing each entry of m
    fn chk_all_erases(m: RbMap<u8, u8>) {
        for (k, v) in m.iter() {
            let mut m2 = m.clone();
            let p = m2.find(k);
            assert_eq!(m2.erase(p), Ok((*k, *v)));
            m2.chk();
            assert_eq!(m2.len(), m.len() - 1);
            assert_eq!(m2.count(k), 0);
        }
    }

    #[test]
    fn erase_each_test() {
        // build in order to encourage skewing
        let m: RbMap<_, _> = (0..32).map(|x| (x, x + 100)).collect();
        chk_all_erases(m);

        let m: RbMap<_, _> = (0..32).rev().map(|x| (x, x + 100)).collect();
        chk_all_erases(m);
    }

    #[test]
    fn erase_evens_of_shuffled_thousand() {
        let mut keys: Vec<u32> = (1..=1000).collect();
        shuffle(&mut keys, 0x9e3779b97f4a7c15);

        let mut m = RbMap::new();
        for &k in &keys {
            m.insert(k, k * 2);
        }
        m.chk();

        shuffle(&mut keys, 0xdeadbeef);
        for &k in keys.iter().filter(|&&k| k % 2 == 0) {
            let p = m.find(&k);
            assert_eq!(m.erase(p), Ok((k, k * 2)));
        }
        m.chk();

        assert_eq!(m.len(), 500);
        assert_eq!(m.find(&2), m.end());
        assert!(m.keys().copied().eq((1..=1000).filter(|k| k % 2 == 1)));
    }

    #[test]
    fn positions_survive_other_erases() {
        let mut m: RbMap<u32, u32> = (0..64).map(|k| (k, k)).collect();
        let positions: Vec<_> = (0..64).map(|k| m.find(&k)).collect();

        // erase from the middle so two-child nodes get swapped with their
        // predecessors
        for k in (8..56).step_by(3) {
            m.erase(positions[k as usize]).unwrap();
            m.chk();
        }

        for k in 0..64u32 {
            let p = positions[k as usize];
            if m.contains_key(&k) {
                assert_eq!(m.entry_at(p), Ok((&k, &k)));
            } else {
                assert_eq!(m.entry_at(p), Err(Error::InvalidIterator));
            }
        }
    }

    #[test]
    fn step_through_positions() {
        let m: RbMap<_, _> = [5, 1, 4, 2, 3].into_iter().map(|k| (k, ())).collect();
        let mut p = m.begin();
        let mut seen = Vec::new();
        while p != m.end() {
            seen.push(*m.entry_at(p).unwrap().0);
            p = m.next(p).unwrap();
        }
        assert_eq!(seen, [1, 2, 3, 4, 5]);
        assert_eq!(m.next(p), Err(Error::InvalidIterator));

        seen.clear();
        while p != m.begin() {
            p = m.prev(p).unwrap();
            seen.push(*m.entry_at(p).unwrap().0);
        }
        assert_eq!(seen, [5, 4, 3, 2, 1]);
        assert_eq!(m.prev(p), Err(Error::InvalidIterator));
    }

    #[test]
    fn empty_map_positions() {
        let mut m: RbMap<u8, u8> = RbMap::new();
        assert_eq!(m.begin(), m.end());
        assert_eq!(m.prev(m.end()), Err(Error::InvalidIterator));
        assert_eq!(m.next(m.end()), Err(Error::InvalidIterator));
        assert_eq!(m.erase(m.end()), Err(Error::InvalidIterator));
        assert_eq!(m.at(&0), Err(Error::IndexOutOfBound));
        assert_eq!(m.len(), 0);
    }

    #[test]
    fn foreign_and_cleared_positions() {
        let mut m: RbMap<u8, u8> = (0..10).map(|k| (k, k)).collect();
        let n = m.clone();
        assert_eq!(m, n);
        assert_eq!(m.erase(n.find(&3)), Err(Error::InvalidIterator));
        assert_eq!(m.len(), 10);

        let p = m.find(&3);
        m.clear();
        m.insert(3, 3);
        assert_eq!(m.entry_at(p), Err(Error::InvalidIterator));
    }

    #[test]
    fn insert_keeps_existing_value() {
        let mut m = RbMap::new();
        m.insert(1, "one");
        let (p, fresh) = m.insert(1, "uno");
        assert!(!fresh);
        assert_eq!(m.entry_at(p), Ok((&1, &"one")));
        *m.value_at_mut(p).unwrap() = "eins";
        assert_eq!(m[&1], "eins");
    }

    #[test]
    #[should_panic(expected = "key not found in RbMap of length 3")]
    fn index_missing_key_panics() {
        let m: RbMap<u8, u8> = (0..3).map(|k| (k, k)).collect();
        assert_eq!(m[&2], 2);
        let _ = m[&7];
    }

    #[test]
    fn custom_comparator() {
        let mut m = RbMap::with_comparator(|a: &String, b: &String| {
            a.to_lowercase() < b.to_lowercase()
        });
        m.insert("Apple".to_string(), 1);
        assert!(!m.insert("APPLE".to_string(), 2).1);
        m.insert("banana".to_string(), 3);
        assert_eq!(m.count(&"apple".to_string()), 1);
        assert_eq!(m.len(), 2);
        m.chk();
    }

    #[test]
    fn clone_is_independent() {
        let mut m: RbMap<u8, Vec<u8>> = (0..8).map(|k| (k, vec![k])).collect();
        let mut n = m.clone();
        n.at_mut(&3).unwrap().push(33);
        m.remove(&4);
        *m.get_or_default(20) = vec![20];

        assert_eq!(m.at(&3), Ok(&vec![3]));
        assert_eq!(n.at(&3), Ok(&vec![3, 33]));
        assert!(n.contains_key(&4));
        assert!(!n.contains_key(&20));
        m.chk();
        n.chk();
    }

    #[test]
    fn iter_mut_and_into_iter() {
        let mut m: RbMap<u8, u32> = (0..16).rev().map(|k| (k, 0)).collect();
        for (k, v) in m.iter_mut() {
            *v = *k as u32 * 3;
        }
        assert_eq!(m.iter().rev().next(), Some((&15, &45)));
        let v: Vec<_> = m.into_iter().collect();
        assert_eq!(v, (0..16).map(|k| (k, k as u32 * 3)).collect::<Vec<_>>());
    }

    #[test]
    fn bal_test_regr1() {
        bal_test(vec![(4, 0), (0, 0), (5, 0), (1, 0), (2, 0), (3, 0)]);
    }

    #[test]
    fn rm_test_regr1() {
        rm_test(vec![(101, 0), (100, 0), (1, 0), (-100, 0)]);
    }

    quickcheck! {
        fn qc_bal_test(vs: Vec<(u8, u32)>) -> () {
            bal_test(vs);
        }

        fn qc_rm_test(vs: Vec<(i8, u32)>) -> () {
            rm_test(vs);
        }

        fn qc_erase_each(vs: Vec<(u8, u8)>) -> () {
            let m = vs.into_iter().collect();
            chk_all_erases(m);
        }
    }
}
