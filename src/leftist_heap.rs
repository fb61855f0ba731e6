//! A meldable priority queue implemented as a leftist heap.

use std::fmt::{Debug, Formatter};
use std::iter::FusedIterator;
use std::mem;
use tracing::trace;

use crate::compare::{Compare, Natural};
use crate::error::{Error, Result};

struct Node<T> {
    elem: T,
    // length of the right spine below and including this node
    rank: usize,
    left: Link<T>,
    right: Link<T>,
}

type Link<T> = Option<Box<Node<T>>>;

fn rank<T>(link: &Link<T>) -> usize {
    link.as_ref().map_or(0, |n| n.rank)
}

// Melds two heaps.  The recursion only follows right spines, which are
// O(log n) long in a leftist heap.
fn meld<T, C: Compare<T>>(cmp: &C, a: Link<T>, b: Link<T>) -> Link<T> {
    match (a, b) {
        (None, b) => b,
        (a, None) => a,
        (Some(mut a), Some(mut b)) => {
            // ties keep `a` on top
            if cmp.less(&a.elem, &b.elem) {
                mem::swap(&mut a, &mut b);
            }

            let right = a.right.take();
            a.right = meld(cmp, right, Some(b));
            if rank(&a.left) < rank(&a.right) {
                mem::swap(&mut a.left, &mut a.right);
            }
            a.rank = rank(&a.right) + 1;
            Some(a)
        }
    }
}

/// A max-heap under the comparator `C` that merges with another heap in
/// `O(log n)` time.
///
/// `top` returns an element that no other element is greater than, that is,
/// `cmp.less(top, x)` holds for no `x` in the heap.  With [`Reversed`] the
/// heap becomes a min-heap.
///
/// [`Reversed`]: crate::Reversed
///
/// # Examples
/// ```
/// use cursor_collections::LeftistHeap;
///
/// let mut h = LeftistHeap::new();
/// for x in [5, 3, 8, 1] {
///     h.push(x);
/// }
///
/// let mut g: LeftistHeap<_> = [7, 2].into_iter().collect();
/// h.append(&mut g);
/// assert!(g.is_empty());
///
/// assert_eq!(h.pop(), Ok(8));
/// assert_eq!(h.pop(), Ok(7));
/// assert_eq!(h.into_sorted_vec(), [5, 3, 2, 1]);
/// ```
pub struct LeftistHeap<T, C = Natural> {
    root: Link<T>,
    len: usize,
    cmp: C,
}

impl<T: Ord> LeftistHeap<T> {
    /// Creates an empty max-heap ordered by `T`'s [`Ord`] implementation.
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }
}

impl<T, C: Compare<T>> LeftistHeap<T, C> {
    /// Creates an empty heap ordered by `cmp`.
    ///
    /// # Examples
    /// ```
    /// use cursor_collections::LeftistHeap;
    ///
    /// let mut h = LeftistHeap::with_comparator(|a: &(u8, char), b: &(u8, char)| a.0 < b.0);
    /// h.push((1, 'z'));
    /// h.push((9, 'a'));
    /// assert_eq!(h.top(), Ok(&(9, 'a')));
    /// ```
    pub fn with_comparator(cmp: C) -> Self {
        LeftistHeap {
            root: None,
            len: 0,
            cmp,
        }
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the heap holds no elements.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Drops every element.
    pub fn clear(&mut self) {
        if self.len > 0 {
            trace!(len = self.len, "clearing leftist heap");
        }
        free(self.root.take());
        self.len = 0;
    }

    /// Returns the greatest element, or `ContainerIsEmpty`.
    pub fn top(&self) -> Result<&T> {
        self.peek().ok_or(Error::ContainerIsEmpty)
    }

    /// Returns the greatest element, if any.
    pub fn peek(&self) -> Option<&T> {
        self.root.as_ref().map(|n| &n.elem)
    }

    /// Adds `elem` to the heap.
    pub fn push(&mut self, elem: T) {
        let node = Box::new(Node {
            elem,
            rank: 1,
            left: None,
            right: None,
        });
        let root = self.root.take();
        self.root = meld(&self.cmp, root, Some(node));
        self.len += 1;
    }

    /// Removes and returns the greatest element, or fails with
    /// `ContainerIsEmpty`.
    pub fn pop(&mut self) -> Result<T> {
        let mut top = self.root.take().ok_or(Error::ContainerIsEmpty)?;
        self.root = meld(&self.cmp, top.left.take(), top.right.take());
        self.len -= 1;
        Ok(top.elem)
    }

    /// Moves every element of `other` into `self`, consuming `other`.
    pub fn merge(&mut self, mut other: Self) {
        self.append(&mut other);
    }

    /// Moves every element of `other` into `self`, leaving `other` empty.
    ///
    /// Ties between the two roots go to `self`.
    pub fn append(&mut self, other: &mut Self) {
        if self.len > 0 && other.len > 0 {
            trace!(left = self.len, right = other.len, "melding heaps");
        }
        let root = self.root.take();
        self.root = meld(&self.cmp, root, other.root.take());
        self.len += mem::take(&mut other.len);
    }

    /// Iterates the elements in no particular order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            stack: self.root.as_deref().into_iter().collect(),
            len: self.len,
        }
    }

    /// Consumes the heap, returning its elements greatest first.
    ///
    /// # Examples
    /// ```
    /// use cursor_collections::{LeftistHeap, Reversed};
    ///
    /// let mut h = LeftistHeap::with_comparator(Reversed);
    /// h.extend([4, 1, 3]);
    /// assert_eq!(h.into_sorted_vec(), [1, 3, 4]);
    /// ```
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut v = Vec::with_capacity(self.len);
        while let Ok(x) = self.pop() {
            v.push(x);
        }
        v
    }

    // Checks heap order, the leftist rule and the stored ranks; returns the
    // number of nodes.
    #[cfg(test)]
    fn chk(&self) -> usize {
        fn chk_node<T, C: Compare<T>>(cmp: &C, n: &Node<T>) -> usize {
            let mut cnt = 1;
            for kid in [&n.left, &n.right].into_iter().flatten() {
                assert!(!cmp.less(&n.elem, &kid.elem), "child above parent");
                cnt += chk_node(cmp, kid);
            }
            assert!(rank(&n.left) >= rank(&n.right), "not leftist");
            assert_eq!(n.rank, rank(&n.right) + 1);
            cnt
        }

        let cnt = self.root.as_ref().map_or(0, |n| chk_node(&self.cmp, n));
        assert_eq!(cnt, self.len);
        cnt
    }
}

// Drops a tree without recursing; a long left spine would otherwise
// overflow the stack.
fn free<T>(link: Link<T>) {
    let mut stack: Vec<Box<Node<T>>> = link.into_iter().collect();
    while let Some(mut n) = stack.pop() {
        stack.extend(n.left.take());
        stack.extend(n.right.take());
    }
}

impl<T, C> Drop for LeftistHeap<T, C> {
    fn drop(&mut self) {
        free(self.root.take());
    }
}

impl<T: Clone, C: Clone> Clone for LeftistHeap<T, C> {
    fn clone(&self) -> Self {
        enum Frame<'a, T> {
            Enter(&'a Node<T>),
            Build(&'a Node<T>),
        }

        // Post-order: both subtrees of a node are built before the node, and
        // the left copy sits above the right copy on `built`.
        let mut todo: Vec<Frame<T>> =
            self.root.as_deref().map(Frame::Enter).into_iter().collect();
        let mut built: Vec<Box<Node<T>>> = Vec::new();
        while let Some(frame) = todo.pop() {
            match frame {
                Frame::Enter(n) => {
                    todo.push(Frame::Build(n));
                    todo.extend(n.left.as_deref().map(Frame::Enter));
                    todo.extend(n.right.as_deref().map(Frame::Enter));
                }
                Frame::Build(n) => {
                    let left = n.left.as_ref().and_then(|_| built.pop());
                    let right = n.right.as_ref().and_then(|_| built.pop());
                    built.push(Box::new(Node {
                        elem: n.elem.clone(),
                        rank: n.rank,
                        left,
                        right,
                    }));
                }
            }
        }

        LeftistHeap {
            root: built.pop(),
            len: self.len,
            cmp: self.cmp.clone(),
        }
    }
}

impl<T, C: Compare<T> + Default> Default for LeftistHeap<T, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T: Debug, C: Compare<T>> Debug for LeftistHeap<T, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, C: Compare<T>> Extend<T> for LeftistHeap<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for x in iter {
            self.push(x);
        }
    }
}

impl<T, C: Compare<T> + Default> FromIterator<T> for LeftistHeap<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut h = Self::default();
        h.extend(iter);
        h
    }
}

/// Iterator returned by [`LeftistHeap::iter`].
pub struct Iter<'a, T> {
    stack: Vec<&'a Node<T>>,
    len: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.stack.pop()?;
        self.stack.extend(n.right.as_deref());
        self.stack.extend(n.left.as_deref());
        self.len -= 1;
        Some(&n.elem)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T> FusedIterator for Iter<'a, T> {}

impl<'a, T, C: Compare<T>> IntoIterator for &'a LeftistHeap<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod test {
    extern crate quickcheck;
    use super::*;
    use crate::compare::Reversed;
    use quickcheck::quickcheck;
    use std::collections::BinaryHeap;

    #[test]
    fn pops_greatest_first() {
        let mut h = LeftistHeap::new();
        for x in [5, 3, 8, 1] {
            h.push(x);
            h.chk();
        }
        assert_eq!(h.top(), Ok(&8));
        assert_eq!(h.pop(), Ok(8));
        assert_eq!(h.pop(), Ok(5));
        assert_eq!(h.pop(), Ok(3));
        assert_eq!(h.pop(), Ok(1));
        assert_eq!(h.pop(), Err(Error::ContainerIsEmpty));
    }

    #[test]
    fn empty_heap() {
        let mut h: LeftistHeap<u8> = LeftistHeap::new();
        assert_eq!(h.top(), Err(Error::ContainerIsEmpty));
        assert_eq!(h.pop(), Err(Error::ContainerIsEmpty));
        assert_eq!(h.peek(), None);
        assert_eq!(h.len(), 0);
        assert_eq!(h.iter().next(), None);
    }

    #[test]
    fn merge_sums_sizes() {
        let mut a: LeftistHeap<_> = (0..10).collect();
        let mut b: LeftistHeap<_> = (5..25).collect();
        a.append(&mut b);
        a.chk();
        assert_eq!(a.len(), 30);
        assert!(b.is_empty());
        assert_eq!(b.pop(), Err(Error::ContainerIsEmpty));

        // the drained heap is still usable
        b.push(100);
        a.merge(b);
        a.chk();
        assert_eq!(a.len(), 31);
        assert_eq!(a.top(), Ok(&100));

        let mut e = LeftistHeap::new();
        a.append(&mut e);
        e.append(&mut a);
        assert_eq!(e.len(), 31);
        assert!(a.is_empty());
    }

    #[test]
    fn reversed_is_min_heap() {
        let mut h = LeftistHeap::with_comparator(Reversed);
        h.extend([4, 9, 1, 7]);
        h.chk();
        assert_eq!(h.top(), Ok(&1));
        assert_eq!(h.into_sorted_vec(), [1, 4, 7, 9]);
    }

    #[test]
    fn long_left_spine() {
        // increasing pushes hang every old root off the new root's left
        let mut h = LeftistHeap::new();
        for x in 0..100_000u32 {
            h.push(x);
        }
        let g = h.clone();
        assert_eq!(g.len(), h.len());
        assert_eq!(g.top(), Ok(&99_999));
        assert_eq!(g.iter().count(), 100_000);
        h.clear();
        assert!(h.is_empty());
        drop(g);
    }

    #[test]
    fn clone_is_independent() {
        let mut h: LeftistHeap<_> = [3, 1, 4, 1, 5, 9, 2, 6].into_iter().collect();
        let mut g = h.clone();
        g.chk();
        assert_eq!(h.pop(), Ok(9));
        g.push(10);
        assert_eq!(h.into_sorted_vec(), [6, 5, 4, 3, 2, 1, 1]);
        assert_eq!(g.into_sorted_vec(), [10, 9, 6, 5, 4, 3, 2, 1, 1]);
    }

    fn model_test(ops: Vec<Option<i16>>) {
        let mut h = LeftistHeap::new();
        let mut model = BinaryHeap::new();
        for op in ops {
            match op {
                Some(x) => {
                    h.push(x);
                    model.push(x);
                }
                None => assert_eq!(h.pop().ok(), model.pop()),
            }
            assert_eq!(h.peek(), model.peek());
            assert_eq!(h.len(), model.len());
        }
        h.chk();

        let mut items: Vec<_> = h.iter().copied().collect();
        items.sort_unstable();
        assert_eq!(items, model.clone().into_sorted_vec());
    }

    quickcheck! {
        fn qc_model_test(ops: Vec<Option<i16>>) -> () {
            model_test(ops);
        }

        fn qc_merge_test(xs: Vec<u8>, ys: Vec<u8>) -> () {
            let mut a: LeftistHeap<_> = xs.iter().copied().collect();
            let b: LeftistHeap<_> = ys.iter().copied().collect();
            a.merge(b);
            a.chk();

            let mut want: Vec<_> = xs.into_iter().chain(ys).collect();
            want.sort_unstable_by(|x, y| y.cmp(x));
            assert_eq!(a.into_sorted_vec(), want);
        }
    }
}
