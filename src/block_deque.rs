//! A double-ended sequence stored as a linked chain of bounded blocks.

use std::fmt::{Debug, Formatter};
use std::iter::FusedIterator;
use tracing::trace;

use crate::arena::{next_owner_id, Arena, Key};
use crate::error::{Error, Result};

struct Block<T> {
    items: Vec<T>,
    prev: Option<Key>,
    next: Option<Key>,
    // bumped whenever `items` changes, so older positions into it go stale
    gen: u64,
}

impl<T: Clone> Clone for Block<T> {
    fn clone(&self) -> Self {
        // keep the spare slot so a clone can overflow before it splits
        let mut items = Vec::with_capacity(self.items.capacity());
        items.extend(self.items.iter().cloned());
        Block {
            items,
            prev: self.prev,
            next: self.next,
            gen: self.gen,
        }
    }
}

/// A place in a [`BlockDeque`]: an element, or the one-past-the-end slot.
///
/// Positions are plain values.  Any insertion into or removal from the block
/// a position names retires it, as does a split or merge of that block;
/// afterwards the deque reports [`Error::InvalidIterator`] for it instead of
/// handing back a shifted element.  Positions into other blocks, and `end()`,
/// stay usable.  The positions returned by [`BlockDeque::insert`] and
/// [`BlockDeque::erase`] are always current.  Positions from one deque are
/// never accepted by another, including by its clones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    owner: u64,
    block: Option<Key>,
    offset: usize,
    gen: u64,
}

/// A sequence with cheap operations at both ends and `O(√n)` positional
/// access, insertion and removal.
///
/// Elements live in blocks of at most `B` elements that form a doubly linked
/// chain.  A block that overflows on insert is split in half; after a removal
/// a block is merged with its successor whenever both fit in one block.
/// [`crate::BlockDeque`] fixes `B` at 400.
///
/// # Examples
/// ```
/// use cursor_collections::BlockDeque;
///
/// let mut d: BlockDeque<i32> = (1..=3).collect();
/// d.push_front(0);
/// d.push_back(4);
/// assert_eq!(d.at(2), Ok(&2));
///
/// let pos = d.position(1).unwrap();
/// let pos = d.insert(pos, 10).unwrap();
/// assert_eq!(d.get_at(pos), Ok(&10));
/// assert_eq!(d.iter().copied().collect::<Vec<_>>(), [0, 10, 1, 2, 3, 4]);
/// ```
pub struct BlockDeque<T, const B: usize> {
    blocks: Arena<Block<T>>,
    head: Option<Key>,
    last: Option<Key>,
    len: usize,
    owner: u64,
}

impl<T, const B: usize> BlockDeque<T, B> {
    /// Creates an empty deque.
    ///
    /// # Panics
    ///
    /// Panics if the block capacity `B` is less than 2.
    pub fn new() -> Self {
        assert!(B >= 2, "block capacity must be at least 2");
        BlockDeque {
            blocks: Arena::new(),
            head: None,
            last: None,
            len: 0,
            owner: next_owner_id(),
        }
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the deque holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of blocks currently in the chain.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Drops every element.  All outstanding positions become invalid.
    pub fn clear(&mut self) {
        trace!(len = self.len, "clearing block deque");
        self.blocks.clear();
        self.head = None;
        self.last = None;
        self.len = 0;
    }

    fn new_block(&mut self, prev: Option<Key>, next: Option<Key>) -> Key {
        self.blocks.insert(Block {
            items: Vec::with_capacity(B + 1),
            prev,
            next,
            gen: 0,
        })
    }

    fn take_block(&mut self, k: Key) -> Block<T> {
        match self.blocks.remove(k) {
            Some(block) => block,
            None => panic!("block {:?} missing from its own chain", k),
        }
    }

    fn locate(&self, mut index: usize) -> Result<(Key, usize)> {
        let mut curr = self.head;
        while let Some(k) = curr {
            let block = &self.blocks[k];
            if index < block.items.len() {
                return Ok((k, index));
            }
            index -= block.items.len();
            curr = block.next;
        }
        Err(Error::IndexOutOfBound)
    }

    /// Returns the element at `index`, or `IndexOutOfBound` if
    /// `index >= self.len()`.
    ///
    /// # Examples
    /// ```
    /// use cursor_collections::{BlockDeque, Error};
    ///
    /// let d: BlockDeque<_> = ["a", "b"].into_iter().collect();
    /// assert_eq!(d.at(1), Ok(&"b"));
    /// assert_eq!(d.at(2), Err(Error::IndexOutOfBound));
    /// ```
    pub fn at(&self, index: usize) -> Result<&T> {
        let (k, i) = self.locate(index)?;
        Ok(&self.blocks[k].items[i])
    }

    /// Mutable version of [`at`](#method.at).
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        let (k, i) = self.locate(index)?;
        Ok(&mut self.blocks[k].items[i])
    }

    /// Returns the element at `index`, or `None` if out of range.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.at(index).ok()
    }

    /// Returns a mutable reference to the element at `index`, or `None`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.at_mut(index).ok()
    }

    /// Returns the first element, or `ContainerIsEmpty`.
    pub fn front(&self) -> Result<&T> {
        self.head
            .and_then(|k| self.blocks[k].items.first())
            .ok_or(Error::ContainerIsEmpty)
    }

    /// Returns the last element, or `ContainerIsEmpty`.
    pub fn back(&self) -> Result<&T> {
        self.last
            .and_then(|k| self.blocks[k].items.last())
            .ok_or(Error::ContainerIsEmpty)
    }

    /// Mutable version of [`front`](#method.front).
    pub fn front_mut(&mut self) -> Result<&mut T> {
        match self.head {
            Some(k) => self.blocks[k]
                .items
                .first_mut()
                .ok_or(Error::ContainerIsEmpty),
            None => Err(Error::ContainerIsEmpty),
        }
    }

    /// Mutable version of [`back`](#method.back).
    pub fn back_mut(&mut self) -> Result<&mut T> {
        match self.last {
            Some(k) => self.blocks[k]
                .items
                .last_mut()
                .ok_or(Error::ContainerIsEmpty),
            None => Err(Error::ContainerIsEmpty),
        }
    }

    /// Position of the first element; equal to [`end`](#method.end) when
    /// the deque is empty.
    pub fn begin(&self) -> Position {
        self.pos(self.head, 0)
    }

    /// The one-past-the-end position.
    pub fn end(&self) -> Position {
        self.pos(None, 0)
    }

    fn pos(&self, block: Option<Key>, offset: usize) -> Position {
        Position {
            owner: self.owner,
            block,
            offset,
            gen: block.map_or(0, |k| self.blocks[k].gen),
        }
    }

    /// Returns the position of the element at `index`, or `end()` when
    /// `index == self.len()`.
    pub fn position(&self, index: usize) -> Result<Position> {
        if index == self.len {
            return Ok(self.end());
        }
        let (k, i) = self.locate(index)?;
        Ok(self.pos(Some(k), i))
    }

    // Accepts element positions and end(); rejects everything else.
    fn check(&self, pos: Position) -> Result<()> {
        if pos.owner != self.owner {
            return Err(Error::InvalidIterator);
        }
        let ok = match pos.block {
            Some(k) => self
                .blocks
                .get(k)
                .map_or(false, |b| b.gen == pos.gen && pos.offset < b.items.len()),
            None => pos.offset == 0,
        };
        if ok {
            Ok(())
        } else {
            Err(Error::InvalidIterator)
        }
    }

    fn element_key(&self, pos: Position) -> Result<Key> {
        self.check(pos)?;
        pos.block.ok_or(Error::InvalidIterator)
    }

    /// Returns the element at `pos`.  Fails with `InvalidIterator` for
    /// `end()` and for stale or foreign positions.
    pub fn get_at(&self, pos: Position) -> Result<&T> {
        let k = self.element_key(pos)?;
        Ok(&self.blocks[k].items[pos.offset])
    }

    /// Mutable version of [`get_at`](#method.get_at).
    pub fn get_at_mut(&mut self, pos: Position) -> Result<&mut T> {
        let k = self.element_key(pos)?;
        Ok(&mut self.blocks[k].items[pos.offset])
    }

    /// Returns the position `n` elements after `pos` (before it, if `n` is
    /// negative).  Landing exactly on `end()` is allowed; moving past either
    /// end fails with `InvalidIterator`.
    ///
    /// # Examples
    /// ```
    /// use cursor_collections::{BlockDeque, Error};
    ///
    /// let d: BlockDeque<_> = (0..10).collect();
    /// let p = d.advance(d.begin(), 7).unwrap();
    /// assert_eq!(d.get_at(p), Ok(&7));
    /// assert_eq!(d.advance(p, 3), Ok(d.end()));
    /// assert_eq!(d.advance(p, 4), Err(Error::InvalidIterator));
    /// assert_eq!(d.advance(d.end(), -10), Ok(d.begin()));
    /// ```
    pub fn advance(&self, pos: Position, n: isize) -> Result<Position> {
        self.check(pos)?;
        if n >= 0 {
            self.forward(pos, n.unsigned_abs())
        } else {
            self.backward(pos, n.unsigned_abs())
        }
    }

    fn forward(&self, pos: Position, n: usize) -> Result<Position> {
        let Some(k) = pos.block else {
            return if n == 0 {
                Ok(pos)
            } else {
                Err(Error::InvalidIterator)
            };
        };

        let block = &self.blocks[k];
        if pos.offset + n < block.items.len() {
            return Ok(self.pos(Some(k), pos.offset + n));
        }

        let mut rest = n - (block.items.len() - pos.offset);
        let mut curr = block.next;
        while let Some(c) = curr {
            let block = &self.blocks[c];
            if rest < block.items.len() {
                return Ok(self.pos(Some(c), rest));
            }
            rest -= block.items.len();
            curr = block.next;
        }

        if rest == 0 {
            Ok(self.end())
        } else {
            Err(Error::InvalidIterator)
        }
    }

    fn backward(&self, pos: Position, n: usize) -> Result<Position> {
        if n <= pos.offset {
            return Ok(self.pos(pos.block, pos.offset - n));
        }

        let mut rest = n - pos.offset;
        let mut curr = match pos.block {
            Some(k) => self.blocks[k].prev,
            None => self.last,
        };
        while let Some(c) = curr {
            let block = &self.blocks[c];
            if rest <= block.items.len() {
                return Ok(self.pos(Some(c), block.items.len() - rest));
            }
            rest -= block.items.len();
            curr = block.prev;
        }
        Err(Error::InvalidIterator)
    }

    /// Same as `advance(pos, 1)`.
    pub fn next(&self, pos: Position) -> Result<Position> {
        self.advance(pos, 1)
    }

    /// Same as `advance(pos, -1)`.
    pub fn prev(&self, pos: Position) -> Result<Position> {
        self.advance(pos, -1)
    }

    fn index_of(&self, pos: Position) -> Result<usize> {
        self.check(pos)?;
        let Some(target) = pos.block else {
            return Ok(self.len);
        };

        let mut index = 0;
        let mut curr = self.head;
        while let Some(k) = curr {
            if k == target {
                return Ok(index + pos.offset);
            }
            let block = &self.blocks[k];
            index += block.items.len();
            curr = block.next;
        }
        Err(Error::InvalidIterator)
    }

    /// Returns the signed number of elements from `from` to `to`, that is
    /// `index(to) - index(from)`.
    ///
    /// # Examples
    /// ```
    /// use cursor_collections::BlockDeque;
    ///
    /// let d: BlockDeque<_> = (0..5).collect();
    /// assert_eq!(d.distance(d.begin(), d.end()), Ok(5));
    /// assert_eq!(d.distance(d.end(), d.begin()), Ok(-5));
    ///
    /// let other = d.clone();
    /// assert!(d.distance(other.begin(), d.end()).is_err());
    /// ```
    pub fn distance(&self, from: Position, to: Position) -> Result<isize> {
        let from = self.index_of(from)?;
        let to = self.index_of(to)?;
        Ok(to as isize - from as isize)
    }

    // Splits block `k` at its midpoint if it overflowed and reports where the
    // element previously at `offset` in `k` now lives.
    fn split_if_full(&mut self, k: Key, offset: usize) -> (Key, usize) {
        let len = self.blocks[k].items.len();
        if len <= B {
            return (k, offset);
        }

        trace!(block = ?k, len, "block overflowed, splitting");
        let keep = len - len / 2;
        let next = self.blocks[k].next;
        let q = self.new_block(Some(k), next);
        let moved = self.blocks[k].items.split_off(keep);
        self.blocks[q].items.extend(moved);
        self.blocks[k].next = Some(q);
        self.blocks[k].gen += 1;
        match next {
            Some(n) => self.blocks[n].prev = Some(q),
            None => self.last = Some(q),
        }

        if offset < keep {
            (k, offset)
        } else {
            (q, offset - keep)
        }
    }

    fn insert_in_block(&mut self, k: Key, offset: usize, value: T) -> Position {
        let block = &mut self.blocks[k];
        block.items.insert(offset, value);
        block.gen += 1;
        self.len += 1;
        let (k, offset) = self.split_if_full(k, offset);
        self.pos(Some(k), offset)
    }

    fn append(&mut self, value: T) -> Position {
        let k = match self.last {
            Some(k) => k,
            None => {
                let k = self.new_block(None, None);
                self.head = Some(k);
                self.last = Some(k);
                k
            }
        };
        let offset = self.blocks[k].items.len();
        self.insert_in_block(k, offset, value)
    }

    /// Inserts `value` before `pos` and returns the position of the new
    /// element.  Inserting at `end()` appends.
    ///
    /// Other positions into the same block become invalid.
    pub fn insert(&mut self, pos: Position, value: T) -> Result<Position> {
        self.check(pos)?;
        Ok(match pos.block {
            Some(k) => self.insert_in_block(k, pos.offset, value),
            None => self.append(value),
        })
    }

    /// Appends an element.
    pub fn push_back(&mut self, value: T) {
        self.append(value);
    }

    /// Prepends an element.
    pub fn push_front(&mut self, value: T) {
        match self.head {
            Some(k) => {
                self.insert_in_block(k, 0, value);
            }
            None => {
                self.append(value);
            }
        }
    }

    /// Removes the element at `pos`, returning it together with the position
    /// of the element that followed it (`end()` if it was the last).
    ///
    /// # Examples
    /// ```
    /// use cursor_collections::{BlockDeque, Error};
    ///
    /// let mut d: BlockDeque<_> = ['a', 'b', 'c'].into_iter().collect();
    /// let p = d.position(1).unwrap();
    /// let (c, p) = d.remove(p).unwrap();
    /// assert_eq!(c, 'b');
    /// assert_eq!(d.get_at(p), Ok(&'c'));
    /// assert_eq!(d.remove(d.end()), Err(Error::InvalidIterator));
    /// ```
    pub fn remove(&mut self, pos: Position) -> Result<(T, Position)> {
        if self.is_empty() {
            return Err(Error::ContainerIsEmpty);
        }
        let k = self.element_key(pos)?;
        Ok(self.remove_in_block(k, pos.offset))
    }

    /// Removes the element at `pos` and returns the position that follows
    /// it.  See [`remove`](#method.remove).
    pub fn erase(&mut self, pos: Position) -> Result<Position> {
        self.remove(pos).map(|(_, next)| next)
    }

    fn remove_in_block(&mut self, k: Key, offset: usize) -> (T, Position) {
        let block = &mut self.blocks[k];
        let value = block.items.remove(offset);
        block.gen += 1;
        self.len -= 1;

        if self.len == 0 {
            self.blocks.clear();
            self.head = None;
            self.last = None;
            return (value, self.end());
        }

        if let Some(n) = self.blocks[k].next {
            if self.blocks[k].items.len() + self.blocks[n].items.len() <= B {
                trace!(block = ?k, absorbed = ?n, "merging adjacent blocks");
                let absorbed = self.take_block(n);
                let block = &mut self.blocks[k];
                block.items.extend(absorbed.items);
                block.next = absorbed.next;
                block.gen += 1;
                match absorbed.next {
                    Some(m) => self.blocks[m].prev = Some(k),
                    None => self.last = Some(k),
                }
            }
        }

        // Only a trailing block can drain completely; anything after it
        // would have been merged in above.
        if self.blocks[k].items.is_empty() {
            let drained = self.take_block(k);
            match drained.prev {
                Some(p) => self.blocks[p].next = None,
                None => self.head = None,
            }
            self.last = drained.prev;
            return (value, self.end());
        }

        let block = &self.blocks[k];
        let next = if offset == block.items.len() {
            self.pos(block.next, 0)
        } else {
            self.pos(Some(k), offset)
        };
        (value, next)
    }

    /// Removes and returns the last element.
    pub fn pop_back(&mut self) -> Result<T> {
        let k = self.last.ok_or(Error::ContainerIsEmpty)?;
        let offset = self.blocks[k].items.len() - 1;
        Ok(self.remove_in_block(k, offset).0)
    }

    /// Removes and returns the first element.
    pub fn pop_front(&mut self) -> Result<T> {
        let k = self.head.ok_or(Error::ContainerIsEmpty)?;
        Ok(self.remove_in_block(k, 0).0)
    }

    /// Iterates the elements front to back.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            blocks: &self.blocks,
            front: (&[]).iter(),
            front_next: self.head,
            back: (&[]).iter(),
            back_prev: self.last,
            len: self.len,
        }
    }

    /// Iterates mutable references to the elements front to back.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        let order = self.chain();
        let len = self.len;
        let blocks = self.blocks.get_many_mut(&order).into_iter();
        IterMut {
            blocks,
            current: (&mut []).iter_mut(),
            len,
        }
    }

    fn chain(&self) -> Vec<Key> {
        let mut order = Vec::with_capacity(self.blocks.len());
        let mut curr = self.head;
        while let Some(k) = curr {
            order.push(k);
            curr = self.blocks[k].next;
        }
        order
    }

    #[cfg(test)]
    fn chk(&self) {
        let mut cnt = 0;
        let mut prev = None;
        let mut curr = self.head;
        let mut nblocks = 0;
        while let Some(k) = curr {
            let block = &self.blocks[k];
            assert_eq!(block.prev, prev);
            assert!(!block.items.is_empty(), "empty block left in chain");
            assert!(block.items.len() <= B, "block over capacity");
            cnt += block.items.len();
            nblocks += 1;
            prev = Some(k);
            curr = block.next;
        }
        assert_eq!(self.last, prev);
        assert_eq!(cnt, self.len);
        assert_eq!(nblocks, self.blocks.len());
    }
}

impl<T, const B: usize> Default for BlockDeque<T, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, const B: usize> Clone for BlockDeque<T, B> {
    fn clone(&self) -> Self {
        BlockDeque {
            blocks: self.blocks.clone(),
            head: self.head,
            last: self.last,
            len: self.len,
            owner: next_owner_id(),
        }
    }
}

impl<T: Debug, const B: usize> Debug for BlockDeque<T, B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, const B: usize> PartialEq for BlockDeque<T, B> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq, const B: usize> Eq for BlockDeque<T, B> {}

impl<T, const B: usize> std::ops::Index<usize> for BlockDeque<T, B> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(v) => v,
            None => panic!(
                "index {} out of bounds for BlockDeque of length {}",
                index, self.len
            ),
        }
    }
}

impl<T, const B: usize> std::ops::IndexMut<usize> for BlockDeque<T, B> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len;
        match self.get_mut(index) {
            Some(v) => v,
            None => panic!(
                "index {} out of bounds for BlockDeque of length {}",
                index, len
            ),
        }
    }
}

impl<T, const B: usize> Extend<T> for BlockDeque<T, B> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for v in iter {
            self.push_back(v);
        }
    }
}

impl<T, const B: usize> FromIterator<T> for BlockDeque<T, B> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut d = Self::new();
        d.extend(iter);
        d
    }
}

/// Borrowing iterator returned by [`BlockDeque::iter`].
pub struct Iter<'a, T> {
    blocks: &'a Arena<Block<T>>,
    front: std::slice::Iter<'a, T>,
    front_next: Option<Key>,
    back: std::slice::Iter<'a, T>,
    back_prev: Option<Key>,
    // bounds both ends so they never hand out the same element twice
    len: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        loop {
            if let Some(v) = self.front.next() {
                self.len -= 1;
                return Some(v);
            }
            let blocks = self.blocks;
            let block = &blocks[self.front_next?];
            self.front = block.items.iter();
            self.front_next = block.next;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        loop {
            if let Some(v) = self.back.next_back() {
                self.len -= 1;
                return Some(v);
            }
            let blocks = self.blocks;
            let block = &blocks[self.back_prev?];
            self.back = block.items.iter();
            self.back_prev = block.prev;
        }
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T> FusedIterator for Iter<'a, T> {}

/// Mutable iterator returned by [`BlockDeque::iter_mut`].
pub struct IterMut<'a, T> {
    blocks: std::vec::IntoIter<&'a mut Block<T>>,
    current: std::slice::IterMut<'a, T>,
    len: usize,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(v) = self.current.next() {
                self.len -= 1;
                return Some(v);
            }
            self.current = self.blocks.next()?.items.iter_mut();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T> ExactSizeIterator for IterMut<'a, T> {}

impl<'a, T> FusedIterator for IterMut<'a, T> {}

/// Owning iterator returned by [`BlockDeque::into_iter`].
pub struct IntoIter<T> {
    blocks: Arena<Block<T>>,
    next_block: Option<Key>,
    current: std::vec::IntoIter<T>,
    len: usize,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(v) = self.current.next() {
                self.len -= 1;
                return Some(v);
            }
            let block = self.blocks.remove(self.next_block?)?;
            self.next_block = block.next;
            self.current = block.items.into_iter();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T, const B: usize> IntoIterator for BlockDeque<T, B> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            blocks: self.blocks,
            next_block: self.head,
            current: Vec::new().into_iter(),
            len: self.len,
        }
    }
}

impl<'a, T, const B: usize> IntoIterator for &'a BlockDeque<T, B> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, const B: usize> IntoIterator for &'a mut BlockDeque<T, B> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
