//! # Containers with checked positions
//!
//! `cursor-collections` provides three containers that hand out
//! [`Position`](block_deque::Position)s alongside the usual iterators:
//!
//! * [`BlockDeque`], a double-ended sequence stored as a chain of bounded
//!   blocks, with indexed access and insertion or removal anywhere.
//! * [`RbMap`], an ordered map kept as a red-black tree under a caller-chosen
//!   [`Compare`] ordering.
//! * [`LeftistHeap`], a priority queue whose `merge` takes `O(log n)` time.
//!
//! A position is a plain value.  It never borrows its container, so the
//! container can be modified while positions are held.  In exchange every
//! operation taking a position validates it first and reports
//! [`Error::InvalidIterator`] for positions that went stale or belong to a
//! different container.
//!
//! ```
//! use cursor_collections::{BlockDeque, Error};
//!
//! let mut d: BlockDeque<_> = (0..5).collect();
//! let p = d.position(2).unwrap();
//! let p = d.erase(p).unwrap();
//! assert_eq!(d.get_at(p), Ok(&3));
//! assert_eq!(d.at(9), Err(Error::IndexOutOfBound));
//! ```

mod arena;

pub mod block_deque;

/// A [`block_deque::BlockDeque`] with 400 elements per block.
pub type BlockDeque<T> = block_deque::BlockDeque<T, 400>;

mod compare;
pub use compare::{Compare, Natural, Reversed};

mod error;
pub use error::{Error, Result};

pub mod leftist_heap;
pub use leftist_heap::LeftistHeap;

pub mod rb_map;
pub use rb_map::RbMap;
