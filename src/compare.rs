//! Strict weak orderings used by [`RbMap`](crate::RbMap) and
//! [`LeftistHeap`](crate::LeftistHeap).

/// A "less than" predicate defining a strict weak ordering over `T`.
///
/// Two values `a` and `b` are equivalent when neither `less(a, b)` nor
/// `less(b, a)` holds.
///
/// Closures of type `Fn(&T, &T) -> bool` implement the trait directly.
///
/// # Examples
/// ```
/// use cursor_collections::{Compare, Natural, Reversed};
///
/// assert!(Natural.less(&1, &2));
/// assert!(Reversed.less(&2, &1));
///
/// let by_len = |a: &&str, b: &&str| a.len() < b.len();
/// assert!(by_len.less(&"ab", &"abc"));
/// ```
pub trait Compare<T: ?Sized> {
    /// Returns `true` if `a` is ordered strictly before `b`.
    fn less(&self, a: &T, b: &T) -> bool;
}

/// The natural order given by [`Ord`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Natural;

impl<T: Ord + ?Sized> Compare<T> for Natural {
    fn less(&self, a: &T, b: &T) -> bool {
        a < b
    }
}

/// The reverse of the natural order.
///
/// A [`LeftistHeap`](crate::LeftistHeap) using `Reversed` yields its smallest
/// element first.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Reversed;

impl<T: Ord + ?Sized> Compare<T> for Reversed {
    fn less(&self, a: &T, b: &T) -> bool {
        a > b
    }
}

impl<T: ?Sized, F> Compare<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    fn less(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}
