use std::fmt;

/// An unordered pair of two distinct values.
///
/// The smaller value is always stored first, so `(a, b)` and `(b, a)` are the same
/// key in a set. A value can never be paired with itself.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pair<T> {
    low: T,
    high: T,
}

impl<T: Ord> Pair<T> {
    /// Returns `None` when `a == b`.
    pub fn new(a: T, b: T) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { low: a, high: b }),
            std::cmp::Ordering::Greater => Some(Self { low: b, high: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn first(&self) -> &T {
        &self.low
    }

    pub fn second(&self) -> &T {
        &self.high
    }

    pub fn contains(&self, item: &T) -> bool {
        self.low == *item || self.high == *item
    }
}

impl<T: fmt::Debug> fmt::Debug for Pair<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{:?}, {:?}}}", self.low, self.high)
    }
}
