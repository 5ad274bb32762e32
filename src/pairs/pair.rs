use std::fmt::Debug;
use std::ptr;

use crate::geometry::PointTrait;
use crate::node::Entry;

/// Two stored entries found within the query distance of each other.
///
/// Both sides borrow from the tree that was queried. Which entry ends up as `first` is an
/// implementation detail of the traversal.
pub struct NeighborPair<'a, P, T> {
    /// One side of the pair.
    pub first: &'a Entry<P, T>,
    /// The other side of the pair.
    pub second: &'a Entry<P, T>,
}

impl<'a, P, T> NeighborPair<'a, P, T> {
    pub(crate) fn new(first: &'a Entry<P, T>, second: &'a Entry<P, T>) -> Self {
        Self { first, second }
    }

    /// The points of both sides.
    pub fn points(&self) -> (&'a P, &'a P) {
        (&self.first.0, &self.second.0)
    }

    /// The payloads of both sides.
    pub fn payloads(&self) -> (&'a T, &'a T) {
        (&self.first.1, &self.second.1)
    }

    /// Returns `true` if both sides are the same stored entry.
    ///
    /// The enumerators in this crate never produce such a pair.
    pub fn is_self_pair(&self) -> bool {
        ptr::eq(self.first, self.second)
    }

    /// Copy both entries out of the tree.
    pub fn cloned(&self) -> (Entry<P, T>, Entry<P, T>)
    where
        P: Clone,
        T: Clone,
    {
        (self.first.clone(), self.second.clone())
    }
}

impl<P: PointTrait, T> NeighborPair<'_, P, T> {
    /// The squared distance between the two points.
    pub fn sqdist(&self) -> P::Num {
        self.first.0.sqdist(&self.second.0)
    }
}

impl<P, T> Clone for NeighborPair<'_, P, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P, T> Copy for NeighborPair<'_, P, T> {}

impl<P: Debug, T: Debug> Debug for NeighborPair<'_, P, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NeighborPair")
            .field("first", self.first)
            .field("second", self.second)
            .finish()
    }
}
