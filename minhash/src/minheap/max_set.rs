// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Bounded set of the `k` smallest distinct values.

use std::collections::BinaryHeap;
use std::collections::HashSet;

use crate::error::Error;
use crate::minheap::EMPTY_VALUE;

/// A capacity-bounded set retaining the smallest distinct `u32` values ever pushed.
///
/// Values live in a max-heap so the largest retained value can be evicted in `O(log k)` when
/// a smaller one arrives. A companion member set rejects duplicates, so the set may hold
/// fewer than `capacity` values when fewer distinct values were pushed. Slots not yet filled
/// are reported as [`EMPTY_VALUE`], which is never stored itself.
#[derive(Debug, Clone)]
pub struct BoundedUniqueMaxSet {
    capacity: usize,
    heap: BinaryHeap<u32>,
    members: HashSet<u32>,
}

impl BoundedUniqueMaxSet {
    /// Creates an empty set retaining at most `capacity` values.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be at least 1");
        Self {
            capacity,
            heap: BinaryHeap::with_capacity(capacity),
            members: HashSet::with_capacity(capacity),
        }
    }

    /// Creates a set and pushes every value of `values` into it.
    ///
    /// [`EMPTY_VALUE`] entries are skipped, so a sentinel-padded slot array round-trips.
    pub fn from_values(capacity: usize, values: impl IntoIterator<Item = u32>) -> Self {
        let mut set = Self::new(capacity);
        for value in values {
            set.push(value);
        }
        set
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, value: u32) -> bool {
        self.members.contains(&value)
    }

    /// Returns the largest retained value.
    pub fn peek(&self) -> Option<u32> {
        self.heap.peek().copied()
    }

    /// Returns the retained values as a set.
    pub fn members(&self) -> &HashSet<u32> {
        &self.members
    }

    /// Iterates the retained values in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.heap.iter().copied()
    }

    /// Pushes `value`.
    ///
    /// Current members and the [`EMPTY_VALUE`] sentinel are ignored. When the set is full, the
    /// largest retained value is evicted if `value` is smaller than it; otherwise `value` is
    /// dropped.
    pub fn push(&mut self, value: u32) {
        if value == EMPTY_VALUE || self.members.contains(&value) {
            return;
        }
        if self.heap.len() < self.capacity {
            self.heap.push(value);
            self.members.insert(value);
            return;
        }
        if let Some(mut top) = self.heap.peek_mut() {
            if value < *top {
                let evicted = std::mem::replace(&mut *top, value);
                self.members.remove(&evicted);
                self.members.insert(value);
            }
        }
    }

    /// Removes and returns the largest retained value.
    ///
    /// # Errors
    ///
    /// Returns an [`EmptyPop`] error if the set is empty.
    ///
    /// [`EmptyPop`]: crate::error::ErrorKind::EmptyPop
    pub fn pop(&mut self) -> Result<u32, Error> {
        let value = self.heap.pop().ok_or_else(Error::empty_pop)?;
        self.members.remove(&value);
        Ok(value)
    }

    /// Returns the retained values in ascending order.
    pub fn sorted_values(&self) -> Vec<u32> {
        self.heap.clone().into_sorted_vec()
    }

    /// Returns all `capacity` logical slots in ascending order, padded with [`EMPTY_VALUE`].
    pub fn slots(&self) -> Vec<u32> {
        let mut slots = self.sorted_values();
        slots.resize(self.capacity, EMPTY_VALUE);
        slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn pushed(capacity: usize, values: &[u32]) -> BoundedUniqueMaxSet {
        BoundedUniqueMaxSet::from_values(capacity, values.iter().copied())
    }

    #[test]
    fn test_pop_returns_max() {
        let mut set = pushed(100, &[3, 4, 5, 6, 7, 8, 1, 2]);
        assert_eq!(set.pop().unwrap(), 8);
        assert_eq!(set.pop().unwrap(), 7);
        assert_eq!(set.len(), 6);
        assert!(!set.contains(8));
    }

    #[test]
    fn test_sorted_values() {
        let set = pushed(100, &[3, 4, 5, 6, 7, 8, 1, 2]);
        assert_eq!(set.sorted_values(), [1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_capacity_keeps_smallest() {
        let set = pushed(5, &[3, 4, 5, 6, 7, 8, 1, 2]);
        assert_eq!(set.len(), 5);
        assert_eq!(set.sorted_values(), [1, 2, 3, 4, 5]);
        assert_eq!(set.peek(), Some(5));
        for evicted in [6, 7, 8] {
            assert!(!set.contains(evicted));
        }
    }

    #[test]
    fn test_seeded_values() {
        let mut set = pushed(5, &[2, 3, 1]);
        set.push(5);
        set.push(100);
        assert_eq!(set.sorted_values(), [1, 2, 3, 5, 100]);
        assert_eq!(set.pop().unwrap(), 100);
        assert_eq!(set.sorted_values(), [1, 2, 3, 5]);
    }

    #[test]
    fn test_no_duplicates() {
        let mut set = BoundedUniqueMaxSet::new(5);
        for _ in 0..4 {
            set.push(5);
        }
        assert_eq!(set.sorted_values(), [5]);
        for _ in 0..4 {
            set.push(4);
        }
        assert_eq!(set.sorted_values(), [4, 5]);
        assert_eq!(set.members().len(), 2);
    }

    #[test]
    fn test_full_set_ignores_larger_and_member_values() {
        let mut set = pushed(3, &[10, 20, 30]);
        set.push(40);
        set.push(20);
        assert_eq!(set.sorted_values(), [10, 20, 30]);
        set.push(15);
        assert_eq!(set.sorted_values(), [10, 15, 20]);
        assert_eq!(set.members().len(), 3);
        assert!(!set.contains(30));
    }

    #[test]
    fn test_sentinel_is_never_stored() {
        let mut set = BoundedUniqueMaxSet::new(2);
        set.push(EMPTY_VALUE);
        assert!(set.is_empty());
        set.push(7);
        assert_eq!(set.slots(), [7, EMPTY_VALUE]);
        assert_eq!(BoundedUniqueMaxSet::from_values(2, set.slots()).sorted_values(), [7]);
    }

    #[test]
    fn test_pop_empty() {
        let mut set = BoundedUniqueMaxSet::new(1);
        let err = set.pop().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyPop);
    }

    #[test]
    #[should_panic(expected = "capacity must be at least 1")]
    fn test_zero_capacity() {
        BoundedUniqueMaxSet::new(0);
    }
}
