// SPDX-License-Identifier: MIT OR Apache-2.0
//! Sorted list with a lazily rebuilt positional index.
//!
//! Items live in a doubly-linked chain of arena nodes. The side index maps
//! positions to node keys and is only trusted for its current length, the
//! valid prefix. A mutation at position `p` truncates the index to `p`; later
//! positional reads extend it again, never further than the position they need.

use slotmap::{new_key_type, SlotMap};
use std::cmp::Ordering;
use std::fmt;

new_key_type! {
    /// Handle to a node in the list arena
    struct NodeKey;
}

/// Comparison used by a sorted list when none is named explicitly
pub type Comparator<T> = fn(&T, &T) -> Ordering;

#[derive(Debug, Clone)]
struct Node<T> {
    value: T,
    prev: Option<NodeKey>,
    next: Option<NodeKey>,
}

/// Error from a positional sorted list operation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SortedListError {
    /// Position past the end of the list
    #[error("Index {index} out of range for list of length {len}")]
    IndexOutOfRange {
        /// Requested position
        index: usize,
        /// List length at the time of the request
        len: usize,
    },

    /// The linked nodes ended before the index reached a position below `len`
    #[error("Positional index broken at position {position}")]
    CorruptIndex {
        /// First position that could not be materialized
        position: usize,
    },
}

/// A list kept ordered by a comparison bound at construction.
///
/// Equal elements keep their insertion order. Positional reads (`get`,
/// `remove_at`, `set`) take `&mut self` because they may extend the index.
#[derive(Clone)]
pub struct SortedList<T, C = Comparator<T>> {
    nodes: SlotMap<NodeKey, Node<T>>,
    head: Option<NodeKey>,
    tail: Option<NodeKey>,
    /// Keys for positions `[0, index.len())`, all of them current
    index: Vec<NodeKey>,
    compare: C,
}

impl<T: Ord> SortedList<T> {
    /// Create an empty list in ascending `Ord` order
    pub fn ascending() -> Self {
        Self::new(<T as Ord>::cmp)
    }
}

impl<T: Ord> Default for SortedList<T> {
    fn default() -> Self {
        Self::ascending()
    }
}

impl<T, C> SortedList<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    /// Create an empty list ordered by `compare`
    pub fn new(compare: C) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            head: None,
            tail: None,
            index: Vec::new(),
            compare,
        }
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the list holds no items
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of leading positions the index currently resolves without a rebuild
    pub fn valid_prefix(&self) -> usize {
        self.index.len()
    }

    /// Smallest item
    pub fn first(&self) -> Option<&T> {
        self.head.map(|key| &self.nodes[key].value)
    }

    /// Largest item (the most recently inserted among equal largest items)
    pub fn last(&self) -> Option<&T> {
        self.tail.map(|key| &self.nodes[key].value)
    }

    /// Iterate in order by following the links
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            nodes: &self.nodes,
            front: self.head,
            back: self.tail,
            remaining: self.nodes.len(),
        }
    }

    /// Insert an item and return the position it landed at.
    ///
    /// Items below the current minimum go to the front and invalidate the
    /// whole index. Items not less than the current maximum go to the back
    /// and leave the index alone. Anything else is placed after every item
    /// that compares less than or equal to it.
    pub fn insert(&mut self, item: T) -> usize {
        let len = self.len();
        let (Some(head), Some(tail)) = (self.head, self.tail) else {
            self.push_back(item);
            return 0;
        };

        if (self.compare)(&item, &self.nodes[head].value) == Ordering::Less {
            self.push_front(item);
            self.invalidate_from(0);
            return 0;
        }

        if (self.compare)(&item, &self.nodes[tail].value) != Ordering::Less {
            self.push_back(item);
            return len;
        }

        match self.insertion_point(&item) {
            Ok((position, anchor)) => {
                self.link_after(anchor, item);
                self.invalidate_from(position);
                position
            }
            Err(err) => {
                tracing::error!(%err, "sorted list index unusable, inserting by link walk");
                self.insert_by_walk(item)
            }
        }
    }

    /// Remove the item at `index`
    pub fn remove_at(&mut self, index: usize) -> Result<T, SortedListError> {
        let len = self.len();
        if index >= len {
            return Err(SortedListError::IndexOutOfRange { index, len });
        }

        let key = self.key_at(index)?;
        self.unlink(key, index)
            .ok_or(SortedListError::CorruptIndex { position: index })
    }

    /// Item at `index`, extending the index as far as `index` if needed
    pub fn get(&mut self, index: usize) -> Option<&T> {
        let key = self.key_at(index).ok()?;
        Some(&self.nodes[key].value)
    }

    /// Replace the item at `index` and return the old one.
    ///
    /// The new item is re-sorted, so it may land at a different position.
    pub fn set(&mut self, index: usize, item: T) -> Result<T, SortedListError> {
        let old = self.remove_at(index)?;
        self.insert(item);
        Ok(old)
    }

    /// Remove and return the smallest item
    pub fn pop_first(&mut self) -> Option<T> {
        let key = self.head?;
        self.unlink(key, 0)
    }

    /// Remove and return the largest item
    pub fn pop_last(&mut self) -> Option<T> {
        let key = self.tail?;
        let position = self.len() - 1;
        self.unlink(key, position)
    }

    /// Remove every item
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.index.clear();
        self.head = None;
        self.tail = None;
    }

    /// Binary search for the first position holding an item greater than
    /// `item`, returning it together with the key of the node before it.
    ///
    /// Callers guarantee `first <= item < last`, so the answer lies in `1..len`.
    fn insertion_point(&mut self, item: &T) -> Result<(usize, NodeKey), SortedListError> {
        let mut lo = 1;
        let mut hi = self.len() - 1;

        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let key = self.key_at(mid)?;
            if (self.compare)(&self.nodes[key].value, item) == Ordering::Greater {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }

        let anchor = self.key_at(lo - 1)?;
        Ok((lo, anchor))
    }

    fn insert_by_walk(&mut self, item: T) -> usize {
        self.index.clear();

        let mut position = 0;
        let mut prev = None;
        let mut cursor = self.head;
        while let Some(key) = cursor {
            if (self.compare)(&item, &self.nodes[key].value) == Ordering::Less {
                break;
            }
            prev = Some(key);
            cursor = self.nodes[key].next;
            position += 1;
        }

        match prev {
            Some(anchor) => self.link_after(anchor, item),
            None => self.push_front(item),
        }
        position
    }

    fn key_at(&mut self, position: usize) -> Result<NodeKey, SortedListError> {
        self.extend_index(position)?;
        Ok(self.index[position])
    }

    /// Materialize index positions up to and including `target`
    fn extend_index(&mut self, target: usize) -> Result<(), SortedListError> {
        if target < self.index.len() {
            return Ok(());
        }

        let len = self.len();
        if target >= len {
            return Err(SortedListError::IndexOutOfRange { index: target, len });
        }

        tracing::trace!(from = self.index.len(), to = target, "extending sorted list index");

        let mut cursor = match self.index.last() {
            Some(&key) => self.nodes[key].next,
            None => self.head,
        };

        while self.index.len() <= target {
            let Some(key) = cursor else {
                let position = self.index.len();
                tracing::error!(position, len, "linked nodes ended before the index target");
                return Err(SortedListError::CorruptIndex { position });
            };
            self.index.push(key);
            cursor = self.nodes[key].next;
        }

        Ok(())
    }

    fn invalidate_from(&mut self, position: usize) {
        self.index.truncate(position);
    }

    fn push_front(&mut self, value: T) {
        let key = self.nodes.insert(Node {
            value,
            prev: None,
            next: self.head,
        });
        match self.head {
            Some(head) => self.nodes[head].prev = Some(key),
            None => self.tail = Some(key),
        }
        self.head = Some(key);
    }

    fn push_back(&mut self, value: T) {
        let key = self.nodes.insert(Node {
            value,
            prev: self.tail,
            next: None,
        });
        match self.tail {
            Some(tail) => self.nodes[tail].next = Some(key),
            None => self.head = Some(key),
        }
        self.tail = Some(key);
    }

    fn link_after(&mut self, anchor: NodeKey, value: T) {
        let next = self.nodes[anchor].next;
        let key = self.nodes.insert(Node {
            value,
            prev: Some(anchor),
            next,
        });
        self.nodes[anchor].next = Some(key);
        match next {
            Some(next) => self.nodes[next].prev = Some(key),
            None => self.tail = Some(key),
        }
    }

    /// Unlink the node sitting at `position`. The index is cut back first so
    /// it never names a freed key.
    fn unlink(&mut self, key: NodeKey, position: usize) -> Option<T> {
        self.invalidate_from(position);
        let node = self.nodes.remove(key)?;

        match node.prev {
            Some(prev) => self.nodes[prev].next = node.next,
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => self.nodes[next].prev = node.prev,
            None => self.tail = node.prev,
        }

        Some(node.value)
    }
}

impl<T, C> SortedList<T, C>
where
    T: PartialEq,
    C: Fn(&T, &T) -> Ordering,
{
    /// Remove one item equal to `item`.
    ///
    /// Rebuilds the full index, finds the run of items that compare equal to
    /// `item` and unlinks the earliest one that is also `==`. Returns `false`
    /// when nothing matches.
    pub fn remove(&mut self, item: &T) -> bool {
        let Some(last) = self.len().checked_sub(1) else {
            return false;
        };
        if let Err(err) = self.extend_index(last) {
            tracing::error!(%err, "sorted list index unusable, remove skipped");
            return false;
        }

        let mut position = self
            .index
            .partition_point(|&key| (self.compare)(&self.nodes[key].value, item) == Ordering::Less);

        while position < self.index.len() {
            let key = self.index[position];
            let value = &self.nodes[key].value;
            if (self.compare)(value, item) != Ordering::Equal {
                break;
            }
            if value == item {
                return self.unlink(key, position).is_some();
            }
            position += 1;
        }

        false
    }

    /// Whether some item is `==` to `item`
    pub fn contains(&self, item: &T) -> bool {
        self.iter().any(|value| value == item)
    }
}

impl<T, C> Extend<T> for SortedList<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for SortedList<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, T, C> IntoIterator for &'a SortedList<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator over a sorted list
pub struct Iter<'a, T> {
    nodes: &'a SlotMap<NodeKey, Node<T>>,
    front: Option<NodeKey>,
    back: Option<NodeKey>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let nodes = self.nodes;
        let node = &nodes[self.front?];
        self.front = node.next;
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let nodes = self.nodes;
        let node = &nodes[self.back?];
        self.back = node.prev;
        self.remaining -= 1;
        Some(&node.value)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn by_key(a: &(i32, char), b: &(i32, char)) -> Ordering {
        a.0.cmp(&b.0)
    }

    fn collect<T: Clone, C: Fn(&T, &T) -> Ordering>(list: &SortedList<T, C>) -> Vec<T> {
        list.iter().cloned().collect()
    }

    #[test]
    fn test_insert_keeps_ties_in_insertion_order() {
        let mut list = SortedList::new(by_key);
        for item in [(5, 'a'), (1, 'b'), (9, 'c'), (1, 'd'), (3, 'e')] {
            list.insert(item);
        }

        assert_eq!(
            collect(&list),
            vec![(1, 'b'), (1, 'd'), (3, 'e'), (5, 'a'), (9, 'c')]
        );

        list.insert((1, 'f'));
        list.insert((9, 'g'));
        assert_eq!(list.get(2), Some(&(1, 'f')));
        assert_eq!(list.last(), Some(&(9, 'g')));
    }

    #[test]
    fn test_insert_returns_landing_position() {
        let mut list = SortedList::ascending();
        assert_eq!(list.insert(10), 0);
        assert_eq!(list.insert(20), 1);
        assert_eq!(list.insert(5), 0);
        assert_eq!(list.insert(15), 2);
        assert_eq!(list.insert(20), 4);
        assert_eq!(collect(&list), vec![5, 10, 15, 20, 20]);
    }

    #[test]
    fn test_index_prefix_tracks_mutations() {
        let mut list = SortedList::ascending();
        list.extend([10, 20, 30, 40, 50]);
        assert_eq!(list.valid_prefix(), 0);

        assert_eq!(list.get(2), Some(&30));
        assert_eq!(list.valid_prefix(), 3);

        // Appending past the maximum leaves the prefix alone
        list.insert(60);
        assert_eq!(list.valid_prefix(), 3);

        assert_eq!(list.get(5), Some(&60));
        assert_eq!(list.valid_prefix(), 6);

        // A middle insert invalidates from its landing position onward
        assert_eq!(list.insert(35), 3);
        assert_eq!(list.valid_prefix(), 3);

        // A front insert shifts every position
        list.insert(1);
        assert_eq!(list.valid_prefix(), 0);
        assert_eq!(list.get(4), Some(&35));
    }

    #[test]
    fn test_remove_by_value() {
        let mut list = SortedList::new(by_key);
        list.extend([(2, 'a'), (2, 'b'), (4, 'c'), (7, 'd')]);

        assert!(list.remove(&(2, 'b')));
        assert_eq!(collect(&list), vec![(2, 'a'), (4, 'c'), (7, 'd')]);

        // Compares equal but is not the same value
        assert!(!list.remove(&(4, 'z')));
        assert!(!list.remove(&(3, 'c')));
        assert_eq!(list.len(), 3);

        assert!(list.remove(&(7, 'd')));
        assert_eq!(list.last(), Some(&(4, 'c')));
        assert!(!SortedList::<i32>::ascending().remove(&1));
    }

    #[test]
    fn test_remove_at_out_of_range_leaves_list_unchanged() {
        let mut list = SortedList::ascending();
        list.extend([3, 1, 2]);

        assert_eq!(
            list.remove_at(3),
            Err(SortedListError::IndexOutOfRange { index: 3, len: 3 })
        );
        assert_eq!(list.len(), 3);
        assert_eq!(collect(&list), vec![1, 2, 3]);

        assert_eq!(list.remove_at(1), Ok(2));
        assert_eq!(collect(&list), vec![1, 3]);
        assert_eq!(list.valid_prefix(), 1);
    }

    #[test]
    fn test_set_resorts_item() {
        let mut list = SortedList::ascending();
        list.extend([10, 20, 30]);

        assert_eq!(list.set(0, 25), Ok(10));
        assert_eq!(collect(&list), vec![20, 25, 30]);
        assert!(list.set(7, 1).is_err());
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_pop_both_ends() {
        let mut list = SortedList::ascending();
        list.extend([4, 8, 6]);
        assert_eq!(list.get(2), Some(&8));

        assert_eq!(list.pop_last(), Some(8));
        assert_eq!(list.valid_prefix(), 2);
        assert_eq!(list.pop_first(), Some(4));
        assert_eq!(list.valid_prefix(), 0);
        assert_eq!(list.pop_first(), Some(6));
        assert_eq!(list.pop_first(), None);
        assert!(list.is_empty());
    }

    #[test]
    fn test_iteration_both_directions() {
        let mut list = SortedList::ascending();
        list.extend([3, 1, 2]);

        let reversed: Vec<_> = list.iter().rev().copied().collect();
        assert_eq!(reversed, vec![3, 2, 1]);
        assert_eq!(list.iter().len(), 3);
        assert!(list.contains(&2));
        assert!(!list.contains(&5));
        assert_eq!(format!("{list:?}"), "[1, 2, 3]");

        list.clear();
        assert_eq!(list.iter().next(), None);
        assert_eq!(list.first(), None);
    }
}
