//! A priority queue implemented with a 4-ary heap.
//!
//! Insertion and popping the minimal element have `O(log n)` time complexity.
//! Checking the minimal element is `O(1)`. Keys of elements in the heap can
//! be decreased.
//!
//! # Examples
//!
//! ```
//! use core_ch::datastr::index_heap::{Indexing, IndexdMinHeap};
//!
//! #[derive(Copy, Clone, Eq, PartialEq, Debug, Ord, PartialOrd)]
//! pub struct State {
//!     pub distance: usize,
//!     pub node: usize,
//! }
//!
//! // The `Indexing` trait needs to be implemented as well, so we can find elements to decrease their key.
//! impl Indexing for State {
//!     fn as_index(&self) -> usize {
//!         self.node
//!     }
//! }
//!
//! let mut heap = IndexdMinHeap::new(3);
//! heap.push(State { node: 0, distance: 42 });
//! heap.push(State { node: 1, distance: 23 });
//! heap.push(State { node: 2, distance: 50000 });
//! assert_eq!(heap.peek().cloned(), Some(State { node: 1, distance: 23 }));
//! heap.decrease_key(State { node: 0, distance: 1 });
//! assert_eq!(heap.pop(), Some(State { node: 0, distance: 1 }));
//! ```

/// A trait to map elements in a heap to a unique index.
/// The element type of the `IndexdMinHeap` has to implement this trait.
pub trait Indexing {
    /// This method has to map a heap element to a unique `usize` index.
    fn as_index(&self) -> usize;
}

/// A priority queue where the elements are IDs from 0 to id_count-1 where id_count is a number that is set in the constructor.
/// The elements are sorted ascending by the ordering defined by the `Ord` trait.
/// The interface mirrors the standard library BinaryHeap (except for the reversed order).
/// Every index can be contained at most once.
#[derive(Debug)]
pub struct IndexdMinHeap<T> {
    positions: Vec<usize>,
    data: Vec<T>,
}

const TREE_ARITY: usize = 4;
const INVALID_POSITION: usize = usize::MAX;

impl<T: Ord + Indexing + Copy> IndexdMinHeap<T> {
    /// Creates an empty `IndexdMinHeap` as a min-heap.
    /// The indices (as defined by the `Indexing` trait) of all inserted elements
    /// will have to be in `[0, max_index)`
    pub fn new(max_index: usize) -> IndexdMinHeap<T> {
        IndexdMinHeap {
            positions: vec![INVALID_POSITION; max_index],
            data: Vec::new(),
        }
    }

    /// Returns the number of elements in the heap.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Checks if the heap is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks if the heap already contains an element mapped to the given index
    pub fn contains_index(&self, index: usize) -> bool {
        self.positions[index] != INVALID_POSITION
    }

    /// Drops all items from the heap.
    pub fn clear(&mut self) {
        for element in &self.data {
            self.positions[element.as_index()] = INVALID_POSITION;
        }
        self.data.clear();
    }

    /// Returns a reference to the smallest item in the heap, or None if it is empty.
    pub fn peek(&self) -> Option<&T> {
        self.data.first()
    }

    /// Removes the smallest item from the heap and returns it, or None if it is empty.
    pub fn pop(&mut self) -> Option<T> {
        self.data.pop().map(|mut item| {
            self.positions[item.as_index()] = INVALID_POSITION;
            if !self.is_empty() {
                std::mem::swap(&mut item, &mut self.data[0]);
                self.positions[item.as_index()] = INVALID_POSITION;
                self.positions[self.data[0].as_index()] = 0;
                self.move_down_in_tree(0);
            }
            item
        })
    }

    /// Pushes an item onto the heap.
    /// Panics if an element with the same index already exists.
    pub fn push(&mut self, element: T) {
        assert!(!self.contains_index(element.as_index()));
        let insert_position = self.len();
        self.positions[element.as_index()] = insert_position;
        self.data.push(element);
        self.move_up_in_tree(insert_position);
    }

    /// Updates the key of an element if the new key is smaller than the old key.
    /// Undefined if the new key is larger.
    pub fn decrease_key(&mut self, element: T) {
        let position = self.positions[element.as_index()];
        self.data[position] = element;
        self.move_up_in_tree(position);
    }

    fn move_up_in_tree(&mut self, mut position: usize) {
        while position > 0 {
            let parent = (position - 1) / TREE_ARITY;
            if self.data[parent] < self.data[position] {
                break;
            }
            self.positions.swap(self.data[parent].as_index(), self.data[position].as_index());
            self.data.swap(parent, position);
            position = parent;
        }
    }

    fn move_down_in_tree(&mut self, mut position: usize) {
        loop {
            let first_child = TREE_ARITY * position + 1;
            let children = first_child..std::cmp::min(first_child + TREE_ARITY, self.len());
            let Some(smallest_child) = children.min_by_key(|&child| self.data[child]) else {
                return;
            };
            if self.data[smallest_child] >= self.data[position] {
                return;
            }
            self.positions.swap(self.data[position].as_index(), self.data[smallest_child].as_index());
            self.data.swap(position, smallest_child);
            position = smallest_child;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Copy, Clone, Eq, PartialEq, Debug, Ord, PartialOrd)]
    struct State {
        key: u32,
        node: u32,
    }

    impl Indexing for State {
        fn as_index(&self) -> usize {
            self.node as usize
        }
    }

    #[test]
    fn pops_in_key_order() {
        let mut heap = IndexdMinHeap::new(10);
        for (node, key) in [(3, 7), (0, 4), (9, 1), (5, 12)] {
            heap.push(State { key, node });
        }

        assert_eq!(heap.pop(), Some(State { key: 1, node: 9 }));
        assert_eq!(heap.pop(), Some(State { key: 4, node: 0 }));
        assert_eq!(heap.pop(), Some(State { key: 7, node: 3 }));
        assert_eq!(heap.pop(), Some(State { key: 12, node: 5 }));
        assert_eq!(heap.pop(), None);
    }

    #[test]
    fn equal_keys_pop_lowest_id_first() {
        let mut heap = IndexdMinHeap::new(10);
        for node in [7, 2, 5] {
            heap.push(State { key: 3, node });
        }

        assert_eq!(heap.pop(), Some(State { key: 3, node: 2 }));
        assert_eq!(heap.pop(), Some(State { key: 3, node: 5 }));
        assert_eq!(heap.pop(), Some(State { key: 3, node: 7 }));
    }

    #[test]
    fn decrease_key_reorders() {
        let mut heap = IndexdMinHeap::new(4);
        heap.push(State { key: 10, node: 0 });
        heap.push(State { key: 20, node: 1 });
        heap.push(State { key: 30, node: 2 });

        assert!(heap.contains_index(2));
        heap.decrease_key(State { key: 5, node: 2 });
        assert_eq!(heap.pop(), Some(State { key: 5, node: 2 }));
        assert!(!heap.contains_index(2));

        heap.clear();
        assert!(heap.is_empty());
        assert!(!heap.contains_index(0));
    }
}
