//! A bare-bones heap supporting only `push` and `pop_top`, ported from
//! gnulib's `heap.c` (credited there to GDSL by Nicolas Darnis).
//!
//! # Comparator convention
//!
//! The comparator follows the *teacher's* convention exactly, because
//! swapping it silently corrupts [`crate::heap`]'s use inside a k-way
//! merge: `cmp(a, b)` returns a value whose sign says whether `a` is
//! greater (`> 0`), equal (`== 0`) or less (`< 0`) than `b`, and the
//! heap keeps the *greatest* element (by that ordering) at the top.
//! The invariant maintained after every operation is: for every
//! non-root index `k`, `cmp(array[k/2], array[k]) > 0`.
//!
//! To get a conventional min-heap, pass a comparator that reverses its
//! arguments' natural order (`cmp(b, a)` instead of `cmp(a, b)`).

/// A heap over `T`, ordered by a caller-supplied comparator.
///
/// Slot 0 of the backing storage is never used, matching the source's
/// 1-indexed array so that a child/parent index is a simple `* 2` /
/// `/ 2` away from its parent/child.
pub struct Heap<T, F>
where
    F: Fn(&T, &T) -> std::cmp::Ordering,
{
    // array[0] is a placeholder; real elements start at index 1.
    array: Vec<Option<T>>,
    compare: F,
}

impl<T, F> Heap<T, F>
where
    F: Fn(&T, &T) -> std::cmp::Ordering,
{
    /// Allocate a heap with the given comparator and an initial reserve.
    pub fn alloc(compare: F, n_reserve: usize) -> Self {
        let n_reserve = n_reserve.max(1);
        let mut array = Vec::with_capacity(n_reserve + 1);
        array.push(None);
        Heap { array, compare }
    }

    /// Number of elements currently in the heap.
    pub fn len(&self) -> usize {
        self.array.len() - 1
    }

    /// True if the heap holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert `item`, restoring the heap invariant by sifting up.
    pub fn push(&mut self, item: T) {
        self.array.push(Some(item));
        let count = self.array.len() - 1;
        self.heapify_up(count);
    }

    /// Remove and return the top (greatest, by the comparator) element.
    pub fn pop_top(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let top = self.array[1].take();
        let last = self.array.pop().unwrap();
        if !self.array.len().eq(&1) {
            self.array[1] = last;
            self.heapify_down(1);
        }
        top
    }

    fn heapify_up(&mut self, mut k: usize) {
        while k != 1 {
            let parent = k >> 1;
            if self.cmp_slots(parent, k) != std::cmp::Ordering::Greater {
                self.array.swap(parent, k);
                k = parent;
            } else {
                break;
            }
        }
    }

    fn heapify_down(&mut self, initial: usize) {
        let count = self.array.len() - 1;
        let mut parent = initial;
        loop {
            if parent > count >> 1 {
                break;
            }
            let mut child = 2 * parent;
            if child < count && self.cmp_slots(child, child + 1) == std::cmp::Ordering::Less {
                child += 1;
            }
            if self.cmp_slots(child, parent) != std::cmp::Ordering::Greater {
                break;
            }
            self.array.swap(parent, child);
            parent = child;
        }
    }

    fn cmp_slots(&self, a: usize, b: usize) -> std::cmp::Ordering {
        let a = self.array[a].as_ref().unwrap();
        let b = self.array[b].as_ref().unwrap();
        (self.compare)(a, b)
    }
}
