//! Chunked slab allocator that owns the nodes of every tree in this crate.

use std::mem;
use std::ops::{Index, IndexMut};
use std::vec::Vec;

/// Number of slots allocated per chunk when no chunk size is given.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// A stable reference to a value allocated in a `TypedArena<T>`.
///
/// Handles are plain indices, so they are `Copy` and never keep the value alive. A handle becomes
/// stale once its value is freed, and the slot may later be handed out again.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Handle {
    chunk: usize,
    slot: usize,
}

enum Slot<T> {
    Occupied(T),
    Vacant(Option<Handle>),
}

/// An allocator for a single type of object that hands out `Handle`s instead of references.
///
/// Storage grows one chunk at a time and chunks are never reallocated, so a `Handle` stays valid
/// until its value is freed. Freed slots are threaded onto a free list and recycled by the next
/// allocation. Dropping the arena drops every live value without walking any links between them.
///
/// # Examples
///
/// ```
/// use splay_collections::arena::TypedArena;
///
/// let mut arena = TypedArena::new(16);
///
/// let x = arena.allocate(1);
/// assert_eq!(arena[x], 1);
///
/// arena[x] += 1;
/// assert_eq!(arena[x], 2);
///
/// assert_eq!(arena.free(x), 2);
/// assert_eq!(arena.get(x), None);
/// ```
pub struct TypedArena<T> {
    free_head: Option<Handle>,
    chunks: Vec<Vec<Slot<T>>>,
    chunk_size: usize,
    len: usize,
    capacity: usize,
}

impl<T> TypedArena<T> {
    /// Constructs a new, empty `TypedArena<T>` that allocates `chunk_size` slots at a time. A
    /// chunk size of zero is treated as one.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::arena::TypedArena;
    ///
    /// let arena: TypedArena<u32> = TypedArena::new(1024);
    /// assert!(arena.is_empty());
    /// ```
    pub fn new(chunk_size: usize) -> Self {
        TypedArena {
            free_head: None,
            chunks: Vec::new(),
            chunk_size: chunk_size.max(1),
            len: 0,
            capacity: 0,
        }
    }

    fn slot(&self, handle: Handle) -> Option<&Slot<T>> {
        self.chunks.get(handle.chunk).and_then(|chunk| chunk.get(handle.slot))
    }

    fn slot_mut(&mut self, handle: Handle) -> Option<&mut Slot<T>> {
        self.chunks.get_mut(handle.chunk).and_then(|chunk| chunk.get_mut(handle.slot))
    }

    /// Moves `value` into the arena and returns its handle. A previously freed slot is reused
    /// before any new slot is touched.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate("x");
    /// assert_eq!(arena[x], "x");
    /// ```
    pub fn allocate(&mut self, value: T) -> Handle {
        self.len += 1;

        if let Some(handle) = self.free_head {
            let slot = &mut self.chunks[handle.chunk][handle.slot];
            match mem::replace(slot, Slot::Occupied(value)) {
                Slot::Vacant(next) => self.free_head = next,
                Slot::Occupied(_) => unreachable!("free list points at an occupied slot"),
            }
            return handle;
        }

        if self.len > self.capacity {
            self.chunks.push(Vec::with_capacity(self.chunk_size));
            self.capacity += self.chunk_size;
        }

        let chunk = self.chunks.len() - 1;
        let last_chunk = &mut self.chunks[chunk];
        last_chunk.push(Slot::Occupied(value));
        Handle {
            chunk,
            slot: last_chunk.len() - 1,
        }
    }

    /// Removes the value behind `handle` from the arena and returns it.
    ///
    /// # Panics
    ///
    /// Panics if `handle` was never allocated by this arena or has already been freed.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.free(x), 0);
    /// ```
    pub fn free(&mut self, handle: Handle) -> T {
        let free_head = self.free_head;
        let slot = match self.slot_mut(handle) {
            Some(slot) => slot,
            None => panic!("Error: attempting to free invalid handle {:?}.", handle),
        };
        if let Slot::Vacant(_) = *slot {
            panic!("Error: attempting to free vacant handle {:?}.", handle);
        }
        match mem::replace(slot, Slot::Vacant(free_head)) {
            Slot::Occupied(value) => {
                self.len -= 1;
                self.free_head = Some(handle);
                value
            },
            Slot::Vacant(_) => unreachable!(),
        }
    }

    /// Returns an immutable reference to the value behind `handle`, or `None` if the handle is
    /// stale or foreign to this arena.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.get(x), Some(&0));
    /// ```
    pub fn get(&self, handle: Handle) -> Option<&T> {
        match self.slot(handle) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns a mutable reference to the value behind `handle`, or `None` if the handle is stale
    /// or foreign to this arena.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(0);
    /// *arena.get_mut(x).unwrap() = 1;
    /// assert_eq!(arena[x], 1);
    /// ```
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        match self.slot_mut(handle) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns the number of live values in the arena.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the arena holds no live values.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every value and releases all chunks. Every outstanding handle becomes stale.
    pub fn clear(&mut self) {
        self.free_head = None;
        self.chunks.clear();
        self.len = 0;
        self.capacity = 0;
    }
}

impl<T> Index<Handle> for TypedArena<T> {
    type Output = T;

    fn index(&self, handle: Handle) -> &Self::Output {
        match self.get(handle) {
            Some(value) => value,
            None => panic!("Error: handle {:?} does not refer to a live value.", handle),
        }
    }
}

impl<T> IndexMut<Handle> for TypedArena<T> {
    fn index_mut(&mut self, handle: Handle) -> &mut Self::Output {
        match self.get_mut(handle) {
            Some(value) => value,
            None => panic!("Error: handle {:?} does not refer to a live value.", handle),
        }
    }
}
