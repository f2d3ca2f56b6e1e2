// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Vec-backed arena with a free list. The beach line allocates and releases
// its arc and breakpoint nodes through this type, so node indices stay
// stable while the tree is rebalanced around them.

/// A simple arena allocator backed by a Vec.
/// Items are allocated by pushing to the vec and freed via a freelist.
#[derive(Debug, Clone)]
pub struct BucketAlloc<T> {
    items: Vec<Option<T>>,
    free_list: Vec<u32>,
}

impl<T> BucketAlloc<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Store `value`, returning its index. Freed slots are reused first.
    pub fn alloc(&mut self, value: T) -> u32 {
        if let Some(idx) = self.free_list.pop() {
            self.items[idx as usize] = Some(value);
            idx
        } else {
            let idx = self.items.len() as u32;
            self.items.push(Some(value));
            idx
        }
    }

    /// Free an item by index, handing back its value.
    pub fn free(&mut self, idx: u32) -> Option<T> {
        let slot = self.items.get_mut(idx as usize)?;
        let value = slot.take()?;
        self.free_list.push(idx);
        Some(value)
    }

    pub fn get(&self, idx: u32) -> Option<&T> {
        self.items.get(idx as usize)?.as_ref()
    }

    /// Number of live items.
    pub fn len(&self) -> usize {
        self.items.len() - self.free_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for BucketAlloc<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Indexing a freed slot is a broken invariant in the caller.
impl<T> std::ops::Index<u32> for BucketAlloc<T> {
    type Output = T;

    fn index(&self, idx: u32) -> &T {
        match self.items[idx as usize].as_ref() {
            Some(v) => v,
            None => panic!("bucket slot {} is free", idx),
        }
    }
}

impl<T> std::ops::IndexMut<u32> for BucketAlloc<T> {
    fn index_mut(&mut self, idx: u32) -> &mut T {
        match self.items[idx as usize].as_mut() {
            Some(v) => v,
            None => panic!("bucket slot {} is free", idx),
        }
    }
}
