// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Indexed binary max-heap for sweep events.
//
// The key is the event height; the highest event comes out first and equal
// heights come out in insertion order. Every insert hands back a handle that
// can later delete the entry wherever it sits in the heap. Handles carry a
// generation so a handle whose entry was already popped or deleted is
// recognised as stale instead of hitting a recycled slot.

use crate::geom::Real;

/// Handle to a queued entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PqHandle {
    slot: u32,
    generation: u32,
}

struct Slot<T> {
    key: Real,
    seq: u64,
    /// 1-based position in `nodes`; 0 when the slot is free.
    pos: usize,
    generation: u32,
    item: Option<T>,
}

pub struct PriorityQ<T> {
    /// nodes[1..=size] are active; nodes[0] unused. Stores slot indices.
    nodes: Vec<u32>,
    slots: Vec<Slot<T>>,
    free_list: Vec<u32>,
    next_seq: u64,
}

impl<T> PriorityQ<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(size: usize) -> Self {
        let mut nodes = Vec::with_capacity(size + 1);
        nodes.push(u32::MAX);
        PriorityQ {
            nodes,
            slots: Vec::with_capacity(size),
            free_list: Vec::new(),
            next_seq: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if `a` must come out before `b`.
    #[inline]
    fn above(&self, a: u32, b: u32) -> bool {
        let sa = &self.slots[a as usize];
        let sb = &self.slots[b as usize];
        sa.key > sb.key || (sa.key == sb.key && sa.seq < sb.seq)
    }

    #[inline]
    fn place(&mut self, pos: usize, slot: u32) {
        self.nodes[pos] = slot;
        self.slots[slot as usize].pos = pos;
    }

    fn float_up(&mut self, mut curr: usize) {
        let h_curr = self.nodes[curr];
        while curr > 1 {
            let parent = curr >> 1;
            let h_parent = self.nodes[parent];
            if !self.above(h_curr, h_parent) {
                break;
            }
            self.place(curr, h_parent);
            curr = parent;
        }
        self.place(curr, h_curr);
    }

    fn float_down(&mut self, mut curr: usize) {
        let size = self.len();
        let h_curr = self.nodes[curr];
        loop {
            let mut child = curr << 1;
            if child > size {
                break;
            }
            if child < size && self.above(self.nodes[child + 1], self.nodes[child]) {
                child += 1;
            }
            let h_child = self.nodes[child];
            if !self.above(h_child, h_curr) {
                break;
            }
            self.place(curr, h_child);
            curr = child;
        }
        self.place(curr, h_curr);
    }

    /// Queue `item` at height `key`.
    pub fn push(&mut self, key: Real, item: T) -> PqHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        let slot = match self.free_list.pop() {
            Some(s) => {
                let entry = &mut self.slots[s as usize];
                entry.key = key;
                entry.seq = seq;
                entry.item = Some(item);
                s
            }
            None => {
                self.slots.push(Slot {
                    key,
                    seq,
                    pos: 0,
                    generation: 0,
                    item: Some(item),
                });
                (self.slots.len() - 1) as u32
            }
        };
        self.nodes.push(slot);
        let curr = self.len();
        self.float_up(curr);
        PqHandle {
            slot,
            generation: self.slots[slot as usize].generation,
        }
    }

    /// Remove and return the highest entry.
    pub fn pop(&mut self) -> Option<(Real, T)> {
        if self.is_empty() {
            return None;
        }
        let slot = self.nodes[1];
        self.remove_at(1);
        let key = self.slots[slot as usize].key;
        self.release(slot).map(|item| (key, item))
    }

    /// Whether `handle` still refers to a queued entry.
    pub fn contains(&self, handle: PqHandle) -> bool {
        match self.slots.get(handle.slot as usize) {
            Some(s) => s.generation == handle.generation && s.pos != 0,
            None => false,
        }
    }

    /// Cancel the entry behind `handle`. A stale handle is a no-op that
    /// returns false.
    pub fn delete(&mut self, handle: PqHandle) -> bool {
        self.remove(handle).is_some()
    }

    /// Remove the entry behind `handle`, handing back its item.
    pub fn remove(&mut self, handle: PqHandle) -> Option<T> {
        if !self.contains(handle) {
            return None;
        }
        let pos = self.slots[handle.slot as usize].pos;
        self.remove_at(pos);
        self.release(handle.slot)
    }

    fn remove_at(&mut self, curr: usize) {
        let last = self.len();
        let removed = self.nodes[curr];
        self.slots[removed as usize].pos = 0;
        let tail = match self.nodes.pop() {
            Some(t) => t,
            None => return,
        };
        if curr == last {
            return;
        }
        self.place(curr, tail);
        if curr > 1 && self.above(tail, self.nodes[curr >> 1]) {
            self.float_up(curr);
        } else {
            self.float_down(curr);
        }
    }

    fn release(&mut self, slot: u32) -> Option<T> {
        let entry = &mut self.slots[slot as usize];
        entry.generation = entry.generation.wrapping_add(1);
        self.free_list.push(slot);
        entry.item.take()
    }
}

impl<T> Default for PriorityQ<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_highest_first() {
        let mut pq = PriorityQ::new();
        for &k in &[3.0, 1.0, 4.0, 1.5, 9.0, 2.6] {
            pq.push(k, k);
        }
        let mut out = Vec::new();
        while let Some((k, _)) = pq.pop() {
            out.push(k);
        }
        assert_eq!(out, vec![9.0, 4.0, 3.0, 2.6, 1.5, 1.0]);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let mut pq = PriorityQ::new();
        pq.push(5.0, "a");
        pq.push(7.0, "top");
        pq.push(5.0, "b");
        pq.push(5.0, "c");
        let order: Vec<&str> = std::iter::from_fn(|| pq.pop().map(|(_, v)| v)).collect();
        assert_eq!(order, vec!["top", "a", "b", "c"]);
    }

    #[test]
    fn delete_anywhere() {
        let mut pq = PriorityQ::new();
        let handles: Vec<PqHandle> = (0..10).map(|i| pq.push(i as Real, i)).collect();
        assert_eq!(pq.remove(handles[9]), Some(9));
        assert!(pq.delete(handles[4]));
        assert_eq!(pq.remove(handles[0]), Some(0));
        assert_eq!(pq.len(), 7);
        let rest: Vec<i32> = std::iter::from_fn(|| pq.pop().map(|(_, v)| v)).collect();
        assert_eq!(rest, vec![8, 7, 6, 5, 3, 2, 1]);
    }

    #[test]
    fn stale_handles_are_ignored() {
        let mut pq = PriorityQ::new();
        let h = pq.push(1.0, 'x');
        assert!(pq.contains(h));
        assert_eq!(pq.pop(), Some((1.0, 'x')));
        assert!(!pq.contains(h));
        // The slot is recycled; the old handle must not reach the new entry.
        let h2 = pq.push(2.0, 'y');
        assert!(!pq.delete(h));
        assert_eq!(pq.len(), 1);
        assert_eq!(pq.remove(h2), Some('y'));
        assert!(!pq.delete(h2));
        assert!(pq.is_empty());
    }
}
