//! Ordered list of frame ids with O(1) append, unlink and move-to-back.
//!
//! The replacer keeps two of these (cold and hot). Links are stored in a
//! table indexed by `frame_id.0`, so the table doubles as the id → position
//! index and no per-node allocation happens after construction.

use crate::common::FrameId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Link {
    prev: Option<usize>,
    next: Option<usize>,
}

/// Intrusive doubly-linked list over the frame ids `0..capacity`.
///
/// Front = oldest, back = most recently appended.
#[derive(Debug)]
pub(crate) struct AccessList {
    links: Vec<Option<Link>>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl AccessList {
    /// Create an empty list able to hold frame ids `0..capacity`.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            links: vec![None; capacity],
            head: None,
            tail: None,
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn contains(&self, frame_id: FrameId) -> bool {
        matches!(self.links.get(frame_id.0), Some(Some(_)))
    }

    /// Append `frame_id` at the back. The id must not already be linked.
    pub(crate) fn push_back(&mut self, frame_id: FrameId) {
        debug_assert!(!self.contains(frame_id), "{} already linked", frame_id);

        let idx = frame_id.0;
        self.links[idx] = Some(Link {
            prev: self.tail,
            next: None,
        });

        match self.tail {
            Some(tail) => self.set_next(tail, Some(idx)),
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
        self.len += 1;
    }

    /// Unlink `frame_id`. Returns false if it was not in the list.
    pub(crate) fn unlink(&mut self, frame_id: FrameId) -> bool {
        let Some(link) = self.links.get_mut(frame_id.0).and_then(Option::take) else {
            return false;
        };

        match link.prev {
            Some(prev) => self.set_next(prev, link.next),
            None => self.head = link.next,
        }
        match link.next {
            Some(next) => self.set_prev(next, link.prev),
            None => self.tail = link.prev,
        }
        self.len -= 1;
        true
    }

    /// Move `frame_id` to the back. No-op if it is not in the list.
    pub(crate) fn move_to_back(&mut self, frame_id: FrameId) {
        if self.tail == Some(frame_id.0) {
            return;
        }
        if self.unlink(frame_id) {
            self.push_back(frame_id);
        }
    }

    /// Iterate front (oldest) to back (newest).
    pub(crate) fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    fn set_next(&mut self, idx: usize, next: Option<usize>) {
        if let Some(link) = self.links[idx].as_mut() {
            link.next = next;
        }
    }

    fn set_prev(&mut self, idx: usize, prev: Option<usize>) {
        if let Some(link) = self.links[idx].as_mut() {
            link.prev = prev;
        }
    }
}

pub(crate) struct Iter<'a> {
    list: &'a AccessList,
    cursor: Option<usize>,
}

impl Iterator for Iter<'_> {
    type Item = FrameId;

    fn next(&mut self) -> Option<FrameId> {
        let idx = self.cursor?;
        self.cursor = self.list.links[idx].and_then(|link| link.next);
        Some(FrameId(idx))
    }
}
