//! Append-only point history
//!
//! Points are stored in fixed-length chunks. Once a chunk fills up it is sealed
//! into an `Arc<[Point]>` and never touched again, so a snapshot only has to
//! clone the sealed chunk handles and copy the short open tail.
//!
//! Every point keeps the absolute index it was generated at. Eviction (capacity
//! or an explicit discard) moves `first_index` forward but never renumbers.

use std::collections::VecDeque;
use std::sync::Arc;

use super::point::Point;
use crate::consts::HISTORY_CHUNK_LEN;

/// Generated points, oldest first
#[derive(Debug, Clone)]
pub struct History {
    sealed: VecDeque<Arc<[Point]>>,
    open: Vec<Point>,
    chunk_len: usize,
    /// Retained points stay in `[capacity, capacity + chunk_len)` once
    /// that many have been pushed
    capacity: Option<usize>,
    evicted: usize,
    retained: usize,
}

impl History {
    pub fn new(capacity: Option<usize>) -> Self {
        Self::with_chunk_len(capacity, HISTORY_CHUNK_LEN)
    }

    pub fn with_chunk_len(capacity: Option<usize>, chunk_len: usize) -> Self {
        let chunk_len = chunk_len.max(1);
        Self {
            sealed: VecDeque::new(),
            open: Vec::with_capacity(chunk_len),
            chunk_len,
            capacity,
            evicted: 0,
            retained: 0,
        }
    }

    pub fn push(&mut self, point: Point) {
        self.open.push(point);
        self.retained += 1;
        if self.open.len() >= self.chunk_len {
            let full = std::mem::replace(&mut self.open, Vec::with_capacity(self.chunk_len));
            self.sealed.push_back(Arc::from(full));
        }
        self.evict_overflow();
    }

    /// Drop whole sealed chunks from the front while the remainder still
    /// holds at least `capacity` points
    fn evict_overflow(&mut self) {
        let Some(capacity) = self.capacity else {
            return;
        };
        while let Some(front) = self.sealed.front() {
            let front_len = front.len();
            if self.retained - front_len < capacity {
                break;
            }
            self.sealed.pop_front();
            self.retained -= front_len;
            self.evicted += front_len;
            log::debug!("History evicted {} points (first index now {})", front_len, self.evicted);
        }
    }

    /// Discard every retained point. Absolute indices keep counting.
    pub fn discard_all(&mut self) {
        self.evicted += self.retained;
        self.retained = 0;
        self.sealed.clear();
        self.open.clear();
    }

    /// Points currently retained
    pub fn len(&self) -> usize {
        self.retained
    }

    pub fn is_empty(&self) -> bool {
        self.retained == 0
    }

    /// Points ever pushed, including evicted ones
    pub fn total(&self) -> usize {
        self.evicted + self.retained
    }

    /// Absolute index of the oldest retained point
    pub fn first_index(&self) -> usize {
        self.evicted
    }

    pub fn last(&self) -> Option<Point> {
        self.open
            .last()
            .or_else(|| self.sealed.back().and_then(|c| c.last()))
            .copied()
    }

    /// Consistent read-only copy of the retained points
    pub fn snapshot(&self) -> Snapshot {
        let mut chunks: Vec<Arc<[Point]>> = self.sealed.iter().cloned().collect();
        if !self.open.is_empty() {
            chunks.push(Arc::from(self.open.as_slice()));
        }
        Snapshot {
            first_index: self.evicted,
            len: self.retained,
            chunk_len: self.chunk_len,
            chunks,
        }
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Immutable view of a history at one moment
///
/// Cloning is cheap; the chunks are shared.
#[derive(Debug, Clone)]
pub struct Snapshot {
    first_index: usize,
    len: usize,
    chunk_len: usize,
    chunks: Vec<Arc<[Point]>>,
}

impl Snapshot {
    /// Retained points in this snapshot
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Absolute index of the first point in this snapshot
    pub fn first_index(&self) -> usize {
        self.first_index
    }

    /// Points generated up to this snapshot, including evicted ones
    pub fn total(&self) -> usize {
        self.first_index + self.len
    }

    /// Point at an absolute index, if still retained
    pub fn get(&self, index: usize) -> Option<Point> {
        let offset = index.checked_sub(self.first_index)?;
        if offset >= self.len {
            return None;
        }
        let chunk = self.chunks.get(offset / self.chunk_len)?;
        chunk.get(offset % self.chunk_len).copied()
    }

    pub fn last(&self) -> Option<Point> {
        self.chunks.last().and_then(|c| c.last()).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Point> + '_ {
        self.chunks.iter().flat_map(|c| c.iter().copied())
    }

    pub fn to_vec(&self) -> Vec<Point> {
        self.iter().collect()
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            first_index: 0,
            len: 0,
            chunk_len: HISTORY_CHUNK_LEN,
            chunks: Vec::new(),
        }
    }
}
