//! Chunk-bucketed spatial index for static walls.
//!
//! * The plane is cut into `chunk_size`x`chunk_size` cells keyed by
//!   [`ChunkKey`]; only cells that hold a wall are allocated.
//! * A wall is registered in every cell its segment runs through. Within a
//!   cell it is keyed by [`WallKey`], so re-adding the same wall replaces the
//!   entry instead of duplicating it.
//! * Queries walk the cells overlapped by a rectangle (plus an overshoot
//!   margin) and return each wall once.

use std::collections::{BTreeSet, HashMap};

use crate::geometry::{chunk_of, ChunkKey, Point, Rect};
use crate::wall::{Direction, Wall};

/// Deduplication identity of a wall: both endpoints and the facing direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WallKey {
    p1: (u32, u32),
    p2: (u32, u32),
    direction: Direction,
}

impl WallKey {
    pub fn of(wall: &Wall) -> Self {
        Self {
            p1: point_bits(wall.p1()),
            p2: point_bits(wall.p2()),
            direction: wall.direction(),
        }
    }
}

#[inline]
fn point_bits(p: Point) -> (u32, u32) {
    // +0.0 folds -0.0 into 0.0 so both hash alike
    ((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits())
}

type Bucket = HashMap<WallKey, usize>;

pub struct ChunkIndex {
    chunk_size: u32,
    walls: Vec<Wall>,
    buckets: HashMap<ChunkKey, Bucket>,
}

impl ChunkIndex {
    pub fn new(chunk_size: u32) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            walls: Vec::new(),
            buckets: HashMap::new(),
        }
    }

    #[inline]
    pub fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    /// Every wall ever added, in insertion order
    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn len(&self) -> usize {
        self.walls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }

    /// Number of allocated (non-empty) chunks
    pub fn chunk_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn add<I>(&mut self, walls: I)
    where
        I: IntoIterator<Item = Wall>,
    {
        let before = self.walls.len();
        for wall in walls {
            let index = self.walls.len();
            let key = WallKey::of(&wall);
            for chunk in self.chunks_spanned(&wall) {
                self.buckets.entry(chunk).or_default().insert(key, index);
            }
            self.walls.push(wall);
        }
        log::debug!(
            "chunk index: +{} walls ({} total) across {} chunks",
            self.walls.len() - before,
            self.walls.len(),
            self.buckets.len()
        );
    }

    pub fn clear(&mut self) {
        self.walls.clear();
        self.buckets.clear();
    }

    /// Chunks between the wall's two endpoint chunks, inclusive.
    /// Axis-aligned walls give a single run along one axis.
    pub fn chunks_spanned(&self, wall: &Wall) -> Vec<ChunkKey> {
        let a = chunk_of(wall.p1(), self.chunk_size);
        let b = chunk_of(wall.p2(), self.chunk_size);
        if a == b {
            return vec![a];
        }

        let (x0, x1) = (a.x.min(b.x), a.x.max(b.x));
        let (y0, y1) = (a.y.min(b.y), a.y.max(b.y));
        let mut chunks = Vec::with_capacity(((x1 - x0 + 1) * (y1 - y0 + 1)) as usize);
        for y in y0..=y1 {
            for x in x0..=x1 {
                chunks.push(ChunkKey::new(x, y));
            }
        }
        chunks
    }

    /// Inclusive chunk range overlapped by `area`, grown by `overshoot` chunks
    pub fn chunk_range(&self, area: &Rect, overshoot: u32) -> (ChunkKey, ChunkKey) {
        let min = chunk_of(area.top_left(), self.chunk_size);
        let max = chunk_of(area.bottom_right(), self.chunk_size);
        let o = overshoot as i32;
        (
            ChunkKey::new(min.x - o, min.y - o),
            ChunkKey::new(max.x + o, max.y + o),
        )
    }

    /// Walls registered in any chunk overlapping `area` (grown by
    /// `overshoot` chunks). Each wall appears once, in insertion order.
    pub fn query(&self, area: &Rect, overshoot: u32) -> Vec<&Wall> {
        let (min, max) = self.chunk_range(area, overshoot);
        let span = (max.x - min.x + 1) as i64 * (max.y - min.y + 1) as i64;

        let mut hits = BTreeSet::new();
        if span > self.buckets.len() as i64 {
            // sparse map, large window: scan the allocated chunks instead
            for (chunk, bucket) in &self.buckets {
                if (min.x..=max.x).contains(&chunk.x) && (min.y..=max.y).contains(&chunk.y) {
                    hits.extend(bucket.values().copied());
                }
            }
        } else {
            for y in min.y..=max.y {
                for x in min.x..=max.x {
                    if let Some(bucket) = self.buckets.get(&ChunkKey::new(x, y)) {
                        hits.extend(bucket.values().copied());
                    }
                }
            }
        }

        hits.into_iter().map(|i| &self.walls[i]).collect()
    }
}
