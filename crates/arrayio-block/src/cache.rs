//! LRU block cache
//!
//! Exact-key memoization of 256-byte blocks keyed by (disk, block), with
//! strict least-recently-used eviction. Capacity is small by design, so
//! eviction is a plain linear scan ordered by a logical clock; ties go to
//! the lowest slot index. The clock is not wall time, it exists purely to
//! total-order accesses.

use crate::error::{VolumeError, VolumeResult};
use arrayio_common::{BLOCK_SIZE, BlockNum, DiskId};
use bytes::Bytes;
use tracing::debug;

/// Smallest permitted cache capacity
pub const MIN_CACHE_ENTRIES: usize = 2;

/// Largest permitted cache capacity
pub const MAX_CACHE_ENTRIES: usize = 4096;

#[derive(Debug, Clone)]
struct Slot {
    disk: DiskId,
    block: BlockNum,
    data: Bytes,
    last_used: u64,
}

/// Cache hit/miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups performed
    pub queries: u64,
    /// Lookups that found their block
    pub hits: u64,
}

impl CacheStats {
    /// Hit ratio in 0.0..=1.0 (0.0 before any query)
    #[must_use]
    pub fn hit_ratio(&self) -> f64 {
        if self.queries == 0 {
            return 0.0;
        }
        self.hits as f64 / self.queries as f64
    }
}

/// Fixed-capacity LRU cache of remote blocks
///
/// Slots start empty and are filled lowest-index-first; once full, the
/// least recently used entry is overwritten in place. At most one entry
/// exists per (disk, block) key.
pub struct BlockCache {
    slots: Vec<Option<Slot>>,
    clock: u64,
    stats: CacheStats,
}

impl BlockCache {
    /// Create a cache with room for `capacity` blocks
    ///
    /// Capacity is fixed for the cache's lifetime and must lie in
    /// [`MIN_CACHE_ENTRIES`]..=[`MAX_CACHE_ENTRIES`].
    pub fn new(capacity: usize) -> VolumeResult<Self> {
        if !(MIN_CACHE_ENTRIES..=MAX_CACHE_ENTRIES).contains(&capacity) {
            return Err(VolumeError::InvalidCapacity(capacity));
        }
        Ok(Self {
            slots: vec![None; capacity],
            clock: 0,
            stats: CacheStats::default(),
        })
    }

    /// Fixed slot capacity
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Whether no slot is occupied
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Whether the cache is worth consulting at all
    ///
    /// A cache at the degenerate minimum capacity thrashes on any real
    /// access pattern, so the engine skips it entirely.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.slots.len() > MIN_CACHE_ENTRIES
    }

    /// Hit/miss counters accumulated so far
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Look up a block, refreshing its recency on a hit
    pub fn lookup(&mut self, disk: DiskId, block: BlockNum) -> Option<Bytes> {
        self.stats.queries += 1;
        for slot in self.slots.iter_mut().flatten() {
            if slot.disk == disk && slot.block == block {
                self.stats.hits += 1;
                self.clock += 1;
                slot.last_used = self.clock;
                return Some(slot.data.clone());
            }
        }
        None
    }

    /// Insert a block under a key that must not already be cached
    ///
    /// Callers check via [`Self::lookup`] first; inserting over a live key
    /// is a caller bug and is rejected rather than corrected. The new
    /// entry is stamped with the clock as it stands, which an insert does
    /// not advance.
    pub fn insert(&mut self, disk: DiskId, block: BlockNum, data: &[u8; BLOCK_SIZE]) -> VolumeResult<()> {
        if self.position(disk, block).is_some() {
            return Err(VolumeError::DuplicateCacheEntry { disk, block });
        }

        let entry = Slot {
            disk,
            block,
            data: Bytes::copy_from_slice(data),
            last_used: self.clock,
        };

        // Empty slots fill lowest-index-first.
        if let Some(free) = self.slots.iter().position(Option::is_none) {
            self.slots[free] = Some(entry);
            return Ok(());
        }

        // Full: overwrite the least recently used entry. The strict `<`
        // keeps the first minimum, so ties go to the lowest index.
        let mut victim = 0;
        let mut oldest = u64::MAX;
        for (idx, slot) in self.slots.iter().enumerate() {
            if let Some(slot) = slot {
                if slot.last_used < oldest {
                    oldest = slot.last_used;
                    victim = idx;
                }
            }
        }
        debug!(%disk, %block, victim, "evicting least recently used block");
        self.slots[victim] = Some(entry);
        Ok(())
    }

    /// Overwrite a cached block's data in place, bumping its recency
    ///
    /// A key that is not cached is left alone; the engine only calls this
    /// after a lookup confirmed the entry exists.
    pub fn update(&mut self, disk: DiskId, block: BlockNum, data: &[u8; BLOCK_SIZE]) {
        if let Some(pos) = self.position(disk, block) {
            self.clock += 1;
            if let Some(slot) = self.slots[pos].as_mut() {
                slot.data = Bytes::copy_from_slice(data);
                slot.last_used = self.clock;
            }
        }
    }

    fn position(&self, disk: DiskId, block: BlockNum) -> Option<usize> {
        self.slots.iter().position(|slot| {
            slot.as_ref()
                .is_some_and(|s| s.disk == disk && s.block == block)
        })
    }
}
