//! Allocation counters - per-thread bookkeeping for monitoring and tests
//!
//! The ownership scheme is single-threaded, so counters live in thread-local
//! cells instead of atomics.

use std::cell::Cell;

thread_local! {
    static COUNTERS: Cell<AllocatorStats> = const { Cell::new(AllocatorStats::ZERO) };
}

/// Allocator statistics for monitoring and debugging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AllocatorStats {
    pub allocations: usize,
    pub frees: usize,
    pub retains: usize,
    pub releases: usize,
    pub live_blocks: usize,
    pub live_bytes: usize,
    /// Bytes of slot-buffer backing storage currently held
    pub storage_bytes: usize,
}

impl AllocatorStats {
    const ZERO: Self = Self {
        allocations: 0,
        frees: 0,
        retains: 0,
        releases: 0,
        live_blocks: 0,
        live_bytes: 0,
        storage_bytes: 0,
    };
}

#[inline]
fn update(f: impl FnOnce(&mut AllocatorStats)) {
    COUNTERS.with(|cell| {
        let mut stats = cell.get();
        f(&mut stats);
        cell.set(stats);
    });
}

#[inline]
pub(super) fn record_alloc(size: usize) {
    update(|s| {
        s.allocations += 1;
        s.live_blocks += 1;
        s.live_bytes += size;
    });
}

#[inline]
pub(super) fn record_free(size: usize) {
    update(|s| {
        s.frees += 1;
        s.live_blocks -= 1;
        s.live_bytes -= size;
    });
}

#[inline]
pub(super) fn record_retain() {
    update(|s| s.retains += 1);
}

#[inline]
pub(super) fn record_release() {
    update(|s| s.releases += 1);
}

/// Slot-buffer storage moved from `old_bytes` to `new_bytes`
#[inline]
pub(crate) fn record_storage(old_bytes: usize, new_bytes: usize) {
    update(|s| s.storage_bytes = s.storage_bytes - old_bytes + new_bytes);
}

/// Snapshot of the calling thread's counters
pub fn stats() -> AllocatorStats {
    COUNTERS.with(Cell::get)
}
