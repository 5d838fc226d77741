//! Time-bounded cache of the normalized complaints table
//!
//! One slot, shared by every caller. The mutex is held across the whole
//! load-or-return decision, so a miss runs the load exactly once and callers
//! arriving meanwhile block and then share the fresh table.

use std::sync::Arc;
use std::time::{Duration, Instant};
use arrow::record_batch::RecordBatch;
use cfpb_core::complaint_schema;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::preprocess::normalize;
use crate::sources::ComplaintSource;
use crate::DataError;

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock()
    }
}

struct CachedTable {
    table: Arc<RecordBatch>,
    loaded_at: Instant,
}

/// Memoized load + normalize with a time-to-live
pub struct ComplaintCache {
    source: Arc<dyn ComplaintSource>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    slot: Mutex<Option<CachedTable>>,
}

impl ComplaintCache {
    /// Create a cache over `source` using the wall clock
    pub fn new(source: Arc<dyn ComplaintSource>, ttl: Duration) -> Self {
        Self::with_clock(source, ttl, Arc::new(SystemClock))
    }

    /// Create a cache with an explicit clock
    pub fn with_clock(source: Arc<dyn ComplaintSource>, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            clock,
            ttl,
            slot: Mutex::new(None),
        }
    }

    /// Get the table, loading it if the slot is empty or expired.
    ///
    /// Data-layer failures (missing database, bad dates) are cached as an
    /// empty table for the window. Schema errors propagate and leave the slot
    /// untouched.
    pub fn get(&self) -> Result<Arc<RecordBatch>, DataError> {
        let mut slot = self.slot.lock();
        let now = self.clock.now();

        if let Some(cached) = slot.as_ref() {
            if now.saturating_duration_since(cached.loaded_at) < self.ttl {
                debug!("Cache hit ({} rows)", cached.table.num_rows());
                return Ok(cached.table.clone());
            }
            info!("Cached table expired after {:?}, reloading", self.ttl);
        }

        let table = Arc::new(self.load()?);
        *slot = Some(CachedTable {
            table: table.clone(),
            loaded_at: now,
        });
        Ok(table)
    }

    fn load(&self) -> Result<RecordBatch, DataError> {
        let raw = self.source.load()?;
        match normalize(&raw) {
            Ok(table) => {
                info!("Cached {} rows from {}", table.num_rows(), self.source.source_name());
                Ok(table)
            }
            Err(e) if e.is_data_unavailable() => {
                warn!("Discarding {}: {}", self.source.source_name(), e);
                Ok(RecordBatch::new_empty(complaint_schema()))
            }
            Err(e) => Err(e),
        }
    }

    /// Whether a call to `get` would be served without loading
    pub fn is_fresh(&self) -> bool {
        let now = self.clock.now();
        self.slot
            .lock()
            .as_ref()
            .map(|cached| now.saturating_duration_since(cached.loaded_at) < self.ttl)
            .unwrap_or(false)
    }

    /// Drop the cached table
    pub fn invalidate(&self) {
        *self.slot.lock() = None;
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
