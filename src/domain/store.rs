//! Shared record store.
//!
//! The current record set is an immutable snapshot behind a single `Arc`.
//! Readers clone the `Arc` once per query and keep using that snapshot even if
//! a reload lands meanwhile. Reload builds the replacement completely before
//! taking the write lock, which is held only for the pointer swap.

use crate::domain::error::ScreenerError;
use crate::domain::record::RecordSet;
use crate::ports::record_source::RecordSource;
use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct RecordStore {
    current: RwLock<Arc<RecordSet>>,
}

impl RecordStore {
    pub fn new(records: RecordSet) -> Self {
        Self {
            current: RwLock::new(Arc::new(records)),
        }
    }

    /// Loads the initial snapshot. A failure here is fatal for the caller.
    pub fn load(source: &dyn RecordSource) -> Result<Self, ScreenerError> {
        let records = source.load()?;
        tracing::info!(records = records.len(), source = %source.describe(), "record set loaded");
        Ok(Self::new(records))
    }

    pub fn snapshot(&self) -> Arc<RecordSet> {
        Arc::clone(&self.current.read())
    }

    /// Swaps in `records` and returns the snapshot it replaced.
    pub fn replace(&self, records: RecordSet) -> Arc<RecordSet> {
        let next = Arc::new(records);
        std::mem::replace(&mut *self.current.write(), next)
    }

    /// Reloads from `source`. On failure the current snapshot stays in place.
    pub fn reload(&self, source: &dyn RecordSource) -> Result<usize, ScreenerError> {
        let records = match source.load() {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, source = %source.describe(), "reload failed, keeping current records");
                return Err(e);
            }
        };
        let count = records.len();
        let previous = self.replace(records);
        tracing::info!(
            records = count,
            previous = previous.len(),
            source = %source.describe(),
            "record set reloaded"
        );
        Ok(count)
    }
}
