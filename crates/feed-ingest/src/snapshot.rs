//! Load-once holder for an ingested table.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use feed_model::Table;

use crate::error::Result;

/// Caches one table behind a read-write lock.
///
/// The first successful [`get_or_load`](Snapshot::get_or_load) stores the
/// table; later calls return the same `Arc` until
/// [`invalidate`](Snapshot::invalidate) clears it. Failed loads are not
/// cached.
#[derive(Debug, Default)]
pub struct Snapshot {
    slot: RwLock<Option<Arc<Table>>>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached table, loading it with `load` if empty.
    ///
    /// Concurrent callers that find the slot empty serialize on the write
    /// lock; only the first runs `load`.
    pub fn get_or_load<F>(&self, load: F) -> Result<Arc<Table>>
    where
        F: FnOnce() -> Result<Table>,
    {
        if let Some(table) = self.read().as_ref() {
            return Ok(Arc::clone(table));
        }

        let mut slot = self.write();
        if let Some(table) = slot.as_ref() {
            return Ok(Arc::clone(table));
        }

        let table = Arc::new(load()?);
        *slot = Some(Arc::clone(&table));
        tracing::debug!(rows = table.len(), "Snapshot loaded");
        Ok(table)
    }

    /// The cached table, if loaded.
    pub fn get(&self) -> Option<Arc<Table>> {
        self.read().clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.read().is_some()
    }

    /// Drops the cached table so the next load fetches again.
    pub fn invalidate(&self) {
        if self.write().take().is_some() {
            tracing::debug!("Snapshot invalidated");
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<Arc<Table>>> {
        self.slot.read().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Arc<Table>>> {
        self.slot.write().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use crate::IngestError;
    use crate::error::MaterializeError;

    fn table() -> Table {
        let mut table = Table::new(vec!["a".to_string(), "b".to_string()]);
        table.push_row(vec![Some("1".to_string()), None]);
        table
    }

    #[test]
    fn test_loads_once() {
        let snapshot = Snapshot::new();
        let calls = Cell::new(0);
        let load = || -> crate::Result<Table> {
            calls.set(calls.get() + 1);
            Ok(table())
        };

        let first = snapshot.get_or_load(load).unwrap();
        let second = snapshot.get_or_load(load).unwrap();

        assert_eq!(calls.get(), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_invalidate_reloads() {
        let snapshot = Snapshot::new();
        let first = snapshot.get_or_load(|| Ok(table())).unwrap();
        snapshot.invalidate();
        assert!(!snapshot.is_loaded());

        let second = snapshot.get_or_load(|| Ok(table())).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let snapshot = Snapshot::new();
        let err = snapshot
            .get_or_load(|| {
                Err(IngestError::Materialize {
                    resource: "x".to_string(),
                    source: MaterializeError::EmptyResult {
                        data_lines: 0,
                        skipped_lines: 0,
                    },
                })
            })
            .unwrap_err();
        assert!(err.is_malformed());
        assert!(snapshot.get().is_none());
        assert!(snapshot.get_or_load(|| Ok(table())).is_ok());
    }
}
