//! Shared holder of the live report record.

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;

use super::model::ReportRecord;

/// Owns the single live record and broadcasts every replacement.
///
/// Updates run under one lock, so two edits never interleave. Subscribers
/// (the preview render worker) receive the new record after each update.
#[derive(Clone)]
pub struct RecordStore {
    current: Arc<Mutex<ReportRecord>>,
    changes: Arc<watch::Sender<ReportRecord>>,
}

impl RecordStore {
    pub fn new(initial: ReportRecord) -> Self {
        let (changes, _) = watch::channel(initial.clone());
        Self {
            current: Arc::new(Mutex::new(initial)),
            changes: Arc::new(changes),
        }
    }

    /// Copy of the current record.
    pub fn snapshot(&self) -> ReportRecord {
        self.current.lock().clone()
    }

    /// Apply a pure update and publish the result.
    pub fn update<F>(&self, apply: F) -> ReportRecord
    where
        F: FnOnce(ReportRecord) -> ReportRecord,
    {
        self.update_with(|record| (apply(record), ())).0
    }

    /// Like [`RecordStore::update`] for updates that also yield a value,
    /// such as the id of a freshly added row.
    pub fn update_with<F, T>(&self, apply: F) -> (ReportRecord, T)
    where
        F: FnOnce(ReportRecord) -> (ReportRecord, T),
    {
        let mut current = self.current.lock();
        let (next, extra) = apply(current.clone());
        *current = next.clone();
        self.changes.send_replace(next.clone());
        (next, extra)
    }

    /// Swap the whole record, as done by JSON import.
    pub fn replace(&self, record: ReportRecord) -> ReportRecord {
        self.update(|_| record)
    }

    pub fn subscribe(&self) -> watch::Receiver<ReportRecord> {
        self.changes.subscribe()
    }
}
