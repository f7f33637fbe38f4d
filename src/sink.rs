use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crate::error::{DojoError, Result};
use crate::record::{CompletedRecord, RecordStore};

/// Receiver of completed records.
///
/// `submit` must not block the typing loop; whatever happens to the record
/// afterwards is the sink's business.
pub trait RecordSink: Send {
    fn submit(&self, record: CompletedRecord) -> Result<()>;
}

/// Drops every record (used with `--no-save`)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl RecordSink for NullSink {
    fn submit(&self, _record: CompletedRecord) -> Result<()> {
        Ok(())
    }
}

/// Keeps records in memory; clones share the same list
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<CompletedRecord>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<CompletedRecord> {
        self.records
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl RecordSink for MemorySink {
    fn submit(&self, record: CompletedRecord) -> Result<()> {
        self.records
            .lock()
            .map_err(|_| DojoError::SinkClosed)?
            .push(record);
        Ok(())
    }
}

/// Hands records to a background thread that writes them to a [`RecordStore`]
pub struct StoreSink {
    tx: Option<Sender<CompletedRecord>>,
    writer: Option<JoinHandle<()>>,
}

impl StoreSink {
    /// Open the store at `path` on the writer thread.
    pub fn spawn(path: PathBuf) -> Self {
        Self::spawn_with(move || RecordStore::open(&path))
    }

    /// Spawn a writer around a store built by `open`. The store is created
    /// on the writer thread since a SQLite connection is not `Sync`.
    pub fn spawn_with<F>(open: F) -> Self
    where
        F: FnOnce() -> Result<RecordStore> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<CompletedRecord>();

        let writer = thread::spawn(move || {
            let store = match open() {
                Ok(store) => store,
                Err(e) => {
                    tracing::warn!("record store unavailable, records will be dropped: {}", e);
                    return;
                }
            };
            for record in rx {
                match store.insert(&record) {
                    Ok(()) => tracing::debug!(
                        sentence_id = record.sentence_id,
                        wpm = record.wpm,
                        "record saved"
                    ),
                    Err(e) => tracing::warn!("failed to save record: {}", e),
                }
            }
        });

        Self {
            tx: Some(tx),
            writer: Some(writer),
        }
    }

    /// Close the channel and wait for queued records to be written.
    pub fn shutdown(mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        self.tx.take();
        if let Some(writer) = self.writer.take() {
            if writer.join().is_err() {
                tracing::warn!("record writer thread panicked");
            }
        }
    }
}

impl RecordSink for StoreSink {
    fn submit(&self, record: CompletedRecord) -> Result<()> {
        match &self.tx {
            Some(tx) => tx.send(record).map_err(|_| DojoError::SinkClosed),
            None => Err(DojoError::SinkClosed),
        }
    }
}

impl Drop for StoreSink {
    fn drop(&mut self) {
        self.finish();
    }
}
