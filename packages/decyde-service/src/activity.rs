use std::sync::{
	Arc,
	atomic::{AtomicU64, Ordering},
};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, Receiver, Sender, error::TrySendError};

use decyde_storage::{Store, models::LogRecord};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogDiagnostics {
	pub enqueued: u64,
	pub written: u64,
	pub failed: u64,
	pub dropped: u64,
}

#[derive(Default)]
struct Counters {
	enqueued: AtomicU64,
	written: AtomicU64,
	failed: AtomicU64,
	dropped: AtomicU64,
}

/// Bounded, fire-and-forget writer for search, redirect and coverage-gap records.
///
/// Callers never wait on the store. A full queue drops the record; append failures are only
/// counted and traced.
pub struct ActivityLog {
	tx: Sender<LogRecord>,
	counters: Arc<Counters>,
}
impl ActivityLog {
	pub fn spawn(store: Arc<dyn Store>, capacity: usize) -> Self {
		let (tx, rx) = mpsc::channel(capacity.max(1));
		let counters = Arc::new(Counters::default());

		tokio::spawn(drain(store, rx, counters.clone()));

		Self { tx, counters }
	}

	pub fn dispatch(&self, record: LogRecord) {
		match self.tx.try_send(record) {
			Ok(()) => {
				self.counters.enqueued.fetch_add(1, Ordering::Relaxed);
			},
			Err(TrySendError::Full(record) | TrySendError::Closed(record)) => {
				self.counters.dropped.fetch_add(1, Ordering::Relaxed);

				tracing::warn!(
					table = record.table(),
					area_id = record.area_id(),
					"Activity log queue is unavailable. Dropping record."
				);
			},
		}
	}

	pub fn diagnostics(&self) -> LogDiagnostics {
		LogDiagnostics {
			enqueued: self.counters.enqueued.load(Ordering::Relaxed),
			written: self.counters.written.load(Ordering::Relaxed),
			failed: self.counters.failed.load(Ordering::Relaxed),
			dropped: self.counters.dropped.load(Ordering::Relaxed),
		}
	}
}

async fn drain(store: Arc<dyn Store>, mut rx: Receiver<LogRecord>, counters: Arc<Counters>) {
	while let Some(record) = rx.recv().await {
		match store.append_log(&record).await {
			Ok(()) => {
				counters.written.fetch_add(1, Ordering::Relaxed);
			},
			Err(err) if err.is_not_configured() => {
				counters.failed.fetch_add(1, Ordering::Relaxed);

				tracing::debug!(table = record.table(), "Store is not configured. Skipping log append.");
			},
			Err(err) => {
				counters.failed.fetch_add(1, Ordering::Relaxed);

				tracing::warn!(
					error = %err,
					table = record.table(),
					area_id = record.area_id(),
					"Activity log append failed."
				);
			},
		}
	}

	tracing::debug!("Activity log writer stopped.");
}
