use std::{
	collections::HashMap,
	future::Future,
	sync::{
		Mutex, MutexGuard,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration,
};

use time::OffsetDateTime;

use decyde_config::{
	ActivityLog, Analytics, Compare, Config, Coverage, Security, Service, Store as StoreConfig,
};
use decyde_storage::{
	BoxFuture, Error, Result, Store,
	models::{
		CoverageGapEntry, CoverageRow, LogRecord, PriceRecord, RedirectLogEntry, SearchLogEntry,
	},
};

pub const ADMIN_TOKEN: &str = "test-admin-token";

const EVENTUALLY_TIMEOUT: Duration = Duration::from_secs(2);
const EVENTUALLY_POLL: Duration = Duration::from_millis(10);

/// Switches that make individual [`MemoryStore`] operations fail.
#[derive(Debug, Default, Clone, Copy)]
pub struct Faults {
	pub coverage: bool,
	pub prices: bool,
	pub appends: bool,
	pub log_reads: bool,
	/// Return every seeded price regardless of the requested partners and SKUs.
	pub unfiltered_prices: bool,
}

/// In-process [`Store`] with seedable data, fault injection and call counters.
#[derive(Default)]
pub struct MemoryStore {
	coverage: Mutex<HashMap<String, Vec<CoverageRow>>>,
	prices: Mutex<Vec<PriceRecord>>,
	logs: Mutex<Vec<LogRecord>>,
	faults: Mutex<Faults>,
	latency: Mutex<Option<Duration>>,
	reads: AtomicUsize,
	appends: AtomicUsize,
}
impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn seed_coverage(&self, area_id: &str, rows: Vec<CoverageRow>) {
		lock(&self.coverage).insert(area_id.to_string(), rows);
	}

	pub fn seed_price(&self, partner: &str, sku: &str, price: f64) {
		lock(&self.prices).push(PriceRecord {
			partner: partner.to_string(),
			sku: sku.to_string(),
			price,
		});
	}

	pub fn seed_log(&self, record: LogRecord) {
		lock(&self.logs).push(record);
	}

	pub fn seed_search(&self, area_id: &str) {
		self.seed_log(LogRecord::Search(SearchLogEntry {
			area_id: area_id.to_string(),
			items: vec!["seed".to_string()],
			user_id: None,
			created_at: OffsetDateTime::now_utc(),
		}));
	}

	pub fn seed_redirect(&self, area_id: &str, partner: &str) {
		self.seed_log(LogRecord::Redirect(RedirectLogEntry {
			area_id: area_id.to_string(),
			partner: partner.to_string(),
			user_id: None,
			created_at: OffsetDateTime::now_utc(),
		}));
	}

	pub fn seed_coverage_gap(&self, area_id: &str) {
		self.seed_coverage_gap_at(area_id, OffsetDateTime::now_utc());
	}

	pub fn seed_coverage_gap_at(&self, area_id: &str, created_at: OffsetDateTime) {
		self.seed_log(LogRecord::CoverageGap(CoverageGapEntry {
			area_id: area_id.to_string(),
			created_at,
		}));
	}

	pub fn set_faults(&self, faults: Faults) {
		*lock(&self.faults) = faults;
	}

	pub fn set_latency(&self, latency: Duration) {
		*lock(&self.latency) = Some(latency);
	}

	/// Reads attempted so far, including failed ones.
	pub fn read_count(&self) -> usize {
		self.reads.load(Ordering::SeqCst)
	}

	/// Appends attempted so far, including failed ones.
	pub fn append_count(&self) -> usize {
		self.appends.load(Ordering::SeqCst)
	}

	pub fn search_logs(&self) -> Vec<SearchLogEntry> {
		lock(&self.logs)
			.iter()
			.filter_map(|record| match record {
				LogRecord::Search(entry) => Some(entry.clone()),
				_ => None,
			})
			.collect()
	}

	pub fn redirect_logs(&self) -> Vec<RedirectLogEntry> {
		lock(&self.logs)
			.iter()
			.filter_map(|record| match record {
				LogRecord::Redirect(entry) => Some(entry.clone()),
				_ => None,
			})
			.collect()
	}

	pub fn coverage_gaps(&self) -> Vec<CoverageGapEntry> {
		lock(&self.logs)
			.iter()
			.filter_map(|record| match record {
				LogRecord::CoverageGap(entry) => Some(entry.clone()),
				_ => None,
			})
			.collect()
	}

	fn faults(&self) -> Faults {
		*lock(&self.faults)
	}

	async fn begin_read(&self) {
		self.reads.fetch_add(1, Ordering::SeqCst);

		let latency = *lock(&self.latency);

		if let Some(latency) = latency {
			tokio::time::sleep(latency).await;
		}
	}

	fn recent<T>(&self, limit: u32, pick: impl Fn(&LogRecord) -> Option<T>) -> Vec<T> {
		lock(&self.logs).iter().rev().filter_map(pick).take(limit as usize).collect()
	}
}
impl Store for MemoryStore {
	fn coverage_rows<'a>(&'a self, area_id: &'a str) -> BoxFuture<'a, Result<Vec<CoverageRow>>> {
		Box::pin(async move {
			self.begin_read().await;

			if self.faults().coverage {
				return Err(Error::Unavailable("injected coverage failure".to_string()));
			}

			Ok(lock(&self.coverage).get(area_id).cloned().unwrap_or_default())
		})
	}

	fn price_records<'a>(
		&'a self,
		partners: &'a [String],
		skus: &'a [String],
	) -> BoxFuture<'a, Result<Vec<PriceRecord>>> {
		Box::pin(async move {
			self.begin_read().await;

			let faults = self.faults();

			if faults.prices {
				return Err(Error::Unavailable("injected price failure".to_string()));
			}

			let records = lock(&self.prices)
				.iter()
				.filter(|record| {
					faults.unfiltered_prices
						|| (partners.contains(&record.partner) && skus.contains(&record.sku))
				})
				.cloned()
				.collect();

			Ok(records)
		})
	}

	fn append_log<'a>(&'a self, record: &'a LogRecord) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			self.appends.fetch_add(1, Ordering::SeqCst);

			if self.faults().appends {
				return Err(Error::Unavailable("injected append failure".to_string()));
			}

			lock(&self.logs).push(record.clone());

			Ok(())
		})
	}

	fn recent_searches(&self, limit: u32) -> BoxFuture<'_, Result<Vec<SearchLogEntry>>> {
		Box::pin(async move {
			self.begin_read().await;

			if self.faults().log_reads {
				return Err(Error::Unavailable("injected log read failure".to_string()));
			}

			Ok(self.recent(limit, |record| match record {
				LogRecord::Search(entry) => Some(entry.clone()),
				_ => None,
			}))
		})
	}

	fn recent_redirects(&self, limit: u32) -> BoxFuture<'_, Result<Vec<RedirectLogEntry>>> {
		Box::pin(async move {
			self.begin_read().await;

			if self.faults().log_reads {
				return Err(Error::Unavailable("injected log read failure".to_string()));
			}

			Ok(self.recent(limit, |record| match record {
				LogRecord::Redirect(entry) => Some(entry.clone()),
				_ => None,
			}))
		})
	}

	fn recent_coverage_gaps(&self, limit: u32) -> BoxFuture<'_, Result<Vec<CoverageGapEntry>>> {
		Box::pin(async move {
			self.begin_read().await;

			if self.faults().log_reads {
				return Err(Error::Unavailable("injected log read failure".to_string()));
			}

			Ok(self.recent(limit, |record| match record {
				LogRecord::CoverageGap(entry) => Some(entry.clone()),
				_ => None,
			}))
		})
	}
}

/// A config with every limit at its default, an unconfigured store and [`ADMIN_TOKEN`] as the
/// admin credential.
pub fn test_config() -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:0".to_string(),
			admin_bind: "127.0.0.1:0".to_string(),
			log_level: "info".to_string(),
		},
		store: StoreConfig { timeout_ms: 1_000, ..Default::default() },
		coverage: Coverage::default(),
		compare: Compare { max_items: 20, deadline_ms: 2_000 },
		analytics: Analytics::default(),
		activity_log: ActivityLog { queue_capacity: 64 },
		security: Security {
			bind_localhost_only: true,
			admin_auth_token: Some(ADMIN_TOKEN.to_string()),
		},
	}
}

/// Polls `check` until it holds or a short timeout passes. Use it for effects the service
/// performs in the background.
pub async fn eventually<F>(check: F) -> bool
where
	F: Fn() -> bool,
{
	let deadline = tokio::time::Instant::now() + EVENTUALLY_TIMEOUT;

	loop {
		if check() {
			return true;
		}
		if tokio::time::Instant::now() >= deadline {
			return false;
		}

		tokio::time::sleep(EVENTUALLY_POLL).await;
	}
}

/// Runs `fut` and reports whether it finished within `timeout`.
pub async fn completes_within<F>(timeout: Duration, fut: F) -> bool
where
	F: Future,
{
	tokio::time::timeout(timeout, fut).await.is_ok()
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
	mutex.lock().unwrap_or_else(|err| err.into_inner())
}
