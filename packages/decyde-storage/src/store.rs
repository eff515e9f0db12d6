use std::{future::Future, pin::Pin};

use crate::{
	Result,
	models::{CoverageGapEntry, CoverageRow, LogRecord, PriceRecord, RedirectLogEntry, SearchLogEntry},
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The queryable store behind coverage, prices and the activity logs.
///
/// Implementations must be safe to call concurrently; the service never serializes access.
pub trait Store
where
	Self: Send + Sync,
{
	/// Coverage rows for an area, active or not. An unknown area yields an empty list.
	fn coverage_rows<'a>(&'a self, area_id: &'a str) -> BoxFuture<'a, Result<Vec<CoverageRow>>>;

	/// Price observations where partner is in `partners` and sku is in `skus`.
	fn price_records<'a>(
		&'a self,
		partners: &'a [String],
		skus: &'a [String],
	) -> BoxFuture<'a, Result<Vec<PriceRecord>>>;

	fn append_log<'a>(&'a self, record: &'a LogRecord) -> BoxFuture<'a, Result<()>>;

	/// The most recent search log entries, newest first.
	fn recent_searches(&self, limit: u32) -> BoxFuture<'_, Result<Vec<SearchLogEntry>>>;

	/// The most recent redirect log entries, newest first.
	fn recent_redirects(&self, limit: u32) -> BoxFuture<'_, Result<Vec<RedirectLogEntry>>>;

	/// The most recent coverage gaps, newest first.
	fn recent_coverage_gaps(&self, limit: u32) -> BoxFuture<'_, Result<Vec<CoverageGapEntry>>>;
}
