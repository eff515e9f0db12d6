pub mod activity;
pub mod admin;
pub mod compare;
pub mod coverage;
pub mod pricing;
pub mod redirect;

mod error;

pub use activity::{ActivityLog, LogDiagnostics};
pub use admin::{AdminOverview, AreaSearchCount, PartnerRedirectCount};
pub use compare::{
	COMPARISON_FAILED_MESSAGE, CompareRequest, CompareResponse, ComparisonResult, EmptyComparison,
	NO_COVERAGE_MESSAGE,
};
pub use coverage::{AreaCoverage, CoverageRequest, UNKNOWN_AREA};
pub use error::{Error, Result};
pub use redirect::{RedirectRequest, RedirectResponse};

use std::sync::Arc;

use decyde_config::Config;
use decyde_domain::area::AreaId;
use decyde_storage::Store;

/// Who is calling. Neither field is verified beyond the admin token comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Caller {
	pub user_id: Option<String>,
	pub bearer_token: Option<String>,
}
impl Caller {
	pub fn anonymous() -> Self {
		Self::default()
	}

	pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
		self.user_id = Some(user_id.into());

		self
	}

	pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
		self.bearer_token = Some(token.into());

		self
	}
}

pub struct DecydeService {
	pub cfg: Config,
	pub store: Arc<dyn Store>,
	activity: ActivityLog,
}
impl DecydeService {
	/// Builds the service and starts its activity log writer.
	///
	/// Must be called from within a Tokio runtime.
	pub fn new(cfg: Config, store: Arc<dyn Store>) -> Self {
		let activity =
			ActivityLog::spawn(store.clone(), cfg.activity_log.queue_capacity as usize);

		Self { cfg, store, activity }
	}

	pub fn activity(&self) -> &ActivityLog {
		&self.activity
	}
}

pub(crate) fn parse_area_id(raw: &str) -> Result<AreaId> {
	AreaId::parse(raw).map_err(|err| Error::invalid("area_id", err))
}
