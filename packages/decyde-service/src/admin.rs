use serde::{Deserialize, Serialize};

use crate::{Caller, DecydeService, Error, LogDiagnostics, Result};
use decyde_domain::usage;
use decyde_storage::models::CoverageGapEntry;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaSearchCount {
	pub area_id: String,
	pub searches: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerRedirectCount {
	pub partner: String,
	pub redirects: u64,
}

/// Usage summary over the most recent window of activity logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminOverview {
	pub top_areas_by_search_volume: Vec<AreaSearchCount>,
	pub partner_performance: Vec<PartnerRedirectCount>,
	/// Most recent first, as stored.
	pub coverage_gaps: Vec<CoverageGapEntry>,
	pub total_search_count: u64,
	pub total_redirect_count: u64,
}

impl DecydeService {
	pub async fn overview(&self, caller: &Caller) -> Result<AdminOverview> {
		self.authorize_admin(caller)?;

		let analytics = &self.cfg.analytics;
		let (searches, redirects, gaps) = tokio::try_join!(
			self.store.recent_searches(analytics.log_window),
			self.store.recent_redirects(analytics.log_window),
			self.store.recent_coverage_gaps(analytics.coverage_gap_limit),
		)
		.inspect_err(|err| tracing::warn!(error = %err, "Failed to read activity logs."))?;
		let top_areas_by_search_volume = usage::count_by_key(
			searches.iter().map(|entry| entry.area_id.as_str()),
			Some(analytics.top_areas as usize),
		)
		.into_iter()
		.map(|(area_id, searches)| AreaSearchCount { area_id, searches })
		.collect();
		let partner_performance =
			usage::count_by_key(redirects.iter().map(|entry| entry.partner.as_str()), None)
				.into_iter()
				.map(|(partner, redirects)| PartnerRedirectCount { partner, redirects })
				.collect();

		tracing::info!(
			searches = searches.len(),
			redirects = redirects.len(),
			coverage_gaps = gaps.len(),
			"Built admin overview."
		);

		Ok(AdminOverview {
			top_areas_by_search_volume,
			partner_performance,
			coverage_gaps: gaps,
			total_search_count: searches.len() as u64,
			total_redirect_count: redirects.len() as u64,
		})
	}

	pub fn activity_diagnostics(&self, caller: &Caller) -> Result<LogDiagnostics> {
		self.authorize_admin(caller)?;

		Ok(self.activity.diagnostics())
	}

	/// Checks the caller's bearer token against the configured admin token.
	///
	/// With no admin token configured every caller is rejected.
	pub fn authorize_admin(&self, caller: &Caller) -> Result<()> {
		let Some(expected) = self.cfg.security.admin_auth_token.as_deref() else {
			return Err(Error::Unauthorized {
				message: "Admin access is not configured.".to_string(),
			});
		};
		let Some(provided) = caller.bearer_token.as_deref() else {
			return Err(Error::Unauthorized { message: "Missing bearer token.".to_string() });
		};

		if !token_eq(provided, expected) {
			tracing::warn!("Rejected admin request with an invalid token.");

			return Err(Error::Forbidden { message: "Invalid admin token.".to_string() });
		}

		Ok(())
	}
}

fn token_eq(a: &str, b: &str) -> bool {
	let (a, b) = (a.as_bytes(), b.as_bytes());

	if a.len() != b.len() {
		return false;
	}

	a.iter().zip(b).fold(0_u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
