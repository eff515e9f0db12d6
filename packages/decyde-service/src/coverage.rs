use serde::{Deserialize, Serialize};

use crate::{DecydeService, Result};
use decyde_domain::area::AreaId;
use decyde_storage::models::CoverageRow;

pub const UNKNOWN_AREA: &str = "Unknown";

#[derive(Debug, Clone, Deserialize)]
pub struct CoverageRequest {
	#[serde(default, alias = "pincode")]
	pub area_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaCoverage {
	pub area_id: String,
	pub city: String,
	pub state: String,
	pub partners: Vec<String>,
	/// Set when the store could not be read and the configured fallback partners were served.
	#[serde(skip)]
	pub fallback: bool,
}
impl AreaCoverage {
	fn unknown(area_id: &AreaId, partners: Vec<String>, fallback: bool) -> Self {
		Self {
			area_id: area_id.to_string(),
			city: UNKNOWN_AREA.to_string(),
			state: UNKNOWN_AREA.to_string(),
			partners,
			fallback,
		}
	}
}

impl DecydeService {
	pub async fn coverage(&self, req: CoverageRequest) -> Result<AreaCoverage> {
		let area_id = crate::parse_area_id(&req.area_id)?;

		Ok(self.resolve_coverage(&area_id).await)
	}

	/// Never fails: a store error yields the fallback partner set instead.
	pub(crate) async fn resolve_coverage(&self, area_id: &AreaId) -> AreaCoverage {
		match self.store.coverage_rows(area_id.as_str()).await {
			Ok(rows) => {
				let coverage = coverage_from_rows(area_id, &rows);

				tracing::debug!(
					area_id = %area_id,
					rows = rows.len(),
					partner_count = coverage.partners.len(),
					"Resolved coverage."
				);

				coverage
			},
			Err(err) => {
				if err.is_not_configured() {
					tracing::debug!(area_id = %area_id, "Store is not configured. Serving fallback partners.");
				} else {
					tracing::warn!(
						error = %err,
						area_id = %area_id,
						"Coverage lookup failed. Serving fallback partners."
					);
				}

				let mut partners = Vec::new();

				for partner in &self.cfg.coverage.fallback_partners {
					push_unique(&mut partners, partner);
				}

				AreaCoverage::unknown(area_id, partners, true)
			},
		}
	}
}

/// Area metadata comes from the first row only; rows for one area are assumed to agree.
fn coverage_from_rows(area_id: &AreaId, rows: &[CoverageRow]) -> AreaCoverage {
	let Some(first) = rows.first() else {
		return AreaCoverage::unknown(area_id, Vec::new(), false);
	};
	let mut partners: Vec<String> = Vec::new();

	for row in rows.iter().filter(|row| row.active) {
		push_unique(&mut partners, &row.partner);
	}

	AreaCoverage {
		area_id: area_id.to_string(),
		city: first.district().unwrap_or(UNKNOWN_AREA).to_string(),
		state: first.statename().unwrap_or(UNKNOWN_AREA).to_string(),
		partners,
		fallback: false,
	}
}

/// Appends the trimmed partner name unless it is blank or already present.
fn push_unique(partners: &mut Vec<String>, partner: &str) {
	let partner = partner.trim();

	if partner.is_empty() || partners.iter().any(|known| known == partner) {
		return;
	}

	partners.push(partner.to_string());
}
