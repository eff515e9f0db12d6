use std::time::Duration;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Caller, DecydeService, Error, Result};
use decyde_domain::{
	area::AreaId,
	confidence::Confidence,
	items,
	ranking::{Podium, RankedPartner},
};
use decyde_storage::models::{CoverageGapEntry, LogRecord, SearchLogEntry};

pub const NO_COVERAGE_MESSAGE: &str = "No partners available in this area";
pub const COMPARISON_FAILED_MESSAGE: &str = "Comparison failed";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompareRequest {
	#[serde(default, alias = "pincode")]
	pub area_id: String,
	#[serde(default)]
	pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
	pub area_id: String,
	pub confidence: Confidence,
	pub cheapest: Option<RankedPartner>,
	/// Second-cheapest partner. There is no delivery-time data behind this slot.
	pub fastest: Option<RankedPartner>,
	pub best_balance: Option<RankedPartner>,
	pub all_partners: Vec<RankedPartner>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmptyComparison {
	pub area_id: String,
	pub results: Vec<RankedPartner>,
	pub message: String,
}
impl EmptyComparison {
	fn new(area_id: &AreaId, message: &str) -> Self {
		Self { area_id: area_id.to_string(), results: Vec::new(), message: message.to_string() }
	}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CompareResponse {
	Ranked(ComparisonResult),
	NoCoverage(EmptyComparison),
	Failed(EmptyComparison),
}
impl CompareResponse {
	pub fn ranked(&self) -> Option<&ComparisonResult> {
		match self {
			Self::Ranked(result) => Some(result),
			_ => None,
		}
	}
}

impl DecydeService {
	pub async fn compare(&self, req: CompareRequest, caller: &Caller) -> Result<CompareResponse> {
		let area_id = crate::parse_area_id(&req.area_id)?;
		let skus = items::normalize_items(&req.items, self.cfg.compare.max_items as usize)
			.map_err(|err| Error::invalid("items", err))?;

		self.activity.dispatch(LogRecord::Search(SearchLogEntry {
			area_id: area_id.to_string(),
			items: skus.clone(),
			user_id: caller.user_id.clone(),
			created_at: OffsetDateTime::now_utc(),
		}));

		let deadline = Duration::from_millis(self.cfg.compare.deadline_ms);
		let response = match tokio::time::timeout(deadline, self.run_comparison(&area_id, &skus))
			.await
		{
			Ok(response) => response,
			Err(_) => {
				tracing::error!(
					area_id = %area_id,
					deadline_ms = self.cfg.compare.deadline_ms,
					"Comparison exceeded its deadline."
				);

				CompareResponse::Failed(EmptyComparison::new(&area_id, COMPARISON_FAILED_MESSAGE))
			},
		};

		Ok(response)
	}

	async fn run_comparison(&self, area_id: &AreaId, skus: &[String]) -> CompareResponse {
		let coverage = self.resolve_coverage(area_id).await;

		if coverage.partners.is_empty() {
			tracing::info!(area_id = %area_id, "No partners cover this area.");

			self.activity.dispatch(LogRecord::CoverageGap(CoverageGapEntry {
				area_id: area_id.to_string(),
				created_at: OffsetDateTime::now_utc(),
			}));

			return CompareResponse::NoCoverage(EmptyComparison::new(area_id, NO_COVERAGE_MESSAGE));
		}

		let confidence = Confidence::from_coverage(coverage.partners.len());
		let ranked = self.aggregate_prices(&coverage.partners, skus).await.into_ranked();
		let podium = Podium::from_ranked(&ranked);

		tracing::info!(
			area_id = %area_id,
			partner_count = ranked.len(),
			sku_count = skus.len(),
			confidence = confidence.as_str(),
			fallback = coverage.fallback,
			"Comparison ranked."
		);

		CompareResponse::Ranked(ComparisonResult {
			area_id: area_id.to_string(),
			confidence,
			cheapest: podium.cheapest,
			fastest: podium.fastest,
			best_balance: podium.best_balance,
			all_partners: ranked,
		})
	}
}
