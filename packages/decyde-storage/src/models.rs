use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

pub const SEARCH_LOGS: &str = "search_logs";
pub const REDIRECT_LOGS: &str = "redirect_logs";
pub const COVERAGE_GAPS: &str = "coverage_gaps";

/// Area metadata embedded in direct coverage queries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AreaInfo {
	pub district: Option<String>,
	pub statename: Option<String>,
}

/// One partner row for an area.
///
/// The coverage RPC returns `district`/`statename` inline while the direct table query embeds
/// them under `pincodes`; both decode into this shape.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CoverageRow {
	pub partner: String,
	#[serde(default = "default_active")]
	pub active: bool,
	#[serde(default)]
	pub district: Option<String>,
	#[serde(default)]
	pub statename: Option<String>,
	#[serde(default)]
	pub pincodes: Option<AreaInfo>,
}
impl CoverageRow {
	pub fn new(partner: impl Into<String>, active: bool) -> Self {
		Self { partner: partner.into(), active, district: None, statename: None, pincodes: None }
	}

	pub fn with_area(mut self, district: &str, statename: &str) -> Self {
		self.district = Some(district.to_string());
		self.statename = Some(statename.to_string());

		self
	}

	pub fn district(&self) -> Option<&str> {
		self.district
			.as_deref()
			.or_else(|| self.pincodes.as_ref().and_then(|info| info.district.as_deref()))
	}

	pub fn statename(&self) -> Option<&str> {
		self.statename
			.as_deref()
			.or_else(|| self.pincodes.as_ref().and_then(|info| info.statename.as_deref()))
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
	pub partner: String,
	pub sku: String,
	pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchLogEntry {
	pub area_id: String,
	pub items: Vec<String>,
	#[serde(default)]
	pub user_id: Option<String>,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectLogEntry {
	pub area_id: String,
	pub partner: String,
	#[serde(default)]
	pub user_id: Option<String>,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageGapEntry {
	pub area_id: String,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
}

/// An append-only observability record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogRecord {
	Search(SearchLogEntry),
	Redirect(RedirectLogEntry),
	CoverageGap(CoverageGapEntry),
}
impl LogRecord {
	pub fn table(&self) -> &'static str {
		match self {
			Self::Search(_) => SEARCH_LOGS,
			Self::Redirect(_) => REDIRECT_LOGS,
			Self::CoverageGap(_) => COVERAGE_GAPS,
		}
	}

	pub fn area_id(&self) -> &str {
		match self {
			Self::Search(entry) => &entry.area_id,
			Self::Redirect(entry) => &entry.area_id,
			Self::CoverageGap(entry) => &entry.area_id,
		}
	}

	pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
		match self {
			Self::Search(entry) => serde_json::to_value(entry),
			Self::Redirect(entry) => serde_json::to_value(entry),
			Self::CoverageGap(entry) => serde_json::to_value(entry),
		}
	}
}

fn default_active() -> bool {
	true
}
