use serde::{Deserialize, Serialize};

/// Breadth of partner coverage for an area. Price data plays no part in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
	Low,
	Medium,
	High,
}
impl Confidence {
	pub fn from_coverage(partner_count: usize) -> Self {
		match partner_count {
			0 | 1 => Self::Low,
			2 => Self::Medium,
			_ => Self::High,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Low => "low",
			Self::Medium => "medium",
			Self::High => "high",
		}
	}
}
