use serde::Deserialize;

pub const DEFAULT_FALLBACK_PARTNERS: [&str; 5] =
	["Zepto", "Blinkit", "Instamart", "BigBasket", "DMart"];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	#[serde(default)]
	pub store: Store,
	#[serde(default)]
	pub coverage: Coverage,
	#[serde(default)]
	pub compare: Compare,
	#[serde(default)]
	pub analytics: Analytics,
	#[serde(default)]
	pub activity_log: ActivityLog,
	#[serde(default)]
	pub security: Security,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub admin_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

/// Connection settings for the external queryable store.
///
/// Both `url` and `api_key` must be present for the store to be considered configured. When
/// either is missing every store call fails fast and the service serves fallback data.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Store {
	pub url: Option<String>,
	pub api_key: Option<String>,
	pub timeout_ms: u64,
	pub coverage_rpc: String,
}
impl Store {
	pub fn is_configured(&self) -> bool {
		self.url.is_some() && self.api_key.is_some()
	}
}
impl Default for Store {
	fn default() -> Self {
		Self {
			url: None,
			api_key: None,
			timeout_ms: 3_000,
			coverage_rpc: "get_partner_coverage".to_string(),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Coverage {
	/// Served whenever the store cannot be read.
	pub fallback_partners: Vec<String>,
}
impl Default for Coverage {
	fn default() -> Self {
		Self {
			fallback_partners: DEFAULT_FALLBACK_PARTNERS
				.iter()
				.map(|partner| partner.to_string())
				.collect(),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Compare {
	pub max_items: u32,
	pub deadline_ms: u64,
}
impl Default for Compare {
	fn default() -> Self {
		Self { max_items: 50, deadline_ms: 8_000 }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Analytics {
	pub log_window: u32,
	pub top_areas: u32,
	pub coverage_gap_limit: u32,
}
impl Default for Analytics {
	fn default() -> Self {
		Self { log_window: 500, top_areas: 10, coverage_gap_limit: 50 }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ActivityLog {
	pub queue_capacity: u32,
}
impl Default for ActivityLog {
	fn default() -> Self {
		Self { queue_capacity: 1_024 }
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Security {
	pub bind_localhost_only: bool,
	pub admin_auth_token: Option<String>,
}

fn default_log_level() -> String {
	"info".to_string()
}
