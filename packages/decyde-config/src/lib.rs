mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	ActivityLog, Analytics, Compare, Config, Coverage, DEFAULT_FALLBACK_PARTNERS, Security,
	Service, Store,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	from_toml_str(&raw).map_err(|err| match err {
		Error::ParseConfig { source, .. } =>
			Error::ParseConfig { path: path.to_path_buf(), source },
		other => other,
	})
}

/// Parses, normalizes and validates a config document held in memory.
pub fn from_toml_str(raw: &str) -> Result<Config> {
	let mut cfg: Config = toml::from_str(raw)
		.map_err(|err| Error::ParseConfig { path: Default::default(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::invalid("service.http_bind", "must be non-empty"));
	}
	if cfg.service.admin_bind.trim().is_empty() {
		return Err(Error::invalid("service.admin_bind", "must be non-empty"));
	}
	if let Some(url) = cfg.store.url.as_deref()
		&& !(url.starts_with("http://") || url.starts_with("https://"))
	{
		return Err(Error::invalid("store.url", "must start with http:// or https://"));
	}
	if cfg.store.timeout_ms == 0 {
		return Err(Error::invalid("store.timeout_ms", "must be greater than zero"));
	}
	if cfg.store.coverage_rpc.trim().is_empty() {
		return Err(Error::invalid("store.coverage_rpc", "must be non-empty"));
	}
	if cfg.coverage.fallback_partners.is_empty() {
		return Err(Error::invalid("coverage.fallback_partners", "must list at least one partner"));
	}
	if cfg.compare.max_items == 0 {
		return Err(Error::invalid("compare.max_items", "must be greater than zero"));
	}
	if cfg.compare.deadline_ms == 0 {
		return Err(Error::invalid("compare.deadline_ms", "must be greater than zero"));
	}

	for (key, value) in [
		("analytics.log_window", cfg.analytics.log_window),
		("analytics.top_areas", cfg.analytics.top_areas),
		("analytics.coverage_gap_limit", cfg.analytics.coverage_gap_limit),
		("activity_log.queue_capacity", cfg.activity_log.queue_capacity),
	] {
		if value == 0 {
			return Err(Error::invalid(key, "must be greater than zero"));
		}
	}

	if cfg.analytics.top_areas > cfg.analytics.log_window {
		return Err(Error::invalid(
			"analytics.top_areas",
			"must not exceed analytics.log_window",
		));
	}
	if cfg.analytics.coverage_gap_limit > cfg.analytics.log_window {
		return Err(Error::invalid(
			"analytics.coverage_gap_limit",
			"must not exceed analytics.log_window",
		));
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.store.url = blank_to_none(cfg.store.url.take())
		.map(|url| url.trim_end_matches('/').to_string());
	cfg.store.api_key = blank_to_none(cfg.store.api_key.take());
	cfg.security.admin_auth_token = blank_to_none(cfg.security.admin_auth_token.take());

	let mut partners: Vec<String> = Vec::with_capacity(cfg.coverage.fallback_partners.len());

	for partner in &cfg.coverage.fallback_partners {
		let partner = partner.trim();

		if partner.is_empty() || partners.iter().any(|known| known == partner) {
			continue;
		}

		partners.push(partner.to_string());
	}

	cfg.coverage.fallback_partners = partners;
}

fn blank_to_none(value: Option<String>) -> Option<String> {
	value.map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}
