use std::time::Duration;

use reqwest::{
	Client, Response,
	header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue},
};
use serde::de::DeserializeOwned;

use crate::{
	BoxFuture, Error, Result, Store,
	models::{
		COVERAGE_GAPS, CoverageGapEntry, CoverageRow, LogRecord, PriceRecord, REDIRECT_LOGS,
		RedirectLogEntry, SEARCH_LOGS, SearchLogEntry,
	},
};

const REST_PREFIX: &str = "/rest/v1";
const COVERAGE_TABLE: &str = "partner_coverage";
const COVERAGE_SELECT: &str = "partner,active,pincodes(district,statename)";
const PRICE_TABLE: &str = "price_records";
const PRICE_SELECT: &str = "partner,sku,price";

struct Endpoint {
	base_url: String,
	headers: HeaderMap,
}

/// [`Store`] over a PostgREST-style HTTP API.
///
/// Without credentials the client still constructs, but every call returns
/// [`Error::NotConfigured`] without touching the network.
pub struct RestStore {
	client: Client,
	endpoint: Option<Endpoint>,
	coverage_rpc: String,
}
impl RestStore {
	pub fn new(cfg: &decyde_config::Store) -> Result<Self> {
		let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
		let endpoint = match (cfg.url.as_deref(), cfg.api_key.as_deref()) {
			(Some(url), Some(api_key)) => Some(Endpoint {
				base_url: format!("{}{REST_PREFIX}", url.trim_end_matches('/')),
				headers: auth_headers(api_key)?,
			}),
			_ => None,
		};

		Ok(Self { client, endpoint, coverage_rpc: cfg.coverage_rpc.clone() })
	}

	pub fn is_configured(&self) -> bool {
		self.endpoint.is_some()
	}

	fn endpoint(&self) -> Result<&Endpoint> {
		self.endpoint.as_ref().ok_or(Error::NotConfigured)
	}

	async fn fetch_coverage(&self, area_id: &str) -> Result<Vec<CoverageRow>> {
		let endpoint = self.endpoint()?;
		let rpc_url = format!("{}/rpc/{}", endpoint.base_url, self.coverage_rpc);
		let res = self
			.client
			.post(rpc_url)
			.headers(endpoint.headers.clone())
			.json(&serde_json::json!({ "p_pincode": area_id }))
			.send()
			.await?;

		if res.status().is_success() {
			let rows: Option<Vec<CoverageRow>> = decode(res, "coverage rpc").await?;

			return Ok(rows.unwrap_or_default());
		}

		tracing::debug!(
			status = %res.status(),
			area_id,
			"Coverage RPC failed. Retrying as a direct table query."
		);

		let res = self
			.client
			.get(format!("{}/{COVERAGE_TABLE}", endpoint.base_url))
			.headers(endpoint.headers.clone())
			.query(&[
				("pincode", format!("eq.{area_id}")),
				("active", "eq.true".to_string()),
				("select", COVERAGE_SELECT.to_string()),
			])
			.send()
			.await?;
		let rows: Option<Vec<CoverageRow>> = decode(res, COVERAGE_TABLE).await?;

		Ok(rows.unwrap_or_default())
	}

	async fn fetch_prices(&self, partners: &[String], skus: &[String]) -> Result<Vec<PriceRecord>> {
		let endpoint = self.endpoint()?;

		if partners.is_empty() || skus.is_empty() {
			return Ok(Vec::new());
		}

		let res = self
			.client
			.get(format!("{}/{PRICE_TABLE}", endpoint.base_url))
			.headers(endpoint.headers.clone())
			.query(&[
				("partner", in_filter(partners)),
				("sku", in_filter(skus)),
				("select", PRICE_SELECT.to_string()),
			])
			.send()
			.await?;
		let rows: Option<Vec<PriceRecord>> = decode(res, PRICE_TABLE).await?;

		Ok(rows.unwrap_or_default())
	}

	async fn insert(&self, record: &LogRecord) -> Result<()> {
		let endpoint = self.endpoint()?;
		let table = record.table();
		let res = self
			.client
			.post(format!("{}/{table}", endpoint.base_url))
			.headers(endpoint.headers.clone())
			.header("Prefer", "return=minimal")
			.json(&record.to_json()?)
			.send()
			.await?;
		let status = res.status();

		if !status.is_success() {
			return Err(Error::Status { resource: table, status });
		}

		Ok(())
	}

	async fn fetch_recent<T>(&self, table: &'static str, limit: u32) -> Result<Vec<T>>
	where
		T: DeserializeOwned,
	{
		let endpoint = self.endpoint()?;
		let res = self
			.client
			.get(format!("{}/{table}", endpoint.base_url))
			.headers(endpoint.headers.clone())
			.query(&[
				("select", "*".to_string()),
				("order", "created_at.desc".to_string()),
				("limit", limit.to_string()),
			])
			.send()
			.await?;
		let rows: Option<Vec<T>> = decode(res, table).await?;

		Ok(rows.unwrap_or_default())
	}
}
impl Store for RestStore {
	fn coverage_rows<'a>(&'a self, area_id: &'a str) -> BoxFuture<'a, Result<Vec<CoverageRow>>> {
		Box::pin(self.fetch_coverage(area_id))
	}

	fn price_records<'a>(
		&'a self,
		partners: &'a [String],
		skus: &'a [String],
	) -> BoxFuture<'a, Result<Vec<PriceRecord>>> {
		Box::pin(self.fetch_prices(partners, skus))
	}

	fn append_log<'a>(&'a self, record: &'a LogRecord) -> BoxFuture<'a, Result<()>> {
		Box::pin(self.insert(record))
	}

	fn recent_searches(&self, limit: u32) -> BoxFuture<'_, Result<Vec<SearchLogEntry>>> {
		Box::pin(self.fetch_recent(SEARCH_LOGS, limit))
	}

	fn recent_redirects(&self, limit: u32) -> BoxFuture<'_, Result<Vec<RedirectLogEntry>>> {
		Box::pin(self.fetch_recent(REDIRECT_LOGS, limit))
	}

	fn recent_coverage_gaps(&self, limit: u32) -> BoxFuture<'_, Result<Vec<CoverageGapEntry>>> {
		Box::pin(self.fetch_recent(COVERAGE_GAPS, limit))
	}
}

/// Builds the value of a PostgREST `in.(...)` filter.
///
/// Every value is double-quoted so commas, dots and parentheses inside names stay literal;
/// embedded quotes and backslashes are backslash-escaped.
pub fn in_filter(values: &[String]) -> String {
	let mut out = String::from("in.(");

	for (i, value) in values.iter().enumerate() {
		if i > 0 {
			out.push(',');
		}

		out.push('"');

		for ch in value.chars() {
			if matches!(ch, '"' | '\\') {
				out.push('\\');
			}

			out.push(ch);
		}

		out.push('"');
	}

	out.push(')');

	out
}

fn auth_headers(api_key: &str) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	headers.insert(HeaderName::from_static("apikey"), HeaderValue::from_str(api_key)?);
	headers.insert(AUTHORIZATION, format!("Bearer {api_key}").parse()?);

	Ok(headers)
}

async fn decode<T>(res: Response, resource: &'static str) -> Result<T>
where
	T: DeserializeOwned,
{
	let status = res.status();

	if !status.is_success() {
		return Err(Error::Status { resource, status });
	}

	let body = res.bytes().await?;

	Ok(serde_json::from_slice(&body)?)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn strings(values: &[&str]) -> Vec<String> {
		values.iter().map(|value| value.to_string()).collect()
	}

	#[test]
	fn quotes_in_filter_values() {
		let filter = in_filter(&strings(&["Zepto", "Big, Basket", "Say \"hi\"", r"back\slash"]));

		assert_eq!(filter, r#"in.("Zepto","Big, Basket","Say \"hi\"","back\\slash")"#);
	}

	#[test]
	fn decodes_both_coverage_row_shapes() {
		let json = serde_json::json!([
			{ "partner": "Zepto", "active": true, "district": "Bangalore", "statename": "Karnataka" },
			{ "partner": "Blinkit", "active": false, "pincodes": { "district": "Mysore", "statename": "Karnataka" } },
			{ "partner": "DMart" }
		]);
		let rows: Vec<CoverageRow> = serde_json::from_value(json).expect("decode failed");

		assert_eq!(rows[0].district(), Some("Bangalore"));
		assert_eq!(rows[1].district(), Some("Mysore"));
		assert_eq!(rows[1].statename(), Some("Karnataka"));
		assert!(!rows[1].active);
		assert!(rows[2].active);
		assert_eq!(rows[2].district(), None);
	}

	#[test]
	fn unconfigured_store_reports_not_configured() {
		let cfg = decyde_config::Store { url: None, ..Default::default() };
		let store = RestStore::new(&cfg).expect("client should build");

		assert!(!store.is_configured());

		let runtime = tokio::runtime::Builder::new_current_thread()
			.enable_all()
			.build()
			.expect("runtime should build");
		let err = runtime
			.block_on(store.coverage_rows("560001"))
			.expect_err("unconfigured store must fail");

		assert!(err.is_not_configured());
	}
}
