pub mod routes;
pub mod state;

use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;
use color_eyre::eyre;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;
use decyde_config::Config;

#[derive(Debug, Parser)]
#[command(
	version = decyde_cli::VERSION,
	rename_all = "kebab",
	styles = decyde_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
}

/// Resolved listener addresses for the public and admin routers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Listeners {
	pub http: SocketAddr,
	pub admin: SocketAddr,
}
impl Listeners {
	/// The admin listener is always loopback-only; the public one only when
	/// `security.bind_localhost_only` is set.
	pub fn from_config(config: &Config) -> color_eyre::Result<Self> {
		let http: SocketAddr = config.service.http_bind.parse()?;
		let admin: SocketAddr = config.service.admin_bind.parse()?;

		if config.security.bind_localhost_only && !http.ip().is_loopback() {
			return Err(eyre::eyre!(
				"service.http_bind must be a loopback address when security.bind_localhost_only is true."
			));
		}
		if !admin.ip().is_loopback() {
			return Err(eyre::eyre!("service.admin_bind must be a loopback address."));
		}

		Ok(Self { http, admin })
	}
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = decyde_config::load(&args.config)?;
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();

	let listeners = Listeners::from_config(&config)?;

	if config.security.admin_auth_token.is_none() {
		tracing::warn!("No admin token configured. Admin endpoints will reject every request.");
	}

	tracing::info!(
		store_configured = config.store.is_configured(),
		fallback_partners = config.coverage.fallback_partners.len(),
		deadline_ms = config.compare.deadline_ms,
		"Starting Decyde API."
	);

	let state = AppState::new(config)?;
	let public = TcpListener::bind(listeners.http).await?;
	let admin = TcpListener::bind(listeners.admin).await?;

	tracing::info!(http_addr = %listeners.http, admin_addr = %listeners.admin, "Listening.");

	tokio::try_join!(
		axum::serve(public, routes::router(state.clone())),
		axum::serve(admin, routes::admin_router(state)),
	)?;

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn admin_listener_must_be_loopback() {
		let mut config = decyde_testkit::test_config();

		config.service.admin_bind = "0.0.0.0:8081".to_string();

		assert!(Listeners::from_config(&config).is_err());
	}

	#[test]
	fn public_listener_may_be_exposed_when_allowed() {
		let mut config = decyde_testkit::test_config();

		config.service.http_bind = "0.0.0.0:8080".to_string();

		assert!(Listeners::from_config(&config).is_err());

		config.security.bind_localhost_only = false;

		let listeners = Listeners::from_config(&config).expect("Expected valid listeners.");

		assert!(!listeners.http.ip().is_loopback());
		assert!(listeners.admin.ip().is_loopback());
	}
}
