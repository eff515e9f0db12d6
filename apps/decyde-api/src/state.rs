use std::sync::Arc;

use decyde_service::DecydeService;
use decyde_storage::{Store, rest::RestStore};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<DecydeService>,
}
impl AppState {
	/// Must be called from within a Tokio runtime.
	pub fn new(config: decyde_config::Config) -> color_eyre::Result<Self> {
		let store = RestStore::new(&config.store)?;

		if !store.is_configured() {
			tracing::warn!("Store URL or API key is missing. Serving fallback coverage only.");
		}

		Ok(Self::with_store(config, Arc::new(store)))
	}

	pub fn with_store(config: decyde_config::Config, store: Arc<dyn Store>) -> Self {
		Self { service: Arc::new(DecydeService::new(config, store)) }
	}
}
