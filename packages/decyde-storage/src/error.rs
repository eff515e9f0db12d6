#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Store is not configured.")]
	NotConfigured,
	#[error(transparent)]
	Reqwest(#[from] reqwest::Error),
	#[error(transparent)]
	SerdeJson(#[from] serde_json::Error),
	#[error(transparent)]
	InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),
	#[error("Store responded with {status} for {resource}.")]
	Status { resource: &'static str, status: reqwest::StatusCode },
	#[error("{0}")]
	Unavailable(String),
}
impl Error {
	pub fn is_not_configured(&self) -> bool {
		matches!(self, Self::NotConfigured)
	}
}
