use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to read config file at {path:?}.")]
	ReadConfig { path: PathBuf, source: std::io::Error },
	#[error("Failed to parse config file at {path:?}.")]
	ParseConfig { path: PathBuf, source: toml::de::Error },
	#[error("{key} {reason}.")]
	Invalid { key: &'static str, reason: String },
}
impl Error {
	pub(crate) fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
		Self::Invalid { key, reason: reason.into() }
	}

	/// The dotted config key a validation failure refers to.
	pub fn key(&self) -> Option<&'static str> {
		match self {
			Self::Invalid { key, .. } => Some(key),
			_ => None,
		}
	}
}
