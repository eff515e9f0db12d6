pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { field: String, message: String },
	#[error("Unauthorized: {message}")]
	Unauthorized { message: String },
	#[error("Forbidden: {message}")]
	Forbidden { message: String },
	#[error("Store unavailable: {message}")]
	StoreUnavailable { message: String },
}
impl Error {
	pub(crate) fn invalid(field: &str, message: impl ToString) -> Self {
		Self::InvalidRequest { field: field.to_string(), message: message.to_string() }
	}
}

impl From<decyde_storage::Error> for Error {
	fn from(err: decyde_storage::Error) -> Self {
		Self::StoreUnavailable { message: err.to_string() }
	}
}
