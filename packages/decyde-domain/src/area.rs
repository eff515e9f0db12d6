use std::fmt;

use serde::Serialize;

pub const AREA_ID_LEN: usize = 6;

/// A validated 6-character postal code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AreaId(String);
impl AreaId {
	pub fn parse(raw: &str) -> Result<Self, AreaIdError> {
		if raw.is_empty() {
			return Err(AreaIdError::Missing);
		}

		let len = raw.chars().count();

		if len != AREA_ID_LEN {
			return Err(AreaIdError::WrongLength { len });
		}

		Ok(Self(raw.to_string()))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn into_inner(self) -> String {
		self.0
	}
}
impl fmt::Display for AreaId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}
impl AsRef<str> for AreaId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaIdError {
	Missing,
	WrongLength { len: usize },
}
impl fmt::Display for AreaIdError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Missing => f.write_str("area_id is required"),
			Self::WrongLength { len } => {
				write!(f, "area_id must be exactly {AREA_ID_LEN} characters, got {len}")
			},
		}
	}
}
