use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Caller, DecydeService, Error, Result};
use decyde_storage::models::{LogRecord, RedirectLogEntry};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedirectRequest {
	#[serde(default, alias = "pincode")]
	pub area_id: String,
	#[serde(default)]
	pub partner: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectResponse {
	pub accepted: bool,
}

impl DecydeService {
	/// Records that a caller followed a partner link. The write happens in the background.
	pub async fn record_redirect(
		&self,
		req: RedirectRequest,
		caller: &Caller,
	) -> Result<RedirectResponse> {
		let area_id = crate::parse_area_id(&req.area_id)?;
		let partner = req.partner.trim();

		if partner.is_empty() {
			return Err(Error::invalid("partner", "partner must not be blank"));
		}

		self.activity.dispatch(LogRecord::Redirect(RedirectLogEntry {
			area_id: area_id.into_inner(),
			partner: partner.to_string(),
			user_id: caller.user_id.clone(),
			created_at: OffsetDateTime::now_utc(),
		}));

		Ok(RedirectResponse { accepted: true })
	}
}
