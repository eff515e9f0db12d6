use crate::DecydeService;
use decyde_domain::ranking::PartnerScores;

impl DecydeService {
	/// Averages price observations per covered partner.
	///
	/// Every partner gets a score, zeroed when it has no data. A store failure leaves all scores
	/// zeroed rather than failing the comparison.
	pub async fn aggregate_prices(&self, partners: &[String], skus: &[String]) -> PartnerScores {
		let mut scores = PartnerScores::zeroed(partners);
		let records = match self.store.price_records(partners, skus).await {
			Ok(records) => records,
			Err(err) => {
				if err.is_not_configured() {
					tracing::debug!("Store is not configured. Ranking without price data.");
				} else {
					tracing::warn!(error = %err, "Price lookup failed. Ranking without price data.");
				}

				return scores;
			},
		};
		let mut discarded = 0_usize;

		for record in &records {
			if !skus.contains(&record.sku) || !scores.record(&record.partner, record.price) {
				discarded += 1;
			}
		}

		if discarded > 0 {
			tracing::debug!(discarded, total = records.len(), "Discarded price observations.");
		}

		scores
	}
}
