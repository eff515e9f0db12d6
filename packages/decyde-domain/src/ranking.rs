use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Average reported for partners without a single price observation.
pub const UNKNOWN_AVG_PRICE: f64 = 99_999.0;

#[derive(Debug, Clone, PartialEq)]
pub struct PartnerScore {
	pub partner: String,
	pub total_price: f64,
	pub observation_count: u32,
}
impl PartnerScore {
	pub fn zeroed(partner: impl Into<String>) -> Self {
		Self { partner: partner.into(), total_price: 0.0, observation_count: 0 }
	}

	pub fn average(&self) -> Option<f64> {
		if self.observation_count == 0 {
			return None;
		}

		Some(self.total_price / f64::from(self.observation_count))
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPartner {
	pub partner: String,
	pub avg_price: f64,
	pub observation_count: u32,
}
impl RankedPartner {
	pub fn has_prices(&self) -> bool {
		self.observation_count > 0
	}
}

/// Per-partner accumulator seeded from a coverage list.
///
/// Every covered partner starts with a zeroed score so partners without data still reach the
/// ranking. Insertion order is the coverage order and is kept through ranking.
#[derive(Debug, Clone, Default)]
pub struct PartnerScores {
	scores: Vec<PartnerScore>,
	index: HashMap<String, usize>,
}
impl PartnerScores {
	pub fn zeroed<I, S>(partners: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut out = Self::default();

		for partner in partners {
			let partner = partner.as_ref();

			if out.index.contains_key(partner) {
				continue;
			}

			out.index.insert(partner.to_string(), out.scores.len());
			out.scores.push(PartnerScore::zeroed(partner));
		}

		out
	}

	/// Adds one observation. Returns `false` when it was discarded, either because the partner is
	/// outside the coverage set or because the price is negative or not finite.
	pub fn record(&mut self, partner: &str, price: f64) -> bool {
		if !price.is_finite() || price < 0.0 {
			return false;
		}

		let Some(&slot) = self.index.get(partner) else {
			return false;
		};
		let score = &mut self.scores[slot];

		score.total_price += price;
		score.observation_count += 1;

		true
	}

	pub fn get(&self, partner: &str) -> Option<&PartnerScore> {
		self.index.get(partner).map(|&slot| &self.scores[slot])
	}

	pub fn len(&self) -> usize {
		self.scores.len()
	}

	pub fn is_empty(&self) -> bool {
		self.scores.is_empty()
	}

	pub fn into_ranked(self) -> Vec<RankedPartner> {
		rank(self.scores)
	}
}

/// Orders partners by ascending average price.
///
/// Partners without observations always follow partners with at least one, whatever the real
/// averages are. The sort is stable, so equal keys keep their input (coverage) order.
pub fn rank(scores: Vec<PartnerScore>) -> Vec<RankedPartner> {
	let mut ranked: Vec<RankedPartner> = scores
		.into_iter()
		.map(|score| RankedPartner {
			avg_price: score.average().unwrap_or(UNKNOWN_AVG_PRICE),
			observation_count: score.observation_count,
			partner: score.partner,
		})
		.collect();

	ranked.sort_by(|a, b| {
		(!a.has_prices()).cmp(&!b.has_prices()).then_with(|| a.avg_price.total_cmp(&b.avg_price))
	});

	ranked
}

/// The three headline slots of a comparison.
///
/// `fastest` is the second-cheapest partner. No delivery-time signal exists anywhere in the data,
/// so the label is positional only.
#[derive(Debug, Clone, PartialEq)]
pub struct Podium {
	pub cheapest: Option<RankedPartner>,
	pub fastest: Option<RankedPartner>,
	pub best_balance: Option<RankedPartner>,
}
impl Podium {
	pub fn from_ranked(ranked: &[RankedPartner]) -> Self {
		Self {
			cheapest: ranked.first().cloned(),
			fastest: ranked.get(1).cloned(),
			best_balance: ranked.get(2).cloned(),
		}
	}
}
