use decyde_domain::{
	area::{AreaId, AreaIdError},
	confidence::Confidence,
	items::{self, ItemsError},
	ranking::{self, PartnerScore, PartnerScores, Podium, UNKNOWN_AVG_PRICE},
	usage,
};

fn partners(names: &[&str]) -> Vec<String> {
	names.iter().map(|name| name.to_string()).collect()
}

fn ranked_names(ranked: &[ranking::RankedPartner]) -> Vec<&str> {
	ranked.iter().map(|entry| entry.partner.as_str()).collect()
}

#[test]
fn area_id_requires_six_characters() {
	assert!(AreaId::parse("560001").is_ok());
	assert_eq!(AreaId::parse("56000"), Err(AreaIdError::WrongLength { len: 5 }));
	assert_eq!(AreaId::parse("5600011"), Err(AreaIdError::WrongLength { len: 7 }));
	assert_eq!(AreaId::parse(""), Err(AreaIdError::Missing));
}

#[test]
fn area_id_counts_characters_not_bytes() {
	let area = AreaId::parse("५६०००१").expect("Six Devanagari digits are six characters.");

	assert_eq!(area.as_str(), "५६०००१");
}

#[test]
fn area_id_serializes_as_plain_string() {
	let area = AreaId::parse("110001").expect("Valid area id.");

	assert_eq!(serde_json::to_value(&area).expect("serialize"), serde_json::json!("110001"));
}

#[test]
fn items_are_trimmed_and_validated() {
	let normalized = items::normalize_items(&partners(&[" milk ", "bread"]), 10)
		.expect("Expected items to normalize.");

	assert_eq!(normalized, vec!["milk", "bread"]);
	assert_eq!(items::normalize_items(&[], 10), Err(ItemsError::Empty));
	assert_eq!(
		items::normalize_items(&partners(&["milk", "  "]), 10),
		Err(ItemsError::BlankSku { index: 1 })
	);
	assert_eq!(
		items::normalize_items(&partners(&["a", "b", "c"]), 2),
		Err(ItemsError::TooMany { count: 3, max: 2 })
	);
}

#[test]
fn confidence_depends_only_on_coverage_size() {
	assert_eq!(Confidence::from_coverage(0), Confidence::Low);
	assert_eq!(Confidence::from_coverage(1), Confidence::Low);
	assert_eq!(Confidence::from_coverage(2), Confidence::Medium);
	assert_eq!(Confidence::from_coverage(3), Confidence::High);
	assert_eq!(Confidence::from_coverage(12), Confidence::High);
	assert_eq!(serde_json::to_value(Confidence::Medium).expect("serialize"), "medium");
}

#[test]
fn scores_start_zeroed_for_every_partner() {
	let scores = PartnerScores::zeroed(["Zepto", "Blinkit", "Zepto"]);

	assert_eq!(scores.len(), 2);
	assert_eq!(scores.get("Zepto"), Some(&PartnerScore::zeroed("Zepto")));
	assert_eq!(scores.get("Blinkit").and_then(PartnerScore::average), None);
}

#[test]
fn observations_outside_coverage_or_invalid_are_discarded() {
	let mut scores = PartnerScores::zeroed(["Zepto"]);

	assert!(scores.record("Zepto", 10.0));
	assert!(!scores.record("DMart", 5.0));
	assert!(!scores.record("Zepto", -1.0));
	assert!(!scores.record("Zepto", f64::NAN));
	assert!(!scores.record("Zepto", f64::INFINITY));

	let zepto = scores.get("Zepto").expect("Zepto is covered.");

	assert_eq!(zepto.observation_count, 1);
	assert_eq!(zepto.average(), Some(10.0));
}

#[test]
fn ranks_the_reference_scenario() {
	let mut scores = PartnerScores::zeroed(["A", "B", "C"]);

	scores.record("A", 230.0);
	scores.record("A", 250.0);
	scores.record("C", 255.0);

	let ranked = scores.into_ranked();

	assert_eq!(ranked_names(&ranked), vec!["A", "C", "B"]);
	assert_eq!(ranked[0].avg_price, 240.0);
	assert_eq!(ranked[1].avg_price, 255.0);
	assert_eq!(ranked[2].avg_price, UNKNOWN_AVG_PRICE);
	assert_eq!(ranked[2].observation_count, 0);
}

#[test]
fn ranking_is_stable_for_equal_averages() {
	let scores = vec![
		PartnerScore { partner: "C".to_string(), total_price: 100.0, observation_count: 1 },
		PartnerScore { partner: "A".to_string(), total_price: 200.0, observation_count: 2 },
		PartnerScore { partner: "B".to_string(), total_price: 50.0, observation_count: 1 },
		PartnerScore { partner: "D".to_string(), total_price: 300.0, observation_count: 3 },
	];
	let ranked = ranking::rank(scores);

	assert_eq!(ranked_names(&ranked), vec!["B", "C", "A", "D"]);
}

#[test]
fn partners_without_data_keep_coverage_order_at_the_bottom() {
	let ranked = PartnerScores::zeroed(["Zepto", "Blinkit", "Instamart"]).into_ranked();

	assert_eq!(ranked_names(&ranked), vec!["Zepto", "Blinkit", "Instamart"]);
}

#[test]
fn missing_data_ranks_last_regardless_of_magnitude() {
	let mut scores = PartnerScores::zeroed(["Empty", "Pricey"]);

	scores.record("Pricey", UNKNOWN_AVG_PRICE * 10.0);

	let ranked = scores.into_ranked();

	assert_eq!(ranked_names(&ranked), vec!["Pricey", "Empty"]);
}

#[test]
fn podium_takes_the_first_three_positions() {
	let mut scores = PartnerScores::zeroed(["A", "B", "C", "D"]);

	scores.record("D", 1.0);
	scores.record("B", 2.0);

	let ranked = scores.into_ranked();
	let podium = Podium::from_ranked(&ranked);

	assert_eq!(podium.cheapest.map(|entry| entry.partner), Some("D".to_string()));
	assert_eq!(podium.fastest.map(|entry| entry.partner), Some("B".to_string()));
	assert_eq!(podium.best_balance.map(|entry| entry.partner), Some("A".to_string()));

	let short = Podium::from_ranked(&ranked[..1]);

	assert!(short.cheapest.is_some());
	assert!(short.fastest.is_none());
	assert!(short.best_balance.is_none());
}

#[test]
fn usage_counts_sort_descending_with_key_tiebreak() {
	let keys = ["560001", "110001", "560001", "400001", "110001", "560001"];
	let counts = usage::count_by_key(keys, None);

	assert_eq!(
		counts,
		vec![
			("560001".to_string(), 3),
			("110001".to_string(), 2),
			("400001".to_string(), 1),
		]
	);

	let top = usage::count_by_key(keys, Some(1));

	assert_eq!(top, vec![("560001".to_string(), 3)]);
	assert!(usage::count_by_key(std::iter::empty(), Some(10)).is_empty());
}
