use std::collections::HashMap;

/// Counts occurrences of each key and returns them by descending count.
///
/// Ties are ordered by key so repeated reports over the same window agree. `limit` truncates the
/// result after sorting.
pub fn count_by_key<'a, I>(keys: I, limit: Option<usize>) -> Vec<(String, u64)>
where
	I: IntoIterator<Item = &'a str>,
{
	let mut counts: HashMap<&'a str, u64> = HashMap::new();

	for key in keys {
		*counts.entry(key).or_default() += 1;
	}

	let mut out: Vec<(String, u64)> =
		counts.into_iter().map(|(key, count)| (key.to_string(), count)).collect();

	out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

	if let Some(limit) = limit {
		out.truncate(limit);
	}

	out
}
