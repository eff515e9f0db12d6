use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemsError {
	Empty,
	BlankSku { index: usize },
	TooMany { count: usize, max: usize },
}
impl fmt::Display for ItemsError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Empty => f.write_str("items must contain at least one SKU"),
			Self::BlankSku { index } => write!(f, "items[{index}] must not be blank"),
			Self::TooMany { count, max } => {
				write!(f, "items may contain at most {max} SKUs, got {count}")
			},
		}
	}
}

/// Trims every requested SKU and rejects empty, blank or oversized lists.
///
/// Order is preserved and duplicates are kept; the store query treats the list as a set.
pub fn normalize_items(items: &[String], max: usize) -> Result<Vec<String>, ItemsError> {
	if items.is_empty() {
		return Err(ItemsError::Empty);
	}
	if items.len() > max {
		return Err(ItemsError::TooMany { count: items.len(), max });
	}

	let mut out = Vec::with_capacity(items.len());

	for (index, item) in items.iter().enumerate() {
		let sku = item.trim();

		if sku.is_empty() {
			return Err(ItemsError::BlankSku { index });
		}

		out.push(sku.to_string());
	}

	Ok(out)
}
