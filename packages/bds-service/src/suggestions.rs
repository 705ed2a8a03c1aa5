use bds_storage::{companies, models::SuggestionRow};

use crate::{BdsService, Result};

impl BdsService {
	/// Autocomplete on company names.
	///
	/// Terms shorter than `suggestions.min_chars` characters return nothing without querying.
	pub async fn suggestions(&self, raw: Option<&str>) -> Result<Vec<SuggestionRow>> {
		let term = raw.unwrap_or_default().trim();

		if !meets_minimum(term, self.cfg.suggestions.min_chars) {
			return Ok(Vec::new());
		}

		let rows =
			companies::suggest(&self.db, &self.planner, term, self.cfg.suggestions.max_results)
				.await?;

		tracing::debug!(results = rows.len(), "Fetched suggestions.");

		Ok(rows)
	}
}

fn meets_minimum(term: &str, min_chars: usize) -> bool {
	term.chars().count() >= min_chars
}

#[cfg(test)]
mod tests {
	use crate::suggestions::meets_minimum;

	#[test]
	fn counts_characters_not_bytes() {
		assert!(!meets_minimum("a", 2));
		assert!(!meets_minimum("é", 2));
		assert!(meets_minimum("éa", 2));
		assert!(meets_minimum("acme", 2));
	}
}
