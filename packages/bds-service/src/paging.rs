use serde::{Deserialize, Serialize};

use bds_storage::planner::PageWindow;

use crate::{Error, Result};

/// Raw `page`/`limit` query values. Blank values count as absent.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PageParams {
	pub page: Option<String>,
	pub limit: Option<String>,
}
impl PageParams {
	/// Resolves the requested window against the configured defaults.
	///
	/// Values that are not positive integers are rejected; a limit above `max_limit` is clamped.
	pub fn resolve(&self, cfg: &bds_config::Paging) -> Result<PageWindow> {
		let page = parse_positive("page", self.page.as_deref())?.unwrap_or(1);
		let limit = parse_positive("limit", self.limit.as_deref())?
			.unwrap_or(cfg.default_limit)
			.min(cfg.max_limit);

		Ok(PageWindow::new(page, limit))
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
	pub page: u32,
	pub limit: u32,
	pub total: i64,
	pub total_pages: i64,
	pub has_next: bool,
	pub has_prev: bool,
}
impl Pagination {
	pub fn new(window: PageWindow, total: i64) -> Self {
		let total = total.max(0);
		let limit = i64::from(window.limit.max(1));
		let total_pages = (total + limit - 1) / limit;

		Self {
			page: window.page,
			limit: window.limit,
			total,
			total_pages,
			has_next: i64::from(window.page) < total_pages,
			has_prev: window.page > 1,
		}
	}
}

fn parse_positive(field: &str, raw: Option<&str>) -> Result<Option<u32>> {
	let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
		return Ok(None);
	};

	match raw.parse::<u32>() {
		Ok(value) if value >= 1 => Ok(Some(value)),
		_ => Err(Error::invalid_field(field, format!("{field} must be a positive integer."))),
	}
}
