use serde::{Deserialize, Serialize};

use bds_storage::{
	companies::{self, CompanyPage},
	planner::{CompanyQuery, PageWindow, Scope},
	predicate::{self, Predicate},
};

use crate::{
	BdsService, Error, Result,
	paging::{PageParams, Pagination},
	shape::{self, CompanyDetail, CompanySummary},
};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct CompanyListRequest {
	#[serde(flatten)]
	pub paging: PageParams,
	pub search: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct InvolvementListRequest {
	#[serde(flatten)]
	pub paging: PageParams,
}

#[derive(Clone, Debug, Serialize)]
pub struct CompanyPageResponse {
	pub companies: Vec<CompanySummary>,
	pub pagination: Pagination,
}

impl BdsService {
	pub async fn list_companies(&self, req: CompanyListRequest) -> Result<CompanyPageResponse> {
		let window = req.paging.resolve(&self.cfg.paging)?;
		let predicate = match req.search.as_deref() {
			Some(term) => predicate::build_search_predicate(term),
			None => Predicate::NoFilter,
		};
		let searching = predicate.is_filter();
		let page = self.fetch_page(Scope::All, predicate, window).await?;

		tracing::debug!(
			page = window.page,
			limit = window.limit,
			total = page.total,
			searching,
			"Listed companies."
		);

		Ok(respond(page, window))
	}

	pub async fn get_company(&self, id: &str) -> Result<CompanyDetail> {
		let row = companies::fetch_company(&self.db, &self.planner, id).await.map_err(|err| {
			match err {
				bds_storage::Error::NotFound(_) =>
					Error::NotFound { message: "Company not found.".to_string() },
				other => Error::from(other),
			}
		})?;

		Ok(shape::detail(row))
	}

	/// Companies carrying `involvement_type`, best confidence first.
	pub async fn list_by_involvement(
		&self,
		involvement_type: &str,
		req: InvolvementListRequest,
	) -> Result<CompanyPageResponse> {
		let window = req.paging.resolve(&self.cfg.paging)?;
		let scope = Scope::ByInvolvementType(involvement_type.to_string());
		let page = self.fetch_page(scope, Predicate::NoFilter, window).await?;

		tracing::debug!(
			involvement_type,
			page = window.page,
			limit = window.limit,
			total = page.total,
			"Listed companies by involvement type."
		);

		Ok(respond(page, window))
	}

	async fn fetch_page(
		&self,
		scope: Scope,
		predicate: Predicate,
		window: PageWindow,
	) -> Result<CompanyPage> {
		let query = CompanyQuery::listing(scope, predicate, window);
		let page = companies::fetch_page(&self.db, &self.planner, &query).await?;

		Ok(page)
	}
}

fn respond(page: CompanyPage, window: PageWindow) -> CompanyPageResponse {
	CompanyPageResponse {
		companies: page.rows.into_iter().map(shape::summary).collect(),
		pagination: Pagination::new(window, page.total),
	}
}
