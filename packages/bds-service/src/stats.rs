use serde::Serialize;

use bds_storage::{
	models::{CountryCount, IndustryCount, InvolvementTypeCount},
	stats::{self, Statistics},
};

use crate::{BdsService, Result};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsResponse {
	pub total_companies: i64,
	pub total_sources: i64,
	pub involvement_types: Vec<InvolvementTypeCount>,
	pub top_countries: Vec<CountryCount>,
	pub top_industries: Vec<IndustryCount>,
}
impl From<Statistics> for StatisticsResponse {
	fn from(stats: Statistics) -> Self {
		Self {
			total_companies: stats.total_companies,
			total_sources: stats.total_sources,
			involvement_types: stats.involvement_types,
			top_countries: stats.top_countries,
			top_industries: stats.top_industries,
		}
	}
}

impl BdsService {
	pub async fn statistics(&self) -> Result<StatisticsResponse> {
		let stats = stats::statistics(&self.db).await?;

		tracing::debug!(total_companies = stats.total_companies, "Computed statistics.");

		Ok(stats.into())
	}
}
