pub mod companies;
pub mod health;
pub mod paging;
pub mod shape;
pub mod stats;
pub mod suggestions;
pub mod time_serde;

mod error;

pub use companies::{CompanyListRequest, CompanyPageResponse, InvolvementListRequest};
pub use error::{Error, Result};
pub use health::{HealthResponse, HealthStatus};
pub use paging::{PageParams, Pagination};
pub use shape::{CompanyDetail, CompanySummary};
pub use stats::StatisticsResponse;

use bds_config::Config;
use bds_storage::{db::Db, planner::QueryPlanner};

pub struct BdsService {
	pub cfg: Config,
	pub db: Db,
	pub planner: QueryPlanner,
}
impl BdsService {
	pub fn new(cfg: Config, db: Db) -> Self {
		let planner = QueryPlanner::new(&cfg.search);

		Self { cfg, db, planner }
	}

	pub async fn connect(cfg: Config) -> Result<Self> {
		let db = Db::connect(&cfg.storage.postgres).await?;

		Ok(Self::new(cfg, db))
	}
}
