use std::sync::Arc;

use bds_service::BdsService;
use bds_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<BdsService>,
}
impl AppState {
	pub async fn new(config: bds_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		Ok(Self::from_service(BdsService::new(config, db)))
	}

	pub fn from_service(service: BdsService) -> Self {
		Self { service: Arc::new(service) }
	}
}
