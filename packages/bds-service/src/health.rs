use serde::Serialize;
use time::OffsetDateTime;

use crate::BdsService;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
	Healthy,
	Unhealthy,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
	pub status: HealthStatus,
	#[serde(skip_serializing_if = "Option::is_none", with = "crate::time_serde::option")]
	pub timestamp: Option<OffsetDateTime>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}
impl HealthResponse {
	pub fn is_healthy(&self) -> bool {
		self.status == HealthStatus::Healthy
	}
}

impl BdsService {
	/// Round-trips the store. Failures are reported, not raised.
	pub async fn health(&self) -> HealthResponse {
		match self.db.ping().await {
			Ok(()) => HealthResponse {
				status: HealthStatus::Healthy,
				timestamp: Some(OffsetDateTime::now_utc()),
				error: None,
			},
			Err(err) => {
				tracing::warn!(error = %err, "Health check failed.");

				HealthResponse {
					status: HealthStatus::Unhealthy,
					timestamp: None,
					error: Some(err.to_string()),
				}
			},
		}
	}
}
