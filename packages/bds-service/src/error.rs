pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String, field: Option<String> },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl Error {
	pub(crate) fn invalid_field(field: &str, message: impl Into<String>) -> Self {
		Self::InvalidRequest { message: message.into(), field: Some(field.to_string()) }
	}
}

impl From<bds_storage::Error> for Error {
	fn from(err: bds_storage::Error) -> Self {
		match err {
			bds_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			bds_storage::Error::InvalidArgument(message) =>
				Self::InvalidRequest { message, field: None },
			bds_storage::Error::NotFound(message) => Self::NotFound { message },
			bds_storage::Error::Snapshot(message) => Self::Storage { message },
		}
	}
}
