mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Paging, Postgres, Search, Service, Storage, Suggestions};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	parse_at(&raw, path)
}

/// Parses an in-memory TOML document. Errors report the path as `<inline>`.
pub fn parse(raw: &str) -> Result<Config> {
	parse_at(raw, Path::new("<inline>"))
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.storage.postgres.consistent_reads && cfg.storage.postgres.pool_max_conns < 2 {
		return Err(Error::Validation {
			message:
				"storage.postgres.pool_max_conns must be at least 2 when consistent_reads is true."
					.to_string(),
		});
	}
	if cfg.storage.postgres.acquire_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.acquire_timeout_ms must be greater than zero.".to_string(),
		});
	}

	let ts_config = cfg.search.text_search_config.as_str();

	if ts_config.is_empty()
		|| !ts_config.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
	{
		return Err(Error::Validation {
			message: "search.text_search_config must be a plain identifier, e.g. english."
				.to_string(),
		});
	}
	if cfg.paging.default_limit == 0 {
		return Err(Error::Validation {
			message: "paging.default_limit must be greater than zero.".to_string(),
		});
	}
	if cfg.paging.default_limit > cfg.paging.max_limit {
		return Err(Error::Validation {
			message: "paging.default_limit must not exceed paging.max_limit.".to_string(),
		});
	}
	if cfg.suggestions.min_chars == 0 {
		return Err(Error::Validation {
			message: "suggestions.min_chars must be greater than zero.".to_string(),
		});
	}
	if cfg.suggestions.max_results == 0 {
		return Err(Error::Validation {
			message: "suggestions.max_results must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn parse_at(raw: &str, path: &Path) -> Result<Config> {
	let mut cfg: Config = toml::from_str(raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

fn normalize(cfg: &mut Config) {
	cfg.storage.postgres.dsn = cfg.storage.postgres.dsn.trim().to_string();
	cfg.search.text_search_config = cfg.search.text_search_config.trim().to_ascii_lowercase();
}
