use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub search: Search,
	#[serde(default)]
	pub paging: Paging,
	#[serde(default)]
	pub suggestions: Suggestions,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
	#[serde(default = "default_acquire_timeout_ms")]
	pub acquire_timeout_ms: u64,
	/// Applied as `statement_timeout` on every pooled connection. Zero disables it.
	#[serde(default)]
	pub statement_timeout_ms: u64,
	/// Run a listing's row and count queries against one shared snapshot. Needs at least two
	/// pooled connections because both halves execute at the same time.
	#[serde(default = "default_true")]
	pub consistent_reads: bool,
}
impl Postgres {
	pub fn new(dsn: impl Into<String>, pool_max_conns: u32) -> Self {
		Self {
			dsn: dsn.into(),
			pool_max_conns,
			acquire_timeout_ms: default_acquire_timeout_ms(),
			statement_timeout_ms: 0,
			consistent_reads: true,
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Search {
	/// PostgreSQL text search configuration used by `to_tsvector`/`to_tsquery`.
	pub text_search_config: String,
}
impl Default for Search {
	fn default() -> Self {
		Self { text_search_config: "english".to_string() }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Paging {
	pub default_limit: u32,
	pub max_limit: u32,
}
impl Default for Paging {
	fn default() -> Self {
		Self { default_limit: 20, max_limit: 100 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Suggestions {
	pub min_chars: usize,
	pub max_results: u32,
}
impl Default for Suggestions {
	fn default() -> Self {
		Self { min_chars: 2, max_results: 10 }
	}
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_acquire_timeout_ms() -> u64 {
	5_000
}

fn default_true() -> bool {
	true
}
