use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use bds_config::{Config, Error};

const SAMPLE_CONFIG_TOML: &str = include_str!("fixtures/sample_config.toml");

fn sample_toml_with(section: &str, key: &str, value: Value) -> String {
	let mut root: Value = toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.");
	let mut table = root.as_table_mut().expect("Sample config must be a table.");

	for part in section.split('.') {
		table = table
			.get_mut(part)
			.and_then(Value::as_table_mut)
			.unwrap_or_else(|| panic!("Sample config must include [{section}]."));
	}

	table.insert(key.to_string(), value);

	toml::to_string(&root).expect("Failed to render sample config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("bds_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn base_config() -> Config {
	bds_config::parse(SAMPLE_CONFIG_TOML).expect("Sample config must be valid.")
}

#[test]
fn sample_config_loads_from_disk() {
	let path = write_temp_config(SAMPLE_CONFIG_TOML.to_string());
	let result = bds_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let cfg = result.expect("Expected sample config to load.");

	assert_eq!(cfg.service.http_bind, "127.0.0.1:8080");
	assert_eq!(cfg.storage.postgres.pool_max_conns, 10);
	assert_eq!(cfg.storage.postgres.statement_timeout_ms, 15_000);
	assert!(cfg.storage.postgres.consistent_reads);
	assert_eq!(cfg.paging.default_limit, 20);
	assert_eq!(cfg.suggestions.max_results, 10);
}

#[test]
fn optional_sections_fall_back_to_defaults() {
	let cfg = bds_config::parse(
		r#"
[service]
http_bind = "127.0.0.1:0"

[storage.postgres]
dsn = "postgres://localhost/bds"
pool_max_conns = 4
"#,
	)
	.expect("Minimal config must be valid.");

	assert_eq!(cfg.service.log_level, "info");
	assert_eq!(cfg.search.text_search_config, "english");
	assert_eq!(cfg.paging.default_limit, 20);
	assert_eq!(cfg.paging.max_limit, 100);
	assert_eq!(cfg.suggestions.min_chars, 2);
	assert_eq!(cfg.suggestions.max_results, 10);
	assert_eq!(cfg.storage.postgres.acquire_timeout_ms, 5_000);
	assert_eq!(cfg.storage.postgres.statement_timeout_ms, 0);
	assert!(cfg.storage.postgres.consistent_reads);
}

#[test]
fn missing_file_reports_read_error() {
	let mut path = env::temp_dir();

	path.push("bds_config_test_does_not_exist.toml");

	let err = bds_config::load(&path).expect_err("Expected read error.");

	assert!(matches!(err, Error::ReadConfig { .. }), "Unexpected error: {err:?}");
}

#[test]
fn malformed_toml_reports_parse_error() {
	let err = bds_config::parse("[service\nhttp_bind = ").expect_err("Expected parse error.");

	assert!(matches!(err, Error::ParseConfig { .. }), "Unexpected error: {err:?}");
}

#[test]
fn consistent_reads_require_two_connections() {
	let payload = sample_toml_with("storage.postgres", "pool_max_conns", Value::Integer(1));
	let err = bds_config::parse(&payload).expect_err("Expected pool size validation error.");

	assert!(
		err.to_string().contains("must be at least 2 when consistent_reads is true."),
		"Unexpected error: {err}"
	);

	let payload = sample_toml_with("storage.postgres", "consistent_reads", Value::Boolean(false));
	let mut root: Value = toml::from_str(&payload).expect("Failed to parse payload.");

	root["storage"]["postgres"]
		.as_table_mut()
		.expect("postgres table")
		.insert("pool_max_conns".to_string(), Value::Integer(1));

	let payload = toml::to_string(&root).expect("Failed to render payload.");

	assert!(bds_config::parse(&payload).is_ok());
}

#[test]
fn default_limit_must_fit_max_limit() {
	let mut cfg = base_config();

	cfg.paging.default_limit = 150;

	let err = bds_config::validate(&cfg).expect_err("Expected paging validation error.");

	assert!(
		err.to_string().contains("paging.default_limit must not exceed paging.max_limit."),
		"Unexpected error: {err}"
	);

	cfg.paging.default_limit = 0;

	let err = bds_config::validate(&cfg).expect_err("Expected paging validation error.");

	assert!(
		err.to_string().contains("paging.default_limit must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn text_search_config_is_normalized_and_checked() {
	let payload =
		sample_toml_with("search", "text_search_config", Value::String(" Simple ".to_string()));
	let cfg = bds_config::parse(&payload).expect("Expected normalized config.");

	assert_eq!(cfg.search.text_search_config, "simple");

	let payload = sample_toml_with(
		"search",
		"text_search_config",
		Value::String("english'); DROP TABLE companies; --".to_string()),
	);
	let err = bds_config::parse(&payload).expect_err("Expected identifier validation error.");

	assert!(
		err.to_string().contains("search.text_search_config must be a plain identifier"),
		"Unexpected error: {err}"
	);
}

#[test]
fn suggestion_bounds_must_be_positive() {
	let mut cfg = base_config();

	cfg.suggestions.min_chars = 0;

	assert!(bds_config::validate(&cfg).is_err());

	cfg = base_config();
	cfg.suggestions.max_results = 0;

	let err = bds_config::validate(&cfg).expect_err("Expected suggestion validation error.");

	assert!(
		err.to_string().contains("suggestions.max_results must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn dsn_is_trimmed_and_required() {
	let payload = sample_toml_with("storage.postgres", "dsn", Value::String("   ".to_string()));
	let err = bds_config::parse(&payload).expect_err("Expected dsn validation error.");

	assert!(
		err.to_string().contains("storage.postgres.dsn must be non-empty."),
		"Unexpected error: {err}"
	);
}
