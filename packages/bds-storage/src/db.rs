use std::{str::FromStr, sync::Arc, time::Duration};

use sqlx::{
	Executor, PgConnection, PgPool, Postgres, Transaction,
	postgres::{PgConnectOptions, PgPoolOptions},
};

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::{Error, Result};

const BEGIN_READ_SNAPSHOT: &str = "SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY";

pub struct Db {
	pub pool: PgPool,
	consistent_reads: bool,
	/// One permit per connection pair, so every open snapshot can always take its follower.
	snapshot_slots: Arc<Semaphore>,
}
impl Db {
	pub async fn connect(cfg: &bds_config::Postgres) -> Result<Self> {
		let mut options = PgConnectOptions::from_str(&cfg.dsn)?;

		if cfg.statement_timeout_ms > 0 {
			options = options.options([("statement_timeout", cfg.statement_timeout_ms)]);
		}

		let pool = PgPoolOptions::new()
			.max_connections(cfg.pool_max_conns)
			.acquire_timeout(Duration::from_millis(cfg.acquire_timeout_ms))
			.connect_with(options)
			.await?;

		Ok(Self::from_pool(pool, cfg.consistent_reads))
	}

	pub fn from_pool(pool: PgPool, consistent_reads: bool) -> Self {
		let pairs = (pool.options().get_max_connections() / 2).max(1);

		Self { pool, consistent_reads, snapshot_slots: Arc::new(Semaphore::new(pairs as usize)) }
	}

	/// Whether paired reads should share one exported snapshot.
	pub fn consistent_reads(&self) -> bool {
		self.consistent_reads
	}

	pub async fn ping(&self) -> Result<()> {
		sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(&self.pool).await?;

		Ok(())
	}

	/// Opens two read-only transactions that see the same snapshot.
	///
	/// The first transaction exports its snapshot and the second adopts it with
	/// `SET TRANSACTION SNAPSHOT`, so statements can run on both connections concurrently and
	/// still observe identical data.
	///
	/// At most half the pool is held by snapshot pairs. A pair reserves its slot before taking
	/// the leader, so no request holds one connection while waiting on another that only a
	/// sibling pair can release.
	pub async fn read_snapshot(&self) -> Result<ReadSnapshot> {
		let permit = Arc::clone(&self.snapshot_slots)
			.acquire_owned()
			.await
			.map_err(|err| Error::Snapshot(format!("Snapshot slots closed: {err}.")))?;
		let mut leader = self.pool.begin().await?;

		(&mut *leader).execute(BEGIN_READ_SNAPSHOT).await?;

		let snapshot_id: String =
			sqlx::query_scalar("SELECT pg_export_snapshot()").fetch_one(&mut *leader).await?;

		if !is_snapshot_id(&snapshot_id) {
			return Err(Error::Snapshot(format!("Unexpected identifier {snapshot_id:?}.")));
		}

		let mut follower = self.pool.begin().await?;
		let import = format!("SET TRANSACTION SNAPSHOT '{snapshot_id}'");

		(&mut *follower).execute(BEGIN_READ_SNAPSHOT).await?;
		(&mut *follower).execute(import.as_str()).await?;

		tracing::trace!(snapshot_id = %snapshot_id, "Opened shared read snapshot.");

		Ok(ReadSnapshot { leader, follower, _permit: permit })
	}
}

pub struct ReadSnapshot {
	leader: Transaction<'static, Postgres>,
	follower: Transaction<'static, Postgres>,
	_permit: OwnedSemaphorePermit,
}
impl ReadSnapshot {
	/// Both connections, usable at the same time.
	pub fn connections(&mut self) -> (&mut PgConnection, &mut PgConnection) {
		(&mut *self.leader, &mut *self.follower)
	}

	pub async fn finish(self) -> Result<()> {
		self.follower.commit().await?;
		self.leader.commit().await?;

		Ok(())
	}
}

/// Exported snapshot ids look like `00000003-0000001B-1`.
fn is_snapshot_id(raw: &str) -> bool {
	!raw.is_empty() && raw.chars().all(|c| c.is_ascii_hexdigit() || c == '-')
}

#[cfg(test)]
mod tests {
	use crate::db::is_snapshot_id;

	#[test]
	fn snapshot_ids_are_hex_and_dashes() {
		assert!(is_snapshot_id("00000003-0000001B-1"));
		assert!(!is_snapshot_id(""));
		assert!(!is_snapshot_id("0000'; SELECT 1; --"));
	}
}
