//! Parameterized statements rendered by the planner.
//!
//! Placeholders are allocated per [`Slot`], not per use: a statement that references the
//! substring pattern in five places still binds it once as a single `$n`.

use std::fmt::Write as _;

use sqlx::{
	Executor, FromRow, Postgres,
	postgres::{PgArguments, PgRow},
	query::{QueryAs, QueryScalar},
};

use crate::Result;

/// Named parameter positions a statement may reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
	TsQuery,
	Pattern,
	CompanyId,
	InvolvementType,
	Limit,
	Offset,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindValue {
	Text(String),
	Int(i64),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Statement {
	pub sql: String,
	pub binds: Vec<BindValue>,
}
impl Statement {
	pub fn query_as<O>(&self) -> QueryAs<'_, Postgres, O, PgArguments>
	where
		O: for<'r> FromRow<'r, PgRow>,
	{
		let mut query = sqlx::query_as::<_, O>(&self.sql);

		for bind in &self.binds {
			query = match bind {
				BindValue::Text(value) => query.bind(value.as_str()),
				BindValue::Int(value) => query.bind(*value),
			};
		}

		query
	}

	pub fn query_scalar<O>(&self) -> QueryScalar<'_, Postgres, O, PgArguments>
	where
		(O,): for<'r> FromRow<'r, PgRow>,
	{
		let mut query = sqlx::query_scalar::<_, O>(&self.sql);

		for bind in &self.binds {
			query = match bind {
				BindValue::Text(value) => query.bind(value.as_str()),
				BindValue::Int(value) => query.bind(*value),
			};
		}

		query
	}

	pub async fn fetch_all<'e, O, E>(&self, executor: E) -> Result<Vec<O>>
	where
		O: for<'r> FromRow<'r, PgRow> + Send + Unpin,
		E: Executor<'e, Database = Postgres>,
	{
		let rows = self.query_as::<O>().fetch_all(executor).await?;

		Ok(rows)
	}

	pub async fn fetch_count<'e, E>(&self, executor: E) -> Result<i64>
	where
		E: Executor<'e, Database = Postgres>,
	{
		let count = self.query_scalar::<i64>().fetch_one(executor).await?;

		Ok(count)
	}

	/// 1-based placeholder index of `value`, if it is bound.
	#[cfg(test)]
	pub(crate) fn position_of(&self, value: &BindValue) -> Option<usize> {
		self.binds.iter().position(|bind| bind == value).map(|index| index + 1)
	}
}

#[derive(Debug, Default)]
pub(crate) struct SqlWriter {
	sql: String,
	slots: Vec<Slot>,
	binds: Vec<BindValue>,
}
impl SqlWriter {
	pub(crate) fn push(&mut self, fragment: &str) -> &mut Self {
		self.sql.push_str(fragment);

		self
	}

	/// Writes the placeholder for `slot`, binding `value` only on first use.
	pub(crate) fn push_param(
		&mut self,
		slot: Slot,
		value: impl FnOnce() -> BindValue,
	) -> &mut Self {
		let index = match self.slots.iter().position(|existing| *existing == slot) {
			Some(index) => index,
			None => {
				self.slots.push(slot);
				self.binds.push(value());

				self.slots.len() - 1
			},
		};
		let _ = write!(self.sql, "${}", index + 1);

		self
	}

	pub(crate) fn finish(self) -> Statement {
		Statement { sql: self.sql, binds: self.binds }
	}
}
