use crate::{
	Error, Result,
	db::Db,
	models::{CompanyRow, SuggestionRow},
	planner::{CompanyQuery, QueryPlanner},
	predicate,
};

#[derive(Debug)]
pub struct CompanyPage {
	pub rows: Vec<CompanyRow>,
	/// Distinct companies matching the query, independent of the window.
	pub total: i64,
}

/// Runs the row and count statements of a listing concurrently.
pub async fn fetch_page(
	db: &Db,
	planner: &QueryPlanner,
	query: &CompanyQuery,
) -> Result<CompanyPage> {
	let rows = planner.rows(query)?;
	let count = planner.count(query)?;

	if !db.consistent_reads() {
		let (rows, total) = tokio::try_join!(
			rows.fetch_all::<CompanyRow, _>(&db.pool),
			count.fetch_count(&db.pool)
		)?;

		return Ok(CompanyPage { rows, total });
	}

	let mut snapshot = db.read_snapshot().await?;
	let (rows_conn, count_conn) = snapshot.connections();
	let (rows, total) = tokio::try_join!(
		rows.fetch_all::<CompanyRow, _>(rows_conn),
		count.fetch_count(count_conn)
	)?;

	snapshot.finish().await?;

	Ok(CompanyPage { rows, total })
}

/// Detail view of one company. A missing id is [`Error::NotFound`].
pub async fn fetch_company(db: &Db, planner: &QueryPlanner, id: &str) -> Result<CompanyRow> {
	let statement = planner.rows(&CompanyQuery::detail(id))?;
	let row = statement.query_as::<CompanyRow>().fetch_optional(&db.pool).await?;

	row.ok_or_else(|| Error::NotFound(format!("company {id:?}")))
}

pub async fn suggest(
	db: &Db,
	planner: &QueryPlanner,
	term: &str,
	limit: u32,
) -> Result<Vec<SuggestionRow>> {
	let statement = planner.suggestions(&predicate::contains_pattern(term), limit);

	statement.fetch_all(&db.pool).await
}
