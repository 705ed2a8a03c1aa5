use crate::{
	Result,
	db::Db,
	models::{CountryCount, IndustryCount, InvolvementTypeCount},
};

const TOP_N: i64 = 10;

#[derive(Debug)]
pub struct Statistics {
	pub total_companies: i64,
	pub total_sources: i64,
	pub involvement_types: Vec<InvolvementTypeCount>,
	pub top_countries: Vec<CountryCount>,
	pub top_industries: Vec<IndustryCount>,
}

/// Directory-wide aggregates. The five queries are issued together and awaited as a group.
pub async fn statistics(db: &Db) -> Result<Statistics> {
	let (total_companies, total_sources, involvement_types, top_countries, top_industries) = tokio::try_join!(
		sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM companies").fetch_one(&db.pool),
		sqlx::query_scalar::<_, i64>(
			"SELECT COUNT(DISTINCT data_source) FROM company_data_sources"
		)
		.fetch_one(&db.pool),
		sqlx::query_as::<_, InvolvementTypeCount>(
			"\
SELECT involvement_type, COUNT(*) AS count
FROM company_involvement_types
GROUP BY involvement_type
ORDER BY count DESC, involvement_type",
		)
		.fetch_all(&db.pool),
		sqlx::query_as::<_, CountryCount>(
			"\
SELECT country_hq, COUNT(*) AS count
FROM companies
WHERE country_hq IS NOT NULL
GROUP BY country_hq
ORDER BY count DESC, country_hq
LIMIT $1",
		)
		.bind(TOP_N)
		.fetch_all(&db.pool),
		sqlx::query_as::<_, IndustryCount>(
			"\
SELECT industry, COUNT(*) AS count
FROM companies
WHERE industry IS NOT NULL
GROUP BY industry
ORDER BY count DESC, industry
LIMIT $1",
		)
		.bind(TOP_N)
		.fetch_all(&db.pool),
	)?;

	Ok(Statistics {
		total_companies,
		total_sources,
		involvement_types,
		top_countries,
		top_industries,
	})
}
