//! Seed rows for integration tests.

use sqlx::PgPool;
use time::Date;

use crate::Result;

#[derive(Clone, Debug, Default)]
pub struct CompanyFixture {
	pub id: String,
	pub name: String,
	pub description: Option<String>,
	pub industry: Option<String>,
	pub country_hq: Option<String>,
	pub parent_company: Option<String>,
	pub confidence_score: Option<f64>,
	pub stock_symbols: Vec<StockFixture>,
	pub sources: Vec<String>,
	pub data_sources: Vec<String>,
	pub involvement_types: Vec<String>,
	pub sectors: Vec<String>,
	pub boycott_actions: Vec<String>,
	pub alternatives: Vec<String>,
	pub reasons: Vec<ReasonFixture>,
	pub aliases: Vec<String>,
	pub campaigns: Vec<String>,
}
impl CompanyFixture {
	pub fn new(id: &str, name: &str) -> Self {
		Self { id: id.to_string(), name: name.to_string(), ..Default::default() }
	}
}

#[derive(Clone, Debug)]
pub struct StockFixture {
	pub symbol: String,
	pub exchange: String,
	pub isin: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct ReasonFixture {
	pub summary: String,
	pub details: Option<String>,
	pub source_url: Option<String>,
	pub date_added: Option<Date>,
}

pub async fn insert_company(pool: &PgPool, company: &CompanyFixture) -> Result<()> {
	let mut tx = pool.begin().await?;

	sqlx::query(
		"\
INSERT INTO companies (id, name, description, industry, country_hq, parent_company, confidence_score)
VALUES ($1, $2, $3, $4, $5, $6, CAST($7 AS NUMERIC(3,2)))",
	)
	.bind(&company.id)
	.bind(&company.name)
	.bind(&company.description)
	.bind(&company.industry)
	.bind(&company.country_hq)
	.bind(&company.parent_company)
	.bind(company.confidence_score)
	.execute(&mut *tx)
	.await?;

	for stock in &company.stock_symbols {
		sqlx::query(
			"\
INSERT INTO company_stock_symbols (company_id, symbol, exchange, isin)
VALUES ($1, $2, $3, $4)",
		)
		.bind(&company.id)
		.bind(&stock.symbol)
		.bind(&stock.exchange)
		.bind(&stock.isin)
		.execute(&mut *tx)
		.await?;
	}

	for reason in &company.reasons {
		sqlx::query(
			"\
INSERT INTO company_reasons (company_id, summary, details, source_url, date_added)
VALUES ($1, $2, $3, $4, $5)",
		)
		.bind(&company.id)
		.bind(&reason.summary)
		.bind(&reason.details)
		.bind(&reason.source_url)
		.bind(reason.date_added)
		.execute(&mut *tx)
		.await?;
	}

	let labels: [(&str, &str, &[String]); 8] = [
		("company_sources", "source_url", &company.sources),
		("company_data_sources", "data_source", &company.data_sources),
		("company_involvement_types", "involvement_type", &company.involvement_types),
		("company_sectors", "sector", &company.sectors),
		("company_boycott_actions", "action", &company.boycott_actions),
		("company_alternatives", "alternative", &company.alternatives),
		("company_aliases", "alias", &company.aliases),
		("company_campaigns", "campaign_name", &company.campaigns),
	];

	for (table, column, values) in labels {
		let sql = format!("INSERT INTO {table} (company_id, {column}) VALUES ($1, $2)");

		for value in values {
			sqlx::query(&sql).bind(&company.id).bind(value).execute(&mut *tx).await?;
		}
	}

	tx.commit().await?;

	Ok(())
}
