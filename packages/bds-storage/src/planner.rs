//! Statement planning for company reads.
//!
//! Row statements left-join every child relation of the requested [`View`] and collapse each one
//! with `json_agg(DISTINCT ...) FILTER (WHERE ... IS NOT NULL)`, grouped by `c.id`, so a company
//! is returned once no matter how many child rows it fans out to. Count statements only carry
//! the joins their scope needs and count `DISTINCT c.id`.

use crate::{
	Result,
	predicate::Predicate,
	sql::{BindValue, Slot, SqlWriter, Statement},
};

const COMPANY_COLUMNS: &str = "\
c.id,
	c.name,
	c.description,
	c.industry,
	c.country_hq,
	c.parent_company,
	c.confidence_score::float8 AS confidence_score";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Relation {
	StockSymbols,
	Sources,
	DataSources,
	InvolvementTypes,
	Sectors,
	BoycottActions,
	Alternatives,
	Reasons,
	Aliases,
	Campaigns,
}
impl Relation {
	pub fn table(self) -> &'static str {
		match self {
			Self::StockSymbols => "company_stock_symbols",
			Self::Sources => "company_sources",
			Self::DataSources => "company_data_sources",
			Self::InvolvementTypes => "company_involvement_types",
			Self::Sectors => "company_sectors",
			Self::BoycottActions => "company_boycott_actions",
			Self::Alternatives => "company_alternatives",
			Self::Reasons => "company_reasons",
			Self::Aliases => "company_aliases",
			Self::Campaigns => "company_campaigns",
		}
	}

	/// Alias used when the relation is joined into a row statement.
	pub fn alias(self) -> &'static str {
		match self {
			Self::StockSymbols => "css",
			Self::Sources => "cs",
			Self::DataSources => "cds",
			Self::InvolvementTypes => "cit",
			Self::Sectors => "csec",
			Self::BoycottActions => "cba",
			Self::Alternatives => "ca",
			Self::Reasons => "cr",
			Self::Aliases => "cal",
			Self::Campaigns => "cc",
		}
	}

	/// Alias used inside correlated `EXISTS` sub-selects.
	pub fn exists_alias(self) -> &'static str {
		match self {
			Self::StockSymbols => "x_css",
			Self::Sources => "x_cs",
			Self::DataSources => "x_cds",
			Self::InvolvementTypes => "x_cit",
			Self::Sectors => "x_csec",
			Self::BoycottActions => "x_cba",
			Self::Alternatives => "x_ca",
			Self::Reasons => "x_cr",
			Self::Aliases => "x_cal",
			Self::Campaigns => "x_cc",
		}
	}

	/// Required column whose `NULL` marks an outer-join miss.
	pub fn key_column(self) -> &'static str {
		match self {
			Self::StockSymbols => "symbol",
			Self::Sources => "source_url",
			Self::DataSources => "data_source",
			Self::InvolvementTypes => "involvement_type",
			Self::Sectors => "sector",
			Self::BoycottActions => "action",
			Self::Alternatives => "alternative",
			Self::Reasons => "summary",
			Self::Aliases => "alias",
			Self::Campaigns => "campaign_name",
		}
	}

	/// Name of the aggregated output column.
	pub fn output(self) -> &'static str {
		match self {
			Self::StockSymbols => "stock_symbols",
			Self::Sources => "sources",
			Self::DataSources => "data_sources",
			Self::InvolvementTypes => "involvement_types",
			Self::Sectors => "sectors",
			Self::BoycottActions => "boycott_actions",
			Self::Alternatives => "alternatives",
			Self::Reasons => "reasons",
			Self::Aliases => "aliases",
			Self::Campaigns => "campaigns",
		}
	}

	fn aggregate_value(self) -> String {
		let alias = self.alias();

		match self {
			Self::StockSymbols => format!(
				"jsonb_build_object('symbol', {alias}.symbol, 'exchange', {alias}.exchange, 'isin', {alias}.isin)"
			),
			Self::Reasons => format!(
				"jsonb_build_object('summary', {alias}.summary, 'details', {alias}.details, 'source', {alias}.source_url, 'date_added', {alias}.date_added)"
			),
			_ => format!("{alias}.{}", self.key_column()),
		}
	}

	fn aggregate_column(self) -> String {
		format!(
			"COALESCE(json_agg(DISTINCT {}) FILTER (WHERE {}.{} IS NOT NULL), '[]'::json) AS {}",
			self.aggregate_value(),
			self.alias(),
			self.key_column(),
			self.output()
		)
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
	/// Listing shape.
	Summary,
	/// Single-company shape; adds reasons, aliases and campaigns.
	Detail,
}
impl View {
	pub fn relations(self) -> &'static [Relation] {
		const SUMMARY: &[Relation] = &[
			Relation::StockSymbols,
			Relation::Sources,
			Relation::DataSources,
			Relation::InvolvementTypes,
			Relation::Sectors,
			Relation::BoycottActions,
			Relation::Alternatives,
		];
		const DETAIL: &[Relation] = &[
			Relation::StockSymbols,
			Relation::Sources,
			Relation::DataSources,
			Relation::Reasons,
			Relation::InvolvementTypes,
			Relation::Sectors,
			Relation::BoycottActions,
			Relation::Alternatives,
			Relation::Aliases,
			Relation::Campaigns,
		];

		match self {
			Self::Summary => SUMMARY,
			Self::Detail => DETAIL,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scope {
	All,
	ById(String),
	/// Exact match on `company_involvement_types.involvement_type`.
	ByInvolvementType(String),
}
impl Scope {
	fn order_by(&self) -> &'static str {
		match self {
			Self::All | Self::ById(_) => "c.name, c.id",
			Self::ByInvolvementType(_) => "c.confidence_score DESC NULLS LAST, c.name, c.id",
		}
	}
}

/// 1-based page window. Zero inputs are raised to one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageWindow {
	pub page: u32,
	pub limit: u32,
}
impl PageWindow {
	pub fn new(page: u32, limit: u32) -> Self {
		Self { page: page.max(1), limit: limit.max(1) }
	}

	pub fn offset(&self) -> i64 {
		i64::from(self.page - 1).saturating_mul(i64::from(self.limit))
	}
}

#[derive(Clone, Debug)]
pub struct CompanyQuery {
	pub scope: Scope,
	pub view: View,
	pub predicate: Predicate,
	/// `None` returns every matching company.
	pub window: Option<PageWindow>,
}
impl CompanyQuery {
	pub fn listing(scope: Scope, predicate: Predicate, window: PageWindow) -> Self {
		Self { scope, view: View::Summary, predicate, window: Some(window) }
	}

	pub fn detail(id: impl Into<String>) -> Self {
		Self {
			scope: Scope::ById(id.into()),
			view: View::Detail,
			predicate: Predicate::NoFilter,
			window: None,
		}
	}
}

#[derive(Clone, Debug)]
pub struct QueryPlanner {
	text_search_config: String,
}
impl QueryPlanner {
	pub fn new(cfg: &bds_config::Search) -> Self {
		Self { text_search_config: cfg.text_search_config.clone() }
	}

	/// One row per company with aggregated child collections.
	pub fn rows(&self, query: &CompanyQuery) -> Result<Statement> {
		let relations = query.view.relations();
		let mut out = SqlWriter::default();

		out.push("SELECT\n\t").push(COMPANY_COLUMNS);

		for relation in relations {
			out.push(",\n\t").push(&relation.aggregate_column());
		}

		out.push("\nFROM companies c");

		for relation in relations {
			let alias = relation.alias();

			out.push("\nLEFT JOIN ")
				.push(relation.table())
				.push(" ")
				.push(alias)
				.push(" ON ")
				.push(alias)
				.push(".company_id = c.id");
		}

		let mut clauses = WhereClauses::default();

		match &query.scope {
			Scope::All => {},
			Scope::ById(id) => {
				clauses.open(&mut out);
				out.push("c.id = ").push_param(Slot::CompanyId, || BindValue::Text(id.clone()));
			},
			Scope::ByInvolvementType(label) => {
				let alias = Relation::InvolvementTypes.exists_alias();

				clauses.open(&mut out);
				out.push("EXISTS (SELECT 1 FROM ")
					.push(Relation::InvolvementTypes.table())
					.push(" ")
					.push(alias)
					.push(" WHERE ")
					.push(alias)
					.push(".company_id = c.id AND ")
					.push(alias)
					.push(".involvement_type = ")
					.push_param(Slot::InvolvementType, || BindValue::Text(label.clone()))
					.push(")");
			},
		}

		self.push_predicate(&mut out, &mut clauses, &query.predicate)?;

		out.push("\nGROUP BY c.id\nORDER BY ").push(query.scope.order_by());

		push_window(&mut out, query.window);

		Ok(out.finish())
	}

	/// `COUNT(DISTINCT c.id)` under the same scope and predicate as [`Self::rows`].
	pub fn count(&self, query: &CompanyQuery) -> Result<Statement> {
		let mut out = SqlWriter::default();
		let mut clauses = WhereClauses::default();

		out.push("SELECT COUNT(DISTINCT c.id) AS total\nFROM companies c");

		match &query.scope {
			Scope::All => {},
			Scope::ById(id) => {
				clauses.open(&mut out);
				out.push("c.id = ").push_param(Slot::CompanyId, || BindValue::Text(id.clone()));
			},
			Scope::ByInvolvementType(label) => {
				let relation = Relation::InvolvementTypes;
				let alias = relation.alias();

				out.push("\nINNER JOIN ")
					.push(relation.table())
					.push(" ")
					.push(alias)
					.push(" ON ")
					.push(alias)
					.push(".company_id = c.id");
				clauses.open(&mut out);
				out.push(alias)
					.push(".involvement_type = ")
					.push_param(Slot::InvolvementType, || BindValue::Text(label.clone()));
			},
		}

		self.push_predicate(&mut out, &mut clauses, &query.predicate)?;

		Ok(out.finish())
	}

	/// Name-prefix-or-infix autocomplete, best confidence first.
	pub fn suggestions(&self, pattern: &str, limit: u32) -> Statement {
		let mut out = SqlWriter::default();

		out.push("SELECT c.name, c.id\nFROM companies c\nWHERE c.name ILIKE ")
			.push_param(Slot::Pattern, || BindValue::Text(pattern.to_string()))
			.push("\nORDER BY c.confidence_score DESC NULLS LAST, c.name, c.id\nLIMIT ")
			.push_param(Slot::Limit, || BindValue::Int(i64::from(limit)));

		out.finish()
	}

	fn push_predicate(
		&self,
		out: &mut SqlWriter,
		clauses: &mut WhereClauses,
		predicate: &Predicate,
	) -> Result<()> {
		if predicate.is_filter() {
			clauses.open(out);
			predicate.render(out, &self.text_search_config)?;
		}

		Ok(())
	}
}

#[derive(Default)]
struct WhereClauses {
	opened: bool,
}
impl WhereClauses {
	fn open(&mut self, out: &mut SqlWriter) {
		out.push(if self.opened { " AND " } else { "\nWHERE " });

		self.opened = true;
	}
}

fn push_window(out: &mut SqlWriter, window: Option<PageWindow>) {
	let Some(window) = window else {
		return;
	};

	out.push("\nLIMIT ")
		.push_param(Slot::Limit, || BindValue::Int(i64::from(window.limit)))
		.push(" OFFSET ")
		.push_param(Slot::Offset, || BindValue::Int(window.offset()));
}
