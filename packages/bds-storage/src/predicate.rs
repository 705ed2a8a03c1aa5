//! Free-text search predicates.
//!
//! A search term becomes a [`PredicateExpr`] tree plus two bind values: the `to_tsquery`
//! expression and the `ILIKE` pattern. The tree is rendered against the `companies c` alias;
//! [`PredicateExpr::Exists`] opens a correlated sub-select over one child relation so terms that
//! only appear in a tag or a reason still surface the parent.

use crate::{
	Error, Result,
	planner::Relation,
	sql::{BindValue, Slot, SqlWriter},
};

const TSQUERY_OPERATORS: &[char] = &['&', '|', '!', '(', ')', ':', '*', '<', '>', '\'', '\\'];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
	Name,
	Description,
	Industry,
	InvolvementType,
	Sector,
	ReasonSummary,
	ReasonDetails,
}
impl Field {
	/// Child relation owning the column, `None` for columns of `companies`.
	pub fn relation(self) -> Option<Relation> {
		match self {
			Self::Name | Self::Description | Self::Industry => None,
			Self::InvolvementType => Some(Relation::InvolvementTypes),
			Self::Sector => Some(Relation::Sectors),
			Self::ReasonSummary | Self::ReasonDetails => Some(Relation::Reasons),
		}
	}

	pub fn column(self) -> &'static str {
		match self {
			Self::Name => "name",
			Self::Description => "description",
			Self::Industry => "industry",
			Self::InvolvementType => "involvement_type",
			Self::Sector => "sector",
			Self::ReasonSummary => "summary",
			Self::ReasonDetails => "details",
		}
	}

	pub fn nullable(self) -> bool {
		matches!(self, Self::Description | Self::Industry | Self::ReasonDetails)
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PredicateExpr {
	And(Vec<PredicateExpr>),
	Or(Vec<PredicateExpr>),
	/// Full-text match of the bound ts query against the field.
	RankedMatch(Field),
	/// Case-insensitive match of the bound pattern against the field.
	Substring(Field),
	/// At least one row of `relation` belonging to the company satisfies `expr`.
	Exists { relation: Relation, expr: Box<PredicateExpr> },
}
impl PredicateExpr {
	pub fn exists(relation: Relation, expr: PredicateExpr) -> Self {
		Self::Exists { relation, expr: Box::new(expr) }
	}

	pub(crate) fn render(
		&self,
		out: &mut SqlWriter,
		params: &SearchParams,
		ctx: RenderContext<'_>,
	) -> Result<()> {
		match self {
			Self::And(nodes) => Self::render_joined(nodes, " AND ", "TRUE", out, params, ctx),
			Self::Or(nodes) => Self::render_joined(nodes, " OR ", "FALSE", out, params, ctx),
			Self::RankedMatch(field) => {
				let column = ctx.qualify(*field)?;

				out.push("to_tsvector('")
					.push(ctx.text_search_config)
					.push("', ")
					.push(&column)
					.push(") @@ to_tsquery('")
					.push(ctx.text_search_config)
					.push("', ")
					.push_param(Slot::TsQuery, || BindValue::Text(params.ts_query.clone()))
					.push(")");

				Ok(())
			},
			Self::Substring(field) => {
				let column = ctx.qualify(*field)?;

				out.push(&column)
					.push(" ILIKE ")
					.push_param(Slot::Pattern, || BindValue::Text(params.pattern.clone()));

				Ok(())
			},
			Self::Exists { relation, expr } => {
				if ctx.scope.is_some() {
					return Err(Error::InvalidArgument(
						"EXISTS clauses cannot be nested.".to_string(),
					));
				}

				let alias = relation.exists_alias();

				out.push("EXISTS (SELECT 1 FROM ")
					.push(relation.table())
					.push(" ")
					.push(alias)
					.push(" WHERE ")
					.push(alias)
					.push(".company_id = c.id AND (");
				expr.render(out, params, RenderContext { scope: Some(*relation), ..ctx })?;
				out.push("))");

				Ok(())
			},
		}
	}

	fn render_joined(
		nodes: &[Self],
		separator: &str,
		empty: &str,
		out: &mut SqlWriter,
		params: &SearchParams,
		ctx: RenderContext<'_>,
	) -> Result<()> {
		if nodes.is_empty() {
			out.push(empty);

			return Ok(());
		}

		out.push("(");

		for (i, node) in nodes.iter().enumerate() {
			if i > 0 {
				out.push(separator);
			}

			node.render(out, params, ctx)?;
		}

		out.push(")");

		Ok(())
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchParams {
	pub ts_query: String,
	pub pattern: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Predicate {
	NoFilter,
	Search { expr: PredicateExpr, params: SearchParams },
}
impl Predicate {
	pub fn is_filter(&self) -> bool {
		matches!(self, Self::Search { .. })
	}

	/// Bind values in placeholder order: ts query, then pattern.
	pub fn params(&self) -> Vec<BindValue> {
		match self {
			Self::NoFilter => Vec::new(),
			Self::Search { params, .. } => vec![
				BindValue::Text(params.ts_query.clone()),
				BindValue::Text(params.pattern.clone()),
			],
		}
	}

	/// Writes the predicate as a boolean SQL expression. Writes nothing for `NoFilter`.
	pub(crate) fn render(&self, out: &mut SqlWriter, text_search_config: &str) -> Result<()> {
		match self {
			Self::NoFilter => Ok(()),
			Self::Search { expr, params } =>
				expr.render(out, params, RenderContext { text_search_config, scope: None }),
		}
	}
}

#[derive(Clone, Copy)]
pub(crate) struct RenderContext<'a> {
	text_search_config: &'a str,
	scope: Option<Relation>,
}
impl RenderContext<'_> {
	fn qualify(&self, field: Field) -> Result<String> {
		let alias = match (field.relation(), self.scope) {
			(None, _) => "c",
			(Some(owner), Some(scope)) if owner == scope => scope.exists_alias(),
			(Some(owner), _) => {
				return Err(Error::InvalidArgument(format!(
					"{}.{} is only reachable inside an EXISTS over {}.",
					owner.table(),
					field.column(),
					owner.table()
				)));
			},
		};

		Ok(if field.nullable() {
			format!("COALESCE({alias}.{}, '')", field.column())
		} else {
			format!("{alias}.{}", field.column())
		})
	}
}

/// Builds the company search predicate for a raw search box value.
///
/// Runs of whitespace collapse to one space, so the substring clauses match the tokens as a
/// single-spaced phrase.
pub fn build_search_predicate(raw: &str) -> Predicate {
	let term = raw.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();

	if term.is_empty() {
		return Predicate::NoFilter;
	}

	let params = SearchParams { ts_query: ts_query(&term), pattern: contains_pattern(&term) };
	let expr = PredicateExpr::Or(vec![
		PredicateExpr::RankedMatch(Field::Name),
		PredicateExpr::RankedMatch(Field::Description),
		PredicateExpr::RankedMatch(Field::Industry),
		PredicateExpr::Substring(Field::Name),
		PredicateExpr::Substring(Field::Description),
		PredicateExpr::exists(
			Relation::InvolvementTypes,
			PredicateExpr::Substring(Field::InvolvementType),
		),
		PredicateExpr::exists(Relation::Sectors, PredicateExpr::Substring(Field::Sector)),
		PredicateExpr::exists(
			Relation::Reasons,
			PredicateExpr::Or(vec![
				PredicateExpr::Substring(Field::ReasonSummary),
				PredicateExpr::Substring(Field::ReasonDetails),
			]),
		),
	]);

	Predicate::Search { expr, params }
}

/// Whitespace tokens joined with `&`, with tsquery operator characters removed.
pub fn ts_query(term: &str) -> String {
	term.split_whitespace()
		.map(|token| {
			token.chars().filter(|c| !TSQUERY_OPERATORS.contains(c)).collect::<String>()
		})
		.filter(|token| !token.is_empty())
		.collect::<Vec<_>>()
		.join(" & ")
}

/// `%term%` with `LIKE` wildcards in the term escaped.
pub fn contains_pattern(term: &str) -> String {
	let mut out = String::with_capacity(term.len() + 2);

	out.push('%');

	for c in term.chars() {
		if matches!(c, '%' | '_' | '\\') {
			out.push('\\');
		}

		out.push(c);
	}

	out.push('%');

	out
}
