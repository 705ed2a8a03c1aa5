//! Turns aggregated rows into response objects.
//!
//! Absent aggregates become empty collections here rather than relying on the store's
//! `COALESCE`, and every collection is deduplicated by value in first-seen order.

use std::{collections::HashSet, hash::Hash};

use serde::Serialize;
use sqlx::types::Json;

use bds_storage::models::{CompanyRow, Reason, StockSymbol};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CompanySummary {
	pub id: String,
	pub name: String,
	pub description: Option<String>,
	pub industry: Option<String>,
	pub country_hq: Option<String>,
	pub parent_company: Option<String>,
	pub confidence_score: Option<f64>,
	pub stock_symbols: Vec<StockSymbol>,
	pub sources: Vec<String>,
	pub data_sources: Vec<String>,
	pub involvement_types: Vec<String>,
	pub sectors: Vec<String>,
	pub boycott_actions: Vec<String>,
	pub alternatives: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CompanyDetail {
	#[serde(flatten)]
	pub company: CompanySummary,
	pub reasons: Vec<Reason>,
	pub aliases: Vec<String>,
	pub campaigns: Vec<String>,
}

pub fn summary(row: CompanyRow) -> CompanySummary {
	split(row).0
}

pub fn detail(row: CompanyRow) -> CompanyDetail {
	let (company, extra) = split(row);

	CompanyDetail {
		company,
		reasons: collection(extra.reasons),
		aliases: collection(extra.aliases),
		campaigns: collection(extra.campaigns),
	}
}

/// Unwraps an aggregate, treating absence as empty, and drops repeated values.
pub fn collection<T>(value: Option<Json<Vec<T>>>) -> Vec<T>
where
	T: Clone + Eq + Hash,
{
	let values = value.map(|json| json.0).unwrap_or_default();
	let mut seen = HashSet::with_capacity(values.len());

	values.into_iter().filter(|value| seen.insert(value.clone())).collect()
}

struct DetailOnly {
	reasons: Option<Json<Vec<Reason>>>,
	aliases: Option<Json<Vec<String>>>,
	campaigns: Option<Json<Vec<String>>>,
}

fn split(row: CompanyRow) -> (CompanySummary, DetailOnly) {
	let company = CompanySummary {
		id: row.id,
		name: row.name,
		description: row.description,
		industry: row.industry,
		country_hq: row.country_hq,
		parent_company: row.parent_company,
		confidence_score: row.confidence_score,
		stock_symbols: collection(row.stock_symbols),
		sources: collection(row.sources),
		data_sources: collection(row.data_sources),
		involvement_types: collection(row.involvement_types),
		sectors: collection(row.sectors),
		boycott_actions: collection(row.boycott_actions),
		alternatives: collection(row.alternatives),
	};
	let extra =
		DetailOnly { reasons: row.reasons, aliases: row.aliases, campaigns: row.campaigns };

	(company, extra)
}
