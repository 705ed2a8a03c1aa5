use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use time::Date;

/// One company with its child collections already aggregated by the store.
///
/// Detail-only collections are absent from listing queries and decode as `None`.
#[derive(Debug, sqlx::FromRow)]
pub struct CompanyRow {
	pub id: String,
	pub name: String,
	pub description: Option<String>,
	pub industry: Option<String>,
	pub country_hq: Option<String>,
	pub parent_company: Option<String>,
	pub confidence_score: Option<f64>,
	pub stock_symbols: Option<Json<Vec<StockSymbol>>>,
	pub sources: Option<Json<Vec<String>>>,
	pub data_sources: Option<Json<Vec<String>>>,
	pub involvement_types: Option<Json<Vec<String>>>,
	pub sectors: Option<Json<Vec<String>>>,
	pub boycott_actions: Option<Json<Vec<String>>>,
	pub alternatives: Option<Json<Vec<String>>>,
	#[sqlx(default)]
	pub reasons: Option<Json<Vec<Reason>>>,
	#[sqlx(default)]
	pub aliases: Option<Json<Vec<String>>>,
	#[sqlx(default)]
	pub campaigns: Option<Json<Vec<String>>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StockSymbol {
	pub symbol: String,
	pub exchange: String,
	pub isin: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reason {
	pub summary: String,
	pub details: Option<String>,
	pub source: Option<String>,
	#[serde(default, with = "crate::models::iso_date")]
	pub date_added: Option<Date>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct SuggestionRow {
	pub name: String,
	pub id: String,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct InvolvementTypeCount {
	pub involvement_type: String,
	pub count: i64,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct CountryCount {
	pub country_hq: String,
	pub count: i64,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct IndustryCount {
	pub industry: String,
	pub count: i64,
}

/// `YYYY-MM-DD`, the shape PostgreSQL gives a `date` inside `jsonb_build_object`.
pub mod iso_date {
	use serde::{Deserialize as _, Deserializer, Serializer};
	use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

	const FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

	pub fn serialize<S>(value: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		match value {
			Some(value) => {
				let formatted = value.format(FORMAT).map_err(serde::ser::Error::custom)?;

				serializer.serialize_str(&formatted)
			},
			None => serializer.serialize_none(),
		}
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
	where
		D: Deserializer<'de>,
	{
		let raw = Option::<String>::deserialize(deserializer)?;

		match raw {
			Some(value) => Date::parse(&value, FORMAT).map(Some).map_err(serde::de::Error::custom),
			None => Ok(None),
		}
	}
}
