pub mod companies;
pub mod db;
pub mod models;
pub mod planner;
pub mod predicate;
pub mod sql;
pub mod stats;

mod error;

pub use error::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;
