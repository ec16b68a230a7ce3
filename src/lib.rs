mod collection;
mod database;
mod error;
mod factory;
mod faker;
mod query;
mod record;

pub use database::Database;
pub use error::DatabaseError;
pub use factory::Fields;
pub use faker::Faker;
pub use query::Matcher;
pub use record::Record;

// Re-export the JSON value type records are built from, so callers don't
// need a separate serde_json version to construct patterns and fields.
pub use serde_json::Value;
