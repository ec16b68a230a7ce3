use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::faker::Faker;

/// Field data for one record: an arbitrarily nested mapping of field name
/// to scalar, sequence, or nested mapping.
pub type Fields = Map<String, Value>;

/// A registered record generator for one collection.
///
/// Produces the raw field data for one new record, given the database's
/// value generator. Cloning a factory shares the underlying closure.
#[derive(Clone)]
pub struct Factory(Arc<dyn Fn(&Faker) -> Value + Send + Sync>);

impl Factory {
    /// Wrap a generator closure. The closure is invoked once per created
    /// record and is expected to return a non-empty JSON mapping.
    pub fn new(generator: impl Fn(&Faker) -> Value + Send + Sync + 'static) -> Self {
        Factory(Arc::new(generator))
    }

    pub(crate) fn produce(&self, faker: &Faker) -> Value {
        (self.0)(faker)
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Factory(..)")
    }
}
