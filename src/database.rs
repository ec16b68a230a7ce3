//! The database facade: registration, creation, querying, persistence.
//!
//! Each [`Database`] owns independent state; there is no global singleton.
//! Cloning a handle shares the same underlying store, so a fake-backend
//! handler and the test driving it can hold one database between them.
//!
//! ## Example
//!
//! ```
//! use fixturedb::Database;
//! use serde_json::json;
//!
//! let db = Database::new();
//! db.register("user", |faker| json!({
//!     "firstName": faker.first_name(),
//!     "address": { "streetName": faker.street_name() },
//! })).unwrap();
//! db.create("user", 5).unwrap();
//!
//! assert_eq!(db.all("user").unwrap().len(), 5);
//! let rick = db.push("user", json!({ "name": "Rick" })).unwrap();
//! assert_eq!(db.find_one("user", json!({ "name": "Rick" })).unwrap(), Some(rick));
//! ```

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::collection::Collection;
use crate::error::DatabaseError;
use crate::factory::{Factory, Fields};
use crate::faker::Faker;
use crate::query::Matcher;
use crate::record::Record;

/// State shared by every clone of a [`Database`] and weakly referenced by
/// the records it hands out.
pub(crate) struct Shared {
    collections: RwLock<HashMap<String, Collection>>,
    faker: Faker,
}

impl Shared {
    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, Collection>>, DatabaseError> {
        self.collections
            .read()
            .map_err(|_| DatabaseError::Storage("collections lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, Collection>>, DatabaseError> {
        self.collections
            .write()
            .map_err(|_| DatabaseError::Storage("collections lock poisoned".into()))
    }

    /// Store-level persistence: upsert `record` into the slot of its
    /// owning collection holding its id. Record handles forward here.
    pub(crate) fn save_record(&self, record: &Record) -> Result<Record, DatabaseError> {
        let mut collections = self.write()?;
        let collection = collections
            .get_mut(record.collection())
            .ok_or_else(|| not_found(record.collection()))?;
        debug!("saving record {} in {}", record.id(), record.collection());
        Ok(collection.upsert(record.clone()))
    }

    pub(crate) fn remove_record(&self, name: &str, id: u64) -> Result<bool, DatabaseError> {
        let mut collections = self.write()?;
        let collection = collections.get_mut(name).ok_or_else(|| not_found(name))?;
        debug!("removing record {} from {}", id, name);
        Ok(collection.remove(id))
    }
}

fn not_found(name: &str) -> DatabaseError {
    DatabaseError::CollectionNotFound {
        collection: name.to_string(),
    }
}

/// Validate raw field data: it must be a non-empty mapping. Decoration
/// owns identity, so a caller-supplied `id` key never survives.
fn into_fields(raw: Value) -> Result<Fields, DatabaseError> {
    let mut fields = match raw {
        Value::Object(fields) if !fields.is_empty() => fields,
        Value::Object(_) => return Err(DatabaseError::InvalidRecord("field data is empty".into())),
        _ => return Err(DatabaseError::InvalidRecord("field data must be a mapping".into())),
    };
    fields.remove("id");
    Ok(fields)
}

/// In-memory fixture database.
///
/// Collections come into existence only through [`register`]; every other
/// operation on an unknown name fails with
/// [`DatabaseError::CollectionNotFound`]. Records handed out by reads are
/// live views into the store, not copies.
///
/// [`register`]: Database::register
#[derive(Clone)]
pub struct Database {
    shared: Arc<Shared>,
}

impl Database {
    /// An empty database with an entropy-seeded value generator.
    pub fn new() -> Self {
        Self::with_faker(Faker::new())
    }

    /// An empty database whose value generator is seeded, for
    /// reproducible fixtures.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_faker(Faker::seeded(seed))
    }

    fn with_faker(faker: Faker) -> Self {
        Database {
            shared: Arc::new(Shared {
                collections: RwLock::new(HashMap::new()),
                faker,
            }),
        }
    }

    /// Register `factory` under `name`, creating the collection (empty
    /// store, counter at 0) if it does not exist. Re-registering replaces
    /// only the factory and resets nothing else.
    pub fn register(
        &self,
        name: impl Into<String>,
        factory: impl Fn(&Faker) -> Value + Send + Sync + 'static,
    ) -> Result<(), DatabaseError> {
        let name = name.into();
        let factory = Factory::new(factory);
        let mut collections = self.shared.write()?;
        match collections.entry(name) {
            Entry::Occupied(mut occupied) => {
                debug!("replacing factory for {}", occupied.key());
                occupied.get_mut().set_factory(factory);
            }
            Entry::Vacant(vacant) => {
                debug!("registering collection {}", vacant.key());
                vacant.insert(Collection::new(factory));
            }
        }
        Ok(())
    }

    /// Invoke the registered factory `count` times and append the
    /// decorated results in generation order. Cumulative with existing
    /// records. Nothing is stored (and no id is minted) if any factory
    /// output fails validation.
    pub fn create(&self, name: &str, count: usize) -> Result<(), DatabaseError> {
        let mut collections = self.shared.write()?;
        let collection = collections.get_mut(name).ok_or_else(|| not_found(name))?;
        debug!("creating {} records in {}", count, name);
        let mut generated = Vec::with_capacity(count);
        for _ in 0..count {
            let raw = collection.factory().produce(&self.shared.faker);
            generated.push(into_fields(raw)?);
        }
        for fields in generated {
            let id = collection.mint_id();
            let record = Record::new(name, id, fields, Arc::downgrade(&self.shared));
            collection.push(record);
        }
        Ok(())
    }

    /// Decorate caller-supplied field data (bypassing the factory) and
    /// append it. Returns the stored record.
    pub fn push(&self, name: &str, fields: impl Serialize) -> Result<Record, DatabaseError> {
        let mut collections = self.shared.write()?;
        let collection = collections.get_mut(name).ok_or_else(|| not_found(name))?;
        let raw = serde_json::to_value(fields).map_err(|e| DatabaseError::Serde(e.to_string()))?;
        let fields = into_fields(raw)?;
        let id = collection.mint_id();
        let record = Record::new(name, id, fields, Arc::downgrade(&self.shared));
        collection.push(record.clone());
        debug!("pushed record {} into {}", record.id(), name);
        Ok(record)
    }

    /// Attach an identity and the bound persistence operations to raw
    /// field data without inserting it: the result is a detached record,
    /// merged into the store only by a later [`Record::save`]. The
    /// identity counter advances.
    pub fn decorate_record(
        &self,
        name: &str,
        fields: impl Serialize,
    ) -> Result<Record, DatabaseError> {
        let mut collections = self.shared.write()?;
        let collection = collections.get_mut(name).ok_or_else(|| not_found(name))?;
        let raw = serde_json::to_value(fields).map_err(|e| DatabaseError::Serde(e.to_string()))?;
        let fields = into_fields(raw)?;
        let id = collection.mint_id();
        Ok(Record::new(name, id, fields, Arc::downgrade(&self.shared)))
    }

    /// Every record of the collection, in insertion order.
    pub fn all(&self, name: &str) -> Result<Vec<Record>, DatabaseError> {
        let collections = self.shared.read()?;
        let collection = collections.get(name).ok_or_else(|| not_found(name))?;
        Ok(collection.records().to_vec())
    }

    /// All records matching `matcher`, in insertion order. The matcher is
    /// either a nested partial pattern (`serde_json::Value`) or a
    /// predicate built with [`Matcher::predicate`].
    pub fn find(
        &self,
        name: &str,
        matcher: impl Into<Matcher>,
    ) -> Result<Vec<Record>, DatabaseError> {
        let matcher = matcher.into();
        let collections = self.shared.read()?;
        let collection = collections.get(name).ok_or_else(|| not_found(name))?;
        Ok(collection
            .records()
            .iter()
            .filter(|record| matcher.matches(record))
            .cloned()
            .collect())
    }

    /// The first record matching `matcher` in insertion order, or
    /// `Ok(None)` when nothing matches.
    pub fn find_one(
        &self,
        name: &str,
        matcher: impl Into<Matcher>,
    ) -> Result<Option<Record>, DatabaseError> {
        let matcher = matcher.into();
        let collections = self.shared.read()?;
        let collection = collections.get(name).ok_or_else(|| not_found(name))?;
        Ok(collection
            .records()
            .iter()
            .find(|record| matcher.matches(record))
            .cloned())
    }

    /// The record at ordinal position 0. Fails with
    /// [`DatabaseError::EmptyCollection`] when the collection is
    /// registered but empty.
    pub fn first(&self, name: &str) -> Result<Record, DatabaseError> {
        let collections = self.shared.read()?;
        let collection = collections.get(name).ok_or_else(|| not_found(name))?;
        collection.first().cloned().ok_or_else(|| DatabaseError::EmptyCollection {
            collection: name.to_string(),
        })
    }

    /// The record at the last ordinal position. Same failure modes as
    /// [`first`](Database::first).
    pub fn last(&self, name: &str) -> Result<Record, DatabaseError> {
        let collections = self.shared.read()?;
        let collection = collections.get(name).ok_or_else(|| not_found(name))?;
        collection.last().cloned().ok_or_else(|| DatabaseError::EmptyCollection {
            collection: name.to_string(),
        })
    }

    /// Return the next unused id for the collection and advance its
    /// counter. Counters are independent per collection; the first call
    /// for a fresh collection returns 0.
    pub fn uuid(&self, name: &str) -> Result<u64, DatabaseError> {
        let mut collections = self.shared.write()?;
        let collection = collections.get_mut(name).ok_or_else(|| not_found(name))?;
        Ok(collection.mint_id())
    }

    /// Store-level persistence of a record into its owning collection;
    /// equivalent to [`Record::save`]. See the record method for the
    /// upsert semantics.
    pub fn save(&self, record: &Record) -> Result<Record, DatabaseError> {
        self.shared.save_record(record)
    }

    /// Remove the record with `id` from the collection. Returns `true` if
    /// it existed. Its id is not reissued.
    pub fn remove(&self, name: &str, id: u64) -> Result<bool, DatabaseError> {
        self.shared.remove_record(name, id)
    }

    /// Discard all collections, counters, and factory registrations.
    /// Subsequent operations require re-registration.
    pub fn reset(&self) -> Result<(), DatabaseError> {
        let mut collections = self.shared.write()?;
        debug!("resetting database ({} collections)", collections.len());
        collections.clear();
        Ok(())
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}
