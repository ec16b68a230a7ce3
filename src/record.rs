//! Record handles: shared, live views into collection storage.
//!
//! A [`Record`] is a handle, not a copy. The store and every caller that
//! obtained the record through a read share one underlying instance, so an
//! in-place field mutation is immediately visible to all holders. `save`
//! and `delete` forward to the owning database through a weak
//! back-reference; the persistence logic itself lives store-side.

use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::database::Shared;
use crate::error::DatabaseError;
use crate::factory::Fields;

struct RecordInner {
    collection: String,
    id: u64,
    fields: RwLock<Fields>,
}

/// A handle to one record: an identity, shared mutable field data, and the
/// persistence operations bound to the owning collection.
#[derive(Clone)]
pub struct Record {
    inner: Arc<RecordInner>,
    database: Weak<Shared>,
}

impl Record {
    pub(crate) fn new(
        collection: impl Into<String>,
        id: u64,
        fields: Fields,
        database: Weak<Shared>,
    ) -> Self {
        Record {
            inner: Arc::new(RecordInner {
                collection: collection.into(),
                id,
                fields: RwLock::new(fields),
            }),
            database,
        }
    }

    /// The identity assigned at decoration time. Unique within the owning
    /// collection, never reassigned.
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// The name of the owning collection.
    pub fn collection(&self) -> &str {
        &self.inner.collection
    }

    // Field data is a plain map; a writer that panicked mid-insert cannot
    // leave it incoherent, so poisoned locks are recovered rather than
    // surfaced.
    fn read_fields(&self) -> RwLockReadGuard<'_, Fields> {
        self.inner.fields.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_fields(&self) -> RwLockWriteGuard<'_, Fields> {
        self.inner.fields.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Current value of a top-level field, if present.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.read_fields().get(key).cloned()
    }

    /// Set a top-level field in place. The change is visible to every
    /// holder of this record immediately, before any `save`.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.write_fields().insert(key.into(), value.into());
    }

    /// Snapshot of the current field data, without the identity.
    pub fn fields(&self) -> Fields {
        self.read_fields().clone()
    }

    /// The record as a plain JSON object: `id` plus the current fields.
    /// This is the wire shape; the bound operations never serialize.
    pub fn to_value(&self) -> Value {
        let fields = self.read_fields();
        let mut map = Fields::with_capacity(fields.len() + 1);
        map.insert("id".to_string(), Value::from(self.inner.id));
        for (key, value) in fields.iter() {
            map.insert(key.clone(), value.clone());
        }
        Value::Object(map)
    }

    /// Deserialize the record (id included) into a typed value.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, DatabaseError> {
        serde_json::from_value(self.to_value()).map_err(|e| DatabaseError::Serde(e.to_string()))
    }

    /// Whether two handles refer to the same underlying instance (as
    /// opposed to merely equal data).
    pub fn ptr_eq(&self, other: &Record) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn database(&self) -> Result<Arc<Shared>, DatabaseError> {
        self.database
            .upgrade()
            .ok_or_else(|| DatabaseError::Storage("owning database has been dropped".into()))
    }

    /// Write this record back into the slot of its owning collection
    /// holding its id, inserting it when the id is absent. For a record
    /// obtained from a read this is a no-op, since the slot already holds
    /// this instance; for a detached record it merges the record into the
    /// store. Returns the record now resident at that id.
    pub fn save(&self) -> Result<Record, DatabaseError> {
        self.database()?.save_record(self)
    }

    /// Remove this record from its owning collection. Returns `true` if a
    /// record with this id was resident.
    pub fn delete(&self) -> Result<bool, DatabaseError> {
        self.database()?.remove_record(self.collection(), self.id())
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        self.inner.collection == other.inner.collection
            && self.inner.id == other.inner.id
            && *self.read_fields() == *other.read_fields()
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("collection", &self.inner.collection)
            .field("id", &self.inner.id)
            .field("fields", &*self.read_fields())
            .finish()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}
