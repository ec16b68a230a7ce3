use std::fmt;

/// Error type for database operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseError {
    /// The collection name has no registered factory.
    CollectionNotFound { collection: String },
    /// The collection is registered but holds no records.
    EmptyCollection { collection: String },
    /// Supplied field data is missing, empty, or not a mapping.
    InvalidRecord(String),
    /// Serialization/deserialization error at the typed-data boundary.
    Serde(String),
    /// Internal storage failure (poisoned lock, dropped database).
    Storage(String),
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseError::CollectionNotFound { collection } => {
                write!(f, "collection {} not found (no factory registered)", collection)
            }
            DatabaseError::EmptyCollection { collection } => {
                write!(f, "collection {} has no records", collection)
            }
            DatabaseError::InvalidRecord(reason) => {
                write!(f, "invalid record data: {}", reason)
            }
            DatabaseError::Serde(reason) => write!(f, "serialization error: {}", reason),
            DatabaseError::Storage(reason) => write!(f, "storage error: {}", reason),
        }
    }
}

impl std::error::Error for DatabaseError {}
