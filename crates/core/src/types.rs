/// Every primary key is a fixed-width decimal string, see [`crate::object_kind`].
pub type ObjectId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
