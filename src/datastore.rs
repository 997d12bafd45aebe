//! Datastore adapter seam.
//!
//! To map domain objects to controller names, the application asks each
//! registered adapter what kind of record a value is. Adapters are
//! consulted in registration order; the first non-empty answer wins.

use serde_json::Value;

/// Reports the record kind of a domain value, if this adapter recognizes it.
pub trait DatastoreAdapter: Send + Sync {
    fn record_of(&self, value: &Value) -> Option<String>;
}

/// Fallback adapter registered last by convention.
///
/// Recognizes JSON objects carrying a `_type` string field and reports
/// its value as the record kind.
pub struct ObjectAdapter;

impl DatastoreAdapter for ObjectAdapter {
    fn record_of(&self, value: &Value) -> Option<String> {
        value
            .as_object()
            .and_then(|obj| obj.get("_type"))
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}
