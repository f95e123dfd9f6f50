//! Error types for the record service and stores.
//!
//! [`ServiceError`] is the taxonomy every operation reports: bad input,
//! missing record, uniqueness conflict, or a store failure. Stores report
//! [`StoreError`], which the service folds into [`ServiceError`].

use fieldwatch_types::RecordKind;

/// Human-readable validation failures for a single submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations(Vec<String>);

impl Violations {
    /// Create an empty violation list.
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// A list holding exactly one message.
    pub fn single(message: impl Into<String>) -> Self {
        Self(vec![message.into()])
    }

    /// Append a message.
    pub fn push(&mut self, message: impl Into<String>) {
        self.0.push(message.into());
    }

    /// Whether no violation was recorded.
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the messages in the order they were recorded.
    pub fn messages(&self) -> &[String] {
        &self.0
    }

    /// Consume the list into its messages.
    pub fn into_messages(self) -> Vec<String> {
        self.0
    }
}

impl core::fmt::Display for Violations {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0.join("; "))
    }
}

/// Errors reported by a record store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A write collided with an existing unique key.
    #[error("duplicate key: {0}")]
    Duplicate(String),

    /// Any other persistence failure (connectivity, timeout, bad row).
    #[error("store failure: {0}")]
    Backend(String),
}

/// Errors returned by [`RecordService`](crate::service::RecordService) operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// A required field is missing or a value is outside its vocabulary.
    #[error("invalid input: {0}")]
    InvalidInput(Violations),

    /// The identifier does not resolve to a record of this kind.
    #[error("{}", .0.not_found_message())]
    NotFound(RecordKind),

    /// The store refused the write because of a uniqueness conflict.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// The store failed; not retried.
    #[error("store failure: {0}")]
    Store(String),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(key) => Self::DuplicateKey(key),
            StoreError::Backend(message) => Self::Store(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_onto_service_taxonomy() {
        assert_eq!(
            ServiceError::from(StoreError::Duplicate("_id".to_owned())),
            ServiceError::DuplicateKey("_id".to_owned())
        );
        assert_eq!(
            ServiceError::from(StoreError::Backend("timeout".to_owned())),
            ServiceError::Store("timeout".to_owned())
        );
    }

    #[test]
    fn not_found_uses_kind_message() {
        let err = ServiceError::NotFound(RecordKind::Animal);
        assert_eq!(err.to_string(), "Animal observation not found");
    }

    #[test]
    fn violations_display_joined() {
        let mut v = Violations::single("a");
        v.push("b");
        assert_eq!(v.to_string(), "a; b");
        assert_eq!(v.messages().len(), 2);
    }
}
