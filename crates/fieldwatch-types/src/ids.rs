//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Records use UUID v7 (time-ordered) so that the primary key index also
//! follows creation order. Identifiers arriving in request paths are parsed
//! with [`RecordId::parse`]; anything that is not a UUID simply does not
//! resolve to a record.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Parse an identifier from its hyphenated string form.
            ///
            /// Returns `None` for anything that is not a UUID.
            pub fn parse(raw: &str) -> Option<Self> {
                raw.trim().parse::<Uuid>().ok().map(Self)
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier of a stored record of any kind.
    RecordId
}

define_id! {
    /// Weak reference to a user in the external identity store.
    ///
    /// Lookup only: deleting a user never touches the records that point
    /// at it.
    UserId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_hyphenated_uuid() {
        let id = RecordId::new();
        assert_eq!(RecordId::parse(&id.to_string()), Some(id));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(RecordId::parse("not-an-id"), None);
        assert_eq!(RecordId::parse(""), None);
        assert_eq!(RecordId::parse("65f1c0ffee0123456789abcd"), None);
    }

    #[test]
    fn ids_serialize_as_bare_strings() {
        let id = UserId::new();
        let json = serde_json::to_value(id).ok();
        assert_eq!(json, Some(serde_json::Value::String(id.to_string())));
    }
}
