//! Public API surface for the backend.
//!
//! This file consolidates the identifier newtypes and re-exports the DTO
//! types for the HTTP API. All types derive Serialize/Deserialize for JSON
//! serialization.

pub use crate::routes::attendance::AttendanceDetailRow;
pub use crate::routes::attendance::DaySheet;
pub use crate::routes::attendance::DaySheetRow;
pub use crate::routes::birthdays::BirthdayBoard;
pub use crate::routes::birthdays::BirthdayProjection;
pub use crate::routes::birthdays::BirthdayStudent;
pub use crate::routes::calendar::GroupDaySummary;
pub use crate::routes::history::DaySummary;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new(value: Uuid) -> Self {
                $name(value)
            }

            /// Generate a fresh random identifier.
            pub fn generate() -> Self {
                $name(Uuid::new_v4())
            }

            pub fn value(&self) -> Uuid {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

uuid_id!(
    /// Teacher identifier (tenant key; every query is scoped by it).
    TeacherId
);
uuid_id!(
    /// Group identifier.
    GroupId
);
uuid_id!(
    /// Student identifier.
    StudentId
);
uuid_id!(
    /// Attendance entry identifier.
    EntryId
);
uuid_id!(
    /// Opaque session bearer token.
    SessionToken
);

#[cfg(test)]
#[path = "api_tests.rs"]
mod api_tests;
