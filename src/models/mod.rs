//! Domain entities shared across the service and storage layers.
//!
//! All entities are value snapshots: each operation reads or writes a
//! complete copy, there is no in-process identity map or change tracking.

mod entities;

pub use entities::{
    AttendanceEntry, Group, GroupUpdate, NewGroup, NewStudent, Session, Student, Teacher,
};
