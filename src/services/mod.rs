//! Service layer for business logic and orchestration.
//!
//! This module contains the service layer that sits between the HTTP
//! handlers and the repository. Pure computations (aggregation, birthday
//! projection, CSV rendering) live next to the orchestration functions
//! that feed them from the repository.

pub mod aggregator;

pub mod attendance;

pub mod auth;

pub mod birthdays;

pub mod csv_export;

pub mod password;

pub use aggregator::{summarize_by_date, summarize_by_date_and_group};
pub use attendance::{calendar, day_detail, day_sheet, history, record_day, DayMark};
pub use auth::{current_teacher, login, logout, register, AuthError, RegisterInput};
pub use birthdays::{upcoming_birthdays, upcoming_for_teacher, DEFAULT_HORIZON_DAYS};
pub use csv_export::{export_csv, export_group_csv};
