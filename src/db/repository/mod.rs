//! Repository trait definitions.
//!
//! These traits define the abstract storage interface for the attendance
//! domain. Implementations must be `Send + Sync` to work with async Rust.

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::api::{GroupId, SessionToken, StudentId, TeacherId};
use crate::db::models::NewAttendanceEntry;
use crate::models::{AttendanceEntry, Group, GroupUpdate, NewStudent, Session, Student, Teacher};
use crate::routes::birthdays::BirthdayStudent;

/// Repository trait for teacher accounts.
#[async_trait]
pub trait TeacherRepository: Send + Sync {
    /// Check that the backing store is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Persist a new teacher account.
    ///
    /// # Returns
    /// * `Err(RepositoryError::ValidationError)` if the email is taken
    async fn create_teacher(&self, teacher: &Teacher) -> RepositoryResult<()>;

    /// Look a teacher up by email (exact match).
    async fn find_teacher_by_email(&self, email: &str) -> RepositoryResult<Option<Teacher>>;

    /// Fetch a teacher by id.
    async fn get_teacher(&self, id: TeacherId) -> RepositoryResult<Teacher>;
}

/// Repository trait for session tokens.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persist a freshly issued session.
    async fn insert_session(&self, session: &Session) -> RepositoryResult<()>;

    /// Resolve a bearer token to its session, if still valid.
    async fn find_session(&self, token: SessionToken) -> RepositoryResult<Option<Session>>;

    /// Revoke a session.
    ///
    /// # Returns
    /// * `Ok(true)` if a session was revoked, `Ok(false)` if the token was unknown
    async fn delete_session(&self, token: SessionToken) -> RepositoryResult<bool>;
}

/// Repository trait for group management.
///
/// Every operation takes the acting teacher's id and treats groups owned
/// by other teachers as nonexistent.
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Persist a new group.
    async fn create_group(&self, group: &Group) -> RepositoryResult<()>;

    /// List the teacher's groups, ordered by name.
    async fn list_groups(&self, teacher: TeacherId) -> RepositoryResult<Vec<Group>>;

    /// Fetch one group.
    async fn get_group(&self, teacher: TeacherId, id: GroupId) -> RepositoryResult<Group>;

    /// Replace a group's editable fields.
    async fn update_group(
        &self,
        teacher: TeacherId,
        id: GroupId,
        update: GroupUpdate,
    ) -> RepositoryResult<Group>;

    /// Delete a group together with its students and attendance entries.
    async fn delete_group(&self, teacher: TeacherId, id: GroupId) -> RepositoryResult<()>;
}

/// Repository trait for student enrollment.
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Enroll a student in one of the teacher's groups.
    async fn add_student(
        &self,
        teacher: TeacherId,
        group: GroupId,
        student: NewStudent,
    ) -> RepositoryResult<Student>;

    /// List a group's students, ordered by full name.
    async fn list_students(&self, teacher: TeacherId, group: GroupId)
        -> RepositoryResult<Vec<Student>>;

    /// List all of the teacher's students that have a birth date recorded,
    /// joined with their group's name. Used by the birthday board.
    async fn list_birthday_students(
        &self,
        teacher: TeacherId,
    ) -> RepositoryResult<Vec<BirthdayStudent>>;

    /// Remove a student (and, through the entry lifecycle, their attendance).
    async fn delete_student(
        &self,
        teacher: TeacherId,
        group: GroupId,
        id: StudentId,
    ) -> RepositoryResult<()>;
}

/// Repository trait for attendance entries.
#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    /// Atomically replace the full entry set for `(group, date)`.
    ///
    /// The previous entries for the pair are removed and the given rows
    /// inserted as one unit: readers never observe a partially-saved day,
    /// and retrying with the same input is idempotent. Two overlapping
    /// replacements of the same pair remain last-writer-wins at day
    /// granularity.
    ///
    /// # Returns
    /// * `Ok(usize)` - number of entries written
    async fn replace_day(
        &self,
        teacher: TeacherId,
        group: GroupId,
        date: NaiveDate,
        entries: Vec<NewAttendanceEntry>,
    ) -> RepositoryResult<usize>;

    /// Fetch the saved entries for `(group, date)`.
    async fn fetch_day(
        &self,
        teacher: TeacherId,
        group: GroupId,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<AttendanceEntry>>;

    /// Fetch every entry of a group (for the history view).
    async fn fetch_group_entries(
        &self,
        teacher: TeacherId,
        group: GroupId,
    ) -> RepositoryResult<Vec<AttendanceEntry>>;

    /// Fetch the teacher's entries with `date` in `[from, to]`, optionally
    /// restricted to one group (calendar and export views).
    async fn fetch_range(
        &self,
        teacher: TeacherId,
        group: Option<GroupId>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepositoryResult<Vec<AttendanceEntry>>;
}

/// Umbrella trait for a complete storage backend.
pub trait FullRepository:
    TeacherRepository + SessionRepository + GroupRepository + StudentRepository + AttendanceRepository
{
}

impl<T> FullRepository for T where
    T: TeacherRepository
        + SessionRepository
        + GroupRepository
        + StudentRepository
        + AttendanceRepository
{
}
