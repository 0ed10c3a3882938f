//! Postgres repository implementation using Diesel.
//!
//! This module implements the repository traits against a Postgres
//! database. The attendance day replacement runs in a single transaction,
//! so a failed save never leaves a partially-written day behind.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry for transient failures
//! - Connection health monitoring
//! - Automatic migration execution
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//! - `PG_MAX_RETRIES`: Maximum retry attempts for transient failures (default: 3)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::task;
use uuid::Uuid;

use crate::api::{EntryId, GroupId, SessionToken, StudentId, TeacherId};
use crate::db::models::NewAttendanceEntry;
use crate::db::repository::{
    AttendanceRepository, ErrorContext, GroupRepository, RepositoryError, RepositoryResult,
    SessionRepository, StudentRepository, TeacherRepository,
};
use crate::models::{AttendanceEntry, Group, GroupUpdate, NewStudent, Session, Student, Teacher};
use crate::routes::birthdays::BirthdayStudent;

mod models;
mod schema;

use models::*;
use schema::*;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let parse = |name: &str, default: u64| {
            std::env::var(name)
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(default)
        };

        Ok(Self {
            database_url,
            max_pool_size: parse("PG_POOL_MAX", 10) as u32,
            min_pool_size: parse("PG_POOL_MIN", 1) as u32,
            connection_timeout_sec: parse("PG_CONN_TIMEOUT_SEC", 30),
            idle_timeout_sec: parse("PG_IDLE_TIMEOUT_SEC", 600),
            max_retries: parse("PG_MAX_RETRIES", 3) as u32,
            retry_delay_ms: parse("PG_RETRY_DELAY_MS", 100),
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Pool health statistics.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    /// Number of connections currently in use
    pub connections_in_use: u32,
    /// Number of idle connections
    pub idle_connections: u32,
    /// Total number of connections in the pool
    pub total_connections: u32,
    /// Maximum pool size
    pub max_size: u32,
    /// Total successful queries executed
    pub total_queries: u64,
    /// Total failed queries
    pub failed_queries: u64,
    /// Total retried operations
    pub retried_operations: u64,
}

/// Diesel-backed repository for Postgres.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
    // Metrics counters
    total_queries: std::sync::Arc<AtomicU64>,
    failed_queries: std::sync::Arc<AtomicU64>,
    retried_operations: std::sync::Arc<AtomicU64>,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true) // Validate connections before use
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        // Run migrations once during initialization
        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        Ok(Self {
            pool,
            config,
            total_queries: std::sync::Arc::new(AtomicU64::new(0)),
            failed_queries: std::sync::Arc::new(AtomicU64::new(0)),
            retried_operations: std::sync::Arc::new(AtomicU64::new(0)),
        })
    }

    /// Run pending database migrations.
    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;

        Ok(())
    }

    /// Execute a database operation with automatic retry for transient failures.
    ///
    /// Retries up to `max_retries` times when a retryable error occurs
    /// (connection errors, timeouts, serialization failures).
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;
        let total_queries = self.total_queries.clone();
        let failed_queries = self.failed_queries.clone();
        let retried_operations = self.retried_operations.clone();

        task::spawn_blocking(move || {
            let mut last_error = None;
            let mut retry_delay = Duration::from_millis(retry_delay_ms);

            for attempt in 0..=max_retries {
                if attempt > 0 {
                    retried_operations.fetch_add(1, Ordering::Relaxed);
                    std::thread::sleep(retry_delay);
                    retry_delay *= 2; // Exponential backoff
                }

                let mut conn = match pool.get() {
                    Ok(c) => c,
                    Err(e) => {
                        let err = RepositoryError::connection_with_context(
                            e.to_string(),
                            ErrorContext::new("get_connection")
                                .with_details(format!("attempt={}", attempt + 1))
                                .retryable(),
                        );
                        if attempt < max_retries {
                            last_error = Some(err);
                            continue;
                        }
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(err);
                    }
                };

                total_queries.fetch_add(1, Ordering::Relaxed);
                match f.clone()(&mut conn) {
                    Ok(result) => return Ok(result),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        last_error = Some(e);
                        continue;
                    }
                    Err(e) => {
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(e);
                    }
                }
            }

            failed_queries.fetch_add(1, Ordering::Relaxed);
            Err(last_error.unwrap_or_else(|| {
                RepositoryError::internal("Max retries exceeded with no error captured")
            }))
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }

    /// Get pool health statistics.
    pub fn get_pool_stats(&self) -> PoolStats {
        let state = self.pool.state();
        PoolStats {
            connections_in_use: state.connections - state.idle_connections,
            idle_connections: state.idle_connections,
            total_connections: state.connections,
            max_size: self.config.max_pool_size,
            total_queries: self.total_queries.load(Ordering::Relaxed),
            failed_queries: self.failed_queries.load(Ordering::Relaxed),
            retried_operations: self.retried_operations.load(Ordering::Relaxed),
        }
    }

    /// Check if the database connection is healthy.
    pub async fn is_healthy(&self) -> bool {
        self.health_check().await.unwrap_or(false)
    }
}

fn map_diesel_error(err: diesel::result::Error) -> RepositoryError {
    RepositoryError::from(err)
}

fn group_not_found(id: Uuid) -> RepositoryError {
    RepositoryError::not_found_with_context(
        "group not found",
        ErrorContext::default().with_entity("group").with_entity_id(id),
    )
}

/// Resolve a group scoped to its owner; foreign groups read as missing.
fn owned_group(conn: &mut PgConnection, teacher: Uuid, group: Uuid) -> RepositoryResult<GroupRow> {
    groups::table
        .filter(groups::id.eq(group))
        .filter(groups::teacher_id.eq(teacher))
        .select(GroupRow::as_select())
        .first::<GroupRow>(conn)
        .optional()
        .map_err(map_diesel_error)?
        .ok_or_else(|| group_not_found(group))
}

#[async_trait]
impl TeacherRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn create_teacher(&self, teacher: &Teacher) -> RepositoryResult<()> {
        let row = TeacherRow::from(teacher);
        self.with_conn(move |conn| {
            diesel::insert_into(teachers::table)
                .values(&row)
                .execute(conn)
                .map_err(|e| match &e {
                    diesel::result::Error::DatabaseError(
                        diesel::result::DatabaseErrorKind::UniqueViolation,
                        _,
                    ) => RepositoryError::validation_with_context(
                        "email already registered",
                        ErrorContext::new("create_teacher").with_entity("teacher"),
                    ),
                    _ => map_diesel_error(e),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_teacher_by_email(&self, email: &str) -> RepositoryResult<Option<Teacher>> {
        let email = email.to_lowercase();
        self.with_conn(move |conn| {
            teachers::table
                .filter(teachers::email.eq(&email))
                .select(TeacherRow::as_select())
                .first::<TeacherRow>(conn)
                .optional()
                .map_err(map_diesel_error)
                .map(|row| row.map(Teacher::from))
        })
        .await
    }

    async fn get_teacher(&self, id: TeacherId) -> RepositoryResult<Teacher> {
        self.with_conn(move |conn| {
            teachers::table
                .filter(teachers::id.eq(id.value()))
                .select(TeacherRow::as_select())
                .first::<TeacherRow>(conn)
                .optional()
                .map_err(map_diesel_error)?
                .map(Teacher::from)
                .ok_or_else(|| {
                    RepositoryError::not_found_with_context(
                        "teacher not found",
                        ErrorContext::default()
                            .with_entity("teacher")
                            .with_entity_id(id),
                    )
                })
        })
        .await
    }
}

#[async_trait]
impl SessionRepository for PostgresRepository {
    async fn insert_session(&self, session: &Session) -> RepositoryResult<()> {
        let row = SessionRow::from(session);
        self.with_conn(move |conn| {
            diesel::insert_into(sessions::table)
                .values(&row)
                .execute(conn)
                .map_err(map_diesel_error)?;
            Ok(())
        })
        .await
    }

    async fn find_session(&self, token: SessionToken) -> RepositoryResult<Option<Session>> {
        self.with_conn(move |conn| {
            sessions::table
                .filter(sessions::token.eq(token.value()))
                .select(SessionRow::as_select())
                .first::<SessionRow>(conn)
                .optional()
                .map_err(map_diesel_error)
                .map(|row| row.map(Session::from))
        })
        .await
    }

    async fn delete_session(&self, token: SessionToken) -> RepositoryResult<bool> {
        self.with_conn(move |conn| {
            let deleted =
                diesel::delete(sessions::table.filter(sessions::token.eq(token.value())))
                    .execute(conn)
                    .map_err(map_diesel_error)?;
            Ok(deleted > 0)
        })
        .await
    }
}

#[async_trait]
impl GroupRepository for PostgresRepository {
    async fn create_group(&self, group: &Group) -> RepositoryResult<()> {
        let row = GroupRow::from(group);
        self.with_conn(move |conn| {
            diesel::insert_into(groups::table)
                .values(&row)
                .execute(conn)
                .map_err(map_diesel_error)?;
            Ok(())
        })
        .await
    }

    async fn list_groups(&self, teacher: TeacherId) -> RepositoryResult<Vec<Group>> {
        self.with_conn(move |conn| {
            groups::table
                .filter(groups::teacher_id.eq(teacher.value()))
                .order(groups::name.asc())
                .select(GroupRow::as_select())
                .load::<GroupRow>(conn)
                .map_err(map_diesel_error)
                .map(|rows| rows.into_iter().map(Group::from).collect())
        })
        .await
    }

    async fn get_group(&self, teacher: TeacherId, id: GroupId) -> RepositoryResult<Group> {
        self.with_conn(move |conn| {
            owned_group(conn, teacher.value(), id.value()).map(Group::from)
        })
        .await
    }

    async fn update_group(
        &self,
        teacher: TeacherId,
        id: GroupId,
        update: GroupUpdate,
    ) -> RepositoryResult<Group> {
        self.with_conn(move |conn| {
            diesel::update(
                groups::table
                    .filter(groups::id.eq(id.value()))
                    .filter(groups::teacher_id.eq(teacher.value())),
            )
            .set((
                groups::name.eq(update.name.clone()),
                groups::place.eq(update.place.clone()),
                groups::schedule_date.eq(update.schedule_date),
                groups::schedule_time.eq(update.schedule_time),
                groups::description.eq(update.description.clone()),
            ))
            .returning(GroupRow::as_returning())
            .get_result::<GroupRow>(conn)
            .optional()
            .map_err(map_diesel_error)?
            .map(Group::from)
            .ok_or_else(|| group_not_found(id.value()))
        })
        .await
    }

    async fn delete_group(&self, teacher: TeacherId, id: GroupId) -> RepositoryResult<()> {
        self.with_conn(move |conn| {
            // Students and attendance entries go with the group (ON DELETE CASCADE).
            let deleted = diesel::delete(
                groups::table
                    .filter(groups::id.eq(id.value()))
                    .filter(groups::teacher_id.eq(teacher.value())),
            )
            .execute(conn)
            .map_err(map_diesel_error)?;
            if deleted == 0 {
                return Err(group_not_found(id.value()));
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl StudentRepository for PostgresRepository {
    async fn add_student(
        &self,
        teacher: TeacherId,
        group: GroupId,
        student: NewStudent,
    ) -> RepositoryResult<Student> {
        self.with_conn(move |conn| {
            owned_group(conn, teacher.value(), group.value())?;
            let student = Student::new(group, student.clone());
            diesel::insert_into(students::table)
                .values(StudentRow::from(&student))
                .execute(conn)
                .map_err(map_diesel_error)?;
            Ok(student)
        })
        .await
    }

    async fn list_students(
        &self,
        teacher: TeacherId,
        group: GroupId,
    ) -> RepositoryResult<Vec<Student>> {
        self.with_conn(move |conn| {
            owned_group(conn, teacher.value(), group.value())?;
            students::table
                .filter(students::group_id.eq(group.value()))
                .order(students::full_name.asc())
                .select(StudentRow::as_select())
                .load::<StudentRow>(conn)
                .map_err(map_diesel_error)
                .map(|rows| rows.into_iter().map(Student::from).collect())
        })
        .await
    }

    async fn list_birthday_students(
        &self,
        teacher: TeacherId,
    ) -> RepositoryResult<Vec<BirthdayStudent>> {
        self.with_conn(move |conn| {
            let rows: Vec<(Uuid, String, Option<NaiveDate>, Uuid, String)> = students::table
                .inner_join(groups::table)
                .filter(groups::teacher_id.eq(teacher.value()))
                .filter(students::birth_date.is_not_null())
                .order(students::full_name.asc())
                .select((
                    students::id,
                    students::full_name,
                    students::birth_date,
                    groups::id,
                    groups::name,
                ))
                .load(conn)
                .map_err(map_diesel_error)?;

            Ok(rows
                .into_iter()
                .filter_map(|(id, full_name, birth_date, group_id, group_name)| {
                    Some(BirthdayStudent {
                        id: StudentId::new(id),
                        full_name,
                        birth_date: birth_date?,
                        group_id: GroupId::new(group_id),
                        group_name,
                    })
                })
                .collect())
        })
        .await
    }

    async fn delete_student(
        &self,
        teacher: TeacherId,
        group: GroupId,
        id: StudentId,
    ) -> RepositoryResult<()> {
        self.with_conn(move |conn| {
            owned_group(conn, teacher.value(), group.value())?;
            // Attendance entries go with the student (ON DELETE CASCADE).
            let deleted = diesel::delete(
                students::table
                    .filter(students::id.eq(id.value()))
                    .filter(students::group_id.eq(group.value())),
            )
            .execute(conn)
            .map_err(map_diesel_error)?;
            if deleted == 0 {
                return Err(RepositoryError::not_found_with_context(
                    "student not found",
                    ErrorContext::default()
                        .with_entity("student")
                        .with_entity_id(id),
                ));
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl AttendanceRepository for PostgresRepository {
    async fn replace_day(
        &self,
        teacher: TeacherId,
        group: GroupId,
        date: NaiveDate,
        entries: Vec<NewAttendanceEntry>,
    ) -> RepositoryResult<usize> {
        self.with_conn(move |conn| {
            conn.transaction::<_, RepositoryError, _>(|tx| {
                owned_group(tx, teacher.value(), group.value())?;

                let ids: Vec<Uuid> = entries.iter().map(|e| e.student_id.value()).collect();
                let known: i64 = students::table
                    .filter(students::group_id.eq(group.value()))
                    .filter(students::id.eq_any(&ids))
                    .count()
                    .get_result(tx)
                    .map_err(map_diesel_error)?;
                if known as usize != ids.len() {
                    return Err(RepositoryError::validation_with_context(
                        "day replacement references unknown or duplicate students",
                        ErrorContext::new("replace_day").with_entity("attendance"),
                    ));
                }

                diesel::delete(
                    attendance::table
                        .filter(attendance::group_id.eq(group.value()))
                        .filter(attendance::date.eq(date)),
                )
                .execute(tx)
                .map_err(map_diesel_error)?;

                let now = chrono::Utc::now();
                let rows: Vec<AttendanceRow> = entries
                    .iter()
                    .map(|e| AttendanceRow {
                        id: EntryId::generate().value(),
                        student_id: e.student_id.value(),
                        group_id: group.value(),
                        date,
                        present: e.present,
                        notes: e.notes.clone(),
                        recorded_by: e.recorded_by.value(),
                        created_at: now,
                    })
                    .collect();

                if !rows.is_empty() {
                    diesel::insert_into(attendance::table)
                        .values(&rows)
                        .execute(tx)
                        .map_err(map_diesel_error)?;
                }

                Ok(rows.len())
            })
        })
        .await
    }

    async fn fetch_day(
        &self,
        teacher: TeacherId,
        group: GroupId,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<AttendanceEntry>> {
        self.with_conn(move |conn| {
            owned_group(conn, teacher.value(), group.value())?;
            attendance::table
                .filter(attendance::group_id.eq(group.value()))
                .filter(attendance::date.eq(date))
                .select(AttendanceRow::as_select())
                .load::<AttendanceRow>(conn)
                .map_err(map_diesel_error)
                .map(|rows| rows.into_iter().map(AttendanceEntry::from).collect())
        })
        .await
    }

    async fn fetch_group_entries(
        &self,
        teacher: TeacherId,
        group: GroupId,
    ) -> RepositoryResult<Vec<AttendanceEntry>> {
        self.with_conn(move |conn| {
            owned_group(conn, teacher.value(), group.value())?;
            attendance::table
                .filter(attendance::group_id.eq(group.value()))
                .select(AttendanceRow::as_select())
                .load::<AttendanceRow>(conn)
                .map_err(map_diesel_error)
                .map(|rows| rows.into_iter().map(AttendanceEntry::from).collect())
        })
        .await
    }

    async fn fetch_range(
        &self,
        teacher: TeacherId,
        group: Option<GroupId>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepositoryResult<Vec<AttendanceEntry>> {
        self.with_conn(move |conn| {
            if let Some(group) = group {
                owned_group(conn, teacher.value(), group.value())?;
            }

            let mut query = attendance::table
                .inner_join(groups::table)
                .filter(groups::teacher_id.eq(teacher.value()))
                .filter(attendance::date.ge(from))
                .filter(attendance::date.le(to))
                .select(AttendanceRow::as_select())
                .into_boxed();
            if let Some(group) = group {
                query = query.filter(attendance::group_id.eq(group.value()));
            }

            query
                .load::<AttendanceRow>(conn)
                .map_err(map_diesel_error)
                .map(|rows| rows.into_iter().map(AttendanceEntry::from).collect())
        })
        .await
    }
}
