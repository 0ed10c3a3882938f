//! In-memory repository implementation for unit testing and local development.
//!
//! All state lives in hash maps behind a single `parking_lot::RwLock`; a day
//! replacement therefore happens under one write lock and is atomic with
//! respect to every reader and writer, matching the contract of
//! [`AttendanceRepository::replace_day`].

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use parking_lot::RwLock;

use crate::api::{EntryId, GroupId, SessionToken, StudentId, TeacherId};
use crate::db::models::NewAttendanceEntry;
use crate::db::repository::{
    AttendanceRepository, ErrorContext, GroupRepository, RepositoryError, RepositoryResult,
    SessionRepository, StudentRepository, TeacherRepository,
};
use crate::models::{AttendanceEntry, Group, GroupUpdate, NewStudent, Session, Student, Teacher};
use crate::routes::birthdays::BirthdayStudent;

#[derive(Default)]
struct Store {
    teachers: HashMap<TeacherId, Teacher>,
    sessions: HashMap<SessionToken, Session>,
    groups: HashMap<GroupId, Group>,
    students: HashMap<StudentId, Student>,
    entries: HashMap<EntryId, AttendanceEntry>,
}

impl Store {
    /// Resolve a group, treating groups of other teachers as nonexistent.
    fn owned_group(&self, teacher: TeacherId, id: GroupId) -> RepositoryResult<&Group> {
        self.groups
            .get(&id)
            .filter(|g| g.teacher_id == teacher)
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    "group not found",
                    ErrorContext::default()
                        .with_entity("group")
                        .with_entity_id(id),
                )
            })
    }
}

/// In-memory storage backend.
#[derive(Default)]
pub struct LocalRepository {
    store: RwLock<Store>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TeacherRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }

    async fn create_teacher(&self, teacher: &Teacher) -> RepositoryResult<()> {
        let mut store = self.store.write();
        if store
            .teachers
            .values()
            .any(|t| t.email.eq_ignore_ascii_case(&teacher.email))
        {
            return Err(RepositoryError::validation_with_context(
                "email already registered",
                ErrorContext::new("create_teacher").with_entity("teacher"),
            ));
        }
        store.teachers.insert(teacher.id, teacher.clone());
        Ok(())
    }

    async fn find_teacher_by_email(&self, email: &str) -> RepositoryResult<Option<Teacher>> {
        let store = self.store.read();
        Ok(store
            .teachers
            .values()
            .find(|t| t.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn get_teacher(&self, id: TeacherId) -> RepositoryResult<Teacher> {
        let store = self.store.read();
        store.teachers.get(&id).cloned().ok_or_else(|| {
            RepositoryError::not_found_with_context(
                "teacher not found",
                ErrorContext::default()
                    .with_entity("teacher")
                    .with_entity_id(id),
            )
        })
    }
}

#[async_trait]
impl SessionRepository for LocalRepository {
    async fn insert_session(&self, session: &Session) -> RepositoryResult<()> {
        self.store
            .write()
            .sessions
            .insert(session.token, session.clone());
        Ok(())
    }

    async fn find_session(&self, token: SessionToken) -> RepositoryResult<Option<Session>> {
        Ok(self.store.read().sessions.get(&token).cloned())
    }

    async fn delete_session(&self, token: SessionToken) -> RepositoryResult<bool> {
        Ok(self.store.write().sessions.remove(&token).is_some())
    }
}

#[async_trait]
impl GroupRepository for LocalRepository {
    async fn create_group(&self, group: &Group) -> RepositoryResult<()> {
        self.store.write().groups.insert(group.id, group.clone());
        Ok(())
    }

    async fn list_groups(&self, teacher: TeacherId) -> RepositoryResult<Vec<Group>> {
        let store = self.store.read();
        let mut groups: Vec<Group> = store
            .groups
            .values()
            .filter(|g| g.teacher_id == teacher)
            .cloned()
            .collect();
        groups.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(groups)
    }

    async fn get_group(&self, teacher: TeacherId, id: GroupId) -> RepositoryResult<Group> {
        let store = self.store.read();
        store.owned_group(teacher, id).cloned()
    }

    async fn update_group(
        &self,
        teacher: TeacherId,
        id: GroupId,
        update: GroupUpdate,
    ) -> RepositoryResult<Group> {
        let mut store = self.store.write();
        let group = store
            .groups
            .get_mut(&id)
            .filter(|g| g.teacher_id == teacher)
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    "group not found",
                    ErrorContext::default()
                        .with_entity("group")
                        .with_entity_id(id),
                )
            })?;
        group.apply(update);
        Ok(group.clone())
    }

    async fn delete_group(&self, teacher: TeacherId, id: GroupId) -> RepositoryResult<()> {
        let mut store = self.store.write();
        store.owned_group(teacher, id)?;
        store.groups.remove(&id);
        store.students.retain(|_, s| s.group_id != id);
        store.entries.retain(|_, e| e.group_id != id);
        Ok(())
    }
}

#[async_trait]
impl StudentRepository for LocalRepository {
    async fn add_student(
        &self,
        teacher: TeacherId,
        group: GroupId,
        student: NewStudent,
    ) -> RepositoryResult<Student> {
        let mut store = self.store.write();
        store.owned_group(teacher, group)?;
        let student = Student::new(group, student);
        store.students.insert(student.id, student.clone());
        Ok(student)
    }

    async fn list_students(
        &self,
        teacher: TeacherId,
        group: GroupId,
    ) -> RepositoryResult<Vec<Student>> {
        let store = self.store.read();
        store.owned_group(teacher, group)?;
        let mut students: Vec<Student> = store
            .students
            .values()
            .filter(|s| s.group_id == group)
            .cloned()
            .collect();
        students.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(students)
    }

    async fn list_birthday_students(
        &self,
        teacher: TeacherId,
    ) -> RepositoryResult<Vec<BirthdayStudent>> {
        let store = self.store.read();
        let mut rows: Vec<BirthdayStudent> = store
            .students
            .values()
            .filter_map(|s| {
                let birth_date = s.birth_date?;
                let group = store.groups.get(&s.group_id)?;
                if group.teacher_id != teacher {
                    return None;
                }
                Some(BirthdayStudent {
                    id: s.id,
                    full_name: s.full_name.clone(),
                    birth_date,
                    group_id: group.id,
                    group_name: group.name.clone(),
                })
            })
            .collect();
        rows.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(rows)
    }

    async fn delete_student(
        &self,
        teacher: TeacherId,
        group: GroupId,
        id: StudentId,
    ) -> RepositoryResult<()> {
        let mut store = self.store.write();
        store.owned_group(teacher, group)?;
        let enrolled_here = store
            .students
            .get(&id)
            .map(|s| s.group_id == group)
            .unwrap_or(false);
        if !enrolled_here {
            return Err(RepositoryError::not_found_with_context(
                "student not found",
                ErrorContext::default()
                    .with_entity("student")
                    .with_entity_id(id),
            ));
        }
        store.students.remove(&id);
        store.entries.retain(|_, e| e.student_id != id);
        Ok(())
    }
}

#[async_trait]
impl AttendanceRepository for LocalRepository {
    async fn replace_day(
        &self,
        teacher: TeacherId,
        group: GroupId,
        date: NaiveDate,
        entries: Vec<NewAttendanceEntry>,
    ) -> RepositoryResult<usize> {
        let mut store = self.store.write();
        store.owned_group(teacher, group)?;

        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.student_id) {
                return Err(RepositoryError::validation_with_context(
                    "duplicate student in day replacement",
                    ErrorContext::new("replace_day")
                        .with_entity("attendance")
                        .with_entity_id(entry.student_id),
                ));
            }
            let belongs = store
                .students
                .get(&entry.student_id)
                .map(|s| s.group_id == group)
                .unwrap_or(false);
            if !belongs {
                return Err(RepositoryError::validation_with_context(
                    "student does not belong to group",
                    ErrorContext::new("replace_day")
                        .with_entity("student")
                        .with_entity_id(entry.student_id),
                ));
            }
        }

        // Swap under the single write lock: readers never observe the day
        // half-replaced.
        store
            .entries
            .retain(|_, e| !(e.group_id == group && e.date == date));
        let written = entries.len();
        let now = Utc::now();
        for entry in entries {
            let row = AttendanceEntry {
                id: EntryId::generate(),
                student_id: entry.student_id,
                group_id: group,
                date,
                present: entry.present,
                notes: entry.notes,
                recorded_by: entry.recorded_by,
                created_at: now,
            };
            store.entries.insert(row.id, row);
        }
        Ok(written)
    }

    async fn fetch_day(
        &self,
        teacher: TeacherId,
        group: GroupId,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<AttendanceEntry>> {
        let store = self.store.read();
        store.owned_group(teacher, group)?;
        Ok(store
            .entries
            .values()
            .filter(|e| e.group_id == group && e.date == date)
            .cloned()
            .collect())
    }

    async fn fetch_group_entries(
        &self,
        teacher: TeacherId,
        group: GroupId,
    ) -> RepositoryResult<Vec<AttendanceEntry>> {
        let store = self.store.read();
        store.owned_group(teacher, group)?;
        Ok(store
            .entries
            .values()
            .filter(|e| e.group_id == group)
            .cloned()
            .collect())
    }

    async fn fetch_range(
        &self,
        teacher: TeacherId,
        group: Option<GroupId>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepositoryResult<Vec<AttendanceEntry>> {
        let store = self.store.read();
        if let Some(group) = group {
            store.owned_group(teacher, group)?;
        }
        Ok(store
            .entries
            .values()
            .filter(|e| {
                e.date >= from
                    && e.date <= to
                    && group.map(|g| e.group_id == g).unwrap_or(true)
                    && store
                        .groups
                        .get(&e.group_id)
                        .map(|g| g.teacher_id == teacher)
                        .unwrap_or(false)
            })
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewGroup;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_group(teacher: TeacherId) -> Group {
        Group::new(
            teacher,
            NewGroup {
                name: "Inglés Beginners".to_string(),
                place: "Casa del Bicentenario".to_string(),
                schedule_date: date(2024, 3, 4),
                schedule_time: None,
                description: None,
            },
        )
    }

    #[tokio::test]
    async fn test_groups_are_scoped_by_teacher() {
        let repo = LocalRepository::new();
        let owner = TeacherId::generate();
        let intruder = TeacherId::generate();

        let group = sample_group(owner);
        repo.create_group(&group).await.unwrap();

        assert!(repo.get_group(owner, group.id).await.is_ok());
        let err = repo.get_group(intruder, group.id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_replace_day_rejects_foreign_student() {
        let repo = LocalRepository::new();
        let teacher = TeacherId::generate();
        let group = sample_group(teacher);
        repo.create_group(&group).await.unwrap();

        let entries = vec![NewAttendanceEntry {
            student_id: StudentId::generate(),
            present: true,
            notes: None,
            recorded_by: teacher,
        }];
        let err = repo
            .replace_day(teacher, group.id, date(2024, 3, 10), entries)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::ValidationError { .. }));
    }

    #[tokio::test]
    async fn test_replace_day_overwrites_previous_set() {
        let repo = LocalRepository::new();
        let teacher = TeacherId::generate();
        let group = sample_group(teacher);
        repo.create_group(&group).await.unwrap();
        let student = repo
            .add_student(
                teacher,
                group.id,
                NewStudent {
                    full_name: "Ana García".to_string(),
                    email: "ana@example.com".to_string(),
                    national_id: "30123456".to_string(),
                    birth_date: None,
                },
            )
            .await
            .unwrap();

        let day = date(2024, 3, 10);
        let mark = |present| {
            vec![NewAttendanceEntry {
                student_id: student.id,
                present,
                notes: None,
                recorded_by: teacher,
            }]
        };

        repo.replace_day(teacher, group.id, day, mark(true)).await.unwrap();
        repo.replace_day(teacher, group.id, day, mark(false)).await.unwrap();

        let saved = repo.fetch_day(teacher, group.id, day).await.unwrap();
        assert_eq!(saved.len(), 1);
        assert!(!saved[0].present);
    }
}
