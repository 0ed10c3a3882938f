use chrono::NaiveDate;

use asistente::api::TeacherId;
use asistente::db::repositories::LocalRepository;
use asistente::db::repository::{
    AttendanceRepository, GroupRepository, RepositoryError, SessionRepository, StudentRepository,
    TeacherRepository,
};
use asistente::models::{Group, GroupUpdate, NewGroup, NewStudent, Session, Teacher};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_group(teacher: TeacherId, name: &str) -> Group {
    Group::new(
        teacher,
        NewGroup {
            name: name.to_string(),
            place: "Aula 1".to_string(),
            schedule_date: date(2024, 3, 4),
            schedule_time: None,
            description: None,
        },
    )
}

fn new_student(name: &str) -> NewStudent {
    NewStudent {
        full_name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        national_id: "30123456".to_string(),
        birth_date: None,
    }
}

#[tokio::test]
async fn test_list_groups_is_ordered_by_name() {
    let repo = LocalRepository::new();
    let teacher = TeacherId::generate();
    for name in ["Guitarra", "Ajedrez", "Inglés"] {
        repo.create_group(&new_group(teacher, name)).await.unwrap();
    }

    let groups = repo.list_groups(teacher).await.unwrap();
    let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["Ajedrez", "Guitarra", "Inglés"]);
}

#[tokio::test]
async fn test_list_students_is_ordered_by_name() {
    let repo = LocalRepository::new();
    let teacher = TeacherId::generate();
    let group = new_group(teacher, "Inglés");
    repo.create_group(&group).await.unwrap();
    for name in ["Zoe Último", "Ana García"] {
        repo.add_student(teacher, group.id, new_student(name))
            .await
            .unwrap();
    }

    let students = repo.list_students(teacher, group.id).await.unwrap();
    let names: Vec<&str> = students.iter().map(|s| s.full_name.as_str()).collect();
    assert_eq!(names, vec!["Ana García", "Zoe Último"]);
}

#[tokio::test]
async fn test_update_group_replaces_editable_fields() {
    let repo = LocalRepository::new();
    let teacher = TeacherId::generate();
    let group = new_group(teacher, "Inglés");
    repo.create_group(&group).await.unwrap();

    let updated = repo
        .update_group(
            teacher,
            group.id,
            GroupUpdate {
                name: "Inglés Avanzado".to_string(),
                place: "Aula 2".to_string(),
                schedule_date: date(2024, 4, 1),
                schedule_time: None,
                description: Some("Martes".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Inglés Avanzado");
    assert_eq!(updated.description.as_deref(), Some("Martes"));

    let fetched = repo.get_group(teacher, group.id).await.unwrap();
    assert_eq!(fetched.name, "Inglés Avanzado");
}

#[tokio::test]
async fn test_delete_group_cascades_students_and_attendance() {
    let repo = LocalRepository::new();
    let teacher = TeacherId::generate();
    let group = new_group(teacher, "Inglés");
    repo.create_group(&group).await.unwrap();
    let student = repo
        .add_student(teacher, group.id, new_student("Ana García"))
        .await
        .unwrap();
    repo.replace_day(
        teacher,
        group.id,
        date(2024, 3, 10),
        vec![asistente::db::models::NewAttendanceEntry {
            student_id: student.id,
            present: true,
            notes: None,
            recorded_by: teacher,
        }],
    )
    .await
    .unwrap();

    repo.delete_group(teacher, group.id).await.unwrap();

    let err = repo.get_group(teacher, group.id).await.unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));
    // Re-creating a group with the same id space starts clean: nothing to
    // observe through the range query either.
    let entries = repo
        .fetch_range(teacher, None, date(2024, 1, 1), date(2024, 12, 31))
        .await
        .unwrap();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn test_delete_student_drops_their_entries() {
    let repo = LocalRepository::new();
    let teacher = TeacherId::generate();
    let group = new_group(teacher, "Inglés");
    repo.create_group(&group).await.unwrap();
    let ana = repo
        .add_student(teacher, group.id, new_student("Ana García"))
        .await
        .unwrap();
    let bruno = repo
        .add_student(teacher, group.id, new_student("Bruno Díaz"))
        .await
        .unwrap();
    repo.replace_day(
        teacher,
        group.id,
        date(2024, 3, 10),
        vec![
            asistente::db::models::NewAttendanceEntry {
                student_id: ana.id,
                present: true,
                notes: None,
                recorded_by: teacher,
            },
            asistente::db::models::NewAttendanceEntry {
                student_id: bruno.id,
                present: false,
                notes: None,
                recorded_by: teacher,
            },
        ],
    )
    .await
    .unwrap();

    repo.delete_student(teacher, group.id, ana.id).await.unwrap();

    let entries = repo
        .fetch_day(teacher, group.id, date(2024, 3, 10))
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].student_id, bruno.id);
}

#[tokio::test]
async fn test_sessions_roundtrip() {
    let repo = LocalRepository::new();
    let teacher = Teacher::new("a@example.com", "Ana", "salt$digest");
    repo.create_teacher(&teacher).await.unwrap();

    let session = Session::new(teacher.id);
    repo.insert_session(&session).await.unwrap();

    let found = repo.find_session(session.token).await.unwrap().unwrap();
    assert_eq!(found.teacher_id, teacher.id);

    assert!(repo.delete_session(session.token).await.unwrap());
    assert!(!repo.delete_session(session.token).await.unwrap());
    assert!(repo.find_session(session.token).await.unwrap().is_none());
}

#[tokio::test]
async fn test_replace_day_empty_set_clears_the_day() {
    let repo = LocalRepository::new();
    let teacher = TeacherId::generate();
    let group = new_group(teacher, "Inglés");
    repo.create_group(&group).await.unwrap();
    let ana = repo
        .add_student(teacher, group.id, new_student("Ana García"))
        .await
        .unwrap();

    let day = date(2024, 3, 10);
    repo.replace_day(
        teacher,
        group.id,
        day,
        vec![asistente::db::models::NewAttendanceEntry {
            student_id: ana.id,
            present: true,
            notes: None,
            recorded_by: teacher,
        }],
    )
    .await
    .unwrap();

    let written = repo.replace_day(teacher, group.id, day, vec![]).await.unwrap();
    assert_eq!(written, 0);
    assert!(repo.fetch_day(teacher, group.id, day).await.unwrap().is_empty());
}
