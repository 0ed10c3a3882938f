use std::collections::HashMap;

use chrono::NaiveDate;

use asistente::api::{GroupId, StudentId, TeacherId};
use asistente::db::repositories::LocalRepository;
use asistente::db::repository::{GroupRepository, StudentRepository};
use asistente::models::{Group, NewGroup, NewStudent};
use asistente::services::{self, DayMark};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn make_group(repo: &LocalRepository, teacher: TeacherId, name: &str) -> GroupId {
    let group = Group::new(
        teacher,
        NewGroup {
            name: name.to_string(),
            place: "Aula 1".to_string(),
            schedule_date: date(2024, 3, 4),
            schedule_time: None,
            description: None,
        },
    );
    repo.create_group(&group).await.unwrap();
    group.id
}

async fn enroll(
    repo: &LocalRepository,
    teacher: TeacherId,
    group: GroupId,
    name: &str,
    birth_date: Option<NaiveDate>,
) -> StudentId {
    repo.add_student(
        teacher,
        group,
        NewStudent {
            full_name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            national_id: "30123456".to_string(),
            birth_date,
        },
    )
    .await
    .unwrap()
    .id
}

async fn record(
    repo: &LocalRepository,
    teacher: TeacherId,
    group: GroupId,
    day: NaiveDate,
    present: &[StudentId],
) {
    let marks: HashMap<StudentId, DayMark> = present
        .iter()
        .map(|id| {
            (
                *id,
                DayMark {
                    present: true,
                    notes: None,
                },
            )
        })
        .collect();
    services::record_day(repo, teacher, group, day, &marks)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_history_is_newest_first_with_counts() {
    let repo = LocalRepository::new();
    let teacher = TeacherId::generate();
    let group = make_group(&repo, teacher, "Inglés").await;
    let ana = enroll(&repo, teacher, group, "Ana García", None).await;
    let _bruno = enroll(&repo, teacher, group, "Bruno Díaz", None).await;

    record(&repo, teacher, group, date(2024, 3, 3), &[ana]).await;
    record(&repo, teacher, group, date(2024, 3, 10), &[]).await;

    let history = services::history(&repo, teacher, group).await.unwrap();
    assert_eq!(history.len(), 2);

    assert_eq!(history[0].date, date(2024, 3, 10));
    assert_eq!(history[0].total_students, 2);
    assert_eq!(history[0].present_count, 0);
    assert_eq!(history[0].absent_count, 2);

    assert_eq!(history[1].date, date(2024, 3, 3));
    assert_eq!(history[1].present_count, 1);
    assert_eq!(history[1].absent_count, 1);
}

#[tokio::test]
async fn test_history_of_empty_group_is_empty() {
    let repo = LocalRepository::new();
    let teacher = TeacherId::generate();
    let group = make_group(&repo, teacher, "Inglés").await;

    let history = services::history(&repo, teacher, group).await.unwrap();
    assert!(history.is_empty());
}

#[tokio::test]
async fn test_calendar_covers_month_and_carries_group_names() {
    let repo = LocalRepository::new();
    let teacher = TeacherId::generate();
    let english = make_group(&repo, teacher, "Inglés").await;
    let guitar = make_group(&repo, teacher, "Guitarra").await;
    let ana = enroll(&repo, teacher, english, "Ana García", None).await;
    let coco = enroll(&repo, teacher, guitar, "Coco Cuerda", None).await;

    record(&repo, teacher, english, date(2024, 3, 10), &[ana]).await;
    record(&repo, teacher, guitar, date(2024, 3, 10), &[coco]).await;
    // Outside the requested month
    record(&repo, teacher, english, date(2024, 4, 2), &[ana]).await;

    let cells = services::attendance::calendar(&repo, teacher, 2024, 3, None)
        .await
        .unwrap();
    assert_eq!(cells.len(), 2);
    assert!(cells.iter().all(|c| c.date == date(2024, 3, 10)));
    let names: Vec<&str> = cells.iter().map(|c| c.group_name.as_str()).collect();
    assert!(names.contains(&"Inglés"));
    assert!(names.contains(&"Guitarra"));
}

#[tokio::test]
async fn test_calendar_group_filter() {
    let repo = LocalRepository::new();
    let teacher = TeacherId::generate();
    let english = make_group(&repo, teacher, "Inglés").await;
    let guitar = make_group(&repo, teacher, "Guitarra").await;
    let ana = enroll(&repo, teacher, english, "Ana García", None).await;
    let coco = enroll(&repo, teacher, guitar, "Coco Cuerda", None).await;

    record(&repo, teacher, english, date(2024, 3, 10), &[ana]).await;
    record(&repo, teacher, guitar, date(2024, 3, 17), &[coco]).await;

    let cells = services::attendance::calendar(&repo, teacher, 2024, 3, Some(guitar))
        .await
        .unwrap();
    assert_eq!(cells.len(), 1);
    assert_eq!(cells[0].group_id, guitar);
    assert_eq!(cells[0].date, date(2024, 3, 17));
}

#[tokio::test]
async fn test_calendar_rejects_invalid_month() {
    let repo = LocalRepository::new();
    let teacher = TeacherId::generate();
    let err = services::attendance::calendar(&repo, teacher, 2024, 13, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        asistente::db::repository::RepositoryError::ValidationError { .. }
    ));
}

#[tokio::test]
async fn test_calendar_excludes_other_teachers() {
    let repo = LocalRepository::new();
    let teacher = TeacherId::generate();
    let other = TeacherId::generate();
    let mine = make_group(&repo, teacher, "Inglés").await;
    let theirs = make_group(&repo, other, "Ajedrez").await;
    let ana = enroll(&repo, teacher, mine, "Ana García", None).await;
    let rival = enroll(&repo, other, theirs, "Rival Ajeno", None).await;

    record(&repo, teacher, mine, date(2024, 3, 10), &[ana]).await;
    record(&repo, other, theirs, date(2024, 3, 10), &[rival]).await;

    let cells = services::attendance::calendar(&repo, teacher, 2024, 3, None)
        .await
        .unwrap();
    assert_eq!(cells.len(), 1);
    assert_eq!(cells[0].group_id, mine);
}

#[tokio::test]
async fn test_birthday_board_for_teacher() {
    let repo = LocalRepository::new();
    let teacher = TeacherId::generate();
    let group = make_group(&repo, teacher, "Inglés").await;

    let today = date(2024, 3, 10);
    enroll(&repo, teacher, group, "Hoy Cumple", Some(date(1990, 3, 10))).await;
    enroll(&repo, teacher, group, "Pronto Cumple", Some(date(2000, 3, 15))).await;
    enroll(&repo, teacher, group, "Lejos Cumple", Some(date(1990, 1, 5))).await;
    enroll(&repo, teacher, group, "Sin Fecha", None).await;

    let board = services::upcoming_for_teacher(&repo, teacher, today)
        .await
        .unwrap();
    assert_eq!(board.today.len(), 1);
    assert_eq!(board.today[0].full_name, "Hoy Cumple");
    assert_eq!(board.today[0].age_turning, 34);
    assert_eq!(board.upcoming.len(), 1);
    assert_eq!(board.upcoming[0].full_name, "Pronto Cumple");
    assert_eq!(board.upcoming[0].group_name, "Inglés");
}
