#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::api::{GroupId, StudentId};
    use crate::routes::birthdays::BirthdayStudent;
    use crate::services::birthdays::{project, upcoming_birthdays, DEFAULT_HORIZON_DAYS};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn student(name: &str, birth: NaiveDate) -> BirthdayStudent {
        BirthdayStudent {
            id: StudentId::generate(),
            full_name: name.to_string(),
            birth_date: birth,
            group_id: GroupId::generate(),
            group_name: "Inglés Beginners".to_string(),
        }
    }

    #[test]
    fn test_birthday_today() {
        let today = date(2024, 3, 10);
        let projection = project(&student("Ana", date(1990, 3, 10)), today).unwrap();
        assert_eq!(projection.days_until, 0);
        assert_eq!(projection.age_turning, 34);
    }

    #[test]
    fn test_passed_birthday_rolls_to_next_year() {
        let today = date(2024, 3, 10);
        let projection = project(&student("Ana", date(1990, 1, 5)), today).unwrap();
        // Next occurrence is 2025-01-05
        assert_eq!(projection.days_until, 301);
        assert_eq!(projection.age_turning, 35);
    }

    #[test]
    fn test_upcoming_birthday_later_this_year() {
        let today = date(2024, 3, 10);
        let projection = project(&student("Ana", date(2000, 4, 1)), today).unwrap();
        assert_eq!(projection.days_until, 22);
        assert_eq!(projection.age_turning, 24);
    }

    #[test]
    fn test_feb_29_falls_on_feb_28_in_common_years() {
        let today = date(2025, 2, 1);
        let projection = project(&student("Ana", date(2000, 2, 29)), today).unwrap();
        assert_eq!(projection.days_until, 27); // 2025-02-28
        assert_eq!(projection.age_turning, 25);
    }

    #[test]
    fn test_horizon_filtering_and_buckets() {
        let today = date(2024, 3, 10);
        let students = vec![
            student("Fuera", date(1990, 1, 5)),   // 301 days, excluded
            student("Hoy", date(1990, 3, 10)),    // 0 days
            student("Pronto", date(2000, 3, 15)), // 5 days
            student("Borde", date(1995, 6, 8)),   // exactly 90 days
        ];

        let board = upcoming_birthdays(&students, today, DEFAULT_HORIZON_DAYS);
        assert_eq!(board.today.len(), 1);
        assert_eq!(board.today[0].full_name, "Hoy");
        assert_eq!(board.upcoming.len(), 2);
        assert_eq!(board.upcoming[0].full_name, "Pronto");
        assert_eq!(board.upcoming[1].full_name, "Borde");
        assert_eq!(board.upcoming[1].days_until, 90);
    }

    #[test]
    fn test_upcoming_sorted_ascending() {
        let today = date(2024, 3, 10);
        let students = vec![
            student("B", date(2001, 4, 20)),
            student("A", date(2001, 3, 12)),
            student("C", date(2001, 5, 30)),
        ];
        let board = upcoming_birthdays(&students, today, DEFAULT_HORIZON_DAYS);
        let days: Vec<i64> = board.upcoming.iter().map(|p| p.days_until).collect();
        let mut sorted = days.clone();
        sorted.sort_unstable();
        assert_eq!(days, sorted);
    }

    #[test]
    fn test_empty_input() {
        let board = upcoming_birthdays(&[], date(2024, 3, 10), DEFAULT_HORIZON_DAYS);
        assert!(board.today.is_empty());
        assert!(board.upcoming.is_empty());
    }
}
