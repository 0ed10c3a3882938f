#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use crate::api::{EntryId, GroupId, StudentId, TeacherId};
    use crate::models::{AttendanceEntry, Group, NewGroup, NewStudent, Student};
    use crate::services::csv_export::{export_csv, export_filename};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn student(group: GroupId, name: &str) -> Student {
        Student::new(
            group,
            NewStudent {
                full_name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
                national_id: "30123456".to_string(),
                birth_date: None,
            },
        )
    }

    fn entry(group: GroupId, student: &Student, day: NaiveDate, present: bool) -> AttendanceEntry {
        AttendanceEntry {
            id: EntryId::generate(),
            student_id: student.id,
            group_id: group,
            date: day,
            present,
            notes: None,
            recorded_by: TeacherId::generate(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_two_students_one_date() {
        let group = GroupId::generate();
        let ana = student(group, "Ana García");
        let bruno = student(group, "Bruno Díaz");
        let day = date(2024, 3, 10);
        let entries = vec![
            entry(group, &ana, day, true),
            entry(group, &bruno, day, false),
        ];

        let csv = export_csv(
            &[ana.clone(), bruno.clone()],
            &entries,
            date(2024, 3, 1),
            date(2024, 3, 31),
        );
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "Nombre Completo,Email,DNI,10/03/2024,Total Presentes,Total Ausentes,% Asistencia"
        );
        assert!(lines[1].starts_with("\"Ana García\""));
        assert!(lines[1].ends_with(",\"Presente\",1,0,100.0%"));
        assert!(lines[2].starts_with("\"Bruno Díaz\""));
        assert!(lines[2].ends_with(",\"Ausente\",0,1,0.0%"));
    }

    #[test]
    fn test_missing_entry_reads_absent() {
        let group = GroupId::generate();
        let ana = student(group, "Ana García");
        let bruno = student(group, "Bruno Díaz");
        let d1 = date(2024, 3, 10);
        let d2 = date(2024, 3, 17);
        // Bruno was only marked on the first date.
        let entries = vec![
            entry(group, &ana, d1, true),
            entry(group, &ana, d2, true),
            entry(group, &bruno, d1, true),
        ];

        let csv = export_csv(
            &[ana, bruno],
            &entries,
            date(2024, 3, 1),
            date(2024, 3, 31),
        );
        let lines: Vec<&str> = csv.lines().collect();
        assert!(lines[1].ends_with(",\"Presente\",\"Presente\",2,0,100.0%"));
        assert!(lines[2].ends_with(",\"Presente\",\"Ausente\",1,1,50.0%"));
    }

    #[test]
    fn test_no_matching_dates_has_no_division_by_zero() {
        let group = GroupId::generate();
        let ana = student(group, "Ana García");
        // An entry outside the requested range contributes no column.
        let entries = vec![entry(group, &ana, date(2024, 2, 5), true)];

        let day = date(2024, 3, 10);
        let csv = export_csv(&[ana], &entries, day, day);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "Nombre Completo,Email,DNI,Total Presentes,Total Ausentes,% Asistencia"
        );
        assert!(lines[1].ends_with(",0,0,0%"));
    }

    #[test]
    fn test_date_columns_sorted_and_unique() {
        let group = GroupId::generate();
        let ana = student(group, "Ana García");
        let bruno = student(group, "Bruno Díaz");
        let d1 = date(2024, 3, 17);
        let d2 = date(2024, 3, 10);
        let entries = vec![
            entry(group, &ana, d1, true),
            entry(group, &bruno, d1, false),
            entry(group, &ana, d2, false),
        ];

        let csv = export_csv(&[ana, bruno], &entries, date(2024, 3, 1), date(2024, 3, 31));
        let header = csv.lines().next().unwrap();
        assert_eq!(
            header,
            "Nombre Completo,Email,DNI,10/03/2024,17/03/2024,Total Presentes,Total Ausentes,% Asistencia"
        );
    }

    #[test]
    fn test_quotes_in_fields_are_escaped() {
        let group = GroupId::generate();
        let mut ana = student(group, "Ana García");
        ana.full_name = "Ana \"Anita\" García".to_string();

        let csv = export_csv(&[ana], &[], date(2024, 3, 1), date(2024, 3, 31));
        assert!(csv.contains("\"Ana \"\"Anita\"\" García\""));
    }

    #[test]
    fn test_export_filename() {
        let group = Group::new(
            TeacherId::generate(),
            NewGroup {
                name: "Inglés Beginners".to_string(),
                place: "Casa del Bicentenario".to_string(),
                schedule_date: date(2024, 3, 4),
                schedule_time: None,
                description: None,
            },
        );
        let name = export_filename(&group, date(2024, 3, 1), date(2024, 3, 31));
        assert_eq!(name, "asistencia_Inglés_Beginners_01-03-2024_31-03-2024.csv");
    }
}
