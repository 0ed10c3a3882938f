#[cfg(test)]
mod tests {
    use crate::api::{GroupId, SessionToken, StudentId, TeacherId};
    use uuid::Uuid;

    #[test]
    fn test_teacher_id_new() {
        let raw = Uuid::new_v4();
        let id = TeacherId::new(raw);
        assert_eq!(id.value(), raw);
    }

    #[test]
    fn test_group_id_equality() {
        let raw = Uuid::new_v4();
        let id1 = GroupId::new(raw);
        let id2 = GroupId::new(raw);
        let id3 = GroupId::generate();
        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
    }

    #[test]
    fn test_generate_is_unique() {
        let a = StudentId::generate();
        let b = StudentId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_ids_usable_in_sets() {
        use std::collections::HashSet;

        let shared = Uuid::new_v4();
        let mut set = HashSet::new();
        set.insert(StudentId::new(shared));
        set.insert(StudentId::generate());
        set.insert(StudentId::new(shared)); // Duplicate
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_display_matches_uuid() {
        let raw = Uuid::new_v4();
        let token = SessionToken::new(raw);
        assert_eq!(token.to_string(), raw.to_string());
    }

    #[test]
    fn test_serde_roundtrip() {
        let id = TeacherId::generate();
        let json = serde_json::to_string(&id).unwrap();
        let back: TeacherId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
