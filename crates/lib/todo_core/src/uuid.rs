// Helper for generating UUIDv7 (timestamp-sortable UUIDs)
//
// Task ids are generated app-side so both storage backends hand out ids
// that sort by creation time. User ids in PostgreSQL come from
// gen_random_uuid() (v4).

use uuid::Uuid;

/// Generate a new UUIDv7 (timestamp-sortable).
pub fn uuidv7() -> Uuid {
    Uuid::now_v7()
}

/// Parse an id received from a client. Anything that is not a UUID is `None`.
pub fn parse_id(id: &str) -> Option<Uuid> {
    Uuid::parse_str(id).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuidv7_is_valid() {
        let id = uuidv7();
        assert_eq!(id.get_version(), Some(uuid::Version::SortRand));
    }

    #[test]
    fn uuidv7_is_monotonic() {
        let a = uuidv7();
        let b = uuidv7();
        assert!(b >= a);
    }

    #[test]
    fn parse_id_rejects_garbage() {
        assert!(parse_id("42").is_none());
        assert!(parse_id("").is_none());
        let id = uuidv7();
        assert_eq!(parse_id(&id.to_string()), Some(id));
    }
}
