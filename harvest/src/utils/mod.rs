//! Small helpers shared across the crate.

use uuid::Uuid;

/// Generates a fresh run identifier (UUID v4).
#[must_use]
pub fn generate_run_id() -> Uuid {
    Uuid::new_v4()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_ids_are_v4_and_distinct() {
        let a = generate_run_id();
        assert_eq!(a.get_version_num(), 4);
        assert_ne!(a, generate_run_id());
    }
}
