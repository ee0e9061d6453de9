//! Record identifier generation
//!
//! Records carry opaque string ids so that snapshots produced by other
//! installations round-trip untouched. Locally created records get a
//! prefixed UUID so the kind is visible in logs and audit entries.

use uuid::Uuid;

/// Generate a new prefixed id, e.g. `acc_5f0c...`
pub fn generate_id(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_id_has_prefix() {
        let id = generate_id("acc");
        assert!(id.starts_with("acc_"));
        assert_eq!(id.len(), 4 + 32);
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(generate_id("txn"), generate_id("txn"));
    }
}
