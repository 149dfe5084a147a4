//! Duplicate Pre-Check
//!
//! Screens a registration against the existing resident records before the
//! write. The check is fail-closed: an error while checking blocks the
//! submission exactly as a real match would.

use chrono::NaiveDate;
use tracing::warn;

use crate::api::ResidentDirectory;

/// The identity triple a registration is screened on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateProbe {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: String,
}

impl DuplicateProbe {
    fn normalized(&self) -> (String, String, String) {
        (
            normalize_name(&self.first_name),
            normalize_name(&self.last_name),
            normalize_birth_date(&self.birth_date),
        )
    }
}

fn normalize_name(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Birth dates arrive in whichever format the source screen produced;
/// normalize to ISO so "02/14/1990" and "1990-02-14" compare equal.
fn normalize_birth_date(raw: &str) -> String {
    let trimmed = raw.trim();
    for format in ["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%B %d, %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return date.format("%Y-%m-%d").to_string();
        }
    }
    trimmed.to_lowercase()
}

/// True when the probe must be treated as a duplicate: a match on
/// (first name, last name, birth date), or any failure to complete the
/// check at all.
pub async fn is_duplicate(probe: &DuplicateProbe, directory: &dyn ResidentDirectory) -> bool {
    let residents = match directory.all_residents().await {
        Ok(residents) => residents,
        Err(err) => {
            // Fail closed: an inconclusive check is not "no duplicate".
            warn!(error = %err, "duplicate pre-check failed; blocking submission");
            return true;
        }
    };

    let (first, last, born) = probe.normalized();
    residents.iter().any(|r| {
        normalize_name(&r.first_name) == first
            && normalize_name(&r.last_name) == last
            && normalize_birth_date(&r.birth_date) == born
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ResidentRecord;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;

    struct FixedDirectory(Vec<ResidentRecord>);

    #[async_trait]
    impl ResidentDirectory for FixedDirectory {
        async fn all_residents(&self) -> Result<Vec<ResidentRecord>> {
            Ok(self.0.clone())
        }
    }

    struct BrokenDirectory;

    #[async_trait]
    impl ResidentDirectory for BrokenDirectory {
        async fn all_residents(&self) -> Result<Vec<ResidentRecord>> {
            Err(anyhow!("connection reset"))
        }
    }

    fn probe() -> DuplicateProbe {
        DuplicateProbe {
            first_name: "  JUAN ".into(),
            last_name: "dela cruz".into(),
            birth_date: "02/14/1990".into(),
        }
    }

    #[tokio::test]
    async fn test_match_is_case_insensitive_and_trimmed() {
        let directory = FixedDirectory(vec![ResidentRecord {
            first_name: "Juan".into(),
            last_name: "Dela Cruz ".into(),
            birth_date: "1990-02-14".into(),
        }]);
        assert!(is_duplicate(&probe(), &directory).await);
    }

    #[tokio::test]
    async fn test_different_birth_date_is_not_a_match() {
        let directory = FixedDirectory(vec![ResidentRecord {
            first_name: "Juan".into(),
            last_name: "Dela Cruz".into(),
            birth_date: "1991-02-14".into(),
        }]);
        assert!(!is_duplicate(&probe(), &directory).await);
    }

    #[tokio::test]
    async fn test_failed_lookup_is_treated_as_duplicate() {
        assert!(is_duplicate(&probe(), &BrokenDirectory).await);
    }
}
