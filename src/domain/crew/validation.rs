//! Presence/format checks run before any write reaches the sheet.

use super::{CrewDraft, MAX_CONTRACT_DAYS, MIN_CONTRACT_DAYS};
use std::fmt;

/// Human-readable messages, one per failed check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<String>);

impl ValidationErrors {
    pub fn messages(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

pub fn is_valid_name(name: &str) -> bool {
    !name.trim().is_empty() && !name.chars().any(|c| c.is_ascii_digit())
}

/// Returns every failed check at once so the caller can show them together.
pub fn validate_draft(draft: &CrewDraft) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();
    if !is_valid_name(&draft.name) {
        errors.push("Name must be non-empty and must not contain numbers.".to_string());
    }
    if draft.rank.trim().is_empty() {
        errors.push("Rank must be non-empty.".to_string());
    }
    if draft.vessel.trim().is_empty() {
        errors.push("Vessel must be non-empty.".to_string());
    }
    if !(MIN_CONTRACT_DAYS..=MAX_CONTRACT_DAYS).contains(&draft.contract_days) {
        errors.push(format!(
            "Contract days must be between {} and {}.",
            MIN_CONTRACT_DAYS, MAX_CONTRACT_DAYS
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}
