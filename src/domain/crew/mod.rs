//! Crew roster records and the field formats they are persisted with.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

pub mod validation;

pub use validation::{validate_draft, ValidationErrors};

/// Date format used for every date cell in the backing sheet.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Allowed contract length range (inclusive), in days.
pub const MIN_CONTRACT_DAYS: u32 = 1;
pub const MAX_CONTRACT_DAYS: u32 = 365;

/// Stable identity of a crew record (the sheet's id column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct CrewId(pub i64);

impl fmt::Display for CrewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Relief status of a crew member.
///
/// `OnBoard` is the only state the automatic sweep moves out of; every other
/// transition is a manual edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CrewStatus {
    OnBoard,
    OnLeave,
    DueForRelief,
    OverdueForRelief,
}

impl CrewStatus {
    pub const ALL: [CrewStatus; 4] = [
        CrewStatus::OnBoard,
        CrewStatus::OnLeave,
        CrewStatus::DueForRelief,
        CrewStatus::OverdueForRelief,
    ];

    /// Text written into the status cell.
    pub fn as_sheet_str(&self) -> &'static str {
        match self {
            CrewStatus::OnBoard => "On board",
            CrewStatus::OnLeave => "On Leave",
            CrewStatus::DueForRelief => "Due for Relief",
            CrewStatus::OverdueForRelief => "Overdue for Relief",
        }
    }
}

impl fmt::Display for CrewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sheet_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown crew status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for CrewStatus {
    type Err = UnknownStatus;

    /// Case-insensitive, whitespace/underscore-insensitive: `Onboard`,
    /// `On board` and `on_board` all parse to `OnBoard`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "onboard" => Ok(CrewStatus::OnBoard),
            "onleave" => Ok(CrewStatus::OnLeave),
            "dueforrelief" => Ok(CrewStatus::DueForRelief),
            "overdueforrelief" => Ok(CrewStatus::OverdueForRelief),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

/// A crew member's assignment as loaded from the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CrewRecord {
    pub id: CrewId,
    pub name: String,
    pub rank: String,
    pub vessel: String,
    #[schema(value_type = String, format = Date)]
    pub sign_on: NaiveDate,
    pub contract_days: u32,
    pub status: CrewStatus,
}

impl CrewRecord {
    /// Sign-on plus contract length. `None` only if the sum leaves chrono's
    /// representable range.
    pub fn relief_date(&self) -> Option<NaiveDate> {
        relief_date(self.sign_on, self.contract_days)
    }

    pub fn to_draft(&self) -> CrewDraft {
        CrewDraft {
            name: self.name.clone(),
            rank: self.rank.clone(),
            vessel: self.vessel.clone(),
            sign_on: self.sign_on,
            contract_days: self.contract_days,
            status: self.status,
        }
    }

    pub fn from_draft(id: CrewId, draft: CrewDraft) -> Self {
        Self {
            id,
            name: draft.name,
            rank: draft.rank,
            vessel: draft.vessel,
            sign_on: draft.sign_on,
            contract_days: draft.contract_days,
            status: draft.status,
        }
    }
}

pub fn relief_date(sign_on: NaiveDate, contract_days: u32) -> Option<NaiveDate> {
    sign_on.checked_add_days(Days::new(u64::from(contract_days)))
}

/// Every mutable field of a record: the input to an append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CrewDraft {
    pub name: String,
    pub rank: String,
    pub vessel: String,
    #[schema(value_type = String, format = Date)]
    pub sign_on: NaiveDate,
    pub contract_days: u32,
    #[serde(default = "default_status")]
    pub status: CrewStatus,
}

fn default_status() -> CrewStatus {
    CrewStatus::OnBoard
}

/// Named-field edit. Absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CrewPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rank: Option<String>,
    #[serde(default)]
    pub vessel: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>, format = Date)]
    pub sign_on: Option<NaiveDate>,
    #[serde(default)]
    pub contract_days: Option<u32>,
    #[serde(default)]
    pub status: Option<CrewStatus>,
}

impl CrewPatch {
    pub fn apply_to(self, mut draft: CrewDraft) -> CrewDraft {
        if let Some(name) = self.name {
            draft.name = name;
        }
        if let Some(rank) = self.rank {
            draft.rank = rank;
        }
        if let Some(vessel) = self.vessel {
            draft.vessel = vessel;
        }
        if let Some(sign_on) = self.sign_on {
            draft.sign_on = sign_on;
        }
        if let Some(days) = self.contract_days {
            draft.contract_days = days;
        }
        if let Some(status) = self.status {
            draft.status = status;
        }
        draft
    }
}

/// Selects a record for edit/delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordKey {
    Id(CrewId),
    /// Legacy lookup by display name; rejected when the name is not unique.
    Name(String),
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKey::Id(id) => write!(f, "id {}", id),
            RecordKey::Name(name) => write!(f, "name '{}'", name),
        }
    }
}

/// Parses a date cell. Accepts `YYYY-MM-DD`, optionally followed by a time
/// component (`2024-01-01 00:00:00`, `2024-01-01T00:00:00`).
pub fn parse_date_cell(raw: &str) -> Result<NaiveDate, String> {
    let raw = raw.trim();
    let date_part = raw
        .split(|c: char| c == 'T' || c.is_whitespace())
        .next()
        .unwrap_or_default();
    NaiveDate::parse_from_str(date_part, DATE_FORMAT)
        .map_err(|e| format!("invalid date '{}': {}", raw, e))
}

pub fn format_date_cell(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses a contract-days cell. Integer text only.
pub fn parse_contract_cell(raw: &str) -> Result<u32, String> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| format!("contract days '{}' is not a non-negative integer", raw.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn status_parses_observed_spellings() {
        assert_eq!("On board".parse::<CrewStatus>().unwrap(), CrewStatus::OnBoard);
        assert_eq!("Onboard".parse::<CrewStatus>().unwrap(), CrewStatus::OnBoard);
        assert_eq!("on_board".parse::<CrewStatus>().unwrap(), CrewStatus::OnBoard);
        assert_eq!("On Leave".parse::<CrewStatus>().unwrap(), CrewStatus::OnLeave);
        assert_eq!(
            "due for relief".parse::<CrewStatus>().unwrap(),
            CrewStatus::DueForRelief
        );
        assert_eq!(
            "Overdue for Relief".parse::<CrewStatus>().unwrap(),
            CrewStatus::OverdueForRelief
        );
        assert!("Ashore".parse::<CrewStatus>().is_err());
    }

    #[test]
    fn status_sheet_text_parses_back() {
        for status in CrewStatus::ALL {
            assert_eq!(status.as_sheet_str().parse::<CrewStatus>().unwrap(), status);
        }
    }

    #[test]
    fn relief_date_adds_contract_days() {
        assert_eq!(relief_date(date(2024, 1, 1), 90), Some(date(2024, 3, 31)));
        assert_eq!(relief_date(NaiveDate::MAX, 1), None);
    }

    #[test]
    fn date_cell_tolerates_time_suffix() {
        assert_eq!(parse_date_cell("2024-01-01").unwrap(), date(2024, 1, 1));
        assert_eq!(parse_date_cell(" 2024-01-01 00:00:00").unwrap(), date(2024, 1, 1));
        assert_eq!(parse_date_cell("2024-01-01T08:30:00").unwrap(), date(2024, 1, 1));
        assert!(parse_date_cell("01/02/2024").is_err());
        assert!(parse_date_cell("").is_err());
    }

    #[test]
    fn contract_cell_requires_integer() {
        assert_eq!(parse_contract_cell(" 90 ").unwrap(), 90);
        assert!(parse_contract_cell("90.5").is_err());
        assert!(parse_contract_cell("-3").is_err());
        assert!(parse_contract_cell("ninety").is_err());
    }

    #[test]
    fn patch_only_overwrites_present_fields() {
        let draft = CrewDraft {
            name: "Ana Souza".to_string(),
            rank: "Master".to_string(),
            vessel: "Nordic Star".to_string(),
            sign_on: date(2024, 1, 1),
            contract_days: 90,
            status: CrewStatus::OnBoard,
        };
        let patch = CrewPatch {
            vessel: Some("Baltic Dawn".to_string()),
            contract_days: Some(120),
            ..CrewPatch::default()
        };
        let merged = patch.apply_to(draft.clone());
        assert_eq!(merged.vessel, "Baltic Dawn");
        assert_eq!(merged.contract_days, 120);
        assert_eq!(merged.name, draft.name);
        assert_eq!(merged.status, draft.status);
    }
}
