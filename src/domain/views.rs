//! Read-only projections of the roster for filters, the crew-change calendar
//! and the onboard timeline.

use crate::domain::crew::{format_date_cell, CrewRecord, CrewStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use utoipa::{IntoParams, ToSchema};

/// Label meaning "no filter" in option lists.
pub const ALL_OPTION: &str = "All";

/// Vessel/status filter. `None` matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RosterFilter {
    /// Vessel name, or `All`.
    #[serde(default)]
    pub vessel: Option<String>,
    /// Status text (e.g. `Due for Relief`), or `All`.
    #[serde(default)]
    pub status: Option<String>,
}

impl RosterFilter {
    /// Builds a filter from option-list selections, treating `All` (or an
    /// empty value) as no filter.
    pub fn from_selection(vessel: Option<&str>, status: Option<CrewStatus>) -> Self {
        let vessel = vessel
            .map(str::trim)
            .filter(|v| !v.is_empty() && *v != ALL_OPTION)
            .map(str::to_string);
        Self {
            vessel,
            status: status.map(|s| s.as_sheet_str().to_string()),
        }
    }

    /// Resolves the status selection. `All` and blank mean no filter.
    pub fn status_filter(&self) -> Result<Option<CrewStatus>, String> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") | Some(ALL_OPTION) => Ok(None),
            Some(raw) => raw.parse::<CrewStatus>().map(Some).map_err(|e| e.to_string()),
        }
    }

    pub fn vessel_filter(&self) -> Option<&str> {
        self.vessel
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty() && *v != ALL_OPTION)
    }

    /// Predicate for one record. Fails on an unknown status selection.
    pub fn matcher(&self) -> Result<impl Fn(&CrewRecord) -> bool + '_, String> {
        let status = self.status_filter()?;
        let vessel = self.vessel_filter();
        Ok(move |r: &CrewRecord| {
            vessel.map_or(true, |v| r.vessel == v) && status.map_or(true, |s| r.status == s)
        })
    }

    pub fn apply<'a>(&self, records: &'a [CrewRecord]) -> Result<Vec<&'a CrewRecord>, String> {
        let matches = self.matcher()?;
        Ok(records.iter().filter(|r| matches(r)).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FilterOptions {
    pub vessels: Vec<String>,
    pub statuses: Vec<String>,
}

/// `All` followed by the sorted distinct vessels, and `All` followed by every status.
pub fn filter_options(records: &[CrewRecord]) -> FilterOptions {
    let distinct: BTreeSet<&str> = records.iter().map(|r| r.vessel.as_str()).collect();
    let vessels = std::iter::once(ALL_OPTION)
        .chain(distinct)
        .map(str::to_string)
        .collect();
    let statuses = std::iter::once(ALL_OPTION.to_string())
        .chain(CrewStatus::ALL.iter().map(|s| s.as_sheet_str().to_string()))
        .collect();
    FilterOptions { vessels, statuses }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CalendarEvent {
    pub title: String,
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TimelineBar {
    pub name: String,
    pub vessel: String,
    pub status: CrewStatus,
    pub start: String,
    pub end: String,
}

/// One event per record spanning sign-on to relief date.
pub fn calendar_events<'a, I>(records: I) -> Vec<CalendarEvent>
where
    I: IntoIterator<Item = &'a CrewRecord>,
{
    records
        .into_iter()
        .filter_map(|r| {
            let end = r.relief_date()?;
            Some(CalendarEvent {
                title: r.name.clone(),
                start: format_date_cell(r.sign_on),
                end: format_date_cell(end),
            })
        })
        .collect()
}

/// Bars in store order.
pub fn timeline<'a, I>(records: I) -> Vec<TimelineBar>
where
    I: IntoIterator<Item = &'a CrewRecord>,
{
    records
        .into_iter()
        .filter_map(|r| {
            let end = r.relief_date()?;
            Some(TimelineBar {
                name: r.name.clone(),
                vessel: r.vessel.clone(),
                status: r.status,
                start: format_date_cell(r.sign_on),
                end: format_date_cell(end),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::crew::CrewId;
    use chrono::NaiveDate;

    fn rec(id: i64, name: &str, vessel: &str, status: CrewStatus) -> CrewRecord {
        CrewRecord {
            id: CrewId(id),
            name: name.to_string(),
            rank: "Oiler".to_string(),
            vessel: vessel.to_string(),
            sign_on: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            contract_days: 90,
            status,
        }
    }

    fn roster() -> Vec<CrewRecord> {
        vec![
            rec(1, "Ana", "Nordic Star", CrewStatus::OnBoard),
            rec(2, "Ben", "Aurora", CrewStatus::OnLeave),
            rec(3, "Cai", "Nordic Star", CrewStatus::DueForRelief),
        ]
    }

    #[test]
    fn all_selection_is_no_filter() {
        let records = roster();
        let filter = RosterFilter::from_selection(Some("All"), None);
        assert_eq!(filter.apply(&records).unwrap().len(), 3);
    }

    #[test]
    fn filters_by_vessel_and_status() {
        let records = roster();
        let filter = RosterFilter {
            vessel: Some("Nordic Star".to_string()),
            status: Some("Due for Relief".to_string()),
        };
        let hits = filter.apply(&records).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Cai");
    }

    #[test]
    fn matcher_accepts_single_records() {
        let filter = RosterFilter::from_selection(Some("Aurora"), Some(CrewStatus::OnLeave));
        let matches = filter.matcher().unwrap();
        let records = roster();
        assert!(!matches(&records[0]));
        assert!(matches(&records[1]));
        // Blank vessel and lowercase status text still resolve.
        let loose = RosterFilter {
            vessel: Some("  ".to_string()),
            status: Some("on leave".to_string()),
        };
        assert_eq!(loose.apply(&records).unwrap().len(), 1);
    }

    #[test]
    fn unknown_status_filter_is_an_error() {
        let filter = RosterFilter {
            vessel: None,
            status: Some("Retired".to_string()),
        };
        assert!(filter.apply(&roster()).is_err());
    }

    #[test]
    fn options_are_sorted_and_prefixed() {
        let options = filter_options(&roster());
        assert_eq!(options.vessels, vec!["All", "Aurora", "Nordic Star"]);
        assert_eq!(options.statuses.first().map(String::as_str), Some("All"));
        assert_eq!(options.statuses.len(), 5);
    }

    #[test]
    fn calendar_spans_sign_on_to_relief() {
        let records = roster();
        let events = calendar_events(&records);
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].title, "Ana");
        assert_eq!(events[0].start, "2024-01-01");
        assert_eq!(events[0].end, "2024-03-31");
    }

    #[test]
    fn timeline_keeps_store_order() {
        let records = roster();
        let bars = timeline(&records);
        let names: Vec<_> = bars.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Ben", "Cai"]);
    }
}
