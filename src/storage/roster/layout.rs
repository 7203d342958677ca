//! Header-driven column mapping between sheet rows and crew records.

use crate::domain::crew::{
    format_date_cell, parse_contract_cell, parse_date_cell, CrewId, CrewRecord, CrewStatus,
};
use crate::error::RosterError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Id,
    Name,
    Rank,
    Vessel,
    SignOn,
    ContractDays,
    /// Extended schema only: derived sign-on + contract.
    ReliefDate,
    Status,
}

impl Column {
    const REQUIRED: [Column; 7] = [
        Column::Id,
        Column::Name,
        Column::Rank,
        Column::Vessel,
        Column::SignOn,
        Column::ContractDays,
        Column::Status,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            Column::Id => "ID",
            Column::Name => "Name",
            Column::Rank => "Rank",
            Column::Vessel => "Vessel",
            Column::SignOn => "Sign on Date",
            Column::ContractDays => "Contract Days",
            Column::ReliefDate => "Expected Relief Date",
            Column::Status => "Status",
        }
    }

    fn from_header(text: &str) -> Option<Column> {
        let key: String = text
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "id" => Some(Column::Id),
            "name" => Some(Column::Name),
            "rank" => Some(Column::Rank),
            "vessel" => Some(Column::Vessel),
            "signondate" | "signon" | "embark" => Some(Column::SignOn),
            "contractdays" | "contract" => Some(Column::ContractDays),
            "expectedreliefdate" | "reliefdate" => Some(Column::ReliefDate),
            "status" => Some(Column::Status),
            _ => None,
        }
    }
}

/// Position of every known column within a row. Unrecognised header cells
/// are carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLayout {
    columns: Vec<Option<Column>>,
}

impl SheetLayout {
    pub fn default_header(extended: bool) -> Vec<String> {
        let mut header = vec![
            Column::Id,
            Column::Name,
            Column::Rank,
            Column::Vessel,
            Column::SignOn,
            Column::ContractDays,
        ];
        if extended {
            header.push(Column::ReliefDate);
        }
        header.push(Column::Status);
        header.iter().map(|c| c.header().to_string()).collect()
    }

    pub fn from_header(header: &[String]) -> Result<Self, RosterError> {
        let columns: Vec<Option<Column>> = header.iter().map(|h| Column::from_header(h)).collect();

        for required in Column::REQUIRED {
            match columns.iter().filter(|c| **c == Some(required)).count() {
                1 => {}
                0 => {
                    return Err(RosterError::Layout(format!(
                        "missing '{}' column",
                        required.header()
                    )))
                }
                _ => {
                    return Err(RosterError::Layout(format!(
                        "duplicate '{}' column",
                        required.header()
                    )))
                }
            }
        }
        if columns.first() != Some(&Some(Column::Id)) {
            return Err(RosterError::Layout(
                "the identity column must be the first column".to_string(),
            ));
        }

        Ok(Self { columns })
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// 0-based index of `column`.
    pub fn index_of(&self, column: Column) -> Option<usize> {
        self.columns.iter().position(|c| *c == Some(column))
    }

    /// 1-based sheet column of `column`.
    pub fn sheet_col(&self, column: Column) -> Option<u32> {
        self.index_of(column).map(|i| i as u32 + 1)
    }

    pub fn has_relief_date(&self) -> bool {
        self.index_of(Column::ReliefDate).is_some()
    }

    fn cell<'a>(&self, cells: &'a [String], column: Column) -> &'a str {
        self.index_of(column)
            .and_then(|i| cells.get(i))
            .map(|s| s.trim())
            .unwrap_or_default()
    }

    /// Parses only the identity cell, so undecodable rows can still be addressed.
    pub fn decode_id(&self, cells: &[String]) -> Option<CrewId> {
        self.cell(cells, Column::Id).parse::<i64>().ok().map(CrewId)
    }

    pub fn decode_name<'a>(&self, cells: &'a [String]) -> &'a str {
        self.cell(cells, Column::Name)
    }

    pub fn decode(&self, cells: &[String]) -> Result<CrewRecord, String> {
        let id_text = self.cell(cells, Column::Id);
        let id = id_text
            .parse::<i64>()
            .map(CrewId)
            .map_err(|_| format!("invalid id '{}'", id_text))?;
        let sign_on = parse_date_cell(self.cell(cells, Column::SignOn))?;
        let contract_days = parse_contract_cell(self.cell(cells, Column::ContractDays))?;
        let status = self
            .cell(cells, Column::Status)
            .parse::<CrewStatus>()
            .map_err(|e| e.to_string())?;

        Ok(CrewRecord {
            id,
            name: self.cell(cells, Column::Name).to_string(),
            rank: self.cell(cells, Column::Rank).to_string(),
            vessel: self.cell(cells, Column::Vessel).to_string(),
            sign_on,
            contract_days,
            status,
        })
    }

    /// Writes `record` over `base` (the row's current cells, or empty for a
    /// new row). Unknown columns keep whatever `base` holds.
    pub fn encode(&self, record: &CrewRecord, base: &[String]) -> Vec<String> {
        let mut cells: Vec<String> = base.to_vec();
        cells.resize(self.width().max(cells.len()), String::new());

        for (idx, column) in self.columns.iter().enumerate() {
            let Some(column) = column else { continue };
            cells[idx] = match column {
                Column::Id => record.id.to_string(),
                Column::Name => record.name.trim().to_string(),
                Column::Rank => record.rank.trim().to_string(),
                Column::Vessel => record.vessel.trim().to_string(),
                Column::SignOn => format_date_cell(record.sign_on),
                Column::ContractDays => record.contract_days.to_string(),
                Column::ReliefDate => record.relief_date().map(format_date_cell).unwrap_or_default(),
                Column::Status => record.status.as_sheet_str().to_string(),
            };
        }
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn sample() -> CrewRecord {
        CrewRecord {
            id: CrewId(4),
            name: "Ana Souza".to_string(),
            rank: "Master".to_string(),
            vessel: "Nordic Star".to_string(),
            sign_on: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            contract_days: 90,
            status: CrewStatus::OnBoard,
        }
    }

    #[test]
    fn observed_header_is_recognised() {
        let header = cells(&["ID", "Name", "Rank", "Vessel", "Sign on Date", "Contract Days", "Status"]);
        let layout = SheetLayout::from_header(&header).unwrap();
        assert_eq!(layout.sheet_col(Column::Status), Some(7));
        assert!(!layout.has_relief_date());
    }

    #[test]
    fn header_matching_ignores_case_and_punctuation() {
        let header = cells(&["id", "NAME", "rank", "vessel", "Sign-On date", "contract", "Relief Date", "status"]);
        let layout = SheetLayout::from_header(&header).unwrap();
        assert_eq!(layout.sheet_col(Column::ReliefDate), Some(7));
    }

    #[test]
    fn missing_and_misplaced_columns_are_rejected() {
        let missing = cells(&["ID", "Name", "Rank", "Vessel", "Sign on Date", "Status"]);
        assert!(matches!(SheetLayout::from_header(&missing), Err(RosterError::Layout(_))));

        let id_not_first = cells(&["Name", "ID", "Rank", "Vessel", "Sign on Date", "Contract Days", "Status"]);
        assert!(matches!(SheetLayout::from_header(&id_not_first), Err(RosterError::Layout(_))));
    }

    #[test]
    fn extended_layout_writes_relief_date() {
        let layout = SheetLayout::from_header(&SheetLayout::default_header(true)).unwrap();
        let row = layout.encode(&sample(), &[]);
        assert_eq!(
            row,
            cells(&["4", "Ana Souza", "Master", "Nordic Star", "2024-01-01", "90", "2024-03-31", "On board"])
        );
        assert_eq!(layout.decode(&row).unwrap(), sample());
    }

    #[test]
    fn unknown_columns_are_preserved() {
        let header = cells(&["ID", "Name", "Notes", "Rank", "Vessel", "Sign on Date", "Contract Days", "Status"]);
        let layout = SheetLayout::from_header(&header).unwrap();
        let base = cells(&["4", "Old", "keep me", "Cook", "Aurora", "2023-01-01", "30", "On Leave"]);
        let row = layout.encode(&sample(), &base);
        assert_eq!(row[2], "keep me");
        assert_eq!(row[1], "Ana Souza");
    }

    #[test]
    fn decode_reports_bad_cells() {
        let layout = SheetLayout::from_header(&SheetLayout::default_header(false)).unwrap();
        let bad_date = cells(&["1", "Ana", "Cook", "Aurora", "soon", "30", "On board"]);
        assert!(layout.decode(&bad_date).unwrap_err().contains("invalid date"));
        let bad_days = cells(&["1", "Ana", "Cook", "Aurora", "2024-01-01", "30.5", "On board"]);
        assert!(layout.decode(&bad_days).unwrap_err().contains("contract days"));
        assert_eq!(layout.decode_id(&bad_days), Some(CrewId(1)));
    }
}
