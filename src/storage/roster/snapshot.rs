//! One full read of the roster sheet.
//!
//! Positions inside a snapshot are only valid until the next structural
//! write (append/delete) to the sheet.

use crate::domain::crew::{CrewId, CrewRecord, RecordKey};
use crate::domain::status::SkippedRecord;
use crate::error::{LookupError, RosterError};
use crate::storage::roster::layout::SheetLayout;
use crate::storage::roster::position::RowPosition;

/// A data row as read, decoded when possible.
#[derive(Debug, Clone)]
pub struct LoadedRow {
    pub position: RowPosition,
    pub id: Option<CrewId>,
    pub cells: Vec<String>,
    pub record: Result<CrewRecord, String>,
}

impl LoadedRow {
    /// The decoded record, or `MalformedRow` naming the physical row.
    pub fn decoded(&self) -> Result<&CrewRecord, RosterError> {
        self.record.as_ref().map_err(|reason| RosterError::MalformedRow {
            row: self.position.physical(),
            reason: reason.clone(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct RosterSnapshot {
    layout: SheetLayout,
    total_rows: usize,
    rows: Vec<LoadedRow>,
}

impl RosterSnapshot {
    /// Decodes `values` (header first). An empty sheet is not valid here;
    /// callers initialise the header before loading.
    pub fn from_values(values: Vec<Vec<String>>) -> Result<Self, RosterError> {
        let total_rows = values.len();
        let mut iter = values.into_iter();
        let header = iter
            .next()
            .ok_or_else(|| RosterError::Layout("sheet has no header row".to_string()))?;
        let layout = SheetLayout::from_header(&header)?;

        let rows = iter
            .enumerate()
            .map(|(idx, cells)| {
                let position = RowPosition(idx as u32);
                let record = layout.decode(&cells);
                if let Err(reason) = &record {
                    tracing::warn!(row = position.physical(), %reason, "undecodable roster row");
                }
                LoadedRow {
                    position,
                    id: layout.decode_id(&cells),
                    cells,
                    record,
                }
            })
            .collect();

        Ok(Self {
            layout,
            total_rows,
            rows,
        })
    }

    pub fn layout(&self) -> &SheetLayout {
        &self.layout
    }

    /// Rows in the sheet including the header.
    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    pub fn rows(&self) -> &[LoadedRow] {
        &self.rows
    }

    /// Decoded records in store order.
    pub fn records(&self) -> Vec<CrewRecord> {
        self.rows
            .iter()
            .filter_map(|r| r.record.as_ref().ok().cloned())
            .collect()
    }

    /// Rows that failed to decode.
    pub fn rejects(&self) -> Vec<SkippedRecord> {
        self.rows
            .iter()
            .filter_map(|r| {
                r.record.as_ref().err().map(|reason| SkippedRecord {
                    row: Some(r.position.physical()),
                    id: r.id,
                    reason: reason.clone(),
                })
            })
            .collect()
    }

    pub fn max_id(&self) -> Option<CrewId> {
        self.rows.iter().filter_map(|r| r.id).max()
    }

    /// Finds the single row addressed by `key`.
    pub fn resolve(&self, key: &RecordKey) -> Result<&LoadedRow, LookupError> {
        let matches: Vec<&LoadedRow> = match key {
            RecordKey::Id(id) => self.rows.iter().filter(|r| r.id == Some(*id)).collect(),
            RecordKey::Name(name) => {
                let wanted = name.trim();
                self.rows
                    .iter()
                    .filter(|r| self.layout.decode_name(&r.cells) == wanted)
                    .collect()
            }
        };

        match matches.as_slice() {
            [] => Err(LookupError::NotFound(key.clone())),
            [row] => Ok(*row),
            many => Err(LookupError::Ambiguous {
                key: key.clone(),
                count: many.len(),
            }),
        }
    }

    /// Position of the record with `id`, if unique.
    pub fn position_of(&self, id: CrewId) -> Result<RowPosition, LookupError> {
        self.resolve(&RecordKey::Id(id)).map(|r| r.position)
    }
}
