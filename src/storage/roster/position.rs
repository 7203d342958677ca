//! Logical roster position <-> physical sheet row.
//!
//! Logical positions are 0-based over data rows. Sheet rows are 1-based and
//! row 1 is the header, so physical = logical + 2.

use serde::Serialize;
use std::fmt;
use utoipa::ToSchema;

/// Number of header rows above the data.
pub const HEADER_ROWS: u32 = 1;

/// 1-based sheet indexing plus the header row.
pub const PHYSICAL_ROW_OFFSET: u32 = HEADER_ROWS + 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(transparent)]
pub struct RowPosition(pub u32);

impl RowPosition {
    pub fn logical(&self) -> u32 {
        self.0
    }

    pub fn physical(&self) -> u32 {
        self.0 + PHYSICAL_ROW_OFFSET
    }

    /// `None` for the header row (and row 0, which does not exist).
    pub fn from_physical(row: u32) -> Option<Self> {
        row.checked_sub(PHYSICAL_ROW_OFFSET).map(RowPosition)
    }
}

impl fmt::Display for RowPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}", self.physical())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn physical_row_is_logical_plus_two() {
        assert_eq!(RowPosition(0).physical(), 2);
        assert_eq!(RowPosition(5).physical(), 7);
    }

    #[test]
    fn header_row_has_no_position() {
        assert_eq!(RowPosition::from_physical(1), None);
        assert_eq!(RowPosition::from_physical(0), None);
        assert_eq!(RowPosition::from_physical(2), Some(RowPosition(0)));
    }
}
