pub mod deriver;

pub use deriver::{
    derive_status, derive_statuses, SkippedRecord, StatusChange, SweepReport,
    DEFAULT_WARNING_DAYS,
};
