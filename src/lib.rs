pub mod app;
pub mod domain;
pub mod error;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::roster_service::{RosterEntry, RosterListing, RosterService};
pub use domain::crew::{CrewDraft, CrewId, CrewPatch, CrewRecord, CrewStatus, RecordKey};
pub use domain::status::{derive_status, derive_statuses, SweepReport};
pub use error::{LookupError, RosterError, RosterResult};
pub use infra::config::AppConfig;
pub use storage::roster::{IdentityScheme, RosterStore, RosterStoreOptions};
pub use storage::sheet::{MemorySheet, PostgresSheet, SheetBackend, SheetError};
