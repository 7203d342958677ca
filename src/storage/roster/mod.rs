pub mod layout;
pub mod position;
pub mod snapshot;
pub mod store;

pub use layout::{Column, SheetLayout};
pub use position::{RowPosition, HEADER_ROWS, PHYSICAL_ROW_OFFSET};
pub use snapshot::{LoadedRow, RosterSnapshot};
pub use store::{IdentityScheme, RemovedRow, RosterStore, RosterStoreOptions};
