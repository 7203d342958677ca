pub mod router;
pub mod types;
pub mod handlers {
    pub mod common;
    pub mod crew;
    pub mod health;
    pub mod roster;
}

pub use router::{create_router, ApiDoc};
pub use types::AppState;
