pub mod roster_service;
pub mod sweeper;
