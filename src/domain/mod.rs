pub mod crew;
pub mod status;
pub mod views;
