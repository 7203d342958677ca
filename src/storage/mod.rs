pub mod roster;
pub mod sheet;
