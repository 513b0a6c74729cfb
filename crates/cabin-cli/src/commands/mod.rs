pub mod odds;
pub mod simulate;
