pub mod gift;
pub mod quiz;
pub mod suggestion;
