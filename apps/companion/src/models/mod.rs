pub mod profile;
pub mod quiz;
