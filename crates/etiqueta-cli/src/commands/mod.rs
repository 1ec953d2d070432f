pub mod build;
pub mod extract;
pub mod profiles;
pub mod sheet;
