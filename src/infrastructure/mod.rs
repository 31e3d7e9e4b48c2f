pub mod connectivity;
pub mod database;
pub mod registry;
