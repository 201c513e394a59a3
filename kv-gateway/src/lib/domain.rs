pub mod data;
pub mod user;
