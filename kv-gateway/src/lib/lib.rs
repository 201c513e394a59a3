pub mod app;
pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod telemetry;

pub use domain::data;
pub use domain::user;
pub use outbound::repositories;
pub use outbound::storage;
