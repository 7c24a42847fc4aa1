pub mod club;
pub mod config;
pub mod coverage;
pub mod error;
pub mod session;
pub mod telemetry;
