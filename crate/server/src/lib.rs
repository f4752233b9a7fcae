pub mod config;
pub mod core;
pub mod error;
pub mod result;
pub mod routes;
pub mod start_server;
pub mod telemetry;

#[cfg(test)]
mod tests;
