//! HTTP API for population records: routing, auth and response mapping.

pub mod app;
pub mod authz;
pub mod context;
pub mod middleware;
