//! Infrastructure layer: repositories, application services, fee
//! recalculation and configuration.

pub mod config;
pub mod fees;
pub mod repository;
pub mod services;
pub mod worker;
