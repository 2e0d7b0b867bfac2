//! # Repository Implementations
//!
//! One repository per aggregate. Repositories own SQL; they never make
//! business decisions (validation and arithmetic live in vantage-core, the
//! orchestration in vantage-engine).

pub mod activity;
pub mod contract;
pub mod employee;
pub mod intent;
pub mod sale;
pub mod service;
pub mod transaction;

/// Generates a new entity id (UUID v4 string).
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
