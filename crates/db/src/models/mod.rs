//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//! - Query structs for filtered list endpoints where applicable

pub mod appointment;
pub mod charge;
pub mod client;
pub mod contract;
pub mod dashboard;
pub mod interaction;
pub mod lead;
pub mod payment;
pub mod session;
pub mod user;
