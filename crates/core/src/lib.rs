//! Domain logic shared by the data and API layers.
//!
//! This crate has zero internal dependencies and no database dependency:
//! status vocabularies, transition tables, the appointment overlap rule,
//! and the common error taxonomy all live here so the repository and
//! handler layers agree on one definition of each.

pub mod billing;
pub mod client;
pub mod error;
pub mod interaction;
pub mod lead;
pub mod pagination;
pub mod roles;
pub mod scheduling;
pub mod types;
