//! Request handlers for the back-office entities.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers validate input against the vocabularies in `atrio_core`,
//! delegate to the corresponding repository in `atrio_db`, and map
//! errors via [`crate::error::AppError`].

pub mod admin;
pub mod appointment;
pub mod auth;
pub mod billing;
pub mod client;
pub mod contract;
pub mod dashboard;
pub mod interaction;
pub mod lead;
