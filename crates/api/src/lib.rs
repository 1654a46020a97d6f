//! HTTP API for the Atrio back office.
//!
//! Exposes the REST surface over the repositories in `atrio-db`: auth and
//! user administration, the lead pipeline (including conversion to
//! clients), the appointment calendar with double-booking protection,
//! contracts and billing, interaction logging, and dashboard rollups.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
