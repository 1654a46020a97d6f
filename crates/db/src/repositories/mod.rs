//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Multi-step operations
//! (conversion, payment recording, conflict-checked booking) run inside
//! a single transaction.

mod filter;

pub mod appointment_repo;
pub mod charge_repo;
pub mod client_repo;
pub mod contract_repo;
pub mod dashboard_repo;
pub mod interaction_repo;
pub mod lead_repo;
pub mod payment_repo;
pub mod session_repo;
pub mod user_repo;

pub use appointment_repo::AppointmentRepo;
pub use charge_repo::ChargeRepo;
pub use client_repo::ClientRepo;
pub use contract_repo::ContractRepo;
pub use dashboard_repo::DashboardRepo;
pub use interaction_repo::InteractionRepo;
pub use lead_repo::LeadRepo;
pub use payment_repo::PaymentRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
