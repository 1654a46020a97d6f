//! Well-known role name constants.
//!
//! Roles are stored as TEXT on the `users` row and carried in JWT claims.
//! `admin` manages users and billing sweeps, `manager` additionally owns
//! destructive operations (deletes, archival), `agent` works the pipeline.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_AGENT: &str = "agent";

/// All roles accepted on user creation and update.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_MANAGER, ROLE_AGENT];

/// Check whether a role name is one of the known roles.
pub fn is_valid_role(role: &str) -> bool {
    VALID_ROLES.contains(&role)
}
