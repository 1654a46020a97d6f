//! Authentication primitives: Argon2id password hashing ([`password`])
//! and JWT access tokens plus hashed refresh tokens ([`jwt`]).

pub mod jwt;
pub mod password;
