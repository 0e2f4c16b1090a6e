//! # lessonhub-auth
//!
//! JWT token issuance/validation and Argon2 password hashing. The rest of
//! the application trusts the role claim on a validated token verbatim.

pub mod jwt;
pub mod password;
