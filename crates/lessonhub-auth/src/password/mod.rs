//! Password hashing and strength checking.

pub mod hasher;
pub mod strength;

pub use hasher::PasswordHasher;
pub use strength::check_strength;
