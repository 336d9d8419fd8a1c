//! Authentication primitives.
//!
//! - [`jwt`] -- JWT access-token generation and validation.
//!
//! Users and passwords are managed by the identity provider; this service
//! only verifies the bearer tokens it issues.

pub mod jwt;
