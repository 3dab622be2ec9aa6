//! Auth domain - verification of the session tokens issued by the frontend
//!
//! The frontend signs HS256 tokens with the shared `JWT_SECRET`; this service
//! only verifies them (token creation is kept for tests and tooling).

pub mod jwt;

pub use jwt::{Claims, JwtService};
