//! Authorization primitives shared by the GraphQL layer and actions.

pub mod errors;

pub use errors::AuthError;
