//! Auth-domain identifiers, roles, claims, and secrets.

pub mod claims;
pub mod role;
pub mod secret;
pub mod subject;

pub use claims::*;
pub use role::*;
pub use secret::*;
pub use subject::*;
