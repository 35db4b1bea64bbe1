//! Auth-domain identifiers, scope lists, and the token/profile models.

pub mod id;
pub mod profile;
pub mod scope;
pub mod token;

pub use id::*;
pub use profile::*;
pub use scope::*;
pub use token::*;
