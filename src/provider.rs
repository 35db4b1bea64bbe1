//! Provider-facing descriptors.
//!
//! `descriptor` exposes validated metadata ([`ProviderDescriptor`]) covering the authorization,
//! token, and profile endpoints, the client authentication preference, and provider quirks.
//! `microsoft` builds the descriptor for the Microsoft identity platform.

pub mod descriptor;
pub mod microsoft;

pub use descriptor::*;
