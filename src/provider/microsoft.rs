//! Microsoft identity platform (Entra ID v2.0 endpoints) preset.

// self
use crate::{
	_prelude::*,
	auth::{ProviderId, TenantId},
	provider::{ClientAuthMethod, ProviderDescriptor, ProviderDescriptorError},
};

/// Public-cloud authority host.
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";
/// Microsoft Graph endpoint describing the signed-in user.
pub const DEFAULT_PROFILE_URL: &str = "https://graph.microsoft.com/v1.0/me";
/// Scopes requested when none are configured: Graph profile read, OpenID identity, email, and
/// basic profile.
pub const DEFAULT_SCOPES: [&str; 4] = ["User.Read", "profile", "openid", "email"];

/// Builds the descriptor for `tenant` under `authority`.
///
/// Endpoints resolve to `{authority}/{tenant}/oauth2/v2.0/{authorize,token}`. The token
/// endpoint authenticates the client with form parameters (`client_secret_post`).
pub fn descriptor(
	authority: &Url,
	tenant: &TenantId,
	profile: Url,
) -> Result<ProviderDescriptor, ProviderDescriptorError> {
	ProviderDescriptor::builder(ProviderId::new("microsoft")?)
		.authorization_endpoint(tenant_endpoint(authority, tenant, "authorize", "authorization")?)
		.token_endpoint(tenant_endpoint(authority, tenant, "token", "token")?)
		.profile_endpoint(profile)
		.preferred_client_auth_method(ClientAuthMethod::ClientSecretPost)
		.build()
}

fn tenant_endpoint(
	authority: &Url,
	tenant: &TenantId,
	leaf: &str,
	endpoint: &'static str,
) -> Result<Url, ProviderDescriptorError> {
	let base = authority.as_str().trim_end_matches('/');

	Url::parse(&format!("{base}/{tenant}/oauth2/v2.0/{leaf}"))
		.map_err(|source| ProviderDescriptorError::InvalidEndpoint { endpoint, source })
}
