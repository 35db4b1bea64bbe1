// self
use oauth2_login::{
	_preludet::*,
	auth::{ProviderId, TenantId},
	provider::{
		ClientAuthMethod, ProviderDescriptor, ProviderDescriptorBuilder, ProviderDescriptorError,
		ProviderQuirks, microsoft,
	},
};

fn url(value: &str) -> Url {
	Url::parse(value).expect("Failed to parse mock provider URL.")
}

fn builder(id: &str) -> ProviderDescriptorBuilder {
	let provider_id =
		ProviderId::new(id).expect("Failed to build provider identifier for mock descriptor.");

	ProviderDescriptor::builder(provider_id)
}

#[test]
fn descriptor_rejects_missing_and_insecure_endpoints() {
	let err = builder("mock-missing")
		.authorization_endpoint(url("https://example.com/auth"))
		.token_endpoint(url("https://example.com/token"))
		.build()
		.expect_err("Descriptor builder should reject a missing profile endpoint.");

	assert_eq!(err, ProviderDescriptorError::MissingProfileEndpoint);

	let err = builder("mock-insecure")
		.authorization_endpoint(url("https://example.com/auth"))
		.token_endpoint(url("http://example.com/token"))
		.profile_endpoint(url("https://example.com/me"))
		.build()
		.expect_err("Descriptor builder should reject insecure token endpoints.");

	assert!(matches!(err, ProviderDescriptorError::InsecureEndpoint { endpoint: "token", .. }));
}

#[test]
fn descriptor_defaults_cover_quirks() {
	let descriptor = builder("defaults")
		.authorization_endpoint(url("https://example.com/auth"))
		.token_endpoint(url("https://example.com/token"))
		.profile_endpoint(url("https://example.com/me"))
		.build()
		.expect("Descriptor builder should succeed for secure endpoints.");

	assert_eq!(descriptor.preferred_client_auth_method, ClientAuthMethod::ClientSecretBasic);
	assert_eq!(descriptor.quirks.scope_delimiter, ' ');
	assert!(descriptor.quirks.offline_access_hint);
}

#[test]
fn custom_quirks_are_validated() {
	let quirks = ProviderQuirks { scope_delimiter: '\t', ..ProviderQuirks::default() };
	let err = builder("tabbed")
		.authorization_endpoint(url("https://example.com/auth"))
		.token_endpoint(url("https://example.com/token"))
		.profile_endpoint(url("https://example.com/me"))
		.quirks(quirks)
		.build()
		.expect_err("Control characters must not delimit scopes.");

	assert_eq!(err, ProviderDescriptorError::InvalidScopeDelimiter { delimiter: '\t' });
}

#[test]
fn microsoft_preset_posts_client_credentials() {
	let descriptor = microsoft::descriptor(
		&url(microsoft::DEFAULT_AUTHORITY),
		&TenantId::new("organizations").expect("Tenant fixture should be valid."),
		url(microsoft::DEFAULT_PROFILE_URL),
	)
	.expect("Microsoft preset should build.");

	assert_eq!(descriptor.preferred_client_auth_method, ClientAuthMethod::ClientSecretPost);
	assert_eq!(
		descriptor.endpoints.authorization.as_str(),
		"https://login.microsoftonline.com/organizations/oauth2/v2.0/authorize"
	);
}

#[test]
fn test_descriptor_accepts_loopback_mock_servers() {
	let descriptor = test_descriptor("http://127.0.0.1:18080/");

	assert_eq!(descriptor.endpoints.token.as_str(), "http://127.0.0.1:18080/token");
	assert_eq!(descriptor.endpoints.profile.as_str(), "http://127.0.0.1:18080/me");
}
