/// Provider-specific quirks that influence how the authorization request is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProviderQuirks {
	/// Character used to join scopes when constructing the `scope` parameter.
	pub scope_delimiter: char,
	/// Appends `access_type=offline` to ask for a refresh token.
	///
	/// Providers that do not understand the hint ignore it.
	pub offline_access_hint: bool,
}
impl Default for ProviderQuirks {
	fn default() -> Self {
		Self { scope_delimiter: ' ', offline_access_hint: true }
	}
}
