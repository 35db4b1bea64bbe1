//! Access token model returned by the token endpoint and echoed back to the browser.

// crates.io
use serde::Serializer;
use time::format_description::well_known::Rfc3339;
// self
use crate::_prelude::*;

/// Redacted secret wrapper keeping token material out of logs.
///
/// `Debug` and `Display` never print the value; serialization does, because the callback
/// response hands the token to its caller.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Token issued for one callback request; never persisted.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Token {
	/// Access token presented as a bearer credential.
	pub access_token: TokenSecret,
	/// Token type reported by the provider (`Bearer` in practice).
	pub token_type: String,
	/// Refresh token, when the provider honored the offline-access hint.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub refresh_token: Option<TokenSecret>,
	/// Absolute expiry derived from `expires_in` at exchange time.
	#[serde(default, skip_serializing_if = "Option::is_none", serialize_with = "rfc3339_option::serialize")]
	pub expiry: Option<OffsetDateTime>,
}
impl Token {
	/// Creates a bearer token without refresh token or expiry.
	pub fn bearer(access_token: impl Into<String>) -> Self {
		Self {
			access_token: TokenSecret::new(access_token),
			token_type: "Bearer".into(),
			refresh_token: None,
			expiry: None,
		}
	}

	/// Attaches a refresh token.
	pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
		self.refresh_token = Some(TokenSecret::new(refresh_token));

		self
	}

	/// Sets the absolute expiry instant.
	pub fn with_expiry(mut self, expiry: OffsetDateTime) -> Self {
		self.expiry = Some(expiry);

		self
	}
}
impl Debug for Token {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Token")
			.field("access_token", &"<redacted>")
			.field("token_type", &self.token_type)
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("expiry", &self.expiry)
			.finish()
	}
}

mod rfc3339_option {
	// self
	use super::*;

	pub(super) fn serialize<S>(value: &Option<OffsetDateTime>, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		match value {
			Some(instant) => {
				let formatted = instant.format(&Rfc3339).map_err(serde::ser::Error::custom)?;

				serializer.serialize_some(&formatted)
			},
			None => serializer.serialize_none(),
		}
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn formatters_redact_secrets() {
		let token = Token::bearer("super-secret").with_refresh_token("also-secret");
		let rendered = format!("{token:?}");

		assert!(!rendered.contains("super-secret"));
		assert!(!rendered.contains("also-secret"));
		assert_eq!(format!("{}", token.access_token), "<redacted>");
	}

	#[test]
	fn serializes_as_nested_object() {
		let token = Token::bearer("access")
			.with_refresh_token("refresh")
			.with_expiry(macros::datetime!(2025-01-01 01:00 UTC));
		let value = serde_json::to_value(&token).expect("Token should serialize.");

		assert_eq!(
			value,
			serde_json::json!({
				"access_token": "access",
				"token_type": "Bearer",
				"refresh_token": "refresh",
				"expiry": "2025-01-01T01:00:00Z",
			})
		);
	}

	#[test]
	fn optional_fields_are_omitted() {
		let value = serde_json::to_value(Token::bearer("access")).expect("Token should serialize.");

		assert_eq!(value, serde_json::json!({ "access_token": "access", "token_type": "Bearer" }));
	}
}
