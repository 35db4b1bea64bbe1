//! Schema-less user profile returned by the provider.

// std
use std::ops::Deref;
// crates.io
use serde_json::{Map, Value};
// self
use crate::{_prelude::*, error::DecodeError};

/// Open mapping from profile keys to arbitrary JSON values, kept exactly as the provider sent it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserProfile(pub Map<String, Value>);
impl UserProfile {
	/// Decodes a profile body, which must be a JSON object.
	pub fn from_slice(body: &[u8]) -> Result<Self, DecodeError> {
		let mut de = serde_json::Deserializer::from_slice(body);
		let profile =
			serde_path_to_error::deserialize(&mut de).map_err(|source| DecodeError { source })?;

		Ok(profile)
	}

	/// Looks up a top-level profile attribute.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.0.get(key)
	}

	/// Best-effort display name (`displayName`, then `name`), used for log fields.
	pub fn display_name(&self) -> Option<&str> {
		["displayName", "name"].into_iter().find_map(|key| self.get(key).and_then(Value::as_str))
	}
}
impl Deref for UserProfile {
	type Target = Map<String, Value>;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn decodes_arbitrary_objects_verbatim() {
		let profile = UserProfile::from_slice(
			br#"{"displayName":"Alice","businessPhones":[],"officeLocation":null,"age":42}"#,
		)
		.expect("Object bodies should decode.");

		assert_eq!(profile.display_name(), Some("Alice"));
		assert_eq!(profile.len(), 4);
		assert_eq!(profile.get("officeLocation"), Some(&Value::Null));
	}

	#[test]
	fn rejects_malformed_and_non_object_bodies() {
		assert!(UserProfile::from_slice(b"{\"displayName\":").is_err());
		assert!(UserProfile::from_slice(b"<html></html>").is_err());
		assert!(UserProfile::from_slice(b"[1,2,3]").is_err());
	}

	#[test]
	fn falls_back_to_name_claim() {
		let profile =
			UserProfile::from_slice(br#"{"name":"Bob"}"#).expect("Object bodies should decode.");

		assert_eq!(profile.display_name(), Some("Bob"));
	}
}
