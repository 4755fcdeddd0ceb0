//! Redacting wrappers for the signing key and issued bearer credentials.

// crates.io
use rand::Rng;
// self
use crate::{_prelude::*, error::ConfigError};

const RANDOM_KEY_LEN: usize = 32;

/// Process signing secret; bytes never appear in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey(Arc<[u8]>);
impl SigningKey {
	/// Wraps a secret, rejecting empty input.
	pub fn new(value: impl AsRef<[u8]>) -> Result<Self, ConfigError> {
		let bytes = value.as_ref();

		if bytes.is_empty() {
			return Err(ConfigError::EmptySecret);
		}

		Ok(Self(Arc::from(bytes)))
	}

	/// Generates a random 32-byte secret for tests and local development.
	pub fn random() -> Self {
		let mut bytes = [0_u8; RANDOM_KEY_LEN];

		rand::rng().fill(&mut bytes);

		Self(Arc::from(bytes.as_slice()))
	}

	/// Returns the raw key bytes. Callers must avoid logging them.
	pub fn expose(&self) -> &[u8] {
		&self.0
	}
}
impl<'de> Deserialize<'de> for SigningKey {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		let value = String::deserialize(deserializer)?;

		Self::new(value).map_err(serde::de::Error::custom)
	}
}
impl Debug for SigningKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("SigningKey").field(&"<redacted>").finish()
	}
}

/// Issued credential in compact form; formatting redacts the value.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BearerToken(String);
impl BearerToken {
	/// Scheme prefix expected in the `Authorization` header.
	pub const SCHEME_PREFIX: &'static str = "Bearer ";

	/// Wraps a compact credential string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the compact credential. Callers must avoid logging it.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Formats the `Authorization` header value for this credential.
	pub fn authorization_header(&self) -> String {
		format!("{}{}", Self::SCHEME_PREFIX, self.0)
	}
}
impl AsRef<str> for BearerToken {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for BearerToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("BearerToken").field(&"<redacted>").finish()
	}
}
impl Display for BearerToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
