//! HMAC signing algorithms accepted for credentials.

// crates.io
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};
// self
use crate::{_prelude::*, error::ConfigError};

/// Symmetric signing algorithm pinned by a [`TokenService`](crate::token::TokenService).
///
/// Only the HMAC family is representable, so a header declaring `none` or an asymmetric
/// algorithm can never be matched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
	/// HMAC with SHA-256.
	#[default]
	#[serde(rename = "HS256")]
	Hs256,
	/// HMAC with SHA-384.
	#[serde(rename = "HS384")]
	Hs384,
	/// HMAC with SHA-512.
	#[serde(rename = "HS512")]
	Hs512,
}
impl Algorithm {
	/// Returns the JOSE `alg` label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Algorithm::Hs256 => "HS256",
			Algorithm::Hs384 => "HS384",
			Algorithm::Hs512 => "HS512",
		}
	}

	/// Computes the MAC over `message`; `None` only if the key is rejected by the primitive.
	pub(crate) fn sign(self, key: &[u8], message: &[u8]) -> Option<Vec<u8>> {
		match self {
			Algorithm::Hs256 =>
				mac::<Hmac<Sha256>>(key, message).map(|m| m.finalize().into_bytes().to_vec()),
			Algorithm::Hs384 =>
				mac::<Hmac<Sha384>>(key, message).map(|m| m.finalize().into_bytes().to_vec()),
			Algorithm::Hs512 =>
				mac::<Hmac<Sha512>>(key, message).map(|m| m.finalize().into_bytes().to_vec()),
		}
	}

	/// Checks `signature` against the MAC of `message` in constant time.
	pub(crate) fn verify(self, key: &[u8], message: &[u8], signature: &[u8]) -> bool {
		match self {
			Algorithm::Hs256 =>
				mac::<Hmac<Sha256>>(key, message).is_some_and(|m| m.verify_slice(signature).is_ok()),
			Algorithm::Hs384 =>
				mac::<Hmac<Sha384>>(key, message).is_some_and(|m| m.verify_slice(signature).is_ok()),
			Algorithm::Hs512 =>
				mac::<Hmac<Sha512>>(key, message).is_some_and(|m| m.verify_slice(signature).is_ok()),
		}
	}
}
impl Display for Algorithm {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for Algorithm {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"HS256" => Ok(Algorithm::Hs256),
			"HS384" => Ok(Algorithm::Hs384),
			"HS512" => Ok(Algorithm::Hs512),
			_ => Err(ConfigError::UnsupportedAlgorithm { name: s.to_owned() }),
		}
	}
}

fn mac<M>(key: &[u8], message: &[u8]) -> Option<M>
where
	M: Mac + hmac::digest::KeyInit,
{
	let mut mac = <M as Mac>::new_from_slice(key).ok()?;

	mac.update(message);

	Some(mac)
}
