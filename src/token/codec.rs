//! JWS compact serialization for credentials: `header.claims.signature`, each segment
//! base64url without padding.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
// self
use crate::{_prelude::*, token::VerificationError};

const TOKEN_TYPE: &str = "JWT";

/// JOSE header as found on the wire.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Header {
	pub(crate) alg: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub(crate) typ: Option<String>,
}
impl Header {
	pub(crate) fn new(alg: &str) -> Self {
		Self { alg: alg.to_owned(), typ: Some(TOKEN_TYPE.to_owned()) }
	}
}

/// Claims payload as found on the wire.
///
/// Every field tolerates absence so that a well-formed but unusable payload surfaces as
/// invalid claims instead of a parse failure.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct WireClaims {
	#[serde(default)]
	pub(crate) user_id: String,
	#[serde(default)]
	pub(crate) user_type: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub(crate) iat: Option<i64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub(crate) exp: Option<i64>,
}

/// Structurally parsed credential; nothing in it is trusted until the signature checks out.
///
/// The signature segment stays encoded: any damage to it is a signature failure, not a
/// structural one.
#[derive(Debug)]
pub(crate) struct Parsed<'a> {
	pub(crate) header: Header,
	pub(crate) claims: WireClaims,
	pub(crate) signing_input: &'a str,
	pub(crate) signature: &'a str,
}

/// Encodes the unsigned `header.claims` prefix.
pub(crate) fn signing_input(header: &Header, claims: &WireClaims) -> serde_json::Result<String> {
	let header = URL_SAFE_NO_PAD.encode(serde_json::to_vec(header)?);
	let claims = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims)?);

	Ok(format!("{header}.{claims}"))
}

/// Appends the encoded signature segment.
pub(crate) fn attach_signature(signing_input: String, signature: &[u8]) -> String {
	let mut token = signing_input;

	token.push('.');
	token.push_str(&URL_SAFE_NO_PAD.encode(signature));

	token
}

/// Splits and decodes a compact credential.
///
/// Everything after the second dot is the signature segment, so stray dots there fail the
/// signature check rather than the structural one.
pub(crate) fn parse(token: &str) -> Result<Parsed<'_>, VerificationError> {
	let mut segments = token.splitn(3, '.');
	let (Some(header), Some(claims), Some(signature)) =
		(segments.next(), segments.next(), segments.next())
	else {
		return Err(VerificationError::malformed("expected three dot-separated segments"));
	};
	let signing_input = &token[..header.len() + 1 + claims.len()];
	let header = decode_json::<Header>(header, "header")?;
	let claims = decode_json::<WireClaims>(claims, "claims")?;

	Ok(Parsed { header, claims, signing_input, signature })
}

/// Decodes the signature segment; `None` if it is not canonical base64url.
pub(crate) fn decode_signature(segment: &str) -> Option<Vec<u8>> {
	URL_SAFE_NO_PAD.decode(segment).ok()
}

fn decode_json<T>(segment: &str, label: &str) -> Result<T, VerificationError>
where
	T: for<'de> Deserialize<'de>,
{
	let bytes = URL_SAFE_NO_PAD
		.decode(segment)
		.map_err(|e| VerificationError::malformed(format!("{label} segment: {e}")))?;
	let mut deserializer = serde_json::Deserializer::from_slice(&bytes);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|e| VerificationError::malformed(format!("{label} segment: {e}")))
}
