//! Signed credential service: issues compact HMAC-signed credentials and verifies them back
//! into [`Claims`].
//!
//! Verification runs in a fixed order so that nothing inside the credential is trusted before
//! its signature is: structural parse, algorithm pin plus signature, expiry, then claim
//! usability.

pub mod algorithm;

mod codec;

pub use algorithm::*;

// self
use crate::{
	_prelude::*,
	auth::{BearerToken, Claims, Role, SigningKey, Subject},
	clock::Clock,
	error::ConfigError,
	token::codec::{Header, WireClaims},
};

/// Errors raised while issuing a credential.
#[derive(Debug, ThisError)]
pub enum IssueError {
	/// Issuance instant plus the validity window does not fit a timestamp.
	#[error("Credential expiry is out of the supported range.")]
	ExpiryOutOfRange,
	/// Claims could not be encoded.
	#[error("Credential claims could not be encoded.")]
	Encoding(#[from] serde_json::Error),
	/// The signing primitive rejected the key.
	#[error("Signing key was rejected by {algorithm}.")]
	Signing {
		/// Algorithm that rejected the key.
		algorithm: Algorithm,
	},
}

/// Reasons a credential fails verification, in the order they are checked.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum VerificationError {
	/// The credential could not be parsed.
	#[error("Credential is malformed: {reason}.")]
	Malformed {
		/// Parse failure detail; for logs only.
		reason: String,
	},
	/// The declared algorithm is not the pinned one, or the signature does not match.
	#[error("Credential signature is invalid.")]
	InvalidSignature,
	/// The expiry instant has been reached.
	#[error("Credential has expired.")]
	Expired,
	/// The signature is valid but the claims are unusable.
	#[error("Credential claims are invalid: {reason}.")]
	InvalidClaims {
		/// Which claim was unusable.
		reason: &'static str,
	},
}
impl VerificationError {
	pub(crate) fn malformed(reason: impl Into<String>) -> Self {
		Self::Malformed { reason: reason.into() }
	}

	/// Returns `true` for [`VerificationError::Expired`].
	pub fn is_expired(&self) -> bool {
		matches!(self, Self::Expired)
	}
}

/// Issues and verifies credentials under one signing key and pinned algorithm.
#[derive(Clone)]
pub struct TokenService {
	key: SigningKey,
	algorithm: Algorithm,
	validity: Duration,
	clock: Arc<dyn Clock>,
}
impl TokenService {
	/// Validity window applied when none is configured.
	pub const DEFAULT_VALIDITY: Duration = Duration::hours(24);

	/// Creates a service signing with HS256 and a 24 hour validity window.
	pub fn new(key: SigningKey, clock: Arc<dyn Clock>) -> Self {
		Self { key, algorithm: Algorithm::default(), validity: Self::DEFAULT_VALIDITY, clock }
	}

	/// Pins a different HMAC algorithm for both issuance and verification.
	pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
		self.algorithm = algorithm;

		self
	}

	/// Overrides the validity window; it must span at least one whole second.
	pub fn with_validity(mut self, validity: Duration) -> Result<Self, ConfigError> {
		if validity.whole_seconds() < 1 {
			return Err(ConfigError::NonPositiveValidity);
		}

		self.validity = validity;

		Ok(self)
	}

	/// Pinned signing algorithm.
	pub fn algorithm(&self) -> Algorithm {
		self.algorithm
	}

	/// Configured validity window.
	pub fn validity(&self) -> Duration {
		self.validity
	}

	/// Issues a credential for `subject` with `role`, valid from now for the configured window.
	pub fn issue(&self, subject: &Subject, role: Role) -> Result<BearerToken, IssueError> {
		let issued_at = self.clock.now().unix_timestamp();
		let expires_at = issued_at
			.checked_add(self.validity.whole_seconds())
			.filter(|exp| OffsetDateTime::from_unix_timestamp(*exp).is_ok())
			.ok_or(IssueError::ExpiryOutOfRange)?;
		let claims = WireClaims {
			user_id: subject.to_string(),
			user_type: role.as_str().to_owned(),
			iat: Some(issued_at),
			exp: Some(expires_at),
		};
		let input = codec::signing_input(&Header::new(self.algorithm.as_str()), &claims)?;
		let signature = self
			.algorithm
			.sign(self.key.expose(), input.as_bytes())
			.ok_or(IssueError::Signing { algorithm: self.algorithm })?;

		Ok(BearerToken::new(codec::attach_signature(input, &signature)))
	}

	/// Verifies a compact credential and returns its claims.
	pub fn verify(&self, token: &str) -> Result<Claims, VerificationError> {
		let parsed = codec::parse(token)?;

		if parsed.header.alg != self.algorithm.as_str() {
			return Err(VerificationError::InvalidSignature);
		}

		let signature =
			codec::decode_signature(parsed.signature).ok_or(VerificationError::InvalidSignature)?;

		if !self.algorithm.verify(self.key.expose(), parsed.signing_input.as_bytes(), &signature) {
			return Err(VerificationError::InvalidSignature);
		}

		let claims = parsed.claims;

		if let Some(exp) = claims.exp
			&& self.clock.now().unix_timestamp_nanos() >= i128::from(exp) * 1_000_000_000
		{
			return Err(VerificationError::Expired);
		}

		validate_claims(claims)
	}
}
impl Debug for TokenService {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenService")
			.field("key", &self.key)
			.field("algorithm", &self.algorithm)
			.field("validity", &self.validity)
			.finish()
	}
}

fn validate_claims(claims: WireClaims) -> Result<Claims, VerificationError> {
	let invalid = |reason| VerificationError::InvalidClaims { reason };
	let subject = Subject::new(claims.user_id).map_err(|_| invalid("subject"))?;
	let role = claims.user_type.parse::<Role>().map_err(|_| invalid("role"))?;
	let issued_at = claims
		.iat
		.and_then(|iat| OffsetDateTime::from_unix_timestamp(iat).ok())
		.ok_or_else(|| invalid("issued-at"))?;
	let expires_at = claims
		.exp
		.and_then(|exp| OffsetDateTime::from_unix_timestamp(exp).ok())
		.ok_or_else(|| invalid("expiry"))?;

	if expires_at <= issued_at {
		return Err(invalid("validity window"));
	}

	Ok(Claims { subject, role, issued_at, expires_at })
}
