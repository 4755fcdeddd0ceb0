//! Per-request decision values and the denial taxonomy.

// self
use crate::{
	_prelude::*,
	auth::{Role, Subject},
	obs::DecisionOutcome,
	token::VerificationError,
};

/// Why a request carried no usable identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Unauthenticated {
	/// No `Authorization` header, or an empty one.
	MissingCredential,
	/// The header does not use the `Bearer ` scheme.
	MalformedHeader,
	/// The credential failed verification.
	Verification(VerificationError),
}
impl Unauthenticated {
	/// Returns `true` if the credential was genuine but has expired.
	pub fn is_expired(&self) -> bool {
		matches!(self, Self::Verification(e) if e.is_expired())
	}

	/// User-facing message.
	///
	/// Structural, signature, and claim failures all read "Invalid token." so responses give
	/// a forger nothing to iterate on; only expiry is called out.
	pub fn message(&self) -> &'static str {
		match self {
			Self::MissingCredential => "No authorization header.",
			Self::MalformedHeader => "Invalid authorization header format.",
			Self::Verification(VerificationError::Expired) => "Token expired.",
			Self::Verification(_) => "Invalid token.",
		}
	}

	/// Precise failure kind, for logs and response-code selection.
	pub fn kind(&self) -> DenialKind {
		match self {
			Self::MissingCredential => DenialKind::MissingCredential,
			Self::MalformedHeader | Self::Verification(VerificationError::Malformed { .. }) =>
				DenialKind::MalformedCredential,
			Self::Verification(VerificationError::InvalidSignature) => DenialKind::InvalidSignature,
			Self::Verification(VerificationError::Expired) => DenialKind::ExpiredCredential,
			Self::Verification(VerificationError::InvalidClaims { .. }) => DenialKind::InvalidClaims,
		}
	}
}
impl Display for Unauthenticated {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.message())
	}
}

/// Terminal outcome of [`AccessGate::evaluate`](crate::gate::AccessGate::evaluate).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccessDecision {
	/// The request may proceed as `subject` with `role`.
	Allowed {
		/// Verified caller.
		subject: Subject,
		/// Verified role.
		role: Role,
	},
	/// The client exceeded its request budget; no credential work was done.
	DeniedRateLimited,
	/// No usable identity.
	DeniedUnauthenticated(Unauthenticated),
	/// Verified identity lacking the required role.
	DeniedForbidden {
		/// Role the endpoint requires.
		required: Role,
	},
}
impl AccessDecision {
	/// Returns `true` for [`AccessDecision::Allowed`].
	pub fn is_allowed(&self) -> bool {
		matches!(self, Self::Allowed { .. })
	}

	/// Denial kind, or `None` when allowed.
	pub fn denial_kind(&self) -> Option<DenialKind> {
		match self {
			Self::Allowed { .. } => None,
			Self::DeniedRateLimited => Some(DenialKind::RateLimited),
			Self::DeniedUnauthenticated(reason) => Some(reason.kind()),
			Self::DeniedForbidden { .. } => Some(DenialKind::InsufficientRole),
		}
	}

	/// User-facing message for denials.
	pub fn message(&self) -> Option<&'static str> {
		match self {
			Self::Allowed { .. } => None,
			Self::DeniedRateLimited => Some("Too many requests."),
			Self::DeniedUnauthenticated(reason) => Some(reason.message()),
			Self::DeniedForbidden { required: Role::Staff } => Some("Staff access required."),
			Self::DeniedForbidden { required: Role::Public } => Some("Public access required."),
		}
	}

	/// Coarse outcome label for metrics.
	pub fn outcome(&self) -> DecisionOutcome {
		match self {
			Self::Allowed { .. } => DecisionOutcome::Allowed,
			Self::DeniedRateLimited => DecisionOutcome::RateLimited,
			Self::DeniedUnauthenticated(_) => DecisionOutcome::Unauthenticated,
			Self::DeniedForbidden { .. } => DecisionOutcome::Forbidden,
		}
	}
}

/// Flat denial taxonomy.
///
/// `RateLimited` is transient and tells the caller to back off; every other kind is terminal for
/// the request. None is retried inside the gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DenialKind {
	/// Request budget exhausted.
	RateLimited,
	/// No credential presented.
	MissingCredential,
	/// Header or credential could not be parsed.
	MalformedCredential,
	/// Algorithm mismatch or bad signature.
	InvalidSignature,
	/// Credential past its expiry.
	ExpiredCredential,
	/// Credential claims unusable.
	InvalidClaims,
	/// Role does not satisfy the endpoint.
	InsufficientRole,
}
impl DenialKind {
	/// Returns a stable label suitable for log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			DenialKind::RateLimited => "rate_limited",
			DenialKind::MissingCredential => "missing_credential",
			DenialKind::MalformedCredential => "malformed_credential",
			DenialKind::InvalidSignature => "invalid_signature",
			DenialKind::ExpiredCredential => "expired_credential",
			DenialKind::InvalidClaims => "invalid_claims",
			DenialKind::InsufficientRole => "insufficient_role",
		}
	}

	/// Returns `true` if retrying later may succeed without new credentials.
	pub const fn is_transient(self) -> bool {
		matches!(self, DenialKind::RateLimited)
	}
}
impl Display for DenialKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn signature_and_claims_failures_share_a_message() {
		let signature = Unauthenticated::Verification(VerificationError::InvalidSignature);
		let claims =
			Unauthenticated::Verification(VerificationError::InvalidClaims { reason: "role" });
		let malformed = Unauthenticated::Verification(VerificationError::malformed("segments"));

		assert_eq!(signature.message(), "Invalid token.");
		assert_eq!(claims.message(), signature.message());
		assert_eq!(malformed.message(), signature.message());
		assert_ne!(signature.kind(), claims.kind());
	}

	#[test]
	fn expiry_is_surfaced_distinctly() {
		let expired = Unauthenticated::Verification(VerificationError::Expired);

		assert!(expired.is_expired());
		assert_eq!(expired.to_string(), "Token expired.");
		assert_eq!(expired.kind(), DenialKind::ExpiredCredential);
		assert!(!Unauthenticated::MissingCredential.is_expired());
	}

	#[test]
	fn decisions_map_to_kinds_and_outcomes() {
		let allowed = AccessDecision::Allowed {
			subject: Subject::new("user-1").expect("Subject fixture should be valid."),
			role: Role::Public,
		};

		assert!(allowed.is_allowed());
		assert_eq!(allowed.denial_kind(), None);
		assert_eq!(allowed.message(), None);
		assert_eq!(AccessDecision::DeniedRateLimited.denial_kind(), Some(DenialKind::RateLimited));
		assert!(DenialKind::RateLimited.is_transient());
		assert_eq!(
			AccessDecision::DeniedForbidden { required: Role::Staff }.outcome(),
			DecisionOutcome::Forbidden
		);
		assert_eq!(
			AccessDecision::DeniedUnauthenticated(Unauthenticated::MalformedHeader).denial_kind(),
			Some(DenialKind::MalformedCredential)
		);
	}
}
