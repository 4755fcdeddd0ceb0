//! The access gate: the single decision function a request pipeline calls.
//!
//! [`AccessGate::evaluate`] runs three checks in a fixed order and stops at the first denial:
//!
//! 1. the client's token bucket, so abusive clients never reach signature verification;
//! 2. the bearer credential, so identity is established before anything depends on it;
//! 3. the role the endpoint requires.

pub mod decision;

pub use decision::*;

// self
use crate::{
	_prelude::*,
	auth::{BearerToken, Role, Subject},
	directory::UserDirectory,
	obs::{self, GateSpan},
	rate_limit::RateLimiterRegistry,
	token::TokenService,
};

/// Composes rate limiting, credential verification, and role checks.
///
/// Share one gate behind an [`Arc`] across request handlers; every method takes `&self`.
#[derive(Debug)]
pub struct AccessGate {
	tokens: TokenService,
	limiter: RateLimiterRegistry,
}
impl AccessGate {
	/// Creates a gate from its two collaborators.
	pub fn new(tokens: TokenService, limiter: RateLimiterRegistry) -> Self {
		Self { tokens, limiter }
	}

	/// Credential service used for verification and issuance.
	pub fn tokens(&self) -> &TokenService {
		&self.tokens
	}

	/// Per-client rate limiter registry.
	pub fn limiter(&self) -> &RateLimiterRegistry {
		&self.limiter
	}

	/// Decides whether the request from `client_key` may proceed.
	///
	/// `authorization` is the raw `Authorization` header value, if any. `required_role` is
	/// `None` for endpoints any authenticated caller may use.
	pub fn evaluate(
		&self,
		client_key: &str,
		authorization: Option<&str>,
		required_role: Option<Role>,
	) -> AccessDecision {
		let _span = GateSpan::new(client_key, required_role).entered();
		let decision = self.decide(client_key, authorization, required_role);
		let outcome = decision.outcome();

		obs::record_decision(outcome);

		if let Some(kind) = decision.denial_kind() {
			obs::log_denial(outcome, kind.as_str());
		}

		decision
	}

	/// Looks `subject` up in `directory` and issues a credential carrying its role.
	pub async fn issue_for<D>(&self, directory: &D, subject: &Subject) -> Result<BearerToken>
	where
		D: ?Sized + UserDirectory,
	{
		let role = directory
			.role_of(subject)
			.await?
			.ok_or_else(|| Error::UnknownSubject { subject: subject.to_string() })?;

		Ok(self.tokens.issue(subject, role)?)
	}

	fn decide(
		&self,
		client_key: &str,
		authorization: Option<&str>,
		required_role: Option<Role>,
	) -> AccessDecision {
		if !self.limiter.allow(client_key) {
			return AccessDecision::DeniedRateLimited;
		}

		let header = match authorization {
			None | Some("") =>
				return AccessDecision::DeniedUnauthenticated(Unauthenticated::MissingCredential),
			Some(header) => header,
		};
		let Some(token) = header.strip_prefix(BearerToken::SCHEME_PREFIX) else {
			return AccessDecision::DeniedUnauthenticated(Unauthenticated::MalformedHeader);
		};
		let claims = match self.tokens.verify(token) {
			Ok(claims) => claims,
			Err(e) => return AccessDecision::DeniedUnauthenticated(Unauthenticated::Verification(e)),
		};

		if let Some(required) = required_role
			&& !claims.has_role(required)
		{
			return AccessDecision::DeniedForbidden { required };
		}

		AccessDecision::Allowed { subject: claims.subject, role: claims.role }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet::*;

	fn subject(value: &str) -> Subject {
		Subject::new(value).expect("Subject fixture should be valid.")
	}

	#[test]
	fn rate_limit_runs_before_header_checks() {
		let gate = test_gate(test_clock(), 0., 1);

		assert_eq!(
			gate.evaluate("10.0.0.1", None, None),
			AccessDecision::DeniedUnauthenticated(Unauthenticated::MissingCredential)
		);
		assert_eq!(gate.evaluate("10.0.0.1", None, None), AccessDecision::DeniedRateLimited);
	}

	#[test]
	fn empty_header_counts_as_missing() {
		let gate = test_gate(test_clock(), 0., 5);

		assert_eq!(
			gate.evaluate("10.0.0.1", Some(""), Some(Role::Staff)),
			AccessDecision::DeniedUnauthenticated(Unauthenticated::MissingCredential)
		);
	}

	#[test]
	fn non_bearer_headers_are_malformed() {
		let gate = test_gate(test_clock(), 0., 5);
		let token =
			gate.tokens().issue(&subject("user-1"), Role::Staff).expect("Issuance should succeed.");

		for header in [token.expose().to_owned(), format!("Basic {}", token.expose())] {
			assert_eq!(
				gate.evaluate("10.0.0.1", Some(&header), None),
				AccessDecision::DeniedUnauthenticated(Unauthenticated::MalformedHeader)
			);
		}
	}

	#[test]
	fn bare_scheme_is_an_invalid_token() {
		let gate = test_gate(test_clock(), 0., 5);
		let decision = gate.evaluate("10.0.0.1", Some("Bearer "), None);

		assert_eq!(decision.denial_kind(), Some(DenialKind::MalformedCredential));
		assert_eq!(decision.message(), Some("Invalid token."));
	}

	#[test]
	fn no_required_role_admits_any_verified_caller() {
		let gate = test_gate(test_clock(), 0., 5);
		let token =
			gate.tokens().issue(&subject("user-1"), Role::Public).expect("Issuance should succeed.");

		assert_eq!(
			gate.evaluate("10.0.0.1", Some(&token.authorization_header()), None),
			AccessDecision::Allowed { subject: subject("user-1"), role: Role::Public }
		);
	}
}
