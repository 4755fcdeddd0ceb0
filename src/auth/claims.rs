//! Verified credential claims and their validity window.

// self
use crate::{
	_prelude::*,
	auth::{Role, Subject},
};

/// Lifecycle status of a set of claims at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimsStatus {
	/// The issued-at instant is still in the future.
	Pending,
	/// The claims are currently valid.
	Active,
	/// The expiry instant has been reached.
	Expired,
}

/// Decoded, verified payload of a credential.
///
/// Claims are immutable once issued; `expires_at` is always strictly after `issued_at`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
	/// Caller the credential was issued to.
	pub subject: Subject,
	/// Authorization tier of the caller.
	pub role: Role,
	/// Issuance instant, whole seconds.
	pub issued_at: OffsetDateTime,
	/// Expiry instant, whole seconds; exclusive on the valid side.
	pub expires_at: OffsetDateTime,
}
impl Claims {
	/// Computes the lifecycle status at a given instant.
	pub fn status_at(&self, instant: OffsetDateTime) -> ClaimsStatus {
		if instant < self.issued_at {
			return ClaimsStatus::Pending;
		}
		if instant >= self.expires_at {
			return ClaimsStatus::Expired;
		}

		ClaimsStatus::Active
	}

	/// Returns `true` if the claims have expired at the provided instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		matches!(self.status_at(instant), ClaimsStatus::Expired)
	}

	/// Returns `true` if the claims grant the provided role.
	pub fn has_role(&self, role: Role) -> bool {
		self.role == role
	}

	/// Validity window length.
	pub fn validity(&self) -> Duration {
		self.expires_at - self.issued_at
	}
}
