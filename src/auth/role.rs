//! Coarse authorization tiers carried inside credentials.

// self
use crate::_prelude::*;

/// Error returned when a role label is not recognized.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Role `{label}` is not recognized.")]
pub struct UnknownRole {
	/// Label as supplied.
	pub label: String,
}

/// Authorization tier of a caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	/// Member of the public.
	Public,
	/// Service staff; required by staff-only endpoints.
	Staff,
}
impl Role {
	/// Returns the stable wire label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Role::Public => "public",
			Role::Staff => "staff",
		}
	}
}
impl Display for Role {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for Role {
	type Err = UnknownRole;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"public" => Ok(Role::Public),
			"staff" => Ok(Role::Staff),
			_ => Err(UnknownRole { label: s.to_owned() }),
		}
	}
}
