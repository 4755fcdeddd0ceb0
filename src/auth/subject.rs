//! Identifier of the caller a credential was issued to.

// std
use std::borrow::Borrow;
// self
use crate::_prelude::*;

/// Error returned when a subject is empty.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Subject identifier cannot be empty.")]
pub struct EmptySubject;

/// Caller identity carried in credential claims; any non-empty text.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Subject(String);
impl Subject {
	/// Creates a subject, rejecting empty input.
	pub fn new(value: impl Into<String>) -> Result<Self, EmptySubject> {
		Self::try_from(value.into())
	}
}
impl AsRef<str> for Subject {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Borrow<str> for Subject {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl From<Subject> for String {
	fn from(value: Subject) -> Self {
		value.0
	}
}
impl TryFrom<String> for Subject {
	type Error = EmptySubject;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		if value.is_empty() {
			return Err(EmptySubject);
		}

		Ok(Self(value))
	}
}
impl Debug for Subject {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Subject({:?})", self.0)
	}
}
impl Display for Subject {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for Subject {
	type Err = EmptySubject;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}
