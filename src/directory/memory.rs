//! Thread-safe in-memory [`UserDirectory`] for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::{Role, Subject},
	directory::{DirectoryFuture, UserDirectory},
};

type DirectoryMap = Arc<RwLock<HashMap<Subject, Role>>>;

/// In-process directory; clones share the same entries.
#[derive(Clone, Debug, Default)]
pub struct MemoryDirectory(DirectoryMap);
impl MemoryDirectory {
	/// Registers or replaces `subject` with `role`, returning the previous role.
	pub fn insert(&self, subject: Subject, role: Role) -> Option<Role> {
		self.0.write().insert(subject, role)
	}

	/// Removes `subject`, returning its role if it was present.
	pub fn remove(&self, subject: &str) -> Option<Role> {
		self.0.write().remove(subject)
	}

	/// Number of registered subjects.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` if no subject is registered.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}
}
impl FromIterator<(Subject, Role)> for MemoryDirectory {
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = (Subject, Role)>,
	{
		Self(Arc::new(RwLock::new(iter.into_iter().collect())))
	}
}
impl UserDirectory for MemoryDirectory {
	fn role_of<'a>(&'a self, subject: &'a Subject) -> DirectoryFuture<'a, Option<Role>> {
		let role = self.0.read().get(subject).copied();

		Box::pin(async move { Ok(role) })
	}
}
