//! User directory contract: the one external collaborator the gate consults, to learn which
//! role a known subject holds when minting its credential.

pub mod memory;

pub use memory::MemoryDirectory;

// self
use crate::{
	_prelude::*,
	auth::{Role, Subject},
};

/// Boxed future returned by [`UserDirectory`] lookups.
pub type DirectoryFuture<'a, T> =
	Pin<Box<dyn Future<Output = Result<T, DirectoryError>> + 'a + Send>>;

/// Read-only lookup of users by subject.
pub trait UserDirectory
where
	Self: Send + Sync,
{
	/// Returns the role of `subject`, or `None` if the directory does not know it.
	fn role_of<'a>(&'a self, subject: &'a Subject) -> DirectoryFuture<'a, Option<Role>>;
}

/// Error type produced by [`UserDirectory`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum DirectoryError {
	/// Backend-level failure for the directory.
	#[error("Directory backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
