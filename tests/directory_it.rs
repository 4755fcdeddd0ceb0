// std
use std::sync::Arc;
// crates.io
use time::macros;
// self
use access_gate::{
	auth::{Role, SigningKey, Subject},
	clock::ManualClock,
	config::GateConfig,
	directory::{DirectoryError, DirectoryFuture, MemoryDirectory, UserDirectory},
	error::Error,
	gate::AccessGate,
};

struct OfflineDirectory;
impl UserDirectory for OfflineDirectory {
	fn role_of<'a>(&'a self, _: &'a Subject) -> DirectoryFuture<'a, Option<Role>> {
		Box::pin(async { Err(DirectoryError::Backend { message: "connection refused".into() }) })
	}
}

fn gate() -> AccessGate {
	let clock = Arc::new(ManualClock::new(macros::datetime!(2025-06-01 12:00 UTC)));

	GateConfig::new(SigningKey::new("directory-secret").expect("Secret fixture should be valid."))
		.build(clock)
		.expect("Gate fixture should build.")
}

fn subject(value: &str) -> Subject {
	Subject::new(value).expect("Subject fixture should be valid.")
}

#[tokio::test]
async fn known_subjects_receive_their_directory_role() {
	let gate = gate();
	let directory: MemoryDirectory =
		[(subject("alice"), Role::Staff), (subject("bob"), Role::Public)].into_iter().collect();

	for (id, role) in [("alice", Role::Staff), ("bob", Role::Public)] {
		let token =
			gate.issue_for(&directory, &subject(id)).await.expect("Known subject should be issued.");
		let decision = gate.evaluate("10.0.0.1", Some(&token.authorization_header()), Some(role));

		assert!(decision.is_allowed(), "Credential for {id} should carry {role}.");
	}
}

#[tokio::test]
async fn unknown_subjects_are_refused() {
	let gate = gate();
	let directory = MemoryDirectory::default();
	let err = gate
		.issue_for(&directory, &subject("mallory"))
		.await
		.expect_err("Unknown subject should not be issued.");

	assert!(matches!(err, Error::UnknownSubject { ref subject } if subject == "mallory"));
}

#[tokio::test]
async fn backend_failures_propagate() {
	let gate = gate();
	let directory: Arc<dyn UserDirectory> = Arc::new(OfflineDirectory);
	let err = gate
		.issue_for(directory.as_ref(), &subject("alice"))
		.await
		.expect_err("Offline directory should fail issuance.");

	assert!(matches!(err, Error::Directory(DirectoryError::Backend { .. })));
}
