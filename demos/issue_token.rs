//! Issues a credential from the environment-configured gate and walks it through a few
//! evaluations.
//!
//! ```sh
//! JWT_SECRET=dev-secret cargo run --example issue_token -- alice staff
//! ```

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
// self
use access_gate::{
	auth::{Role, Subject},
	clock::SystemClock,
	config::GateConfig,
	directory::MemoryDirectory,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let mut args = std::env::args().skip(1);
	let subject = Subject::new(args.next().unwrap_or_else(|| "demo-user".into()))?;
	let role = args.next().as_deref().unwrap_or("public").parse::<Role>()?;
	let config = GateConfig::from_env()?;
	let gate = config.build(Arc::new(SystemClock))?;
	let directory = MemoryDirectory::default();

	directory.insert(subject.clone(), role);

	let token = gate.issue_for(&directory, &subject).await?;
	let header = token.authorization_header();

	println!("{header}");

	for required in [None, Some(Role::Public), Some(Role::Staff)] {
		let decision = gate.evaluate("127.0.0.1", Some(&header), required);
		let label = required.map_or("any", Role::as_str);

		println!("{label:>6}: {}", decision.message().unwrap_or("Allowed."));
	}

	Ok(())
}
