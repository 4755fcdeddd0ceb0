//! Crate-level error types shared across the token service, the directory seam, and
//! configuration loading.
//!
//! Per-request denials are not errors: they are [`AccessDecision`](crate::gate::AccessDecision)
//! values. The types here cover startup failures and the issuance path.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem; raised at startup, never per request.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Credential issuance failed.
	#[error(transparent)]
	Issue(#[from] crate::token::IssueError),
	/// Credential verification failed.
	#[error(transparent)]
	Verification(#[from] crate::token::VerificationError),
	/// User directory failure.
	#[error("{0}")]
	Directory(
		#[from]
		#[source]
		crate::directory::DirectoryError,
	),

	/// The directory does not know the requested subject.
	#[error("Subject `{subject}` is not known to the user directory.")]
	UnknownSubject {
		/// Subject that was looked up.
		subject: String,
	},
}

/// Configuration and validation failures raised while assembling a gate.
#[derive(Debug, PartialEq, ThisError)]
pub enum ConfigError {
	/// No signing secret was supplied by the environment.
	#[error("Signing secret `{var}` is not set.")]
	MissingSecret {
		/// Environment variable that was consulted.
		var: &'static str,
	},
	/// The signing secret was present but empty.
	#[error("Signing secret cannot be empty.")]
	EmptySecret,
	/// Burst capacity must admit at least one request.
	#[error("Rate limit capacity must be at least 1.")]
	ZeroCapacity,
	/// Sustained rate must be finite and non-negative.
	#[error("Rate limit refill rate must be finite and non-negative, got {rate}.")]
	InvalidRefillRate {
		/// Offending rate in tokens per second.
		rate: f64,
	},
	/// Credential validity window must be positive.
	#[error("Token validity window must be positive.")]
	NonPositiveValidity,
	/// Requested signing algorithm is not part of the HMAC family.
	#[error("Signing algorithm `{name}` is not supported.")]
	UnsupportedAlgorithm {
		/// Algorithm label as supplied.
		name: String,
	},
	/// An environment value could not be parsed.
	#[error("Environment value `{var}` is invalid: {value}.")]
	InvalidValue {
		/// Environment variable name.
		var: &'static str,
		/// Raw value as supplied.
		value: String,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::directory::DirectoryError;

	#[test]
	fn directory_error_converts_with_source() {
		let directory_error = DirectoryError::Backend { message: "database unreachable".into() };
		let error: Error = directory_error.clone().into();

		assert!(matches!(error, Error::Directory(_)));
		assert!(error.to_string().contains("database unreachable"));

		let source = StdError::source(&error)
			.expect("Crate error should expose the directory error as its source.");

		assert_eq!(source.to_string(), directory_error.to_string());
	}

	#[test]
	fn config_error_is_transparent() {
		let error: Error = ConfigError::MissingSecret { var: "JWT_SECRET" }.into();

		assert_eq!(error.to_string(), "Signing secret `JWT_SECRET` is not set.");
	}
}
