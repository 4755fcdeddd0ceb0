//! Request-gating core: per-client token buckets, HMAC-signed bearer credentials, and role
//! checks folded into one allow/deny decision per request.
//!
//! The [`gate::AccessGate`] is the only type a request pipeline needs to call. It runs the
//! cheapest check first (rate limiting), then verifies the bearer credential, then checks the
//! caller's role, and returns a single [`gate::AccessDecision`].

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod clock;
pub mod config;
pub mod directory;
pub mod error;
pub mod gate;
pub mod obs;
pub mod rate_limit;
pub mod token;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::SigningKey,
		clock::{Clock, ManualClock},
		gate::AccessGate,
		rate_limit::{RateLimitConfig, RateLimiterRegistry},
		token::TokenService,
	};

	/// Secret shared by every fixture built from this module.
	pub const TEST_SECRET: &str = "access-gate-test-secret";

	/// Returns a manual clock parked at a fixed, whole-second instant.
	pub fn test_clock() -> Arc<ManualClock> {
		Arc::new(ManualClock::new(time::macros::datetime!(2025-06-01 12:00 UTC)))
	}

	/// Builds a token service over the shared test secret and the provided clock.
	pub fn test_token_service(clock: Arc<ManualClock>) -> TokenService {
		let clock: Arc<dyn Clock> = clock;

		TokenService::new(
			SigningKey::new(TEST_SECRET).expect("Test secret should be accepted."),
			clock,
		)
	}

	/// Builds a registry with the provided sustained rate and burst capacity.
	pub fn test_registry(
		clock: Arc<ManualClock>,
		refill_rate: f64,
		capacity: u32,
	) -> RateLimiterRegistry {
		let config = RateLimitConfig::new(refill_rate, capacity)
			.expect("Rate limit fixture should be valid.");

		RateLimiterRegistry::new(config, clock)
	}

	/// Builds a gate whose token service and registry share the provided clock.
	pub fn test_gate(clock: Arc<ManualClock>, refill_rate: f64, capacity: u32) -> AccessGate {
		let tokens = test_token_service(clock.clone());
		let limiter = test_registry(clock, refill_rate, capacity);

		AccessGate::new(tokens, limiter)
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};

	pub use crate::error::{Error, Result};
}

#[cfg(test)] use {color_eyre as _, tokio as _};
