//! Time source abstraction shared by the token service and the rate limiter.
//!
//! Production code uses [`SystemClock`]; tests drive a [`ManualClock`] so expiry boundaries
//! and bucket refills can be asserted without sleeping.

// self
use crate::_prelude::*;

/// Source of the current instant.
pub trait Clock
where
	Self: Send + Sync,
{
	/// Returns the current UTC instant.
	fn now(&self) -> OffsetDateTime;
}

/// Wall clock backed by [`OffsetDateTime::now_utc`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;
impl Clock for SystemClock {
	fn now(&self) -> OffsetDateTime {
		OffsetDateTime::now_utc()
	}
}

/// Manually driven clock for deterministic tests.
///
/// Clones share the same instant, so advancing one handle moves every component that holds
/// another.
#[derive(Clone, Debug)]
pub struct ManualClock(Arc<Mutex<OffsetDateTime>>);
impl ManualClock {
	/// Creates a clock parked at `start`.
	pub fn new(start: OffsetDateTime) -> Self {
		Self(Arc::new(Mutex::new(start)))
	}

	/// Moves the clock forward (or backward, for negative durations).
	pub fn advance(&self, delta: Duration) {
		*self.0.lock() += delta;
	}

	/// Parks the clock at `instant`.
	pub fn set(&self, instant: OffsetDateTime) {
		*self.0.lock() = instant;
	}
}
impl Clock for ManualClock {
	fn now(&self) -> OffsetDateTime {
		*self.0.lock()
	}
}
