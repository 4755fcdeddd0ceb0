//! Lazily refilled token bucket for a single client key.

// self
use crate::{_prelude::*, rate_limit::RateLimitConfig};

/// Token bucket state; `0 <= tokens <= capacity` holds after every operation.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenBucket {
	tokens: f64,
	last_refill: OffsetDateTime,
}
impl TokenBucket {
	/// Creates a bucket holding its full burst allowance.
	pub fn full(config: &RateLimitConfig, now: OffsetDateTime) -> Self {
		Self { tokens: f64::from(config.capacity()), last_refill: now }
	}

	/// Refills for the time elapsed since the last refill, then consumes one token if available.
	///
	/// A denied call leaves the token count untouched.
	pub fn try_acquire(&mut self, config: &RateLimitConfig, now: OffsetDateTime) -> bool {
		self.refill(config, now);

		if self.tokens >= 1. {
			self.tokens -= 1.;

			true
		} else {
			false
		}
	}

	/// Returns the token count the bucket would hold at `now`, without mutating it.
	pub fn available_at(&self, config: &RateLimitConfig, now: OffsetDateTime) -> f64 {
		let mut preview = self.clone();

		preview.refill(config, now);

		preview.tokens
	}

	/// Returns `true` if the bucket has not been touched for at least `ttl`.
	pub fn is_idle(&self, now: OffsetDateTime, ttl: Duration) -> bool {
		now - self.last_refill >= ttl
	}

	/// Current token count as of the last refill.
	pub fn tokens(&self) -> f64 {
		self.tokens
	}

	/// Instant of the last refill.
	pub fn last_refill(&self) -> OffsetDateTime {
		self.last_refill
	}

	// An instant earlier than `last_refill` (a clock stepping backwards) refills nothing and
	// keeps `last_refill` where it is.
	fn refill(&mut self, config: &RateLimitConfig, now: OffsetDateTime) {
		if now <= self.last_refill {
			return;
		}

		let elapsed = (now - self.last_refill).as_seconds_f64();
		let capacity = f64::from(config.capacity());

		self.tokens = (self.tokens + elapsed * config.refill_rate()).min(capacity);
		self.last_refill = now;
	}
}
