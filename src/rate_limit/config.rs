//! Shared token-bucket parameters applied to every client key.

// self
use crate::{_prelude::*, error::ConfigError};

/// Validated token-bucket parameters.
///
/// `idle_ttl` never undercuts the time a drained bucket needs to refill completely, so evicting
/// a bucket after that long is indistinguishable from keeping it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RateLimitSettings", into = "RateLimitSettings")]
pub struct RateLimitConfig {
	refill_rate: f64,
	capacity: u32,
	idle_ttl: Option<Duration>,
}
impl RateLimitConfig {
	/// Sustained rate applied when the environment supplies none.
	pub const DEFAULT_REFILL_RATE: f64 = 2.;
	/// Burst capacity applied when the environment supplies none.
	pub const DEFAULT_CAPACITY: u32 = 5;
	/// Lower bound for the default idle TTL.
	pub const MIN_DEFAULT_IDLE_TTL: Duration = Duration::minutes(1);

	/// Creates a configuration refilling `refill_rate` tokens per second up to `capacity`.
	pub fn new(refill_rate: f64, capacity: u32) -> Result<Self, ConfigError> {
		if !refill_rate.is_finite() || refill_rate < 0. {
			return Err(ConfigError::InvalidRefillRate { rate: refill_rate });
		}
		if capacity == 0 {
			return Err(ConfigError::ZeroCapacity);
		}

		Ok(Self::with_default_idle_ttl(refill_rate, capacity))
	}

	/// Overrides how long a bucket may sit idle before it becomes evictable.
	///
	/// Values shorter than the full-refill time are raised to it. Has no effect when the
	/// refill rate is zero, since such buckets never recover and are never evicted.
	pub fn with_idle_ttl(mut self, ttl: Duration) -> Self {
		self.idle_ttl = self.full_refill().map(|full| full.max(ttl));

		self
	}

	/// Tokens added per second.
	pub fn refill_rate(&self) -> f64 {
		self.refill_rate
	}

	/// Maximum burst.
	pub fn capacity(&self) -> u32 {
		self.capacity
	}

	/// Idle time after which a bucket may be evicted; `None` disables eviction.
	pub fn idle_ttl(&self) -> Option<Duration> {
		self.idle_ttl
	}

	/// Time for an empty bucket to refill completely; `None` when the refill rate is zero.
	pub fn full_refill(&self) -> Option<Duration> {
		if self.refill_rate <= 0. {
			return None;
		}

		Duration::checked_seconds_f64(f64::from(self.capacity) / self.refill_rate)
	}

	// Callers have already validated `refill_rate` and `capacity`.
	fn with_default_idle_ttl(refill_rate: f64, capacity: u32) -> Self {
		let mut config = Self { refill_rate, capacity, idle_ttl: None };

		config.idle_ttl = config.full_refill().map(|full| full.max(Self::MIN_DEFAULT_IDLE_TTL));

		config
	}
}
impl Default for RateLimitConfig {
	fn default() -> Self {
		Self::with_default_idle_ttl(Self::DEFAULT_REFILL_RATE, Self::DEFAULT_CAPACITY)
	}
}

/// Serialized form of [`RateLimitConfig`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RateLimitSettings {
	/// Tokens added per second.
	pub refill_rate: f64,
	/// Maximum burst.
	pub capacity: u32,
	/// Idle TTL in whole seconds.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub idle_ttl_secs: Option<u64>,
}
impl TryFrom<RateLimitSettings> for RateLimitConfig {
	type Error = ConfigError;

	fn try_from(settings: RateLimitSettings) -> Result<Self, Self::Error> {
		let config = Self::new(settings.refill_rate, settings.capacity)?;

		Ok(match settings.idle_ttl_secs {
			Some(secs) =>
				config.with_idle_ttl(Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX))),
			None => config,
		})
	}
}
impl From<RateLimitConfig> for RateLimitSettings {
	fn from(config: RateLimitConfig) -> Self {
		Self {
			refill_rate: config.refill_rate,
			capacity: config.capacity,
			idle_ttl_secs: config.idle_ttl.and_then(|ttl| u64::try_from(ttl.whole_seconds()).ok()),
		}
	}
}
