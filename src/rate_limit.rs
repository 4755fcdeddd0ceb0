//! Per-client token-bucket registry.
//!
//! Each client key gets exactly one bucket, created with a full allowance on first sight and
//! refilled lazily on every call. The map is behind a read-mostly lock; each bucket has its own
//! mutex, so callers for different keys only contend on the brief map lookup while calls for
//! the same key serialize refill-then-consume.

pub mod bucket;
pub mod config;

pub use bucket::*;
pub use config::*;

// self
use crate::{_prelude::*, clock::Clock, obs};

type SharedBucket = Arc<Mutex<TokenBucket>>;

#[derive(Debug)]
struct Buckets {
	map: HashMap<String, SharedBucket>,
	last_sweep: OffsetDateTime,
}

/// Thread-safe registry answering "may this client proceed right now?".
pub struct RateLimiterRegistry {
	config: RateLimitConfig,
	clock: Arc<dyn Clock>,
	buckets: RwLock<Buckets>,
}
impl RateLimiterRegistry {
	/// Creates an empty registry applying `config` to every key.
	pub fn new(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
		let last_sweep = clock.now();

		Self { config, clock, buckets: RwLock::new(Buckets { map: HashMap::new(), last_sweep }) }
	}

	/// Shared bucket parameters.
	pub fn config(&self) -> &RateLimitConfig {
		&self.config
	}

	/// Consumes one token for `key` if available; `false` means the caller must back off.
	pub fn allow(&self, key: &str) -> bool {
		let bucket = self.bucket(key);
		let mut bucket = bucket.lock();

		bucket.try_acquire(&self.config, self.clock.now())
	}

	/// Tokens `key` could spend right now, or `None` if the key has never been seen.
	pub fn available(&self, key: &str) -> Option<f64> {
		let bucket = self.buckets.read().map.get(key).cloned()?;
		let bucket = bucket.lock();

		Some(bucket.available_at(&self.config, self.clock.now()))
	}

	/// Number of resident buckets.
	pub fn len(&self) -> usize {
		self.buckets.read().map.len()
	}

	/// Returns `true` if no bucket is resident.
	pub fn is_empty(&self) -> bool {
		self.buckets.read().map.is_empty()
	}

	/// Removes buckets idle for at least the configured idle TTL and returns how many went.
	///
	/// Buckets held by an in-flight [`allow`](Self::allow) call are kept.
	pub fn evict_idle(&self) -> usize {
		let now = self.clock.now();
		let mut buckets = self.buckets.write();

		self.sweep(&mut buckets, now)
	}

	fn bucket(&self, key: &str) -> SharedBucket {
		if let Some(bucket) = self.buckets.read().map.get(key) {
			return bucket.clone();
		}

		let now = self.clock.now();
		let mut buckets = self.buckets.write();

		if self.config.idle_ttl().is_some_and(|ttl| now - buckets.last_sweep >= ttl) {
			self.sweep(&mut buckets, now);
		}

		buckets
			.map
			.entry(key.to_owned())
			.or_insert_with(|| Arc::new(Mutex::new(TokenBucket::full(&self.config, now))))
			.clone()
	}

	// Callers clone a bucket handle only while holding the map lock, so a strong count of one
	// under the write lock means no call is between lookup and consume.
	fn sweep(&self, buckets: &mut Buckets, now: OffsetDateTime) -> usize {
		buckets.last_sweep = now;

		let Some(ttl) = self.config.idle_ttl() else {
			return 0;
		};
		let before = buckets.map.len();

		buckets
			.map
			.retain(|_, bucket| Arc::strong_count(bucket) > 1 || !bucket.lock().is_idle(now, ttl));

		let evicted = before - buckets.map.len();

		if evicted > 0 {
			obs::log_eviction(evicted, buckets.map.len());
			obs::record_evictions(evicted);
		}

		evicted
	}
}
impl Debug for RateLimiterRegistry {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RateLimiterRegistry")
			.field("config", &self.config)
			.field("buckets", &self.len())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;
	use crate::clock::ManualClock;

	fn registry(refill_rate: f64, capacity: u32) -> (RateLimiterRegistry, Arc<ManualClock>) {
		let clock = Arc::new(ManualClock::new(macros::datetime!(2025-01-01 00:00 UTC)));
		let config =
			RateLimitConfig::new(refill_rate, capacity).expect("Config fixture should be valid.");

		(RateLimiterRegistry::new(config, clock.clone()), clock)
	}

	#[test]
	fn buckets_are_created_lazily() {
		let (registry, _) = registry(1., 2);

		assert!(registry.is_empty());
		assert_eq!(registry.available("10.0.0.1"), None);
		assert!(registry.allow("10.0.0.1"));
		assert_eq!(registry.len(), 1);
		assert_eq!(registry.available("10.0.0.1"), Some(1.));
	}

	#[test]
	fn idle_buckets_are_evicted_after_full_refill() {
		let (registry, clock) = registry(1., 2);

		assert!(registry.allow("a"));

		clock.advance(Duration::seconds(30));

		assert!(registry.allow("b"));

		clock.advance(Duration::seconds(30));

		assert_eq!(registry.evict_idle(), 1, "Only the bucket idle for a full minute should go.");
		assert_eq!(registry.available("a"), None);
		assert!(registry.available("b").is_some());
	}

	#[test]
	fn eviction_is_unobservable() {
		let (registry, clock) = registry(1., 2);

		assert!(registry.allow("a"));
		assert!(registry.allow("a"));
		assert!(!registry.allow("a"));

		clock.advance(Duration::minutes(1));
		registry.evict_idle();

		assert!(registry.allow("a"));
		assert!(registry.allow("a"));
		assert!(!registry.allow("a"));
	}

	#[test]
	fn held_buckets_survive_sweeps() {
		let (registry, clock) = registry(1., 1);
		let held = registry.bucket("a");

		clock.advance(Duration::hours(1));

		assert_eq!(registry.evict_idle(), 0);
		assert_eq!(registry.len(), 1);

		drop(held);

		assert_eq!(registry.evict_idle(), 1);
	}

	#[test]
	fn inserting_new_keys_sweeps_periodically() {
		let (registry, clock) = registry(1., 1);

		assert!(registry.allow("a"));

		clock.advance(Duration::minutes(2));

		assert!(registry.allow("b"));
		assert_eq!(registry.len(), 1, "Stale key should be swept when a new key arrives.");
	}

	#[test]
	fn zero_rate_buckets_are_never_evicted() {
		let (registry, clock) = registry(0., 1);

		assert!(registry.allow("a"));

		clock.advance(Duration::days(30));

		assert_eq!(registry.evict_idle(), 0);
		assert!(!registry.allow("a"));
	}
}
