//! Startup configuration for the gate, sourced from the hosting environment.
//!
//! Every problem found here is a [`ConfigError`] raised before the gate exists; nothing in this
//! module can fail per request.

// self
use crate::{
	_prelude::*,
	auth::SigningKey,
	clock::Clock,
	error::ConfigError,
	gate::AccessGate,
	rate_limit::{RateLimitConfig, RateLimiterRegistry},
	token::{Algorithm, TokenService},
};

/// Environment variable holding the signing secret (required).
pub const ENV_SECRET: &str = "JWT_SECRET";
/// Environment variable selecting the HMAC algorithm.
pub const ENV_ALGORITHM: &str = "JWT_ALGORITHM";
/// Environment variable holding the credential validity window in seconds.
pub const ENV_TOKEN_TTL: &str = "TOKEN_TTL_SECS";
/// Environment variable holding the sustained request rate per second.
pub const ENV_RATE: &str = "RATE_LIMIT_PER_SECOND";
/// Environment variable holding the burst capacity.
pub const ENV_BURST: &str = "RATE_LIMIT_BURST";
/// Environment variable holding the bucket idle TTL in seconds.
pub const ENV_IDLE_TTL: &str = "RATE_LIMIT_IDLE_TTL_SECS";

const DEFAULT_TOKEN_TTL_SECS: u64 = 86_400;

/// Everything needed to assemble an [`AccessGate`].
#[derive(Clone, Debug, Deserialize)]
pub struct GateConfig {
	/// Signing secret shared by issuance and verification.
	pub secret: SigningKey,
	/// Pinned HMAC algorithm.
	#[serde(default)]
	pub algorithm: Algorithm,
	/// Credential validity window in seconds.
	#[serde(default = "default_token_ttl_secs")]
	pub token_ttl_secs: u64,
	/// Token-bucket parameters shared by every client key.
	#[serde(default)]
	pub rate_limit: RateLimitConfig,
}
impl GateConfig {
	/// Creates a configuration with default algorithm, validity window, and rate limits.
	pub fn new(secret: SigningKey) -> Self {
		Self {
			secret,
			algorithm: Algorithm::default(),
			token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
			rate_limit: RateLimitConfig::default(),
		}
	}

	/// Reads the configuration from the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|var| std::env::var(var).ok())
	}

	/// Reads the configuration through `lookup`, which maps a variable name to its value.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let secret = lookup(ENV_SECRET).ok_or(ConfigError::MissingSecret { var: ENV_SECRET })?;
		let mut config = Self::new(SigningKey::new(secret)?);

		if let Some(value) = lookup(ENV_ALGORITHM) {
			config.algorithm = value.parse()?;
		}
		if let Some(value) = lookup(ENV_TOKEN_TTL) {
			config.token_ttl_secs = parse_var(ENV_TOKEN_TTL, value)?;
		}

		let refill_rate = match lookup(ENV_RATE) {
			Some(value) => parse_var(ENV_RATE, value)?,
			None => RateLimitConfig::DEFAULT_REFILL_RATE,
		};
		let capacity = match lookup(ENV_BURST) {
			Some(value) => parse_var(ENV_BURST, value)?,
			None => RateLimitConfig::DEFAULT_CAPACITY,
		};

		config.rate_limit = RateLimitConfig::new(refill_rate, capacity)?;

		if let Some(value) = lookup(ENV_IDLE_TTL) {
			let secs: i64 = parse_var(ENV_IDLE_TTL, value)?;

			config.rate_limit = config.rate_limit.with_idle_ttl(Duration::seconds(secs));
		}

		Ok(config)
	}

	/// Credential validity window.
	pub fn token_ttl(&self) -> Duration {
		Duration::seconds(i64::try_from(self.token_ttl_secs).unwrap_or(i64::MAX))
	}

	/// Assembles a gate whose token service and rate limiter share `clock`.
	pub fn build(&self, clock: Arc<dyn Clock>) -> Result<AccessGate, ConfigError> {
		let tokens = TokenService::new(self.secret.clone(), clock.clone())
			.with_algorithm(self.algorithm)
			.with_validity(self.token_ttl())?;
		let limiter = RateLimiterRegistry::new(self.rate_limit.clone(), clock);

		Ok(AccessGate::new(tokens, limiter))
	}
}

fn default_token_ttl_secs() -> u64 {
	DEFAULT_TOKEN_TTL_SECS
}

fn parse_var<T>(var: &'static str, value: String) -> Result<T, ConfigError>
where
	T: FromStr,
{
	let parsed = value.trim().parse::<T>();

	parsed.map_err(|_| ConfigError::InvalidValue { var, value })
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::clock::SystemClock;

	fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let map = pairs
			.iter()
			.map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
			.collect::<HashMap<_, _>>();

		move |var| map.get(var).cloned()
	}

	#[test]
	fn missing_secret_prevents_startup() {
		assert_eq!(
			GateConfig::from_lookup(lookup(&[])).map(|_| ()),
			Err(ConfigError::MissingSecret { var: ENV_SECRET })
		);
		assert_eq!(
			GateConfig::from_lookup(lookup(&[(ENV_SECRET, "")])).map(|_| ()),
			Err(ConfigError::EmptySecret)
		);
	}

	#[test]
	fn defaults_apply_when_unset() {
		let config = GateConfig::from_lookup(lookup(&[(ENV_SECRET, "s3cret")]))
			.expect("Secret alone should be enough.");

		assert_eq!(config.algorithm, Algorithm::Hs256);
		assert_eq!(config.token_ttl(), Duration::hours(24));
		assert_eq!(config.rate_limit, RateLimitConfig::default());
	}

	#[test]
	fn overrides_are_parsed() {
		let config = GateConfig::from_lookup(lookup(&[
			(ENV_SECRET, "s3cret"),
			(ENV_ALGORITHM, "HS512"),
			(ENV_TOKEN_TTL, "3600"),
			(ENV_RATE, "0.5"),
			(ENV_BURST, " 10 "),
			(ENV_IDLE_TTL, "900"),
		]))
		.expect("Overrides should parse.");

		assert_eq!(config.algorithm, Algorithm::Hs512);
		assert_eq!(config.token_ttl(), Duration::hours(1));
		assert_eq!(config.rate_limit.refill_rate(), 0.5);
		assert_eq!(config.rate_limit.capacity(), 10);
		assert_eq!(config.rate_limit.idle_ttl(), Some(Duration::minutes(15)));
	}

	#[test]
	fn invalid_values_are_reported() {
		assert_eq!(
			GateConfig::from_lookup(lookup(&[(ENV_SECRET, "s"), (ENV_BURST, "many")])).map(|_| ()),
			Err(ConfigError::InvalidValue { var: ENV_BURST, value: "many".into() })
		);
		assert_eq!(
			GateConfig::from_lookup(lookup(&[(ENV_SECRET, "s"), (ENV_BURST, "0")])).map(|_| ()),
			Err(ConfigError::ZeroCapacity)
		);
		assert_eq!(
			GateConfig::from_lookup(lookup(&[(ENV_SECRET, "s"), (ENV_ALGORITHM, "RS256")]))
				.map(|_| ()),
			Err(ConfigError::UnsupportedAlgorithm { name: "RS256".into() })
		);
	}

	#[test]
	fn zero_ttl_fails_to_build() {
		let mut config = GateConfig::new(SigningKey::random());

		config.token_ttl_secs = 0;

		assert!(matches!(
			config.build(Arc::new(SystemClock)),
			Err(ConfigError::NonPositiveValidity)
		));
	}

	#[test]
	fn deserializes_with_defaults() {
		let payload = r#"{"secret":"s3cret","rate_limit":{"refill_rate":1.0,"capacity":3}}"#;
		let config: GateConfig =
			serde_json::from_str(payload).expect("Config should deserialize.");

		assert_eq!(config.token_ttl_secs, DEFAULT_TOKEN_TTL_SECS);
		assert_eq!(config.rate_limit.capacity(), 3);
		assert!(config.build(Arc::new(SystemClock)).is_ok());
	}
}
