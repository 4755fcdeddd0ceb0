//! Optional observability helpers for gate decisions.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to enter an `access_gate.evaluate` span per decision with the `client_key`
//!   and `required_role` fields, and to log denials at `debug` level.
//! - Enable `metrics` to increment the `access_gate_decision_total` counter labeled by `outcome`,
//!   and the `access_gate_rate_limiter_evicted_total` counter after each eviction sweep.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DecisionOutcome {
	/// The request may proceed.
	Allowed,
	/// The caller exceeded its request budget.
	RateLimited,
	/// No usable credential was presented.
	Unauthenticated,
	/// The credential is valid but lacks the required role.
	Forbidden,
}
impl DecisionOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			DecisionOutcome::Allowed => "allowed",
			DecisionOutcome::RateLimited => "rate_limited",
			DecisionOutcome::Unauthenticated => "unauthenticated",
			DecisionOutcome::Forbidden => "forbidden",
		}
	}
}
impl Display for DecisionOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
