// self
use crate::{_prelude::*, auth::Role, obs::DecisionOutcome};

/// A span builder used around each gate decision.
#[derive(Clone, Debug)]
pub struct GateSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl GateSpan {
	/// Creates a new span tagged with the client key and the role the endpoint requires.
	pub fn new(client_key: &str, required_role: Option<Role>) -> Self {
		#[cfg(feature = "tracing")]
		{
			let required_role = required_role.map_or("any", Role::as_str);
			let span = tracing::info_span!("access_gate.evaluate", client_key, required_role);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (client_key, required_role);

			Self {}
		}
	}

	/// Enters the span for the duration of the decision.
	pub fn entered(self) -> GateSpanGuard {
		#[cfg(feature = "tracing")]
		{
			GateSpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			GateSpanGuard {}
		}
	}
}

/// RAII guard returned by [`GateSpan::entered`].
pub struct GateSpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for GateSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("GateSpanGuard(..)")
	}
}

/// Logs a denial with its precise kind; the kind never reaches callers' users.
pub fn log_denial(outcome: DecisionOutcome, kind: &'static str) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(outcome = outcome.as_str(), kind, "request denied");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (outcome, kind);
	}
}

/// Logs the result of an eviction sweep.
pub fn log_eviction(evicted: usize, remaining: usize) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(evicted, remaining, "evicted idle rate limit buckets");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (evicted, remaining);
	}
}
