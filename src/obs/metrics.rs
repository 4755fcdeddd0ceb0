// self
use crate::obs::DecisionOutcome;

/// Records a decision outcome via the global metrics recorder (when enabled).
pub fn record_decision(outcome: DecisionOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("access_gate_decision_total", "outcome" => outcome.as_str()).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}

/// Records how many idle buckets an eviction sweep removed (when enabled).
pub fn record_evictions(evicted: usize) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("access_gate_rate_limiter_evicted_total")
			.increment(u64::try_from(evicted).unwrap_or(u64::MAX));
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = evicted;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recorders_noop_without_metrics() {
		record_decision(DecisionOutcome::RateLimited);
		record_evictions(3);
	}
}
