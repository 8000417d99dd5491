//! Response events and the append-only response log.
//!
//! Every estimator in this crate is a pure function of the log: there is no
//! per-fact cache, so the log's temporal order is the one invariant the whole
//! model rests on. [`ResponseLog::push`] enforces it at the boundary.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Error, Result};
use crate::fact::FactId;

/// One trial outcome reported by the trial runner.
///
/// Timeouts are data, not control flow: a trial that ran out without an
/// answer carries an infinite reaction time and unknown correctness, and is
/// consumed by normalization like any other response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
	/// Fact this response belongs to
	pub fact_id: FactId,
	/// Absolute time the stimulus appeared (ms); non-decreasing across the log
	pub presentation_start_ms: f64,
	/// Observed reaction time (ms); `f64::INFINITY` when the trial timed out
	pub reaction_time_ms: f64,
	/// Whether the answer was correct; `None` when correctness is unknown
	pub correct: Option<bool>,
	/// Snapshot of the presented text, kept for reading-time recomputation
	pub text: String,
}

impl Response {
	/// An answered trial.
	pub fn answered(
		fact_id: impl Into<FactId>,
		presentation_start_ms: f64,
		reaction_time_ms: f64,
		correct: bool,
		text: impl Into<String>,
	) -> Self {
		Self {
			fact_id: fact_id.into(),
			presentation_start_ms,
			reaction_time_ms,
			correct: Some(correct),
			text: text.into(),
		}
	}

	/// A trial that ended without an answer.
	pub fn timeout(
		fact_id: impl Into<FactId>,
		presentation_start_ms: f64,
		text: impl Into<String>,
	) -> Self {
		Self {
			fact_id: fact_id.into(),
			presentation_start_ms,
			reaction_time_ms: f64::INFINITY,
			correct: None,
			text: text.into(),
		}
	}

	/// Check whether this response carries the timeout sentinel.
	#[must_use]
	pub fn is_timeout(&self) -> bool {
		self.reaction_time_ms.is_infinite()
	}
}

/// Append-only record of every trial outcome in a session.
///
/// Entries are never mutated or removed; the only way to shrink the log is a
/// whole-session reset.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ResponseLog {
	entries: Vec<Response>,
}

impl ResponseLog {
	/// Create an empty log.
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Append a response.
	///
	/// # Errors
	///
	/// Returns [`Error::OutOfOrderResponse`] when the response's presentation
	/// start precedes the current log tail's. Equal timestamps are accepted.
	pub fn push(&mut self, response: Response) -> Result<()> {
		if let Some(last) = self.entries.last() {
			if response.presentation_start_ms < last.presentation_start_ms {
				return Err(Error::OutOfOrderResponse {
					last_ms: last.presentation_start_ms,
					got_ms: response.presentation_start_ms,
				});
			}
		}
		trace!(
			fact = %response.fact_id,
			start_ms = response.presentation_start_ms,
			timeout = response.is_timeout(),
			"response recorded"
		);
		self.entries.push(response);
		Ok(())
	}

	/// All responses, in temporal order.
	#[must_use]
	pub fn entries(&self) -> &[Response] {
		&self.entries
	}

	/// The most recent response, if any.
	#[must_use]
	pub fn last(&self) -> Option<&Response> {
		self.entries.last()
	}

	/// Responses belonging to one fact, in temporal order.
	pub fn for_fact<'a>(&'a self, id: &'a FactId) -> impl Iterator<Item = &'a Response> {
		self.entries.iter().filter(move |r| r.fact_id == *id)
	}

	/// Number of logged responses.
	#[must_use]
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Check whether the log is empty.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Discard every entry. Only a session reset calls this.
	pub(crate) fn clear(&mut self) {
		self.entries.clear();
	}
}
