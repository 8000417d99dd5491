//! A learner's practice session.
//!
//! The session is the one owner of mutable state: the fact store, the
//! append-only response log, the drill-mode queue, and the random source.
//! Everything else in the crate is a pure function over what the session
//! hands it, so two sessions never share hidden state and a seeded session
//! replays identically.

use std::collections::VecDeque;

use rand::rngs::ThreadRng;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::activation::{compute_activation, ModelConfig};
use crate::error::Result;
use crate::fact::{Fact, FactId};
use crate::response::{Response, ResponseLog};
use crate::scheduler::{answer_choices, select_next, SchedulerConfig, Trial};

/// Composite configuration for a practice session.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SessionConfig {
	/// Memory-model parameters
	pub model: ModelConfig,
	/// Selection-policy parameters
	pub scheduler: SchedulerConfig,
}

/// One learner's practice session.
///
/// The contract with the trial runner is strictly alternating: one
/// [`next_trial`](Self::next_trial) call per trial boundary, followed by
/// exactly one [`record_response`](Self::record_response) once the outcome
/// (including a timeout) is final. Nothing here blocks or suspends.
pub struct Session<R: Rng> {
	facts: Vec<Fact>,
	responses: ResponseLog,
	drill: VecDeque<FactId>,
	config: SessionConfig,
	rng: R,
}

impl Session<ThreadRng> {
	/// Create a session backed by the thread-local generator.
	#[must_use]
	pub fn new(facts: Vec<Fact>, config: SessionConfig) -> Self {
		Self::with_rng(facts, config, rand::thread_rng())
	}
}

impl Session<ChaCha8Rng> {
	/// Create a session whose selections and answer choices replay
	/// identically for the same seed, materials, and response sequence.
	#[must_use]
	pub fn seeded(facts: Vec<Fact>, config: SessionConfig, seed: u64) -> Self {
		Self::with_rng(facts, config, ChaCha8Rng::seed_from_u64(seed))
	}
}

impl<R: Rng> Session<R> {
	/// Create a session with an explicit random source.
	pub fn with_rng(facts: Vec<Fact>, config: SessionConfig, rng: R) -> Self {
		Self {
			facts,
			responses: ResponseLog::new(),
			drill: VecDeque::new(),
			config,
			rng,
		}
	}

	/// Schedule the next presentation.
	///
	/// Also refreshes the drill-mode queue to the facts currently seen.
	///
	/// # Errors
	///
	/// [`Error::EmptyFactSet`](crate::Error::EmptyFactSet) when no facts are
	/// loaded, and
	/// [`Error::InsufficientDistractors`](crate::Error::InsufficientDistractors)
	/// when the materials cannot fill the configured choice count.
	pub fn next_trial(&mut self, now_ms: f64) -> Result<Trial> {
		let selection = select_next(
			now_ms,
			&self.facts,
			&self.responses,
			&self.config.scheduler,
			&self.config.model,
		)?;
		self.drill = selection.seen.into_iter().collect();

		let choices = answer_choices(
			&selection.fact,
			&self.facts,
			self.config.scheduler.choice_count,
			&mut self.rng,
		)?;

		Ok(Trial {
			fact: selection.fact,
			choices,
			study: selection.study,
		})
	}

	/// Append a finalized trial outcome to the log.
	///
	/// # Errors
	///
	/// [`Error::OutOfOrderResponse`](crate::Error::OutOfOrderResponse) when
	/// the response's presentation start precedes the log tail's.
	pub fn record_response(&mut self, response: Response) -> Result<()> {
		self.responses.push(response)
	}

	/// Pop the next fact from the drill-mode queue.
	///
	/// Drill mode walks the seen facts sequentially, independent of the
	/// activation-driven policy; the queue was refreshed by the most recent
	/// [`next_trial`](Self::next_trial) call.
	pub fn next_practiced_fact(&mut self) -> Option<Fact> {
		let id = self.drill.pop_front()?;
		self.facts.iter().find(|fact| fact.id == id).cloned()
	}

	/// Check whether drill mode has facts left.
	#[must_use]
	pub fn has_practiced_facts(&self) -> bool {
		!self.drill.is_empty()
	}

	/// A fact's activation at `time_ms`, or `None` for an unknown id.
	#[must_use]
	pub fn activation(&self, fact_id: &FactId, time_ms: f64) -> Option<f64> {
		let fact = self.facts.iter().find(|fact| fact.id == *fact_id)?;
		Some(compute_activation(
			time_ms,
			fact,
			self.responses.entries(),
			&self.config.model,
		))
	}

	/// The loaded facts, in materials order.
	#[must_use]
	pub fn facts(&self) -> &[Fact] {
		&self.facts
	}

	/// The response log so far.
	#[must_use]
	pub fn responses(&self) -> &ResponseLog {
		&self.responses
	}

	/// The session configuration.
	#[must_use]
	pub fn config(&self) -> &SessionConfig {
		&self.config
	}

	/// Discard facts, responses, and the drill queue in one step.
	///
	/// Must not be called between a selection and the append of its
	/// response; the session is empty afterwards and scheduling fails with a
	/// setup error until new materials are loaded.
	pub fn reset(&mut self) {
		debug!(
			facts = self.facts.len(),
			responses = self.responses.len(),
			"session reset"
		);
		self.facts.clear();
		self.responses.clear();
		self.drill.clear();
	}

	/// Replace the fact set after a reset.
	pub fn load_facts(&mut self, facts: Vec<Fact>) {
		debug!(count = facts.len(), "materials loaded");
		self.facts = facts;
	}
}
