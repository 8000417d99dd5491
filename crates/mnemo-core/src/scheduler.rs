//! Next-fact selection policy and answer-choice generation.
//!
//! The policy evaluates every fact's activation a little into the future,
//! at the moment the item will actually be on screen rather than the moment
//! the decision is made, and then chooses between reinforcing the weakest seen
//! fact and introducing the next unseen one:
//!
//! 1. Partition facts into *seen* (finite lookahead activation) and
//!    *unseen*, preserving materials order for the unseen.
//! 2. With more than two seen facts, drop the fact that was just answered.
//! 3. Reinforce the minimum-activation seen fact when nothing new remains
//!    or anything seen has sunk below the forget threshold; otherwise
//!    introduce the first unseen fact as a study trial.
//!
//! All randomness flows through an injected [`Rng`] so selections are
//! reproducible under a seeded generator.

use std::cmp::Ordering;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::activation::{compute_activation, ModelConfig};
use crate::error::{Error, Result};
use crate::fact::{Fact, FactId};
use crate::response::ResponseLog;

/// Facts beyond this count enable the immediate-repetition guard.
const REPETITION_GUARD_MIN_SEEN: usize = 2;

/// Scheduling policy parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SchedulerConfig {
	/// Forward offset (ms) for activation queries, anticipating the latency
	/// between deciding on an item and actually presenting it
	pub lookahead_ms: f64,
	/// Answer options per trial, correct answer included
	pub choice_count: usize,
}

impl Default for SchedulerConfig {
	fn default() -> Self {
		Self {
			lookahead_ms: 15_000.0,
			choice_count: 4,
		}
	}
}

/// A scheduled presentation, ready for the trial runner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trial {
	/// The fact to present
	pub fact: Fact,
	/// Answer options; the correct answer appears exactly once, at a random
	/// position
	pub choices: Vec<String>,
	/// `true` for a study trial (answer shown, not scored); `false` for a
	/// test trial (answer hidden, scored)
	pub study: bool,
}

/// Outcome of one selection pass, before choice generation.
#[derive(Clone, Debug)]
pub struct Selection {
	/// The chosen fact
	pub fact: Fact,
	/// Whether the fact is presented as new material
	pub study: bool,
	/// Ids of every seen fact at this decision, in materials order; feeds
	/// the drill-mode queue
	pub seen: Vec<FactId>,
}

/// Choose the next fact to present.
///
/// # Errors
///
/// Returns [`Error::EmptyFactSet`] when `facts` is empty; the caller must
/// load materials before scheduling.
pub fn select_next(
	now_ms: f64,
	facts: &[Fact],
	responses: &ResponseLog,
	scheduler: &SchedulerConfig,
	model: &ModelConfig,
) -> Result<Selection> {
	if facts.is_empty() {
		return Err(Error::EmptyFactSet);
	}

	let horizon_ms = now_ms + scheduler.lookahead_ms;
	let mut seen: Vec<(&Fact, f64)> = Vec::new();
	let mut unseen: Vec<&Fact> = Vec::new();
	for fact in facts {
		let activation = compute_activation(horizon_ms, fact, responses.entries(), model);
		if activation > f64::NEG_INFINITY {
			seen.push((fact, activation));
		} else {
			unseen.push(fact);
		}
	}

	let seen_ids: Vec<FactId> = seen.iter().map(|(fact, _)| fact.id.clone()).collect();

	// An item must not immediately follow its own test once the set is big
	// enough to offer an alternative.
	if seen.len() > REPETITION_GUARD_MIN_SEEN {
		if let Some(last) = responses.last() {
			seen.retain(|(fact, _)| fact.id != last.fact_id);
		}
	}

	let forgotten = seen
		.iter()
		.any(|&(_, activation)| activation < model.forget_threshold);

	let (fact, study) = if unseen.is_empty() || forgotten {
		let &(weakest, activation) = seen
			.iter()
			.min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
			.ok_or(Error::EmptyFactSet)?;
		debug!(fact = %weakest.id, activation, "reinforcing weakest seen fact");
		(weakest, false)
	} else {
		let next = unseen[0];
		debug!(fact = %next.id, "introducing new fact");
		(next, true)
	};

	Ok(Selection {
		fact: fact.clone(),
		study,
		seen: seen_ids,
	})
}

/// Build the answer options for a fact.
///
/// Distractors are the distinct answers of other facts that differ textually
/// from the correct one; `n − 1` of them are sampled without replacement,
/// the correct answer is appended, and the whole set is shuffled, so the
/// correct answer appears exactly once at a random position.
///
/// # Errors
///
/// Returns [`Error::InsufficientDistractors`] when the materials hold fewer
/// than `n − 1` distinct wrong answers; a short choice list is never
/// returned silently.
pub fn answer_choices<R: Rng>(
	fact: &Fact,
	facts: &[Fact],
	n: usize,
	rng: &mut R,
) -> Result<Vec<String>> {
	let mut distractors: Vec<&str> = Vec::new();
	for other in facts {
		if other.answer != fact.answer && !distractors.contains(&other.answer.as_str()) {
			distractors.push(&other.answer);
		}
	}

	let needed = n.saturating_sub(1);
	if distractors.len() < needed {
		return Err(Error::InsufficientDistractors {
			needed,
			available: distractors.len(),
		});
	}

	distractors.shuffle(rng);
	let mut choices: Vec<String> = distractors
		.into_iter()
		.take(needed)
		.map(ToOwned::to_owned)
		.collect();
	choices.push(fact.answer.clone());
	choices.shuffle(rng);
	Ok(choices)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
	use super::*;
	use crate::response::Response;
	use rand::SeedableRng;
	use rand_chacha::ChaCha8Rng;

	fn facts(n: usize) -> Vec<Fact> {
		(0..n)
			.map(|i| Fact::new(format!("f{i}"), format!("text {i}"), format!("answer {i}"), 0.3))
			.collect()
	}

	fn rng() -> ChaCha8Rng {
		ChaCha8Rng::seed_from_u64(42)
	}

	#[test]
	fn test_empty_fact_set_is_a_setup_error() {
		let log = ResponseLog::new();
		let err = select_next(
			0.0,
			&[],
			&log,
			&SchedulerConfig::default(),
			&ModelConfig::default(),
		)
		.unwrap_err();
		assert!(err.is_setup());
	}

	#[test]
	fn test_fresh_session_introduces_first_fact_as_study() {
		let facts = facts(4);
		let log = ResponseLog::new();
		let selection = select_next(
			0.0,
			&facts,
			&log,
			&SchedulerConfig::default(),
			&ModelConfig::default(),
		)
		.unwrap();

		assert_eq!(selection.fact.id, facts[0].id);
		assert!(selection.study);
		assert!(selection.seen.is_empty());
	}

	#[test]
	fn test_single_fact_empty_log_selects_it_for_study() {
		let fact = vec![Fact::new("a", "word", "x", 0.3)];
		let log = ResponseLog::new();
		let selection = select_next(
			0.0,
			&fact,
			&log,
			&SchedulerConfig::default(),
			&ModelConfig::default(),
		)
		.unwrap();

		assert_eq!(selection.fact.id, FactId::new("a"));
		assert!(selection.study);
	}

	#[test]
	fn test_forgotten_fact_is_reinforced_before_new_material() {
		let facts = facts(4);
		let mut log = ResponseLog::new();
		// A single encounter decays below the forget threshold by the time
		// the lookahead horizon reaches 15s: ln(15^-0.3) ≈ -0.81.
		log.push(Response::answered("f0", 0.0, 900.0, true, "text 0"))
			.unwrap();

		let selection = select_next(
			0.0,
			&facts,
			&log,
			&SchedulerConfig::default(),
			&ModelConfig::default(),
		)
		.unwrap();

		assert_eq!(selection.fact.id, facts[0].id);
		assert!(!selection.study);
		assert_eq!(selection.seen, vec![facts[0].id.clone()]);
	}

	#[test]
	fn test_stable_fact_lets_new_material_through() {
		let facts = facts(4);
		let mut log = ResponseLog::new();
		// Two close encounters keep f0 above threshold at the horizon.
		log.push(Response::answered("f0", 0.0, 900.0, true, "text 0"))
			.unwrap();
		log.push(Response::answered("f0", 10_000.0, 700.0, true, "text 0"))
			.unwrap();

		let selection = select_next(
			10_500.0,
			&facts,
			&log,
			&SchedulerConfig::default(),
			&ModelConfig::default(),
		)
		.unwrap();

		assert_eq!(selection.fact.id, facts[1].id);
		assert!(selection.study);
	}

	#[test]
	fn test_no_immediate_repetition_with_three_seen_facts() {
		let facts = facts(3);
		let mut log = ResponseLog::new();
		// All three facts seen; f2 was answered last and, with a single
		// encounter against the others' two, is also the weakest at the
		// horizon, so only the repetition guard can keep it away.
		log.push(Response::answered("f0", 0.0, 900.0, true, "text 0"))
			.unwrap();
		log.push(Response::answered("f0", 20_000.0, 700.0, true, "text 0"))
			.unwrap();
		log.push(Response::answered("f1", 40_000.0, 900.0, true, "text 1"))
			.unwrap();
		log.push(Response::answered("f1", 60_000.0, 700.0, true, "text 1"))
			.unwrap();
		log.push(Response::answered("f2", 80_000.0, 900.0, true, "text 2"))
			.unwrap();

		let selection = select_next(
			200_000.0,
			&facts,
			&log,
			&SchedulerConfig::default(),
			&ModelConfig::default(),
		)
		.unwrap();

		assert_ne!(selection.fact.id, FactId::new("f2"));
		// The next-weakest fact is reinforced instead
		assert_eq!(selection.fact.id, FactId::new("f0"));
		assert!(!selection.study);
		// The drill set still contains every seen fact
		assert_eq!(selection.seen.len(), 3);
	}

	#[test]
	fn test_choice_set_properties() {
		let facts = facts(8);
		let mut rng = rng();

		for _ in 0..20 {
			let choices = answer_choices(&facts[3], &facts, 4, &mut rng).unwrap();
			assert_eq!(choices.len(), 4);
			assert_eq!(
				choices.iter().filter(|c| c.as_str() == "answer 3").count(),
				1
			);
			let mut wrong: Vec<&String> =
				choices.iter().filter(|c| c.as_str() != "answer 3").collect();
			assert_eq!(wrong.len(), 3);
			wrong.sort();
			wrong.dedup();
			assert_eq!(wrong.len(), 3, "distractors must be distinct");
		}
	}

	#[test]
	fn test_insufficient_distractors_is_reported() {
		let facts = facts(3);
		let err = answer_choices(&facts[0], &facts, 4, &mut rng()).unwrap_err();
		assert!(matches!(
			err,
			Error::InsufficientDistractors {
				needed: 3,
				available: 2,
			}
		));
	}

	#[test]
	fn test_duplicate_answers_count_once() {
		let mut set = facts(4);
		// Two facts share an answer: only three distinct wrong answers exist
		// for f0 → still enough for n = 4.
		set.push(Fact::new("f4", "text 4", "answer 3", 0.3));
		let choices = answer_choices(&set[0], &set, 4, &mut rng()).unwrap();
		assert_eq!(choices.len(), 4);

		// But n = 5 must fail: there are only 3 distinct wrong answers.
		let err = answer_choices(&set[0], &set, 5, &mut rng()).unwrap_err();
		assert!(matches!(
			err,
			Error::InsufficientDistractors {
				needed: 4,
				available: 3,
			}
		));
	}

	#[test]
	fn test_seeded_choices_are_reproducible() {
		let facts = facts(10);
		let a = answer_choices(&facts[0], &facts, 4, &mut rng()).unwrap();
		let b = answer_choices(&facts[0], &facts, 4, &mut rng()).unwrap();
		assert_eq!(a, b);
	}
}
