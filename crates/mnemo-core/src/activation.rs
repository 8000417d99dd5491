//! Activation estimation and online decay-rate fitting.
//!
//! The mathematics of forgetting, on the learner's own clock.
//!
//! A fact's recall strength is its log-activation over its past encounters:
//!
//! ```text
//! A(t) = ln[ Σ ((t − t_e)/1000)^(−d_e) ]    over encounters with t_e < t
//! ```
//!
//! Each encounter decays at its own rate:
//!
//! ```text
//! d_e = c·e^(A_e) + α
//! ```
//!
//! where `A_e` is the activation the fact had when that encounter began and
//! `α` is the fact's decay-rate parameter. `α` starts at the fact's baseline
//! `mu` and is refit after every encounter by comparing predicted against
//! observed reaction times, so the model speeds up or slows down the
//! forgetting curve to match the learner it is watching.
//!
//! Everything here is recomputed from the response log on every query: the
//! result is a pure function of the log, with no hidden per-fact cache.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::fact::Fact;
use crate::reaction_time::{
	normalized_reaction_time_ms, predicted_reaction_time_ms, reading_time_ms,
};
use crate::response::Response;

/// Half-width of the alpha search interval around the previous fit.
const ALPHA_SEARCH_STEP: f64 = 0.05;

/// Fixed number of bisection iterations per refit.
const ALPHA_BISECTION_ITERATIONS: usize = 6;

/// Maximum number of recent encounters scored by the fit error.
const ERROR_WINDOW: usize = 5;

/// Encounters below this count carry too little signal to fit alpha.
const MIN_FIT_ENCOUNTERS: usize = 3;

/// Offset (ms) subtracted when re-predicting a window encounter's reaction
/// time, so the strict time filter excludes the encounter itself.
const FIT_PROBE_OFFSET_MS: f64 = 100.0;

type EncounterBuf = SmallVec<[Encounter; 8]>;

/// Parameters of the memory model.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelConfig {
	/// Baseline decay rate for facts whose materials carry no `mu`
	pub default_mu: f64,
	/// `c` in the decay equation `d = c·e^A + α`
	pub decay_scale: f64,
	/// `F`, the latency scaling factor of the reaction-time model
	pub fluency: f64,
	/// Activation below which a fact is considered at risk of being forgotten
	pub forget_threshold: f64,
	/// Reaction time (ms) charged to incorrect or unanswered trials
	pub incorrect_penalty_ms: f64,
}

impl Default for ModelConfig {
	fn default() -> Self {
		Self {
			default_mu: 0.3,
			decay_scale: 0.25,
			fluency: 1.0,
			forget_threshold: -0.8,
			incorrect_penalty_ms: 60_000.0,
		}
	}
}

/// One past presentation of a fact, derived from the response log.
///
/// Never stored: the full encounter set is rebuilt from the log on every
/// activation query, and every encounter's `decay` is restamped whenever the
/// fact's alpha estimate moves, so all decays are always consistent with the
/// single current alpha.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Encounter {
	/// Activation the fact had at the moment this encounter began
	pub activation: f64,
	/// Absolute presentation time (ms)
	pub time_ms: f64,
	/// Normalized observed reaction time (ms)
	pub reaction_time_ms: f64,
	/// Power-law decay under the fact's current alpha estimate
	pub decay: f64,
}

/// Per-encounter decay: `d = c·e^A + α`.
///
/// The first encounter of an unseen fact has `A = −∞`, so its decay is
/// exactly alpha.
#[inline]
#[must_use]
pub fn compute_decay(activation: f64, alpha: f64, config: &ModelConfig) -> f64 {
	config.decay_scale.mul_add(activation.exp(), alpha)
}

/// Log-activation of an encounter set at `time_ms`.
///
/// Only encounters strictly before `time_ms` contribute; an empty sum yields
/// `−∞` (the unseen state).
#[must_use]
pub fn activation_from_encounters(encounters: &[Encounter], time_ms: f64) -> f64 {
	activation_with_decay_offset(encounters, time_ms, 0.0)
}

/// Same as [`activation_from_encounters`], with every decay shifted by a
/// constant. Decay is linear in alpha, so this evaluates the encounter set
/// under a candidate alpha without copying it.
fn activation_with_decay_offset(encounters: &[Encounter], time_ms: f64, decay_offset: f64) -> f64 {
	let sum: f64 = encounters
		.iter()
		.filter(|e| e.time_ms < time_ms)
		.map(|e| ((time_ms - e.time_ms) / 1000.0).powf(-(e.decay + decay_offset)))
		.sum();
	sum.ln()
}

/// Estimate a fact's log-activation at `time_ms` from the response log.
///
/// Replays the fact's responses in temporal order as a single forward fold:
/// each response becomes an encounter stamped with the activation the fact
/// had at its presentation start, the fact's alpha is refit against that
/// encounter's observed latency, and every encounter's decay is restamped
/// under the new alpha. The returned value is the activation of the final
/// decay-stamped encounter set at `time_ms`.
///
/// Returns `−∞` exactly when no response for this fact precedes `time_ms`.
#[must_use]
pub fn compute_activation(
	time_ms: f64,
	fact: &Fact,
	responses: &[Response],
	config: &ModelConfig,
) -> f64 {
	let mut encounters = EncounterBuf::new();
	let mut alpha = fact.mu;

	for response in responses.iter().filter(|r| r.fact_id == fact.id) {
		let at_start = activation_from_encounters(&encounters, response.presentation_start_ms);
		encounters.push(Encounter {
			activation: at_start,
			time_ms: response.presentation_start_ms,
			reaction_time_ms: normalized_reaction_time_ms(response, config),
			decay: compute_decay(at_start, alpha, config),
		});

		alpha = estimate_alpha(&encounters, at_start, response, alpha, fact.mu, config);

		for encounter in &mut encounters {
			encounter.decay = compute_decay(encounter.activation, alpha, config);
		}
	}

	activation_from_encounters(&encounters, time_ms)
}

/// Refit the decay-rate parameter after a new encounter.
///
/// With fewer than three encounters the baseline `mu` is returned unchanged.
/// Otherwise the sign of the prediction error picks the search direction
/// (an undershot reaction time means the fact decayed faster than the
/// previous fit assumed) and a fixed-iteration bisection over
/// `previous_alpha ± 0.05` minimizes the summed absolute reaction-time error
/// over the most recent encounters. Deterministic: the same history and
/// response always produce the same fit.
#[must_use]
pub fn estimate_alpha(
	encounters: &[Encounter],
	activation: f64,
	response: &Response,
	previous_alpha: f64,
	mu: f64,
	config: &ModelConfig,
) -> f64 {
	if encounters.len() < MIN_FIT_ENCOUNTERS {
		return mu;
	}

	let reading_time = reading_time_ms(&response.text);
	let estimated_rt = predicted_reaction_time_ms(activation, reading_time, config);
	let observed_rt = normalized_reaction_time_ms(response, config);

	let (mut lo, mut hi) = if estimated_rt < observed_rt {
		// Retrieval was slower than predicted: true decay is larger
		(previous_alpha, previous_alpha + ALPHA_SEARCH_STEP)
	} else {
		(previous_alpha - ALPHA_SEARCH_STEP, previous_alpha)
	};

	// The first encounter starts from -inf activation and has no usable
	// prediction, so the window never reaches back to it.
	let window_start = encounters.len().saturating_sub(ERROR_WINDOW).max(1);
	let window = &encounters[window_start..];

	for _ in 0..ALPHA_BISECTION_ITERATIONS {
		let lo_error = prediction_error(window, encounters, lo - previous_alpha, reading_time, config);
		let hi_error = prediction_error(window, encounters, hi - previous_alpha, reading_time, config);

		let mid = (lo + hi) / 2.0;
		if lo_error < hi_error {
			hi = mid;
		} else {
			lo = mid;
		}
	}

	(lo + hi) / 2.0
}

/// Summed absolute error between observed and predicted reaction times over
/// the fit window, with every decay shifted by `decay_offset`.
///
/// Each window encounter is re-predicted from the activation just before its
/// own presentation, so the strict time filter excludes the encounter itself
/// and anything presented at the same instant.
fn prediction_error(
	window: &[Encounter],
	encounters: &[Encounter],
	decay_offset: f64,
	reading_time: f64,
	config: &ModelConfig,
) -> f64 {
	window
		.iter()
		.map(|probe| {
			let activation = activation_with_decay_offset(
				encounters,
				probe.time_ms - FIT_PROBE_OFFSET_MS,
				decay_offset,
			);
			let predicted = predicted_reaction_time_ms(activation, reading_time, config);
			(probe.reaction_time_ms - predicted).abs()
		})
		.sum()
}
