//! Reading-time and reaction-time model.
//!
//! Latency has two additive parts: the time needed to read the stimulus and
//! the time needed to retrieve the answer from memory. Retrieval latency
//! follows the standard exponential form:
//!
//! ```text
//! RT = (F·e^(−A) + reading/1000) × 1000 ms
//! ```
//!
//! Where `A` is the fact's activation and `F` the fluency (latency scaling)
//! factor. Observed reaction times feed the decay-rate fit only after
//! normalization, which charges incorrect or missing answers a fixed penalty
//! and caps everything at a per-fact plausibility ceiling.

use crate::activation::ModelConfig;
use crate::response::Response;

/// Reading-speed floor (ms): no stimulus reads faster than this.
pub const MIN_READING_TIME_MS: f64 = 300.0;

/// Intercept of the linear reading-time estimate (ms).
const READING_INTERCEPT_MS: f64 = -157.9;

/// Per-character slope of the linear reading-time estimate (ms).
const READING_SLOPE_MS: f64 = 19.5;

/// How far above the forgetting-boundary prediction a reaction time may
/// plausibly go before it is treated as an outlier.
const MAX_RT_SCALE: f64 = 1.5;

/// Estimate how long the learner needs to read a stimulus.
///
/// Multi-word stimuli scale linearly with character count (Unicode scalar
/// values); single words get the flat floor.
#[must_use]
pub fn reading_time_ms(text: &str) -> f64 {
	let word_count = text.split_whitespace().count();
	if word_count > 1 {
		#[allow(clippy::cast_precision_loss)]
		let character_count = text.chars().count() as f64;
		READING_SLOPE_MS
			.mul_add(character_count, READING_INTERCEPT_MS)
			.max(MIN_READING_TIME_MS)
	} else {
		MIN_READING_TIME_MS
	}
}

/// Predict a reaction time (ms) from activation and reading time.
///
/// `RT = (F·e^(−A) + reading/1000) × 1000`
///
/// Higher activation means faster retrieval; the reading time is a floor the
/// retrieval component sits on top of.
#[inline]
#[must_use]
pub fn predicted_reaction_time_ms(activation: f64, reading_time_ms: f64, config: &ModelConfig) -> f64 {
	(config
		.fluency
		.mul_add((-activation).exp(), reading_time_ms / 1000.0))
		* 1000.0
}

/// The slowest plausible reaction time for a stimulus.
///
/// This is the reaction time expected right at the forgetting boundary,
/// scaled up. Anything above it says more about the learner's attention than
/// about memory decay, so normalization clips there.
#[must_use]
pub fn max_reaction_time_ms(text: &str, config: &ModelConfig) -> f64 {
	MAX_RT_SCALE * predicted_reaction_time_ms(config.forget_threshold, reading_time_ms(text), config)
}

/// Normalize an observed response for decay fitting.
///
/// Correct answers keep their observed latency; wrong, unknown, and absent
/// answers are all charged the fixed penalty (a wrong answer is treated as a
/// maximally slow retrieval). The result is capped at
/// [`max_reaction_time_ms`] for the response's own text, so an infinite
/// timeout normalizes to the cap.
#[must_use]
pub fn normalized_reaction_time_ms(response: &Response, config: &ModelConfig) -> f64 {
	let observed = if response.correct == Some(true) {
		response.reaction_time_ms
	} else {
		config.incorrect_penalty_ms
	};
	observed.min(max_reaction_time_ms(&response.text, config))
}
