//! # Mnemo Core
//!
//! Adaptive retrieval-practice scheduling driven by an activation/decay
//! model of declarative memory.
//!
//! ## Why model the learner?
//!
//! Fixed review intervals treat every learner and every item the same. But
//! forgetting is personal: the same word fades at different speeds for
//! different people, and the learner's own reaction times tell us how fast.
//! This crate watches those latencies and schedules each fact at the moment
//! it is about to slip away.
//!
//! ## Core Concepts
//!
//! ### Activation
//!
//! Every fact has a log-scale recall strength derived from its past
//! encounters, each decaying under the power law:
//!
//! ```text
//! A(t) = ln[ Σ ((t − t_e)/1000)^(−d_e) ]
//! d_e  = c·e^(A_e) + α
//! ```
//!
//! A fact with no encounters sits at `−∞` (unseen).
//!
//! ### Alpha fitting
//!
//! `α` is each fact's personal decay rate. After every encounter it is refit
//! by a fixed-iteration bisection that reconciles predicted reaction times
//! (`RT = (F·e^(−A) + reading/1000) × 1000`) with the learner's normalized
//! observed ones.
//!
//! ### Selection
//!
//! The scheduler evaluates every fact's activation a lookahead interval into
//! the future, reinforces the weakest seen fact once anything falls below
//! the forget threshold, and introduces new material otherwise, with an
//! immediate-repetition guard and multiple-choice distractor generation on
//! top.
//!
//! ## Example
//!
//! ```rust
//! use mnemo_core::{Fact, Response, Session, SessionConfig};
//!
//! let facts = vec![
//! 	Fact::new("fruit-1", "pomme", "apple", 0.3),
//! 	Fact::new("fruit-2", "poire", "pear", 0.3),
//! 	Fact::new("fruit-3", "prune", "plum", 0.3),
//! 	Fact::new("fruit-4", "cerise", "cherry", 0.3),
//! 	Fact::new("fruit-5", "fraise", "strawberry", 0.3),
//! ];
//!
//! let mut session = Session::seeded(facts, SessionConfig::default(), 7);
//!
//! // An empty log means the first trial introduces new material.
//! let trial = session.next_trial(0.0)?;
//! assert!(trial.study);
//! assert_eq!(trial.choices.len(), 4);
//!
//! // The learner answers correctly after 1.2 seconds.
//! session.record_response(Response::answered(
//! 	trial.fact.id.clone(),
//! 	0.0,
//! 	1200.0,
//! 	true,
//! 	trial.fact.text.clone(),
//! ))?;
//!
//! // By the next decision the fresh fact has already decayed below the
//! // forget threshold at the lookahead horizon, so it is reinforced as a
//! // test trial before anything new appears.
//! let next = session.next_trial(5000.0)?;
//! assert_eq!(next.fact.id, trial.fact.id);
//! assert!(!next.study);
//! # Ok::<(), mnemo_core::Error>(())
//! ```
//!
//! ## Guarantees
//!
//! - Estimates are pure functions of the response log: no per-fact cache,
//!   no hidden globals, reproducible under a seeded generator.
//! - Bounded work per call: the alpha fit runs exactly 6 bisection
//!   iterations over at most 5 encounters.
//! - Timeouts are data (`f64::INFINITY` reaction time), never control flow.
//!
//! ## References
//!
//! - Anderson, J. R., & Schooler, L. J. (1991). *Reflections of the
//!   environment in memory* - power-law forgetting
//! - Pavlik Jr, P. I., & Anderson, J. R. (2005). *Practice and forgetting
//!   effects on vocabulary memory* - activation-based spacing
//! - van Rijn, H., van Maanen, L., & van Woudenberg, M. (2009). *Passing
//!   the test: Improving learning gains by balancing spacing and testing
//!   effects* - adaptive fact scheduling from reaction times

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod activation;
pub mod error;
pub mod fact;
pub mod materials;
pub mod reaction_time;
pub mod response;
pub mod scheduler;
pub mod session;

pub use activation::{
	activation_from_encounters,
	compute_activation,
	compute_decay,
	estimate_alpha,
	Encounter,
	ModelConfig,
};
pub use error::{Error, Result};
pub use fact::{Fact, FactId};
pub use materials::{parse_materials, parse_materials_path, shuffle_facts};
pub use reaction_time::{
	max_reaction_time_ms, normalized_reaction_time_ms, predicted_reaction_time_ms,
	reading_time_ms, MIN_READING_TIME_MS,
};
pub use response::{Response, ResponseLog};
pub use scheduler::{answer_choices, select_next, SchedulerConfig, Selection, Trial};
pub use session::{Session, SessionConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
