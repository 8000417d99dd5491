//! Fact records and identifiers.
//!
//! A [`Fact`] is one learnable item from the materials: a stimulus text, the
//! expected answer, and a baseline decay rate `mu` used until the fact has
//! accumulated enough response history for its own decay estimate.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier of a fact within one session's materials.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactId(String);

impl FactId {
	/// Create an identifier from anything string-like.
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	/// View the identifier as a string slice.
	#[must_use]
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for FactId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for FactId {
	fn from(id: &str) -> Self {
		Self(id.to_owned())
	}
}

impl From<String> for FactId {
	fn from(id: String) -> Self {
		Self(id)
	}
}

/// One learnable item.
///
/// Facts are immutable after load. Per-presentation decoration (answer
/// choices, study flag) lives on [`Trial`](crate::scheduler::Trial), never on
/// the stored fact.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fact {
	/// Stable identifier, referenced by responses
	pub id: FactId,
	/// Stimulus text shown to the learner
	pub text: String,
	/// Optional image reference accompanying the stimulus
	pub image: Option<String>,
	/// The expected answer string
	pub answer: String,
	/// Baseline decay rate, used verbatim until three encounters exist
	pub mu: f64,
}

impl Fact {
	/// Create a text-only fact.
	pub fn new(
		id: impl Into<FactId>,
		text: impl Into<String>,
		answer: impl Into<String>,
		mu: f64,
	) -> Self {
		Self {
			id: id.into(),
			text: text.into(),
			image: None,
			answer: answer.into(),
			mu,
		}
	}

	/// Attach an image reference to the stimulus.
	#[must_use]
	pub fn with_image(mut self, image: impl Into<String>) -> Self {
		self.image = Some(image.into());
		self
	}
}
