//! Error types for the scheduling engine.

/// Convenience alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during ingestion, scheduling, or response logging.
///
/// Timeouts and unknown correctness are *not* errors: they are ordinary
/// response values consumed by normalization. Every variant here is a failed
/// precondition that is fatal to the call that raised it; nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// Selection was requested on a session with no facts loaded.
	#[error("no facts loaded; load materials before requesting a trial")]
	EmptyFactSet,

	/// Too few distinct wrong answers exist to build a full choice set.
	#[error("need {needed} distinct wrong answers for the choice set, only {available} available")]
	InsufficientDistractors {
		/// Distractors required (choice count minus the correct answer)
		needed: usize,
		/// Distinct wrong answers present in the materials
		available: usize,
	},

	/// The materials header row is missing a required column.
	#[error("materials are missing the required `{0}` column")]
	MissingColumn(String),

	/// A `mu` field could not be parsed as a finite number.
	#[error("record {record}: invalid decay rate `mu` value: {value:?}")]
	InvalidMu {
		/// 1-based data record number
		record: u64,
		/// The offending field content
		value: String,
	},

	/// A response was appended with an earlier start time than the log tail.
	#[error("response at {got_ms}ms precedes the last logged response at {last_ms}ms")]
	OutOfOrderResponse {
		/// Presentation start of the current log tail (ms)
		last_ms: f64,
		/// Presentation start of the rejected response (ms)
		got_ms: f64,
	},

	/// Malformed delimited input (ragged rows, bad quoting, encoding).
	#[error("malformed materials: {0}")]
	Csv(#[from] csv::Error),

	/// I/O failure while reading materials.
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
}

impl Error {
	/// Check whether this error is a setup error (caller violated a
	/// precondition of the session, rather than handing over bad data).
	#[must_use]
	pub const fn is_setup(&self) -> bool {
		matches!(
			self,
			Self::EmptyFactSet | Self::OutOfOrderResponse { .. }
		)
	}

	/// Check whether this error was raised while validating materials.
	#[must_use]
	pub const fn is_ingestion(&self) -> bool {
		matches!(
			self,
			Self::MissingColumn(_) | Self::InvalidMu { .. } | Self::Csv(_) | Self::Io(_)
		)
	}
}
