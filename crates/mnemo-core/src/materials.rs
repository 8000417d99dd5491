//! Materials ingestion: delimited text into fact records.
//!
//! Materials arrive as tabular delimited text with a header row. The only
//! required column is `answer`; `id`, `text`, `image`, and `mu` are
//! recognized when present. Validation happens here at the boundary: a
//! malformed `mu` is an ingestion error and never reaches the activation
//! arithmetic as a NaN.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::activation::ModelConfig;
use crate::error::{Error, Result};
use crate::fact::{Fact, FactId};

/// Column holding the expected answer. Required.
const COLUMN_ANSWER: &str = "answer";
/// Column holding the fact identifier. Optional; row numbers fill in.
const COLUMN_ID: &str = "id";
/// Column holding the stimulus text. Optional.
const COLUMN_TEXT: &str = "text";
/// Column holding an image reference. Optional.
const COLUMN_IMAGE: &str = "image";
/// Column holding the per-fact baseline decay rate. Optional.
const COLUMN_MU: &str = "mu";

/// Parse facts from delimited text with a header row.
///
/// Rows whose fields are all blank are skipped; rows without an `id` get one
/// synthesized from their 1-based record number; rows without a `mu` fall
/// back to `config.default_mu`.
///
/// # Errors
///
/// [`Error::MissingColumn`] when the header lacks `answer`,
/// [`Error::InvalidMu`] when a `mu` field is not a finite number, and
/// [`Error::Csv`] for structurally malformed input.
pub fn parse_materials<R: Read>(reader: R, config: &ModelConfig) -> Result<Vec<Fact>> {
	let mut csv_reader = csv::ReaderBuilder::new()
		.trim(csv::Trim::All)
		.from_reader(reader);

	let headers = csv_reader.headers()?.clone();
	let column = |name: &str| headers.iter().position(|h| h == name);

	let answer_idx = column(COLUMN_ANSWER).ok_or_else(|| Error::MissingColumn(COLUMN_ANSWER.into()))?;
	let id_idx = column(COLUMN_ID);
	let text_idx = column(COLUMN_TEXT);
	let image_idx = column(COLUMN_IMAGE);
	let mu_idx = column(COLUMN_MU);

	let mut facts = Vec::new();
	for (index, record) in csv_reader.records().enumerate() {
		let record = record?;
		if record.iter().all(str::is_empty) {
			continue;
		}
		let record_number = index as u64 + 1;

		let field = |idx: Option<usize>| {
			idx.and_then(|i| record.get(i))
				.filter(|value| !value.is_empty())
		};

		let mu = match field(mu_idx) {
			Some(raw) => {
				let parsed: f64 = raw.parse().map_err(|_| Error::InvalidMu {
					record: record_number,
					value: raw.to_owned(),
				})?;
				if !parsed.is_finite() {
					return Err(Error::InvalidMu {
						record: record_number,
						value: raw.to_owned(),
					});
				}
				parsed
			}
			None => config.default_mu,
		};

		let id = field(id_idx)
			.map_or_else(|| record_number.to_string(), ToOwned::to_owned);

		facts.push(Fact {
			id: FactId::new(id),
			text: field(text_idx).unwrap_or_default().to_owned(),
			image: field(image_idx).map(ToOwned::to_owned),
			answer: record.get(answer_idx).unwrap_or_default().to_owned(),
			mu,
		});
	}

	debug!(count = facts.len(), "materials parsed");
	Ok(facts)
}

/// Parse facts from a file on disk.
///
/// # Errors
///
/// [`Error::Io`] when the file cannot be opened, plus everything
/// [`parse_materials`] reports.
pub fn parse_materials_path(path: impl AsRef<Path>, config: &ModelConfig) -> Result<Vec<Fact>> {
	let file = File::open(path)?;
	parse_materials(file, config)
}

/// Shuffle the introduction order of freshly loaded facts.
///
/// Unseen facts are introduced in materials order, so shuffling here is how
/// a randomized item order is realized.
pub fn shuffle_facts<R: Rng>(facts: &mut [Fact], rng: &mut R) {
	facts.shuffle(rng);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand_chacha::ChaCha8Rng;

	#[test]
	fn test_parse_full_materials() {
		let data = "\
id,text,image,answer,mu
greek-1,ἄλφα,img/alpha.png,alpha,0.25
greek-2,βῆτα,,beta,0.35
";
		let facts = parse_materials(data.as_bytes(), &ModelConfig::default()).unwrap();
		assert_eq!(facts.len(), 2);
		assert_eq!(facts[0].id, FactId::new("greek-1"));
		assert_eq!(facts[0].image.as_deref(), Some("img/alpha.png"));
		assert!((facts[0].mu - 0.25).abs() < 1e-12);
		assert_eq!(facts[1].answer, "beta");
		assert_eq!(facts[1].image, None);
	}

	#[test]
	fn test_missing_mu_column_uses_default() {
		let data = "id,text,answer\n1,casa,house\n2,perro,dog\n";
		let facts = parse_materials(data.as_bytes(), &ModelConfig::default()).unwrap();
		assert!(facts.iter().all(|f| (f.mu - 0.3).abs() < 1e-12));
	}

	#[test]
	fn test_empty_mu_field_uses_default() {
		let data = "answer,mu\nhouse,\ndog,0.4\n";
		let facts = parse_materials(data.as_bytes(), &ModelConfig::default()).unwrap();
		assert!((facts[0].mu - 0.3).abs() < 1e-12);
		assert!((facts[1].mu - 0.4).abs() < 1e-12);
	}

	#[test]
	fn test_invalid_mu_is_rejected_at_ingestion() {
		let data = "answer,mu\nhouse,fast\n";
		let err = parse_materials(data.as_bytes(), &ModelConfig::default()).unwrap_err();
		assert!(matches!(err, Error::InvalidMu { record: 1, .. }));
		assert!(err.is_ingestion());
	}

	#[test]
	fn test_non_finite_mu_is_rejected() {
		for bad in ["NaN", "inf", "-inf"] {
			let data = format!("answer,mu\nhouse,{bad}\n");
			let err = parse_materials(data.as_bytes(), &ModelConfig::default()).unwrap_err();
			assert!(matches!(err, Error::InvalidMu { .. }), "{bad} must be rejected");
		}
	}

	#[test]
	fn test_missing_answer_column_is_rejected() {
		let data = "id,text\n1,casa\n";
		let err = parse_materials(data.as_bytes(), &ModelConfig::default()).unwrap_err();
		assert!(matches!(err, Error::MissingColumn(ref c) if c == "answer"));
	}

	#[test]
	fn test_ids_are_synthesized_from_record_numbers() {
		let data = "answer\nhouse\ndog\ncat\n";
		let facts = parse_materials(data.as_bytes(), &ModelConfig::default()).unwrap();
		let ids: Vec<&str> = facts.iter().map(|f| f.id.as_str()).collect();
		assert_eq!(ids, vec!["1", "2", "3"]);
	}

	#[test]
	fn test_blank_rows_are_skipped() {
		let data = "id,answer\n1,house\n,\n2,dog\n";
		let facts = parse_materials(data.as_bytes(), &ModelConfig::default()).unwrap();
		assert_eq!(facts.len(), 2);
		// Record numbering still counts the skipped row
		assert_eq!(facts[1].id, FactId::new("2"));
	}

	#[test]
	fn test_shuffle_is_reproducible_under_seed() {
		let data = "answer\na\nb\nc\nd\ne\nf\n";
		let mut first = parse_materials(data.as_bytes(), &ModelConfig::default()).unwrap();
		let mut second = first.clone();

		let mut rng = ChaCha8Rng::seed_from_u64(17);
		shuffle_facts(&mut first, &mut rng);
		let mut rng = ChaCha8Rng::seed_from_u64(17);
		shuffle_facts(&mut second, &mut rng);
		assert_eq!(first, second);
	}
}
