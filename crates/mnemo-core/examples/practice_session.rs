//! Simulated Practice Session Example
//!
//! This example walks through a short vocabulary session:
//! 1. Parse a small materials table
//! 2. Ask the scheduler for trials and play a simulated learner
//! 3. Watch activations and the study/test balance evolve
//! 4. Drain the drill-mode queue at the end
//!
//! Run with: `cargo run --example practice_session`

use mnemo_core::{
	parse_materials, predicted_reaction_time_ms, reading_time_ms, Response, Session,
	SessionConfig,
};

const MATERIALS: &str = "\
id,text,answer,mu
sv-1,hund,dog,0.3
sv-2,katt,cat,0.3
sv-3,häst,horse,0.25
sv-4,fågel,bird,0.35
sv-5,fisk,fish,0.3
sv-6,björn,bear,0.3
";

fn main() -> mnemo_core::Result<()> {
	let config = SessionConfig::default();
	let facts = parse_materials(MATERIALS.as_bytes(), &config.model)?;
	println!("=== Simulated Practice Session ===");
	println!("{} facts loaded\n", facts.len());

	let model = config.model.clone();
	let mut session = Session::seeded(facts, config, 2024);

	let mut now_ms = 0.0;
	for trial_number in 1..=16 {
		let trial = session.next_trial(now_ms)?;
		let mode = if trial.study { "STUDY" } else { "TEST " };
		let activation = session
			.activation(&trial.fact.id, now_ms)
			.unwrap_or(f64::NEG_INFINITY);

		println!(
			"{trial_number:>2}. [{mode}] {:<6} ({} -> {})  activation {activation:>7.3}  choices: {}",
			trial.fact.text,
			trial.fact.id,
			trial.fact.answer,
			trial.choices.join(" | "),
		);

		// Simulated learner: mostly correct, slowing down as the session
		// drags on, with one lapse of attention.
		let response = if trial_number == 11 {
			println!("    ... no answer before the deadline");
			Response::timeout(trial.fact.id.clone(), now_ms, trial.fact.text.clone())
		} else {
			let expected =
				predicted_reaction_time_ms(activation, reading_time_ms(&trial.fact.text), &model);
			let rt_ms = if trial.study {
				reading_time_ms(&trial.fact.text) + 900.0
			} else {
				expected.min(8000.0) + (trial_number as f64) * 25.0
			};
			let correct = trial_number % 7 != 5;
			Response::answered(
				trial.fact.id.clone(),
				now_ms,
				rt_ms,
				correct,
				trial.fact.text.clone(),
			)
		};
		session.record_response(response)?;

		// Inter-trial gap: feedback plus a breath
		now_ms += 5000.0;
	}

	println!("\n=== Drill mode ===");
	while session.has_practiced_facts() {
		if let Some(fact) = session.next_practiced_fact() {
			let activation = session
				.activation(&fact.id, now_ms)
				.unwrap_or(f64::NEG_INFINITY);
			println!("practice {:<6} ({})  activation {activation:>7.3}", fact.text, fact.id);
		}
	}

	println!("\n{} responses logged", session.responses().len());
	Ok(())
}
