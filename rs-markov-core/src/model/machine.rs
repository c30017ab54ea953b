use std::path::Path;

use log::info;
use rand::Rng;

use super::generator::{self, Assembly, Cursor};
use super::table::TransitionTable;
use super::tokenizer::Variant;
use crate::config::MachineConfig;
use crate::error::MarkovError;
use crate::io::read_source;

/// A trained Markov machine.
///
/// The machine owns its transition table and never mutates it after
/// training. It holds no walk state: every generation uses its own
/// [`Cursor`], so one machine can serve concurrent callers through a
/// shared reference.
///
/// # Responsibilities
/// - Tokenize and decompose training text according to its `Variant`
/// - Build the transition table once, at construction
/// - Generate independent sequences on demand
#[derive(Clone, Debug)]
pub struct MarkovMachine {
	name: String,
	config: MachineConfig,
	table: TransitionTable,
}

impl MarkovMachine {
	/// Trains a machine from raw text.
	///
	/// Empty text yields an empty table; generating from it fails with
	/// `DegenerateTable`.
	///
	/// # Errors
	/// Returns `InvalidConfig` if `config` does not validate.
	pub fn train(name: &str, config: MachineConfig, raw: &str) -> Result<Self, MarkovError> {
		config.validate()?;

		let variant = config.variant;
		let patterns = variant.tokenize(raw, config.max_samples);
		let decompose = |pattern: &str| variant.decompose(pattern);
		let table = if config.parallel {
			TransitionTable::build_parallel(&patterns, decompose)
		} else {
			TransitionTable::build(&patterns, decompose)
		};

		info!("trained machine '{name}' on {} patterns ({} states)", patterns.len(), table.len());
		Ok(Self { name: name.to_owned(), config, table })
	}

	/// Trains a machine from a text file.
	///
	/// # Errors
	/// - `SourceUnavailable` if the file cannot be read.
	/// - `InvalidConfig` if `config` does not validate.
	pub fn from_file<P: AsRef<Path>>(name: &str, config: MachineConfig, path: P) -> Result<Self, MarkovError> {
		let raw = read_source(path)?;
		Self::train(name, config, &raw)
	}

	/// Letter-by-letter name machine.
	pub fn first_order_names(name: &str, raw: &str) -> Result<Self, MarkovError> {
		Self::names(name, 1, raw)
	}

	/// Letter-pair name machine.
	pub fn second_order_names(name: &str, raw: &str) -> Result<Self, MarkovError> {
		Self::names(name, 2, raw)
	}

	/// Name machine of any positive order.
	pub fn names(name: &str, order: usize, raw: &str) -> Result<Self, MarkovError> {
		let variant = Variant::name(order)
			.ok_or_else(|| MarkovError::InvalidConfig("order must be >= 1".to_owned()))?;
		Self::train(name, MachineConfig::new(variant), raw)
	}

	/// Word-level sentence machine.
	pub fn sentences(name: &str, raw: &str) -> Result<Self, MarkovError> {
		Self::train(name, MachineConfig::new(Variant::Sentence), raw)
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn config(&self) -> &MachineConfig {
		&self.config
	}

	/// Read-only view of the live table.
	pub fn table(&self) -> &TransitionTable {
		&self.table
	}

	/// Deep copy of the learned table.
	pub fn snapshot(&self) -> TransitionTable {
		self.table.snapshot()
	}

	/// Generates one sequence with a fresh cursor.
	pub fn generate_sequence<R>(&self, rng: &mut R) -> Result<String, MarkovError>
	where
		R: Rng + ?Sized,
	{
		self.generate_with_cursor(&mut Cursor::begin(), rng)
	}

	/// Generates one sequence with a caller-owned cursor.
	///
	/// The cursor is back on `Start` when this returns.
	pub fn generate_with_cursor<R>(&self, cursor: &mut Cursor, rng: &mut R) -> Result<String, MarkovError>
	where
		R: Rng + ?Sized,
	{
		generator::generate(&self.table, Assembly::from(self.config.variant), cursor, rng)
	}

	/// Generates `count` independent sequences.
	///
	/// Stops at the first error.
	pub fn generate_many<R>(&self, count: usize, rng: &mut R) -> Result<Vec<String>, MarkovError>
	where
		R: Rng + ?Sized,
	{
		let mut cursor = Cursor::begin();
		(0..count)
			.map(|_| self.generate_with_cursor(&mut cursor, rng))
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::symbol::Symbol;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	#[test]
	fn name_machine_learns_the_documented_table() {
		let machine = MarkovMachine::first_order_names("test", "ab, ac").unwrap();
		let table = machine.table();

		let start = table.distribution(&Symbol::Start).unwrap();
		assert_eq!(start.count(&Symbol::token("a")), 2);
		assert_eq!(start.len(), 1);

		let a = table.distribution(&Symbol::token("a")).unwrap();
		assert_eq!(a.count(&Symbol::token("b")), 1);
		assert_eq!(a.count(&Symbol::token("c")), 1);

		assert_eq!(table.distribution(&Symbol::token("b")).unwrap().count(&Symbol::End), 1);
		assert_eq!(table.distribution(&Symbol::token("c")).unwrap().count(&Symbol::End), 1);
	}

	#[test]
	fn name_machine_never_repeats_the_first_letter() {
		let machine = MarkovMachine::first_order_names("test", "ab, ac").unwrap();
		let mut rng = StdRng::seed_from_u64(11);
		for name in machine.generate_many(50, &mut rng).unwrap() {
			assert!(name == "ab" || name == "ac", "unexpected name {name}");
		}
	}

	#[test]
	fn sentence_machine_renders_commas_and_period() {
		let machine = MarkovMachine::sentences("test", "Hi, Bob.").unwrap();
		let mut rng = StdRng::seed_from_u64(5);
		assert_eq!(machine.generate_sequence(&mut rng).unwrap(), "Hi, Bob.");
	}

	#[test]
	fn second_order_machine_walks_letter_pairs() {
		let machine = MarkovMachine::second_order_names("orcs", "Azog").unwrap();
		let mut rng = StdRng::seed_from_u64(0);
		assert_eq!(machine.generate_sequence(&mut rng).unwrap(), "Azog");
	}

	#[test]
	fn empty_source_trains_an_empty_machine() {
		let machine = MarkovMachine::sentences("empty", "").unwrap();
		assert!(machine.table().is_empty());
		let mut rng = StdRng::seed_from_u64(0);
		assert!(matches!(machine.generate_sequence(&mut rng), Err(MarkovError::DegenerateTable(Symbol::Start))));
	}

	#[test]
	fn order_zero_is_invalid() {
		assert!(matches!(MarkovMachine::names("bad", 0, "a, b"), Err(MarkovError::InvalidConfig(_))));
	}

	#[test]
	fn parallel_training_matches_sequential() {
		let raw = "Thorin, Balin, Dwalin, Fili, Kili, Dori, Nori, Ori, Oin, Gloin";
		let config = MachineConfig::new(Variant::name(2).unwrap());
		let sequential = MarkovMachine::train("seq", config, raw).unwrap();
		let parallel = MarkovMachine::train("par", config.with_parallel(true), raw).unwrap();
		assert_eq!(sequential.table(), parallel.table());
	}

	#[test]
	fn machine_is_shareable_between_threads() {
		fn assert_send_sync<T: Send + Sync>() {}
		assert_send_sync::<MarkovMachine>();
	}
}
