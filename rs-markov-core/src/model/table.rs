use std::collections::HashMap;
use std::panic;
use std::thread;

use log::debug;
use serde::{Deserialize, Serialize};

use super::symbol::Symbol;

/// Outgoing transitions of one state.
///
/// Entries keep their insertion order so that weighted sampling is
/// reproducible for a seeded random source.
///
/// # Invariants
/// - Each destination appears at most once
/// - Each count is strictly positive
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Distribution {
	entries: Vec<(Symbol, usize)>,
}

impl Distribution {
	/// Records one occurrence of `next`.
	///
	/// - If the destination already exists, its count is increased.
	/// - Otherwise, it is appended with an initial count of 1.
	pub fn record(&mut self, next: Symbol) {
		self.add(next, 1);
	}

	fn add(&mut self, next: Symbol, occurrence: usize) {
		match self.entries.iter_mut().find(|(symbol, _)| *symbol == next) {
			Some((_, count)) => *count += occurrence,
			None => self.entries.push((next, occurrence)),
		}
	}

	/// Count recorded for `next`, or 0 if never observed.
	pub fn count(&self, next: &Symbol) -> usize {
		self.entries
			.iter()
			.find(|(symbol, _)| symbol == next)
			.map_or(0, |(_, count)| *count)
	}

	/// Sum of all counts.
	pub fn total(&self) -> usize {
		self.entries.iter().map(|(_, count)| count).sum()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Iterates over `(destination, count)` in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&Symbol, usize)> {
		self.entries.iter().map(|(symbol, count)| (symbol, *count))
	}

	/// Sums the counts of `other` into this distribution.
	///
	/// Destinations unknown to `self` are appended in `other`'s order.
	pub fn merge(&mut self, other: &Self) {
		for (symbol, count) in &other.entries {
			self.add(symbol.clone(), *count);
		}
	}
}

/// Learned mapping from a state to its weighted next states.
///
/// The table is a frequency model: counts are aggregated across every
/// pattern it was built from.
///
/// # Responsibilities
/// - Record `START -> first`, `symbol -> next` and `last -> END` transitions
/// - Merge partial tables (parallel learning)
/// - Hand out deep copies for inspection
///
/// # Invariants
/// - `End` is never a key
/// - `Start` never appears as a destination
/// - Tables built from patterns never contain an empty distribution
///
/// # Serialization
/// States are written as a list of `(state, distribution)` pairs, since
/// token symbols cannot be map keys in formats such as JSON.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct TransitionTable {
	#[serde(with = "state_list")]
	states: HashMap<Symbol, Distribution>,
}

mod state_list {
	use std::collections::HashMap;

	use serde::{Deserialize, Deserializer, Serialize, Serializer};

	use super::{Distribution, Symbol};

	pub fn serialize<S: Serializer>(states: &HashMap<Symbol, Distribution>, serializer: S) -> Result<S::Ok, S::Error> {
		let mut list: Vec<(&Symbol, &Distribution)> = states.iter().collect();
		list.sort_unstable_by(|a, b| a.0.cmp(b.0));
		list.serialize(serializer)
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<HashMap<Symbol, Distribution>, D::Error> {
		let list: Vec<(Symbol, Distribution)> = Vec::deserialize(deserializer)?;
		Ok(list.into_iter().collect())
	}
}

impl TransitionTable {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a table from patterns in a single pass.
	///
	/// Each pattern is decomposed into symbols; a pattern that decomposes to
	/// nothing contributes no transitions.
	pub fn build<P, F>(patterns: &[P], decompose: F) -> Self
	where
		P: AsRef<str>,
		F: Fn(&str) -> Vec<Symbol>,
	{
		let mut table = Self::new();
		for pattern in patterns {
			table.add_pattern(decompose(pattern.as_ref()));
		}
		debug!("built transition table with {} states from {} patterns", table.len(), patterns.len());
		table
	}

	/// Builds a table using one thread per chunk of patterns.
	///
	/// # Behavior
	/// - Splits patterns into chunks (based on CPU cores * factor).
	/// - Spawns scoped threads to build partial tables for each chunk.
	/// - Joins the workers and merges their tables in chunk order.
	/// - A panicking worker propagates its panic to the caller.
	///
	/// # Notes
	/// - Merging in chunk order reproduces the insertion order of [`Self::build`],
	///   so both functions return equal tables.
	pub fn build_parallel<P, F>(patterns: &[P], decompose: F) -> Self
	where
		P: AsRef<str> + Sync,
		F: Fn(&str) -> Vec<Symbol> + Sync,
	{
		if patterns.is_empty() {
			return Self::new();
		}

		let chunks = num_cpus::get() * 8;
		let chunk_size = patterns.len().div_ceil(chunks);

		let decompose = &decompose;
		let partial_tables: Vec<Self> = thread::scope(|scope| {
			let workers: Vec<_> = patterns
				.chunks(chunk_size)
				.map(|chunk| {
					scope.spawn(move || {
						let mut partial_table = Self::new();
						for pattern in chunk {
							partial_table.add_pattern(decompose(pattern.as_ref()));
						}
						partial_table
					})
				})
				.collect();

			workers
				.into_iter()
				.map(|worker| worker.join().unwrap_or_else(|payload| panic::resume_unwind(payload)))
				.collect()
		});

		let mut table = Self::new();
		for partial_table in &partial_tables {
			table.merge(partial_table);
		}
		debug!("built transition table with {} states from {} patterns on worker threads", table.len(), patterns.len());
		table
	}

	/// Records the transitions of one decomposed pattern.
	pub fn add_pattern(&mut self, symbols: Vec<Symbol>) {
		let Some(first) = symbols.first() else {
			return;
		};
		self.record(Symbol::Start, first.clone());

		let mut symbols = symbols.into_iter().peekable();
		while let Some(current) = symbols.next() {
			let next = symbols.peek().cloned().unwrap_or(Symbol::End);
			self.record(current, next);
		}
	}

	/// Records one occurrence of `from -> to`.
	///
	/// The distribution of `from` is created on first use.
	pub fn record(&mut self, from: Symbol, to: Symbol) {
		self.states.entry(from).or_default().record(to);
	}

	/// Outgoing distribution of `state`, if it was ever learned.
	pub fn distribution(&self, state: &Symbol) -> Option<&Distribution> {
		self.states.get(state)
	}

	/// Number of source states.
	pub fn len(&self) -> usize {
		self.states.len()
	}

	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}

	/// Iterates over source states and their distributions, in no particular order.
	pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &Distribution)> {
		self.states.iter()
	}

	/// Merges another table into this one.
	///
	/// Counts for matching transitions are summed. Building `[A, B]` and
	/// `[C]` then merging equals building `[A, B, C]` directly.
	pub fn merge(&mut self, other: &Self) {
		for (state, distribution) in &other.states {
			match self.states.get_mut(state) {
				Some(existing) => existing.merge(distribution),
				None => {
					self.states.insert(state.clone(), distribution.clone());
				}
			}
		}
	}

	/// Returns a deep, independent copy of the table.
	///
	/// Editing the copy never affects the table it was taken from.
	pub fn snapshot(&self) -> Self {
		self.clone()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn split_chars(pattern: &str) -> Vec<Symbol> {
		pattern.chars().map(|c| Symbol::token(c.to_string())).collect()
	}

	fn counts(distribution: &Distribution) -> Vec<(String, usize)> {
		distribution.iter().map(|(symbol, count)| (symbol.to_string(), count)).collect()
	}

	#[test]
	fn records_start_pairs_and_end() {
		let table = TransitionTable::build(&["ab", "ac"], split_chars);

		let start = table.distribution(&Symbol::Start).unwrap();
		assert_eq!(counts(start), vec![("a".to_owned(), 2)]);

		let a = table.distribution(&Symbol::token("a")).unwrap();
		assert_eq!(counts(a), vec![("b".to_owned(), 1), ("c".to_owned(), 1)]);

		assert_eq!(table.distribution(&Symbol::token("b")).unwrap().count(&Symbol::End), 1);
		assert_eq!(table.distribution(&Symbol::token("c")).unwrap().count(&Symbol::End), 1);
		assert!(table.distribution(&Symbol::End).is_none());
		assert_eq!(table.len(), 4);
	}

	#[test]
	fn empty_patterns_contribute_nothing() {
		let table = TransitionTable::build(&["", ""], split_chars);
		assert!(table.is_empty());
	}

	#[test]
	fn single_symbol_pattern_goes_straight_to_end() {
		let table = TransitionTable::build(&["x"], split_chars);
		let x = table.distribution(&Symbol::token("x")).unwrap();
		assert_eq!(x.count(&Symbol::End), 1);
		assert_eq!(x.total(), 1);
	}

	#[test]
	fn repeated_symbols_loop_on_themselves() {
		let table = TransitionTable::build(&["aaa"], split_chars);
		let a = table.distribution(&Symbol::token("a")).unwrap();
		assert_eq!(a.count(&Symbol::token("a")), 2);
		assert_eq!(a.count(&Symbol::End), 1);
	}

	#[test]
	fn start_is_never_a_destination() {
		let table = TransitionTable::build(&["abc", "cab", "bca"], split_chars);
		for (_, distribution) in table.iter() {
			assert_eq!(distribution.count(&Symbol::Start), 0);
			assert!(!distribution.is_empty());
		}
	}

	#[test]
	fn merge_matches_single_pass() {
		let mut merged = TransitionTable::build(&["ab", "ba"], split_chars);
		merged.merge(&TransitionTable::build(&["abc"], split_chars));
		let direct = TransitionTable::build(&["ab", "ba", "abc"], split_chars);
		assert_eq!(merged, direct);
	}

	#[test]
	fn parallel_build_matches_single_pass() {
		let patterns: Vec<String> = (0..500).map(|i| format!("n{}x{}", i % 7, i % 13)).collect();
		let parallel = TransitionTable::build_parallel(&patterns, split_chars);
		let direct = TransitionTable::build(&patterns, split_chars);
		assert_eq!(parallel, direct);
	}

	#[test]
	fn table_round_trips_through_json() {
		let table = TransitionTable::build(&["ab", "ac", "b"], split_chars);
		let json = serde_json::to_string(&table.snapshot()).unwrap();
		let restored: TransitionTable = serde_json::from_str(&json).unwrap();
		assert_eq!(restored, table);
	}

	#[test]
	fn snapshot_is_independent() {
		let table = TransitionTable::build(&["ab"], split_chars);
		let mut snapshot = table.snapshot();
		snapshot.record(Symbol::token("a"), Symbol::token("z"));
		assert_eq!(table.distribution(&Symbol::token("a")).unwrap().len(), 1);
		assert_eq!(snapshot.distribution(&Symbol::token("a")).unwrap().len(), 2);
	}
}
