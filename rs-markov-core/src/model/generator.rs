use rand::Rng;

use super::sampler;
use super::symbol::Symbol;
use super::table::TransitionTable;
use super::tokenizer::Variant;
use crate::error::MarkovError;

/// Position of one in-flight generation walk.
///
/// A cursor is owned by a single walk. Walks over the same table each use
/// their own cursor, so the table can be shared read-only between them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cursor {
	state: Symbol,
}

impl Cursor {
	/// Starts a walk at the start sentinel.
	pub fn begin() -> Self {
		Self { state: Symbol::Start }
	}

	/// Current state of the walk.
	pub fn state(&self) -> &Symbol {
		&self.state
	}

	pub fn is_start(&self) -> bool {
		self.state.is_start()
	}

	/// Moves the cursor to `symbol`.
	pub fn advance(&mut self, symbol: Symbol) {
		self.state = symbol;
	}

	/// Moves the cursor back to the start sentinel.
	pub fn reset(&mut self) {
		self.state = Symbol::Start;
	}
}

impl Default for Cursor {
	fn default() -> Self {
		Self::begin()
	}
}

/// Rule used to turn sampled symbols into text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Assembly {
	/// Symbols are concatenated without separator.
	Chain,
	/// Words are space separated, tokens opening with a comma attach to
	/// the previous word, and the text ends with a period.
	Sentence,
}

impl Assembly {
	/// Appends one sampled token to the buffer.
	fn push(&self, buffer: &mut String, token: &str) {
		match self {
			Self::Chain => buffer.push_str(token),
			Self::Sentence => {
				if token.starts_with(',') && buffer.ends_with(' ') {
					buffer.pop();
				}
				buffer.push_str(token);
				buffer.push(' ');
			}
		}
	}

	/// Closes the buffer once the end sentinel was drawn.
	fn finish(&self, mut buffer: String) -> String {
		match self {
			Self::Chain => buffer,
			Self::Sentence => {
				if buffer.ends_with(' ') {
					buffer.pop();
				}
				buffer.push('.');
				match buffer.strip_prefix(' ') {
					Some(trimmed) => trimmed.to_owned(),
					None => buffer,
				}
			}
		}
	}
}

impl From<Variant> for Assembly {
	fn from(variant: Variant) -> Self {
		match variant {
			Variant::Name { .. } => Self::Chain,
			Variant::Sentence => Self::Sentence,
		}
	}
}

/// Runs one walk from the start sentinel until the end sentinel is drawn.
///
/// # Behavior
/// - Every drawn token is appended to the output with `assembly`.
/// - The walk stops on `End`; the sentinel itself is never rendered.
/// - `cursor` is reset to `Start` when the walk returns, on success and on error.
///
/// # Errors
/// - `DegenerateTable(Start)` if the table never learned a first symbol.
/// - Any sampling error met during the walk.
///
/// # Notes
/// - No step limit applies; a table built from patterns always reaches `End`.
pub fn generate<R>(
	table: &TransitionTable,
	assembly: Assembly,
	cursor: &mut Cursor,
	rng: &mut R,
) -> Result<String, MarkovError>
where
	R: Rng + ?Sized,
{
	cursor.reset();
	let result = walk(table, assembly, cursor, rng);
	cursor.reset();
	result
}

fn walk<R>(table: &TransitionTable, assembly: Assembly, cursor: &mut Cursor, rng: &mut R) -> Result<String, MarkovError>
where
	R: Rng + ?Sized,
{
	if table.distribution(&Symbol::Start).is_none_or(|start| start.is_empty()) {
		return Err(MarkovError::DegenerateTable(Symbol::Start));
	}

	let mut buffer = String::new();
	loop {
		let next = sampler::next(table, cursor.state(), rng)?;
		match &next {
			Symbol::End => return Ok(assembly.finish(buffer)),
			Symbol::Token(token) => assembly.push(&mut buffer, token),
			// Never recorded as a destination
			Symbol::Start => return Err(MarkovError::DegenerateTable(cursor.state().clone())),
		}
		cursor.advance(next);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn chain(table: &mut TransitionTable, symbols: &[&str]) {
		table.add_pattern(symbols.iter().map(|s| Symbol::token(*s)).collect());
	}

	#[test]
	fn sentence_assembly_attaches_commas() {
		let mut table = TransitionTable::new();
		chain(&mut table, &["Hi", ",", "Bob"]);

		let mut rng = StdRng::seed_from_u64(0);
		let text = generate(&table, Assembly::Sentence, &mut Cursor::begin(), &mut rng).unwrap();
		assert_eq!(text, "Hi, Bob.");
	}

	#[test]
	fn chain_assembly_concatenates() {
		let mut table = TransitionTable::new();
		chain(&mut table, &["Go", "rb", "ag"]);

		let mut rng = StdRng::seed_from_u64(0);
		let text = generate(&table, Assembly::Chain, &mut Cursor::begin(), &mut rng).unwrap();
		assert_eq!(text, "Gorbag");
	}

	#[test]
	fn sentence_assembly_trims_one_leading_space() {
		let mut buffer = String::new();
		Assembly::Sentence.push(&mut buffer, "");
		Assembly::Sentence.push(&mut buffer, "Go");
		Assembly::Sentence.push(&mut buffer, "now");
		assert_eq!(Assembly::Sentence.finish(buffer), "Go now.");
	}

	#[test]
	fn quoted_comma_attaches_to_the_previous_word() {
		let mut table = TransitionTable::new();
		chain(&mut table, &["\"Hello", ",\"", "said", "he"]);

		let mut rng = StdRng::seed_from_u64(0);
		let text = generate(&table, Assembly::Sentence, &mut Cursor::begin(), &mut rng).unwrap();
		assert_eq!(text, "\"Hello,\" said he.");
	}

	#[test]
	fn leading_comma_has_nothing_to_attach_to() {
		let mut buffer = String::new();
		Assembly::Sentence.push(&mut buffer, ",");
		Assembly::Sentence.push(&mut buffer, "then");
		assert_eq!(Assembly::Sentence.finish(buffer), ", then.");
	}

	#[test]
	fn empty_table_fails_fast() {
		let table = TransitionTable::new();
		let mut cursor = Cursor::begin();
		let mut rng = StdRng::seed_from_u64(0);
		let error = generate(&table, Assembly::Chain, &mut cursor, &mut rng).unwrap_err();
		assert!(matches!(error, MarkovError::DegenerateTable(Symbol::Start)));
		assert!(cursor.is_start());
	}

	#[test]
	fn dangling_state_is_unknown() {
		let mut table = TransitionTable::new();
		table.record(Symbol::Start, Symbol::token("a"));

		let mut cursor = Cursor::begin();
		let mut rng = StdRng::seed_from_u64(0);
		let error = generate(&table, Assembly::Chain, &mut cursor, &mut rng).unwrap_err();
		assert!(matches!(error, MarkovError::UnknownState(Symbol::Token(ref t)) if t == "a"));
		assert!(cursor.is_start());
	}

	#[test]
	fn cursor_is_reset_after_a_walk() {
		let mut table = TransitionTable::new();
		chain(&mut table, &["a", "b"]);

		let mut cursor = Cursor::begin();
		cursor.advance(Symbol::token("b"));
		let mut rng = StdRng::seed_from_u64(3);
		assert_eq!(generate(&table, Assembly::Chain, &mut cursor, &mut rng).unwrap(), "ab");
		assert_eq!(cursor, Cursor::begin());
	}

	#[test]
	fn assembly_follows_variant() {
		assert_eq!(Assembly::from(Variant::name(2).unwrap()), Assembly::Chain);
		assert_eq!(Assembly::from(Variant::Sentence), Assembly::Sentence);
	}
}
