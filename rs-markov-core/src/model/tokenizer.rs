use std::num::NonZeroUsize;

use log::warn;
use serde::{Deserialize, Serialize};

use super::symbol::Symbol;

/// Characters ending a sentence pattern.
const SENTENCE_DELIMITERS: [char; 3] = ['.', '!', '?'];

/// Line-break characters removed from sentence patterns.
const LINE_BREAKS: [char; 2] = ['\n', '\r'];

/// Tokenizing strategy of a machine.
///
/// The variant decides both how raw text is cut into patterns and how a
/// pattern is decomposed into symbols. Text assembly during generation is
/// derived from it as well (see [`super::generator::Assembly`]).
///
/// # Variants
/// - `Name { order }`: comma-delimited words, cut into chunks of `order` characters.
/// - `Sentence`: prose split on `.`, `!` and `?`, decomposed into words and commas.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum Variant {
	Name { order: NonZeroUsize },
	Sentence,
}

impl Variant {
	/// Name variant of the given order.
	///
	/// Returns `None` when `order` is zero.
	pub fn name(order: usize) -> Option<Self> {
		NonZeroUsize::new(order).map(|order| Self::Name { order })
	}

	/// Cuts raw text into patterns.
	///
	/// At most `max_samples` patterns are kept. Anything past the cap is
	/// ignored, which is a resource limit rather than an error.
	pub fn tokenize(&self, raw: &str, max_samples: usize) -> Vec<String> {
		match self {
			Self::Name { .. } => cap(
				raw.split(',')
					.map(str::trim)
					.filter(|word| !word.is_empty())
					.map(str::to_owned),
				max_samples,
			),
			Self::Sentence => cap(
				raw.split(SENTENCE_DELIMITERS)
					.map(|sentence| sentence.replace(LINE_BREAKS, ""))
					.filter(|sentence| !sentence.trim().is_empty()),
				max_samples,
			),
		}
	}

	/// Decomposes one pattern into its ordered symbols.
	///
	/// An empty pattern decomposes to no symbols.
	pub fn decompose(&self, pattern: &str) -> Vec<Symbol> {
		match self {
			Self::Name { order } => chunk_chars(pattern, order.get()),
			Self::Sentence => pattern
				.replace(',', " ,")
				.split_whitespace()
				.map(Symbol::token)
				.collect(),
		}
	}
}

impl Default for Variant {
	fn default() -> Self {
		Self::Name { order: NonZeroUsize::MIN }
	}
}

/// Splits a pattern into chunks of `order` characters.
///
/// The final chunk holds the remainder and may be shorter.
/// UTF-8 safe: chunks are counted in characters, not bytes.
fn chunk_chars(pattern: &str, order: usize) -> Vec<Symbol> {
	let chars: Vec<char> = pattern.chars().collect();
	chars
		.chunks(order)
		.map(|chunk| Symbol::Token(chunk.iter().collect()))
		.collect()
}

fn cap<I>(mut patterns: I, max_samples: usize) -> Vec<String>
where
	I: Iterator<Item = String>,
{
	let kept: Vec<String> = patterns.by_ref().take(max_samples).collect();
	let ignored = patterns.count();
	if ignored > 0 {
		warn!("ingestion limit of {max_samples} patterns reached, {ignored} ignored");
	}
	kept
}
