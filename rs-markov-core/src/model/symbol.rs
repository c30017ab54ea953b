use std::fmt;

use serde::{Deserialize, Serialize};

/// Represents a single state of a Markov chain.
///
/// A `Symbol` is either one of the two sentinels or a learned token
/// (a character chunk for name machines, a word or a comma for the
/// sentence machine).
///
/// ## Invariants
/// - `Start` is never recorded as the destination of a transition
/// - `End` is never recorded as the source of a transition
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
	/// Marks the beginning of every trained pattern.
	Start,
	/// Marks the termination of a pattern.
	End,
	/// A learned token.
	Token(String),
}

impl Symbol {
	/// Character used to display the start sentinel.
	pub const START_MARK: &'static str = "^";
	/// Character used to display the end sentinel.
	pub const END_MARK: &'static str = "$";

	/// Builds a token symbol.
	pub fn token(text: impl Into<String>) -> Self {
		Self::Token(text.into())
	}

	pub fn is_start(&self) -> bool {
		matches!(self, Self::Start)
	}

	pub fn is_end(&self) -> bool {
		matches!(self, Self::End)
	}

	/// Returns the token text, or `None` for sentinels.
	pub fn as_token(&self) -> Option<&str> {
		match self {
			Self::Token(text) => Some(text),
			_ => None,
		}
	}
}

impl fmt::Display for Symbol {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Start => f.write_str(Self::START_MARK),
			Self::End => f.write_str(Self::END_MARK),
			Self::Token(text) => f.write_str(text),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn sentinels_never_equal_tokens_with_the_same_text() {
		assert_ne!(Symbol::Start, Symbol::token("^"));
		assert_ne!(Symbol::End, Symbol::token("$"));
	}

	#[test]
	fn display_uses_marks_for_sentinels() {
		assert_eq!(Symbol::Start.to_string(), "^");
		assert_eq!(Symbol::End.to_string(), "$");
		assert_eq!(Symbol::token("ab").to_string(), "ab");
	}

	#[test]
	fn as_token_ignores_sentinels() {
		assert_eq!(Symbol::token("Bob").as_token(), Some("Bob"));
		assert_eq!(Symbol::Start.as_token(), None);
		assert_eq!(Symbol::End.as_token(), None);
	}
}
