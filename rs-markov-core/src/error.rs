use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::model::symbol::Symbol;

/// Errors surfaced by the Markov machines.
///
/// Tokenizing and table building never fail: malformed input simply
/// decomposes to fewer (or zero) symbols. Only loading, configuration,
/// sampling and generation report errors.
#[derive(Debug, Error)]
pub enum MarkovError {
	/// A training source could not be read.
	#[error("source unavailable: {}", path.display())]
	SourceUnavailable {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	/// Sampling was requested for a state the table never learned.
	#[error("state '{0}' is unknown to the transition table")]
	UnknownState(Symbol),

	/// A reachable state has no outgoing transitions, so the walk cannot advance.
	#[error("state '{0}' has no outgoing transitions")]
	DegenerateTable(Symbol),

	#[error("invalid configuration: {0}")]
	InvalidConfig(String),

	#[error("cannot parse configuration: {0}")]
	Config(#[from] serde_json::Error),
}
