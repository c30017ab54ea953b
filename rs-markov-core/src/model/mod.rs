//! Top-level module for the Markov chain engine.
//!
//! This module provides:
//! - Chain states and sentinels (`Symbol`)
//! - Tokenizing strategies (`Variant`)
//! - Frequency tables (`TransitionTable`, `Distribution`)
//! - Weighted sampling (`sampler`)
//! - The walk state machine and text assembly (`generator`)
//! - Trained, shareable machines (`MarkovMachine`)

/// States of a chain, including the `Start` and `End` sentinels.
pub mod symbol;

/// Cuts raw text into patterns and patterns into symbols.
///
/// Names are comma delimited and cut into fixed-width character chunks;
/// sentences are split on terminal punctuation and cut into words.
pub mod tokenizer;

/// Transition counts learned from patterns.
///
/// Supports single-pass and multithreaded construction, merging,
/// and deep snapshots.
pub mod table;

/// Weighted random selection of the next state.
pub mod sampler;

/// Generation walks, cursors, and text assembly rules.
pub mod generator;

/// A trained machine tying a `Variant` to its learned table.
pub mod machine;
