use rand::Rng;

use super::symbol::Symbol;
use super::table::{Distribution, TransitionTable};
use crate::error::MarkovError;

/// Picks the destination selected by `roll`.
///
/// The probability of selecting a symbol is proportional to its count.
///
/// This function performs:
/// - an O(n) scan over the distribution, in insertion order
/// - a cumulative subtraction to select a bucket
///
/// Returns `None` if `roll >= distribution.total()`.
pub fn pick(distribution: &Distribution, roll: usize) -> Option<&Symbol> {
	let mut roll = roll;
	for (symbol, count) in distribution.iter() {
		if roll < count {
			return Some(symbol);
		}
		roll -= count;
	}
	None
}

/// Draws the next state of a walk from `state`.
///
/// # Errors
/// - `UnknownState` if `state` has no entry in the table.
/// - `DegenerateTable` if its distribution holds no transitions.
pub fn next<R>(table: &TransitionTable, state: &Symbol, rng: &mut R) -> Result<Symbol, MarkovError>
where
	R: Rng + ?Sized,
{
	let distribution = table
		.distribution(state)
		.ok_or_else(|| MarkovError::UnknownState(state.clone()))?;

	let total = distribution.total();
	if total == 0 {
		return Err(MarkovError::DegenerateTable(state.clone()));
	}

	let roll = rng.random_range(0..total);
	pick(distribution, roll)
		.cloned()
		.ok_or_else(|| MarkovError::DegenerateTable(state.clone()))
}
