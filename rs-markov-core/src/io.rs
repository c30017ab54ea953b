use std::fs;
use std::path::Path;

use crate::error::MarkovError;

/// Reads a whole training source into memory.
///
/// # Errors
/// Returns `SourceUnavailable` if the file cannot be opened or read.
pub fn read_source<P: AsRef<Path>>(path: P) -> Result<String, MarkovError> {
	let path = path.as_ref();
	fs::read_to_string(path).map_err(|source| MarkovError::SourceUnavailable {
		path: path.to_path_buf(),
		source,
	})
}
