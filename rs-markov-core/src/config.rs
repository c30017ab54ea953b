use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::MarkovError;
use crate::io::read_source;
use crate::model::tokenizer::Variant;

/// Default upper limit on the number of patterns ingested from one source.
pub const DEFAULT_MAX_SAMPLES: usize = 50_000;

fn default_max_samples() -> usize {
	DEFAULT_MAX_SAMPLES
}

/// Training parameters of one machine.
///
/// # Fields
/// - `variant`: tokenizing strategy (flattened, e.g. `"variant": "name", "order": 2`).
/// - `max_samples`: ingestion limit, patterns past it are ignored.
/// - `parallel`: build the transition table on worker threads.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct MachineConfig {
	#[serde(flatten)]
	pub variant: Variant,

	#[serde(default = "default_max_samples")]
	pub max_samples: usize,

	#[serde(default)]
	pub parallel: bool,
}

impl MachineConfig {
	pub fn new(variant: Variant) -> Self {
		Self { variant, ..Self::default() }
	}

	/// Sets the ingestion limit.
	pub fn with_max_samples(mut self, max_samples: usize) -> Self {
		self.max_samples = max_samples;
		self
	}

	/// Enables or disables multithreaded training.
	pub fn with_parallel(mut self, parallel: bool) -> Self {
		self.parallel = parallel;
		self
	}

	/// Checks the configuration can train anything at all.
	///
	/// # Errors
	/// Returns `InvalidConfig` if `max_samples` is zero.
	pub fn validate(&self) -> Result<(), MarkovError> {
		if self.max_samples == 0 {
			return Err(MarkovError::InvalidConfig("max_samples must be >= 1".to_owned()));
		}
		Ok(())
	}
}

impl Default for MachineConfig {
	fn default() -> Self {
		Self {
			variant: Variant::default(),
			max_samples: DEFAULT_MAX_SAMPLES,
			parallel: false,
		}
	}
}

/// A named training source and the machine to train from it.
///
/// The machine is a nested object:
/// `{"name": "orcs", "path": "orc_names.txt", "machine": {"variant": "name", "order": 2}}`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CorpusConfig {
	pub name: String,
	pub path: PathBuf,
	pub machine: MachineConfig,
}

/// Loads a JSON list of corpora.
///
/// Relative corpus paths are resolved against the directory holding the
/// configuration file.
///
/// # Errors
/// - `SourceUnavailable` if the file cannot be read.
/// - `Config` if it is not a valid corpus list.
/// - `InvalidConfig` if a machine configuration is invalid or a name is repeated.
pub fn load_corpora<P: AsRef<Path>>(path: P) -> Result<Vec<CorpusConfig>, MarkovError> {
	let path = path.as_ref();
	let mut corpora: Vec<CorpusConfig> = serde_json::from_str(&read_source(path)?)?;

	for (index, corpus) in corpora.iter().enumerate() {
		corpus.machine.validate()?;
		if corpora[..index].iter().any(|other| other.name == corpus.name) {
			return Err(MarkovError::InvalidConfig(format!("machine '{}' is defined twice", corpus.name)));
		}
	}

	let base = path.parent().unwrap_or_else(|| Path::new("."));
	for corpus in corpora.iter_mut().filter(|corpus| corpus.path.is_relative()) {
		corpus.path = base.join(&corpus.path);
	}

	Ok(corpora)
}
