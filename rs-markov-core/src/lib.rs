//! Markov chain text generation library.
//!
//! This crate trains weighted state-transition tables from sample text and
//! generates new text by random walks over them:
//! - Character-chunk name machines of any order
//! - Word-level sentence machines with punctuation-aware assembly
//! - Reproducible sampling from a seeded random source
//! - Read-only machines safe to share between concurrent walks
//!
//! # Example
//!
//! ```rust
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use rs_markov_core::MarkovMachine;
//!
//! let machine = MarkovMachine::first_order_names("dwarves", "Thorin, Thrain, Thror").unwrap();
//! let mut rng = StdRng::seed_from_u64(7);
//! let name = machine.generate_sequence(&mut rng).unwrap();
//! assert!(name.starts_with("Th"));
//! ```

/// Chain engine: symbols, tokenizers, tables, sampling and generation.
pub mod model;

/// Machine and corpus configuration.
pub mod config;

/// Error type shared by the whole crate.
pub mod error;

/// Training source loading.
pub mod io;

pub use config::{CorpusConfig, MachineConfig};
pub use error::MarkovError;
pub use model::generator::{Assembly, Cursor};
pub use model::machine::MarkovMachine;
pub use model::symbol::Symbol;
pub use model::table::{Distribution, TransitionTable};
pub use model::tokenizer::Variant;
