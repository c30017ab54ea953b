use std::env;

use log::{error, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rs_markov_core::io::read_source;
use rs_markov_core::{MachineConfig, MarkovMachine, Variant};

/// Number of generations printed per machine.
const GENERATIONS: usize = 5;

/// Trains a machine from a file, falling back to an empty machine
/// if the file cannot be read.
fn load(name: &str, config: MachineConfig, path: &str) -> Result<MarkovMachine, Box<dyn std::error::Error>> {
    let raw = match read_source(path) {
        Ok(raw) => raw,
        Err(e) => {
            error!("{e}");
            String::new()
        }
    };
    Ok(MarkovMachine::train(name, config, &raw)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // An optional first argument seeds the generator for reproducible output
    let mut rng = match env::args().nth(1) {
        Some(seed) => StdRng::seed_from_u64(seed.parse()?),
        None => StdRng::from_os_rng(),
    };

    // Comma delimited names, letter by letter
    let dwarves = load("dwarves", MachineConfig::new(Variant::name(1).ok_or("invalid order")?), "./data/dwarf_names.txt")?;

    // Comma delimited names, letter pairs
    let orcs = load("orcs", MachineConfig::new(Variant::name(2).ok_or("invalid order")?), "./data/orc_names.txt")?;

    // First chapter of "A Tale of Two Cities", word by word
    let dickens = load("dickens", MachineConfig::new(Variant::Sentence).with_parallel(true), "./data/a_tale_of_two_cities.txt")?;

    let machines = [
        ("Here are your 5 Tolkien-inspired Dwarf names:", &dwarves),
        ("Here are your 5 Tolkien-inspired Orc names:", &orcs),
        ("Here are your 5 sentences written in the style of Charles Dickens:", &dickens),
    ];

    for (title, machine) in machines {
        println!("{title}");
        for _ in 0..GENERATIONS {
            match machine.generate_sequence(&mut rng) {
                Ok(text) => println!("{text}"),
                Err(e) => error!("machine '{}' cannot generate: {e}", machine.name()),
            }
        }
        println!();
    }

    info!("done");
    Ok(())
}
