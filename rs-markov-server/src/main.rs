use std::collections::{BTreeMap, HashMap};
use std::env;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};

use log::{error, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use rs_markov_core::config::load_corpora;
use rs_markov_core::{MarkovError, MarkovMachine};

/// Upper bound on generations served by one request
const MAX_COUNT: usize = 100;

/// Struct representing query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	machine: String,
	count: Option<usize>,
	seed: Option<u64>
}

#[derive(Deserialize)]
struct MachineQuery {
	machine: String
}

/// Trained machines, read-only once the server is up.
///
/// No lock is needed: every walk owns its cursor and random source.
struct SharedData {
	machines: HashMap<String, MarkovMachine>
}

/// JSON view of a transition table.
///
/// Sentinels are rendered with their marks (`^` and `$`) and
/// distributions keep their sampling order.
#[derive(Serialize)]
struct SnapshotView {
	machine: String,
	states: BTreeMap<String, Vec<(String, usize)>>
}

impl SharedData {
	/// Trains every corpus listed in the configuration file.
	///
	/// A corpus whose source cannot be read is trained from empty text,
	/// so it is listed but fails to generate.
	fn load(config_path: &str) -> Result<Self, MarkovError> {
		let mut machines = HashMap::new();
		for corpus in load_corpora(config_path)? {
			let machine = match MarkovMachine::from_file(&corpus.name, corpus.machine, &corpus.path) {
				Ok(machine) => machine,
				Err(e @ MarkovError::SourceUnavailable { .. }) => {
					error!("{e}");
					MarkovMachine::train(&corpus.name, corpus.machine, "")?
				}
				Err(e) => return Err(e),
			};
			machines.insert(corpus.name, machine);
		}
		Ok(Self { machines })
	}

	fn machine(&self, name: &str) -> Result<&MarkovMachine, HttpResponse> {
		self.machines
			.get(name)
			.ok_or_else(|| HttpResponse::NotFound().body(format!("Machine '{name}' not found")))
	}
}

/// HTTP GET endpoint `/v1/generate`
///
/// Generates `count` sequences (default 1) from the named machine,
/// one per line. A `seed` makes the response reproducible.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<SharedData>, query: web::Query<GenerateParams>) -> impl Responder {
	let count = query.count.unwrap_or(1);
	if count == 0 || count > MAX_COUNT {
		return HttpResponse::BadRequest().body(format!("count must be between 1 and {MAX_COUNT}"));
	}

	let machine = match data.machine(&query.machine) {
		Ok(m) => m,
		Err(response) => return response,
	};

	let mut rng = match query.seed {
		Some(seed) => StdRng::seed_from_u64(seed),
		None => StdRng::from_os_rng(),
	};

	match machine.generate_many(count, &mut rng) {
		Ok(result) => HttpResponse::Ok().body(result.join("\n")),
		Err(e @ (MarkovError::DegenerateTable(_) | MarkovError::UnknownState(_))) => {
			HttpResponse::Conflict().body(e.to_string())
		}
		Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
	}
}

#[get("/v1/machines")]
async fn get_machines(data: web::Data<SharedData>) -> impl Responder {
	let mut names: Vec<&str> = data.machines.keys().map(String::as_str).collect();
	names.sort_unstable();
	HttpResponse::Ok().body(names.join("\n"))
}

#[get("/v1/snapshot")]
async fn get_snapshot(data: web::Data<SharedData>, query: web::Query<MachineQuery>) -> impl Responder {
	let machine = match data.machine(&query.machine) {
		Ok(m) => m,
		Err(response) => return response,
	};

	let snapshot = machine.snapshot();
	let states = snapshot
		.iter()
		.map(|(state, distribution)| {
			let entries: Vec<(String, usize)> = distribution
				.iter()
				.map(|(next, count)| (next.to_string(), count))
				.collect();
			(state.to_string(), entries)
		})
		.collect();

	HttpResponse::Ok().json(SnapshotView { machine: machine.name().to_owned(), states })
}

/// Main entry point for the server.
///
/// Trains the configured machines, shares them read-only between workers
/// and starts an Actix-web HTTP server.
///
/// # Notes
/// - `RS_MARKOV_CONFIG` selects the corpus list (default `./data/machines.json`).
/// - `RS_MARKOV_BIND` selects the address (default `127.0.0.1:5000`).
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let config_path = env::var("RS_MARKOV_CONFIG").unwrap_or_else(|_| "./data/machines.json".to_owned());
	let bind = env::var("RS_MARKOV_BIND").unwrap_or_else(|_| "127.0.0.1:5000".to_owned());

	let shared_data = SharedData::load(&config_path).map_err(std::io::Error::other)?;
	info!("serving {} machines on {bind}", shared_data.machines.len());
	let shared_data = web::Data::new(shared_data);

	HttpServer::new(move || {
		App::new()
			.wrap(Logger::default())
			.wrap(Cors::default().allow_any_origin().allowed_methods(vec!["GET"]))
			.app_data(shared_data.clone())
			.service(get_generated)
			.service(get_machines)
			.service(get_snapshot)
	})
		.bind(bind)?
		.run()
		.await
}
