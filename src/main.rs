use anyhow::{Context, Result};
use log::{info, warn};
use typedgp::config::ConfigManager;
use typedgp::engines::generation::{run_generations, ConsoleProgressCallback};
use typedgp::{Contract, DataType, Fitness, Individual, Population, PrimitiveCatalog, Value};

const INPUTS: usize = 5;

/// Mismatches against the even-parity truth table of five inputs
fn parity_error(individual: &Individual) -> Fitness {
    let program = match individual.compile() {
        Ok(program) => program,
        Err(e) => {
            warn!("Uncompilable individual: {}", e);
            return Fitness::single(f64::from(1u32 << INPUTS));
        }
    };

    let mut errors = 0u32;
    for row in 0..(1u32 << INPUTS) {
        let args: Vec<Value> = (0..INPUTS).map(|bit| Value::Bool(row >> bit & 1 == 1)).collect();
        let expected = row.count_ones() % 2 == 0;
        match program.call(&args) {
            Ok(value) if value.as_bool() == expected => {}
            _ => errors += 1,
        }
    }
    Fitness::single(f64::from(errors))
}

/// Usage: typedgp [config.toml] [generations] [logbook.json]
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let manager = ConfigManager::new();
    if let Some(path) = args.first() {
        manager
            .load_from_file(path)
            .with_context(|| format!("loading {}", path))?;
    }
    let generations: usize = match args.get(1) {
        Some(n) => n.parse().context("generations must be a number")?,
        None => 50,
    };
    let config = manager.get();

    let mut catalog = PrimitiveCatalog::new();
    catalog.with_boolean_primitives()?;
    let contract = Contract::new(vec![DataType::BOOL; INPUTS], DataType::BOOL);

    let mut population = Population::new(&catalog, &contract, config, parity_error)?;
    let summary = run_generations(
        &mut population,
        generations,
        Some(0.0),
        &mut ConsoleProgressCallback,
    );

    info!(
        "Stopped after {} generation(s), target reached: {}",
        summary.generations, summary.reached_target
    );
    if let Some(path) = args.get(2) {
        population
            .save_logbook(path)
            .with_context(|| format!("writing logbook to {}", path))?;
    }
    if let Some(best) = population.hall_of_fame().best() {
        println!("Best fitness {} (generation {})", best.fitness, best.generation);
        println!("{}", best.individual);
    }
    Ok(())
}
