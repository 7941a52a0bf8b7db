use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use typedgp::config::{AdfConfig, GrowthConfig};
use typedgp::engines::generation::grower::uses_all_arguments;
use typedgp::{Contract, DataType, Individual, PrimitiveCatalog, Value};

/// Mixed float/bool vocabulary: arithmetic, a comparison and a conditional
fn mixed_catalog() -> PrimitiveCatalog {
    let mut catalog = PrimitiveCatalog::new();
    catalog
        .with_arithmetic_primitives()
        .unwrap()
        .with_boolean_primitives()
        .unwrap()
        .add_primitive(
            "lt",
            vec![DataType::FLOAT, DataType::FLOAT],
            DataType::BOOL,
            |args| Value::Bool(args[0].as_f64() < args[1].as_f64()),
        )
        .unwrap()
        .add_primitive(
            "if",
            vec![DataType::BOOL, DataType::FLOAT, DataType::FLOAT],
            DataType::FLOAT,
            |args| if args[0].as_bool() { args[1] } else { args[2] },
        )
        .unwrap()
        .add_terminal("one", Value::Float(1.0), DataType::FLOAT)
        .unwrap()
        .add_terminal("true", Value::Bool(true), DataType::BOOL)
        .unwrap()
        .add_ephemeral("rand_unit", DataType::FLOAT, |rng| {
            Value::Float(rng.gen_range(-1.0..1.0))
        });
    catalog
}

fn contract() -> Contract {
    Contract::new(vec![DataType::FLOAT, DataType::BOOL], DataType::FLOAT)
}

/// Grow `count` individuals, skipping the occasional construction failure
fn grow_many(catalog: &PrimitiveCatalog, count: usize, seed: u64) -> Vec<Individual> {
    let mut rng = StdRng::seed_from_u64(seed);
    let growth = GrowthConfig::default();
    let adf = AdfConfig::default();
    (0..count)
        .filter_map(|_| Individual::new(catalog, &contract(), &growth, &adf, &mut rng).ok())
        .collect()
}

fn assert_well_typed(individual: &Individual) {
    for (tree, signature) in individual.iter() {
        tree.validate(signature.output_type())
            .unwrap_or_else(|e| panic!("{} is ill-typed: {}\n{}", signature.name(), e, individual));
        assert!(
            uses_all_arguments(signature, tree),
            "{} ignores an argument:\n{}",
            signature.name(),
            individual
        );
    }
    assert!(individual.compile().is_ok());
}

#[test]
fn test_grown_individuals_are_type_sound() {
    let catalog = mixed_catalog();
    let individuals = grow_many(&catalog, 50, 1);
    assert!(!individuals.is_empty());

    let growth = GrowthConfig::default();
    for individual in &individuals {
        assert_well_typed(individual);
        for tree in individual.trees() {
            assert!(tree.height() <= growth.max_init_depth);
        }
        let rpb = individual.signatures().last().unwrap();
        assert_eq!(rpb.name(), "MAIN");
        assert_eq!(rpb.contract(), &contract());
    }
}

#[test]
fn test_compiled_individuals_run() {
    let catalog = mixed_catalog();
    for individual in grow_many(&catalog, 20, 2) {
        let program = individual.compile().unwrap();
        let result = program
            .call(&[Value::Float(0.5), Value::Bool(false)])
            .unwrap();
        assert!(matches!(result, Value::Float(_)));
    }
}

#[test]
fn test_crossover_preserves_types() {
    let catalog = mixed_catalog();
    let individuals = grow_many(&catalog, 40, 3);
    let mut rng = StdRng::seed_from_u64(4);

    let mut mated = 0;
    for pair in individuals.chunks(2) {
        if let [receiver, donor] = pair {
            let mut child = receiver.clone();
            if child.mate(donor, &mut rng).is_ok() {
                mated += 1;
                assert_well_typed_after_mate(&child);
            }
        }
    }
    assert!(mated > 0, "no pair of individuals could be mated");
}

/// Crossover keeps every tree type-valid; argument usage is not enforced
fn assert_well_typed_after_mate(individual: &Individual) {
    for (tree, signature) in individual.iter() {
        assert!(tree.validate(signature.output_type()).is_ok());
    }
    assert!(individual.compile().is_ok());
}

#[test]
fn test_ephemeral_values_survive_crossover() {
    let catalog = mixed_catalog();
    let individuals = grow_many(&catalog, 40, 5);
    let mut rng = StdRng::seed_from_u64(6);

    for pair in individuals.chunks(2) {
        if let [receiver, donor] = pair {
            let mut child = receiver.clone();
            if child.mate(donor, &mut rng).is_err() {
                continue;
            }
            for (name, value) in child.ephemerals_used() {
                assert_eq!(catalog.ephemeral_instance(&name), Some(value));
            }
        }
    }
}

#[test]
fn test_mutation_resets_fitness_and_clone_keeps_it() {
    let catalog = mixed_catalog();
    let mut individuals = grow_many(&catalog, 10, 7);
    let mut rng = StdRng::seed_from_u64(8);
    let growth = GrowthConfig::default();

    let mut individual = individuals.remove(0);
    individual.set_fitness(3.5.into());

    let copy = individual.clone();
    assert_eq!(copy.fitness().map(|f| f.primary()), Some(3.5));

    let mut mutated = false;
    for _ in 0..20 {
        if individual.mutate(&growth, &mut rng).is_ok() {
            mutated = true;
            break;
        }
    }
    assert!(mutated);
    assert!(!individual.is_evaluated());
    assert_well_typed(&individual);
    // the copy is independent of the mutated individual
    assert_eq!(copy.fitness().map(|f| f.primary()), Some(3.5));
}

#[test]
fn test_mate_across_disjoint_vocabularies_fails() {
    let mut floats = PrimitiveCatalog::new();
    floats.with_arithmetic_primitives().unwrap();
    let mut bools = PrimitiveCatalog::new();
    bools.with_boolean_primitives().unwrap();

    let mut rng = StdRng::seed_from_u64(9);
    let growth = GrowthConfig::default();
    let adf = AdfConfig {
        max_adfs: 0,
        ..AdfConfig::default()
    };
    let float_contract = Contract::new(vec![DataType::FLOAT], DataType::FLOAT);
    let bool_contract = Contract::new(vec![DataType::BOOL], DataType::BOOL);

    let mut receiver = Individual::new(&floats, &float_contract, &growth, &adf, &mut rng).unwrap();
    let donor = Individual::new(&bools, &bool_contract, &growth, &adf, &mut rng).unwrap();
    receiver.set_fitness(1.0.into());

    assert!(matches!(
        receiver.mate(&donor, &mut rng),
        Err(typedgp::GpError::NoMate(_))
    ));
    // a failed mate leaves the receiver untouched
    assert!(receiver.is_evaluated());
}
