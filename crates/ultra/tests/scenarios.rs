//! End-to-end evolutionary scenarios (spec.md §8 "End-to-end scenarios"),
//! driven entirely through the public `ultra` facade.
//!
//! Grounded on `radiate/tests/engine_tests.rs`'s shape: one test per
//! illustrative problem, each building a fresh population/driver and
//! asserting the run reaches (or nearly reaches) a known optimum. These use
//! the `IntGenome`/`RealVec` test fixtures as stand-ins for a production
//! representation (out of scope per spec.md §1); the operators, driver, and
//! search orchestrator under test are the real core. A fixed RNG seed keeps
//! each test deterministic despite being statistical in spirit
//! (SPEC_FULL.md §10).

use std::cmp::Ordering;
use std::sync::atomic::AtomicBool;

use ultra::domain::random_provider;
use ultra::individual::testing::{IntGenome, IntGenomeProblem};
use ultra::individual::{Individual, RandomIndividual};
use ultra::{
    AgePolicy, AlpsDeStrategy, AlpsGaStrategy, EvolutionDriver, Fitness, LayeredPopulation, Parameters, RealValued,
    Search,
};

const SEED: u64 = 0xC0FFEE;

/// Scenario 1 (spec §8): guess `"Hello World"` over a fixed charset with a
/// GA whose genome is 11 integer character indices. Fitness counts matching
/// positions; the optimum is 11.
#[test]
fn string_guess_reaches_full_match() {
    random_provider::set_seed(SEED);

    const CHARSET: &str = " abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ!";
    const TARGET: &str = "Hello World";
    let target_indices: Vec<i32> = TARGET
        .chars()
        .map(|c| CHARSET.find(c).expect("target char must be in charset") as i32)
        .collect();

    let problem = IntGenomeProblem {
        len: target_indices.len(),
        lo: 0,
        hi: CHARSET.chars().count() as i32,
    };

    let fitness_target = target_indices.clone();
    let fitness_fn = move |ind: &IntGenome| -> ultra::Result<Fitness> {
        let matches = ind
            .genes
            .iter()
            .zip(fitness_target.iter())
            .filter(|(a, b)| a == b)
            .count();
        Ok(Fitness::scalar(matches as f32))
    };

    let parameters = Parameters::default()
        .with_individuals(300)
        .with_generations(400)
        .with_tournament_size(5)
        .with_threshold(Fitness::scalar(target_indices.len() as f32));
    parameters.validate(false).unwrap();

    let search = Search::new(|| {
        let population: LayeredPopulation<IntGenome> =
            LayeredPopulation::new_random(&problem, 1, 300, AgePolicy::default());
        let strategy = AlpsGaStrategy::new(5, 0.9, 0.05, 1.0);
        EvolutionDriver::new(population, problem, fitness_fn.clone(), strategy, parameters.clone())
    })
    .with_threshold(Fitness::scalar(target_indices.len() as f32));

    let stats = search.run(10);
    let best = stats.best.expect("at least one run must report a best individual");
    assert_eq!(best.fitness, Fitness::scalar(target_indices.len() as f32));
    assert_eq!(best.individual.genes, target_indices);
}

/// Scenario 3 (spec §8): 8-queens as a GA over 8 integers in `[0, 8)`.
/// Fitness is the negated count of attacking pairs (row or diagonal; genes
/// are implicitly distinct columns). The optimum is 0.
#[test]
fn eight_queens_finds_a_non_attacking_arrangement() {
    random_provider::set_seed(SEED.wrapping_add(1));

    let problem = IntGenomeProblem { len: 8, lo: 0, hi: 8 };

    let fitness_fn = |ind: &IntGenome| -> ultra::Result<Fitness> {
        let rows = &ind.genes;
        let mut attacking = 0;
        for i in 0..rows.len() {
            for j in (i + 1)..rows.len() {
                let col_gap = (j - i) as i32;
                if rows[i] == rows[j] || (rows[i] - rows[j]).abs() == col_gap {
                    attacking += 1;
                }
            }
        }
        Ok(Fitness::scalar(-(attacking as f32)))
    };

    let parameters = Parameters::default()
        .with_individuals(200)
        .with_generations(500)
        .with_tournament_size(5)
        .with_threshold(Fitness::scalar(0.0));
    parameters.validate(false).unwrap();

    let population: LayeredPopulation<IntGenome> =
        LayeredPopulation::new_random(&problem, 1, 200, AgePolicy::default());
    let strategy = AlpsGaStrategy::new(5, 0.9, 0.1, 1.0);
    let driver = EvolutionDriver::new(population, problem, fitness_fn, strategy, parameters);

    let summary = driver.run(&AtomicBool::new(false));
    let best = summary.best.expect("driver must report a best individual");
    assert_eq!(best.fitness, Fitness::scalar(0.0));
}

/// A fixed-length real vector used by the DE scenarios below; carries its
/// own domain bounds via [`RealVecProblem`] rather than a production
/// chromosome type (representations are out of scope per spec §1).
#[derive(Clone, Debug, PartialEq)]
struct RealVec {
    values: Vec<f64>,
    age: u32,
}

impl Individual for RealVec {
    fn fingerprint(&self) -> ultra::Fingerprint {
        let bytes: Vec<u8> = self.values.iter().flat_map(|v| v.to_le_bytes()).collect();
        ultra::Fingerprint::of(&bytes)
    }

    fn age(&self) -> u32 {
        self.age
    }

    fn set_age_at_least(&mut self, age: u32) {
        if age > self.age {
            self.age = age;
        }
    }

    fn genotype_cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.values.iter().zip(other.values.iter()) {
            match a.partial_cmp(b) {
                Some(Ordering::Equal) | None => continue,
                Some(o) => return o,
            }
        }
        Ordering::Equal
    }
}

impl RealValued for RealVec {
    fn values(&self) -> &[f64] {
        &self.values
    }

    fn from_values(values: Vec<f64>, age: u32) -> Self {
        RealVec { values, age }
    }
}

#[derive(Clone, Copy, Debug)]
struct RealVecProblem {
    len: usize,
    lo: f64,
    hi: f64,
}

impl RandomIndividual<RealVecProblem> for RealVec {
    fn random(problem: &RealVecProblem) -> Self {
        let values = (0..problem.len)
            .map(|_| random_provider::range(problem.lo..problem.hi))
            .collect();
        RealVec { values, age: 0 }
    }
}

/// Scenario 2 (spec §8): 5-D Rastrigin via DE over `[-5.12, 5.12]^5`,
/// fitness `= -(10*5 + sum(xi^2 - 10*cos(2*pi*xi)))` (greater is better, so
/// the optimum at the origin scores 0). Run for fewer generations than
/// spec's 1000 and assert a loose bound rather than exact convergence
/// (SPEC_FULL.md §10 "loosely-bounded assertions").
#[test]
fn rastrigin_5d_approaches_the_global_optimum() {
    random_provider::set_seed(SEED.wrapping_add(2));

    let problem = RealVecProblem { len: 5, lo: -5.12, hi: 5.12 };

    let fitness_fn = |ind: &RealVec| -> ultra::Result<Fitness> {
        let penalty: f64 = ind
            .values
            .iter()
            .map(|&x| x * x - 10.0 * (2.0 * std::f64::consts::PI * x).cos())
            .sum::<f64>()
            + 10.0 * ind.values.len() as f64;
        Ok(Fitness::scalar(-(penalty as f32)))
    };

    let parameters = Parameters::default()
        .with_individuals(50)
        .with_generations(300)
        .with_tournament_size(3)
        .with_de_weight(0.4, 0.9);
    parameters.validate(false).unwrap();

    let population: LayeredPopulation<RealVec> =
        LayeredPopulation::new_random(&problem, 1, 50, AgePolicy::default());
    let strategy = AlpsDeStrategy::new(20, 0.4, 0.9, 0.9, 3, 1.0);
    let driver = EvolutionDriver::new(population, problem, fitness_fn, strategy, parameters);

    let summary = driver.run(&AtomicBool::new(false));
    let best = summary.best.expect("driver must report a best individual");
    assert!(
        best.fitness.as_scalar() > -5.0,
        "expected near-optimal Rastrigin fitness, got {}",
        best.fitness.as_scalar()
    );
}

/// Scenario 4 (spec §8): a 0/1-knapsack-shaped problem solved by DE over a
/// continuous `[0, 1]^n` relaxation (component `> 0.5` selects the item).
/// Uses a small synthetic instance (not the original's 61-item fixture)
/// sized so a perfect-fill subset exists, for a tight deterministic bound.
#[test]
fn knapsack_relaxation_fills_to_the_target() {
    random_provider::set_seed(SEED.wrapping_add(3));

    const SIZES: [f64; 8] = [50.0, 30.0, 20.0, 15.0, 10.0, 8.0, 5.0, 2.0];
    const TARGET: f64 = 100.0; // 50 + 30 + 20 exactly fills the target.

    let problem = RealVecProblem { len: SIZES.len(), lo: 0.0, hi: 1.0 };

    let fitness_fn = |ind: &RealVec| -> ultra::Result<Fitness> {
        let filled: f64 = ind
            .values
            .iter()
            .zip(SIZES.iter())
            .filter(|(&x, _)| x > 0.5)
            .map(|(_, &size)| size)
            .sum();
        let fitness = if filled <= TARGET {
            filled
        } else {
            TARGET - filled // penalize overfilling, still comparable
        };
        Ok(Fitness::scalar(fitness as f32))
    };

    let parameters = Parameters::default()
        .with_individuals(80)
        .with_generations(200)
        .with_tournament_size(3)
        .with_de_weight(0.3, 0.8)
        .with_threshold(Fitness::scalar(TARGET as f32));
    parameters.validate(true).unwrap();

    let population: LayeredPopulation<RealVec> =
        LayeredPopulation::new_random(&problem, 1, 80, AgePolicy::default());
    let strategy = AlpsDeStrategy::new(20, 0.3, 0.8, 0.9, 3, 1.0);
    let driver = EvolutionDriver::new(population, problem, fitness_fn, strategy, parameters);

    let summary = driver.run(&AtomicBool::new(false));
    let best = summary.best.expect("driver must report a best individual");
    assert_eq!(best.fitness, Fitness::scalar(TARGET as f32));
}
