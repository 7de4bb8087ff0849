//! Generation evaluation through the population interface.

use std::collections::BTreeMap;

use harness::{
    evaluate_generation, Activation, Dense, EvalError, EvaluationConfig, Evaluator, FeedForward,
    Fitness, Population, PolicyError,
};
use physics::CartPoleConfig;

/// Outputs the scaled pole angle, so the cart follows the lean.
fn follower() -> FeedForward {
    FeedForward::new(vec![Dense::new(vec![0.0, 0.0, 1.0, 0.0], vec![0.0], 4, 1, Activation::Identity)])
        .unwrap()
}

/// Two outputs where one is expected.
fn two_headed() -> FeedForward {
    FeedForward::new(vec![Dense::new(vec![0.0; 8], vec![0.0; 2], 4, 2, Activation::Sigmoid)]).unwrap()
}

struct Pool {
    members: Vec<(u32, FeedForward)>,
    fitness: BTreeMap<u32, Fitness>,
    abort_on_error: bool,
}

impl Pool {
    fn new(abort_on_error: bool) -> Self {
        Self {
            members: vec![(1, follower()), (2, two_headed()), (3, follower())],
            fitness: BTreeMap::new(),
            abort_on_error,
        }
    }
}

impl Population for Pool {
    type Id = u32;
    type Policy = FeedForward;

    fn candidates(&self) -> Vec<(u32, &FeedForward)> {
        self.members.iter().map(|(id, net)| (*id, net)).collect()
    }

    fn assign_fitness(&mut self, id: u32, outcome: Result<Fitness, EvalError>) -> Result<(), EvalError> {
        match outcome {
            Ok(fitness) => {
                self.fitness.insert(id, fitness);
                Ok(())
            }
            Err(e) if self.abort_on_error => Err(e),
            Err(_) => {
                self.fitness.insert(id, 0.0);
                Ok(())
            }
        }
    }
}

fn evaluator() -> Evaluator {
    let config = EvaluationConfig { num_episodes: 3, max_steps_per_episode: 500, ..Default::default() };
    Evaluator::new(CartPoleConfig::default(), config).unwrap()
}

#[test]
fn every_candidate_is_assigned_a_fitness() {
    let evaluator = evaluator();
    let mut pool = Pool::new(false);
    evaluate_generation(&evaluator, &mut pool).unwrap();

    assert_eq!(pool.fitness.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(pool.fitness[&2], 0.0);
    // Identical networks score identically.
    assert_eq!(pool.fitness[&1], pool.fitness[&3]);
    assert_eq!(pool.fitness[&1], evaluator.evaluate(&follower()).unwrap());
}

#[test]
fn population_may_abort_on_a_failed_candidate() {
    let mut pool = Pool::new(true);
    let err = evaluate_generation(&evaluator(), &mut pool).unwrap_err();
    assert_eq!(err, EvalError::Policy(PolicyError::WrongArity { expected: 1, got: 2 }));
    // Results are handed over in candidate order, so only the first landed.
    assert_eq!(pool.fitness.keys().copied().collect::<Vec<_>>(), vec![1]);
}
