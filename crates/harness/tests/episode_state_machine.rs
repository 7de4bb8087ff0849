//! The episode loop against scripted environments, without physics.

use harness::{run_episode, Aggregation, Env, EvalError, Termination, Transition};
use physics::Observation;

/// Survives `survive` steps, then fails on the next one.
struct ScriptedEnv {
    survive: u64,
    applied: u64,
    resets: u32,
}

impl ScriptedEnv {
    fn new(survive: u64) -> Self {
        Self { survive, applied: 0, resets: 0 }
    }
}

impl Env for ScriptedEnv {
    fn reset(&mut self) -> Observation {
        self.applied = 0;
        self.resets += 1;
        [0.5; 4]
    }

    fn step(&mut self, _action: &[f64]) -> Result<Transition, EvalError> {
        self.applied += 1;
        if self.applied > self.survive {
            Ok(Transition::Failed)
        } else {
            Ok(Transition::Running([0.5; 4]))
        }
    }
}

fn idle(_: &Observation) -> Vec<f64> {
    vec![0.0]
}

#[test]
fn worst_of_constructed_episodes_is_the_fitness() {
    let steps: Vec<u64> = [10, 3, 7]
        .into_iter()
        .map(|survive| {
            let mut env = ScriptedEnv::new(survive);
            run_episode(&mut env, &idle, 100, |_, _| {}).unwrap().steps
        })
        .collect();
    assert_eq!(steps, vec![10, 3, 7]);
    assert_eq!(Aggregation::Min.reduce(&steps), 3.0);
}

#[test]
fn immediate_failure_scores_zero() {
    let mut env = ScriptedEnv::new(0);
    let result = run_episode(&mut env, &idle, 100, |_, _| {}).unwrap();
    assert_eq!(result.steps, 0);
    assert_eq!(result.termination, Termination::Failed);
    assert_eq!(env.applied, 1);
}

#[test]
fn budget_exhaustion_stops_without_extra_steps() {
    let mut env = ScriptedEnv::new(1_000);
    let result = run_episode(&mut env, &idle, 25, |_, _| {}).unwrap();
    assert_eq!(result.steps, 25);
    assert_eq!(result.termination, Termination::BudgetExhausted);
    assert_eq!(env.applied, 25);
    assert_eq!(env.resets, 1);
}

#[test]
fn surviving_exactly_the_budget_is_not_a_failure() {
    let mut env = ScriptedEnv::new(25);
    let result = run_episode(&mut env, &idle, 25, |_, _| {}).unwrap();
    assert_eq!(result.steps, 25);
    assert_eq!(result.termination, Termination::BudgetExhausted);
}

#[test]
fn observer_sees_each_applied_step_once() {
    let mut env = ScriptedEnv::new(4);
    let mut indices = Vec::new();
    let mut failures = 0;
    run_episode(&mut env, &idle, 100, |_, record| {
        indices.push(record.index);
        if record.transition == Transition::Failed {
            failures += 1;
        }
    })
    .unwrap();
    assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    assert_eq!(failures, 1);
}
