//! Interface to the evolutionary process that owns the candidates.
//!
//! The harness knows nothing about genomes, species or selection. A
//! [`Population`] only has to hand out `(id, policy)` pairs and accept one
//! fitness outcome per candidate.

use crate::error::EvalError;
use crate::evaluator::{Evaluator, Fitness};
use crate::policy::Policy;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A generation of candidates supplied by the evolutionary collaborator.
pub trait Population {
    type Id: Send + Sync;
    type Policy: Policy;

    /// Candidates to evaluate this generation, in a stable order.
    fn candidates(&self) -> Vec<(Self::Id, &Self::Policy)>;

    /// Receive the outcome of one candidate's evaluation.
    ///
    /// Return `Ok` to keep going (for example after recording zero fitness
    /// for a failed candidate) or `Err` to abort the generation.
    ///
    /// # Errors
    ///
    /// Whatever the population decides should stop the generation.
    fn assign_fitness(&mut self, id: Self::Id, outcome: Result<Fitness, EvalError>) -> Result<(), EvalError>;
}

/// Evaluate every candidate, then report results in candidate order.
///
/// Every candidate is evaluated even if an earlier one errs; the population
/// decides through [`Population::assign_fitness`] whether that aborts.
///
/// # Errors
///
/// The first error returned by [`Population::assign_fitness`].
pub fn evaluate_generation<P: Population>(evaluator: &Evaluator, population: &mut P) -> Result<(), EvalError> {
    let outcomes = evaluate_candidates(evaluator, population.candidates());
    for (id, outcome) in outcomes {
        match &outcome {
            Ok(fitness) => tracing::debug!(fitness, "candidate scored"),
            Err(e) => tracing::debug!(error = %e, "candidate evaluation failed"),
        }
        population.assign_fitness(id, outcome)?;
    }
    Ok(())
}

#[cfg(feature = "parallel")]
fn evaluate_candidates<I: Send + Sync, P: Policy>(
    evaluator: &Evaluator,
    candidates: Vec<(I, &P)>,
) -> Vec<(I, Result<Fitness, EvalError>)> {
    candidates
        .into_par_iter()
        .map(|(id, policy)| {
            let outcome = evaluator.evaluate(policy);
            (id, outcome)
        })
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn evaluate_candidates<I, P: Policy>(
    evaluator: &Evaluator,
    candidates: Vec<(I, &P)>,
) -> Vec<(I, Result<Fitness, EvalError>)> {
    candidates
        .into_iter()
        .map(|(id, policy)| {
            let outcome = evaluator.evaluate(policy);
            (id, outcome)
        })
        .collect()
}
