//! # Episodic evaluation
//!
//! Turns one policy into one fitness value: run a fixed number of episodes,
//! count the steps each one survives, and reduce the counts with the
//! configured [`Aggregation`].
//!
//! An episode counts a step only if the state after that step is still
//! balanced. The step that crosses a bound ends the episode without being
//! counted, so a result is always in `[0, max_steps_per_episode]`.

use physics::{CartPole, CartPoleConfig, Observation, SimulationState};
use serde::{Deserialize, Serialize};

use crate::actuator::{Actuator, ActuatorConfig};
use crate::aggregate::Aggregation;
use crate::env::{BalanceEnv, Env, Transition};
use crate::error::EvalError;
use crate::policy::Policy;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Scalar fitness reported to the evolutionary collaborator.
pub type Fitness = f64;

/// Mixed into an episode seed to derive its actuator-noise stream.
const NOISE_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;

/// How episodes of one evaluation obtain their random streams.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeSeeding {
    /// Episode `i` gets a fresh simulator seeded with `seed + i`. Results do
    /// not depend on execution order, so episodes may run in parallel.
    #[default]
    Independent,
    /// All episodes share one simulator and one stream seeded with `seed`,
    /// and run sequentially.
    Shared,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    pub num_episodes: usize,
    pub max_steps_per_episode: u64,
    /// Expected width of every action signal.
    pub action_size: usize,
    pub actuator: ActuatorConfig,
    pub aggregation: Aggregation,
    pub seed: u64,
    pub seeding: EpisodeSeeding,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            num_episodes: 5,
            // One minute of simulated time at the default 10 ms step.
            max_steps_per_episode: 60_000,
            action_size: 1,
            actuator: ActuatorConfig::default(),
            aggregation: Aggregation::default(),
            seed: 0,
            seeding: EpisodeSeeding::default(),
        }
    }
}

impl EvaluationConfig {
    /// # Errors
    ///
    /// [`EvalError::InvalidConfig`] for empty budgets or malformed actuator
    /// and aggregation settings.
    pub fn validate(&self) -> Result<(), EvalError> {
        if self.num_episodes == 0 {
            return Err(EvalError::InvalidConfig("num_episodes must be at least 1".into()));
        }
        if self.max_steps_per_episode == 0 {
            return Err(EvalError::InvalidConfig("max_steps_per_episode must be at least 1".into()));
        }
        if self.action_size == 0 {
            return Err(EvalError::InvalidConfig("action_size must be at least 1".into()));
        }
        self.actuator.validate()?;
        self.aggregation.validate()
    }
}

/// Why an episode stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    Failed,
    BudgetExhausted,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeResult {
    /// Steps survived before the failing step, or the full budget.
    pub steps: u64,
    pub termination: Termination,
}

/// One step as seen by [`run_episode`]'s observer.
pub struct StepRecord<'a> {
    /// Zero-based index of the step within the episode.
    pub index: u64,
    /// Observation the policy acted on.
    pub observation: Observation,
    pub action: &'a [f64],
    pub transition: Transition,
}

/// Owned per-step trace of a [`BalanceEnv`] episode.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TraceStep {
    pub index: u64,
    pub observation: Observation,
    pub action: Vec<f64>,
    pub force: f64,
    /// State after the step was applied.
    pub state: SimulationState,
    pub failed: bool,
}

/// Run one episode of `env` under `policy`.
///
/// `on_step` sees every applied step, including the failing one.
///
/// # Errors
///
/// Policy errors and simulator divergence end the episode immediately and
/// are returned unchanged.
pub fn run_episode<E, P, F>(
    env: &mut E,
    policy: &P,
    max_steps: u64,
    mut on_step: F,
) -> Result<EpisodeResult, EvalError>
where
    E: Env,
    P: Policy + ?Sized,
    F: FnMut(&E, StepRecord<'_>),
{
    let mut observation = env.reset();
    let mut steps = 0;
    while steps < max_steps {
        let action = policy.activate(&observation)?;
        let transition = env.step(&action)?;
        on_step(env, StepRecord { index: steps, observation, action: &action, transition });
        match transition {
            Transition::Failed => {
                return Ok(EpisodeResult { steps, termination: Termination::Failed });
            }
            Transition::Running(next) => {
                steps += 1;
                observation = next;
            }
        }
    }
    Ok(EpisodeResult { steps, termination: Termination::BudgetExhausted })
}

/// Evaluates policies against a fixed physics and evaluation configuration.
#[derive(Clone, Debug)]
pub struct Evaluator {
    physics: CartPoleConfig,
    config: EvaluationConfig,
}

impl Evaluator {
    /// Validate both configurations; nothing is simulated yet.
    ///
    /// # Errors
    ///
    /// [`EvalError::Physics`] or [`EvalError::InvalidConfig`].
    pub fn new(physics: CartPoleConfig, config: EvaluationConfig) -> Result<Self, EvalError> {
        physics.validate()?;
        config.validate()?;
        Ok(Self { physics, config })
    }

    #[must_use]
    pub fn physics(&self) -> &CartPoleConfig {
        &self.physics
    }

    #[must_use]
    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// Fitness of `policy`: the aggregated episode step counts.
    ///
    /// # Errors
    ///
    /// The first policy or simulation error of any episode.
    pub fn evaluate<P: Policy + ?Sized>(&self, policy: &P) -> Result<Fitness, EvalError> {
        let results = self.episode_results(policy)?;
        let steps: Vec<u64> = results.iter().map(|r| r.steps).collect();
        let fitness = self.config.aggregation.reduce(&steps);
        tracing::debug!(?steps, fitness, "candidate evaluated");
        Ok(fitness)
    }

    /// Results of every episode, in episode order.
    ///
    /// # Errors
    ///
    /// The first policy or simulation error of any episode.
    pub fn episode_results<P: Policy + ?Sized>(
        &self,
        policy: &P,
    ) -> Result<Vec<EpisodeResult>, EvalError> {
        match self.config.seeding {
            EpisodeSeeding::Independent => self.independent_episodes(policy),
            EpisodeSeeding::Shared => {
                let mut env = self.environment(self.config.seed)?;
                (0..self.config.num_episodes)
                    .map(|episode| self.observed_episode(&mut env, policy, episode, |_, _| {}))
                    .collect()
            }
        }
    }

    /// Run a single episode and report every step to `observer`.
    ///
    /// The episode sees exactly the random streams it would see inside
    /// [`evaluate`](Self::evaluate).
    ///
    /// # Errors
    ///
    /// [`EvalError::InvalidConfig`] if `episode` is out of range, otherwise
    /// the episode's policy or simulation error.
    pub fn trace_episode<P, F>(
        &self,
        policy: &P,
        episode: usize,
        observer: F,
    ) -> Result<EpisodeResult, EvalError>
    where
        P: Policy + ?Sized,
        F: FnMut(&TraceStep),
    {
        if episode >= self.config.num_episodes {
            return Err(EvalError::InvalidConfig(format!(
                "episode {episode} is out of range for {} episodes",
                self.config.num_episodes
            )));
        }
        match self.config.seeding {
            EpisodeSeeding::Independent => {
                let mut env = self.environment(self.episode_seed(episode))?;
                self.observed_episode(&mut env, policy, episode, tracer(observer))
            }
            EpisodeSeeding::Shared => {
                let mut env = self.environment(self.config.seed)?;
                for earlier in 0..episode {
                    self.observed_episode(&mut env, policy, earlier, |_, _| {})?;
                }
                self.observed_episode(&mut env, policy, episode, tracer(observer))
            }
        }
    }

    #[cfg(feature = "parallel")]
    fn independent_episodes<P: Policy + ?Sized>(
        &self,
        policy: &P,
    ) -> Result<Vec<EpisodeResult>, EvalError> {
        (0..self.config.num_episodes)
            .into_par_iter()
            .map(|episode| self.independent_episode(policy, episode))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn independent_episodes<P: Policy + ?Sized>(
        &self,
        policy: &P,
    ) -> Result<Vec<EpisodeResult>, EvalError> {
        (0..self.config.num_episodes)
            .map(|episode| self.independent_episode(policy, episode))
            .collect()
    }

    fn independent_episode<P: Policy + ?Sized>(
        &self,
        policy: &P,
        episode: usize,
    ) -> Result<EpisodeResult, EvalError> {
        let mut env = self.environment(self.episode_seed(episode))?;
        self.observed_episode(&mut env, policy, episode, |_, _| {})
    }

    fn observed_episode<P, F>(
        &self,
        env: &mut BalanceEnv,
        policy: &P,
        episode: usize,
        on_step: F,
    ) -> Result<EpisodeResult, EvalError>
    where
        P: Policy + ?Sized,
        F: FnMut(&BalanceEnv, StepRecord<'_>),
    {
        let result = run_episode(env, policy, self.config.max_steps_per_episode, on_step);
        match &result {
            Ok(r) => tracing::debug!(episode, steps = r.steps, termination = ?r.termination, "episode finished"),
            Err(e) => tracing::debug!(episode, error = %e, "episode aborted"),
        }
        result
    }

    fn episode_seed(&self, episode: usize) -> u64 {
        self.config.seed.wrapping_add(episode as u64)
    }

    fn environment(&self, seed: u64) -> Result<BalanceEnv, EvalError> {
        let sim = CartPole::with_seed(self.physics.clone(), seed)?;
        let actuator = Actuator::new(&self.config.actuator, seed ^ NOISE_STREAM)?;
        Ok(BalanceEnv::new(sim, actuator, self.config.action_size))
    }
}

fn tracer<F: FnMut(&TraceStep)>(mut observer: F) -> impl FnMut(&BalanceEnv, StepRecord<'_>) {
    move |env: &BalanceEnv, record: StepRecord<'_>| {
        observer(&TraceStep {
            index: record.index,
            observation: record.observation,
            action: record.action.to_vec(),
            force: env.last_force(),
            state: env.state(),
            failed: record.transition == Transition::Failed,
        });
    }
}
