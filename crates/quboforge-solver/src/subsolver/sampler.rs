//! Adapter for external multi-sample services.

use std::fmt::Debug;

use quboforge_core::{Direction, Qubo, SubSolverError};

use super::{SubSolution, SubSolver, SubproblemRequest};
use crate::tabu::one_flip_descent;

/// An external service that returns several samples for one sub-QUBO,
/// such as an annealer or an exact solver behind a network call.
pub trait SubproblemSampler: Send + Sync + Debug {
    fn sample(&self, qubo: &Qubo, initial: &[bool]) -> Result<Vec<Vec<bool>>, SubSolverError>;
}

/// Picks the best sample a [`SubproblemSampler`] returns and, by default,
/// polishes it with a one-flip descent.
///
/// A sample of the wrong length is passed through unchanged so the
/// orchestrator reports the contract violation.
#[derive(Debug, Clone)]
pub struct SamplerSubSolver<S> {
    sampler: S,
    polish: bool,
}

impl<S: SubproblemSampler> SamplerSubSolver<S> {
    pub fn new(sampler: S) -> Self {
        Self {
            sampler,
            polish: true,
        }
    }

    pub fn with_polish(mut self, polish: bool) -> Self {
        self.polish = polish;
        self
    }

    pub fn sampler(&self) -> &S {
        &self.sampler
    }
}

fn best_sample(qubo: &Qubo, samples: Vec<Vec<bool>>, direction: Direction) -> Option<Vec<bool>> {
    let n = qubo.num_variables();
    if let Some(bad) = samples.iter().position(|s| s.len() != n) {
        return samples.into_iter().nth(bad);
    }
    let mut best: Option<(f64, Vec<bool>)> = None;
    for sample in samples {
        let energy = qubo.energy(&sample);
        if best
            .as_ref()
            .map_or(true, |(e, _)| direction.is_better(energy, *e))
        {
            best = Some((energy, sample));
        }
    }
    best.map(|(_, s)| s)
}

impl<S: SubproblemSampler> SubSolver for SamplerSubSolver<S> {
    fn solve(&self, request: &SubproblemRequest<'_>) -> Result<SubSolution, SubSolverError> {
        let qubo = request.qubo();
        let samples = self.sampler.sample(qubo, request.initial)?;
        let mut assignment = best_sample(qubo, samples, request.direction)
            .ok_or_else(|| SubSolverError::new("sampler returned no samples"))?;

        if self.polish && assignment.len() == qubo.num_variables() {
            let outcome = one_flip_descent(qubo, &mut assignment, request.direction);
            return Ok(SubSolution::new(assignment).with_iterations(outcome.flips));
        }
        Ok(SubSolution::new(assignment))
    }
}
